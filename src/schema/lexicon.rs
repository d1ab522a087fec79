/// Lexicon lookup boundary and an in-memory, RON-loadable implementation.

use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::features::LexicalCategory;
use super::word::Word;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Source of lexicon entries keyed by baseform and category.
///
/// A miss is not an error: realization falls back to regular morphology.
pub trait Lexicon: Send + Sync {
    fn lookup(&self, base: &str, category: LexicalCategory) -> Option<Word>;
}

/// Lexicon answering every lookup with "not found".
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl Lexicon for EmptyLexicon {
    fn lookup(&self, _base: &str, _category: LexicalCategory) -> Option<Word> {
        None
    }
}

/// Hash-map lexicon. Baseforms are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    entries: FxHashMap<(String, LexicalCategory), Word>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous one for the same key.
    pub fn insert(&mut self, word: Word) {
        self.entries
            .insert((word.base.to_lowercase(), word.category), word);
    }

    pub fn get(&self, base: &str, category: LexicalCategory) -> Option<&Word> {
        self.entries.get(&(base.to_lowercase(), category))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a lexicon from a RON file holding a list of words.
    pub fn load_from_ron(path: &Path) -> Result<MemoryLexicon, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        let lexicon = Self::parse_ron(&contents)?;
        debug!(path = %path.display(), entries = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }

    /// Parse a lexicon from a RON string holding a list of words.
    pub fn parse_ron(input: &str) -> Result<MemoryLexicon, LexiconError> {
        let words: Vec<Word> = ron::from_str(input)?;
        let mut lexicon = Self::new();
        for word in words {
            lexicon.insert(word);
        }
        Ok(lexicon)
    }

    /// Merge another lexicon into this one. Entries from `other` override
    /// entries in `self` with the same baseform and category.
    pub fn merge(&mut self, other: MemoryLexicon) {
        self.entries.extend(other.entries);
    }
}

impl Lexicon for MemoryLexicon {
    fn lookup(&self, base: &str, category: LexicalCategory) -> Option<Word> {
        self.get(base, category).cloned()
    }
}

impl FromIterator<Word> for MemoryLexicon {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut lexicon = Self::new();
        for word in iter {
            lexicon.insert(word);
        }
        lexicon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::word::IrregularForms;

    #[test]
    fn parse_and_lookup() {
        let input = r#"[
            (base: "mouse", category: Noun, irregular: (plural: Some("mice"))),
            (base: "Paris", category: Noun, class: (proper: true)),
        ]"#;
        let lex = MemoryLexicon::parse_ron(input).unwrap();
        assert_eq!(lex.len(), 2);
        let mouse = lex.lookup("mouse", LexicalCategory::Noun).unwrap();
        assert_eq!(mouse.irregular.plural.as_deref(), Some("mice"));
        assert!(lex.lookup("paris", LexicalCategory::Noun).unwrap().class.proper);
        assert!(lex.lookup("mouse", LexicalCategory::Verb).is_none());
    }

    #[test]
    fn merge_precedence() {
        let mut base: MemoryLexicon = [Word::new("go", LexicalCategory::Verb)]
            .into_iter()
            .collect();
        let overlay: MemoryLexicon = [Word::new("go", LexicalCategory::Verb).with_irregular(
            IrregularForms {
                past: Some("went".to_string()),
                ..IrregularForms::default()
            },
        )]
        .into_iter()
        .collect();
        base.merge(overlay);
        assert_eq!(base.len(), 1);
        let go = base.get("go", LexicalCategory::Verb).unwrap();
        assert_eq!(go.irregular.past.as_deref(), Some("went"));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = MemoryLexicon::parse_ron("[(base: 3)]").unwrap_err();
        assert!(matches!(err, LexiconError::Ron(_)));
    }

    #[test]
    fn empty_lexicon_never_answers() {
        assert!(EmptyLexicon.lookup("dog", LexicalCategory::Noun).is_none());
    }
}
