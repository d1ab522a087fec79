use serde::{Deserialize, Serialize};

use super::features::{Gender, InflectionPattern, LexicalCategory};

/// Irregular inflected forms recorded for a lexicon entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrregularForms {
    pub plural: Option<String>,
    pub past: Option<String>,
    pub past_participle: Option<String>,
    pub present_participle: Option<String>,
    pub present3s: Option<String>,
    pub comparative: Option<String>,
    pub superlative: Option<String>,
}

impl IrregularForms {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Classification flags of a lexicon entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordClass {
    pub proper: bool,
    pub non_count: bool,
    pub reflexive: bool,
    /// Verbs such as "be" in "there is", or the expletive "there" itself.
    pub expletive_subject: bool,
    pub qualitative: bool,
    pub colour: bool,
    pub classifying: bool,
}

/// An immutable lexicon entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub base: String,
    pub category: LexicalCategory,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub irregular: IrregularForms,
    #[serde(default)]
    pub class: WordClass,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub pattern: Option<InflectionPattern>,
}

impl Word {
    pub fn new(base: &str, category: LexicalCategory) -> Self {
        Self {
            base: base.to_string(),
            category,
            id: None,
            irregular: IrregularForms::default(),
            class: WordClass::default(),
            gender: None,
            pattern: None,
        }
    }

    pub fn with_irregular(mut self, irregular: IrregularForms) -> Self {
        self.irregular = irregular;
        self
    }

    pub fn with_class(mut self, class: WordClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_pattern(mut self, pattern: InflectionPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn is_a(&self, category: LexicalCategory) -> bool {
        self.category == category
    }

    /// Fill every unset field from `entry`, the stored lexicon entry for
    /// the same baseform. Values already present on `self` win.
    pub fn fill_from(&mut self, entry: &Word) {
        let irr = &mut self.irregular;
        let from = &entry.irregular;
        for (slot, value) in [
            (&mut irr.plural, &from.plural),
            (&mut irr.past, &from.past),
            (&mut irr.past_participle, &from.past_participle),
            (&mut irr.present_participle, &from.present_participle),
            (&mut irr.present3s, &from.present3s),
            (&mut irr.comparative, &from.comparative),
            (&mut irr.superlative, &from.superlative),
        ] {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }

        let class = &mut self.class;
        class.proper |= entry.class.proper;
        class.non_count |= entry.class.non_count;
        class.reflexive |= entry.class.reflexive;
        class.expletive_subject |= entry.class.expletive_subject;
        class.qualitative |= entry.class.qualitative;
        class.colour |= entry.class.colour;
        class.classifying |= entry.class.classifying;

        if self.id.is_none() {
            self.id.clone_from(&entry.id);
        }
        if self.gender.is_none() {
            self.gender = entry.gender;
        }
        if self.pattern.is_none() {
            self.pattern = entry.pattern;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_builder() {
        let w = Word::new("child", LexicalCategory::Noun).with_irregular(IrregularForms {
            plural: Some("children".to_string()),
            ..IrregularForms::default()
        });
        assert_eq!(w.base, "child");
        assert!(w.is_a(LexicalCategory::Noun));
        assert_eq!(w.irregular.plural.as_deref(), Some("children"));
        assert!(!w.irregular.is_empty());
    }

    #[test]
    fn fill_from_keeps_local_values() {
        let mut local = Word::new("go", LexicalCategory::Verb).with_irregular(IrregularForms {
            past: Some("wented".to_string()),
            ..IrregularForms::default()
        });
        let stored = Word::new("go", LexicalCategory::Verb).with_irregular(IrregularForms {
            past: Some("went".to_string()),
            past_participle: Some("gone".to_string()),
            ..IrregularForms::default()
        });
        local.fill_from(&stored);
        assert_eq!(local.irregular.past.as_deref(), Some("wented"));
        assert_eq!(local.irregular.past_participle.as_deref(), Some("gone"));
    }

    #[test]
    fn word_parses_from_sparse_ron() {
        let w: Word = ron::from_str(r#"(base: "red", category: Adjective, class: (colour: true))"#)
            .unwrap();
        assert!(w.class.colour);
        assert!(!w.class.qualitative);
        assert!(w.irregular.is_empty());
        assert!(w.pattern.is_none());
    }
}
