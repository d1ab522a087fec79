/// The realizer: phrase tree → inflected tokens → sentence.
///
/// Wires together the lexicon, linearization, morphology and
/// aggregation. Built via `Realizer::builder()`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::aggregation::ClauseAggregator;
use crate::core::morphology::MorphologyEngine;
use crate::core::rules::{RuleBook, RuleError};
use crate::core::syntax::SyntaxEngine;
use crate::schema::lexicon::{EmptyLexicon, Lexicon, LexiconError, MemoryLexicon};
use crate::schema::node::Node;

#[derive(Debug, Error)]
pub enum RealizerError {
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("rule error: {0}")]
    Rules(#[from] RuleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Output settings. Every field has a default, so a RON file only needs
/// the ones it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealizerConfig {
    /// Conjunction used when joining subjects and aggregated clauses.
    pub conjunction: String,
    /// Appended by `realize_sentence` unless the text already ends in
    /// punctuation.
    pub terminator: String,
    pub capitalize: bool,
    /// Commas between the non-final members of a list of three or more.
    pub list_commas: bool,
}

impl Default for RealizerConfig {
    fn default() -> Self {
        Self {
            conjunction: "and".to_string(),
            terminator: ".".to_string(),
            capitalize: true,
            list_commas: true,
        }
    }
}

impl RealizerConfig {
    pub fn load_from_ron(path: &Path) -> Result<RealizerConfig, RealizerError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse_ron(&contents)?;
        debug!(path = %path.display(), "loaded realizer config");
        Ok(config)
    }

    pub fn parse_ron(input: &str) -> Result<RealizerConfig, RealizerError> {
        Ok(ron::from_str(input)?)
    }
}

const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| PUNCTUATION.contains(&c))
}

/// Join tokens with spaces, attaching punctuation to the token before it.
fn reassemble_tokens(tokens: &[String]) -> String {
    let mut result = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 && !is_punctuation(tok) {
            result.push(' ');
        }
        result.push_str(tok);
    }
    result
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The top-level realizer.
pub struct Realizer {
    lexicon: Box<dyn Lexicon>,
    morphology: MorphologyEngine,
    config: RealizerConfig,
}

/// Builder for constructing a `Realizer`.
pub struct RealizerBuilder {
    lexicon_files: Vec<PathBuf>,
    rules_files: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    /// Directly provided lexicon entries (for use without files).
    lexicon: Option<MemoryLexicon>,
    /// A lexicon backed by something other than memory. Replaces the
    /// in-memory lexicon entirely.
    custom_lexicon: Option<Box<dyn Lexicon>>,
    /// Rules merged over the built-in English rules.
    rules: Option<RuleBook>,
    config: Option<RealizerConfig>,
}

impl Realizer {
    pub fn builder() -> RealizerBuilder {
        RealizerBuilder {
            lexicon_files: Vec::new(),
            rules_files: Vec::new(),
            config_file: None,
            lexicon: None,
            custom_lexicon: None,
            rules: None,
            config: None,
        }
    }

    pub fn config(&self) -> &RealizerConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &dyn Lexicon {
        self.lexicon.as_ref()
    }

    pub fn morphology(&self) -> &MorphologyEngine {
        &self.morphology
    }

    fn syntax(&self) -> SyntaxEngine<'_> {
        SyntaxEngine::new(self.lexicon.as_ref())
            .with_conjunction(&self.config.conjunction)
            .with_list_commas(self.config.list_commas)
    }

    /// Inflected surface tokens of `node`, in order.
    pub fn realize(&self, node: &Node) -> Vec<String> {
        let leaves = self.syntax().realize(node);
        let mut tokens = self.morphology.realize_leaves(&leaves);
        tokens.retain(|t| !t.is_empty());
        tokens
    }

    /// `node` as one orthographic sentence.
    pub fn realize_sentence(&self, node: &Node) -> String {
        let tokens = self.realize(node);
        let mut text = reassemble_tokens(&tokens);
        if text.is_empty() {
            return text;
        }
        if self.config.capitalize {
            text = capitalize_first(&text);
        }
        if !text.ends_with(PUNCTUATION) {
            text.push_str(&self.config.terminator);
        }
        text
    }

    /// Merge `sentences` into one clause using the configured
    /// conjunction. `None` when no rule applies.
    pub fn aggregate(&self, sentences: &[Node]) -> Option<Node> {
        ClauseAggregator::new(&self.config.conjunction).apply(sentences)
    }

    /// Aggregate `sentences` and realize the result, falling back to
    /// realizing each one separately.
    pub fn realize_paragraph(&self, sentences: &[Node]) -> String {
        match self.aggregate(sentences) {
            Some(merged) => self.realize_sentence(&merged),
            None => sentences
                .iter()
                .map(|s| self.realize_sentence(s))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl RealizerBuilder {
    /// Add a RON lexicon file. Later files override earlier ones.
    pub fn lexicon_file(mut self, path: impl AsRef<Path>) -> Self {
        self.lexicon_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Add a RON rule file, merged over the built-in English rules.
    pub fn rules_file(mut self, path: impl AsRef<Path>) -> Self {
        self.rules_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_lexicon(mut self, lexicon: MemoryLexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_custom_lexicon(mut self, lexicon: impl Lexicon + 'static) -> Self {
        self.custom_lexicon = Some(Box::new(lexicon));
        self
    }

    pub fn with_rules(mut self, rules: RuleBook) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_config(mut self, config: RealizerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Realizer, RealizerError> {
        let config = match (self.config, &self.config_file) {
            (Some(config), _) => config,
            (None, Some(path)) => RealizerConfig::load_from_ron(path)?,
            (None, None) => RealizerConfig::default(),
        };

        let mut rules = RuleBook::english();
        for path in &self.rules_files {
            rules.merge(RuleBook::load_from_ron(path)?);
        }
        if let Some(custom) = self.rules {
            rules.merge(custom);
        }

        let lexicon: Box<dyn Lexicon> = match self.custom_lexicon {
            Some(custom) => custom,
            None => {
                let mut memory = MemoryLexicon::new();
                for path in &self.lexicon_files {
                    memory.merge(MemoryLexicon::load_from_ron(path)?);
                }
                if let Some(direct) = self.lexicon {
                    memory.merge(direct);
                }
                if memory.is_empty() {
                    Box::new(EmptyLexicon)
                } else {
                    Box::new(memory)
                }
            }
        };

        info!(
            lexicon_files = self.lexicon_files.len(),
            rules_files = self.rules_files.len(),
            conjunction = %config.conjunction,
            "built realizer"
        );

        Ok(Realizer {
            lexicon,
            morphology: MorphologyEngine::new(rules),
            config,
        })
    }
}
