//! Phrase Realizer: feature-driven surface realization for English.
//!
//! Turns a tree of phrases and clauses annotated with grammatical
//! features into inflected, ordered text, using a pipeline of
//! linearization, rule-based morphology, and clause aggregation.

pub mod core;
pub mod schema;

pub use crate::core::aggregation::{AggregationRule, ClauseAggregator};
pub use crate::core::morphology::MorphologyEngine;
pub use crate::core::realizer::{Realizer, RealizerBuilder, RealizerConfig, RealizerError};
pub use crate::core::rules::{Inflection, RuleBook};
pub use crate::core::syntax::{Leaf, SyntaxEngine};
pub use crate::schema::features::Features;
pub use crate::schema::lexicon::{Lexicon, MemoryLexicon};
pub use crate::schema::node::{Coordinate, InflectedWord, Literal, Node, Phrase};
pub use crate::schema::word::Word;
