pub mod aggregation;
pub mod morphology;
pub mod phrase_checker;
pub mod pronoun;
pub mod realizer;
pub mod rules;
pub mod syntax;
