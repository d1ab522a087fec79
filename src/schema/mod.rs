pub mod features;
pub mod lexicon;
pub mod node;
pub mod word;
