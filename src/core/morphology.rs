/// Morphology: turns inflected-word leaves into spelled surface forms.
///
/// Every path is total. A word the rules cannot handle comes back as its
/// baseform.

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::core::pronoun;
use crate::core::rules::{Inflection, RuleBook};
use crate::core::syntax::Leaf;
use crate::schema::features::{Features, Form, InflectionPattern, LexicalCategory, Person, Tense};
use crate::schema::node::InflectedWord;
use crate::schema::word::IrregularForms;

static WORD_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}'\-]*$").ok());

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would", "ought",
];

fn is_word_shaped(base: &str) -> bool {
    WORD_SHAPE.as_ref().map_or(true, |re| re.is_match(base))
}

fn is_modal(base: &str) -> bool {
    MODALS.iter().any(|m| m.eq_ignore_ascii_case(base))
}

fn starts_with_vowel(form: &str) -> bool {
    form.chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// Append the possessive suffix: `'` after a final `s`, `'s` otherwise.
pub fn possessive(form: &str) -> String {
    if form.ends_with('s') || form.ends_with('S') {
        format!("{form}'")
    } else {
        format!("{form}'s")
    }
}

fn third_singular(features: &Features) -> bool {
    !features.is_plural() && features.person.map_or(true, |p| p == Person::Third)
}

/// Rule-driven inflection engine.
#[derive(Debug, Clone)]
pub struct MorphologyEngine {
    rules: RuleBook,
}

impl Default for MorphologyEngine {
    fn default() -> Self {
        Self::new(RuleBook::english())
    }
}

impl MorphologyEngine {
    pub fn new(rules: RuleBook) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Surface form of a single word.
    pub fn inflect(&self, word: &InflectedWord) -> String {
        let base = word.base.as_str();
        if !is_word_shaped(base) {
            return base.to_string();
        }
        if word.features.pattern == Some(InflectionPattern::Invariant) {
            return base.to_string();
        }
        let form = match word.category {
            LexicalCategory::Noun => self.noun(word),
            LexicalCategory::Verb if is_modal(base) => base.to_string(),
            LexicalCategory::Verb => self.verb(word),
            LexicalCategory::Adjective | LexicalCategory::Adverb => self.grade(word),
            LexicalCategory::Pronoun => pronoun::reselect(base, &word.features),
            LexicalCategory::Determiner => determiner(base, &word.features),
            _ => base.to_string(),
        };
        trace!(base, form = %form, category = ?word.category, "inflected");
        form
    }

    /// Inflect a whole leaf sequence, then fix indefinite articles against
    /// the form that follows them.
    pub fn realize_leaves(&self, leaves: &[Leaf]) -> Vec<String> {
        let mut forms: Vec<String> = leaves
            .iter()
            .map(|leaf| match leaf {
                Leaf::Word(word) => self.inflect(word),
                Leaf::Literal(literal) => literal.text.clone(),
            })
            .collect();

        for i in 0..forms.len().saturating_sub(1) {
            let is_determiner = matches!(
                &leaves[i],
                Leaf::Word(w) if w.category == LexicalCategory::Determiner
            );
            if !is_determiner {
                continue;
            }
            let article = forms[i].to_lowercase();
            if article != "a" && article != "an" {
                continue;
            }
            let chosen = if starts_with_vowel(&forms[i + 1]) { "an" } else { "a" };
            let capital = forms[i].starts_with('A');
            forms[i] = if capital {
                let mut s = chosen.to_string();
                s[..1].make_ascii_uppercase();
                s
            } else {
                chosen.to_string()
            };
        }
        forms
    }

    fn irregular<'w>(word: &'w InflectedWord) -> Option<&'w IrregularForms> {
        word.word.as_ref().map(|w| &w.irregular)
    }

    fn apply(&self, inflection: Inflection, word: &InflectedWord) -> String {
        let double = word.features.pattern == Some(InflectionPattern::RegularDouble);
        self.rules
            .inflect(inflection, &word.base, double)
            .unwrap_or_else(|| word.base.clone())
    }

    fn noun(&self, word: &InflectedWord) -> String {
        let f = &word.features;
        let blocked = word
            .class()
            .is_some_and(|c| c.non_count || c.proper)
            || matches!(
                f.pattern,
                Some(InflectionPattern::Uncountable | InflectionPattern::Invariant)
            );
        let form = if f.is_plural() && !blocked {
            match Self::irregular(word).and_then(|irr| irr.plural.clone()) {
                Some(plural) => plural,
                None if f.pattern == Some(InflectionPattern::GrecoLatin) => {
                    self.apply(Inflection::GrecoLatinPlural, word)
                }
                None => self.apply(Inflection::Plural, word),
            }
        } else {
            word.base.clone()
        };
        if f.possessive {
            possessive(&form)
        } else {
            form
        }
    }

    fn verb(&self, word: &InflectedWord) -> String {
        let f = &word.features;
        if word.base.eq_ignore_ascii_case("be") {
            return be_form(f).to_string();
        }
        let irr = Self::irregular(word);
        match f.form.unwrap_or(Form::Normal) {
            Form::PastParticiple => irr
                .and_then(|i| i.past_participle.clone().or_else(|| i.past.clone()))
                .unwrap_or_else(|| self.apply(Inflection::PastParticiple, word)),
            Form::PresentParticiple | Form::Gerund => irr
                .and_then(|i| i.present_participle.clone())
                .unwrap_or_else(|| self.apply(Inflection::PresentParticiple, word)),
            Form::BareInfinitive | Form::Infinitive | Form::Imperative => word.base.clone(),
            Form::Normal => match f.tense {
                Some(Tense::Past) => irr
                    .and_then(|i| i.past.clone())
                    .unwrap_or_else(|| self.apply(Inflection::Past, word)),
                Some(Tense::Future) => word.base.clone(),
                Some(Tense::Present) | None if third_singular(f) => irr
                    .and_then(|i| i.present3s.clone())
                    .unwrap_or_else(|| self.apply(Inflection::Present3s, word)),
                Some(Tense::Present) | None => word.base.clone(),
            },
        }
    }

    fn grade(&self, word: &InflectedWord) -> String {
        let f = &word.features;
        let irr = Self::irregular(word);
        if f.superlative {
            irr.and_then(|i| i.superlative.clone())
                .unwrap_or_else(|| self.apply(Inflection::Superlative, word))
        } else if f.comparative {
            irr.and_then(|i| i.comparative.clone())
                .unwrap_or_else(|| self.apply(Inflection::Comparative, word))
        } else {
            word.base.clone()
        }
    }
}

fn be_form(f: &Features) -> &'static str {
    match f.form.unwrap_or(Form::Normal) {
        Form::PastParticiple => "been",
        Form::PresentParticiple | Form::Gerund => "being",
        Form::BareInfinitive | Form::Infinitive | Form::Imperative => "be",
        Form::Normal => match f.tense {
            Some(Tense::Future) => "be",
            Some(Tense::Past) => {
                if f.is_plural() || f.person == Some(Person::Second) {
                    "were"
                } else {
                    "was"
                }
            }
            Some(Tense::Present) | None => {
                if f.is_plural() {
                    "are"
                } else {
                    match f.person {
                        Some(Person::First) => "am",
                        Some(Person::Second) => "are",
                        _ => "is",
                    }
                }
            }
        },
    }
}

fn determiner(base: &str, f: &Features) -> String {
    let plural = f.is_plural();
    match base.to_lowercase().as_str() {
        "a" | "an" if plural => "some".to_string(),
        "this" if plural => "these".to_string(),
        "that" if plural => "those".to_string(),
        _ => base.to_string(),
    }
}
