/// Grammatical feature vocabulary shared by every node in a phrase tree.

use serde::{Deserialize, Serialize};

/// Word class of a lexical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexicalCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Complementiser,
    Modal,
    Other,
}

/// Category tag of a phrase or clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseCategory {
    Clause,
    NounPhrase,
    VerbPhrase,
    AdjectivePhrase,
    AdverbPhrase,
    PrepositionalPhrase,
    CannedText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tense {
    Past,
    Present,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberAgreement {
    Singular,
    Plural,
    /// Invariant for number, e.g. "sheep".
    Both,
}

impl NumberAgreement {
    pub fn is_plural(self) -> bool {
        self == Self::Plural
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

/// Verb form, overriding finite tense marking when not `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    Normal,
    BareInfinitive,
    Infinitive,
    Gerund,
    Imperative,
    PastParticiple,
    PresentParticiple,
}

/// Syntactic role of a constituent within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscourseFunction {
    Subject,
    Object,
    IndirectObject,
    Complement,
    Premodifier,
    Postmodifier,
    FrontModifier,
    Specifier,
    Head,
    CuePhrase,
    VerbPhrase,
    Auxiliary,
    Conjunction,
    ObjectOfPreposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseStatus {
    Matrix,
    Subordinate,
}

/// Inflection pattern hint used by the morphology rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InflectionPattern {
    Regular,
    /// Doubles the final consonant before a vowel-initial suffix ("tug" -> "tugged").
    RegularDouble,
    /// Latin/Greek plural endings ("focus" -> "foci").
    GrecoLatin,
    Uncountable,
    /// Never inflected.
    Invariant,
}

/// Feature set carried by phrases, coordinates and inflected words.
///
/// Every field is optional or defaults to `false`; an unset field means
/// "inherit or use the default", never "explicitly negative".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub tense: Option<Tense>,
    pub number: Option<NumberAgreement>,
    pub person: Option<Person>,
    pub gender: Option<Gender>,
    pub form: Option<Form>,
    pub discourse_function: Option<DiscourseFunction>,
    pub clause_status: Option<ClauseStatus>,
    pub pattern: Option<InflectionPattern>,
    pub modal: Option<String>,
    pub complementiser: Option<String>,
    pub passive: bool,
    pub perfect: bool,
    pub progressive: bool,
    pub negated: bool,
    pub elided: bool,
    pub possessive: bool,
    pub pronominal: bool,
    pub reflexive: bool,
    /// Specifier suppressed because a coordinate already realized it.
    pub raised: bool,
    /// Auxiliaries suppressed because an earlier conjunct realized them.
    pub suppress_auxiliary: bool,
    pub comparative: bool,
    pub superlative: bool,
}

impl Features {
    pub fn is_plural(&self) -> bool {
        self.number.is_some_and(NumberAgreement::is_plural)
    }

    /// Copy the agreement features a head inherits from its phrase.
    pub fn propagate_to_head(&self, head: &mut Features) {
        if let Some(number) = self.number {
            head.number = Some(number);
        }
        if let Some(person) = self.person {
            head.person = Some(person);
        }
        if let Some(gender) = self.gender {
            head.gender = Some(gender);
        }
        if self.possessive {
            head.possessive = true;
        }
        if self.passive {
            head.passive = true;
        }
    }

    /// Copy the features a coordinate shares with each of its conjuncts.
    pub fn propagate_to_conjunct(&self, child: &mut Features) {
        if self.progressive {
            child.progressive = true;
        }
        if self.perfect {
            child.perfect = true;
        }
        if let Some(gender) = self.gender {
            child.gender = Some(gender);
        }
        if let Some(number) = self.number {
            child.number = Some(number);
        }
        if let Some(tense) = self.tense {
            child.tense = Some(tense);
        }
        if let Some(person) = self.person {
            child.person = Some(person);
        }
        if self.negated {
            child.negated = true;
        }
        if let Some(modal) = &self.modal {
            child.modal = Some(modal.clone());
        }
        if let Some(function) = self.discourse_function {
            child.discourse_function = Some(function);
        }
        if let Some(form) = self.form {
            child.form = Some(form);
        }
        if let Some(status) = self.clause_status {
            child.clause_status = Some(status);
        }
    }

    /// Copy the verbal features a clause hands to its verb phrase.
    pub fn propagate_to_verb_phrase(&self, vp: &mut Features) {
        if let Some(tense) = self.tense {
            vp.tense = Some(tense);
        }
        if let Some(form) = self.form {
            vp.form = Some(form);
        }
        if let Some(modal) = &self.modal {
            vp.modal = Some(modal.clone());
        }
        if self.passive {
            vp.passive = true;
        }
        if self.perfect {
            vp.perfect = true;
        }
        if self.progressive {
            vp.progressive = true;
        }
        if self.negated {
            vp.negated = true;
        }
    }
}
