/// Phrase tree nodes: words, inflected words, literals, phrases and coordinates.

use serde::{Deserialize, Serialize};

use super::features::{
    ClauseStatus, DiscourseFunction, Features, Form, Gender, LexicalCategory, NumberAgreement, Person,
    PhraseCategory, Tense,
};
use super::word::{Word, WordClass};

/// A word prepared for morphology: baseform, category and the features
/// that select its surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflectedWord {
    pub base: String,
    pub category: LexicalCategory,
    #[serde(default)]
    pub features: Features,
    /// Owned copy of the lexicon entry, consulted for irregular forms.
    #[serde(default)]
    pub word: Option<Word>,
}

impl InflectedWord {
    pub fn new(base: &str, category: LexicalCategory) -> Self {
        Self {
            base: base.to_string(),
            category,
            features: Features::default(),
            word: None,
        }
    }

    pub fn from_word(word: &Word) -> Self {
        let mut features = Features::default();
        features.pattern = word.pattern;
        features.gender = word.gender;
        features.reflexive = word.class.reflexive;
        Self {
            base: word.base.clone(),
            category: word.category,
            features,
            word: Some(word.clone()),
        }
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn is_a(&self, category: LexicalCategory) -> bool {
        self.category == category
    }

    /// Classification flags of the owned lexicon entry, if any.
    pub fn class(&self) -> Option<&WordClass> {
        self.word.as_ref().map(|w| &w.class)
    }
}

/// Opaque text that bypasses morphology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub text: String,
    #[serde(default)]
    pub features: Features,
}

impl Literal {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            features: Features::default(),
        }
    }
}

/// A phrase or clause with named child slots.
///
/// For a clause, `head` holds the verb phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub category: PhraseCategory,
    #[serde(default)]
    pub head: Option<Box<Node>>,
    #[serde(default)]
    pub specifier: Option<Box<Node>>,
    #[serde(default)]
    pub cue_phrase: Option<Box<Node>>,
    #[serde(default)]
    pub front_modifiers: Vec<Node>,
    #[serde(default)]
    pub premodifiers: Vec<Node>,
    #[serde(default)]
    pub subjects: Vec<Node>,
    #[serde(default)]
    pub complements: Vec<Node>,
    #[serde(default)]
    pub postmodifiers: Vec<Node>,
    #[serde(default)]
    pub features: Features,
}

/// Sibling nodes joined by a conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub coordinates: Vec<Node>,
    pub conjunction: String,
    #[serde(default)]
    pub raise_specifier: bool,
    #[serde(default)]
    pub aggregate_auxiliary: bool,
    #[serde(default)]
    pub specifier: Option<Box<Node>>,
    #[serde(default)]
    pub premodifiers: Vec<Node>,
    #[serde(default)]
    pub postmodifiers: Vec<Node>,
    #[serde(default)]
    pub complements: Vec<Node>,
    #[serde(default)]
    pub features: Features,
}

/// A node of the phrase tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Word(Word),
    Inflected(InflectedWord),
    Literal(Literal),
    Phrase(Phrase),
    Coordinate(Coordinate),
}

/// Lexical identity of a constituent, ignoring inflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lemma<'a> {
    Word {
        base: &'a str,
        category: LexicalCategory,
    },
    Text(&'a str),
}

impl Node {
    pub fn word(base: &str, category: LexicalCategory) -> Node {
        Node::Word(Word::new(base, category))
    }

    pub fn noun(base: &str) -> Node {
        Self::word(base, LexicalCategory::Noun)
    }

    pub fn proper_noun(name: &str) -> Node {
        Node::Word(Word::new(name, LexicalCategory::Noun).with_class(WordClass {
            proper: true,
            ..WordClass::default()
        }))
    }

    pub fn verb(base: &str) -> Node {
        Self::word(base, LexicalCategory::Verb)
    }

    pub fn adjective(base: &str) -> Node {
        Self::word(base, LexicalCategory::Adjective)
    }

    pub fn adverb(base: &str) -> Node {
        Self::word(base, LexicalCategory::Adverb)
    }

    pub fn pronoun(base: &str) -> Node {
        Self::word(base, LexicalCategory::Pronoun)
    }

    pub fn determiner(base: &str) -> Node {
        Self::word(base, LexicalCategory::Determiner)
    }

    pub fn preposition(base: &str) -> Node {
        Self::word(base, LexicalCategory::Preposition)
    }

    pub fn literal(text: &str) -> Node {
        Node::Literal(Literal::new(text))
    }

    pub fn features(&self) -> Option<&Features> {
        match self {
            Node::Word(_) => None,
            Node::Inflected(w) => Some(&w.features),
            Node::Literal(l) => Some(&l.features),
            Node::Phrase(p) => Some(&p.features),
            Node::Coordinate(c) => Some(&c.features),
        }
    }

    /// Mutable features, turning a bare lexicon word into an inflected
    /// word first so it can carry them.
    pub fn features_mut(&mut self) -> &mut Features {
        if let Node::Word(word) = self {
            *self = Node::Inflected(InflectedWord::from_word(word));
        }
        match self {
            Node::Inflected(w) => &mut w.features,
            Node::Literal(l) => &mut l.features,
            Node::Phrase(p) => &mut p.features,
            Node::Coordinate(c) => &mut c.features,
            Node::Word(_) => unreachable!("bare words are converted above"),
        }
    }

    pub fn is_elided(&self) -> bool {
        self.features().is_some_and(|f| f.elided)
    }

    pub fn set_elided(&mut self) {
        self.features_mut().elided = true;
    }

    pub fn discourse_function(&self) -> Option<DiscourseFunction> {
        self.features().and_then(|f| f.discourse_function)
    }

    pub fn set_discourse_function(&mut self, function: DiscourseFunction) {
        self.features_mut().discourse_function = Some(function);
    }

    /// Tag with `function` unless a role was already assigned.
    pub fn default_discourse_function(&mut self, function: DiscourseFunction) {
        if self.discourse_function().is_none() {
            self.set_discourse_function(function);
        }
    }

    pub fn as_phrase(&self) -> Option<&Phrase> {
        match self {
            Node::Phrase(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_phrase_mut(&mut self) -> Option<&mut Phrase> {
        match self {
            Node::Phrase(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_phrase(&self, category: PhraseCategory) -> bool {
        self.as_phrase().is_some_and(|p| p.category == category)
    }

    /// Lexical category of the word this node is or is headed by.
    pub fn lexical_category(&self) -> Option<LexicalCategory> {
        match self {
            Node::Word(w) => Some(w.category),
            Node::Inflected(w) => Some(w.category),
            Node::Phrase(p) => p.head.as_deref().and_then(Node::lexical_category),
            Node::Literal(_) | Node::Coordinate(_) => None,
        }
    }

    /// Lexicon entry this node is or is headed by.
    pub fn lexical_entry(&self) -> Option<&Word> {
        match self {
            Node::Word(w) => Some(w),
            Node::Inflected(w) => w.word.as_ref(),
            Node::Phrase(p) => p.head.as_deref().and_then(Node::lexical_entry),
            Node::Literal(_) | Node::Coordinate(_) => None,
        }
    }

    /// Lexical head of this node, ignoring inflection and modifiers.
    pub fn lemma(&self) -> Option<Lemma<'_>> {
        match self {
            Node::Word(w) => Some(Lemma::Word {
                base: &w.base,
                category: w.category,
            }),
            Node::Inflected(w) => Some(Lemma::Word {
                base: &w.base,
                category: w.category,
            }),
            Node::Literal(l) => Some(Lemma::Text(&l.text)),
            Node::Phrase(p) => p.head.as_deref().and_then(Node::lemma),
            Node::Coordinate(_) => None,
        }
    }

    /// Deep copy with every elision mark cleared.
    pub fn without_elision(&self) -> Node {
        let mut node = self.clone();
        node.clear_elision();
        node
    }

    fn clear_elision(&mut self) {
        match self {
            Node::Word(_) => {}
            Node::Inflected(w) => w.features.elided = false,
            Node::Literal(l) => l.features.elided = false,
            Node::Phrase(p) => {
                p.features.elided = false;
                for child in p.children_mut() {
                    child.clear_elision();
                }
            }
            Node::Coordinate(c) => {
                c.features.elided = false;
                for child in c.children_mut() {
                    child.clear_elision();
                }
            }
        }
    }
}

impl From<Word> for Node {
    fn from(word: Word) -> Self {
        Node::Word(word)
    }
}

impl From<InflectedWord> for Node {
    fn from(word: InflectedWord) -> Self {
        Node::Inflected(word)
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Literal(literal)
    }
}

impl From<Phrase> for Node {
    fn from(phrase: Phrase) -> Self {
        Node::Phrase(phrase)
    }
}

impl From<Coordinate> for Node {
    fn from(coordinate: Coordinate) -> Self {
        Node::Coordinate(coordinate)
    }
}

impl Phrase {
    pub fn new(category: PhraseCategory) -> Self {
        Self {
            category,
            head: None,
            specifier: None,
            cue_phrase: None,
            front_modifiers: Vec::new(),
            premodifiers: Vec::new(),
            subjects: Vec::new(),
            complements: Vec::new(),
            postmodifiers: Vec::new(),
            features: Features::default(),
        }
    }

    /// Noun phrase with an optional determiner, e.g. `("the", "dog")`.
    pub fn noun_phrase(determiner: Option<&str>, noun: &str) -> Self {
        let phrase = Self::new(PhraseCategory::NounPhrase).with_head(Node::noun(noun));
        match determiner {
            Some(det) => phrase.with_specifier(Node::determiner(det)),
            None => phrase,
        }
    }

    /// Noun phrase headed by a proper noun, e.g. "John".
    pub fn proper_noun_phrase(name: &str) -> Self {
        Self::new(PhraseCategory::NounPhrase).with_head(Node::proper_noun(name))
    }

    /// Noun phrase realized as a personal pronoun.
    pub fn pronominal(person: Person, number: NumberAgreement) -> Self {
        let mut phrase = Self::new(PhraseCategory::NounPhrase);
        phrase.features.pronominal = true;
        phrase.features.person = Some(person);
        phrase.features.number = Some(number);
        phrase
    }

    pub fn verb_phrase(verb: &str) -> Self {
        Self::new(PhraseCategory::VerbPhrase).with_head(Node::verb(verb))
    }

    pub fn adjective_phrase(adjective: &str) -> Self {
        Self::new(PhraseCategory::AdjectivePhrase).with_head(Node::adjective(adjective))
    }

    pub fn adverb_phrase(adverb: &str) -> Self {
        Self::new(PhraseCategory::AdverbPhrase).with_head(Node::adverb(adverb))
    }

    pub fn prepositional_phrase(preposition: &str, object: impl Into<Node>) -> Self {
        Self::new(PhraseCategory::PrepositionalPhrase)
            .with_head(Node::preposition(preposition))
            .with_complement(object)
    }

    /// Canned text, emitted verbatim.
    pub fn canned(text: &str) -> Self {
        Self::new(PhraseCategory::CannedText).with_head(Node::literal(text))
    }

    pub fn clause() -> Self {
        Self::new(PhraseCategory::Clause)
    }

    /// Subject-verb-object clause in the present tense.
    pub fn svo(subject: impl Into<Node>, verb: &str, object: Option<Node>) -> Self {
        let mut vp = Self::verb_phrase(verb);
        if let Some(object) = object {
            vp = vp.with_complement(object);
        }
        Self::clause().with_subject(subject).with_verb_phrase(vp)
    }

    pub fn with_head(mut self, head: impl Into<Node>) -> Self {
        let mut head = head.into();
        if self.category != PhraseCategory::Clause && head.features().is_some() {
            head.default_discourse_function(DiscourseFunction::Head);
        }
        self.head = Some(Box::new(head));
        self
    }

    /// Set the verb phrase of a clause.
    pub fn with_verb_phrase(mut self, vp: impl Into<Node>) -> Self {
        let mut vp = vp.into();
        vp.set_discourse_function(DiscourseFunction::VerbPhrase);
        self.head = Some(Box::new(vp));
        self
    }

    pub fn with_specifier(mut self, specifier: impl Into<Node>) -> Self {
        self.specifier = Some(Box::new(specifier.into()));
        self
    }

    pub fn with_cue_phrase(mut self, cue: impl Into<Node>) -> Self {
        let mut cue = cue.into();
        cue.set_discourse_function(DiscourseFunction::CuePhrase);
        self.cue_phrase = Some(Box::new(cue));
        self
    }

    pub fn with_front_modifier(mut self, modifier: impl Into<Node>) -> Self {
        let mut modifier = modifier.into();
        modifier.set_discourse_function(DiscourseFunction::FrontModifier);
        self.front_modifiers.push(modifier);
        self
    }

    pub fn with_premodifier(mut self, modifier: impl Into<Node>) -> Self {
        let mut modifier = modifier.into();
        modifier.default_discourse_function(DiscourseFunction::Premodifier);
        self.premodifiers.push(modifier);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<Node>) -> Self {
        let mut subject = subject.into();
        subject.set_discourse_function(DiscourseFunction::Subject);
        self.subjects.push(subject);
        self
    }

    /// Add a complement. On a clause with a verb phrase the complement is
    /// handed to the verb phrase; nominal complements of verbs default to
    /// the object role.
    pub fn with_complement(mut self, complement: impl Into<Node>) -> Self {
        let mut complement = complement.into();
        if self.category == PhraseCategory::Clause {
            if let Some(vp) = self.vp_mut() {
                let taken = std::mem::replace(vp, Phrase::new(PhraseCategory::VerbPhrase));
                *vp = taken.with_complement(complement);
                return self;
            }
        }
        let nominal = complement.is_phrase(PhraseCategory::NounPhrase)
            || matches!(complement, Node::Coordinate(_))
            || (!matches!(complement, Node::Phrase(_))
                && matches!(
                    complement.lexical_category(),
                    Some(LexicalCategory::Noun | LexicalCategory::Pronoun)
                ));
        let function = match self.category {
            PhraseCategory::VerbPhrase if nominal => DiscourseFunction::Object,
            PhraseCategory::PrepositionalPhrase => DiscourseFunction::ObjectOfPreposition,
            _ => DiscourseFunction::Complement,
        };
        complement.default_discourse_function(function);
        self.complements.push(complement);
        self
    }

    pub fn with_indirect_object(mut self, object: impl Into<Node>) -> Self {
        let mut object = object.into();
        object.set_discourse_function(DiscourseFunction::IndirectObject);
        if let Some(vp) = self.vp_mut() {
            vp.complements.insert(0, object);
        } else {
            self.complements.insert(0, object);
        }
        self
    }

    pub fn with_postmodifier(mut self, modifier: impl Into<Node>) -> Self {
        let mut modifier = modifier.into();
        modifier.default_discourse_function(DiscourseFunction::Postmodifier);
        self.postmodifiers.push(modifier);
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_tense(mut self, tense: Tense) -> Self {
        self.features.tense = Some(tense);
        self
    }

    pub fn with_number(mut self, number: NumberAgreement) -> Self {
        self.features.number = Some(number);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.features.gender = Some(gender);
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.features.form = Some(form);
        self
    }

    pub fn with_modal(mut self, modal: &str) -> Self {
        self.features.modal = Some(modal.to_string());
        self
    }

    pub fn negated(mut self) -> Self {
        self.features.negated = true;
        self
    }

    pub fn passive(mut self) -> Self {
        self.features.passive = true;
        self
    }

    pub fn perfect(mut self) -> Self {
        self.features.perfect = true;
        self
    }

    pub fn progressive(mut self) -> Self {
        self.features.progressive = true;
        self
    }

    pub fn possessive(mut self) -> Self {
        self.features.possessive = true;
        self
    }

    /// Mark a clause as subordinate, introduced by `complementiser`.
    pub fn subordinate(mut self, complementiser: &str) -> Self {
        self.features.clause_status = Some(ClauseStatus::Subordinate);
        self.features.complementiser = Some(complementiser.to_string());
        self
    }

    pub fn is_a(&self, category: PhraseCategory) -> bool {
        self.category == category
    }

    /// Verb phrase of a clause.
    pub fn vp(&self) -> Option<&Phrase> {
        if self.category != PhraseCategory::Clause {
            return None;
        }
        self.head
            .as_deref()
            .and_then(Node::as_phrase)
            .filter(|p| p.category == PhraseCategory::VerbPhrase)
    }

    pub fn vp_mut(&mut self) -> Option<&mut Phrase> {
        if self.category != PhraseCategory::Clause {
            return None;
        }
        self.head
            .as_deref_mut()
            .and_then(Node::as_phrase_mut)
            .filter(|p| p.category == PhraseCategory::VerbPhrase)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.specifier
            .as_deref()
            .into_iter()
            .chain(self.cue_phrase.as_deref())
            .chain(self.front_modifiers.iter())
            .chain(self.premodifiers.iter())
            .chain(self.subjects.iter())
            .chain(self.head.as_deref())
            .chain(self.complements.iter())
            .chain(self.postmodifiers.iter())
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.specifier
            .as_deref_mut()
            .into_iter()
            .chain(self.cue_phrase.as_deref_mut())
            .chain(self.front_modifiers.iter_mut())
            .chain(self.premodifiers.iter_mut())
            .chain(self.subjects.iter_mut())
            .chain(self.head.as_deref_mut())
            .chain(self.complements.iter_mut())
            .chain(self.postmodifiers.iter_mut())
    }
}

impl Coordinate {
    pub fn new(conjunction: &str) -> Self {
        Self {
            coordinates: Vec::new(),
            conjunction: conjunction.to_string(),
            raise_specifier: false,
            aggregate_auxiliary: false,
            specifier: None,
            premodifiers: Vec::new(),
            postmodifiers: Vec::new(),
            complements: Vec::new(),
            features: Features::default(),
        }
    }

    /// "and"-coordination of `coordinates`.
    pub fn of(coordinates: Vec<Node>) -> Self {
        let mut coord = Self::new("and");
        coord.coordinates = coordinates;
        coord
    }

    pub fn with_coordinate(mut self, node: impl Into<Node>) -> Self {
        self.coordinates.push(node.into());
        self
    }

    pub fn with_raise_specifier(mut self, raise: bool) -> Self {
        self.raise_specifier = raise;
        self
    }

    pub fn with_aggregate_auxiliary(mut self, aggregate: bool) -> Self {
        self.aggregate_auxiliary = aggregate;
        self
    }

    pub fn with_specifier(mut self, specifier: impl Into<Node>) -> Self {
        self.specifier = Some(Box::new(specifier.into()));
        self
    }

    pub fn with_premodifier(mut self, modifier: impl Into<Node>) -> Self {
        self.premodifiers.push(modifier.into());
        self
    }

    pub fn with_postmodifier(mut self, modifier: impl Into<Node>) -> Self {
        self.postmodifiers.push(modifier.into());
        self
    }

    pub fn with_complement(mut self, complement: impl Into<Node>) -> Self {
        self.complements.push(complement.into());
        self
    }

    /// True when the conjunction takes the number of its last coordinate
    /// rather than forcing a plural ("John or Mary is").
    pub fn is_disjunctive(&self) -> bool {
        matches!(self.conjunction.as_str(), "or" | "nor" | "either or" | "neither nor")
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.specifier
            .as_deref()
            .into_iter()
            .chain(self.premodifiers.iter())
            .chain(self.coordinates.iter())
            .chain(self.postmodifiers.iter())
            .chain(self.complements.iter())
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.specifier
            .as_deref_mut()
            .into_iter()
            .chain(self.premodifiers.iter_mut())
            .chain(self.coordinates.iter_mut())
            .chain(self.postmodifiers.iter_mut())
            .chain(self.complements.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svo_clause_puts_object_on_the_verb_phrase() {
        let clause = Phrase::svo(
            Phrase::proper_noun_phrase("John"),
            "eat",
            Some(Phrase::noun_phrase(Some("a"), "apple").into()),
        );
        assert_eq!(clause.subjects.len(), 1);
        assert_eq!(
            clause.subjects[0].discourse_function(),
            Some(DiscourseFunction::Subject)
        );
        let vp = clause.vp().unwrap();
        assert_eq!(vp.complements.len(), 1);
        assert_eq!(
            vp.complements[0].discourse_function(),
            Some(DiscourseFunction::Object)
        );
    }

    #[test]
    fn clause_complement_forwards_to_verb_phrase() {
        let clause = Phrase::clause()
            .with_verb_phrase(Phrase::verb_phrase("be"))
            .with_complement(Node::adjective("happy"));
        assert!(clause.complements.is_empty());
        let vp = clause.vp().unwrap();
        assert_eq!(
            vp.complements[0].discourse_function(),
            Some(DiscourseFunction::Complement)
        );
    }

    #[test]
    fn features_mut_promotes_bare_words() {
        let mut node = Node::noun("dog");
        assert!(node.features().is_none());
        node.set_elided();
        assert!(node.is_elided());
        assert!(matches!(node, Node::Inflected(ref w) if w.base == "dog"));
    }

    #[test]
    fn lemma_ignores_inflection_and_modifiers() {
        let a: Node = Phrase::noun_phrase(Some("the"), "dog").into();
        let mut b: Node = Phrase::noun_phrase(Some("a"), "dog")
            .with_number(NumberAgreement::Plural)
            .into();
        b.set_elided();
        assert_eq!(a.lemma(), b.lemma());
        assert_ne!(a, b);
    }

    #[test]
    fn without_elision_clears_nested_marks() {
        let mut subject: Node = Phrase::proper_noun_phrase("John").into();
        subject.set_elided();
        let clause: Node = Phrase::svo(subject, "run", None).into();
        let cleared = clause.without_elision();
        let phrase = cleared.as_phrase().unwrap();
        assert!(!phrase.subjects[0].is_elided());
        assert_ne!(cleared, clause);
    }

    #[test]
    fn disjunctive_conjunctions() {
        assert!(Coordinate::new("or").is_disjunctive());
        assert!(!Coordinate::new("and").is_disjunctive());
    }

    #[test]
    fn tree_round_trips_through_ron() {
        let clause: Node = Phrase::svo(
            Phrase::proper_noun_phrase("Mary"),
            "see",
            Some(Phrase::noun_phrase(Some("the"), "cat").into()),
        )
        .with_tense(Tense::Past)
        .into();
        let serialized = ron::to_string(&clause).unwrap();
        let back: Node = ron::from_str(&serialized).unwrap();
        assert_eq!(back, clause);
    }
}
