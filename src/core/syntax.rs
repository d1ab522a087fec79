/// Linearization: walks a phrase tree and emits its leaves in surface
/// order, pushing agreement features down to the words that show them.

use std::mem::take;
use tracing::trace;

use crate::core::pronoun::{self, PronounPosition};
use crate::schema::features::{
    ClauseStatus, DiscourseFunction, Features, Form, Gender, LexicalCategory, NumberAgreement,
    Person, PhraseCategory, Tense,
};
use crate::schema::lexicon::Lexicon;
use crate::schema::node::{Coordinate, InflectedWord, Lemma, Literal, Node, Phrase};
use crate::schema::word::{Word, WordClass};

/// One linearized token, ready for morphology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Word(InflectedWord),
    Literal(Literal),
}

impl Leaf {
    pub fn word(base: &str, category: LexicalCategory) -> Leaf {
        Leaf::Word(InflectedWord::new(base, category))
    }

    pub fn literal(text: &str) -> Leaf {
        Leaf::Literal(Literal::new(text))
    }

    /// Base text before inflection.
    pub fn text(&self) -> &str {
        match self {
            Leaf::Word(w) => &w.base,
            Leaf::Literal(l) => &l.text,
        }
    }
}

/// Auxiliary slot in a verb group, naming the form it imposes on the
/// next verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Modal,
    Perfect,
    Progressive,
    Passive,
    Main,
}

impl Link {
    fn next_form(self) -> Form {
        match self {
            Link::Modal => Form::BareInfinitive,
            Link::Perfect | Link::Passive => Form::PastParticiple,
            Link::Progressive => Form::PresentParticiple,
            Link::Main => Form::Normal,
        }
    }
}

/// Tree walker producing ordered leaves. Holds no state between calls.
pub struct SyntaxEngine<'a> {
    lexicon: &'a dyn Lexicon,
    conjunction: String,
    list_commas: bool,
}

impl<'a> SyntaxEngine<'a> {
    pub fn new(lexicon: &'a dyn Lexicon) -> Self {
        Self {
            lexicon,
            conjunction: "and".to_string(),
            list_commas: true,
        }
    }

    /// Conjunction joining several subjects or agents of one clause.
    pub fn with_conjunction(mut self, conjunction: &str) -> Self {
        self.conjunction = conjunction.to_string();
        self
    }

    /// Separate non-final coordinates of three or more with commas.
    pub fn with_list_commas(mut self, list_commas: bool) -> Self {
        self.list_commas = list_commas;
        self
    }

    /// Linearize `node`. The caller's tree is left untouched; feature
    /// propagation happens on a working copy.
    pub fn realize(&self, node: &Node) -> Vec<Leaf> {
        let mut out = Vec::new();
        self.node(node.clone(), &mut out);
        trace!(leaves = out.len(), "linearized");
        out
    }

    fn nodes(&self, nodes: Vec<Node>, out: &mut Vec<Leaf>) {
        for node in nodes {
            self.node(node, out);
        }
    }

    fn node(&self, node: Node, out: &mut Vec<Leaf>) {
        if node.is_elided() {
            return;
        }
        match node {
            Node::Word(word) => out.push(Leaf::Word(self.enrich(InflectedWord::from_word(&word)))),
            Node::Inflected(word) => out.push(Leaf::Word(self.enrich(word))),
            Node::Literal(literal) => {
                if !literal.text.is_empty() {
                    out.push(Leaf::Literal(literal));
                }
            }
            Node::Phrase(phrase) => self.phrase(phrase, out),
            Node::Coordinate(coord) => self.coordinate(coord, out),
        }
    }

    /// Attach the lexicon entry for the word, keeping values set locally.
    fn enrich(&self, mut word: InflectedWord) -> InflectedWord {
        if let Some(entry) = self.lexicon.lookup(&word.base, word.category) {
            match word.word.as_mut() {
                Some(own) => own.fill_from(&entry),
                None => word.word = Some(entry),
            }
        }
        if let Some(own) = &word.word {
            if word.features.pattern.is_none() {
                word.features.pattern = own.pattern;
            }
            if word.features.gender.is_none() {
                word.features.gender = own.gender;
            }
            if own.class.reflexive {
                word.features.reflexive = true;
            }
        }
        word
    }

    fn word_class(&self, node: &Node) -> WordClass {
        let Some(Lemma::Word { base, category }) = node.lemma() else {
            return WordClass::default();
        };
        let mut word = match node.lexical_entry() {
            Some(entry) => entry.clone(),
            None => Word::new(base, category),
        };
        if let Some(entry) = self.lexicon.lookup(base, category) {
            word.fill_from(&entry);
        }
        word.class
    }

    fn phrase(&self, phrase: Phrase, out: &mut Vec<Leaf>) {
        match phrase.category {
            PhraseCategory::Clause => self.clause(phrase, out),
            PhraseCategory::NounPhrase => self.noun_phrase(phrase, out),
            PhraseCategory::VerbPhrase => self.verb_phrase(phrase, out),
            PhraseCategory::CannedText => {
                if let Some(head) = phrase.head {
                    self.node(*head, out);
                }
            }
            PhraseCategory::AdjectivePhrase
            | PhraseCategory::AdverbPhrase
            | PhraseCategory::PrepositionalPhrase => self.modified_phrase(phrase, out),
        }
    }

    fn head(&self, mut head: Node, features: &Features, out: &mut Vec<Leaf>) {
        let head_features = head.features_mut();
        features.propagate_to_head(head_features);
        if features.comparative {
            head_features.comparative = true;
        }
        if features.superlative {
            head_features.superlative = true;
        }
        self.node(head, out);
    }

    fn modified_phrase(&self, mut phrase: Phrase, out: &mut Vec<Leaf>) {
        self.nodes(take(&mut phrase.premodifiers), out);
        if let Some(head) = phrase.head.take() {
            self.head(*head, &phrase.features, out);
        }
        self.nodes(take(&mut phrase.complements), out);
        self.nodes(take(&mut phrase.postmodifiers), out);
    }

    fn noun_phrase(&self, mut phrase: Phrase, out: &mut Vec<Leaf>) {
        let mut features = phrase.features.clone();
        if features.number.is_none() {
            features.number = phrase
                .head
                .as_deref()
                .and_then(Node::features)
                .and_then(|f| f.number);
        }

        if features.pronominal {
            out.push(Leaf::Word(self.pronoun_for(&phrase, &features)));
            return;
        }

        if let Some(spec) = phrase.specifier.take() {
            if !features.raised {
                self.specifier(*spec, &features, out);
            }
        }

        let mut premodifiers = take(&mut phrase.premodifiers);
        self.sort_premodifiers(&mut premodifiers);
        self.nodes(premodifiers, out);

        if let Some(head) = phrase.head.take() {
            self.head(*head, &features, out);
        }
        self.nodes(take(&mut phrase.complements), out);
        self.nodes(take(&mut phrase.postmodifiers), out);
    }

    fn pronoun_for(&self, phrase: &Phrase, features: &Features) -> InflectedWord {
        let person = features.person.unwrap_or(Person::Third);
        let number = features.number.unwrap_or(NumberAgreement::Singular);
        let gender = features
            .gender
            .or_else(|| {
                phrase
                    .head
                    .as_deref()
                    .and_then(Node::lexical_entry)
                    .and_then(|w| w.gender)
            })
            .unwrap_or(Gender::Neuter);
        let base = pronoun::pronoun(number, PronounPosition::Subjective, person, gender);
        InflectedWord::new(base, LexicalCategory::Pronoun).with_features(Features {
            number: Some(number),
            person: Some(person),
            gender: Some(gender),
            discourse_function: features.discourse_function,
            possessive: features.possessive,
            passive: features.passive,
            reflexive: features.reflexive,
            ..Features::default()
        })
    }

    fn specifier(&self, mut spec: Node, np: &Features, out: &mut Vec<Leaf>) {
        let nominal = spec.is_phrase(PhraseCategory::NounPhrase);
        let is_pronoun = !nominal && spec.lexical_category() == Some(LexicalCategory::Pronoun);
        let f = spec.features_mut();
        if nominal || is_pronoun {
            f.possessive = true;
        } else if let Some(number) = np.number {
            f.number = Some(number);
        }
        f.discourse_function = Some(DiscourseFunction::Specifier);
        self.node(spec, out);
    }

    /// Ordinal (min, max) bounds: qualitative 1, colour 2, classifying 3,
    /// noun 4.
    fn premodifier_bounds(&self, node: &Node) -> (u8, u8) {
        match node.lexical_category() {
            Some(LexicalCategory::Noun) => (4, 4),
            Some(LexicalCategory::Adjective) => {
                let class = self.word_class(node);
                if class.classifying {
                    (3, 3)
                } else if class.colour {
                    (2, 2)
                } else if class.qualitative {
                    (1, 1)
                } else {
                    (1, 3)
                }
            }
            _ => (1, 4),
        }
    }

    /// Adjacent-swap sort to a fixpoint. Each swap removes one inversion,
    /// so the loop terminates.
    fn sort_premodifiers(&self, mods: &mut [Node]) {
        let mut bounds: Vec<(u8, u8)> = mods.iter().map(|m| self.premodifier_bounds(m)).collect();
        let mut swapped = true;
        while swapped {
            swapped = false;
            for i in 1..mods.len() {
                if bounds[i - 1].0 > bounds[i].1 {
                    mods.swap(i - 1, i);
                    bounds.swap(i - 1, i);
                    swapped = true;
                }
            }
        }
    }

    fn verb_phrase(&self, mut phrase: Phrase, out: &mut Vec<Leaf>) {
        let features = phrase.features.clone();
        self.nodes(take(&mut phrase.premodifiers), out);
        if let Some(head) = phrase.head.take() {
            self.verb_group(*head, &features, out);
        }
        let mut complements = take(&mut phrase.complements);
        complements.sort_by_key(complement_rank);
        self.nodes(complements, out);
        self.nodes(take(&mut phrase.postmodifiers), out);
    }

    fn auxiliary(&self, base: &str, category: LexicalCategory) -> InflectedWord {
        let mut word = InflectedWord::new(base, category);
        word.features.discourse_function = Some(DiscourseFunction::Auxiliary);
        self.enrich(word)
    }

    /// Expand the head verb into modal, perfect, progressive and passive
    /// auxiliaries, with negation and do-support.
    fn verb_group(&self, head: Node, f: &Features, out: &mut Vec<Leaf>) {
        if head.is_elided() {
            return;
        }
        let main = match head {
            Node::Word(word) => InflectedWord::from_word(&word),
            Node::Inflected(word) => word,
            mut other => {
                agree_verb(&mut other, f);
                self.node(other, out);
                return;
            }
        };
        let main = self.enrich(main);

        let form = f.form.unwrap_or(Form::Normal);
        let finite = form == Form::Normal;
        let imperative = form == Form::Imperative;
        let modal = if finite {
            f.modal
                .clone()
                .or_else(|| (f.tense == Some(Tense::Future)).then(|| "will".to_string()))
        } else {
            None
        };
        let copula = main.base.eq_ignore_ascii_case("be");

        let mut chain: Vec<(InflectedWord, Link)> = Vec::new();
        if let Some(modal) = &modal {
            chain.push((self.auxiliary(modal, LexicalCategory::Modal), Link::Modal));
        }
        if f.perfect || (modal.is_some() && f.tense == Some(Tense::Past)) {
            chain.push((self.auxiliary("have", LexicalCategory::Verb), Link::Perfect));
        }
        if f.progressive {
            chain.push((self.auxiliary("be", LexicalCategory::Verb), Link::Progressive));
        }
        if f.passive {
            chain.push((self.auxiliary("be", LexicalCategory::Verb), Link::Passive));
        }
        chain.push((main, Link::Main));

        let do_support = f.negated && ((finite && chain.len() == 1 && !copula) || imperative);
        if do_support {
            // "do" imposes the bare form on its verb, like a modal.
            chain.insert(0, (self.auxiliary("do", LexicalCategory::Verb), Link::Modal));
        }

        let mut previous: Option<Link> = None;
        for (word, link) in chain.iter_mut() {
            let wf = &mut word.features;
            match previous {
                None => {
                    wf.form = Some(form);
                    if finite {
                        wf.tense = f.tense;
                        wf.number = f.number;
                        wf.person = f.person;
                    }
                }
                Some(before) => wf.form = Some(before.next_form()),
            }
            previous = Some(*link);
        }

        if f.suppress_auxiliary && chain.len() > 1 {
            // An earlier conjunct already realized the auxiliaries.
            if let Some((main, _)) = chain.pop() {
                out.push(Leaf::Word(main));
            }
            return;
        }

        let negation = || Leaf::word("not", LexicalCategory::Adverb);
        let negate_first = f.negated && (finite || imperative);
        if f.negated && !negate_first {
            out.push(negation());
        }
        if form == Form::Infinitive {
            out.push(Leaf::word("to", LexicalCategory::Other));
        }
        for (i, (word, _)) in chain.into_iter().enumerate() {
            out.push(Leaf::Word(word));
            if i == 0 && negate_first {
                out.push(negation());
            }
        }
    }

    fn clause(&self, mut clause: Phrase, out: &mut Vec<Leaf>) {
        let f = clause.features.clone();
        let mut head = clause.head.take().map(|h| match *h {
            verb @ (Node::Word(_) | Node::Inflected(_)) => {
                Node::Phrase(Phrase::new(PhraseCategory::VerbPhrase).with_head(verb))
            }
            other => other,
        });
        let head_features = head.as_ref().and_then(Node::features).cloned().unwrap_or_default();
        let passive = f.passive || head_features.passive;
        let imperative = f.form.or(head_features.form) == Some(Form::Imperative);

        let mut subjects = take(&mut clause.subjects);
        if passive {
            match head.as_mut() {
                Some(Node::Phrase(vp)) if vp.category == PhraseCategory::VerbPhrase => {
                    self.raise_passive(vp, &mut subjects);
                }
                Some(Node::Coordinate(coord)) => self.raise_passive_coordinate(coord, &mut subjects),
                _ => {}
            }
        }

        let (number, person) = self.clause_agreement(&subjects, head.as_ref());
        let mut verb_features = f.clone();
        verb_features.number = number.or(f.number);
        verb_features.person = person.or(f.person);

        if f.clause_status == Some(ClauseStatus::Subordinate) {
            if let Some(complementiser) = &f.complementiser {
                out.push(Leaf::word(complementiser, LexicalCategory::Complementiser));
            }
        }
        if let Some(cue) = clause.cue_phrase.take() {
            self.node(*cue, out);
        }
        self.nodes(take(&mut clause.front_modifiers), out);
        self.nodes(take(&mut clause.premodifiers), out);

        if !imperative {
            match subjects.len() {
                0 => {}
                1 => self.nodes(subjects, out),
                _ => {
                    let mut joint = Coordinate::new(&self.conjunction);
                    joint.features.discourse_function = subjects[0].discourse_function();
                    joint.coordinates = subjects;
                    self.coordinate(joint, out);
                }
            }
        }

        if let Some(mut head) = head {
            agree_verb(&mut head, &verb_features);
            self.node(head, out);
        }
        self.nodes(take(&mut clause.complements), out);
        self.nodes(take(&mut clause.postmodifiers), out);
    }

    /// Move the verb's objects into subject position and the subjects into
    /// a "by" phrase.
    fn raise_passive(&self, vp: &mut Phrase, subjects: &mut Vec<Node>) {
        let raised = take_objects(vp);
        if let Some(by) = self.demote_agents(subjects, raised) {
            vp.postmodifiers.insert(0, by);
        }
    }

    /// Passive raising over coordinated verb phrases. Objects shared by
    /// every conjunct are raised once; differing ones are raised as one
    /// coordinate. The "by" phrase follows the last conjunct.
    fn raise_passive_coordinate(&self, coord: &mut Coordinate, subjects: &mut Vec<Node>) {
        let mut groups: Vec<Vec<Node>> = Vec::new();
        for conjunct in coord.coordinates.iter_mut() {
            let Some(vp) = conjunct
                .as_phrase_mut()
                .filter(|p| p.category == PhraseCategory::VerbPhrase)
            else {
                continue;
            };
            let objects = take_objects(vp);
            if !objects.is_empty() && !groups.contains(&objects) {
                groups.push(objects);
            }
        }
        let raised = match groups.len() {
            0 => Vec::new(),
            1 => groups.remove(0),
            _ => {
                let mut joint = Coordinate::new(&self.conjunction);
                joint.features.discourse_function = Some(DiscourseFunction::Object);
                joint.coordinates = groups
                    .into_iter()
                    .map(|mut group| {
                        if group.len() == 1 {
                            group.remove(0)
                        } else {
                            let mut inner = Coordinate::new("");
                            inner.coordinates = group;
                            Node::Coordinate(inner)
                        }
                    })
                    .collect();
                vec![Node::Coordinate(joint)]
            }
        };
        if let Some(by) = self.demote_agents(subjects, raised) {
            coord.postmodifiers.insert(0, by);
        }
    }

    /// Put `raised` in subject position and return the former subjects as
    /// a "by" phrase, if there were any.
    fn demote_agents(&self, subjects: &mut Vec<Node>, raised: Vec<Node>) -> Option<Node> {
        let mut agents = std::mem::replace(subjects, raised);
        for subject in subjects.iter_mut() {
            subject.features_mut().passive = true;
        }
        if agents.is_empty() {
            return None;
        }
        for agent in agents.iter_mut() {
            agent.features_mut().passive = true;
        }
        let agent = if agents.len() == 1 {
            agents.remove(0)
        } else {
            let mut joint = Coordinate::new(&self.conjunction);
            joint.features.discourse_function = Some(DiscourseFunction::Subject);
            joint.coordinates = agents;
            Node::Coordinate(joint)
        };
        Some(Phrase::prepositional_phrase("by", agent).into())
    }

    fn clause_agreement(
        &self,
        subjects: &[Node],
        head: Option<&Node>,
    ) -> (Option<NumberAgreement>, Option<Person>) {
        match subjects {
            [] => (None, None),
            [only] if self.is_expletive(only) => {
                let number = head
                    .and_then(Node::as_phrase)
                    .and_then(|vp| vp.complements.first())
                    .and_then(|c| self.agreement(c).0);
                (number, Some(Person::Third))
            }
            [only] => self.agreement(only),
            several => (Some(NumberAgreement::Plural), Some(self.joint_person(several))),
        }
    }

    fn is_expletive(&self, node: &Node) -> bool {
        matches!(node.lemma(), Some(Lemma::Word { base, .. }) if base.eq_ignore_ascii_case("there"))
            || self.word_class(node).expletive_subject
    }

    fn joint_person(&self, nodes: &[Node]) -> Person {
        let persons: Vec<Option<Person>> = nodes.iter().map(|n| self.agreement(n).1).collect();
        if persons.contains(&Some(Person::First)) {
            Person::First
        } else if persons.contains(&Some(Person::Second)) {
            Person::Second
        } else {
            Person::Third
        }
    }

    /// Number and person a constituent imposes on its verb.
    fn agreement(&self, node: &Node) -> (Option<NumberAgreement>, Option<Person>) {
        match node {
            Node::Coordinate(c) => {
                if c.is_disjunctive() {
                    c.coordinates
                        .last()
                        .map_or((None, None), |last| self.agreement(last))
                } else if c.coordinates.len() > 1 {
                    (
                        Some(NumberAgreement::Plural),
                        Some(self.joint_person(&c.coordinates)),
                    )
                } else {
                    c.coordinates
                        .first()
                        .map_or((None, None), |only| self.agreement(only))
                }
            }
            Node::Phrase(p) if p.features.pronominal => (
                Some(p.features.number.unwrap_or(NumberAgreement::Singular)),
                Some(p.features.person.unwrap_or(Person::Third)),
            ),
            Node::Phrase(p) => {
                let (number, person) = p
                    .head
                    .as_deref()
                    .map_or((None, None), |h| self.agreement(h));
                (p.features.number.or(number), p.features.person.or(person))
            }
            Node::Word(w) if w.category == LexicalCategory::Pronoun => pronoun::identify(&w.base)
                .map_or((None, None), |id| (Some(id.number), Some(id.person))),
            Node::Inflected(w) => {
                let identity = if w.category == LexicalCategory::Pronoun {
                    pronoun::identify(&w.base)
                } else {
                    None
                };
                (
                    w.features.number.or(identity.map(|id| id.number)),
                    w.features.person.or(identity.map(|id| id.person)),
                )
            }
            _ => (None, None),
        }
    }

    fn coordinate(&self, mut coord: Coordinate, out: &mut Vec<Leaf>) {
        if let Some(spec) = coord.specifier.take() {
            for child in coord.coordinates.iter_mut() {
                if let Some(np) = child.as_phrase_mut() {
                    if np.category == PhraseCategory::NounPhrase && np.specifier.is_none() {
                        np.specifier = Some(spec.clone());
                    }
                }
            }
        }

        if coord.raise_specifier && coord.coordinates.len() > 1 {
            let first = specifier_lemma(&coord.coordinates[0]);
            let shared = first.is_some()
                && coord
                    .coordinates
                    .iter()
                    .all(|c| specifier_lemma(c) == first);
            if shared {
                for child in coord.coordinates.iter_mut().skip(1) {
                    child.features_mut().raised = true;
                }
            }
        }

        for child in coord.coordinates.iter_mut() {
            coord.features.propagate_to_conjunct(child.features_mut());
        }
        if coord.aggregate_auxiliary {
            for child in coord.coordinates.iter_mut().skip(1) {
                child.features_mut().suppress_auxiliary = true;
            }
        }

        self.nodes(take(&mut coord.premodifiers), out);

        let live: Vec<Node> = take(&mut coord.coordinates)
            .into_iter()
            .filter(|c| !c.is_elided())
            .collect();
        let count = live.len();
        let separated = !coord.conjunction.is_empty();
        for (i, child) in live.into_iter().enumerate() {
            if i > 0 && separated {
                if i + 1 < count && self.list_commas {
                    out.push(Leaf::literal(","));
                } else {
                    let mut conjunction =
                        InflectedWord::new(&coord.conjunction, LexicalCategory::Conjunction);
                    conjunction.features.discourse_function = Some(DiscourseFunction::Conjunction);
                    out.push(Leaf::Word(conjunction));
                }
            }
            self.node(child, out);
        }

        self.nodes(take(&mut coord.postmodifiers), out);
        self.nodes(take(&mut coord.complements), out);
    }
}

/// Remove and return the direct objects of a verb phrase.
fn take_objects(vp: &mut Phrase) -> Vec<Node> {
    let (objects, kept): (Vec<Node>, Vec<Node>) = take(&mut vp.complements)
        .into_iter()
        .partition(|c| c.discourse_function() == Some(DiscourseFunction::Object));
    vp.complements = kept;
    objects
}

fn specifier_lemma(node: &Node) -> Option<Lemma<'_>> {
    node.as_phrase()
        .and_then(|p| p.specifier.as_deref())
        .and_then(Node::lemma)
}

/// Indirect objects precede direct objects, which precede other complements.
fn complement_rank(node: &Node) -> u8 {
    match node.discourse_function() {
        Some(DiscourseFunction::IndirectObject) => 0,
        Some(DiscourseFunction::Object) => 1,
        _ => 2,
    }
}

/// Hand a clause's verbal and agreement features to its verb phrase(s).
fn agree_verb(node: &mut Node, f: &Features) {
    if let Node::Coordinate(coord) = node {
        for child in coord.coordinates.iter_mut() {
            agree_verb(child, f);
        }
        return;
    }
    let target = node.features_mut();
    f.propagate_to_verb_phrase(target);
    if f.number.is_some() {
        target.number = f.number;
    }
    if f.person.is_some() {
        target.person = f.person;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morphology::MorphologyEngine;
    use crate::schema::lexicon::{EmptyLexicon, MemoryLexicon};

    fn render_with(lexicon: &dyn Lexicon, node: impl Into<Node>) -> String {
        let leaves = SyntaxEngine::new(lexicon).realize(&node.into());
        MorphologyEngine::default().realize_leaves(&leaves).join(" ")
    }

    fn render(node: impl Into<Node>) -> String {
        render_with(&EmptyLexicon, node)
    }

    fn john() -> Phrase {
        Phrase::proper_noun_phrase("John")
    }

    #[test]
    fn noun_phrase_slot_order() {
        let np = Phrase::noun_phrase(Some("the"), "dog")
            .with_premodifier(Node::adjective("big"))
            .with_postmodifier(Phrase::prepositional_phrase(
                "in",
                Phrase::noun_phrase(Some("the"), "garden"),
            ))
            .with_number(NumberAgreement::Plural);
        assert_eq!(render(np), "the big dogs in the garden");
    }

    #[test]
    fn noun_modifier_moves_after_adjectives() {
        let lexicon: MemoryLexicon = [
            Word::new("red", LexicalCategory::Adjective).with_class(WordClass {
                colour: true,
                ..WordClass::default()
            }),
            Word::new("old", LexicalCategory::Adjective).with_class(WordClass {
                qualitative: true,
                ..WordClass::default()
            }),
        ]
        .into_iter()
        .collect();
        let np = Phrase::noun_phrase(Some("an"), "bottle")
            .with_premodifier(Node::noun("wine"))
            .with_premodifier(Node::adjective("red"))
            .with_premodifier(Node::adjective("old"));
        assert_eq!(render_with(&lexicon, np), "an old red wine bottle");
    }

    #[test]
    fn specifier_agrees_with_phrase() {
        let np = Phrase::noun_phrase(Some("this"), "box").with_number(NumberAgreement::Plural);
        assert_eq!(render(np), "these boxes");
        let np = Phrase::noun_phrase(Some("a"), "apple").with_number(NumberAgreement::Plural);
        assert_eq!(render(np), "some apples");
    }

    #[test]
    fn possessive_specifier() {
        let np = Phrase::noun_phrase(None, "dog").with_specifier(john());
        assert_eq!(render(np), "John's dog");
        let np = Phrase::noun_phrase(None, "dog").with_specifier(Node::pronoun("she"));
        assert_eq!(render(np), "her dog");
    }

    #[test]
    fn pronominal_phrase_follows_role() {
        let he = Phrase::pronominal(Person::Third, NumberAgreement::Singular)
            .with_gender(Gender::Masculine);
        assert_eq!(he.features.number, Some(NumberAgreement::Singular));
        let clause = Phrase::svo(he.clone(), "see", Some(he.into()));
        assert_eq!(render(clause), "he sees him");
    }

    #[test]
    fn present_agreement_with_subject() {
        let clause = Phrase::svo(
            Phrase::noun_phrase(Some("the"), "dog").with_number(NumberAgreement::Plural),
            "chase",
            Some(Phrase::noun_phrase(Some("a"), "cat").into()),
        );
        assert_eq!(render(clause), "the dogs chase a cat");
    }

    #[test]
    fn verb_group_auxiliaries() {
        let base = || Phrase::svo(john(), "eat", Some(Phrase::noun_phrase(Some("an"), "apple").into()));
        assert_eq!(render(base().perfect()), "John has eaten an apple");
        assert_eq!(
            render(base().progressive().with_tense(Tense::Past)),
            "John was eating an apple"
        );
        assert_eq!(
            render(base().with_tense(Tense::Future)),
            "John will eat an apple"
        );
        assert_eq!(
            render(base().with_modal("can").perfect().progressive()),
            "John can have been eating an apple"
        );
    }

    #[test]
    fn negation_uses_do_support() {
        let clause = Phrase::svo(john(), "swim", None).negated();
        assert_eq!(render(clause), "John does not swim");
        let clause = Phrase::svo(john(), "swim", None).negated().with_tense(Tense::Past);
        assert_eq!(render(clause), "John did not swim");
        let clause = Phrase::svo(john(), "swim", None).negated().perfect();
        assert_eq!(render(clause), "John has not swum");
        let copula = Phrase::svo(john(), "be", None)
            .with_complement(Node::adjective("happy"))
            .negated();
        assert_eq!(render(copula), "John is not happy");
    }

    #[test]
    fn passive_raises_object_and_demotes_subject() {
        let clause = Phrase::svo(
            john(),
            "eat",
            Some(Phrase::noun_phrase(Some("the"), "apple").into()),
        )
        .with_tense(Tense::Past)
        .passive();
        assert_eq!(render(clause), "the apple was eaten by John");
    }

    #[test]
    fn passive_raises_through_coordinated_verb_phrases() {
        let vp = |verb: &str, noun: &str| {
            Phrase::verb_phrase(verb).with_complement(Phrase::noun_phrase(Some("the"), noun))
        };
        let shared = Phrase::clause()
            .with_subject(john())
            .with_verb_phrase(
                Coordinate::of(vec![vp("eat", "apple").into(), vp("wash", "apple").into()])
                    .with_aggregate_auxiliary(true),
            )
            .with_tense(Tense::Past)
            .passive();
        assert_eq!(render(shared), "the apple was eaten and washed by John");

        let differing = Phrase::clause()
            .with_subject(john())
            .with_verb_phrase(
                Coordinate::of(vec![vp("eat", "apple").into(), vp("wash", "pear").into()])
                    .with_aggregate_auxiliary(true),
            )
            .with_tense(Tense::Past)
            .passive();
        assert_eq!(
            render(differing),
            "the apple and the pear were eaten and washed by John"
        );
    }

    #[test]
    fn non_finite_forms() {
        let vp = Phrase::verb_phrase("leave").with_form(Form::Infinitive);
        assert_eq!(render(vp), "to leave");
        let imperative = Phrase::svo(Node::pronoun("you"), "run", None)
            .with_form(Form::Imperative)
            .negated();
        assert_eq!(render(imperative), "do not run");
    }

    #[test]
    fn subordinate_clause_leads_with_complementiser() {
        let clause = Phrase::svo(john(), "leave", None)
            .with_tense(Tense::Past)
            .subordinate("that");
        assert_eq!(render(clause), "that John left");
    }

    #[test]
    fn coordinate_lists_use_commas() {
        let coord = Coordinate::of(vec![
            Node::noun("apple"),
            Node::noun("pear"),
            Node::noun("plum"),
        ]);
        assert_eq!(render(coord), "apple , pear and plum");
    }

    #[test]
    fn disjunction_takes_number_of_last() {
        let subject = Coordinate::new("or")
            .with_coordinate(john())
            .with_coordinate(Phrase::noun_phrase(Some("the"), "dog").with_number(NumberAgreement::Plural));
        let clause = Phrase::svo(subject, "bark", None);
        assert_eq!(render(clause), "John or the dogs bark");
    }

    #[test]
    fn raised_specifier_is_realized_once() {
        let coord = Coordinate::of(vec![
            Phrase::noun_phrase(Some("the"), "cat").into(),
            Phrase::noun_phrase(Some("the"), "dog").into(),
        ])
        .with_raise_specifier(true);
        assert_eq!(render(coord), "the cat and dog");
    }

    #[test]
    fn aggregated_auxiliaries_appear_once() {
        let coord = Coordinate::of(vec![
            Phrase::verb_phrase("eat").into(),
            Phrase::verb_phrase("drink").into(),
        ])
        .with_aggregate_auxiliary(true);
        let clause = Phrase::clause()
            .with_subject(john())
            .with_verb_phrase(coord)
            .perfect();
        assert_eq!(render(clause), "John has eaten and drunk");
    }

    #[test]
    fn existential_agrees_with_complement() {
        let clause = Phrase::svo(
            Node::word("there", LexicalCategory::Other),
            "be",
            Some(Phrase::noun_phrase(None, "dog").with_number(NumberAgreement::Plural).into()),
        );
        assert_eq!(render(clause), "there are dogs");
    }

    #[test]
    fn elided_nodes_are_skipped_and_input_untouched() {
        let mut subject: Node = john().into();
        subject.set_elided();
        let clause: Node = Phrase::svo(subject, "run", None).into();
        let before = clause.clone();
        assert_eq!(render(clause.clone()), "runs");
        assert_eq!(clause, before);
    }
}
