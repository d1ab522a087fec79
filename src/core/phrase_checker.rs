/// Structural comparisons over clauses, used by the aggregation rules.

use crate::schema::features::{DiscourseFunction, PhraseCategory};
use crate::schema::node::{Lemma, Node, Phrase};

/// Address of a constituent inside a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    CuePhrase,
    FrontModifier(usize),
    Subject(usize),
    /// Complement of the clause's verb phrase.
    Complement(usize),
    /// Postmodifier of the clause's verb phrase.
    Postmodifier(usize),
    ClauseComplement(usize),
    ClausePostmodifier(usize),
}

impl Slot {
    pub fn function(self) -> DiscourseFunction {
        match self {
            Slot::CuePhrase => DiscourseFunction::CuePhrase,
            Slot::FrontModifier(_) => DiscourseFunction::FrontModifier,
            Slot::Subject(_) => DiscourseFunction::Subject,
            Slot::Complement(_) | Slot::ClauseComplement(_) => DiscourseFunction::Complement,
            Slot::Postmodifier(_) | Slot::ClausePostmodifier(_) => DiscourseFunction::Postmodifier,
        }
    }

    pub fn get(self, clause: &Phrase) -> Option<&Node> {
        match self {
            Slot::CuePhrase => clause.cue_phrase.as_deref(),
            Slot::FrontModifier(i) => clause.front_modifiers.get(i),
            Slot::Subject(i) => clause.subjects.get(i),
            Slot::Complement(i) => clause.vp().and_then(|vp| vp.complements.get(i)),
            Slot::Postmodifier(i) => clause.vp().and_then(|vp| vp.postmodifiers.get(i)),
            Slot::ClauseComplement(i) => clause.complements.get(i),
            Slot::ClausePostmodifier(i) => clause.postmodifiers.get(i),
        }
    }

    pub fn get_mut(self, clause: &mut Phrase) -> Option<&mut Node> {
        match self {
            Slot::CuePhrase => clause.cue_phrase.as_deref_mut(),
            Slot::FrontModifier(i) => clause.front_modifiers.get_mut(i),
            Slot::Subject(i) => clause.subjects.get_mut(i),
            Slot::Complement(i) => clause.vp_mut().and_then(|vp| vp.complements.get_mut(i)),
            Slot::Postmodifier(i) => clause.vp_mut().and_then(|vp| vp.postmodifiers.get_mut(i)),
            Slot::ClauseComplement(i) => clause.complements.get_mut(i),
            Slot::ClausePostmodifier(i) => clause.postmodifiers.get_mut(i),
        }
    }
}

/// Parallel constituents: the node at one slot in every clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseSet {
    pub slot: Slot,
}

impl PhraseSet {
    pub fn function(&self) -> DiscourseFunction {
        self.slot.function()
    }

    /// Members of the set, or `None` if some clause lacks the slot.
    fn members<'c>(&self, clauses: &'c [Phrase]) -> Option<Vec<&'c Node>> {
        clauses.iter().map(|c| self.slot.get(c)).collect()
    }

    /// All members share a lexical head, ignoring inflection, or are the
    /// same literal text.
    pub fn lemma_identical(&self, clauses: &[Phrase]) -> bool {
        let Some(members) = self.members(clauses) else {
            return false;
        };
        if members.len() < 2 {
            return false;
        }
        let first: Option<Lemma<'_>> = members[0].lemma();
        first.is_some() && members.iter().all(|m| m.lemma() == first)
    }

    /// All members are structurally equal once elision marks are cleared.
    pub fn form_identical(&self, clauses: &[Phrase]) -> bool {
        let Some(members) = self.members(clauses) else {
            return false;
        };
        if members.len() < 2 {
            return false;
        }
        let first = members[0].without_elision();
        members.iter().skip(1).all(|m| m.without_elision() == first)
    }

    /// Elide every occurrence but the first.
    pub fn elide_rightmost(&self, clauses: &mut [Phrase]) {
        for clause in clauses.iter_mut().skip(1) {
            if let Some(node) = self.slot.get_mut(clause) {
                node.set_elided();
            }
        }
    }

    /// Elide every occurrence but the last.
    pub fn elide_leftmost(&self, clauses: &mut [Phrase]) {
        let keep = clauses.len().saturating_sub(1);
        for clause in clauses.iter_mut().take(keep) {
            if let Some(node) = self.slot.get_mut(clause) {
                node.set_elided();
            }
        }
    }
}

fn shortest(clauses: &[Phrase], len: impl Fn(&Phrase) -> usize) -> usize {
    clauses.iter().map(len).min().unwrap_or(0)
}

/// Cue phrase, front modifiers and subjects, aligned by position.
pub fn left_periphery(clauses: &[Phrase]) -> Vec<PhraseSet> {
    let mut sets = vec![PhraseSet {
        slot: Slot::CuePhrase,
    }];
    for i in 0..shortest(clauses, |c| c.front_modifiers.len()) {
        sets.push(PhraseSet {
            slot: Slot::FrontModifier(i),
        });
    }
    for i in 0..shortest(clauses, |c| c.subjects.len()) {
        sets.push(PhraseSet {
            slot: Slot::Subject(i),
        });
    }
    sets
}

/// Verb-phrase and clause complements and postmodifiers, aligned by
/// position.
pub fn right_periphery(clauses: &[Phrase]) -> Vec<PhraseSet> {
    let mut sets = Vec::new();
    for i in 0..shortest(clauses, |c| c.vp().map_or(0, |vp| vp.complements.len())) {
        sets.push(PhraseSet {
            slot: Slot::Complement(i),
        });
    }
    for i in 0..shortest(clauses, |c| c.vp().map_or(0, |vp| vp.postmodifiers.len())) {
        sets.push(PhraseSet {
            slot: Slot::Postmodifier(i),
        });
    }
    for i in 0..shortest(clauses, |c| c.complements.len()) {
        sets.push(PhraseSet {
            slot: Slot::ClauseComplement(i),
        });
    }
    for i in 0..shortest(clauses, |c| c.postmodifiers.len()) {
        sets.push(PhraseSet {
            slot: Slot::ClausePostmodifier(i),
        });
    }
    sets
}

pub fn is_clause(node: &Node) -> bool {
    node.is_phrase(PhraseCategory::Clause)
}

pub fn is_passive(clause: &Phrase) -> bool {
    clause.features.passive || clause.vp().is_some_and(|vp| vp.features.passive)
}

/// Clause whose subject is the expletive "there".
pub fn is_existential(clause: &Phrase) -> bool {
    clause.subjects.iter().any(|s| {
        matches!(s.lemma(), Some(Lemma::Word { base, .. }) if base.eq_ignore_ascii_case("there"))
            || s.lexical_entry().is_some_and(|w| w.class.expletive_subject)
    })
}

pub fn same_front_modifiers(a: &Phrase, b: &Phrase) -> bool {
    a.front_modifiers == b.front_modifiers && a.cue_phrase == b.cue_phrase
}

/// Complements that a passive clause raises into subject position.
fn passive_raised(clause: &Phrase) -> Vec<&Node> {
    clause.vp().map_or_else(Vec::new, |vp| {
        vp.complements
            .iter()
            .filter(|c| c.discourse_function() == Some(DiscourseFunction::Object))
            .collect()
    })
}

pub fn same_surface_subject(a: &Phrase, b: &Phrase) -> bool {
    match (is_passive(a), is_passive(b)) {
        (false, false) => a.subjects == b.subjects,
        (true, true) => passive_raised(a) == passive_raised(b),
        _ => false,
    }
}

/// Passive clauses can only share a subject slot when their agents match,
/// since the agents end up in one "by" phrase.
pub fn same_agents(a: &Phrase, b: &Phrase) -> bool {
    !(is_passive(a) || is_passive(b)) || a.subjects == b.subjects
}

pub fn same_vp(a: &Phrase, b: &Phrase) -> bool {
    a.head == b.head
}

fn head_lemma(vp: &Phrase) -> Option<Lemma<'_>> {
    vp.head.as_deref().and_then(Node::lemma)
}

pub fn same_vp_head(a: &Phrase, b: &Phrase) -> bool {
    match (a.vp(), b.vp()) {
        (Some(x), Some(y)) => head_lemma(x).is_some() && head_lemma(x) == head_lemma(y),
        _ => false,
    }
}

pub fn same_vp_modifiers(a: &Phrase, b: &Phrase) -> bool {
    match (a.vp(), b.vp()) {
        (Some(x), Some(y)) => x.premodifiers == y.premodifiers && x.postmodifiers == y.postmodifiers,
        _ => false,
    }
}

pub fn same_vp_arguments(a: &Phrase, b: &Phrase) -> bool {
    match (a.vp(), b.vp()) {
        (Some(x), Some(y)) => x.complements == y.complements,
        _ => false,
    }
}
