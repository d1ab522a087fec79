/// Clause aggregation: ellipsis and coordination rules, and the pipeline
/// that chains them.
///
/// Rules never touch their inputs. Each one works on copies and returns a
/// new tree, or `None` when it does not apply.

use tracing::debug;

use crate::core::phrase_checker::{
    is_clause, is_existential, is_passive, left_periphery, right_periphery, same_agents,
    same_front_modifiers, same_surface_subject, same_vp, same_vp_arguments, same_vp_head,
    same_vp_modifiers,
};
use crate::schema::features::{DiscourseFunction, PhraseCategory};
use crate::schema::node::{Coordinate, Node, Phrase};

/// A rule that merges several clauses into one.
pub trait AggregationRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Combine `sentences`, or return `None` when the rule does not apply.
    fn apply(&self, sentences: &[Node]) -> Option<Node>;

    /// Apply the rule to the coordinates of a coordinated clause.
    fn apply_node(&self, node: &Node) -> Option<Node> {
        match node {
            Node::Coordinate(coord) => self.apply(&coord.coordinates),
            _ => None,
        }
    }
}

/// Copies of `sentences` when there are at least two and every one is an
/// active clause.
fn active_clauses(sentences: &[Node]) -> Option<Vec<Phrase>> {
    if sentences.len() < 2 {
        return None;
    }
    sentences
        .iter()
        .map(|node| {
            node.as_phrase()
                .filter(|p| p.is_a(PhraseCategory::Clause) && !is_passive(p))
                .cloned()
        })
        .collect()
}

fn conjoin(clauses: Vec<Phrase>, conjunction: &str) -> Node {
    let mut coord = Coordinate::new(conjunction);
    coord.coordinates = clauses.into_iter().map(Node::Phrase).collect();
    Node::Coordinate(coord)
}

/// Elides repeated lemma-identical cue phrases, front modifiers and
/// subjects after their first occurrence: "John saw Mary and called Mary".
#[derive(Debug, Clone)]
pub struct ForwardConjunctionReduction {
    conjunction: String,
}

impl ForwardConjunctionReduction {
    pub fn new(conjunction: &str) -> Self {
        Self {
            conjunction: conjunction.to_string(),
        }
    }
}

impl Default for ForwardConjunctionReduction {
    fn default() -> Self {
        Self::new("and")
    }
}

impl AggregationRule for ForwardConjunctionReduction {
    fn name(&self) -> &'static str {
        "forward-conjunction-reduction"
    }

    fn apply(&self, sentences: &[Node]) -> Option<Node> {
        let mut clauses = active_clauses(sentences)?;
        let mut elided = false;
        for set in left_periphery(&clauses) {
            if set.lemma_identical(&clauses) {
                debug!(function = ?set.function(), slot = ?set.slot, "eliding repeated left-periphery constituent");
                set.elide_rightmost(&mut clauses);
                elided = true;
            }
        }
        elided.then(|| conjoin(clauses, &self.conjunction))
    }
}

/// Elides repeated form-identical complements and postmodifiers before
/// their last occurrence: "John bought and Mary sold a car".
#[derive(Debug, Clone)]
pub struct BackwardConjunctionReduction {
    conjunction: String,
}

impl BackwardConjunctionReduction {
    pub fn new(conjunction: &str) -> Self {
        Self {
            conjunction: conjunction.to_string(),
        }
    }
}

impl Default for BackwardConjunctionReduction {
    fn default() -> Self {
        Self::new("and")
    }
}

impl AggregationRule for BackwardConjunctionReduction {
    fn name(&self) -> &'static str {
        "backward-conjunction-reduction"
    }

    fn apply(&self, sentences: &[Node]) -> Option<Node> {
        let mut clauses = active_clauses(sentences)?;
        let mut elided = false;
        for set in right_periphery(&clauses) {
            if set.form_identical(&clauses) {
                debug!(function = ?set.function(), slot = ?set.slot, "eliding repeated right-periphery constituent");
                set.elide_leftmost(&mut clauses);
                elided = true;
            }
        }
        elided.then(|| conjoin(clauses, &self.conjunction))
    }
}

/// Merges clauses that share subjects or a verb phrase into one clause
/// with a coordinated constituent.
///
/// Clauses are compared and combined with elision marks cleared, so the
/// rule also merges clauses an ellipsis rule has already reduced.
#[derive(Debug, Clone)]
pub struct ClauseCoordination {
    conjunction: String,
}

impl ClauseCoordination {
    pub fn new(conjunction: &str) -> Self {
        Self {
            conjunction: conjunction.to_string(),
        }
    }

    /// One verb phrase whose complement coordinates every clause's
    /// arguments: "John eats an apple and a pear".
    fn shared_head(&self, clauses: &[Phrase]) -> Option<Node> {
        let mut vp = clauses[0].vp()?.clone();
        let mut groups = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let mut complements = clause.vp()?.complements.clone();
            let group = if complements.len() == 1 {
                complements.remove(0)
            } else {
                // Several arguments of one clause stay together unjoined.
                let mut inner = Coordinate::new("");
                inner.coordinates = complements;
                Node::Coordinate(inner)
            };
            groups.push(group);
        }
        let mut coord = Coordinate::new(&self.conjunction);
        coord.features.discourse_function = vp
            .complements
            .first()
            .and_then(Node::discourse_function)
            .or(Some(DiscourseFunction::Object));
        coord.coordinates = groups;
        vp.complements = vec![Node::Coordinate(coord)];
        Some(Node::Phrase(vp))
    }

    /// A coordinate of the full verb phrases sharing one auxiliary stack:
    /// "John has eaten and drunk".
    fn coordinated_heads(&self, clauses: &[Phrase]) -> Option<Node> {
        let first = &clauses[0].features;
        let uniform = clauses
            .iter()
            .all(|c| c.features.negated == first.negated && c.features.modal == first.modal);
        let mut coord = Coordinate::new(&self.conjunction).with_aggregate_auxiliary(uniform);
        for clause in clauses {
            let mut head = clause.head.as_deref()?.clone();
            if !uniform {
                // Polarity and modality stay with their own verb phrase.
                let f = head.features_mut();
                f.negated |= clause.features.negated;
                if f.modal.is_none() {
                    f.modal.clone_from(&clause.features.modal);
                }
            }
            coord.coordinates.push(head);
        }
        coord.features.discourse_function = Some(DiscourseFunction::VerbPhrase);
        Some(Node::Coordinate(coord))
    }

    /// Restore the verbal features structural combination drops.
    fn restore_features(result: &mut Phrase, clauses: &[Phrase]) {
        let first = &clauses[0].features;
        let f = &mut result.features;
        f.tense = first.tense;
        f.perfect = first.perfect;
        f.passive = first.passive;
        f.progressive = first.progressive;
        f.form = first.form;
        f.clause_status = first.clause_status;
        f.complementiser.clone_from(&first.complementiser);
        if clauses.iter().all(|c| c.features.negated == first.negated) {
            f.negated = first.negated;
        }
        if clauses.iter().all(|c| c.features.modal == first.modal) {
            f.modal.clone_from(&first.modal);
        }
    }
}

impl Default for ClauseCoordination {
    fn default() -> Self {
        Self::new("and")
    }
}

impl AggregationRule for ClauseCoordination {
    fn name(&self) -> &'static str {
        "clause-coordination"
    }

    fn apply(&self, sentences: &[Node]) -> Option<Node> {
        if sentences.len() < 2 || !sentences.iter().all(is_clause) {
            return None;
        }
        let clauses: Vec<Phrase> = sentences
            .iter()
            .filter_map(|n| n.without_elision().as_phrase().cloned())
            .collect();
        let first = &clauses[0];

        if clauses.iter().all(|c| c == first) {
            debug!("clauses identical, keeping the first");
            return Some(Node::Phrase(first.clone()));
        }

        let mut result = Phrase::clause();
        let shared_left = clauses
            .iter()
            .all(|c| {
                same_front_modifiers(first, c)
                    && same_surface_subject(first, c)
                    && same_agents(first, c)
            });

        if shared_left {
            let arguments_differ = !clauses.iter().all(|c| same_vp_arguments(first, c));
            let head_and_modifiers_match = clauses
                .iter()
                .all(|c| same_vp_head(first, c) && same_vp_modifiers(first, c));
            let head = if arguments_differ && head_and_modifiers_match {
                debug!("coordinating verb arguments under a shared head");
                self.shared_head(&clauses)?
            } else if !clauses.iter().any(is_existential) {
                debug!("coordinating verb phrases under shared subjects");
                self.coordinated_heads(&clauses)?
            } else {
                return None;
            };
            result.head = Some(Box::new(head));
            result.subjects = first.subjects.clone();
            result.front_modifiers = first.front_modifiers.clone();
            result.cue_phrase = first.cue_phrase.clone();
        } else if clauses.iter().all(|c| same_vp(first, c)) {
            debug!("coordinating subjects under a shared verb phrase");
            result.head = first.head.clone();
            result.cue_phrase = first.cue_phrase.clone();
            for clause in &clauses {
                result.subjects.extend(clause.subjects.iter().cloned());
                result
                    .front_modifiers
                    .extend(clause.front_modifiers.iter().cloned());
            }
        } else {
            return None;
        }

        result.complements = first.complements.clone();
        result.postmodifiers = first.postmodifiers.clone();
        Self::restore_features(&mut result, &clauses);
        Some(Node::Phrase(result))
    }
}

/// Ordered rule pipeline: forward reduction, backward reduction, then
/// coordination.
pub struct ClauseAggregator {
    rules: Vec<Box<dyn AggregationRule>>,
}

impl Default for ClauseAggregator {
    fn default() -> Self {
        Self::new("and")
    }
}

impl ClauseAggregator {
    pub fn new(conjunction: &str) -> Self {
        Self {
            rules: vec![
                Box::new(ForwardConjunctionReduction::new(conjunction)),
                Box::new(BackwardConjunctionReduction::new(conjunction)),
                Box::new(ClauseCoordination::new(conjunction)),
            ],
        }
    }

    /// Pipeline with no rules, for callers composing their own.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl AggregationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Aggregate `sentences` into one clause.
    ///
    /// No input gives `None` and one input comes back unchanged. Otherwise
    /// each rule runs in order; a coordinate result becomes the working
    /// set for the rules after it. The last result any rule produced is
    /// returned, or `None` if none fired.
    pub fn apply(&self, sentences: &[Node]) -> Option<Node> {
        match sentences {
            [] => return None,
            [only] => return Some(only.clone()),
            _ => {}
        }

        let mut working: Option<Node> = None;
        let mut result: Option<Node> = None;
        for rule in &self.rules {
            let outcome = match &working {
                Some(coord) => rule.apply_node(coord),
                None => rule.apply(sentences),
            };
            let Some(node) = outcome else {
                debug!(rule = rule.name(), "aggregation rule did not apply");
                continue;
            };
            debug!(rule = rule.name(), "aggregation rule applied");
            if matches!(node, Node::Coordinate(_)) {
                working = Some(node.clone());
            }
            result = Some(node);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::features::Tense;

    fn clause(subject: &str, verb: &str, object: Option<Phrase>) -> Node {
        Phrase::svo(
            Phrase::proper_noun_phrase(subject),
            verb,
            object.map(Node::from),
        )
        .into()
    }

    #[test]
    fn forward_reduction_elides_later_subjects() {
        let inputs = vec![
            clause("John", "see", Some(Phrase::proper_noun_phrase("Mary"))),
            clause("John", "call", Some(Phrase::proper_noun_phrase("Mary"))),
        ];
        let before = inputs.clone();
        let out = ForwardConjunctionReduction::default().apply(&inputs).unwrap();
        let Node::Coordinate(coord) = out else {
            panic!("expected a coordinate");
        };
        let subject = |n: &Node| n.as_phrase().unwrap().subjects[0].is_elided();
        assert!(!subject(&coord.coordinates[0]));
        assert!(subject(&coord.coordinates[1]));
        assert_eq!(inputs, before);
    }

    #[test]
    fn backward_reduction_keeps_last_occurrence() {
        let inputs = vec![
            clause("John", "buy", Some(Phrase::noun_phrase(Some("a"), "car"))),
            clause("Mary", "sell", Some(Phrase::noun_phrase(Some("a"), "car"))),
        ];
        let out = BackwardConjunctionReduction::default().apply(&inputs).unwrap();
        let Node::Coordinate(coord) = out else {
            panic!("expected a coordinate");
        };
        let object = |n: &Node| n.as_phrase().unwrap().vp().unwrap().complements[0].is_elided();
        assert!(object(&coord.coordinates[0]));
        assert!(!object(&coord.coordinates[1]));
    }

    #[test]
    fn ellipsis_requires_active_clauses() {
        let passive: Node = Phrase::svo(
            Phrase::proper_noun_phrase("John"),
            "see",
            Some(Phrase::proper_noun_phrase("Mary").into()),
        )
        .passive()
        .into();
        let inputs = vec![passive.clone(), passive];
        assert!(ForwardConjunctionReduction::default().apply(&inputs).is_none());
        assert!(BackwardConjunctionReduction::default().apply(&inputs).is_none());
    }

    #[test]
    fn coordination_shares_head_across_arguments() {
        let inputs = vec![
            clause("John", "eat", Some(Phrase::noun_phrase(Some("an"), "apple"))),
            clause("John", "eat", Some(Phrase::noun_phrase(Some("a"), "pear"))),
        ];
        let out = ClauseCoordination::default().apply(&inputs).unwrap();
        let merged = out.as_phrase().unwrap();
        assert_eq!(merged.subjects.len(), 1);
        let vp = merged.vp().unwrap();
        assert_eq!(vp.complements.len(), 1);
        assert!(matches!(&vp.complements[0], Node::Coordinate(c) if c.coordinates.len() == 2));
    }

    #[test]
    fn coordination_joins_subjects_of_a_shared_verb_phrase() {
        let inputs = vec![clause("John", "sleep", None), clause("Mary", "sleep", None)];
        let out = ClauseCoordination::default().apply(&inputs).unwrap();
        assert_eq!(out.as_phrase().unwrap().subjects.len(), 2);
    }

    #[test]
    fn coordination_restores_tense() {
        let past = |s: &str, v: &str| -> Node {
            Phrase::svo(Phrase::proper_noun_phrase(s), v, None)
                .with_tense(Tense::Past)
                .into()
        };
        let out = ClauseCoordination::default()
            .apply(&[past("John", "sing"), past("John", "dance")])
            .unwrap();
        let merged = out.as_phrase().unwrap();
        assert_eq!(merged.features.tense, Some(Tense::Past));
        assert!(matches!(merged.head.as_deref(), Some(Node::Coordinate(c)) if c.aggregate_auxiliary));
    }

    #[test]
    fn coordination_rejects_unrelated_clauses() {
        let inputs = vec![
            clause("John", "sleep", None),
            clause("Mary", "eat", Some(Phrase::noun_phrase(Some("a"), "pear"))),
        ];
        assert!(ClauseCoordination::default().apply(&inputs).is_none());
    }

    #[test]
    fn pipeline_edge_cases() {
        let aggregator = ClauseAggregator::default();
        assert!(aggregator.apply(&[]).is_none());
        let single = clause("John", "run", None);
        assert_eq!(aggregator.apply(std::slice::from_ref(&single)), Some(single.clone()));
        assert_eq!(aggregator.apply(&[single.clone(), single.clone()]), Some(single));
        assert_eq!(
            aggregator.rule_names(),
            vec![
                "forward-conjunction-reduction",
                "backward-conjunction-reduction",
                "clause-coordination"
            ]
        );
    }
}
