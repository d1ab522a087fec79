/// Aggregation integration tests: ellipsis and coordination realized end
/// to end.

use phrase_realizer::core::aggregation::{
    AggregationRule, BackwardConjunctionReduction, ClauseAggregator, ForwardConjunctionReduction,
};
use phrase_realizer::schema::features::Tense;
use phrase_realizer::{Node, Phrase, Realizer};

fn realizer() -> Realizer {
    Realizer::builder().build().unwrap()
}

fn john_eats(determiner: &str, noun: &str) -> Node {
    Phrase::svo(
        Phrase::proper_noun_phrase("John"),
        "eat",
        Some(Phrase::noun_phrase(Some(determiner), noun).into()),
    )
    .into()
}

fn is_happy(name: &str) -> Node {
    Phrase::clause()
        .with_subject(Phrase::proper_noun_phrase(name))
        .with_verb_phrase(Phrase::verb_phrase("be").with_complement(Phrase::adjective_phrase("happy")))
        .into()
}

fn john_did_to_mary(verb: &str) -> Node {
    Phrase::svo(
        Phrase::proper_noun_phrase("John"),
        verb,
        Some(Phrase::proper_noun_phrase("Mary").into()),
    )
    .with_tense(Tense::Past)
    .into()
}

fn apple_was(verb: &str, agent: &str) -> Node {
    Phrase::svo(
        Phrase::proper_noun_phrase(agent),
        verb,
        Some(Phrase::noun_phrase(Some("the"), "apple").into()),
    )
    .with_tense(Tense::Past)
    .passive()
    .into()
}

#[test]
fn shared_subject_and_verb_coordinates_objects() {
    let r = realizer();
    let merged = r
        .aggregate(&[john_eats("an", "apple"), john_eats("a", "pear")])
        .unwrap();
    assert_eq!(r.realize_sentence(&merged), "John eats an apple and a pear.");
}

#[test]
fn shared_predicate_coordinates_subjects() {
    let r = realizer();
    let merged = r.aggregate(&[is_happy("John"), is_happy("Mary")]).unwrap();
    assert_eq!(r.realize_sentence(&merged), "John and Mary are happy.");
}

#[test]
fn shared_subject_coordinates_verb_phrases() {
    let r = realizer();
    let merged = r
        .aggregate(&[john_did_to_mary("see"), john_did_to_mary("call")])
        .unwrap();
    assert_eq!(r.realize_sentence(&merged), "John saw Mary and called Mary.");
}

#[test]
fn forward_reduction_alone_elides_the_repeated_subject() {
    let r = realizer();
    let reduced = ForwardConjunctionReduction::default()
        .apply(&[john_did_to_mary("see"), john_did_to_mary("call")])
        .unwrap();
    assert_eq!(r.realize_sentence(&reduced), "John saw Mary and called Mary.");
}

#[test]
fn backward_reduction_alone_keeps_the_last_object() {
    let r = realizer();
    let bought: Node = Phrase::svo(
        Phrase::proper_noun_phrase("John"),
        "buy",
        Some(Phrase::noun_phrase(Some("a"), "car").into()),
    )
    .with_tense(Tense::Past)
    .into();
    let sold: Node = Phrase::svo(
        Phrase::proper_noun_phrase("Mary"),
        "sell",
        Some(Phrase::noun_phrase(Some("a"), "car").into()),
    )
    .with_tense(Tense::Past)
    .into();
    let reduced = BackwardConjunctionReduction::default()
        .apply(&[bought, sold])
        .unwrap();
    assert_eq!(r.realize_sentence(&reduced), "John bought and Mary sold a car.");
}

#[test]
fn unrelated_clauses_do_not_aggregate() {
    let r = realizer();
    let sleeps: Node = Phrase::svo(Phrase::proper_noun_phrase("Mary"), "sleep", None).into();
    let inputs = [john_eats("an", "apple"), sleeps];
    assert!(r.aggregate(&inputs).is_none());
    assert_eq!(
        r.realize_paragraph(&inputs),
        "John eats an apple. Mary sleeps."
    );
}

#[test]
fn aggregation_leaves_its_inputs_untouched() {
    let inputs = vec![john_did_to_mary("see"), john_did_to_mary("call")];
    let before = inputs.clone();
    let _ = ClauseAggregator::default().apply(&inputs);
    assert_eq!(inputs, before);
}

#[test]
fn custom_conjunction_is_used_for_coordination() {
    let merged = ClauseAggregator::new("or")
        .apply(&[john_eats("an", "apple"), john_eats("a", "pear")])
        .unwrap();
    assert_eq!(realizer().realize_sentence(&merged), "John eats an apple or a pear.");
}

#[test]
fn passive_clauses_with_one_agent_share_the_by_phrase() {
    let r = realizer();
    let inputs = [apple_was("eat", "John"), apple_was("wash", "John")];
    assert_eq!(r.realize_sentence(&inputs[0]), "The apple was eaten by John.");
    let merged = r.aggregate(&inputs).unwrap();
    assert_eq!(r.realize_sentence(&merged), "The apple was eaten and washed by John.");
}

#[test]
fn passive_clauses_with_different_agents_stay_apart() {
    let r = realizer();
    let inputs = [apple_was("eat", "John"), apple_was("wash", "Mary")];
    assert!(r.aggregate(&inputs).is_none());
    assert_eq!(
        r.realize_paragraph(&inputs),
        "The apple was eaten by John. The apple was washed by Mary."
    );
}

#[test]
fn passive_clauses_with_one_verb_coordinate_their_agents() {
    let r = realizer();
    let merged = r
        .aggregate(&[apple_was("eat", "John"), apple_was("eat", "Mary")])
        .unwrap();
    assert_eq!(r.realize_sentence(&merged), "The apple was eaten by John and Mary.");
}
