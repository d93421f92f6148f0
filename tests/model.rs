//! Training determinism and additivity properties of the model store.

use markov_obfuscate::markov::Model;
use pretty_assertions::assert_eq;

fn successor_table(model: &Model) -> Vec<(String, Vec<(String, u32)>)> {
    // The boundary sentinel participates in the table like any other vertex.
    let mut names: Vec<String> = std::iter::once("--terminate--".to_owned())
        .chain(model.tokens().map(str::to_owned))
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let successors = model
                .successors(&name)
                .expect("every learned token has successors")
                .map(|(text, count)| (text.to_owned(), count))
                .collect();
            (name, successors)
        })
        .collect()
}

#[test]
fn identical_training_yields_identical_successor_lists() {
    let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
    let mut first = Model::new(16).unwrap();
    first.learn_book(&corpus);
    let mut second = Model::new(16).unwrap();
    second.learn_book(&corpus);

    assert_eq!(successor_table(&first), successor_table(&second));
}

#[test]
fn sentence_order_does_not_change_counts() {
    let part_one = "the river crossed the town. a lantern burned low.";
    let part_two = "the town kept a lantern. the river ran dark.";

    let mut forward = Model::new(16).unwrap();
    forward.learn_book(&format!("{part_one} {part_two}"));
    let mut backward = Model::new(16).unwrap();
    backward.learn_book(&format!("{part_two} {part_one}"));

    assert_eq!(successor_table(&forward), successor_table(&backward));
}

#[test]
fn token_order_within_a_sentence_changes_counts() {
    let mut straight = Model::new(16).unwrap();
    straight.learn_sentence("one two three");
    let mut shuffled = Model::new(16).unwrap();
    shuffled.learn_sentence("one three two");

    assert_ne!(successor_table(&straight), successor_table(&shuffled));
}

#[test]
fn most_likely_sentence_is_nonempty_after_training() {
    let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
    let mut model = Model::new(16).unwrap();
    model.learn_book(&corpus);

    let sentence = model.most_likely_sentence();
    assert!(!sentence.is_empty());
    // Every word of it must be a learned token.
    for word in sentence.split(' ') {
        assert!(model.successors(word).is_some(), "unknown word {word}");
    }
}
