//! Wire-shape properties: join/split inversion on real encoded output.

use markov_obfuscate::markov::{
    BinaryFormatter, BookFormatter, Formatter, LyricsFormatter, Model, RandRng,
};
use pretty_assertions::assert_eq;
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn lyrics_split_then_join_restores_lines() {
    let text = "Test0 test1 test2\nTest3 test4 test5";
    assert_eq!(
        LyricsFormatter.join(&LyricsFormatter.split(text)),
        text
    );
}

#[test]
fn book_output_survives_split_and_join() {
    let corpus = std::fs::read_to_string("tests/files/journal.txt").unwrap();
    let mut model = Model::new(16).unwrap();
    model.learn_book(&corpus);

    let encoded = model
        .obfuscate_with(b"carrier pigeons", &mut RandRng(StdRng::seed_from_u64(11)))
        .unwrap();
    assert_eq!(
        BookFormatter.join(&BookFormatter.split(&encoded)),
        encoded
    );
}

#[test]
fn lyrics_output_survives_split_and_join() {
    let corpus = std::fs::read_to_string("tests/files/lyrics.txt").unwrap();
    let mut model = Model::with_formatter(16, LyricsFormatter).unwrap();
    model.learn_book(&corpus);

    let encoded = model
        .obfuscate_with(b"carrier pigeons", &mut RandRng(StdRng::seed_from_u64(12)))
        .unwrap();
    assert_eq!(
        LyricsFormatter.join(&LyricsFormatter.split(&encoded)),
        encoded
    );
}

#[test]
fn binary_output_survives_split_and_join() {
    let corpus = std::fs::read_to_string("tests/files/noise.txt").unwrap();
    let mut model = Model::with_formatter(16, BinaryFormatter).unwrap();
    model.learn_book(&corpus);

    let encoded = model
        .obfuscate_with(b"carrier pigeons", &mut RandRng(StdRng::seed_from_u64(13)))
        .unwrap();
    assert_eq!(
        BinaryFormatter.join(&BinaryFormatter.split(&encoded)),
        encoded
    );
}

#[test]
fn lyrics_output_reads_as_title_cased_lines() {
    let corpus = std::fs::read_to_string("tests/files/lyrics.txt").unwrap();
    let mut model = Model::with_formatter(16, LyricsFormatter).unwrap();
    model.learn_book(&corpus);

    let encoded = model
        .obfuscate_with(&[0x42; 16], &mut RandRng(StdRng::seed_from_u64(14)))
        .unwrap();
    for line in encoded.split('\n') {
        let Some(first) = line.chars().next() else {
            continue;
        };
        assert!(
            !first.is_lowercase(),
            "line must open title-cased: {line:?}"
        );
    }
}
