//! Token formatters: how corpora are split for learning and how emitted token
//! lists appear on the wire.
//!
//! A [`Formatter`] bundles the five operations the codec is parameterized over.
//! Both parties must use the same formatter, since tokenization decides what the
//! model learns and `join`/`split` must invert each other across the wire.

use std::sync::LazyLock;

use regex::Regex;

/// One word character followed by word or apostrophe characters.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']*").expect("word pattern compiles"));

/// Splitting and joining rules shared by a sender and a receiver.
///
/// `split` must invert `join` for any token list the encoder emits:
/// `split(&join(tokens))` yields `tokens` again (with the sentence terminator
/// still in its visible spelling).
pub trait Formatter {
    /// Splits a training corpus into sentences.
    fn split_sentences<'a>(&self, corpus: &'a str) -> Vec<&'a str>;

    /// Splits one sentence into learnable tokens.
    fn split_tokens(&self, sentence: &str) -> Vec<String>;

    /// The visible stand-in for the sentence boundary state in encoded output.
    fn terminator(&self) -> &'static str;

    /// Renders an emitted token list as one transmissible string.
    fn join(&self, tokens: &[String]) -> String;

    /// Inverse of [`Formatter::join`] for strings produced by it.
    fn split(&self, encoded: &str) -> Vec<String>;
}

/// Prose formatter: sentences end in periods, tokens are lowercased words.
///
/// This is the default. Sentences split on newlines or periods; tokens are
/// word runs (letters, digits, underscores, interior apostrophes) after
/// lowercasing; output joins with single spaces and uses `"."` where a
/// sentence boundary falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookFormatter;

impl Formatter for BookFormatter {
    fn split_sentences<'a>(&self, corpus: &'a str) -> Vec<&'a str> {
        corpus.split(['\n', '.']).collect()
    }

    fn split_tokens(&self, sentence: &str) -> Vec<String> {
        let lowered = sentence.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|word| word.as_str().to_owned())
            .collect()
    }

    fn terminator(&self) -> &'static str {
        "."
    }

    fn join(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }

    fn split(&self, encoded: &str) -> Vec<String> {
        encoded.split(' ').map(str::to_owned).collect()
    }
}

/// Lyrics formatter: encoded output reads as sung lines.
///
/// Learns exactly like [`BookFormatter`], but sentence boundaries appear as
/// newlines and every line start is title-cased on join. `split` lowercases
/// and peels embedded newlines back out into standalone tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LyricsFormatter;

impl Formatter for LyricsFormatter {
    fn split_sentences<'a>(&self, corpus: &'a str) -> Vec<&'a str> {
        BookFormatter.split_sentences(corpus)
    }

    fn split_tokens(&self, sentence: &str) -> Vec<String> {
        BookFormatter.split_tokens(sentence)
    }

    fn terminator(&self) -> &'static str {
        "\n"
    }

    fn join(&self, tokens: &[String]) -> String {
        let Some((first, rest)) = tokens.split_first() else {
            return String::new();
        };
        let mut out = title_case(first);
        let mut previous = first.as_str();
        for part in rest {
            if part == "\n" || previous == "\n" {
                out.push_str(&title_case(part));
            } else {
                out.push(' ');
                out.push_str(part);
            }
            previous = part;
        }
        out
    }

    fn split(&self, encoded: &str) -> Vec<String> {
        let mut parts = Vec::new();
        for word in encoded.split(' ') {
            let mut word = word.to_lowercase();
            while let Some(at) = word.find('\n') {
                if at > 0 {
                    parts.push(word[..at].to_owned());
                }
                parts.push("\n".to_owned());
                word = word.split_off(at + 1);
            }
            parts.push(word);
        }
        parts
    }
}

/// Byte-level formatter: every character is a token.
///
/// Sentences split on NUL, which also serves as the visible terminator; join
/// is plain concatenation. Useful when the shared corpus is not prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryFormatter;

impl Formatter for BinaryFormatter {
    fn split_sentences<'a>(&self, corpus: &'a str) -> Vec<&'a str> {
        corpus.split('\0').collect()
    }

    fn split_tokens(&self, sentence: &str) -> Vec<String> {
        sentence.chars().map(String::from).collect()
    }

    fn terminator(&self) -> &'static str {
        "\0"
    }

    fn join(&self, tokens: &[String]) -> String {
        tokens.concat()
    }

    fn split(&self, encoded: &str) -> Vec<String> {
        encoded.chars().map(String::from).collect()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
