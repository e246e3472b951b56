use crate::{Position, WordOccurrences};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    // ASCII alphanumerics, hyphen, and any non-ASCII character.
    static ref RE: Regex = Regex::new(r"[0-9A-Za-z\-\x{80}-\x{10FFFF}]+").expect("valid regex");
}

/// A single occurrence of a word in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub position: Position,
}

/// Tokenize text into ASCII-lowercased words with 1-based positions, one record per occurrence.
/// No stopword removal and no stemming: every token is kept.
pub fn tokenize(text: &str) -> Vec<Token> {
    RE.find_iter(text)
        .zip(1..)
        .map(|(mat, position)| Token { word: mat.as_str().to_ascii_lowercase(), position })
        .collect()
}

/// Merge repeated words into one entry each, in order of first appearance.
pub fn group_occurrences(tokens: Vec<Token>) -> Vec<WordOccurrences> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<WordOccurrences> = Vec::new();
    for Token { word, position } in tokens {
        match slots.get(&word) {
            Some(&i) => grouped[i].positions.push(position),
            None => {
                slots.insert(word.clone(), grouped.len());
                grouped.push(WordOccurrences { word, positions: vec![position] });
            }
        }
    }
    grouped
}
