//! Remissive (keyword → positions) indexing over a single document.
//!
//! Text is split into positional tokens, grouped per word, and the words that
//! match a keyword list are loaded into either a 27-way character trie or an
//! open-addressed hash table. Both structures answer lookups and can be dumped
//! alphabetically or drawn as a tree.

pub mod error;
pub mod hash;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod occurrences;
pub mod report;
pub mod tokenizer;
pub mod trie;

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

pub use error::IndexError;
pub use hash::HashTable;
pub use index::{BuildSummary, HashIndex, IndexOptions, Keying, RemissiveIndex, TrieIndex};
pub use trie::Trie;

/// 1-based token position inside the source text.
pub type Position = u32;

/// Longest word (in bytes, including a terminator slot) a keyword may carry.
pub const MAX_WORD_SIZE: usize = 100;
/// Lower bound for the capacity of a freshly built hash index.
pub const INITIAL_HASH_SIZE: usize = 1023;
/// Upper bound on the text handed to the tokenizer by the loader.
pub const MAX_TEXT_SIZE: usize = 100_000;
pub const MAX_KEYWORDS: usize = 1000;

/// A word together with the positions it occupies. Used both for grouped
/// tokens and for the entries read back out of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordOccurrences {
    pub word: String,
    pub positions: Vec<Position>,
}

/// Byte-wise ASCII case-insensitive ordering (the `strcasecmp` ordering).
pub fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    let lhs = a.bytes().map(|b| b.to_ascii_lowercase());
    let rhs = b.bytes().map(|b| b.to_ascii_lowercase());
    lhs.cmp(rhs)
}

/// Drops empty keywords and case-insensitive repeats, keeping first occurrences.
pub(crate) fn distinct_keywords(keywords: &[String]) -> Vec<&str> {
    let mut seen: HashSet<String> = HashSet::with_capacity(keywords.len());
    keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| !kw.is_empty() && seen.insert(kw.to_ascii_lowercase()))
        .collect()
}
