//! 27-way character trie keyed on folded characters.
//!
//! Each root-to-terminal path spells the normalized form of one indexed word.
//! The terminal node keeps the first spelling inserted for that key and its
//! occurrence list.

use crate::error::IndexError;
use crate::index::{IndexOptions, Keying};
use crate::normalize::{slot_index, ALPHABET_SIZE};
use crate::occurrences::OccurrenceList;
use crate::{cmp_ignore_ascii_case, distinct_keywords, Position, WordOccurrences};

#[derive(Debug)]
pub struct TrieNode {
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    terminal: bool,
    occurrences: OccurrenceList,
    original: Option<String>,
    /// Character consumed to reach this node, as it appeared in the first inserted word.
    glyph: Option<char>,
}

impl TrieNode {
    fn new(glyph: Option<char>) -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            terminal: false,
            occurrences: OccurrenceList::new(),
            original: None,
            glyph,
        }
    }

    pub fn is_terminal(&self) -> bool { self.terminal }
    pub fn glyph(&self) -> Option<char> { self.glyph }
    pub fn original_word(&self) -> Option<&str> { self.original.as_deref() }
    pub fn occurrences(&self) -> &[Position] { self.occurrences.as_slice() }

    /// Occupied child slots in slot order (a..z, then hyphen).
    pub fn children(&self) -> impl Iterator<Item = (usize, &TrieNode)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.as_deref().map(|c| (slot, c)))
    }
}

// Tear down with an explicit stack so deep keys cannot overflow the call stack.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TrieNode>> = self.children.iter_mut().filter_map(Option::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}

#[derive(Debug)]
pub struct Trie {
    root: Box<TrieNode>,
    dedupe_positions: bool,
    words: usize,
}

impl Default for Trie {
    fn default() -> Self { Self::new() }
}

impl Trie {
    pub fn new() -> Self { Self::with_dedupe(false) }

    /// With `dedupe_positions` the occurrence lists stay ascending and unique;
    /// otherwise positions are appended in arrival order.
    pub fn with_dedupe(dedupe_positions: bool) -> Self {
        Self { root: Box::new(TrieNode::new(None)), dedupe_positions, words: 0 }
    }

    pub fn root(&self) -> &TrieNode { &self.root }
    /// Number of terminal nodes.
    pub fn word_count(&self) -> usize { self.words }
    pub fn is_empty(&self) -> bool { self.words == 0 }

    /// Record `position` under the normalized key of `word`.
    ///
    /// Characters without a slot are skipped; a word made only of such
    /// characters is ignored. If the occurrence list cannot grow the error is
    /// returned and the trie is unchanged apart from any freshly created,
    /// non-terminal path nodes.
    pub fn insert(&mut self, word: &str, position: Position) -> Result<(), IndexError> {
        let mut node: &mut TrieNode = &mut self.root;
        let mut depth = 0usize;
        for c in word.chars() {
            let Some(slot) = slot_index(c) else { continue };
            node = node.children[slot].get_or_insert_with(|| Box::new(TrieNode::new(Some(c)))).as_mut();
            depth += 1;
        }
        if depth == 0 {
            tracing::debug!(word, "no indexable characters, skipping");
            return Ok(());
        }

        if self.dedupe_positions {
            node.occurrences.insert_sorted_unique(position)?;
        } else {
            node.occurrences.push(position)?;
        }
        if !node.terminal {
            node.terminal = true;
            self.words += 1;
        }
        if node.original.is_none() {
            node.original = Some(word.to_string());
        }
        Ok(())
    }

    /// Occurrences of `word` after folding, or `None` if no such word was indexed.
    pub fn search(&self, word: &str) -> Option<&[Position]> {
        let mut node: &TrieNode = &self.root;
        for c in word.chars() {
            let Some(slot) = slot_index(c) else { continue };
            node = node.children[slot].as_deref()?;
        }
        node.terminal.then(|| node.occurrences.as_slice())
    }

    /// Every indexed word with its occurrences, in depth-first slot order.
    ///
    /// The order follows the folded key, not the stored spelling; sort the
    /// result when alphabetical output by display form is needed.
    pub fn get_all_words(&self) -> Vec<WordOccurrences> {
        let mut out = Vec::with_capacity(self.words);
        let mut stack: Vec<&TrieNode> = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.terminal {
                out.push(WordOccurrences {
                    word: node.original.clone().unwrap_or_default(),
                    positions: node.occurrences.as_slice().to_vec(),
                });
            }
            let first = stack.len();
            stack.extend(node.children().map(|(_, child)| child));
            stack[first..].reverse();
        }
        out
    }

    /// Build a fresh trie holding the occurrences of every keyword found in `words`.
    ///
    /// `words` is sorted in place (case-insensitively) so each keyword can be
    /// located by binary search. Keywords with no match are simply absent.
    pub fn build_index(words: &mut [WordOccurrences], keywords: &[String], options: IndexOptions) -> Trie {
        sort_words(words);
        let mut trie = Trie::with_dedupe(options.dedupe_positions);
        for keyword in distinct_keywords(keywords) {
            let Some(i) = binary_search(words, keyword) else {
                tracing::debug!(keyword, "keyword not present in text");
                continue;
            };
            let key = match options.keying {
                Keying::Keyword => keyword,
                Keying::SourceWord => words[i].word.as_str(),
            };
            for &position in &words[i].positions {
                if let Err(err) = trie.insert(key, position) {
                    tracing::error!(%err, keyword = key, position, "dropping occurrence");
                }
            }
        }
        tracing::debug!(indexed = trie.word_count(), "trie index built");
        trie
    }
}

/// Stable case-insensitive sort by word.
pub fn sort_words(words: &mut [WordOccurrences]) {
    words.sort_by(|a, b| cmp_ignore_ascii_case(&a.word, &b.word));
}

/// Case-insensitive binary search over words sorted with [`sort_words`].
pub fn binary_search(sorted: &[WordOccurrences], target: &str) -> Option<usize> {
    sorted.binary_search_by(|w| cmp_ignore_ascii_case(&w.word, target)).ok()
}
