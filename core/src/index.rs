use crate::error::IndexError;
use crate::hash::HashTable;
use crate::tokenizer::{group_occurrences, tokenize};
use crate::trie::Trie;
use crate::{distinct_keywords, Position, WordOccurrences};

/// Which spelling an indexed word is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keying {
    /// The keyword as given in the keyword list.
    Keyword,
    /// The word as it appears in the tokenized text.
    SourceWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    pub dedupe_positions: bool,
    pub keying: Keying,
}

impl IndexOptions {
    /// Positions appended as they arrive, stored under the keyword spelling.
    pub fn trie_default() -> Self { Self { dedupe_positions: false, keying: Keying::Keyword } }
    /// Positions sorted and unique, stored under the source spelling.
    pub fn hash_default() -> Self { Self { dedupe_positions: true, keying: Keying::SourceWord } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub tokens: usize,
    pub distinct_words: usize,
    pub keywords: usize,
    pub indexed_words: usize,
}

/// Common surface of the trie and hash indexes.
pub trait RemissiveIndex {
    fn name(&self) -> &'static str;
    fn is_built(&self) -> bool;
    /// Replace any previous index with one built from `text` and `keywords`.
    /// If `text` has no tokens the previous index is kept and an error returned.
    fn build(&mut self, text: &str, keywords: &[String]) -> Result<BuildSummary, IndexError>;
    fn search(&self, word: &str) -> Option<&[Position]>;
    /// Every indexed word with its positions, in structure order; `None` when not built.
    fn entries(&self) -> Option<Vec<WordOccurrences>>;
    /// Keyword list recorded at build time.
    fn keywords(&self) -> &[String];
    /// Drop the built structure and its snapshot. Safe to call repeatedly.
    fn destroy(&mut self);
}

/// Text, keywords and grouped words copied in at build time, private to one index.
#[derive(Debug, Default)]
struct Snapshot {
    text: String,
    keywords: Vec<String>,
    words: Vec<WordOccurrences>,
}

impl Snapshot {
    fn take(text: &str, keywords: &[String]) -> Result<(Self, usize), IndexError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(IndexError::NothingToIndex);
        }
        let count = tokens.len();
        let snapshot = Snapshot { text: text.to_string(), keywords: keywords.to_vec(), words: group_occurrences(tokens) };
        Ok((snapshot, count))
    }

    fn summary(&self, tokens: usize, indexed_words: usize) -> BuildSummary {
        BuildSummary {
            tokens,
            distinct_words: self.words.len(),
            keywords: distinct_keywords(&self.keywords).len(),
            indexed_words,
        }
    }
}

#[derive(Debug)]
pub struct TrieIndex {
    options: IndexOptions,
    snapshot: Snapshot,
    trie: Option<Trie>,
}

impl Default for TrieIndex {
    fn default() -> Self { Self::new() }
}

impl TrieIndex {
    pub fn new() -> Self { Self::with_options(IndexOptions::trie_default()) }
    pub fn with_options(options: IndexOptions) -> Self {
        Self { options, snapshot: Snapshot::default(), trie: None }
    }
    pub fn options(&self) -> IndexOptions { self.options }
    pub fn trie(&self) -> Option<&Trie> { self.trie.as_ref() }
    pub fn text(&self) -> &str { &self.snapshot.text }
}

impl RemissiveIndex for TrieIndex {
    fn name(&self) -> &'static str { "trie" }
    fn is_built(&self) -> bool { self.trie.is_some() }

    fn build(&mut self, text: &str, keywords: &[String]) -> Result<BuildSummary, IndexError> {
        let (mut snapshot, tokens) = Snapshot::take(text, keywords)?;
        self.destroy();
        let trie = Trie::build_index(&mut snapshot.words, &snapshot.keywords, self.options);
        let summary = snapshot.summary(tokens, trie.word_count());
        tracing::info!(tokens, indexed = summary.indexed_words, "trie index created");
        self.snapshot = snapshot;
        self.trie = Some(trie);
        Ok(summary)
    }

    fn search(&self, word: &str) -> Option<&[Position]> {
        self.trie.as_ref()?.search(word)
    }

    fn entries(&self) -> Option<Vec<WordOccurrences>> {
        self.trie.as_ref().map(Trie::get_all_words)
    }

    fn keywords(&self) -> &[String] { &self.snapshot.keywords }

    fn destroy(&mut self) {
        self.trie = None;
        self.snapshot = Snapshot::default();
    }
}

#[derive(Debug)]
pub struct HashIndex {
    options: IndexOptions,
    snapshot: Snapshot,
    table: Option<HashTable>,
}

impl Default for HashIndex {
    fn default() -> Self { Self::new() }
}

impl HashIndex {
    pub fn new() -> Self { Self::with_options(IndexOptions::hash_default()) }
    pub fn with_options(options: IndexOptions) -> Self {
        Self { options, snapshot: Snapshot::default(), table: None }
    }
    pub fn options(&self) -> IndexOptions { self.options }
    pub fn table(&self) -> Option<&HashTable> { self.table.as_ref() }
    pub fn text(&self) -> &str { &self.snapshot.text }
}

impl RemissiveIndex for HashIndex {
    fn name(&self) -> &'static str { "hash" }
    fn is_built(&self) -> bool { self.table.is_some() }

    fn build(&mut self, text: &str, keywords: &[String]) -> Result<BuildSummary, IndexError> {
        let (snapshot, tokens) = Snapshot::take(text, keywords)?;
        self.destroy();
        let table = HashTable::build_index(&snapshot.words, &snapshot.keywords, self.options);
        let summary = snapshot.summary(tokens, table.len());
        tracing::info!(tokens, indexed = summary.indexed_words, "hash index created");
        self.snapshot = snapshot;
        self.table = Some(table);
        Ok(summary)
    }

    fn search(&self, word: &str) -> Option<&[Position]> {
        self.table.as_ref()?.search(word)
    }

    fn entries(&self) -> Option<Vec<WordOccurrences>> {
        self.table.as_ref().map(HashTable::get_all_words)
    }

    fn keywords(&self) -> &[String] { &self.snapshot.keywords }

    fn destroy(&mut self) {
        self.table = None;
        self.snapshot = Snapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn both_indexes_agree_on_the_sample() {
        let keywords = kws(&["gato", "rato"]);
        let mut trie = TrieIndex::new();
        let mut hash = HashIndex::new();
        let ts = trie.build("o gato e o cachorro", &keywords).unwrap();
        let hs = hash.build("o gato e o cachorro", &keywords).unwrap();
        assert_eq!(ts, BuildSummary { tokens: 5, distinct_words: 4, keywords: 2, indexed_words: 1 });
        assert_eq!(ts, hs);
        let indexes: [&dyn RemissiveIndex; 2] = [&trie, &hash];
        for index in indexes {
            assert_eq!(index.search("gato"), Some(&[2][..]));
            assert_eq!(index.search("rato"), None);
            assert_eq!(index.search("o"), None);
        }
    }

    #[test]
    fn rebuilding_replaces_previous_index() {
        let mut hash = HashIndex::new();
        hash.build("sol e lua", &kws(&["sol"])).unwrap();
        hash.build("lua cheia", &kws(&["lua"])).unwrap();
        assert_eq!(hash.search("sol"), None);
        assert_eq!(hash.search("lua"), Some(&[1][..]));
        assert_eq!(hash.keywords(), &kws(&["lua"])[..]);
        assert_eq!(hash.text(), "lua cheia");
    }

    #[test]
    fn empty_text_keeps_previous_index() {
        let mut trie = TrieIndex::new();
        trie.build("sol", &kws(&["sol"])).unwrap();
        assert!(matches!(trie.build("  ...  ", &kws(&["sol"])), Err(IndexError::NothingToIndex)));
        assert!(trie.is_built());
        assert_eq!(trie.search("sol"), Some(&[1][..]));
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut trie = TrieIndex::new();
        let mut hash = HashIndex::new();
        trie.destroy();
        hash.destroy();
        trie.build("a b", &kws(&["a"])).unwrap();
        hash.build("a b", &kws(&["a"])).unwrap();
        trie.destroy();
        trie.destroy();
        hash.destroy();
        hash.destroy();
        assert!(!trie.is_built() && !hash.is_built());
        assert!(trie.entries().is_none() && hash.entries().is_none());
        assert!(trie.keywords().is_empty());
    }

    #[test]
    fn structures_do_not_share_state() {
        let keywords = kws(&["casa"]);
        let mut trie = TrieIndex::new();
        let mut hash = HashIndex::new();
        trie.build("casa casa", &keywords).unwrap();
        hash.build("casa casa", &keywords).unwrap();
        hash.destroy();
        assert_eq!(trie.search("casa"), Some(&[1, 2][..]));
    }

    #[test]
    fn options_toggle_dedupe_and_keying() {
        let options = IndexOptions { dedupe_positions: true, keying: Keying::SourceWord };
        let mut trie = TrieIndex::with_options(options);
        trie.build("Rio rio", &kws(&["RIO"])).unwrap();
        assert_eq!(trie.entries().unwrap(), vec![WordOccurrences { word: "rio".into(), positions: vec![1, 2] }]);
        assert_eq!(trie.options(), options);
    }
}
