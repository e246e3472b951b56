//! Open-addressed hash table from case-insensitive word to occurrence list.
//!
//! FNV-1a over the ASCII-lowercased bytes picks the home bucket, collisions
//! probe linearly with wraparound, and the table grows to `2 * capacity + 1`
//! before an insert would push the load factor past [`MAX_LOAD_FACTOR`].

use crate::error::IndexError;
use crate::index::{IndexOptions, Keying};
use crate::occurrences::OccurrenceList;
use crate::{distinct_keywords, Position, WordOccurrences, INITIAL_HASH_SIZE};

pub const MAX_LOAD_FACTOR: f64 = 0.7;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a of the ASCII-lowercased bytes of `word`.
pub fn fnv1a(word: &str) -> u32 {
    word.bytes().fold(FNV_OFFSET_BASIS, |hash, b| (hash ^ u32::from(b.to_ascii_lowercase())).wrapping_mul(FNV_PRIME))
}

/// Home bucket of `word` in a table of `capacity` slots.
pub fn bucket(word: &str, capacity: usize) -> usize {
    fnv1a(word) as usize % capacity
}

#[derive(Debug, Clone)]
pub struct HashEntry {
    word: String,
    occurrences: OccurrenceList,
}

impl HashEntry {
    pub fn word(&self) -> &str { &self.word }
    pub fn occurrences(&self) -> &[Position] { self.occurrences.as_slice() }
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Full,
}

#[derive(Debug, Clone)]
pub struct HashTable {
    slots: Vec<Option<HashEntry>>,
    occupied: usize,
    dedupe_positions: bool,
}

impl HashTable {
    /// Table with `size` empty slots (at least one) that keeps positions sorted and unique.
    pub fn create(size: usize) -> Self {
        Self::with_dedupe(size, true)
    }

    /// Without `dedupe_positions`, positions are appended in arrival order.
    pub fn with_dedupe(size: usize, dedupe_positions: bool) -> Self {
        let mut slots = Vec::with_capacity(size.max(1));
        slots.resize_with(size.max(1), || None);
        Self { slots, occupied: 0, dedupe_positions }
    }

    pub fn capacity(&self) -> usize { self.slots.len() }
    pub fn len(&self) -> usize { self.occupied }
    pub fn is_empty(&self) -> bool { self.occupied == 0 }
    pub fn load_factor(&self) -> f64 { self.occupied as f64 / self.capacity() as f64 }

    fn probe(&self, word: &str) -> Probe {
        let capacity = self.capacity();
        let start = bucket(word, capacity);
        for step in 0..capacity {
            let i = (start + step) % capacity;
            match &self.slots[i] {
                None => return Probe::Vacant(i),
                Some(entry) if entry.word.eq_ignore_ascii_case(word) => return Probe::Found(i),
                Some(_) => {}
            }
        }
        Probe::Full
    }

    /// Rehash into `2 * capacity + 1` slots. On failure the table is left as it was.
    pub fn resize(&mut self) -> Result<(), IndexError> {
        let new_capacity = self.capacity() * 2 + 1;
        let mut taken = Vec::new();
        taken.try_reserve_exact(new_capacity).map_err(|e| IndexError::allocation("hash table", e))?;
        taken.resize(new_capacity, false);

        // Plan every move first so an exhausted probe leaves the old slots intact.
        let mut moves = Vec::with_capacity(self.occupied);
        for (from, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot else { continue };
            let start = bucket(&entry.word, new_capacity);
            let to = (0..new_capacity)
                .map(|step| (start + step) % new_capacity)
                .find(|&i| !taken[i])
                .ok_or_else(|| IndexError::TableFull { word: entry.word.clone(), capacity: new_capacity })?;
            taken[to] = true;
            moves.push((from, to));
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(new_capacity).map_err(|e| IndexError::allocation("hash table", e))?;
        slots.resize_with(new_capacity, || None);
        for (from, to) in moves {
            slots[to] = self.slots[from].take();
        }
        tracing::debug!(from = self.capacity(), to = new_capacity, entries = self.occupied, "hash table resized");
        self.slots = slots;
        Ok(())
    }

    /// Slot holding `word`, creating an empty entry if needed.
    fn insert_word(&mut self, word: &str) -> Result<usize, IndexError> {
        if let Probe::Found(i) = self.probe(word) {
            return Ok(i);
        }
        while (self.occupied + 1) as f64 > self.capacity() as f64 * MAX_LOAD_FACTOR {
            self.resize()?;
        }
        match self.probe(word) {
            Probe::Found(i) => Ok(i),
            Probe::Vacant(i) => {
                self.slots[i] = Some(HashEntry { word: word.to_string(), occurrences: OccurrenceList::new() });
                self.occupied += 1;
                Ok(i)
            }
            Probe::Full => Err(IndexError::TableFull { word: word.to_string(), capacity: self.capacity() }),
        }
    }

    /// Record `position` for `word`. The first spelling seen for a word is the one kept.
    /// An empty word is ignored.
    pub fn insert(&mut self, word: &str, position: Position) -> Result<(), IndexError> {
        if word.is_empty() {
            return Ok(());
        }
        let i = self.insert_word(word)?;
        let dedupe = self.dedupe_positions;
        if let Some(entry) = self.slots[i].as_mut() {
            if dedupe {
                entry.occurrences.insert_sorted_unique(position)?;
            } else {
                entry.occurrences.push(position)?;
            }
        }
        Ok(())
    }

    pub fn get(&self, word: &str) -> Option<&HashEntry> {
        match self.probe(word) {
            Probe::Found(i) => self.slots[i].as_ref(),
            _ => None,
        }
    }

    pub fn search(&self, word: &str) -> Option<&[Position]> {
        self.get(word).map(HashEntry::occurrences)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Occupied slots with their index, in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &HashEntry)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    pub fn get_all_words(&self) -> Vec<WordOccurrences> {
        self.slots()
            .map(|(_, e)| WordOccurrences { word: e.word.clone(), positions: e.occurrences().to_vec() })
            .collect()
    }

    /// Build a fresh table holding the occurrences of every source word that is a keyword.
    ///
    /// Keyword membership is tested through a transient table of the keywords.
    pub fn build_index(words: &[WordOccurrences], keywords: &[String], options: IndexOptions) -> HashTable {
        let mut table = HashTable::with_dedupe((keywords.len() * 2).max(INITIAL_HASH_SIZE), options.dedupe_positions);

        let mut keyword_set = HashTable::create(keywords.len() * 2);
        for keyword in distinct_keywords(keywords) {
            if let Err(err) = keyword_set.insert_word(keyword) {
                tracing::error!(%err, keyword, "keyword skipped");
            }
        }

        for occ in words.iter().filter(|w| !w.word.is_empty()) {
            let Some(keyword) = keyword_set.get(&occ.word) else { continue };
            let key = match options.keying {
                Keying::SourceWord => occ.word.as_str(),
                Keying::Keyword => keyword.word(),
            };
            for &position in &occ.positions {
                if let Err(err) = table.insert(key, position) {
                    tracing::error!(%err, word = key, position, "dropping occurrence");
                }
            }
        }
        drop(keyword_set);

        tracing::debug!(indexed = table.len(), capacity = table.capacity(), "hash index built");
        table
    }

    /// Occupancy and probe-displacement figures for the current layout.
    pub fn stats(&self, sample_size: usize) -> HashStats {
        let capacity = self.capacity();
        let mut displacement_counts = vec![0usize; capacity];
        let mut sample = Vec::new();
        for (slot, entry) in self.slots() {
            let ideal = bucket(&entry.word, capacity);
            let displacement = (slot + capacity - ideal) % capacity;
            displacement_counts[displacement] += 1;
            if sample.len() < sample_size {
                sample.push(SlotSample {
                    slot,
                    word: entry.word.clone(),
                    ideal,
                    displacement,
                    occurrences: entry.occurrences.len(),
                });
            }
        }
        let max_displacement = displacement_counts.iter().rposition(|&n| n > 0).unwrap_or(0);
        displacement_counts.truncate(max_displacement + 1);
        HashStats {
            capacity,
            occupied: self.occupied,
            collisions: self.occupied - displacement_counts[0],
            displacement_counts,
            load_factor: self.load_factor(),
            sample,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashStats {
    pub capacity: usize,
    pub occupied: usize,
    /// Entries not sitting in their home bucket.
    pub collisions: usize,
    /// `displacement_counts[d]` entries sit `d` slots past their home bucket.
    pub displacement_counts: Vec<usize>,
    pub load_factor: f64,
    pub sample: Vec<SlotSample>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSample {
    pub slot: usize,
    pub word: String,
    pub ideal: usize,
    pub displacement: usize,
    pub occurrences: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
        assert_eq!(fnv1a("foobar"), 0xbf9c_f968);
        assert_eq!(fnv1a("FooBar"), fnv1a("foobar"));
    }

    #[test]
    fn lookups_ignore_case_and_keep_first_spelling() {
        let mut table = HashTable::create(16);
        table.insert("Casa", 1).unwrap();
        table.insert("CASA", 4).unwrap();
        assert_eq!(table.search("casa"), Some(&[1, 4][..]));
        assert_eq!(table.search("CASA"), table.search("Casa"));
        assert_eq!(table.get("casa").map(HashEntry::word), Some("Casa"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.search("caso"), None);
    }

    #[test]
    fn empty_word_is_ignored() {
        let mut table = HashTable::create(4);
        table.insert("", 1).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.search(""), None);
    }

    #[test]
    fn positions_sorted_and_unique() {
        let mut table = HashTable::create(16);
        for p in [9, 2, 5, 2, 9, 1] {
            table.insert("rio", p).unwrap();
        }
        assert_eq!(table.search("rio"), Some(&[1, 2, 5, 9][..]));
    }

    #[test]
    fn grows_before_exceeding_load_factor() {
        let mut table = HashTable::create(4);
        table.insert("um", 1).unwrap();
        table.insert("dois", 2).unwrap();
        assert_eq!(table.capacity(), 4);
        table.insert("tres", 3).unwrap();
        assert_eq!(table.capacity(), 9);

        // re-inserting a known word never grows the table
        for p in 10..40 {
            table.insert("um", p).unwrap();
        }
        assert_eq!(table.capacity(), 9);
    }

    #[test]
    fn resize_keeps_every_word() {
        let mut table = HashTable::create(1);
        for i in 0..500u32 {
            let word = format!("w{i}");
            table.insert(&word, i + 1).unwrap();
            table.insert(&word, i + 1000).unwrap();
            assert!(table.load_factor() <= MAX_LOAD_FACTOR);
        }
        assert_eq!(table.len(), 500);
        for i in 0..500u32 {
            assert_eq!(table.search(&format!("W{i}")), Some(&[i + 1, i + 1000][..]));
        }
    }

    #[test]
    fn explicit_resize_doubles_plus_one() {
        let mut table = HashTable::create(5);
        table.insert("a", 1).unwrap();
        table.insert("b", 2).unwrap();
        table.resize().unwrap();
        assert_eq!(table.capacity(), 11);
        assert_eq!(table.search("a"), Some(&[1][..]));
        assert_eq!(table.search("b"), Some(&[2][..]));
    }

    #[test]
    fn build_keeps_source_spelling_and_filters_non_keywords() {
        let words = vec![
            WordOccurrences { word: "o".into(), positions: vec![1, 4] },
            WordOccurrences { word: "gato".into(), positions: vec![2] },
            WordOccurrences { word: "e".into(), positions: vec![3] },
            WordOccurrences { word: "cachorro".into(), positions: vec![5] },
        ];
        let keywords = vec!["GATO".to_string(), "rato".to_string(), String::new()];
        let table = HashTable::build_index(&words, &keywords, IndexOptions::hash_default());
        assert_eq!(table.capacity(), INITIAL_HASH_SIZE);
        assert_eq!(table.get_all_words(), vec![WordOccurrences { word: "gato".into(), positions: vec![2] }]);
        assert!(!table.contains("o"));
        assert!(!table.contains("rato"));

        let rekeyed = HashTable::build_index(&words, &keywords, IndexOptions { keying: Keying::Keyword, ..IndexOptions::hash_default() });
        assert_eq!(rekeyed.get("gato").map(HashEntry::word), Some("GATO"));
    }

    #[test]
    fn stats_report_displacement() {
        let mut table = HashTable::create(7);
        let words = ["alfa", "beta", "gama", "delta"];
        for (i, w) in words.iter().enumerate() {
            table.insert(w, i as Position + 1).unwrap();
        }
        let stats = table.stats(20);
        assert_eq!(stats.occupied, 4);
        assert_eq!(stats.capacity, table.capacity());
        assert_eq!(stats.displacement_counts.iter().sum::<usize>(), 4);
        assert_eq!(stats.collisions, 4 - stats.displacement_counts[0]);
        assert_eq!(stats.sample.len(), 4);
        for s in &stats.sample {
            assert_eq!(s.ideal, bucket(&s.word, stats.capacity));
        }
    }

    #[test]
    fn stats_on_empty_table() {
        let stats = HashTable::create(3).stats(20);
        assert_eq!(stats.occupied, 0);
        assert_eq!(stats.collisions, 0);
        assert_eq!(stats.displacement_counts, vec![0]);
    }
}
