//! Human-readable views over a built index. Every function returns the lines
//! to display; where they go is up to the caller.

use crate::hash::HashTable;
use crate::index::{HashIndex, RemissiveIndex, TrieIndex};
use crate::normalize::slot_char;
use crate::trie::{Trie, TrieNode};
use crate::{cmp_ignore_ascii_case, distinct_keywords, WordOccurrences};
use serde::Serialize;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";
pub const HASH_SAMPLE_SIZE: usize = 20;

/// Alphabetical contents of an index plus the keywords it did not find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub structure: &'static str,
    pub entries: Vec<WordOccurrences>,
    pub missing: Vec<String>,
}

pub fn not_built(structure: &str) -> String {
    format!("{structure} index has not been built yet.")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
}

/// Entries sorted case-insensitively (positions ascending) and the build-time
/// keywords the index cannot find, each named once. `None` when the index is not built.
///
/// A keyword counts as found when the structure's own lookup finds it, so
/// keywords that fold onto another keyword's entry are not reported missing.
pub fn listing(index: &dyn RemissiveIndex) -> Option<Listing> {
    let mut entries = index.entries()?;
    for entry in &mut entries {
        entry.positions.sort_unstable();
    }
    entries.sort_by(|a, b| cmp_ignore_ascii_case(&a.word, &b.word));
    let missing = distinct_keywords(index.keywords())
        .into_iter()
        .filter(|kw| index.search(kw).is_none())
        .map(str::to_string)
        .collect();
    Some(Listing { structure: index.name(), entries, missing })
}

pub fn listing_lines(listing: &Listing) -> Vec<String> {
    let mut lines = Vec::with_capacity(listing.entries.len() + listing.missing.len() + 1);
    lines.push(format!("=== {} index ===", listing.structure));
    for entry in &listing.entries {
        let positions: Vec<String> = entry.positions.iter().map(|p| p.to_string()).collect();
        lines.push(format!("{}: {}", entry.word, positions.join(", ")));
    }
    for keyword in &listing.missing {
        lines.push(format!("{keyword}: not found in text"));
    }
    lines
}

/// Pretty-printed JSON array of listings.
pub fn listings_json(listings: &[Listing]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(listings)
}

/// Alphabetical dump of `index`, or the not-built notice.
pub fn index_lines(index: &dyn RemissiveIndex) -> Vec<String> {
    match listing(index) {
        Some(listing) => listing_lines(&listing),
        None => vec![not_built(index.name())],
    }
}

pub fn trie_tree(index: &TrieIndex) -> Vec<String> {
    match index.trie() {
        Some(trie) => trie_tree_lines(trie),
        None => vec![not_built(index.name())],
    }
}

/// Prefix-art drawing of every node, children in slot order.
pub fn trie_tree_lines(trie: &Trie) -> Vec<String> {
    let mut lines = vec!["=== trie structure ===".to_string(), format!("{LAST_BRANCH}root")];
    // (node, slot it hangs from, indentation, is last sibling)
    let mut stack: Vec<(&TrieNode, usize, String, bool)> = Vec::new();
    push_children(&mut stack, trie.root(), GAP.to_string());
    while let Some((node, slot, prefix, last)) = stack.pop() {
        let glyph = node.glyph().unwrap_or_else(|| slot_char(slot));
        let mut line = format!("{prefix}{}{glyph}", if last { LAST_BRANCH } else { BRANCH });
        if node.is_terminal() {
            line.push_str(&format!(
                " -> {} ({})",
                node.original_word().unwrap_or_default(),
                plural(node.occurrences().len(), "occurrence")
            ));
        }
        lines.push(line);
        push_children(&mut stack, node, format!("{prefix}{}", if last { GAP } else { PIPE }));
    }
    lines
}

fn push_children<'a>(stack: &mut Vec<(&'a TrieNode, usize, String, bool)>, node: &'a TrieNode, prefix: String) {
    let children: Vec<(usize, &TrieNode)> = node.children().collect();
    let count = children.len();
    for (i, (slot, child)) in children.into_iter().enumerate().rev() {
        stack.push((child, slot, prefix.clone(), i + 1 == count));
    }
}

pub fn hash_tree(index: &HashIndex) -> Vec<String> {
    match index.table() {
        Some(table) => hash_tree_lines(table),
        None => vec![not_built(index.name())],
    }
}

/// One branch per word in alphabetical order, one leaf per position.
pub fn hash_tree_lines(table: &HashTable) -> Vec<String> {
    let noun = if table.len() == 1 { "entry" } else { "entries" };
    let mut lines = vec![
        "=== hash table tree ===".to_string(),
        format!("root [{} {noun} in {} slots]", table.len(), table.capacity()),
    ];
    let mut entries = table.get_all_words();
    entries.sort_by(|a, b| cmp_ignore_ascii_case(&a.word, &b.word));
    let count = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        let last = i + 1 == count;
        lines.push(format!(
            "{}{} ({})",
            if last { LAST_BRANCH } else { BRANCH },
            entry.word,
            plural(entry.positions.len(), "occurrence")
        ));
        let indent = if last { GAP } else { PIPE };
        let n = entry.positions.len();
        for (j, position) in entry.positions.iter().enumerate() {
            let branch = if j + 1 == n { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{indent}{branch}position {position}"));
        }
    }
    lines
}

pub fn hash_structure(index: &HashIndex) -> Vec<String> {
    match index.table() {
        Some(table) => hash_structure_lines(table),
        None => vec![not_built(index.name())],
    }
}

/// Slot usage, probe displacement histogram and a sample of occupied slots.
pub fn hash_structure_lines(table: &HashTable) -> Vec<String> {
    let stats = table.stats(HASH_SAMPLE_SIZE);
    let pct = |n: usize, of: usize| if of == 0 { 0.0 } else { n as f64 / of as f64 * 100.0 };
    let empty = stats.capacity - stats.occupied;

    let mut lines = vec![
        format!("=== hash table structure (capacity {}) ===", stats.capacity),
        format!("{BRANCH}occupied slots: {} ({:.1}%)", stats.occupied, pct(stats.occupied, stats.capacity)),
        format!("{LAST_BRANCH}empty slots: {} ({:.1}%)", empty, pct(empty, stats.capacity)),
        String::new(),
        "=== collisions ===".to_string(),
        format!(
            "home bucket: {} words ({:.1}%)",
            stats.displacement_counts[0],
            pct(stats.displacement_counts[0], stats.occupied)
        ),
    ];
    for (distance, &n) in stats.displacement_counts.iter().enumerate().skip(1) {
        if n > 0 {
            lines.push(format!("displaced by {distance}: {n} words ({:.1}%)", pct(n, stats.occupied)));
        }
    }
    lines.push(format!("total collisions: {} ({:.1}% of entries)", stats.collisions, pct(stats.collisions, stats.occupied)));
    lines.push(format!("load factor: {:.2}", stats.load_factor));
    lines.push(String::new());
    lines.push("=== slot sample ===".to_string());
    if stats.sample.is_empty() {
        lines.push("no entries in the hash table".to_string());
    }
    for s in &stats.sample {
        lines.push(format!(
            "[{}] -> {} (home {}, displacement {}, {})",
            s.slot,
            s.word,
            s.ideal,
            s.displacement,
            plural(s.occurrences, "occurrence")
        ));
    }
    lines
}
