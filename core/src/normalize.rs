//! Character folding used to key the trie.
//!
//! Accented Latin letters fold to their base letter through canonical
//! decomposition, ASCII letters are lowercased and `-` is kept. Every other
//! character has no slot and is skipped by the trie walk.

use unicode_normalization::UnicodeNormalization;

/// 26 letters plus the hyphen.
pub const ALPHABET_SIZE: usize = 27;
pub const HYPHEN_SLOT: usize = 26;

pub fn normalize_char(c: char) -> Option<char> {
    if c == '-' {
        return Some('-');
    }
    if c.is_ascii() {
        return c.is_ascii_alphabetic().then(|| c.to_ascii_lowercase());
    }
    let base = std::iter::once(c).nfd().next()?;
    base.is_ascii_alphabetic().then(|| base.to_ascii_lowercase())
}

/// Child slot for an already normalized character.
pub fn slot_of(normalized: char) -> Option<usize> {
    match normalized {
        '-' => Some(HYPHEN_SLOT),
        'a'..='z' => Some(normalized as usize - 'a' as usize),
        _ => None,
    }
}

pub fn slot_index(c: char) -> Option<usize> {
    normalize_char(c).and_then(slot_of)
}

pub fn slot_char(slot: usize) -> char {
    if slot == HYPHEN_SLOT { '-' } else { (b'a' + slot as u8) as char }
}

/// The trie key of `word`: folded characters with unmapped ones dropped.
pub fn normalize_word(word: &str) -> String {
    word.chars().filter_map(normalize_char).collect()
}
