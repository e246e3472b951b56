use crate::{MAX_KEYWORDS, MAX_WORD_SIZE};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Read a UTF-8 text file, keeping at most `max_bytes` (cut on a character boundary).
pub fn load_text<P: AsRef<Path>>(path: P, max_bytes: usize) -> Result<String> {
    let path = path.as_ref();
    let mut text = fs::read_to_string(path).with_context(|| format!("reading text file {}", path.display()))?;
    if text.len() > max_bytes {
        let cut = floor_char_boundary(&text, max_bytes);
        tracing::warn!(path = %path.display(), bytes = text.len(), kept = cut, "text truncated");
        text.truncate(cut);
    }
    Ok(text)
}

/// Split a keyword list on newlines and commas.
///
/// Entries are trimmed of spaces and tabs, lowercased and clipped to
/// `MAX_WORD_SIZE - 1` bytes; empty entries are dropped and at most
/// `MAX_KEYWORDS` are kept. Repeats are left in place.
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .flat_map(|line| line.split(','))
        .map(|raw| raw.trim_matches(|c| c == ' ' || c == '\t' || c == '\r'))
        .filter(|kw| !kw.is_empty())
        .map(|kw| {
            let kw = kw.to_lowercase();
            let cut = floor_char_boundary(&kw, MAX_WORD_SIZE - 1);
            kw[..cut].to_string()
        })
        .take(MAX_KEYWORDS)
        .collect()
}

pub fn load_keywords<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("reading keyword file {}", path.display()))?;
    let keywords = parse_keywords(&content);
    if keywords.is_empty() {
        bail!("keyword file {} is empty or contains only whitespace", path.display());
    }
    tracing::debug!(count = keywords.len(), "keywords loaded");
    Ok(keywords)
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
