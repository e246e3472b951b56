use remissive::loader::{load_keywords, load_text};
use remissive::{HashIndex, RemissiveIndex};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_files_and_builds() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("texto.txt");
    let kw_path = dir.path().join("keywords.txt");
    fs::write(&text_path, "O rato roeu a roupa do rei de Roma.").unwrap();
    fs::write(&kw_path, "rato, rei\nroma\n\ncastelo\n").unwrap();

    let text = load_text(&text_path, 100_000).unwrap();
    let keywords = load_keywords(&kw_path).unwrap();
    assert_eq!(keywords, vec!["rato", "rei", "roma", "castelo"]);

    let mut hash = HashIndex::new();
    hash.build(&text, &keywords).unwrap();
    assert_eq!(hash.search("roma"), Some(&[9][..]));
}

#[test]
fn text_is_truncated_on_char_boundary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.txt");
    fs::write(&path, "aéb").unwrap();
    assert_eq!(load_text(&path, 2).unwrap(), "a");
    assert_eq!(load_text(&path, 3).unwrap(), "aé");
}

#[test]
fn blank_keyword_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("k.txt");
    fs::write(&path, "  \n\t\n , ,\n").unwrap();
    assert!(load_keywords(&path).is_err());
    assert!(load_keywords(dir.path().join("missing.txt")).is_err());
}
