use criterion::{criterion_group, criterion_main, Criterion};
use remissive::tokenizer::tokenize;
use remissive::{HashIndex, RemissiveIndex, TrieIndex};

fn sample_text() -> String {
    let words = ["casa", "gato", "ação", "guarda-chuva", "rio", "café", "ponte", "árvore", "mar", "sol"];
    (0..20_000).map(|i| format!("{}{} ", words[i % words.len()], i % 97)).collect()
}

fn keywords() -> Vec<String> {
    (0..500).map(|i| format!("casa{}", i % 97)).chain((0..97).map(|i| format!("café{i}"))).collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("tokenize_20k", |b| b.iter(|| tokenize(&text)));
}

fn bench_build(c: &mut Criterion) {
    let text = sample_text();
    let keywords = keywords();
    c.bench_function("build_trie_20k", |b| b.iter(|| TrieIndex::new().build(&text, &keywords)));
    c.bench_function("build_hash_20k", |b| b.iter(|| HashIndex::new().build(&text, &keywords)));
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
