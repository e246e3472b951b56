use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use remissive::loader::{load_keywords, load_text};
use remissive::report::{hash_structure, hash_tree, index_lines, listing, listings_json, not_built, trie_tree};
use remissive::{HashIndex, IndexOptions, Keying, Position, RemissiveIndex, TrieIndex, MAX_TEXT_SIZE};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a remissive index of keywords over a text with a trie or a hash table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print it alphabetically, followed by keywords not found
    Index {
        #[command(flatten)]
        source: Source,
        /// Emit the listing as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the index and draw its structure as a tree
    Tree {
        #[command(flatten)]
        source: Source,
    },
    /// Build the hash index and print slot usage and collision statistics
    Stats {
        #[command(flatten)]
        source: Source,
    },
    /// Build the index and look up a single word
    Search {
        #[command(flatten)]
        source: Source,
        /// Word to look up
        #[arg(long)]
        word: String,
        /// Emit the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct Source {
    /// Text file to index
    #[arg(long)]
    text: String,
    /// Keyword file (comma- or newline-separated)
    #[arg(long)]
    keywords: String,
    /// Structure(s) to build
    #[arg(long, value_enum, default_value_t = Structure::Both)]
    structure: Structure,
    /// Maximum number of bytes read from the text file
    #[arg(long, default_value_t = MAX_TEXT_SIZE)]
    max_text_bytes: usize,
    /// Keep trie occurrence lists sorted and free of repeats
    #[arg(long, default_value_t = false)]
    trie_dedupe: bool,
    /// Spelling the hash index stores words under
    #[arg(long, value_enum, default_value_t = HashKeying::Source)]
    hash_keying: HashKeying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Structure {
    Hash,
    Trie,
    Both,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HashKeying {
    Source,
    Keyword,
}

#[derive(Serialize)]
struct SearchResult<'a> {
    structure: &'static str,
    word: &'a str,
    positions: Option<&'a [Position]>,
}

struct Indexes {
    trie: Option<TrieIndex>,
    hash: Option<HashIndex>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { source, json } => {
            let indexes = build_indexes(&source, source.structure)?;
            if json {
                let listings: Vec<_> = indexes.all().filter_map(listing).collect();
                println!("{}", listings_json(&listings)?);
            } else {
                for index in indexes.all() {
                    print_lines(&index_lines(index));
                }
            }
        }
        Commands::Tree { source } => {
            let indexes = build_indexes(&source, source.structure)?;
            if let Some(hash) = &indexes.hash {
                print_lines(&hash_tree(hash));
            }
            if let Some(trie) = &indexes.trie {
                print_lines(&trie_tree(trie));
            }
        }
        Commands::Stats { source } => {
            let indexes = build_indexes(&source, stats_structure(source.structure)?)?;
            match &indexes.hash {
                Some(hash) => print_lines(&hash_structure(hash)),
                None => println!("{}", not_built("hash")),
            }
        }
        Commands::Search { source, word, json } => {
            let indexes = build_indexes(&source, source.structure)?;
            let results: Vec<SearchResult> = indexes
                .all()
                .map(|index| SearchResult { structure: index.name(), word: &word, positions: index.search(&word) })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }
            for r in &results {
                match r.positions {
                    Some(positions) => {
                        let joined: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
                        println!("[{}] {}: {}", r.structure, r.word, joined.join(", "));
                    }
                    None => println!("[{}] {}: not found", r.structure, r.word),
                }
            }
        }
    }
    Ok(())
}

impl Indexes {
    fn all(&self) -> impl Iterator<Item = &dyn RemissiveIndex> + '_ {
        let hash = self.hash.as_ref().map(|h| h as &dyn RemissiveIndex);
        let trie = self.trie.as_ref().map(|t| t as &dyn RemissiveIndex);
        hash.into_iter().chain(trie)
    }
}

/// Statistics exist only for the hash table, so only that structure is built.
fn stats_structure(requested: Structure) -> Result<Structure> {
    if requested == Structure::Trie {
        bail!("statistics are only available for the hash structure");
    }
    Ok(Structure::Hash)
}

fn build_indexes(source: &Source, structure: Structure) -> Result<Indexes> {
    let text = load_text(&source.text, source.max_text_bytes)?;
    let keywords = load_keywords(&source.keywords)?;
    tracing::info!(bytes = text.len(), keywords = keywords.len(), "inputs loaded");

    let mut indexes = Indexes { trie: None, hash: None };
    if matches!(structure, Structure::Hash | Structure::Both) {
        let keying = match source.hash_keying {
            HashKeying::Source => Keying::SourceWord,
            HashKeying::Keyword => Keying::Keyword,
        };
        let mut hash = HashIndex::with_options(IndexOptions { keying, ..IndexOptions::hash_default() });
        let summary = hash.build(&text, &keywords)?;
        tracing::info!(?summary, "hash index ready");
        indexes.hash = Some(hash);
    }
    if matches!(structure, Structure::Trie | Structure::Both) {
        let options = IndexOptions { dedupe_positions: source.trie_dedupe, ..IndexOptions::trie_default() };
        let mut trie = TrieIndex::with_options(options);
        let summary = trie.build(&text, &keywords)?;
        tracing::info!(?summary, "trie index ready");
        indexes.trie = Some(trie);
    }
    Ok(indexes)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_builds_only_the_hash_table() {
        assert_eq!(stats_structure(Structure::Both).unwrap(), Structure::Hash);
        assert_eq!(stats_structure(Structure::Hash).unwrap(), Structure::Hash);
        assert!(stats_structure(Structure::Trie).is_err());
    }

    #[test]
    fn hash_only_build_leaves_the_trie_out() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("text.txt");
        let keywords = dir.path().join("keywords.txt");
        std::fs::write(&text, "o gato e o cachorro").unwrap();
        std::fs::write(&keywords, "gato, rato").unwrap();
        let source = Source {
            text: text.display().to_string(),
            keywords: keywords.display().to_string(),
            structure: Structure::Both,
            max_text_bytes: MAX_TEXT_SIZE,
            trie_dedupe: false,
            hash_keying: HashKeying::Source,
        };
        let indexes = build_indexes(&source, stats_structure(source.structure).unwrap()).unwrap();
        assert!(indexes.trie.is_none());
        assert_eq!(indexes.hash.unwrap().search("gato"), Some(&[2][..]));
    }
}
