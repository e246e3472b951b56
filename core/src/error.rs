use std::collections::TryReserveError;
use thiserror::Error;

/// Recoverable failures of the index structures. A structure that returns one
/// of these is left in its last consistent state.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to grow {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
    #[error("hash table is full ({capacity} slots), cannot place {word:?}")]
    TableFull { word: String, capacity: usize },
    #[error("text contains no indexable words")]
    NothingToIndex,
}

impl IndexError {
    pub(crate) fn allocation(what: &'static str, source: TryReserveError) -> Self {
        IndexError::Allocation { what, source }
    }
}
