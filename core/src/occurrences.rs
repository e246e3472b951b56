use crate::error::IndexError;
use crate::Position;

pub const INITIAL_OCCURRENCE_CAPACITY: usize = 10;

/// Growable position list owned by a trie node or a hash slot.
///
/// Capacity starts at [`INITIAL_OCCURRENCE_CAPACITY`] and doubles when full.
/// Growth is fallible: on failure the list keeps its previous contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceList {
    positions: Vec<Position>,
}

impl Default for OccurrenceList {
    fn default() -> Self { Self::new() }
}

impl OccurrenceList {
    pub fn new() -> Self {
        Self { positions: Vec::with_capacity(INITIAL_OCCURRENCE_CAPACITY) }
    }

    pub fn len(&self) -> usize { self.positions.len() }
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }
    pub fn capacity(&self) -> usize { self.positions.capacity() }
    pub fn as_slice(&self) -> &[Position] { &self.positions }
    pub fn contains(&self, position: Position) -> bool { self.positions.contains(&position) }

    fn ensure_room(&mut self) -> Result<(), IndexError> {
        if self.positions.len() < self.positions.capacity() {
            return Ok(());
        }
        let additional = self.positions.capacity().max(INITIAL_OCCURRENCE_CAPACITY);
        self.positions
            .try_reserve_exact(additional)
            .map_err(|e| IndexError::allocation("occurrence list", e))
    }

    /// Appends without checking order or duplicates.
    pub fn push(&mut self, position: Position) -> Result<(), IndexError> {
        self.ensure_room()?;
        self.positions.push(position);
        Ok(())
    }

    /// Inserts keeping the list ascending; returns `false` if already present.
    /// Only meaningful on a list that has been filled exclusively through this method.
    pub fn insert_sorted_unique(&mut self, position: Position) -> Result<bool, IndexError> {
        let at = match self.positions.binary_search(&position) {
            Ok(_) => return Ok(false),
            Err(at) => at,
        };
        self.ensure_room()?;
        self.positions.insert(at, position);
        Ok(true)
    }
}
