//! Best score persistence
//!
//! The simulation only ever needs get/set of a single integer. Hosts plug in
//! whatever key-value store they have; a JSON file store is provided for the
//! native runner and an in-memory store for tests and ephemeral sessions.

pub mod file;

pub use file::JsonFileStore;

/// Key-value access to the persisted best score
pub trait BestScoreStore {
    /// Stored best score, `None` if never set
    fn best_score(&self) -> Option<u32>;

    /// Overwrite the stored best score
    fn set_best_score(&mut self, score: u32);
}

/// Volatile store, also counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u32>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best(score: u32) -> Self {
        Self {
            best: Some(score),
            writes: 0,
        }
    }

    /// Number of `set_best_score` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn best_score(&self) -> Option<u32> {
        self.best
    }

    fn set_best_score(&mut self, score: u32) {
        self.best = Some(score);
        self.writes += 1;
    }
}
