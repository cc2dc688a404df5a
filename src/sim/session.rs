//! Score and session state machine
//!
//! `Ready -> Active -> GameOver -> Active -> ...`

use serde::{Deserialize, Serialize};

use crate::persistence::BestScoreStore;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Scene not started yet
    Ready,
    /// Obstacles spawning, player flying
    Active,
    /// Run ended, everything frozen until the next tap
    GameOver,
}

/// Result of ending a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub best_score: u32,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub current_score: u32,
    pub is_over: bool,
    /// Best score across sessions, never decreases
    pub best_score: u32,
    /// Last finished session beat the previous best
    pub new_high_score: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Ready,
            current_score: 0,
            is_over: false,
            best_score: 0,
            new_high_score: false,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Load the persisted best score; absent counts as zero
    pub fn load_best<S: BestScoreStore + ?Sized>(&mut self, store: &S) {
        self.best_score = self.best_score.max(store.best_score().unwrap_or(0));
    }

    /// Ready/GameOver -> Active with a clean score
    pub fn begin(&mut self) {
        self.phase = Phase::Active;
        self.current_score = 0;
        self.is_over = false;
        self.new_high_score = false;
    }

    /// Add one point. Ignored unless active.
    pub fn add_point(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.current_score += 1;
        true
    }

    /// Active -> GameOver. Persists the best score if strictly beaten.
    ///
    /// Returns `None` if the session was not active, so a second contact in
    /// the same tick never writes the store twice.
    pub fn finish<S: BestScoreStore + ?Sized>(&mut self, store: &mut S) -> Option<SessionSummary> {
        if !self.is_active() {
            return None;
        }

        self.phase = Phase::GameOver;
        self.is_over = true;

        let previous_best = store.best_score().unwrap_or(0).max(self.best_score);
        self.new_high_score = self.current_score > previous_best;
        if self.new_high_score {
            self.best_score = self.current_score;
            store.set_best_score(self.current_score);
        } else {
            self.best_score = previous_best;
        }

        Some(SessionSummary {
            score: self.current_score,
            best_score: self.best_score,
            new_high_score: self.new_high_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn active_with(score: u32, store: &MemoryStore) -> SessionState {
        let mut session = SessionState::new();
        session.load_best(store);
        session.begin();
        session.current_score = score;
        session
    }

    #[test]
    fn test_beating_best_persists() {
        let mut store = MemoryStore::with_best(3);
        let mut session = active_with(4, &store);

        let summary = session.finish(&mut store).unwrap();
        assert!(summary.new_high_score);
        assert_eq!(session.best_score, 4);
        assert_eq!(store.best_score(), Some(4));
        assert!(session.new_high_score);
    }

    #[test]
    fn test_short_of_best_keeps_best() {
        let mut store = MemoryStore::with_best(5);
        let mut session = active_with(2, &store);

        let summary = session.finish(&mut store).unwrap();
        assert!(!summary.new_high_score);
        assert_eq!(session.best_score, 5);
        assert_eq!(store.best_score(), Some(5));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_tie_is_not_a_new_best() {
        let mut store = MemoryStore::with_best(5);
        let mut session = active_with(5, &store);

        session.finish(&mut store);
        assert!(!session.new_high_score);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_absent_best_counts_as_zero() {
        let mut store = MemoryStore::new();
        let mut session = active_with(0, &store);

        session.finish(&mut store);
        assert_eq!(session.best_score, 0);
        assert_eq!(store.best_score(), None);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut store = MemoryStore::with_best(1);
        let mut session = active_with(3, &store);

        assert!(session.finish(&mut store).is_some());
        assert!(session.finish(&mut store).is_none());
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_points_only_while_active() {
        let mut session = SessionState::new();
        assert!(!session.add_point());

        session.begin();
        assert!(session.add_point());
        assert_eq!(session.current_score, 1);

        let mut store = MemoryStore::new();
        session.finish(&mut store);
        assert!(!session.add_point());
        assert_eq!(session.current_score, 1);
    }

    proptest! {
        #[test]
        fn best_score_never_decreases(best in 0u32..1000, score in 0u32..1000) {
            let mut store = MemoryStore::with_best(best);
            let mut session = active_with(score, &store);

            session.finish(&mut store);
            prop_assert!(session.best_score >= best);
            prop_assert_eq!(session.best_score, best.max(score));
            prop_assert_eq!(session.new_high_score, score > best);
        }
    }
}
