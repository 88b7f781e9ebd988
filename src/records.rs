//! Best score and first-visit bookkeeping
//!
//! Keys match what earlier web builds wrote to LocalStorage so existing
//! players keep their best score.

use crate::persistence::KeyValueStore;

/// Storage key for the best score (stored as a decimal string)
pub const BEST_SCORE_KEY: &str = "colorRingBestScore";
/// Set once the how-to-play panel has been shown
pub const FIRST_VISIT_KEY: &str = "colorRingFirstVisit";

/// Persistent player records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Records {
    pub best_score: u64,
    /// True when nothing marked a previous visit
    pub first_visit: bool,
}

impl Records {
    /// Read records; unreadable values count as absent
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best_score = store
            .get(BEST_SCORE_KEY)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let first_visit = store.get(FIRST_VISIT_KEY).is_none();
        log::info!("Loaded best score {best_score}");
        Self {
            best_score,
            first_visit,
        }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best_score
    }

    /// Store `score` if it is a new best. Returns true when it was.
    pub fn record_score(&mut self, store: &mut dyn KeyValueStore, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best_score = score;
        match store.set(BEST_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New best score {score} saved"),
            Err(e) => log::warn!("Could not save best score: {e:#}"),
        }
        true
    }

    /// Remember that the tutorial was shown
    pub fn mark_visited(&mut self, store: &mut dyn KeyValueStore) {
        if !self.first_visit {
            return;
        }
        self.first_visit = false;
        if let Err(e) = store.set(FIRST_VISIT_KEY, "true") {
            log::warn!("Could not save first-visit flag: {e:#}");
        }
    }
}
