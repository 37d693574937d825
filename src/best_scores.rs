//! Best time per question-count tier
//!
//! Persisted under the `bestScores` key as a JSON array of four records in
//! tier order. A stored time of 0 means the tier has not been played yet.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::QUESTION_TIERS;
use crate::persistence::{KeyValueStore, PersistenceError};
use crate::quiz::format_seconds;
use crate::{is_supported_tier, round_tenths};

/// Sentinel for a tier with no recorded time
pub const UNSET_TIME: f64 = 0.0;

/// Best time for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    #[serde(rename = "questionCount", alias = "questions")]
    pub question_count: u32,
    #[serde(rename = "bestScore", deserialize_with = "deserialize_time")]
    pub best_time: f64,
}

impl BestScoreRecord {
    pub fn unset(question_count: u32) -> Self {
        Self {
            question_count,
            best_time: UNSET_TIME,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.best_time == UNSET_TIME
    }

    /// Splash-page text, e.g. "12.3s" ("0.0s" when unset)
    pub fn label(&self) -> String {
        format_seconds(self.best_time)
    }
}

/// Older saves store the time as display text ("6.5"), newer ones as a number
fn deserialize_time<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredTime {
        Number(f64),
        Text(String),
    }

    let value = match StoredTime::deserialize(deserializer)? {
        StoredTime::Number(n) => n,
        StoredTime::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!("invalid best time {value}")));
    }
    Ok(value)
}

/// The four tier records, always in `QUESTION_TIERS` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScores {
    records: Vec<BestScoreRecord>,
}

impl Default for BestScores {
    fn default() -> Self {
        Self::new()
    }
}

impl BestScores {
    /// Fresh table with every tier unset
    pub fn new() -> Self {
        Self {
            records: QUESTION_TIERS.iter().map(|&q| BestScoreRecord::unset(q)).collect(),
        }
    }

    /// Parse a stored table; `None` if it is not exactly the four tiers in order
    pub fn from_json(json: &str) -> Option<Self> {
        let table: BestScores = serde_json::from_str(json).ok()?;
        table.is_well_formed().then_some(table)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn is_well_formed(&self) -> bool {
        self.records.len() == QUESTION_TIERS.len()
            && self
                .records
                .iter()
                .zip(QUESTION_TIERS)
                .all(|(r, tier)| r.question_count == tier)
    }

    pub fn records(&self) -> &[BestScoreRecord] {
        &self.records
    }

    pub fn get(&self, question_count: u32) -> Option<&BestScoreRecord> {
        self.records.iter().find(|r| r.question_count == question_count)
    }

    fn get_mut(&mut self, question_count: u32) -> Option<&mut BestScoreRecord> {
        self.records
            .iter_mut()
            .find(|r| r.question_count == question_count)
    }

    /// Display labels in tier order
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(BestScoreRecord::label).collect()
    }
}

/// Owns the best-score table. Updates are written to storage on `flush`.
pub struct BestScoreStore<S: KeyValueStore> {
    storage: S,
    scores: BestScores,
    /// In-memory table differs from what was last written
    dirty: bool,
    persist_degraded: bool,
}

impl<S: KeyValueStore> BestScoreStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bestScores";

    /// Load the table from storage, falling back to a fresh one.
    ///
    /// The resulting table is written back, so a corrupt value is replaced.
    pub fn load(storage: S) -> Self {
        let stored = match storage.get(Self::STORAGE_KEY) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read best scores: {}", e);
                None
            }
        };

        let scores = match stored.as_deref().map(BestScores::from_json) {
            Some(Some(scores)) => {
                log::info!("Loaded best scores");
                scores
            }
            Some(None) => {
                log::warn!("Stored best scores are corrupt, starting fresh");
                BestScores::new()
            }
            None => {
                log::info!("No best scores found, starting fresh");
                BestScores::new()
            }
        };

        let mut store = Self {
            storage,
            scores,
            dirty: false,
            persist_degraded: false,
        };
        store.save();
        store
    }

    /// Record `candidate_time` for a tier if it is unset or strictly beaten.
    ///
    /// Returns whether the table changed. Unknown tiers are ignored, as are
    /// times that round to the unset sentinel. The change is persisted by the
    /// next `flush`.
    pub fn record_if_better(&mut self, question_count: u32, candidate_time: f64) -> bool {
        if !is_supported_tier(question_count) {
            log::warn!("No best-score tier for {} questions", question_count);
            return false;
        }
        let Some(record) = self.scores.get_mut(question_count) else {
            return false;
        };
        let rounded = round_tenths(candidate_time);
        if rounded == UNSET_TIME {
            log::debug!("Ignoring zero time for {} questions", question_count);
            return false;
        }
        if !record.is_unset() && candidate_time >= record.best_time {
            return false;
        }

        record.best_time = rounded;
        log::info!(
            "New best time for {} questions: {}",
            question_count,
            record.label()
        );
        self.dirty = true;
        true
    }

    /// Write pending changes, if any. Returns whether a write was attempted.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.save();
        true
    }

    /// Changes waiting for `flush`
    pub fn has_pending_writes(&self) -> bool {
        self.dirty
    }

    /// Write the table to storage. Failures leave the in-memory table as is.
    pub fn save(&mut self) {
        let result = self
            .scores
            .to_json()
            .map_err(PersistenceError::from)
            .and_then(|json| self.storage.set(Self::STORAGE_KEY, &json));

        match result {
            Ok(()) => {
                self.dirty = false;
                self.persist_degraded = false;
            }
            Err(e) => {
                log::warn!("Best scores not saved, keeping them in memory: {}", e);
                self.persist_degraded = true;
            }
        }
    }

    pub fn scores(&self) -> &BestScores {
        &self.scores
    }

    /// Best time for a tier, `None` if unknown or unset
    pub fn best_time(&self, question_count: u32) -> Option<f64> {
        self.scores
            .get(question_count)
            .filter(|r| !r.is_unset())
            .map(|r| r.best_time)
    }

    /// True when the last write failed and scores live only in memory
    pub fn persist_degraded(&self) -> bool {
        self.persist_degraded
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    const KEY: &str = "bestScores";

    fn stored_json(store: &BestScoreStore<MemoryStore>) -> String {
        store.storage().get(KEY).unwrap().unwrap()
    }

    #[test]
    fn test_fresh_load_initializes_and_saves() {
        let store = BestScoreStore::load(MemoryStore::new());
        let counts: Vec<u32> = store.scores().records().iter().map(|r| r.question_count).collect();
        assert_eq!(counts, vec![10, 25, 50, 99]);
        assert!(store.scores().records().iter().all(|r| r.is_unset()));
        assert_eq!(
            stored_json(&store),
            r#"[{"questionCount":10,"bestScore":0.0},{"questionCount":25,"bestScore":0.0},{"questionCount":50,"bestScore":0.0},{"questionCount":99,"bestScore":0.0}]"#
        );
    }

    #[test]
    fn test_loads_legacy_format() {
        let legacy = r#"[{"questions":10,"bestScore":"6.5"},{"questions":25,"bestScore":"0.0"},{"questions":50,"bestScore":"41.2"},{"questions":99,"bestScore":"0.0"}]"#;
        let store = BestScoreStore::load(MemoryStore::with_value(KEY, legacy));
        assert_eq!(store.best_time(10), Some(6.5));
        assert_eq!(store.best_time(25), None);
        assert_eq!(store.best_time(50), Some(41.2));
        // Rewritten in the current format
        assert!(stored_json(&store).contains("\"questionCount\":10"));
    }

    #[test]
    fn test_corrupt_data_reinitialized() {
        for bad in [
            "not json",
            "[]",
            r#"[{"questionCount":10,"bestScore":1.0}]"#,
            r#"[{"questionCount":25,"bestScore":0},{"questionCount":10,"bestScore":0},{"questionCount":50,"bestScore":0},{"questionCount":99,"bestScore":0}]"#,
            r#"[{"questionCount":10,"bestScore":"abc"},{"questionCount":25,"bestScore":0},{"questionCount":50,"bestScore":0},{"questionCount":99,"bestScore":0}]"#,
            r#"[{"questionCount":10,"bestScore":-3},{"questionCount":25,"bestScore":0},{"questionCount":50,"bestScore":0},{"questionCount":99,"bestScore":0}]"#,
        ] {
            let store = BestScoreStore::load(MemoryStore::with_value(KEY, bad));
            assert_eq!(store.scores(), &BestScores::new(), "input: {bad}");
            assert_eq!(BestScores::from_json(&stored_json(&store)), Some(BestScores::new()));
        }
    }

    #[test]
    fn test_unset_tier_records_candidate() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        assert!(store.record_if_better(10, 6.5));
        assert_eq!(store.best_time(10), Some(6.5));
        assert!(store.flush());
        let reloaded = BestScores::from_json(&stored_json(&store)).unwrap();
        assert_eq!(reloaded.get(10).unwrap().best_time, 6.5);
    }

    #[test]
    fn test_slower_time_not_recorded() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.record_if_better(10, 6.5);
        assert!(!store.record_if_better(10, 7.0));
        assert_eq!(store.best_time(10), Some(6.5));
    }

    #[test]
    fn test_equal_time_not_recorded() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.record_if_better(25, 12.0);
        assert!(!store.record_if_better(25, 12.0));
    }

    #[test]
    fn test_faster_time_recorded() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.record_if_better(50, 40.0);
        assert!(store.record_if_better(50, 38.3));
        assert_eq!(store.best_time(50), Some(38.3));
    }

    #[test]
    fn test_non_improving_is_idempotent() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.record_if_better(99, 80.0);
        store.flush();
        let before = stored_json(&store);
        assert!(!store.record_if_better(99, 90.0));
        assert!(!store.flush());
        let after_first = (store.scores().clone(), stored_json(&store));
        assert!(!store.record_if_better(99, 90.0));
        assert_eq!((store.scores().clone(), stored_json(&store)), after_first);
        assert_eq!(before, after_first.1);
    }

    #[test]
    fn test_unknown_tier_ignored() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        assert!(!store.record_if_better(11, 1.0));
        assert_eq!(store.scores(), &BestScores::new());
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.storage_mut().set_read_only(true);
        assert!(store.record_if_better(10, 9.9));
        assert!(store.flush());
        assert!(store.persist_degraded());
        assert!(store.has_pending_writes());
        assert_eq!(store.best_time(10), Some(9.9));
        // Storage still holds the old table
        assert_eq!(
            BestScores::from_json(&stored_json(&store)).unwrap().get(10).unwrap().best_time,
            0.0
        );

        store.storage_mut().set_read_only(false);
        assert!(store.flush());
        assert!(!store.persist_degraded());
        assert!(!store.has_pending_writes());
    }

    #[test]
    fn test_update_written_only_on_flush() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        let fresh = stored_json(&store);
        assert!(store.record_if_better(25, 14.2));
        assert!(store.has_pending_writes());
        assert_eq!(stored_json(&store), fresh);

        assert!(store.flush());
        assert!(!store.has_pending_writes());
        let reloaded = BestScores::from_json(&stored_json(&store)).unwrap();
        assert_eq!(reloaded.get(25).unwrap().best_time, 14.2);
    }

    #[test]
    fn test_zero_time_not_recorded() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        assert!(!store.record_if_better(10, 0.0));
        assert!(!store.record_if_better(10, 0.04));
        assert_eq!(store.best_time(10), None);
        assert!(!store.has_pending_writes());

        // A real time still counts as the first best
        assert!(store.record_if_better(10, 5.0));
        assert_eq!(store.best_time(10), Some(5.0));
    }

    #[test]
    fn test_labels() {
        let mut store = BestScoreStore::load(MemoryStore::new());
        store.record_if_better(25, 17.34);
        assert_eq!(store.scores().labels(), vec!["0.0s", "17.3s", "0.0s", "0.0s"]);
    }

    proptest! {
        #[test]
        fn table_survives_json_round_trip(tenths in prop::collection::vec(0u32..100_000, 4)) {
            let mut table = BestScores::new();
            for (record, t) in table.records.iter_mut().zip(&tenths) {
                record.best_time = *t as f64 / 10.0;
            }
            let json = table.to_json().unwrap();
            prop_assert_eq!(BestScores::from_json(&json), Some(table));
        }
    }
}
