//! Player preferences
//!
//! Persisted separately from best scores under the `settings` key.

use serde::{Deserialize, Serialize};

use crate::is_supported_tier;
use crate::persistence::{KeyValueStore, PersistenceResult};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Question count chosen last time, for preselecting the splash form
    pub last_question_count: Option<u32>,
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Remember the selected tier. Returns whether the settings changed.
    pub fn remember_question_count(&mut self, count: u32) -> bool {
        if !is_supported_tier(count) || self.last_question_count == Some(count) {
            return false;
        }
        self.last_question_count = Some(count);
        true
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    if settings.last_question_count.is_some_and(|c| !is_supported_tier(c)) {
                        settings.last_question_count = None;
                    }
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings unreadable ({}), using defaults", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, storage: &mut S) -> PersistenceResult<()> {
        let json = serde_json::to_string(self)?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        assert!(settings.remember_question_count(25));
        assert!(!settings.remember_question_count(25));
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_unsupported_count_not_remembered() {
        let mut settings = Settings::default();
        assert!(!settings.remember_question_count(12));
        assert_eq!(settings.last_question_count, None);
    }

    #[test]
    fn test_corrupt_or_partial_values() {
        let store = MemoryStore::with_value("settings", "{oops");
        assert_eq!(Settings::load(&store), Settings::default());

        let store = MemoryStore::with_value("settings", r#"{"lastQuestionCount":50,"extra":1}"#);
        assert_eq!(Settings::load(&store).last_question_count, Some(50));

        let store = MemoryStore::with_value("settings", r#"{"lastQuestionCount":7}"#);
        assert_eq!(Settings::load(&store).last_question_count, None);
    }
}
