//! Per-level star records
//!
//! Persisted to LocalStorage in the browser; the native runner keeps them in
//! a JSON file of its choosing.

use serde::{Deserialize, Serialize};

use crate::consts::UNLOCK_STARS;
use crate::error::LoadError;
use crate::platform::runner::SessionObserver;
use crate::sim::outcome::LevelResult;

/// Best stars earned per level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelRecords {
    /// Index 0 is level 1; levels past the end have 0 stars
    pub stars: Vec<u8>,
}

impl LevelRecords {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lead_me_home_records";

    pub fn new() -> Self {
        Self { stars: Vec::new() }
    }

    /// Best stars recorded for a 1-based level
    pub fn stars(&self, level: u32) -> u8 {
        level
            .checked_sub(1)
            .and_then(|i| self.stars.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Level 1 is always open; every later level needs two stars on the one before
    pub fn is_unlocked(&self, level: u32) -> bool {
        match level {
            0 => false,
            1 => true,
            n => self.stars(n - 1) >= UNLOCK_STARS,
        }
    }

    /// Highest unlocked level, capped at `available`
    pub fn highest_unlocked(&self, available: u32) -> u32 {
        (1..=available)
            .take_while(|&level| self.is_unlocked(level))
            .last()
            .unwrap_or(1)
    }

    /// Fold a finished level into the records, returning the stored stars
    pub fn record(&mut self, result: &LevelResult) -> u8 {
        let Some(index) = result.level.checked_sub(1).map(|i| i as usize) else {
            log::warn!("Ignoring result for level 0");
            return 0;
        };
        if self.stars.len() <= index {
            self.stars.resize(index + 1, 0);
        }

        let previous = self.stars[index];
        let merged = result.tier.merge_stars(previous);
        self.stars[index] = merged;

        if merged > previous {
            log::info!("Level {} record: {} -> {} stars", result.level, previous, merged);
        }
        merged
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Hand the serialized records to `write` under the storage key
    ///
    /// Returns false, with a warning, when serializing or writing fails.
    pub fn store<E: std::fmt::Debug>(&self, write: impl FnOnce(&str, &str) -> Result<(), E>) -> bool {
        let json = match self.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize level records: {}", e);
                return false;
            }
        };
        match write(Self::STORAGE_KEY, &json) {
            Ok(()) => {
                log::info!("Level records saved ({} levels)", self.stars.len());
                true
            }
            Err(e) => {
                log::warn!("Failed to save level records: {:?}", e);
                false
            }
        }
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(records) => {
                        log::info!("Loaded records for {} levels", records.stars.len());
                        return records;
                    }
                    Err(e) => log::warn!("Discarding stored records: {}", e),
                }
            }
        }

        log::info!("No level records found, starting fresh");
        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                self.store(|key, json| storage.set_item(key, json));
            }
            None => log::warn!("LocalStorage unavailable, level records not saved"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl SessionObserver for LevelRecords {
    fn level_completed(&mut self, result: &LevelResult) {
        self.record(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_always_unlocked() {
        let records = LevelRecords::new();
        assert!(records.is_unlocked(1));
        assert!(!records.is_unlocked(2));
        assert!(!records.is_unlocked(0));
        assert_eq!(records.highest_unlocked(4), 1);
    }

    #[test]
    fn test_two_stars_unlock_next() {
        let mut records = LevelRecords::new();
        assert_eq!(records.record(&LevelResult::new(1, 4, 5)), 1);
        assert!(!records.is_unlocked(2));

        assert_eq!(records.record(&LevelResult::new(1, 2, 5)), 2);
        assert!(records.is_unlocked(2));
        assert!(!records.is_unlocked(3));
        assert_eq!(records.highest_unlocked(4), 2);
    }

    #[test]
    fn test_worse_result_keeps_record() {
        let mut records = LevelRecords::new();
        records.record(&LevelResult::new(2, 0, 3));
        assert_eq!(records.stars(2), 3);
        assert_eq!(records.stars(1), 0);

        assert_eq!(records.record(&LevelResult::new(2, 3, 3)), 3);
        assert_eq!(records.stars(2), 3);
    }

    #[test]
    fn test_highest_unlocked_is_capped() {
        let records = LevelRecords {
            stars: vec![3, 3, 3, 3, 3],
        };
        assert_eq!(records.highest_unlocked(4), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let mut records = LevelRecords::new();
        records.record(&LevelResult::new(1, 0, 3));
        records.record(&LevelResult::new(2, 1, 4));

        let json = records.to_json().unwrap();
        assert_eq!(json, r#"{"stars":[3,2]}"#);
        assert_eq!(LevelRecords::from_json(&json).unwrap(), records);
    }

    #[test]
    fn test_store_reports_write_failure() {
        let mut records = LevelRecords::new();
        records.record(&LevelResult::new(1, 0, 3));

        let mut written = None;
        assert!(records.store(|key, json| {
            written = Some((key.to_string(), json.to_string()));
            Ok::<(), ()>(())
        }));
        assert_eq!(
            written,
            Some(("lead_me_home_records".to_string(), r#"{"stars":[3]}"#.to_string()))
        );

        assert!(!records.store(|_, _| Err("quota exceeded")));
    }

    #[test]
    fn test_observer_records_result() {
        let mut records = LevelRecords::new();
        records.level_completed(&LevelResult::new(1, 1, 3));
        assert_eq!(records.stars(1), 2);
    }
}
