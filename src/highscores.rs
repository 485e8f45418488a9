//! High score persistence
//!
//! The session keeps a cached copy of the best score and writes through on
//! every new record. Storage is best effort: a failed read means "no record",
//! a failed write is logged and dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage failures (never surfaced to the player)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage rejected write: {0}")]
    Write(String),
    #[error("corrupt high score record: {0}")]
    Corrupt(String),
}

/// Key-value capability holding the best score
pub trait HighScoreStore {
    /// Stored best score, `None` if nothing was ever saved
    fn load(&self) -> Result<Option<u32>, StoreError>;
    fn store(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Persisted record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

impl HighScoreRecord {
    /// Parse a stored value; bare integers from older saves are accepted
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let raw = raw.trim();
        if let Ok(score) = raw.parse::<u32>() {
            return Ok(Self {
                score,
                timestamp: 0.0,
            });
        }
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Write(e.to_string()))
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<HighScoreRecord>,
    /// Simulate a broken backend
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Number of successful writes
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self {
            record: Some(HighScoreRecord {
                score,
                timestamp: 0.0,
            }),
            ..Self::default()
        }
    }

    /// A store whose backend rejects every read and write
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn record(&self) -> Option<HighScoreRecord> {
        self.record
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable);
        }
        Ok(self.record.map(|r| r.score))
    }

    fn store(&mut self, score: u32) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("quota exceeded".into()));
        }
        self.record = Some(HighScoreRecord {
            score,
            timestamp: 0.0,
        });
        self.writes += 1;
        Ok(())
    }
}

/// Shared handle so a driver can keep inspecting a store the session owns
impl<S: HighScoreStore> HighScoreStore for std::rc::Rc<std::cell::RefCell<S>> {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        self.borrow().load()
    }

    fn store(&mut self, score: u32) -> Result<(), StoreError> {
        self.borrow_mut().store(score)
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "crosshair_rush_high_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let storage = Self::storage()?;
        let raw = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?;
        match raw {
            Some(raw) => {
                let record = HighScoreRecord::parse(&raw)?;
                log::info!("Loaded high score {}", record.score);
                Ok(Some(record.score))
            }
            None => Ok(None),
        }
    }

    fn store(&mut self, score: u32) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let record = HighScoreRecord {
            score,
            timestamp: js_sys::Date::now(),
        };
        storage
            .set_item(Self::STORAGE_KEY, &record.to_json()?)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_record() {
        let r = HighScoreRecord::parse(r#"{"score":12,"timestamp":1700000000000.0}"#).unwrap();
        assert_eq!(r.score, 12);
        assert_eq!(r.timestamp, 1_700_000_000_000.0);
    }

    #[test]
    fn test_parse_legacy_integer() {
        let r = HighScoreRecord::parse(" 7 ").unwrap();
        assert_eq!(r.score, 7);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            HighScoreRecord::parse("lots"),
            Err(StoreError::Corrupt(_))
        ));
        assert!(HighScoreRecord::parse("-3").is_err());
    }

    #[test]
    fn test_record_json_roundtrip() {
        let r = HighScoreRecord {
            score: 9,
            timestamp: 5.0,
        };
        assert_eq!(HighScoreRecord::parse(&r.to_json().unwrap()).unwrap(), r);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.store(4).unwrap();
        assert_eq!(store.load().unwrap(), Some(4));
        assert_eq!(store.writes, 1);

        store.fail_writes = true;
        assert!(store.store(5).is_err());
        assert_eq!(store.load().unwrap(), Some(4));

        store.fail_reads = true;
        assert!(matches!(store.load(), Err(StoreError::Unavailable)));
    }
}
