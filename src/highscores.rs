//! All-time high score
//!
//! A single non-negative integer, persisted as a decimal string.

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Best score ever recorded on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "chroma_snake_high_score";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Check if a score would set a new record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished attempt. Returns true if it set a new record.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from storage; a missing key is a zero high score
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        match store.get(Self::STORAGE_KEY)? {
            None => Ok(Self::default()),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map(Self::new)
                .map_err(|_| StorageError::Corrupt {
                    key: Self::STORAGE_KEY.to_string(),
                    value: raw,
                }),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.best.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record() {
        let mut high = HighScore::default();
        assert!(!high.record(0));
        assert!(high.record(20));
        assert!(!high.record(20));
        assert!(!high.record(10));
        assert!(high.record(30));
        assert_eq!(high.best(), 30);
    }

    #[test]
    fn test_load_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store), Ok(HighScore::new(0)));
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        HighScore::new(70).save(&store).unwrap();
        assert_eq!(
            store.get(HighScore::STORAGE_KEY),
            Ok(Some("70".to_string()))
        );
        assert_eq!(HighScore::load(&store).unwrap().best(), 70);
    }

    #[test]
    fn test_load_corrupt() {
        let store = MemoryStore::with_entry(HighScore::STORAGE_KEY, "-5");
        assert!(matches!(
            HighScore::load(&store),
            Err(StorageError::Corrupt { .. })
        ));
    }
}
