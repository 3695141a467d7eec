//! Configuration options for the store and the importer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// Default number of records per import transaction.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default wait for a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings applied when a store is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Bounded wait for the storage engine's lock.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// Options controlling an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Records per committed transaction.
    pub batch_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the commit interval. Zero is rejected.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(ModelError::InvalidBatchSize);
        }
        self.batch_size = batch_size;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(ImportOptions::default().batch_size, 1000);
        assert_eq!(StoreOptions::default().busy_timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_zero_batch_size() {
        assert!(ImportOptions::new().with_batch_size(0).is_err());
        assert_eq!(
            ImportOptions::new().with_batch_size(5).unwrap().batch_size,
            5
        );
    }
}
