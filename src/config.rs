//! Construction parameters for [`ChainedHashTable`](crate::ChainedHashTable)

use crate::error::ConfigError;

/// Number of bucket slots a table starts with
pub const DEFAULT_CAPACITY: usize = 100;

/// Ratio of entries to bucket slots above which the table doubles
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Initial capacity and growth threshold of a table.
///
/// Thresholds above 1.0 are allowed: with separate chaining a bucket holds any number of
/// entries, so a high threshold simply trades longer chains for fewer resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Number of bucket slots allocated up front
    initial_capacity: usize,
    /// Load factor that triggers a resize once exceeded
    load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_CAPACITY, load_factor_threshold: DEFAULT_LOAD_FACTOR }
    }
}

impl TableConfig {
    /// Sets the number of bucket slots allocated up front
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the load factor that triggers a resize
    #[must_use]
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Number of bucket slots allocated up front
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Load factor that triggers a resize once exceeded
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Checks that the configuration describes a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] for an initial capacity of zero and
    /// [`ConfigError::InvalidLoadFactor`] for a threshold that is NaN, infinite, zero or
    /// negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor_threshold.is_finite() || self.load_factor_threshold <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor_threshold));
        }
        Ok(())
    }
}
