//! # Chained Hash Table
//!
//! A Rust implementation of a string-keyed hash table using separate chaining.
//!
//! Every slot of the table holds at most one bucket: a doubly linked chain of the entries
//! whose keys hash to that slot. Keys are hashed with a deterministic polynomial string hash,
//! and the table doubles its slot count (rehashing every entry) whenever the number of
//! entries exceeds `capacity * 0.75`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chained_table::ChainedHashTable;
//!
//! // Create a new table with the default 100 slots
//! let mut table = ChainedHashTable::new();
//!
//! // Insert values
//! table.set("apple", 1);
//! table.set("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(table.get("apple"), 1);
//! assert!(table.has("banana"));
//!
//! // Update values
//! table.set("apple", 10);
//! assert_eq!(table.get("apple"), 10);
//!
//! // Remove values; a missing key reads as the default value
//! assert!(table.remove("apple"));
//! assert_eq!(table.get("apple"), 0);
//! assert_eq!(table.find("apple"), None);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use chained_table::{ChainedHashTable, ConfigError, TableConfig};
//!
//! let config = TableConfig::default().with_initial_capacity(8).with_load_factor_threshold(2.0);
//! let table: ChainedHashTable<u32> = ChainedHashTable::with_config(config)?;
//! assert_eq!(table.capacity(), 8);
//!
//! let bad = TableConfig::default().with_initial_capacity(0);
//! assert_eq!(ChainedHashTable::<u32>::with_config(bad).unwrap_err(), ConfigError::ZeroCapacity);
//! # Ok::<(), ConfigError>(())
//! ```

/// Module implementing the collision chain
mod bucket;
/// Module implementing the hash table
mod chained_table;
/// Module holding construction parameters
mod config;
/// Module holding error types
mod error;
/// Module implementing the string hash
mod hash_function;
/// Utility traits for the hash table
mod utils;

pub use bucket::{Bucket, Entry, EntryHandle, Iter as BucketIter};
pub use chained_table::{ChainStats, ChainedHashTable, Iter};
pub use config::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, TableConfig};
pub use error::ConfigError;
pub use hash_function::hash_index;
pub use utils::HashTableExtensions;
