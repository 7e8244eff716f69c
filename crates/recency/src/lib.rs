//! # recency
//!
//! Fixed-capacity LRU cache with constant time lookup, insertion and eviction.
//!
//! ## Architecture
//! - **HashTable**: AHash index of arena slots, hashed through each node's
//!   key so keys are stored once and need only `Hash + Eq` (O(1))
//! - **LRU List**: Doubly-linked list over arena slots, bounded by head/tail
//!   sentinels (O(1) relocation and eviction)
//! - **SharedCache**: Mutex-guarded handle with hit/miss statistics for use
//!   across threads
//!
//! `LruCache` itself does no locking; wrap it in [`SharedCache`] (or your own
//! lock) when more than one thread needs it.

#![warn(missing_docs)]

mod cache;
mod capacity;
mod error;
mod iter;
mod lru;
mod stats;

pub use cache::SharedCache;
pub use capacity::Capacity;
pub use error::{Error, Result};
pub use iter::Iter;
pub use lru::LruCache;
pub use stats::CacheStats;
