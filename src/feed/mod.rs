//! Posted feed module
//!
//! Everything the feed screens read and the posting flow writes:
//! - `entry`: the persisted entry shape
//! - `storage`: the key-value gateway seam and its two implementations
//! - `store`: the feed list itself (prepend, read newest-first, clear)

pub mod entry;
pub mod storage;
pub mod store;

pub use entry::PostedEntry;
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageGateway};
pub use store::{FeedStore, FEED_KEY};
