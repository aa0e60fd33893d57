//! # Storage
//!
//! Disk-backed storage for transformed verses.

pub mod redb_store;

pub use redb_store::{Occurrence, StoreStats, VerseStore};
