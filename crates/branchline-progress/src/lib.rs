//! Branchline Progress — durable storage for the player's position.
//!
//! Provides a file-backed key-value implementation of `ProgressStore`.

pub mod file_store;
