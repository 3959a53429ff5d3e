//! Partition Building Module
//!
//! Turns an already-acquired corpus into the per-shard partition files the index and
//! document shards load at startup.
//!
//! ## Submodules
//! - **`types`**: Corpus entries and the build report.
//! - **`builder`**: Tokenization, posting list construction and routing of tokens and
//!   documents to shards.

pub mod builder;
pub mod types;
