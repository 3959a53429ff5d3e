//! Sharded Search Cluster Library
//!
//! A query fans out over a partitioned inverted index, the partial rankings are merged,
//! and the top results are resolved to titles and snippets on a separately partitioned
//! document store. The binary (`main.rs`) runs any of the roles below.
//!
//! ## Architecture Modules
//!
//! - **`coordinator`**: The frontend. Scatters queries to index shards, merges the
//!   partial scores, and routes the top-K doc ids to their document shards.
//! - **`index`**: Index shard role. Dot-product scoring over a token -> postings partition.
//! - **`docstore`**: Document shard role. Record lookup and snippet selection.
//! - **`storage`**: Sharding functions and the versioned partition file format.
//! - **`ingestion`**: Partition builder turning a corpus into per-shard files.
//! - **`search`**: Shared data model, tokenizer and snippet policy.
//! - **`config`**: Static cluster topology, loaded from TOML.
//! - **`node`** / **`server`**: Role startup and HTTP plumbing.

pub mod config;
pub mod coordinator;
pub mod docstore;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod node;
pub mod search;
pub mod server;
pub mod storage;
