//! Partition Storage Module
//!
//! Shared knowledge about how data is split across shards and how a shard's data is
//! persisted between the builder and the shard services.
//!
//! ## Core Concepts
//! - **Document sharding**: `shard(doc_id) = doc_id mod num_document_shards` decides
//!   which document shard owns a document.
//! - **Token sharding**: index partitions split the vocabulary by a stable hash of the
//!   token. Index shards report document-level scores, so this scheme does not need to
//!   align with document sharding.
//! - **Partition files**: a versioned, checksummed binary encoding of one shard's data.

pub mod partition_file;
pub mod partitioner;
