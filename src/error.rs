//! Error Taxonomy
//!
//! All fallible library operations return [`SearchError`]. The variants follow the
//! propagation policy of the cluster:
//!
//! - **Transient** (`ShardUnreachable`): absorbed by the coordinator into a partial result.
//! - **Topology** (`ShardDataInconsistency`): a document was routed to a shard that does
//!   not own it. The sharding function disagrees with the partition layout, so the
//!   error propagates to the caller instead of being hidden.
//! - **Startup** (`PartitionFile`, `Config`, `Io`, `Encoding`): fatal before a role
//!   starts serving.
//!
//! An empty or token-less query is not an error at all; it scores to zero results.

use std::fmt;

/// Which kind of shard a remote call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardKind {
    Index,
    Document,
}

impl fmt::Display for ShardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardKind::Index => write!(f, "index"),
            ShardKind::Document => write!(f, "document"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Network failure, non-success status or timeout while calling a shard.
    #[error("{kind} shard {shard} unreachable: {reason}")]
    ShardUnreachable {
        kind: ShardKind,
        shard: usize,
        reason: String,
    },

    /// A resolve request reached a document shard that does not hold the document.
    /// `shard == owner` means the owning shard lacks it.
    #[error("{}", inconsistency_message(.doc_id, .shard, .owner))]
    ShardDataInconsistency { doc_id: u64, shard: usize, owner: usize },

    /// A partition file is corrupt or does not match the configured topology.
    #[error("partition file error: {0}")]
    PartitionFile(String),

    #[error("config error: {0}")]
    Config(String),

    /// Invalid input handed to the partition builder.
    #[error("corpus error: {0}")]
    Corpus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

fn inconsistency_message(doc_id: &u64, shard: &usize, owner: &usize) -> String {
    if shard == owner {
        format!("document {} missing from its owning document shard {}", doc_id, shard)
    } else {
        format!(
            "document {} requested from document shard {}, but shard({}) = {}",
            doc_id, shard, doc_id, owner
        )
    }
}

impl SearchError {
    /// True for failures the coordinator degrades around instead of propagating.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::ShardUnreachable { .. })
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
