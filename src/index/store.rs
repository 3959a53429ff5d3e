use crate::error::Result;
use crate::search::types::Posting;
use crate::storage::partition_file::{PartitionKind, PartitionSpec, read_partition, write_partition};
use std::collections::HashMap;
use std::path::Path;

/// Read-only inverted index for one index shard: token -> posting list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPartition {
    shard_id: usize,
    num_shards: usize,
    postings: HashMap<String, Vec<Posting>>,
}

impl IndexPartition {
    pub fn new(shard_id: usize, num_shards: usize, postings: HashMap<String, Vec<Posting>>) -> Self {
        Self {
            shard_id,
            num_shards,
            postings,
        }
    }

    fn spec(shard_id: usize, num_shards: usize) -> PartitionSpec {
        PartitionSpec {
            kind: PartitionKind::Index,
            shard_id,
            num_shards,
        }
    }

    /// Loads the partition built for `shard_id` of `num_shards`.
    pub fn open(path: &Path, shard_id: usize, num_shards: usize) -> Result<Self> {
        let postings: HashMap<String, Vec<Posting>> =
            read_partition(path, Self::spec(shard_id, num_shards))?;
        tracing::info!(
            "Loaded index partition {}/{} from {} ({} tokens)",
            shard_id,
            num_shards,
            path.display(),
            postings.len()
        );
        Ok(Self::new(shard_id, num_shards, postings))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_partition(path, Self::spec(self.shard_id, self.num_shards), &self.postings)
    }

    /// Posting list of `token`, empty when the token is not held by this shard.
    pub fn postings(&self, token: &str) -> &[Posting] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn shard_id(&self) -> usize {
        self.shard_id
    }

    pub fn num_shards(&self) -> usize {
        self.num_shards
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}
