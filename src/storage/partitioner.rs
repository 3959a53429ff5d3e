use crate::search::types::DocId;

/// Routes documents to document shards: `shard(doc_id) = doc_id mod num_shards`.
///
/// The shard count is a deployment invariant. The builder and the coordinator must be
/// constructed with the same value, and changing it requires rebuilding every partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSharder {
    num_shards: usize,
}

impl DocumentSharder {
    /// `num_shards` must be non-zero; the configuration layer rejects zero shards.
    pub fn new(num_shards: usize) -> Self {
        assert!(num_shards > 0, "document shard count must be non-zero");
        Self { num_shards }
    }

    pub fn shard(&self, doc_id: DocId) -> usize {
        (doc_id % self.num_shards as u64) as usize
    }

    pub fn num_shards(&self) -> usize {
        self.num_shards
    }
}

/// Assigns a token to an index shard.
///
/// Uses CRC32 rather than `DefaultHasher`, whose output is not stable across builds,
/// since the assignment is baked into partition files.
pub fn token_shard(token: &str, num_shards: usize) -> usize {
    (crc32fast::hash(token.as_bytes()) as usize) % num_shards
}
