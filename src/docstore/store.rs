use crate::error::{Result, SearchError};
use crate::search::types::{DocId, DocumentRecord};
use crate::storage::partition_file::{PartitionKind, PartitionSpec, read_partition, write_partition};
use crate::storage::partitioner::DocumentSharder;
use std::collections::HashMap;
use std::path::Path;

/// Read-only document store for one document shard: doc id -> record.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPartition {
    shard_id: usize,
    num_shards: usize,
    documents: HashMap<DocId, DocumentRecord>,
}

impl DocumentPartition {
    pub fn new<I>(shard_id: usize, num_shards: usize, records: I) -> Self
    where
        I: IntoIterator<Item = DocumentRecord>,
    {
        let documents = records
            .into_iter()
            .map(|record| (record.doc_id, record))
            .collect();
        Self {
            shard_id,
            num_shards,
            documents,
        }
    }

    fn spec(shard_id: usize, num_shards: usize) -> PartitionSpec {
        PartitionSpec {
            kind: PartitionKind::Document,
            shard_id,
            num_shards,
        }
    }

    /// Loads the partition built for `shard_id` of `num_shards`.
    ///
    /// Every record must be owned by this shard under the sharding function; a stray
    /// record means the file was built with a different shard count.
    pub fn open(path: &Path, shard_id: usize, num_shards: usize) -> Result<Self> {
        let records: Vec<DocumentRecord> = read_partition(path, Self::spec(shard_id, num_shards))?;

        let sharder = DocumentSharder::new(num_shards);
        if let Some(stray) = records.iter().find(|r| sharder.shard(r.doc_id) != shard_id) {
            return Err(SearchError::ShardDataInconsistency {
                doc_id: stray.doc_id,
                shard: shard_id,
                owner: sharder.shard(stray.doc_id),
            });
        }

        tracing::info!(
            "Loaded document partition {}/{} from {} ({} documents)",
            shard_id,
            num_shards,
            path.display(),
            records.len()
        );
        Ok(Self::new(shard_id, num_shards, records))
    }

    /// Writes records in ascending doc id order so identical input gives identical files.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut records: Vec<&DocumentRecord> = self.documents.values().collect();
        records.sort_by_key(|record| record.doc_id);
        write_partition(path, Self::spec(self.shard_id, self.num_shards), &records)
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocumentRecord> {
        self.documents.get(&doc_id)
    }

    pub fn shard_id(&self) -> usize {
        self.shard_id
    }

    pub fn num_shards(&self) -> usize {
        self.num_shards
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
