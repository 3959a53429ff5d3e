//! Partition Builder
//!
//! Splits a corpus into index and document partitions for a given topology. The
//! builder is the writer side of the partition file contract; it tokenizes with the
//! same policy the shards use at query time.

use super::types::{BuildReport, CorpusEntry};
use crate::config::ClusterConfig;
use crate::docstore::store::DocumentPartition;
use crate::error::{Result, SearchError};
use crate::index::store::IndexPartition;
use crate::search::tokenizer::Tokenizer;
use crate::search::types::{DocumentRecord, Posting};
use crate::storage::partitioner::{DocumentSharder, token_shard};

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct PartitionBuilder {
    tokenizer: Tokenizer,
    num_index_shards: usize,
    sharder: DocumentSharder,
}

/// In-memory result of a build, indexed by shard id.
#[derive(Debug)]
pub struct BuiltPartitions {
    pub index: Vec<IndexPartition>,
    pub documents: Vec<DocumentPartition>,
    pub report: BuildReport,
}

impl PartitionBuilder {
    pub fn new(tokenizer: Tokenizer, num_index_shards: usize, num_document_shards: usize) -> Self {
        assert!(num_index_shards > 0, "index shard count must be non-zero");
        Self {
            tokenizer,
            num_index_shards,
            sharder: DocumentSharder::new(num_document_shards),
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::new(
            config.tokenizer.clone(),
            config.index_shards.len(),
            config.document_shards.len(),
        )
    }

    /// Builds every partition of the topology from `records`.
    ///
    /// Title and text are both indexed. Posting lists come out in ascending doc id
    /// order regardless of input order.
    pub fn build(&self, mut records: Vec<DocumentRecord>) -> Result<BuiltPartitions> {
        records.sort_by_key(|record| record.doc_id);
        if let Some(pair) = records.windows(2).find(|pair| pair[0].doc_id == pair[1].doc_id) {
            return Err(SearchError::Corpus(format!(
                "duplicate document id {}",
                pair[0].doc_id
            )));
        }

        let mut index_maps: Vec<HashMap<String, Vec<Posting>>> =
            vec![HashMap::new(); self.num_index_shards];
        let mut postings_total = 0;

        for record in &records {
            let indexed_text = format!("{} {}", record.title, record.text);
            let mut frequencies: Vec<(String, u32)> =
                self.tokenizer.term_frequencies(&indexed_text).into_iter().collect();
            frequencies.sort();

            for (token, term_frequency) in frequencies {
                let shard = token_shard(&token, self.num_index_shards);
                index_maps[shard].entry(token).or_default().push(Posting {
                    doc_id: record.doc_id,
                    term_frequency,
                });
                postings_total += 1;
            }
        }

        let tokens = index_maps.iter().map(HashMap::len).sum();
        let index = index_maps
            .into_iter()
            .enumerate()
            .map(|(shard, postings)| IndexPartition::new(shard, self.num_index_shards, postings))
            .collect();

        let num_document_shards = self.sharder.num_shards();
        let mut shard_records: Vec<Vec<DocumentRecord>> = vec![Vec::new(); num_document_shards];
        let documents_total = records.len();
        for record in records {
            shard_records[self.sharder.shard(record.doc_id)].push(record);
        }
        let documents = shard_records
            .into_iter()
            .enumerate()
            .map(|(shard, records)| DocumentPartition::new(shard, num_document_shards, records))
            .collect();

        let report = BuildReport {
            documents: documents_total,
            tokens,
            postings: postings_total,
            index_shards: self.num_index_shards,
            document_shards: num_document_shards,
        };
        tracing::info!(
            "Built {} index and {} document partitions: {} documents, {} tokens, {} postings",
            report.index_shards,
            report.document_shards,
            report.documents,
            report.tokens,
            report.postings
        );

        Ok(BuiltPartitions {
            index,
            documents,
            report,
        })
    }
}

impl BuiltPartitions {
    /// Writes every partition to the path the configuration assigns to its shard.
    pub fn write(&self, config: &ClusterConfig) -> Result<()> {
        if config.index_shards.len() != self.index.len()
            || config.document_shards.len() != self.documents.len()
        {
            return Err(SearchError::Config(format!(
                "built {}/{} partitions but the config lists {}/{} shards",
                self.index.len(),
                self.documents.len(),
                config.index_shards.len(),
                config.document_shards.len()
            )));
        }

        for (partition, endpoint) in self.index.iter().zip(&config.index_shards) {
            partition.save(&endpoint.partition)?;
        }
        for (partition, endpoint) in self.documents.iter().zip(&config.document_shards) {
            partition.save(&endpoint.partition)?;
        }
        Ok(())
    }
}

/// Reads a JSON-lines corpus. Blank lines are skipped.
pub fn read_corpus(path: &Path) -> Result<Vec<DocumentRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: CorpusEntry = serde_json::from_str(&line).map_err(|e| {
            SearchError::Corpus(format!("{}:{}: {}", path.display(), line_no + 1, e))
        })?;
        let record = entry.into_record(line_no);
        if !seen.insert(record.doc_id) {
            return Err(SearchError::Corpus(format!(
                "{}:{}: duplicate document id {}",
                path.display(),
                line_no + 1,
                record.doc_id
            )));
        }
        records.push(record);
    }

    tracing::info!("Read {} documents from {}", records.len(), path.display());
    Ok(records)
}
