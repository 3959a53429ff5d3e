//! Partition File Format
//!
//! The on-disk contract between the partition builder and the shard services.
//!
//! ```text
//! +-------------------------------------------------------------+
//! | PartitionHeader (bincode, fixed width)                      |
//! |   magic "SSPT" | version | kind | shard_id | num_shards     |
//! |   payload_len  | checksum (CRC32 of payload)                |
//! +-------------------------------------------------------------+
//! | payload (bincode of the partition body)                     |
//! +-------------------------------------------------------------+
//! ```
//!
//! Readers verify every header field against what the caller expects, so a shard
//! started with a file built for another topology fails at startup instead of
//! serving misrouted data.

use crate::error::{Result, SearchError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAGIC: [u8; 4] = *b"SSPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionKind {
    Index,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub kind: PartitionKind,
    pub shard_id: u32,
    pub num_shards: u32,
    pub payload_len: u64,
    pub checksum: u32,
}

impl PartitionHeader {
    pub const VERSION: u32 = 1;

    fn new(kind: PartitionKind, shard_id: usize, num_shards: usize, payload: &[u8]) -> Self {
        Self {
            magic: MAGIC,
            version: Self::VERSION,
            kind,
            shard_id: shard_id as u32,
            num_shards: num_shards as u32,
            payload_len: payload.len() as u64,
            checksum: crc32fast::hash(payload),
        }
    }
}

/// Identity a reader expects to find in a partition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSpec {
    pub kind: PartitionKind,
    pub shard_id: usize,
    pub num_shards: usize,
}

pub fn encode_partition<T: Serialize>(spec: PartitionSpec, body: &T) -> Result<Vec<u8>> {
    let payload = bincode::serialize(body)?;
    let header = PartitionHeader::new(spec.kind, spec.shard_id, spec.num_shards, &payload);
    let mut bytes = bincode::serialize(&header)?;
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

pub fn decode_partition<T: DeserializeOwned>(spec: PartitionSpec, bytes: &[u8]) -> Result<T> {
    let header: PartitionHeader = bincode::deserialize(bytes)
        .map_err(|e| SearchError::PartitionFile(format!("unreadable header: {}", e)))?;

    if header.magic != MAGIC {
        return Err(SearchError::PartitionFile("bad magic".to_string()));
    }
    if header.version != PartitionHeader::VERSION {
        return Err(SearchError::PartitionFile(format!(
            "unsupported version {} (expected {})",
            header.version,
            PartitionHeader::VERSION
        )));
    }
    if header.kind != spec.kind {
        return Err(SearchError::PartitionFile(format!(
            "expected a {:?} partition, found {:?}",
            spec.kind, header.kind
        )));
    }
    if header.shard_id as usize != spec.shard_id || header.num_shards as usize != spec.num_shards {
        return Err(SearchError::PartitionFile(format!(
            "built for shard {}/{}, configured as shard {}/{}",
            header.shard_id, header.num_shards, spec.shard_id, spec.num_shards
        )));
    }

    let header_len = bincode::serialized_size(&header)? as usize;
    let payload = &bytes[header_len..];
    if payload.len() as u64 != header.payload_len {
        return Err(SearchError::PartitionFile(format!(
            "truncated payload: {} of {} bytes",
            payload.len(),
            header.payload_len
        )));
    }
    if crc32fast::hash(payload) != header.checksum {
        return Err(SearchError::PartitionFile("checksum mismatch".to_string()));
    }

    Ok(bincode::deserialize(payload)?)
}

pub fn write_partition<T: Serialize>(path: &Path, spec: PartitionSpec, body: &T) -> Result<()> {
    let bytes = encode_partition(spec, body)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    tracing::debug!("Wrote {:?} partition {} to {}", spec.kind, spec.shard_id, path.display());
    Ok(())
}

pub fn read_partition<T: DeserializeOwned>(path: &Path, spec: PartitionSpec) -> Result<T> {
    let bytes = fs::read(path)?;
    decode_partition(spec, &bytes).map_err(|e| match e {
        SearchError::PartitionFile(msg) => {
            SearchError::PartitionFile(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
