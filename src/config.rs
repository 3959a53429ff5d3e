//! Cluster configuration with sensible defaults.
//!
//! [`ClusterConfig`] is the static deployment description every role reads: where each
//! shard listens, which partition file it serves, the default result count and the
//! per-call timeout of the coordinator. The list order of `index_shards` and
//! `document_shards` defines the shard ids, so the document shard count doubles as the
//! modulus of the sharding function.

use crate::error::{Result, SearchError};
use crate::search::snippet::SnippetConfig;
use crate::search::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_SHARD_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_BASE_PORT: u16 = 8000;

/// Address and partition file of one shard process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardEndpoint {
    pub addr: SocketAddr,
    pub partition: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub addr: SocketAddr,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_BASE_PORT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Results returned when the caller does not ask for a specific count.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Upper bound for every individual shard call of the coordinator.
    #[serde(default = "default_shard_timeout_ms")]
    pub shard_timeout_ms: u64,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub tokenizer: Tokenizer,
    #[serde(default)]
    pub snippet: SnippetConfig,
    pub index_shards: Vec<ShardEndpoint>,
    pub document_shards: Vec<ShardEndpoint>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_shard_timeout_ms() -> u64 {
    DEFAULT_SHARD_TIMEOUT_MS
}

impl ClusterConfig {
    /// Single-host layout: frontend on `base_port`, document shards on the following
    /// ports, index shards after them. Partition files live in `data_dir`.
    ///
    /// Fails when the layout does not fit below port 65535.
    pub fn local(
        base_port: u16,
        index_shards: usize,
        document_shards: usize,
        data_dir: &Path,
    ) -> Result<Self> {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let port = |offset: usize| {
            u16::try_from(offset)
                .ok()
                .and_then(|offset| base_port.checked_add(offset))
                .ok_or_else(|| {
                    SearchError::Config(format!(
                        "port range exceeds 65535: {} roles from base port {}",
                        1 + document_shards + index_shards,
                        base_port
                    ))
                })
        };

        let document_shards = (0..document_shards)
            .map(|i| -> Result<ShardEndpoint> {
                Ok(ShardEndpoint {
                    addr: SocketAddr::new(localhost, port(1 + i)?),
                    partition: document_partition_path(data_dir, i),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let first_index_offset = 1 + document_shards.len();
        let index_shards = (0..index_shards)
            .map(|i| -> Result<ShardEndpoint> {
                Ok(ShardEndpoint {
                    addr: SocketAddr::new(localhost, port(first_index_offset + i)?),
                    partition: index_partition_path(data_dir, i),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            top_k: DEFAULT_TOP_K,
            shard_timeout_ms: DEFAULT_SHARD_TIMEOUT_MS,
            frontend: FrontendConfig {
                addr: SocketAddr::new(localhost, base_port),
            },
            tokenizer: Tokenizer::default(),
            snippet: SnippetConfig::default(),
            index_shards,
            document_shards,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SearchError::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded cluster config from {} ({} index shards, {} document shards)",
            path.display(),
            config.index_shards.len(),
            config.document_shards.len()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Checks:
    /// - at least one index shard and one document shard
    /// - `top_k` and `shard_timeout_ms` greater than 0
    /// - snippet window non-empty and larger than its lead
    /// - no two roles bound to the same address
    pub fn validate(&self) -> Result<()> {
        if self.index_shards.is_empty() {
            return Err(SearchError::Config("at least one index shard is required".into()));
        }
        if self.document_shards.is_empty() {
            return Err(SearchError::Config(
                "at least one document shard is required".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(SearchError::Config("top_k must be greater than 0".into()));
        }
        if self.shard_timeout_ms == 0 {
            return Err(SearchError::Config(
                "shard_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.snippet.window_words == 0 || self.snippet.lead_words >= self.snippet.window_words {
            return Err(SearchError::Config(
                "snippet.lead_words must be smaller than snippet.window_words".into(),
            ));
        }

        let mut seen = HashSet::new();
        let addrs = std::iter::once(self.frontend.addr)
            .chain(self.index_shards.iter().map(|s| s.addr))
            .chain(self.document_shards.iter().map(|s| s.addr));
        for addr in addrs {
            if !seen.insert(addr) {
                return Err(SearchError::Config(format!("address {} is used twice", addr)));
            }
        }
        Ok(())
    }

    pub fn shard_timeout(&self) -> Duration {
        Duration::from_millis(self.shard_timeout_ms)
    }
}

pub fn index_partition_path(data_dir: &Path, shard: usize) -> PathBuf {
    data_dir.join(format!("index_{}.part", shard))
}

pub fn document_partition_path(data_dir: &Path, shard: usize) -> PathBuf {
    data_dir.join(format!("docs_{}.part", shard))
}
