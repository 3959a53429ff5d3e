use anyhow::{Context, bail};
use shardsearch::config::{ClusterConfig, DEFAULT_BASE_PORT};
use shardsearch::ingestion::builder::{PartitionBuilder, read_corpus};
use shardsearch::node;
use std::path::PathBuf;

const USAGE: &str = "\
Usage: shardsearch <role> [options]

Roles:
  frontend                     Query coordinator (GET /search?q=...&k=...)
  index --shard <n>            Index shard n
  doc --shard <n>              Document shard n
  all                          Frontend and every shard in one process
  build --corpus <file.jsonl>  Build partition files

Options:
  --config <path>              Cluster config (default: cluster.toml)
  --out <dir>                  build: output directory when no --config is given
  --index-shards <n>           build: index shard count (default 1)
  --doc-shards <n>             build: document shard count (default 1)
  --base-port <port>           build: first port of the generated config (default 8000)
  --verbose                    Debug logging";

struct Args {
    role: String,
    config: Option<PathBuf>,
    shard: Option<usize>,
    corpus: Option<PathBuf>,
    out: PathBuf,
    index_shards: usize,
    doc_shards: usize,
    base_port: u16,
    verbose: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let role = match args.get(1) {
        Some(role) => role.clone(),
        None => bail!("missing role"),
    };

    let mut parsed = Args {
        role,
        config: None,
        shard: None,
        corpus: None,
        out: PathBuf::from("data"),
        index_shards: 1,
        doc_shards: 1,
        base_port: DEFAULT_BASE_PORT,
        verbose: false,
    };

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--verbose" {
            parsed.verbose = true;
            i += 1;
            continue;
        }
        let value = args
            .get(i + 1)
            .with_context(|| format!("{} needs a value", flag))?;
        match flag {
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--shard" => parsed.shard = Some(value.parse().context("--shard")?),
            "--corpus" => parsed.corpus = Some(PathBuf::from(value)),
            "--out" => parsed.out = PathBuf::from(value),
            "--index-shards" => parsed.index_shards = value.parse().context("--index-shards")?,
            "--doc-shards" => parsed.doc_shards = value.parse().context("--doc-shards")?,
            "--base-port" => parsed.base_port = value.parse().context("--base-port")?,
            _ => bail!("unknown option {}", flag),
        }
        i += 2;
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("cluster.toml"));

    match args.role.as_str() {
        "frontend" => {
            let config = ClusterConfig::load(&config_path)?;
            node::run_frontend(&config).await
        }
        "index" => {
            let config = ClusterConfig::load(&config_path)?;
            let shard = args.shard.context("index requires --shard")?;
            node::run_index_shard(&config, shard).await
        }
        "doc" => {
            let config = ClusterConfig::load(&config_path)?;
            let shard = args.shard.context("doc requires --shard")?;
            node::run_document_shard(&config, shard).await
        }
        "all" => {
            let config = ClusterConfig::load(&config_path)?;
            tracing::info!(
                "Starting frontend, {} index shards and {} document shards",
                config.index_shards.len(),
                config.document_shards.len()
            );
            node::run_all(config).await
        }
        "build" => run_build(&args),
        other => {
            eprintln!("Unknown role {}\n\n{}", other, USAGE);
            std::process::exit(1);
        }
    }
}

/// Builds partitions for an existing config, or for a generated single-host layout
/// that is written next to the partitions.
fn run_build(args: &Args) -> anyhow::Result<()> {
    let corpus = args.corpus.as_ref().context("build requires --corpus")?;

    let (config, generated) = match &args.config {
        Some(path) => (ClusterConfig::load(path)?, None),
        None => {
            let config =
                ClusterConfig::local(args.base_port, args.index_shards, args.doc_shards, &args.out)?;
            config.validate()?;
            (config, Some(args.out.join("cluster.toml")))
        }
    };

    let records = read_corpus(corpus)?;
    let built = PartitionBuilder::from_config(&config).build(records)?;
    built.write(&config)?;

    if let Some(path) = generated {
        std::fs::write(&path, config.to_toml_string()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote cluster config to {}", path.display());
    }

    tracing::info!(
        "Build complete: {} documents into {} index / {} document partitions",
        built.report.documents,
        built.report.index_shards,
        built.report.document_shards
    );
    Ok(())
}
