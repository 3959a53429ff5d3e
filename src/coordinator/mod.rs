//! Query Coordinator Module
//!
//! The frontend of the cluster. It owns no data: every query is scattered to the index
//! shards, merged into one ranking, and the top results are routed to their document
//! shards for enrichment.
//!
//! ## Failure Policy
//! - An index shard that fails or times out contributes nothing; the response is marked
//!   `partial` and lists the shard.
//! - A document that cannot be resolved is dropped from the response and counted.
//! - A document shard that does not own a routed doc id fails the whole query, since
//!   the sharding function and the partition layout disagree.
//!
//! ## Submodules
//! - **`client`**: Shard client traits with HTTP and in-process implementations.
//! - **`engine`**: Order-independent merge and deterministic ranking.
//! - **`service`**: The two-phase scatter-gather pipeline.
//! - **`protocol`**: Public endpoint and request parameters.
//! - **`handlers`**: Axum handler and router for the frontend process.

pub mod client;
pub mod engine;
pub mod handlers;
pub mod protocol;
pub mod service;

#[cfg(test)]
mod tests;
