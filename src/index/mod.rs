//! Index Shard Module
//!
//! One index shard holds a disjoint slice of the vocabulary and answers partial
//! scoring requests for it.
//!
//! ## Submodules
//! - **`store`**: `IndexPartition`, the read-only token -> posting list map.
//! - **`service`**: Dot-product scoring of a query against the local postings.
//! - **`protocol`**: Endpoint and DTOs exchanged with the coordinator.
//! - **`handlers`**: Axum handlers and router for the shard process.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod store;
