//! Document Shard Module
//!
//! One document shard owns every document with `shard(doc_id)` equal to its id and
//! enriches ranked doc ids with title, url and a query-dependent snippet.
//!
//! ## Submodules
//! - **`store`**: `DocumentPartition`, the read-only doc id -> record map.
//! - **`service`**: Lookup, ownership check and snippet selection.
//! - **`protocol`**: Endpoint and DTOs exchanged with the coordinator.
//! - **`handlers`**: Axum handlers and router for the shard process.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod store;
