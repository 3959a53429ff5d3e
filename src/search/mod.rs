//! Search Data Model
//!
//! Types and text processing shared by every role of the cluster.
//!
//! ## Submodules
//! - **`types`**: Postings, query vectors, scored documents and the response DTOs.
//! - **`tokenizer`**: Whitespace tokenization with a configurable normalization policy.
//!   The same policy is applied at build time and at query time.
//! - **`snippet`**: Deterministic excerpt selection around the first query match.

pub mod snippet;
pub mod tokenizer;
pub mod types;
