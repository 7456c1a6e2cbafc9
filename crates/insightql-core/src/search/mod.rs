//! Search execution and result shaping
//!
//! Provides:
//! - A backend seam with an HTTP OpenSearch implementation
//! - Per-document deduplication of chunk hits
//! - Projection of hits onto renamed fields

mod backend;
mod dedup;
mod mapper;

pub use backend::{ClusterHealth, HttpSearchBackend, SearchBackend};
pub use dedup::{get_unique_docs, HitsEnvelope, SearchResultEnvelope, TotalHits};
pub use mapper::map_hits;
