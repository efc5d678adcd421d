//! Data types passed between the embedding client, the scorer and the API

/// Scoring results, upload slots and API payloads.
pub mod comparison;
/// Image bytes and embedding vectors.
pub mod embedding;
