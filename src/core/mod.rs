//! Core functionality: embedding images and scoring them

/// Fans the three embedding calls out and scores the result.
pub mod compare;
/// Client for the hosted embedding service.
pub mod embeddings;
/// Euclidean-distance scoring of a query against two references.
pub mod similarity;
