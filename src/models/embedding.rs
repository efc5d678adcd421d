use bytes::Bytes;
use image::ImageFormat;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The raw contents of one uploaded image.
///
/// Held only for the duration of a request and never written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes(Bytes);

impl ImageBytes {
    /// Wraps already-received bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    /// Borrow the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when nothing was uploaded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sniffs the encoding, accepting only PNG and JPEG.
    pub fn format(&self) -> Result<ImageFormat> {
        crate::utils::sniff_image_format(&self.0)
    }
}

impl From<Vec<u8>> for ImageBytes {
    fn from(data: Vec<u8>) -> Self {
        Self(Bytes::from(data))
    }
}

impl From<Bytes> for ImageBytes {
    fn from(data: Bytes) -> Self {
        Self(data)
    }
}

/// A fixed-length vector produced by the embedding service for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct Embedding(Array1<f64>);

impl Embedding {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for a zero-length vector.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View as an ndarray vector.
    pub fn as_array(&self) -> &Array1<f64> {
        &self.0
    }

    /// `true` when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Euclidean (L2) distance to `other`.
    ///
    /// Accumulated with `hypot`, so large or tiny components neither overflow
    /// nor underflow when squared. Infinite only when a single component
    /// difference exceeds `f64::MAX`.
    ///
    /// Callers must ensure both vectors have the same length; ndarray panics on
    /// a shape mismatch.
    pub(crate) fn euclidean_distance(&self, other: &Embedding) -> f64 {
        let diff = &self.0 - &other.0;
        diff.fold(0.0, |acc: f64, &v| acc.hypot(v))
    }

    /// Half the Euclidean distance to `other`, computed from halved
    /// components so it stays finite for any finite inputs.
    pub(crate) fn half_distance(&self, other: &Embedding) -> f64 {
        let diff = &self.0 * 0.5 - &other.0 * 0.5;
        diff.fold(0.0, |acc: f64, &v| acc.hypot(v))
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(values: Vec<f64>) -> Self {
        Self(Array1::from(values))
    }
}

impl From<Array1<f64>> for Embedding {
    fn from(values: Array1<f64>) -> Self {
        Self(values)
    }
}

impl From<Embedding> for Vec<f64> {
    fn from(embedding: Embedding) -> Self {
        embedding.0.to_vec()
    }
}
