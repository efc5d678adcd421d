use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::embedding::Embedding;

/// One of the three upload positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// First reference image.
    Image1,
    /// Second reference image.
    Image2,
    /// The image being compared against both references.
    Query,
}

impl Slot {
    /// All slots in upload order.
    pub const ALL: [Slot; 3] = [Slot::Image1, Slot::Image2, Slot::Query];

    /// Multipart field name used by the compare endpoint.
    pub fn field_name(self) -> &'static str {
        match self {
            Slot::Image1 => "image1",
            Slot::Image2 => "image2",
            Slot::Query => "query",
        }
    }

    /// Looks a slot up by multipart field name.
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.field_name() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Slot::Image1 => "Image 1",
            Slot::Image2 => "Image 2",
            Slot::Query => "Query image",
        };
        f.write_str(label)
    }
}

/// Which reference image is closer to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// The first reference (Image 1).
    A,
    /// The second reference (Image 2).
    B,
}

impl Winner {
    /// The upload slot of the winning reference.
    pub fn slot(self) -> Slot {
        match self {
            Winner::A => Slot::Image1,
            Winner::B => Slot::Image2,
        }
    }
}

/// Outcome of scoring one triple of embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// The closer reference.
    pub winner: Winner,
    /// Winner's confidence, 0 to 100.
    pub confidence_percent: u8,
    /// Distance of the losing reference to the query.
    pub delta: f64,
    /// Distance from reference A to the query.
    pub distance_a: f64,
    /// Distance from reference B to the query.
    pub distance_b: f64,
    /// Set when both distances are zero and the confidence is the 50% fallback.
    pub degenerate: bool,
}

/// Body of `POST /api/score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Embedding of Image 1.
    pub reference_a: Embedding,
    /// Embedding of Image 2.
    pub reference_b: Embedding,
    /// Embedding of the query image.
    pub query: Embedding,
}

/// Data of `POST /api/embed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Vector length.
    pub dimension: usize,
    /// The embedding itself.
    pub embedding: Embedding,
}

/// Full answer for a three-image comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Raw scoring output.
    pub result: SimilarityResult,
    /// Length of the embeddings that were compared.
    pub dimension: usize,
    /// e.g. `"90% Image 1"`.
    pub headline: String,
    /// e.g. `"vector distance 1.27e+01"`.
    pub delta_label: String,
}

impl ComparisonReport {
    /// Builds the report, rendering the labels shown to users.
    pub fn new(result: SimilarityResult, dimension: usize) -> Self {
        let headline = format!("{}% {}", result.confidence_percent, result.winner.slot());
        let delta_label = format!("vector distance {}", scientific(result.delta));
        Self {
            result,
            dimension,
            headline,
            delta_label,
        }
    }
}

/// Two-decimal scientific notation with a signed, at least two-digit exponent
/// (`1.27e+01`), as C's `%.2e` prints it.
fn scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        // inf / NaN
        None => formatted,
    }
}
