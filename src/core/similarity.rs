//! Relative similarity of a query to two references.
//!
//! The closer reference wins. Its confidence is the share of the combined
//! distance held by the other reference: `round(100 * d_loser / (d_a + d_b))`.

use crate::{
    error::{AppError, Result},
    models::{
        comparison::{SimilarityResult, Winner},
        embedding::Embedding,
    },
};

/// Confidence reported when both distances are zero.
pub const DEGENERATE_CONFIDENCE: u8 = 50;

/// Decide whether `reference_a` or `reference_b` is closer to `query`.
///
/// Ties go to B: A only wins on a strictly smaller distance.
///
/// # Errors
///
/// [`AppError::DimensionMismatch`] unless all three vectors share one positive
/// length, [`AppError::InvalidInput`] for NaN or infinite components. Any
/// finite input of a valid shape yields a result.
pub fn score(
    reference_a: &Embedding,
    reference_b: &Embedding,
    query: &Embedding,
) -> Result<SimilarityResult> {
    check_dimensions(reference_a, reference_b, query)?;
    if ![reference_a, reference_b, query].iter().all(|e| e.is_finite()) {
        return Err(AppError::InvalidInput(
            "embeddings must contain only finite values".to_string(),
        ));
    }

    let (distance_a, distance_b, unit) = distances(reference_a, reference_b, query);

    let (winner, winner_distance, loser_distance) = if distance_a < distance_b {
        (Winner::A, distance_a, distance_b)
    } else {
        (Winner::B, distance_b, distance_a)
    };

    if loser_distance == 0.0 {
        log::debug!("All embeddings identical, falling back to {}%", DEGENERATE_CONFIDENCE);
        return Ok(SimilarityResult {
            winner,
            confidence_percent: DEGENERATE_CONFIDENCE,
            delta: 0.0,
            distance_a: 0.0,
            distance_b: 0.0,
            degenerate: true,
        });
    }

    // d_loser / (d_a + d_b), rearranged so the sum is never formed.
    let share = 1.0 / (1.0 + winner_distance / loser_distance);
    let confidence = (100.0 * share).round().clamp(0.0, 100.0);

    Ok(SimilarityResult {
        winner,
        confidence_percent: confidence as u8,
        delta: loser_distance * unit,
        distance_a: distance_a * unit,
        distance_b: distance_b * unit,
        degenerate: false,
    })
}

/// Both distances to the query in a common unit, followed by that unit.
///
/// Falls back to half-distances when a full distance is not representable;
/// scaling back by the unit can then give infinity in the reported distances,
/// but never in the ratio the confidence is built from.
fn distances(a: &Embedding, b: &Embedding, q: &Embedding) -> (f64, f64, f64) {
    let (full_a, full_b) = (a.euclidean_distance(q), b.euclidean_distance(q));
    if full_a.is_finite() && full_b.is_finite() {
        (full_a, full_b, 1.0)
    } else {
        (a.half_distance(q), b.half_distance(q), 2.0)
    }
}

fn check_dimensions(a: &Embedding, b: &Embedding, q: &Embedding) -> Result<()> {
    let expected = a.len();
    if expected == 0 {
        return Err(AppError::DimensionMismatch { expected: 1, found: 0 });
    }
    for other in [b, q] {
        if other.len() != expected {
            return Err(AppError::DimensionMismatch {
                expected,
                found: other.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(values: &[f64]) -> Embedding {
        Embedding::from(values.to_vec())
    }

    #[test]
    fn test_closer_reference_wins() {
        let result = score(&e(&[0.0, 0.0]), &e(&[10.0, 10.0]), &e(&[1.0, 1.0])).unwrap();
        assert_eq!(result.winner, Winner::A);
        assert_eq!(result.confidence_percent, 90);
        assert!((result.distance_a - 2f64.sqrt()).abs() < 1e-12);
        assert!((result.distance_b - 9.0 * 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(result.delta, result.distance_b);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_second_reference_wins() {
        let result = score(&e(&[10.0, 10.0]), &e(&[0.0, 0.0]), &e(&[1.0, 1.0])).unwrap();
        assert_eq!(result.winner, Winner::B);
        assert_eq!(result.confidence_percent, 90);
        assert_eq!(result.delta, result.distance_a);
    }

    #[test]
    fn test_exact_match_gives_full_confidence() {
        let result = score(&e(&[1.0, 2.0, 3.0]), &e(&[3.0, 2.0, 1.0]), &e(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.winner, Winner::A);
        assert_eq!(result.confidence_percent, 100);
    }

    #[test]
    fn test_tie_goes_to_b() {
        let a = e(&[1.0, 0.0]);
        let b = e(&[-1.0, 0.0]);
        let q = e(&[0.0, 0.0]);
        for _ in 0..3 {
            let result = score(&a, &b, &q).unwrap();
            assert_eq!(result.winner, Winner::B);
            assert_eq!(result.confidence_percent, 50);
        }
    }

    #[test]
    fn test_identical_embeddings_fall_back() {
        let v = e(&[1.0, 1.0, 1.0]);
        let result = score(&v, &v, &v).unwrap();
        assert!(result.degenerate);
        assert_eq!(result.confidence_percent, DEGENERATE_CONFIDENCE);
        assert_eq!(result.winner, Winner::B);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = score(&e(&[1.0, 2.0, 3.0]), &e(&[1.0, 2.0, 3.0]), &e(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap_err();
        assert!(matches!(err, AppError::DimensionMismatch { expected: 3, found: 4 }));

        let err = score(&e(&[]), &e(&[]), &e(&[])).unwrap_err();
        assert!(matches!(err, AppError::DimensionMismatch { found: 0, .. }));
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = score(&e(&[f64::NAN]), &e(&[1.0]), &e(&[0.0])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_huge_components_still_score() {
        let result = score(&e(&[0.0]), &e(&[1e200]), &e(&[1e190])).unwrap();
        assert_eq!(result.winner, Winner::A);
        assert_eq!(result.confidence_percent, 100);
        assert!(!result.degenerate);
        assert!((result.distance_a / 1e190 - 1.0).abs() < 1e-12);

        // Differences past f64::MAX are compared in half units.
        let result = score(&e(&[1.5e308]), &e(&[-1.5e308]), &e(&[1e308])).unwrap();
        assert_eq!(result.winner, Winner::A);
        assert_eq!(result.confidence_percent, 83);
        assert!(result.distance_b.is_infinite());
    }

    #[test]
    fn test_tiny_components_are_not_degenerate() {
        let result = score(&e(&[2e-170]), &e(&[-1e-170]), &e(&[0.0])).unwrap();
        assert_eq!(result.winner, Winner::B);
        assert_eq!(result.confidence_percent, 67);
        assert!(!result.degenerate);
        assert!((result.delta / 2e-170 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_stays_in_range() {
        let vectors = [
            e(&[0.3, -2.0, 5.5]),
            e(&[1e-9, 0.0, 0.0]),
            e(&[-7.0, 7.0, 0.25]),
            e(&[0.0, 0.0, 0.0]),
            e(&[1e6, -1e6, 3.0]),
        ];
        for a in &vectors {
            for b in &vectors {
                for q in &vectors {
                    let first = score(a, b, q).unwrap();
                    assert!(first.confidence_percent <= 100);
                    assert!(first.degenerate || first.confidence_percent >= 50);
                    assert_eq!(score(a, b, q).unwrap(), first);
                }
            }
        }
    }
}
