use futures::future;

use crate::{
    core::{embeddings::EmbeddingClient, similarity},
    error::{AppError, Result},
    models::{
        comparison::{ComparisonReport, Slot},
        embedding::{Embedding, ImageBytes},
    },
};

/// The three images of one comparison.
#[derive(Debug, Clone)]
pub struct ComparisonInput {
    /// First reference
    pub image1: ImageBytes,
    /// Second reference
    pub image2: ImageBytes,
    /// Image compared against both references
    pub query: ImageBytes,
}

impl ComparisonInput {
    fn get(&self, slot: Slot) -> &ImageBytes {
        match slot {
            Slot::Image1 => &self.image1,
            Slot::Image2 => &self.image2,
            Slot::Query => &self.query,
        }
    }
}

/// Embed all three images concurrently, then score them.
///
/// If any slot fails, the first failing slot (in upload order) is returned as
/// [`AppError::SlotFailed`]; no partial result is produced.
pub async fn compare(client: &EmbeddingClient, input: &ComparisonInput) -> Result<ComparisonReport> {
    let [image1, image2, query] = Slot::ALL.map(|slot| client.embed(input.get(slot)));
    let (image1, image2, query) = future::join3(image1, image2, query).await;

    let mut embeddings: Vec<Embedding> = Vec::with_capacity(3);
    let mut first_failure = None;
    for (slot, outcome) in Slot::ALL.into_iter().zip([image1, image2, query]) {
        match outcome {
            Ok(embedding) => embeddings.push(embedding),
            Err(err) => {
                log::warn!("{} could not be embedded: {}", slot, err);
                first_failure.get_or_insert(AppError::SlotFailed {
                    slot,
                    source: Box::new(err),
                });
            }
        }
    }
    if let Some(err) = first_failure {
        return Err(err);
    }

    let result = similarity::score(&embeddings[0], &embeddings[1], &embeddings[2])?;
    log::info!(
        "{} wins with {}% (d1={:.4}, d2={:.4})",
        result.winner.slot(),
        result.confidence_percent,
        result.distance_a,
        result.distance_b
    );

    Ok(ComparisonReport::new(result, embeddings[0].len()))
}
