use axum::{
    extract::{multipart::Field, Multipart, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    core::{
        compare::{compare, ComparisonInput},
        similarity,
    },
    error::{AppError, Result},
    models::{
        comparison::{EmbedResponse, ScoreRequest, Slot},
        embedding::ImageBytes,
    },
    utils::{validate_file_extension, ALLOWED_EXTENSIONS},
    AppState,
};

use super::responses::ApiResponse;

/// Multipart field carrying the image for `/api/embed`.
const EMBED_FIELD: &str = "image";

/// Read one uploaded file, checking its name and that it is not empty.
async fn read_image_field(field: Field<'_>) -> Result<ImageBytes> {
    let field_name = field.name().unwrap_or("").to_string();
    let file_name = field
        .file_name()
        .ok_or_else(|| AppError::UploadError(format!("no filename provided for '{}'", field_name)))?
        .to_string();

    if !validate_file_extension(&file_name, ALLOWED_EXTENSIONS) {
        return Err(AppError::UploadError(format!(
            "unsupported file type '{}', expected one of {:?}",
            file_name, ALLOWED_EXTENSIONS
        )));
    }

    let content = field.bytes().await?;
    if content.is_empty() {
        return Err(AppError::UploadError(format!("'{}' is empty", file_name)));
    }
    log::debug!("Received '{}' ({} bytes) as {}", file_name, content.len(), field_name);

    Ok(ImageBytes::from(content))
}

pub(crate) async fn embed_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(EMBED_FIELD) {
            image = Some(read_image_field(field).await?);
        }
    }

    let image = image.ok_or_else(|| {
        AppError::UploadError(format!("no '{}' file provided", EMBED_FIELD))
    })?;
    let embedding = state.embedding_client.embed(&image).await?;

    Ok(ApiResponse::success(EmbedResponse {
        dimension: embedding.len(),
        embedding,
    }))
}

pub(crate) async fn score_embeddings(Json(request): Json<ScoreRequest>) -> Result<impl IntoResponse> {
    let result = similarity::score(&request.reference_a, &request.reference_b, &request.query)?;
    Ok(ApiResponse::success(result))
}

pub(crate) async fn compare_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut images: HashMap<Slot, ImageBytes> = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(slot) = field.name().and_then(Slot::from_field_name) else {
            continue;
        };
        let image = read_image_field(field).await.map_err(|e| AppError::SlotFailed {
            slot,
            source: Box::new(e),
        })?;
        images.insert(slot, image);
    }

    let mut take = |slot: Slot| {
        images.remove(&slot).ok_or_else(|| {
            AppError::UploadError(format!("{} missing (field '{}')", slot, slot.field_name()))
        })
    };
    let input = ComparisonInput {
        image1: take(Slot::Image1)?,
        image2: take(Slot::Image2)?,
        query: take(Slot::Query)?,
    };

    let report = compare(&state.embedding_client, &input).await?;
    Ok(ApiResponse::success(report))
}
