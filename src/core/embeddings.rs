use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::embedding::{Embedding, ImageBytes},
    state::ServiceConfig,
};

/// Client for a hosted multimodal embedding model (Vertex AI `:predict`).
///
/// Every call goes to the service; nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    predict_url: String,
    access_token: Option<String>,
    dimension: Option<usize>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Parameters>,
}

#[derive(Serialize)]
struct Instance<'a> {
    image: InlineImage<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage<'a> {
    bytes_base64_encoded: &'a str,
}

#[derive(Serialize)]
struct Parameters {
    dimension: usize,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    image_embedding: Option<Vec<f64>>,
}

impl EmbeddingClient {
    /// Create a client from the process-wide service configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let predict_url = config.predict_url()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        log::info!("Embedding service endpoint: {}", predict_url);

        Ok(Self {
            http,
            predict_url,
            access_token: config.access_token.clone(),
            dimension: config.dimension,
        })
    }

    /// The URL requests are posted to
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Compute an embedding for an image
    pub async fn embed(&self, image: &ImageBytes) -> Result<Embedding> {
        let format = image.format()?;
        log::debug!("Embedding {:?} image of {} bytes", format, image.len());

        let encoded = base64::engine::general_purpose::STANDARD.encode(image.as_slice());
        let body = PredictRequest {
            instances: [Instance {
                image: InlineImage {
                    bytes_base64_encoded: &encoded,
                },
            }],
            parameters: self.dimension.map(|dimension| Parameters { dimension }),
        };

        let mut request = self.http.post(&self.predict_url).json(&body);
        if let Some(token) = self.access_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    log::debug!("Could not read error body from embedding service: {}", e);
                    String::new()
                }
            };
            log::warn!("Embedding service returned {}: {}", status, text);
            return Err(AppError::Service {
                message: format!("service returned {}: {}", status, text.trim()),
                status: Some(status.as_u16()),
            });
        }

        let parsed: PredictResponse = response.json().await?;
        self.extract_embedding(parsed)
    }

    fn extract_embedding(&self, response: PredictResponse) -> Result<Embedding> {
        let values = response
            .predictions
            .into_iter()
            .next()
            .and_then(|p| p.image_embedding)
            .ok_or_else(|| AppError::service("response contained no image embedding"))?;

        if values.is_empty() {
            return Err(AppError::service("service returned an empty embedding"));
        }
        if let Some(expected) = self.dimension {
            if values.len() != expected {
                return Err(AppError::service(format!(
                    "expected a {}-dimensional embedding, got {}",
                    expected,
                    values.len()
                )));
            }
        }

        Ok(Embedding::from(values))
    }
}
