use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::core::embeddings::EmbeddingClient;
use crate::error::{AppError, Result};

/// Output sizes the multimodal embedding model can produce.
pub const SUPPORTED_DIMENSIONS: [usize; 4] = [128, 256, 512, 1408];

/// Configuration for the application
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Embedding service configuration
    pub service: ServiceConfig,
}

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the server binds to
    pub bind_addr: SocketAddr,
    /// Maximum request body size in bytes
    pub max_upload_size: usize,
}

/// Where and how to reach the embedding service.
///
/// Built once at start-up and handed to [`EmbeddingClient::new`].
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Google Cloud project hosting the model
    pub project_id: Option<String>,
    /// Region, e.g. `asia-northeast1`
    pub location: String,
    /// Publisher model name
    pub model: String,
    /// OAuth access token sent as a bearer credential
    pub access_token: Option<String>,
    /// Full predict URL, overriding the one derived from project and location
    pub endpoint: Option<String>,
    /// Requested embedding length; the service default when unset
    pub dimension: Option<usize>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_size: 20 * 1024 * 1024, // 20MB
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: String::from("asia-northeast1"),
            model: String::from("multimodalembedding@001"),
            access_token: None,
            endpoint: None,
            dimension: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from `LOOKALIKE_*` environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Config::default();

        if let Some(addr) = env_var("LOOKALIKE_BIND") {
            config.server.bind_addr = addr
                .parse()
                .map_err(|e| AppError::Config(format!("LOOKALIKE_BIND={}: {}", addr, e)))?;
        }
        if let Some(size) = env_var("LOOKALIKE_MAX_UPLOAD_BYTES") {
            config.server.max_upload_size = parse_number("LOOKALIKE_MAX_UPLOAD_BYTES", &size)?;
        }

        let service = &mut config.service;
        service.project_id = env_var("LOOKALIKE_PROJECT_ID");
        if let Some(location) = env_var("LOOKALIKE_LOCATION") {
            service.location = location;
        }
        if let Some(model) = env_var("LOOKALIKE_MODEL") {
            service.model = model;
        }
        service.access_token = env_var("LOOKALIKE_ACCESS_TOKEN");
        service.endpoint = env_var("LOOKALIKE_ENDPOINT");
        if let Some(dimension) = env_var("LOOKALIKE_DIMENSION") {
            service.dimension = Some(parse_number("LOOKALIKE_DIMENSION", &dimension)?);
        }
        if let Some(secs) = env_var("LOOKALIKE_TIMEOUT_SECS") {
            service.timeout = Duration::from_secs(parse_number("LOOKALIKE_TIMEOUT_SECS", &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the embedding service can actually be addressed.
    pub fn validate(&self) -> Result<()> {
        self.service.validate()
    }
}

impl ServiceConfig {
    /// Config that sends every request to `endpoint` as-is.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Check the settings hang together.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_none() && self.project_id.is_none() {
            return Err(AppError::Config(
                "LOOKALIKE_PROJECT_ID is required unless LOOKALIKE_ENDPOINT is set".to_string(),
            ));
        }
        if let Some(dimension) = self.dimension {
            if !SUPPORTED_DIMENSIONS.contains(&dimension) {
                return Err(AppError::Config(format!(
                    "unsupported embedding dimension {}, expected one of {:?}",
                    dimension, SUPPORTED_DIMENSIONS
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(AppError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// The `:predict` URL requests are posted to.
    pub fn predict_url(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        let project = self.project_id.as_deref().ok_or_else(|| {
            AppError::Config("no project id configured for the embedding service".to_string())
        })?;
        Ok(format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:predict",
            location = self.location,
            project = project,
            model = self.model,
        ))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::Config(format!("{}={}: {}", name, value, e)))
}

/// Application state that can be shared across handlers
#[derive(Clone)]
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Shared embedding service client
    pub embedding_client: EmbeddingClient,
}

impl AppState {
    /// Create the application state, building the embedding client once
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let embedding_client = EmbeddingClient::new(&config.service)?;

        Ok(Arc::new(Self {
            config,
            embedding_client,
        }))
    }
}
