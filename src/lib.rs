#![doc(html_root_url = "https://docs.rs/lookalike/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # Lookalike
//!
//! Upload two reference images and a query image; Lookalike tells you which
//! reference the query resembles more, and how sure it is.
//!
//! Each image is turned into an embedding by a hosted multimodal model
//! (Vertex AI `multimodalembedding`). The reference with the smaller Euclidean
//! distance to the query wins, and its confidence is the other reference's
//! share of the combined distance.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lookalike::{compare, ComparisonInput, Config, EmbeddingClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     lookalike::init()?;
//!     let config = Config::from_env()?;
//!     let client = EmbeddingClient::new(&config.service)?;
//!
//!     let input = ComparisonInput {
//!         image1: std::fs::read("hand.jpg")?.into(),
//!         image2: std::fs::read("laptop.jpg")?.into(),
//!         query: std::fs::read("glove.jpg")?.into(),
//!     };
//!     let report = compare(&client, &input).await?;
//!     println!("{} ({})", report.headline, report.delta_label);
//!     Ok(())
//! }
//! ```

// Internal modules
pub mod api;
pub mod core;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
mod state;
mod utils;

#[allow(dead_code, missing_docs, unreachable_pub)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

// Public API exports
pub use crate::{
    core::{
        compare::{compare, ComparisonInput},
        embeddings::EmbeddingClient,
        similarity::{score, DEGENERATE_CONFIDENCE},
    },
    error::{AppError, Result, ResultExt},
    models::{
        comparison::{ComparisonReport, EmbedResponse, ScoreRequest, SimilarityResult, Slot, Winner},
        embedding::{Embedding, ImageBytes},
    },
    state::{AppState, Config, ServerConfig, ServiceConfig, SUPPORTED_DIMENSIONS},
};

#[cfg(feature = "web")]
pub use crate::api::{create_router, health_check};

/// Initialize the application with default settings
///
/// This function sets up logging. It should be called early in the
/// application startup process; later calls are no-ops.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for start-up checks.
///
/// # Example
///
/// ```no_run
/// use lookalike::init;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init()?;
///     // Application code here
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    // Initialize logging with sensible defaults
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    let initialized = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok();

    if initialized {
        log::info!("Initializing Lookalike {}", built_info::PKG_VERSION);
    }
    Ok(())
}
