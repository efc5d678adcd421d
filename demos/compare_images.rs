//! Example showing how to decide which of two images a third one resembles
//!
//! ```text
//! LOOKALIKE_PROJECT_ID=my-project LOOKALIKE_ACCESS_TOKEN=$(gcloud auth print-access-token) \
//!     cargo run --example compare_images -- hand.jpg laptop.jpg glove.jpg
//! ```

use lookalike::{compare, init, AppError, ComparisonInput, Config, EmbeddingClient, ImageBytes, ResultExt};

fn read_image(path: &str) -> lookalike::Result<ImageBytes> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    Ok(ImageBytes::from(data))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the application
    init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [image1, image2, query] = args.as_slice() else {
        return Err(AppError::InvalidInput(
            "usage: compare_images <image1> <image2> <query>".to_string(),
        )
        .into());
    };

    let config = Config::from_env()?;
    let client = EmbeddingClient::new(&config.service)?;

    let input = ComparisonInput {
        image1: read_image(image1)?,
        image2: read_image(image2)?,
        query: read_image(query)?,
    };

    let report = compare(&client, &input).await?;

    println!("{}", report.headline);
    println!("{}", report.delta_label);
    if report.result.degenerate {
        println!("(all three images produced the same embedding)");
    }

    Ok(())
}
