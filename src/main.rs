use lookalike::{create_router, init, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the application
    init()?;

    // Service settings are read once and shared with every request
    let config = Config::from_env()?;
    let addr = config.server.bind_addr;
    let state = AppState::new(config)?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
