use tracing::{info, warn};

use inkpaint_server::{AppStateInner, Config, Database, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpaint_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set, using the development secret");
    }
    match &config.static_dir {
        Some(dir) if !dir.is_dir() => warn!("Static directory {} does not exist", dir.display()),
        Some(dir) => info!("Serving static files from {}", dir.display()),
        None => info!("Static file serving disabled"),
    }

    let db = Database::connect(&config.database_url).await?;
    let addr = config.addr();
    let app = router(AppStateInner::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("InkPaint server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
