use std::sync::Arc;

use anyhow::Context;

use clinic_api::state::AppState;
use clinic_api::store::PgGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic_api=debug,tower_http=info".into()),
        )
        .init();

    let config = clinic_api::config::config();
    tracing::info!("Starting Clinic API in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let gateway = PgGateway::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let app = clinic_api::app(AppState::new(Arc::new(gateway)));

    // Allow tests or deployments to override port via env
    let port = std::env::var("CLINIC_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Clinic API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
