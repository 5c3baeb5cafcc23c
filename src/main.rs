mod api;
mod migration;
mod storage;
mod utils;


use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    utils::init_logging();

    let config = utils::Config::from_env();

    tracing::info!(
        table = %config.table_name,
        region = %config.aws_region,
        "Starting category migration service on port {}",
        config.api_port
    );

    // Initialize storage layer
    let store = Arc::new(
        storage::DynamoStore::new(
            config.table_name.clone(),
            config.category_attribute.clone(),
        )
        .await?,
    );

    // Initialize metrics
    let metrics = Arc::new(utils::Metrics::new());

    let migration_state = Arc::new(api::MigrationState {
        runner: migration::MigrationRunner::new(
            store,
            metrics.clone(),
            config.batch_size,
            config.category_attribute.clone(),
        ),
        run_deadline_secs: config.run_deadline_secs,
    });

    // Build routers
    let app = Router::new()
        // Health & Admin Routes
        .nest("/api/admin", api::admin_router(metrics))
        // Migration Routes
        .nest("/api/migration", api::migration_router(migration_state))
        // Root health check
        .route("/health", get(health_check))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(logging_middleware)),
        );

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.api_port)).await?;

    tracing::info!("Server listening on port {}", config.api_port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Logging middleware
async fn logging_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
