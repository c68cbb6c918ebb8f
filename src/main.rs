use anyhow::Context;
use document_lending::{
    adapters::{
        SystemClock,
        postgres::{PostgresDocumentCatalog, PostgresLoanRepository},
    },
    api::{handlers::AppState, router::create_router},
    application::lending::{DocumentGuards, ServiceDependencies},
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("document_lending={},tower_http=debug", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting document-lending v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Connected to database");

    // Initialize adapters
    let service_deps = ServiceDependencies::new(
        Arc::new(PostgresLoanRepository::new(pool.clone())),
        Arc::new(PostgresDocumentCatalog::new(pool.clone())),
        Arc::new(SystemClock),
    )
    .with_document_guards(Arc::new(DocumentGuards::with_prune_threshold(
        config.lending.guard_prune_threshold,
    )));

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
