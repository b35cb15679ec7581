use shareit::{
    adapters::{
        memory::{self, InMemoryDatabase},
        postgres,
    },
    api::{create_router, handlers::AppState},
    application::ServiceDependencies,
    config::AppConfig,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| shareit::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service_deps = build_service_dependencies(&config).await;

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

/// DATABASE_URL があればPostgreSQL、なければインメモリのストアで組み立てる
async fn build_service_dependencies(config: &AppConfig) -> ServiceDependencies {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!(
            "DATABASE_URL is not set; using the in-memory store (data is not persisted)"
        );
        return memory::service_dependencies(&InMemoryDatabase::new());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        max_connections = config.max_connections,
        "connected to PostgreSQL"
    );

    postgres::service_dependencies(&pool)
}
