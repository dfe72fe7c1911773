use std::sync::Arc;

use auth::Authenticator;
use blog_service::config::Config;
use blog_service::inbound::http::router::create_router;
use blog_service::inbound::http::router::AppState;
use blog_service::outbound::repositories::InMemoryStore;
use blog_service::outbound::repositories::PostgresPostRepository;
use blog_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "blog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let settings = config.auth_settings()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_seconds = settings.token_ttl().num_seconds(),
        feed_page_size = config.feed.page_size,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(&settings));

    let state = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresPostRepository::new(pg_pool)),
                authenticator,
                config.feed.page_size,
            )
        }
        None => {
            tracing::warn!("No database configured, data is kept in memory only");
            let store = Arc::new(InMemoryStore::new());

            AppState::new(
                Arc::clone(&store),
                store,
                authenticator,
                config.feed.page_size,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
