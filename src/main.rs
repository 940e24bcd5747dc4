use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_api::{
    catalog::Catalog,
    config::{Config, StoreKind},
    db::{self, Cache, CacheWriterHandle, MemoryStore, PgStore},
    recommend::Snapshot,
    routes::{create_router, AppState},
    services::auth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopfront_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::from_path(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;
    let snapshot = Snapshot::build(catalog);

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            let (cache, handle) = Cache::new(client, config.recommendation_cache_ttl).await;
            tracing::info!("Recommendation cache enabled");
            (cache, Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, recommendation cache disabled");
            (Cache::disabled(config.recommendation_cache_ttl), None)
        }
    };

    let state = match config.store {
        StoreKind::Postgres => {
            let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
            db::run_migrations(&pool).await?;
            let store = PgStore::new(pool);
            auth::ensure_admin(&store, &config.admin_email, &config.admin_password).await?;
            AppState::new(snapshot, store, cache, config.admin_email.clone())
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, accounts and carts are lost on restart");
            let store = MemoryStore::new();
            auth::ensure_admin(&store, &config.admin_email, &config.admin_password).await?;
            AppState::new(snapshot, store, cache, config.admin_email.clone())
        }
    };

    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        shutdown_cache_writer(handle).await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

async fn shutdown_cache_writer(handle: CacheWriterHandle) {
    handle.shutdown().await;
    // Give the writer a moment to flush queued entries
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
