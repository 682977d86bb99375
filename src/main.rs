use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tripxplo_pricing::cache::{start_cache_warmer, AppCache};
use tripxplo_pricing::config::Config;
use tripxplo_pricing::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tripxplo_pricing=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let crm = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.crm_database_url)
        .await
        .context("connecting to CRM database")?;

    let quotes = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.quote_database_url)
        .await
        .context("connecting to quote database")?;

    let cache = AppCache::new();
    tokio::spawn(start_cache_warmer(
        cache.clone(),
        crm.clone(),
        config.cache_refresh,
    ));

    let state = AppState { crm, quotes, cache };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
