mod access;
mod analysis;
mod config;
mod errors;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::rules::RuleSet;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Insight API v{}", env!("CARGO_PKG_VERSION"));

    // Keyword and pattern tables
    let rules = match &config.rules_path {
        Some(path) => {
            let rules = Arc::new(RuleSet::load(path)?);
            info!("Rule table loaded from {}", path.display());
            rules
        }
        None => {
            info!("Using built-in rule table");
            RuleSet::builtin()
        }
    };

    info!(
        "Quota: {} requests/day for free tier, {} pro key(s) configured",
        config.free_daily_limit,
        config.pro_api_keys.len()
    );

    let state = AppState::new(config.clone(), rules);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
