// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stepquest API Server
//!
//! Hosts the OAuth session and the route-progress engine behind a thin HTTP
//! surface, including the provider's redirect callback endpoint.

use std::sync::Arc;

use stepquest::{
    config::Config,
    provider::{GoogleFitGateway, ProviderGateway},
    services::{AuthSession, ProgressEngine},
    store::{FileBackend, MemoryBackend, PrefsStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Stepquest API");

    // Open the preferences store
    let prefs = match &config.prefs_path {
        Some(path) => {
            tracing::info!(path = %path, "Opening preferences file");
            PrefsStore::new(Arc::new(
                FileBackend::open(path).expect("Failed to open preferences file"),
            ))
        }
        None => {
            tracing::warn!("PREFS_PATH not set, preferences will not survive a restart");
            PrefsStore::new(Arc::new(MemoryBackend::default()))
        }
    };

    // Select the provider gateway. This is the only place that knows which
    // concrete provider is in play; everything downstream sees the trait.
    let provider: Arc<dyn ProviderGateway> = Arc::new(GoogleFitGateway::new(
        config.oauth_client_id.clone(),
        config.oauth_client_secret.clone(),
        config.oauth_redirect_url.clone(),
    ));

    // Restore the auth session from persisted credentials
    let auth = Arc::new(
        AuthSession::restore(provider.clone(), prefs.clone())
            .expect("Failed to restore auth session"),
    );

    // Progress engine with the configured steps-per-km ratio
    let engine = Arc::new(
        ProgressEngine::new(
            auth.clone(),
            provider,
            prefs.clone(),
            config.steps_per_km,
        )
        .expect("Failed to initialize progress engine"),
    );
    tracing::info!(steps_per_km = config.steps_per_km, "Progress engine ready");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        prefs,
        auth,
        engine,
    });

    // Build router
    let app = stepquest::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stepquest=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
