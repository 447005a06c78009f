//! APS Viewer - backend for uploading and viewing design files.
//!
//! This binary loads configuration, wires the APS clients and starts the
//! HTTP server.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aps_viewer::{
    config::Config,
    server::{create_router, RouterConfig},
    ApsService, HttpAuthClient, HttpDerivativeClient, HttpObjectStore, DEFAULT_BASE_URL,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    // Fail fast on missing credentials; nothing binds before this passes.
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bucket = config.bucket();

    info!("Configuration:");
    info!("  Bucket: {}", bucket);
    info!("  Static assets: {}", config.wwwroot.display());
    info!("  Request timeout: {}s", config.request_timeout);

    // One connection pool shared by all three clients.
    let http = reqwest::Client::new();
    let service = ApsService::new(
        HttpAuthClient::new(
            http.clone(),
            DEFAULT_BASE_URL,
            config.client_id_or_empty(),
            config.client_secret_or_empty(),
        ),
        HttpObjectStore::new(http.clone(), DEFAULT_BASE_URL),
        HttpDerivativeClient::new(http, DEFAULT_BASE_URL),
        bucket,
    );

    let mut router_config = RouterConfig::new()
        .with_request_timeout(Duration::from_secs(config.request_timeout))
        .with_wwwroot(config.wwwroot.clone())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    let router = create_router(service, router_config);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "aps_viewer=debug,tower_http=debug"
    } else {
        "aps_viewer=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
