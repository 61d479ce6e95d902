// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing::{info, warn};

use privy_wallet_server::{
    api::router, config::AppConfig, logging::init_tracing, state::AppState,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();
    init_tracing(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if !config.privy.is_configured() {
        warn!(
            missing = ?config.privy.missing(),
            "Privy credentials incomplete; Privy routes will answer 500"
        );
    }

    let state = AppState::from_config(&config.privy).expect("Invalid PRIVY_VERIFICATION_KEY");
    let app = router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .expect("Failed to parse bind address");

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    match config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .expect("Failed to load TLS certificate and key");
            info!(%addr, "Privy wallet server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            warn!("TLS_CERT_PATH/TLS_KEY_PATH not set; serving plain HTTP");
            info!(%addr, "Privy wallet server listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }
}

