// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use neurotriumph_server::{
    api::router, config::AppConfig, logging, mail::LogMailer, state::AppState,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_format);

    let state = AppState::new(config.secret, Arc::new(LogMailer));
    let app = match router(state) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "invalid route configuration");
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(addr = %config.bind_addr, "Neurotriumph server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
