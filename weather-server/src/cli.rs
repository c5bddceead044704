use anyhow::Context;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use weather_core::{
    Config, ConfigOverrides, FileConfig, geo::geolocator_from_config, http::build_client,
    provider::provider_from_config,
};

use crate::routes::{AppState, create_router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-server",
    version,
    about = "Serves the current weather for the caller's IP address"
)]
pub struct Cli {
    /// meteoblue API key.
    #[arg(long, env = "METEOBLUE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Port to listen on [default: 8080].
    #[arg(long, env = "PORT")]
    pub port: Option<String>,

    /// Total timeout for each upstream request, in seconds. Unset or 0 waits forever.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Path to a TOML config file. Defaults to the platform config directory.
    #[arg(long, env = "WEATHER_RELAY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the configuration from flags, environment and config file.
    pub fn config(&self) -> anyhow::Result<Config> {
        let file = FileConfig::load(self.config.as_deref())?;
        let overrides = ConfigOverrides {
            api_key: self.api_key.clone(),
            port: self.port.clone(),
            timeout_secs: self.timeout_secs,
        };

        Config::resolve(overrides, file)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.config()?;
        let state = app_state(&config)?;
        let app = create_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("Server started on port {}...", config.port);

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Build the handler state from the resolved configuration.
pub fn app_state(config: &Config) -> anyhow::Result<AppState> {
    let http = build_client(config.upstream_timeout)?;

    Ok(AppState {
        geo: Arc::from(geolocator_from_config(config, http.clone())),
        weather: Arc::from(provider_from_config(config, http)),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
