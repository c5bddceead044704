//! Binary crate for the `weather-server` relay.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and environment
//! - Resolving the caller's IP address
//! - Serving `GET /getWeather` over HTTP

use clap::Parser;

mod cli;
mod client_ip;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
