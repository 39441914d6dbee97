//! Serve the simulated admin backend over HTTP.
//!
//! # Examples
//! ```sh
//! PAWSTAY_MOCK_LATENCY_MS=0 cargo run --bin mock-api -- --bind 127.0.0.1:8081
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use pawstay_console::ClientSettings;
use pawstay_console::inbound::http::{MockApiState, configure};
use pawstay_console::outbound::TokioSleeper;
use pawstay_console::outbound::simulation::MockRouter;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `mock-api` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "mock-api", about = "Serve the simulated Pawstay admin API", version)]
struct CliArgs {
    /// Socket address to listen on.
    #[arg(long, value_name = "addr", default_value = "127.0.0.1:8081")]
    bind: SocketAddr,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ClientSettings::load_from_iter([OsString::from("mock-api")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let router = MockRouter::new(
        Arc::new(DefaultClock),
        Arc::new(TokioSleeper),
        settings.mock_latency(),
    );
    let state = web::Data::new(MockApiState::new(router));

    info!(bind = %args.bind, latency_ms = settings.mock_latency().as_millis(), "mock API listening");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(args.bind)?
        .run()
        .await
}
