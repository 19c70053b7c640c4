//! Provider plugin binary
//!
//! Speaks the line-delimited JSON protocol on stdin/stdout. Logs go to
//! stderr since stdout carries the protocol.

use std::process::ExitCode;

use anyhow::Context;
use terraform_provider_njalla::{NjallaProvider, serve};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("provider exited with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    tracing::info!(
        "Starting Njalla provider {} on stdio transport",
        env!("CARGO_PKG_VERSION")
    );

    let provider = NjallaProvider::new();
    serve(
        &provider,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
    .context("serving requests over stdio")?;

    tracing::info!("Njalla provider stopped");
    Ok(())
}
