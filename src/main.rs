//! Prefix-routing reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!  Client request     │  ┌────────┐    ┌───────────┐    ┌──────────┐  │
//!  ───────────────────┼─▶│  http  │───▶│  routing  │───▶│  proxy   │──┼──▶ Target
//!                     │  │ server │    │ (longest  │    │forwarder │  │
//!  Client response    │  │        │◀───│  prefix)  │◀───│          │◀─┼─── response
//!  ◀──────────────────┼──└───┬────┘    └─────▲─────┘    └──────────┘  │
//!                     │      │               │ routes                  │
//!                     │      ▼               │                         │
//!                     │  ┌────────┐    ┌─────┴─────┐    ┌──────────┐  │
//!                     │  │ admin  │───▶│  config   │───▶│  config  │  │
//!                     │  │  API   │    │  cache    │    │  store   │  │
//!                     │  └────────┘    └───────────┘    └──────────┘  │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use prefix_proxy::config::load_config;
use prefix_proxy::lifecycle::startup;
use prefix_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "prefix-proxy")]
#[command(about = "Reverse proxy routing by longest path prefix", long_about = None)]
struct Args {
    /// TOML settings file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability.log_level);
    tracing::info!("prefix-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
