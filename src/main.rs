//! Typing Relay - Binary Entry Point
//!
//! This is the main entry point for the relay-server binary.

use clap::Parser;

use typing_relay::config::Config;
use typing_relay::error::RelayResult;
use typing_relay::{logging, server};

#[tokio::main]
async fn main() -> RelayResult<()> {
    let config = Config::parse();

    logging::init(config.json_logs)?;
    tracing::info!("{} v{} starting", typing_relay::NAME, typing_relay::VERSION);

    server::run(config).await
}
