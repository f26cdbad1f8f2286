//! Server configuration from command line and environment

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// What to do with a typing event whose `user` is missing or not a string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingUserPolicy {
    /// Ignore the event
    #[default]
    Drop,
    /// Track and broadcast it under the empty identity
    Relay,
}

/// Realtime chat relay with typing presence
#[derive(Parser, Clone, Debug)]
#[command(name = "relay-server", version, about = "Realtime chat relay with typing presence")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "RELAY_PORT", default_value = "3000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "RELAY_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Directory of static files to serve alongside the WebSocket endpoint
    #[arg(long, env = "RELAY_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// Seconds between typing-presence audit log lines
    #[arg(long, env = "RELAY_AUDIT_INTERVAL_SECS", default_value = "10")]
    pub audit_interval_secs: u64,

    /// Handling of typing events without a user
    #[arg(long, env = "RELAY_MISSING_USER", value_enum, default_value = "drop")]
    pub missing_user: MissingUserPolicy,

    /// Enable structured JSON logging
    #[arg(long, env = "RELAY_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// `host:port` string for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn audit_interval(&self) -> Duration {
        Duration::from_secs(self.audit_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            public_dir: None,
            audit_interval_secs: 10,
            missing_user: MissingUserPolicy::Drop,
            json_logs: false,
        }
    }
}
