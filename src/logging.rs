//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::error::{RelayError, RelayResult};

const DEFAULT_FILTER: &str = "typing_relay=info,relay_server=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(json: bool) -> RelayResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| RelayError::Logging(e.to_string()))
}
