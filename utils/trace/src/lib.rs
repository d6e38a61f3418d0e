//! Process-wide tracing setup shared by the workspace binaries.

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when it is set and parses.
pub fn init(level: &str) -> Result<(), TracingInitError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| parse_filter(level))?;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact());

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn parse_filter(level: &str) -> Result<EnvFilter, TracingInitError> {
    EnvFilter::try_new(level).map_err(|source| TracingInitError::InvalidFilter {
        filter: level.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("InvalidFilter: {filter}: {source}")]
    InvalidFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("SetGlobalDefault: {source}")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}
