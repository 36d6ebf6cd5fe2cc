//! Exchange rate retrieval abstractions

use super::currency::RateSnapshot;
use async_trait::async_trait;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Network,
    Remote,
    Parse,
}

impl Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FetchErrorKind::Network => "NetworkError",
                FetchErrorKind::Remote => "RemoteError",
                FetchErrorKind::Parse => "ParseError",
            }
        )
    }
}

/// Failure to retrieve rates. None of these are fatal; the caller may refresh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to fetch exchange rates: {status}")]
    Remote { status: u16 },
    #[error("Failed to parse exchange rates: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Remote { .. } => FetchErrorKind::Remote,
            FetchError::Parse(_) => FetchErrorKind::Parse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Base currency code must not be empty")]
pub struct EmptyBase;

/// A remote service that knows the rates for a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Performs exactly one retrieval for `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, FetchError>;
}
