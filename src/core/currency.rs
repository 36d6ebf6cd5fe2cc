//! Currency codes, rate tables and rate snapshots

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Three letter ISO 4217 style code such as `USD`. Treated as an opaque key.
pub type CurrencyCode = String;

/// Normalizes user supplied codes: trims whitespace and upper-cases.
pub fn normalize_code(code: &str) -> CurrencyCode {
    code.trim().to_uppercase()
}

/// Exchange rates relative to an implicit base currency.
///
/// The base itself need not be present; its rate is conceptually `1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<CurrencyCode, f64>);

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates rates ordered by currency code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

impl<K: Into<CurrencyCode>> FromIterator<(K, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Immutable, timestamped copy of the rates fetched for one base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub table: RateTable,
    /// Date the service reports the rates as valid for.
    pub as_of: NaiveDate,
    /// Local time the response was received.
    pub retrieved_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(base: impl Into<CurrencyCode>, table: RateTable, as_of: NaiveDate) -> Self {
        Self {
            base: base.into(),
            table,
            as_of,
            retrieved_at: Utc::now(),
        }
    }
}
