//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod provider;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{Quote, convert};
pub use currency::{CurrencyCode, RateSnapshot, RateTable};
pub use provider::{FetchState, RateProvider};
pub use rates::{EmptyBase, FetchError, FetchErrorKind, RateSource};
