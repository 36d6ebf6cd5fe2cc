//! Cross-rate conversion through a base currency

use super::currency::{CurrencyCode, RateSnapshot, RateTable};

fn rate_or_identity(rates: &RateTable, code: &str) -> f64 {
    rates.get(code).unwrap_or(1.0)
}

/// Converts `amount` from one currency to another using `rates` anchored at `base`.
///
/// Conversions that involve neither endpoint as the base are routed
/// source -> base -> target. Codes missing from `rates` (other than `base`)
/// take a rate of `1`; use [`missing_codes`] to detect that case. No rounding
/// is applied.
pub fn convert(amount: f64, from: &str, to: &str, rates: &RateTable, base: &str) -> f64 {
    if from == to {
        return amount;
    }

    if from == base {
        amount * rate_or_identity(rates, to)
    } else if to == base {
        amount / rate_or_identity(rates, from)
    } else {
        let in_base = amount / rate_or_identity(rates, from);
        in_base * rate_or_identity(rates, to)
    }
}

/// Codes among `from` and `to` that [`convert`] would silently treat as rate `1`.
pub fn missing_codes(from: &str, to: &str, rates: &RateTable, base: &str) -> Vec<CurrencyCode> {
    if from == to {
        return Vec::new();
    }

    let mut missing = Vec::new();
    for code in [from, to] {
        if code != base && !rates.contains(code) && !missing.iter().any(|m| m == code) {
            missing.push(code.to_string());
        }
    }
    missing
}

/// A conversion result with the unit rates in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub result: f64,
    /// Value of one unit of `from` in `to`.
    pub rate: f64,
    /// Value of one unit of `to` in `from`.
    pub inverse_rate: f64,
    pub missing: Vec<CurrencyCode>,
}

impl Quote {
    pub fn new(amount: f64, from: &str, to: &str, snapshot: &RateSnapshot) -> Self {
        let base = snapshot.base.as_str();
        let rates = &snapshot.table;
        let rate = convert(1.0, from, to, rates, base);

        Self {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            result: convert(amount, from, to, rates, base),
            rate,
            inverse_rate: convert(1.0, to, from, rates, base),
            missing: missing_codes(from, to, rates, base),
        }
    }
}
