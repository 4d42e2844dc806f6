use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Cents;

/// Failure of a currency conversion. A record attempt that hits this fails
/// entirely; nothing is persisted in the original currency.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("no conversion rate for currency: {0}")]
    UnknownCurrency(String),

    #[error("rate provider failure: {0}")]
    Provider(String),
}

/// Capability to convert an amount from a source currency into the base
/// currency. The live rate-provider client lives outside this crate; the
/// ledger only depends on this seam.
pub trait CurrencyConverter {
    fn convert(
        &self,
        amount: Cents,
        source_currency: &str,
    ) -> impl Future<Output = Result<Cents, ConversionError>> + Send;
}

/// Converter backed by a static table of rates (units of base currency per
/// unit of source currency), supplied through configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    pub fn with_rate(mut self, code: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(code.into().to_ascii_uppercase(), rate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl CurrencyConverter for RateTable {
    async fn convert(&self, amount: Cents, source_currency: &str) -> Result<Cents, ConversionError> {
        let rate = self
            .rates
            .get(source_currency)
            .copied()
            .ok_or_else(|| ConversionError::UnknownCurrency(source_currency.to_string()))?;
        Ok((amount as f64 * rate).round() as Cents)
    }
}
