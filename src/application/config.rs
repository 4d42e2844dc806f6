use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::convert::RateTable;
use crate::domain::{AllowList, ClassificationSet};

/// Which time range a bare `report` command covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPeriod {
    /// Every transaction ever recorded.
    #[default]
    AllTime,
    /// From the first of the current month to now.
    CurrentMonth,
}

/// Deployment configuration, constructed explicitly and handed to the
/// service. Nothing is read from ambient process state per request, so
/// tests can run in parallel with distinct configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Classification set and aliases, in report order.
    pub classifications: ClassificationSet,
    /// Currency all converted values are expressed in.
    pub base_currency: String,
    /// Senders permitted to issue commands. Empty denies everyone.
    pub allowed_senders: AllowList,
    /// Range covered by a bare `report` command.
    pub default_report_period: ReportPeriod,
    /// Static conversion rates: base-currency units per source-currency unit.
    pub rates: RateTable,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            classifications: ClassificationSet::default(),
            base_currency: "COP".to_string(),
            allowed_senders: AllowList::default(),
            default_report_period: ReportPeriod::default(),
            rates: RateTable::default(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn with_senders<I, S>(mut self, senders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_senders = AllowList::new(senders);
        self
    }
}
