// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use centimo::Repository;
use centimo::application::{LedgerConfig, LedgerService};
use centimo::convert::RateTable;
use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;

/// Sender present in every test allow-list
pub const ALLOWED: &str = "+573001112233";

/// Sender never present in any allow-list
pub const STRANGER: &str = "+19998887766";

/// Helper to create a test service with a temporary database and a default
/// configuration that allows [`ALLOWED`]
pub async fn test_service() -> Result<(LedgerService<Repository, RateTable>, TempDir)> {
    test_service_with(LedgerConfig::default().with_senders([ALLOWED])).await
}

/// Helper to create a test service with a custom configuration
pub async fn test_service_with(
    config: LedgerConfig,
) -> Result<(LedgerService<Repository, RateTable>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), config).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}
