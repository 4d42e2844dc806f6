use std::io::Write;

use anyhow::Result;

use crate::domain::{Report, Transaction, format_cents};

/// Export transactions to CSV. Returns the number of rows written.
pub fn export_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "created_at",
        "classification",
        "value",
        "currency",
        "converted_value",
        "description",
    ])?;

    let mut count = 0;
    for tx in transactions {
        csv_writer.write_record([
            tx.id.to_string(),
            tx.created_at.to_rfc3339(),
            tx.classification.as_str().to_string(),
            format_cents(tx.value),
            tx.currency.clone().unwrap_or_default(),
            format_cents(tx.converted_value),
            tx.description.clone(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Export a monthly report to CSV, one row per `(month, classification)`
/// bucket. Returns the number of rows written.
pub fn export_report_csv<W: Write>(report: &Report, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["year", "month", "classification", "total", "count"])?;

    let mut count = 0;
    for entry in &report.entries {
        csv_writer.write_record([
            entry.year.to_string(),
            entry.month.to_string(),
            entry.classification.clone(),
            format_cents(entry.total),
            entry.count.to_string(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
