use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{LedgerConfig, LedgerService, Outcome};
use crate::domain::{RecordRequest, Report, format_cents};
use crate::io::{export_report_csv, export_transactions_csv};

/// Centimo - chat-command expense ledger
#[derive(Parser)]
#[command(name = "centimo")]
#[command(about = "Record classified expenses and get monthly reports, chat-command style")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "centimo.db")]
    pub database: String,

    /// Configuration file (JSON). Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Handle a raw chat message as the inbound surface would deliver it
    Send {
        /// Sender identifier (e.g. E.164 phone number)
        #[arg(long)]
        from: String,

        /// Message body, e.g. "ess 3500 tax invoice" or "report"
        message: String,
    },

    /// Record a transaction from explicit fields
    Record {
        /// Sender identifier, checked against the allow-list
        #[arg(long)]
        from: String,

        /// Classification name or alias (e.g. "ess")
        #[arg(short = 'l', long)]
        classification: String,

        /// Amount (e.g. "3500" or "12.50"); sign is kept as entered
        #[arg(short, long)]
        value: String,

        /// Description (at most 150 characters)
        #[arg(short = 'm', long)]
        description: String,

        /// Original currency code when not the base currency (e.g. USD)
        #[arg(short = 'c', long)]
        currency: Option<String>,

        /// Transaction date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the monthly classification report
    Report {
        /// Sender identifier, checked against the allow-list
        #[arg(long)]
        from: String,
    },

    /// Export data to CSV
    Export {
        /// Sender identifier, checked against the allow-list
        #[arg(long)]
        from: String,

        /// What to export: transactions, report
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => LedgerConfig::from_file(path)?,
            None => LedgerConfig::default(),
        };

        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database, config).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Send { from, message } => {
                let service = LedgerService::connect(&self.database, config).await?;
                match service.handle_message(&from, &message).await? {
                    Outcome::Recorded(id) => println!("Recorded transaction #{}", id),
                    Outcome::Report(report) => print_report(&report),
                }
            }

            Commands::Record {
                from,
                classification,
                value,
                description,
                currency,
                date,
            } => {
                let service = LedgerService::connect(&self.database, config).await?;
                let created_at = date.as_deref().map(parse_date).transpose()?;
                let request = RecordRequest {
                    classification,
                    value,
                    description,
                    currency,
                    created_at,
                };
                let id = service.record(&from, &request).await?;
                println!("Recorded transaction #{}", id);
            }

            Commands::Report { from } => {
                let service = LedgerService::connect(&self.database, config).await?;
                let report = service.report(&from).await?;
                print_report(&report);
            }

            Commands::Export {
                from,
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database, config).await?;

                let mut writer: Box<dyn std::io::Write> = match &output {
                    Some(path) => Box::new(
                        std::fs::File::create(path)
                            .with_context(|| format!("Failed to create {}", path))?,
                    ),
                    None => Box::new(std::io::stdout()),
                };

                let count = match export_type.as_str() {
                    "transactions" => {
                        let transactions = service.list_all_transactions(&from).await?;
                        export_transactions_csv(&transactions, &mut writer)?
                    }
                    "report" => {
                        let report = service.report(&from).await?;
                        export_report_csv(&report, &mut writer)?
                    }
                    other => anyhow::bail!(
                        "Unknown export type '{}'. Use: transactions, report",
                        other
                    ),
                };

                if let Some(path) = output {
                    eprintln!("Exported {} row(s) to {}", count, path);
                }
            }
        }

        Ok(())
    }
}

/// Parse a YYYY-MM-DD date into a UTC midnight timestamp.
fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

fn print_report(report: &Report) {
    if report.is_empty() {
        println!("No transactions recorded.");
        return;
    }

    let mut current_month = None;
    for entry in &report.entries {
        let month = (entry.year, entry.month);
        if current_month != Some(month) {
            println!("{}-{:02}", entry.year, entry.month);
            current_month = Some(month);
        }
        println!(
            "  {:<20} {:>14}  ({})",
            entry.classification,
            format_cents(entry.total),
            entry.count
        );
    }

    println!("Totals");
    for total in &report.totals {
        println!(
            "  {:<20} {:>14}  ({})",
            total.classification,
            format_cents(total.total),
            total.count
        );
    }
    println!("  {:<20} {:>14}", "overall", format_cents(report.grand_total));
}
