use chrono::{DateTime, Datelike, Utc};
use tracing::{info, warn};

use crate::convert::{CurrencyConverter, RateTable};
use crate::domain::{
    Intent, RecordRequest, Report, Transaction, TransactionDraft, TransactionId, aggregate,
    parse_message,
};
use crate::storage::{Repository, TransactionStore};

use super::{AppError, LedgerConfig, ReportPeriod};

/// What a successfully handled message produced: the id of the recorded
/// transaction, or the requested report.
#[derive(Debug)]
pub enum Outcome {
    Recorded(TransactionId),
    Report(Report),
}

/// Orchestrates one command at a time: parse, authorize, then either
/// record (validate, convert, persist) or report (fetch, aggregate).
/// Stateless between requests; safe to share across concurrent invocations.
pub struct LedgerService<S, C> {
    store: S,
    converter: C,
    config: LedgerConfig,
}

impl LedgerService<Repository, RateTable> {
    /// Initialize a new database at the given path and build the
    /// production service on top of it.
    pub async fn init(database_path: &str, config: LedgerConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let rates = config.rates.clone();
        Ok(Self::new(repo, rates, config))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str, config: LedgerConfig) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        let rates = config.rates.clone();
        Ok(Self::new(repo, rates, config))
    }
}

impl<S: TransactionStore, C: CurrencyConverter> LedgerService<S, C> {
    pub fn new(store: S, converter: C, config: LedgerConfig) -> Self {
        Self {
            store,
            converter,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Handle one free-text command from a messaging surface.
    ///
    /// Parsing happens before authorization so the two failure modes stay
    /// distinct; an unauthorized sender never reaches the store either way.
    pub async fn handle_message(&self, sender: &str, body: &str) -> Result<Outcome, AppError> {
        let intent = parse_message(body, &self.config.classifications)?;
        self.ensure_authorized(sender)?;

        match intent {
            Intent::Record(draft) => Ok(Outcome::Recorded(self.record_draft(draft).await?)),
            Intent::Report => Ok(Outcome::Report(self.run_report().await?)),
        }
    }

    /// Record a transaction arriving as explicit fields.
    pub async fn record(
        &self,
        sender: &str,
        request: &RecordRequest,
    ) -> Result<TransactionId, AppError> {
        let draft = request.validate(&self.config.classifications)?;
        self.ensure_authorized(sender)?;
        self.record_draft(draft).await
    }

    /// Produce the monthly classification report for the configured
    /// default period.
    pub async fn report(&self, sender: &str) -> Result<Report, AppError> {
        self.ensure_authorized(sender)?;
        self.run_report().await
    }

    /// Every transaction in the store, oldest first. Used by the exporter.
    pub async fn list_all_transactions(&self, sender: &str) -> Result<Vec<Transaction>, AppError> {
        self.ensure_authorized(sender)?;
        Ok(self.store.list_between(None, None).await?)
    }

    fn ensure_authorized(&self, sender: &str) -> Result<(), AppError> {
        if self.config.allowed_senders.authorize(sender) {
            Ok(())
        } else {
            warn!(sender, "rejected command from unlisted sender");
            Err(AppError::Unauthorized(sender.to_string()))
        }
    }

    /// Convert if needed, then persist. Conversion failure aborts the whole
    /// record: either a fully converted transaction is stored, or nothing.
    async fn record_draft(&self, draft: TransactionDraft) -> Result<TransactionId, AppError> {
        let converted_value = match draft.currency.as_deref() {
            Some(code) if code != self.config.base_currency => {
                self.converter.convert(draft.value, code).await?
            }
            _ => draft.value,
        };

        let mut transaction = draft.into_transaction(converted_value, Utc::now());
        let id = self.store.save(&mut transaction).await?;
        info!(
            id,
            classification = %transaction.classification,
            converted = transaction.converted_value,
            "recorded transaction"
        );
        Ok(id)
    }

    async fn run_report(&self) -> Result<Report, AppError> {
        let (start, end) = self.report_range(Utc::now());
        let transactions = self.store.list_between(start, end).await?;
        info!(count = transactions.len(), "aggregating report");
        Ok(aggregate(&transactions, &self.config.classifications))
    }

    fn report_range(
        &self,
        now: DateTime<Utc>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self.config.default_report_period {
            ReportPeriod::AllTime => (None, None),
            ReportPeriod::CurrentMonth => {
                let start = now
                    .date_naive()
                    .with_day(1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc();
                (Some(start), None)
            }
        }
    }
}
