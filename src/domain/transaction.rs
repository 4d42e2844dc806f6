use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, Classification};

pub type TransactionId = i64;

/// Longest description the ledger stores. Matches the column width of the
/// persisted schema.
pub const MAX_DESCRIPTION_LEN: usize = 150;

/// A recorded financial event. Transactions are immutable once persisted;
/// there is no edit or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store on save; 0 until then.
    pub id: TransactionId,
    pub created_at: DateTime<Utc>,
    pub classification: Classification,
    /// Signed amount in the original currency.
    pub value: Cents,
    /// Original currency code; None when the amount was entered in the
    /// base currency.
    pub currency: Option<String>,
    /// Amount in the base currency. Equal to `value` when no conversion
    /// took place.
    pub converted_value: Cents,
    pub description: String,
}

/// A validated record request that has not been converted or persisted yet.
/// Produced by the command parser, consumed by the ledger service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub classification: Classification,
    pub value: Cents,
    pub description: String,
    pub currency: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    /// Finalize the draft into a transaction ready for persistence.
    pub fn into_transaction(self, converted_value: Cents, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: 0,
            created_at: self.created_at.unwrap_or(now),
            classification: self.classification,
            value: self.value,
            currency: self.currency,
            converted_value,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClassificationSet;

    #[test]
    fn test_draft_defaults_created_at_to_now() {
        let set = ClassificationSet::default();
        let draft = TransactionDraft {
            classification: set.normalize("ess").unwrap(),
            value: 350000,
            description: "tax invoice".to_string(),
            currency: None,
            created_at: None,
        };
        let now = Utc::now();
        let tx = draft.into_transaction(350000, now);

        assert_eq!(tx.id, 0);
        assert_eq!(tx.created_at, now);
        assert_eq!(tx.value, tx.converted_value);
    }

    #[test]
    fn test_draft_keeps_explicit_created_at() {
        let set = ClassificationSet::default();
        let when = "2024-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let draft = TransactionDraft {
            classification: set.normalize("non").unwrap(),
            value: 5000,
            description: "coffee".to_string(),
            currency: Some("USD".to_string()),
            created_at: Some(when),
        };
        let tx = draft.into_transaction(20000, Utc::now());

        assert_eq!(tx.created_at, when);
        assert_eq!(tx.value, 5000);
        assert_eq!(tx.converted_value, 20000);
        assert_eq!(tx.currency.as_deref(), Some("USD"));
    }
}
