use std::fmt;

use chrono::{DateTime, Utc};

use super::money::parse_cents;
use super::{ClassificationSet, InvalidClassification, TransactionDraft, MAX_DESCRIPTION_LEN};

/// The word that, alone, requests a report. Only the entire (trimmed)
/// message matching this token triggers a report; a transaction whose
/// description starts with "report" is never confused with one.
const REPORT_KEYWORD: &str = "report";

/// The parsed, typed result of interpreting one raw instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Record(TransactionDraft),
    Report,
}

/// Parse a free-text chat message into an intent.
///
/// Two grammars, dispatched by shape:
/// - `report` (case-insensitive, trimmed) requests a report;
/// - `<classification>[-ccy] <value> <description...>` records a
///   transaction, e.g. `ess 3500 tax invoice` or `non-usd 12.50 coffee`.
///
/// The grammar is positional and unquoted on purpose: it has to stay
/// typable from a phone keyboard.
pub fn parse_message(input: &str, set: &ClassificationSet) -> Result<Intent, CommandError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case(REPORT_KEYWORD) {
        return Ok(Intent::Report);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Err(CommandError::Empty);
    };

    // The leading token is a classification alias, optionally carrying a
    // `-xxx` currency suffix (`ess-usd`). Try the whole token first so
    // hyphenated canonical names keep working.
    let (classification, currency) = match set.normalize(head) {
        Ok(c) => (c, None),
        Err(_) => {
            let parsed = head.split_once('-').and_then(|(alias, suffix)| {
                let code = normalize_currency_code(suffix)?;
                let classification = set.normalize(alias).ok()?;
                Some((classification, code))
            });
            match parsed {
                Some((c, code)) => (c, Some(code)),
                None => return Err(CommandError::UnknownCommand(head.to_string())),
            }
        }
    };

    if tokens.len() < 3 {
        return Err(CommandError::TooFewTokens(tokens.len()));
    }

    let value = parse_cents(tokens[1])
        .map_err(|_| CommandError::InvalidValue(tokens[1].to_string()))?;

    // Rejoin the remainder with single spaces; internal runs of whitespace
    // collapse, which is what a chat client produces anyway.
    let description = tokens[2..].join(" ");
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CommandError::DescriptionTooLong(description.chars().count()));
    }

    Ok(Intent::Record(TransactionDraft {
        classification,
        value,
        description,
        currency,
        created_at: None,
    }))
}

/// A record request arriving as explicit fields rather than free text.
#[derive(Debug, Clone, Default)]
pub struct RecordRequest {
    pub classification: String,
    pub value: String,
    pub description: String,
    pub currency: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RecordRequest {
    /// Field-level validation into a draft. Fails on an unknown
    /// classification, a non-numeric value, an empty or over-long
    /// description, or a malformed currency code.
    pub fn validate(&self, set: &ClassificationSet) -> Result<TransactionDraft, ValidationError> {
        let classification = set
            .normalize(&self.classification)
            .map_err(ValidationError::Classification)?;

        let value = parse_cents(&self.value)
            .map_err(|_| ValidationError::Value(self.value.clone()))?;

        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong(
                description.chars().count(),
            ));
        }

        let currency = self
            .currency
            .as_deref()
            .map(|code| {
                normalize_currency_code(code)
                    .ok_or_else(|| ValidationError::Currency(code.to_string()))
            })
            .transpose()?;

        Ok(TransactionDraft {
            classification,
            value,
            description,
            currency,
            created_at: self.created_at,
        })
    }
}

/// Uppercase a 3-letter ISO-4217-style code; anything else is rejected.
fn normalize_currency_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Failure to match the free-text grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    UnknownCommand(String),
    TooFewTokens(usize),
    InvalidValue(String),
    DescriptionTooLong(usize),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty message"),
            CommandError::UnknownCommand(token) => {
                write!(f, "\"{}\" is not a supported command", token)
            }
            CommandError::TooFewTokens(got) => write!(
                f,
                "expected <classification> <value> <description>, got {} token(s)",
                got
            ),
            CommandError::InvalidValue(token) => {
                write!(f, "\"{}\" is not a number", token)
            }
            CommandError::DescriptionTooLong(len) => write!(
                f,
                "description is {} characters, maximum is {}",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for CommandError {}

/// Failure to validate a structured record request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Classification(InvalidClassification),
    Value(String),
    EmptyDescription,
    DescriptionTooLong(usize),
    Currency(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Classification(inner) => write!(f, "{}", inner),
            ValidationError::Value(raw) => write!(f, "\"{}\" is not a number", raw),
            ValidationError::EmptyDescription => write!(f, "description must not be empty"),
            ValidationError::DescriptionTooLong(len) => write!(
                f,
                "description is {} characters, maximum is {}",
                len, MAX_DESCRIPTION_LEN
            ),
            ValidationError::Currency(raw) => {
                write!(f, "\"{}\" is not a 3-letter currency code", raw)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ClassificationSet {
        ClassificationSet::default()
    }

    #[test]
    fn test_report_keyword_any_case_and_whitespace() {
        for input in ["report", "REPORT", "  Report  ", "\trePoRt\n"] {
            assert_eq!(parse_message(input, &set()), Ok(Intent::Report), "{input:?}");
        }
    }

    #[test]
    fn test_report_only_as_entire_message() {
        // "report" as a first description word must not trigger a report
        let intent = parse_message("ess 10 report for march", &set()).unwrap();
        match intent {
            Intent::Record(draft) => assert_eq!(draft.description, "report for march"),
            Intent::Report => panic!("misparsed as report request"),
        }
        // ...and "report something" is not a valid shorthand either
        assert!(matches!(
            parse_message("report something", &set()),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_shorthand_basic() {
        let intent = parse_message("ess 3500 tax invoice", &set()).unwrap();
        let Intent::Record(draft) = intent else {
            panic!("expected record intent");
        };
        assert_eq!(draft.classification.as_str(), "essential");
        assert_eq!(draft.value, 350000);
        assert_eq!(draft.description, "tax invoice");
        assert_eq!(draft.currency, None);
        assert_eq!(draft.created_at, None);
    }

    #[test]
    fn test_shorthand_collapses_internal_whitespace() {
        let Intent::Record(draft) =
            parse_message("non 12.50   espresso   double shot", &set()).unwrap()
        else {
            panic!("expected record intent");
        };
        assert_eq!(draft.description, "espresso double shot");
    }

    #[test]
    fn test_shorthand_with_currency_suffix() {
        let Intent::Record(draft) = parse_message("ess-usd 40 groceries", &set()).unwrap() else {
            panic!("expected record intent");
        };
        assert_eq!(draft.classification.as_str(), "essential");
        assert_eq!(draft.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_hyphenated_canonical_name_is_not_a_currency_suffix() {
        let Intent::Record(draft) = parse_message("non-essential 50 cinema", &set()).unwrap()
        else {
            panic!("expected record intent");
        };
        assert_eq!(draft.classification.as_str(), "non-essential");
        assert_eq!(draft.currency, None);
    }

    #[test]
    fn test_single_word_inputs_are_malformed() {
        assert!(matches!(
            parse_message("hello", &set()),
            Err(CommandError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_message("ess", &set()),
            Err(CommandError::TooFewTokens(1))
        ));
        assert_eq!(parse_message("   ", &set()), Err(CommandError::Empty));
    }

    #[test]
    fn test_too_few_tokens() {
        assert!(matches!(
            parse_message("ess 3500", &set()),
            Err(CommandError::TooFewTokens(2))
        ));
    }

    #[test]
    fn test_non_numeric_value() {
        assert!(matches!(
            parse_message("ess lots groceries", &set()),
            Err(CommandError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_oversized_value_is_rejected_not_wrapped() {
        assert!(matches!(
            parse_message("ess 99999999999999999 tax invoice", &set()),
            Err(CommandError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_value_with_embedded_sign_is_rejected() {
        assert!(matches!(
            parse_message("ess 1.-5 groceries", &set()),
            Err(CommandError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_bad_currency_suffix_is_unknown_command() {
        assert!(matches!(
            parse_message("ess-dollars 40 groceries", &set()),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_structured_validate_happy_path() {
        let request = RecordRequest {
            classification: "ESS".to_string(),
            value: "3500".to_string(),
            description: "tax invoice".to_string(),
            currency: Some("usd".to_string()),
            created_at: None,
        };
        let draft = request.validate(&set()).unwrap();
        assert_eq!(draft.classification.as_str(), "essential");
        assert_eq!(draft.value, 350000);
        assert_eq!(draft.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_structured_validate_failures() {
        let base = RecordRequest {
            classification: "ess".to_string(),
            value: "10".to_string(),
            description: "ok".to_string(),
            currency: None,
            created_at: None,
        };

        let bad_cls = RecordRequest {
            classification: "fun".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            bad_cls.validate(&set()),
            Err(ValidationError::Classification(_))
        ));

        let bad_value = RecordRequest {
            value: "ten".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            bad_value.validate(&set()),
            Err(ValidationError::Value(_))
        ));

        let empty_desc = RecordRequest {
            description: "   ".to_string(),
            ..base.clone()
        };
        assert_eq!(
            empty_desc.validate(&set()),
            Err(ValidationError::EmptyDescription)
        );

        let long_desc = RecordRequest {
            description: "x".repeat(MAX_DESCRIPTION_LEN + 1),
            ..base.clone()
        };
        assert!(matches!(
            long_desc.validate(&set()),
            Err(ValidationError::DescriptionTooLong(_))
        ));

        let bad_currency = RecordRequest {
            currency: Some("EURO".to_string()),
            ..base
        };
        assert!(matches!(
            bad_currency.validate(&set()),
            Err(ValidationError::Currency(_))
        ));
    }
}
