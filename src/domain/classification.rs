use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated classification label. Can only be obtained through
/// [`ClassificationSet::normalize`], so holding one proves membership in the
/// configured set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification(String);

impl Classification {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rebuild a classification from an already-persisted label.
    /// Only the storage layer should need this.
    pub(crate) fn from_stored(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One configured classification: a canonical name plus the shorthand
/// aliases accepted from chat input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ClassificationSpec {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// The configured set of classifications, in declared order. The order is
/// meaningful: reports emit classifications in this order, not
/// alphabetically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationSet {
    entries: Vec<ClassificationSpec>,
}

impl ClassificationSet {
    pub fn new(entries: Vec<ClassificationSpec>) -> Self {
        Self { entries }
    }

    /// Resolve a token (canonical name or alias, case-insensitive) to a
    /// classification.
    pub fn normalize(&self, token: &str) -> Result<Classification, InvalidClassification> {
        let wanted = token.trim();
        for entry in &self.entries {
            if entry.name.eq_ignore_ascii_case(wanted)
                || entry.aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted))
            {
                return Ok(Classification(entry.name.clone()));
            }
        }
        Err(InvalidClassification(wanted.to_string()))
    }

    /// Canonical names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl Default for ClassificationSet {
    /// The historical default deployment: essential and non-essential
    /// expenses, addressed by three-letter shorthands.
    fn default() -> Self {
        Self::new(vec![
            ClassificationSpec::new("essential", &["ess"]),
            ClassificationSpec::new("non-essential", &["non", "disc"]),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidClassification(pub String);

impl fmt::Display for InvalidClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown classification: {}", self.0)
    }
}

impl std::error::Error for InvalidClassification {}
