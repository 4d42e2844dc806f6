use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The set of sender identifiers permitted to issue commands. Matching is
/// exact against the canonical form (e.g. E.164 phone numbers); no
/// wildcards, no partial matches. An empty list denies everyone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    senders: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(senders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            senders: senders.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the sender may issue commands. Deliberately a bool rather
    /// than an error: the caller must produce a distinct user-visible
    /// rejection, not an internal failure.
    pub fn authorize(&self, sender: &str) -> bool {
        self.senders.contains(sender)
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let list = AllowList::new(["+573001112233", "+14155550101"]);
        assert!(list.authorize("+573001112233"));
        assert!(list.authorize("+14155550101"));
    }

    #[test]
    fn test_no_partial_match() {
        let list = AllowList::new(["+573001112233"]);
        assert!(!list.authorize("+5730011122"));
        assert!(!list.authorize("573001112233"));
        assert!(!list.authorize("+573001112233 "));
    }

    #[test]
    fn test_empty_list_denies_everyone() {
        let list = AllowList::default();
        assert!(list.is_empty());
        assert!(!list.authorize("+573001112233"));
        assert!(!list.authorize(""));
    }
}
