use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{Cents, ClassificationSet, Transaction};

/// One `(month, classification)` bucket of a report. Derived on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub year: i32,
    pub month: u32,
    pub classification: String,
    pub total: Cents,
    pub count: i64,
}

/// Per-classification total across the whole reporting range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTotal {
    pub classification: String,
    pub total: Cents,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    pub totals: Vec<ClassificationTotal>,
    pub grand_total: Cents,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tally transactions by `(year, month)` and classification.
///
/// Months come out in chronological order; within a month, classifications
/// follow the configured declared order so the output is stable and
/// diffable. Buckets with no activity are omitted entirely. Labels that are
/// no longer part of the configured set (recorded under an older
/// configuration) are appended after the declared ones, lexically.
pub fn aggregate(transactions: &[Transaction], set: &ClassificationSet) -> Report {
    let mut buckets: BTreeMap<(i32, u32), HashMap<&str, (Cents, i64)>> = BTreeMap::new();
    for tx in transactions {
        let slot = buckets
            .entry((tx.created_at.year(), tx.created_at.month()))
            .or_default()
            .entry(tx.classification.as_str())
            .or_insert((0, 0));
        slot.0 += tx.converted_value;
        slot.1 += 1;
    }

    let mut entries = Vec::new();
    for (&(year, month), by_label) in &buckets {
        for label in ordered_labels(set, by_label) {
            let &(total, count) = &by_label[label];
            entries.push(ReportEntry {
                year,
                month,
                classification: label.to_string(),
                total,
                count,
            });
        }
    }

    let mut rollup: HashMap<&str, (Cents, i64)> = HashMap::new();
    for entry in &entries {
        let slot = rollup.entry(entry.classification.as_str()).or_insert((0, 0));
        slot.0 += entry.total;
        slot.1 += entry.count;
    }
    let totals = ordered_labels(set, &rollup)
        .into_iter()
        .map(|label| {
            let (total, count) = rollup[label];
            ClassificationTotal {
                classification: label.to_string(),
                total,
                count,
            }
        })
        .collect();

    let grand_total: Cents = transactions.iter().map(|tx| tx.converted_value).sum();

    Report {
        entries,
        totals,
        grand_total,
    }
}

/// Labels present in `seen`, declared-order first, then any leftovers in
/// lexical order.
fn ordered_labels<'a, V>(
    set: &'a ClassificationSet,
    seen: &HashMap<&'a str, V>,
) -> Vec<&'a str> {
    let mut labels: Vec<&str> = set.names().filter(|name| seen.contains_key(name)).collect();
    let mut leftovers: Vec<&str> = seen
        .keys()
        .copied()
        .filter(|label| !set.names().any(|name| name == *label))
        .collect();
    leftovers.sort_unstable();
    labels.extend(leftovers);
    labels
}
