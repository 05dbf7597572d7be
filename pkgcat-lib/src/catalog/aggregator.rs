use super::PackageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of packages carrying a given category label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategorySummary {
    pub label: String,
    pub count: usize,
}

/// One summary per distinct category, ordered by label.
#[must_use]
pub fn summarize(records: &[PackageRecord]) -> Vec<CategorySummary> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(label, count)| CategorySummary {
            label: label.to_string(),
            count,
        })
        .collect()
}
