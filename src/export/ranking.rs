// ABOUTME: Stable descending ranking of records by a numeric field

use crate::models::TabularRecord;
use std::cmp::Ordering;

/// Records ordered by a numeric key, highest first. Borrowed view, the
/// source collection is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedExport<'a> {
    key: String,
    rows: Vec<&'a TabularRecord>,
}

impl<'a> RankedExport<'a> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rows(&self) -> &[&'a TabularRecord] {
        &self.rows
    }

    /// The `limit` highest-ranked rows, or all of them when `limit` is None
    pub fn top(&self, limit: Option<usize>) -> &[&'a TabularRecord] {
        match limit {
            Some(n) => &self.rows[..n.min(self.rows.len())],
            None => &self.rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TabularRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Clone the `limit` highest-ranked rows out of the view
    pub fn to_records(&self, limit: Option<usize>) -> Vec<TabularRecord> {
        self.top(limit).iter().map(|r| (*r).clone()).collect()
    }
}

/// Rank `records` by `key`, highest first.
///
/// Equal keys keep their input order. Records whose key is missing or not
/// numeric go last, also in input order.
pub fn rank<'a>(records: &'a [TabularRecord], key: &str) -> RankedExport<'a> {
    let mut keyed: Vec<(Option<f64>, &TabularRecord)> =
        records.iter().map(|r| (r.numeric(key), r)).collect();

    // sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    RankedExport {
        key: key.to_string(),
        rows: keyed.into_iter().map(|(_, r)| r).collect(),
    }
}
