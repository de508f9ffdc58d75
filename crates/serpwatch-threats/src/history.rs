//! Grouping of raw history rows into per-keyword series.

use std::collections::BTreeMap;

use serpwatch_db::PositionHistoryRow;

/// Groups history rows by keyword, each series sorted oldest first.
///
/// The history query returns newest first across all keywords; every
/// detection phase wants one chronological series per keyword instead.
#[must_use]
pub fn group_by_keyword(rows: &[PositionHistoryRow]) -> BTreeMap<String, Vec<PositionHistoryRow>> {
    let mut grouped: BTreeMap<String, Vec<PositionHistoryRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.keyword.clone()).or_default().push(row.clone());
    }
    for series in grouped.values_mut() {
        series.sort_by_key(|row| (row.check_date, row.check_time));
    }
    grouped
}
