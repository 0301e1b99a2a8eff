use crate::activity::ActivityTotals;
use crate::pipeline::parser::ActivityRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Group normalized records into one aggregate per distinct calendar date.
/// Sums and counts are commutative, so input order never changes the result.
pub fn aggregate_daily(records: &[ActivityRecord]) -> BTreeMap<NaiveDate, ActivityTotals> {
    records.iter().fold(BTreeMap::new(), |mut days, record| {
        days.entry(record.date)
            .or_default()
            .record(record.kind, record.duration_minutes);
        days
    })
}
