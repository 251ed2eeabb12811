use crate::record::TaskRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub label: String,
    pub date: String,
}

/// Display projection for the calendar view. Always the full collection in
/// insertion order; the view engine's filter and sort never apply here.
pub fn project(records: &[TaskRecord]) -> Vec<CalendarEntry> {
    records
        .iter()
        .map(|record| CalendarEntry {
            label: format!("{} ({}/{})", record.title, record.client, record.owner),
            date: record.date.clone(),
        })
        .collect()
}
