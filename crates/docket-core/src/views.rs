use chrono::NaiveDate;
use tracing::trace;

use crate::datetime::days_until;
use crate::record::TaskRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl std::str::FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "incomplete" => Ok(Self::Incomplete),
            other => Err(anyhow::anyhow!("unknown status filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Client,
    Status,
    /// Insertion order, i.e. no reordering.
    Entry,
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "client" => Ok(Self::Client),
            "status" => Ok(Self::Status),
            "entry" | "none" => Ok(Self::Entry),
            other => Err(anyhow::anyhow!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewParams {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
}

/// A record admitted by the current view, still carrying its position in
/// the store so mutations target the right element after filter and sort.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRecord<'a> {
    pub position: usize,
    pub record: &'a TaskRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: usize,
}

pub fn visible_records<'a>(records: &'a [TaskRecord], params: &ViewParams) -> Vec<VisibleRecord<'a>> {
    let needle = params.search.to_lowercase();

    let mut rows: Vec<VisibleRecord<'a>> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            let match_search =
                needle.is_empty() || record.search_haystack().to_lowercase().contains(&needle);

            let match_status = match params.status {
                StatusFilter::All => true,
                StatusFilter::Completed => record.completed,
                StatusFilter::Incomplete => !record.completed,
            };

            trace!(uuid = %record.uuid, match_search, match_status, "view admission");
            match_search && match_status
        })
        .map(|(position, record)| VisibleRecord { position, record })
        .collect();

    // sort_by is stable, so equal keys keep their filtered order. A date
    // that fails to parse can only come from a hand-edited blob; None sorts
    // ahead of everything rather than poisoning the comparison.
    match params.sort {
        SortKey::Date => rows.sort_by_key(|row| row.record.due_date()),
        SortKey::Client => rows.sort_by(|a, b| a.record.client.cmp(&b.record.client)),
        SortKey::Status => {
            rows.sort_by(|a, b| a.record.status.wire_name().cmp(b.record.status.wire_name()));
        }
        SortKey::Entry => {}
    }

    rows
}

pub fn stats(visible: &[VisibleRecord<'_>]) -> ViewStats {
    let total = visible.len();
    let completed = visible.iter().filter(|row| row.record.completed).count();
    // Integer round-half-up, same result as round(c / t * 100).
    let completion_rate = if total == 0 {
        0
    } else {
        (completed * 100 + total / 2) / total
    };

    ViewStats {
        total,
        completed,
        completion_rate,
    }
}

/// Live property, recomputed against the injected `today` on every call:
/// due today or tomorrow and not yet completed.
pub fn is_due_soon(record: &TaskRecord, today: NaiveDate) -> bool {
    if record.completed {
        return false;
    }
    match record.due_date() {
        Some(date) => (0..=1).contains(&days_until(date, today)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{SortKey, StatusFilter, ViewParams, is_due_soon, stats, visible_records};
    use crate::record::{Status, TaskRecord};

    fn record(title: &str, date: &str, client: &str, owner: &str) -> TaskRecord {
        TaskRecord {
            uuid: Uuid::new_v4(),
            title: title.to_string(),
            date: date.to_string(),
            client: client.to_string(),
            owner: owner.to_string(),
            status: Status::InProgress,
            completed: false,
        }
    }

    fn titles<'a>(rows: &[super::VisibleRecord<'a>]) -> Vec<&'a str> {
        rows.iter().map(|row| row.record.title.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_across_title_client_and_owner() {
        let records = vec![
            record("Quarterly Report", "2025-01-10", "Acme", "Kim"),
            record("Invoice", "2025-01-11", "Globex", "Lee"),
            record("Renewal", "2025-01-12", "Initech", "ACME-adjacent"),
        ];

        let params = ViewParams {
            search: "acme".to_string(),
            status: StatusFilter::All,
            sort: SortKey::Entry,
        };
        let rows = visible_records(&records, &params);
        assert_eq!(titles(&rows), vec!["Quarterly Report", "Renewal"]);

        let params = ViewParams {
            search: "kim".to_string(),
            ..params
        };
        assert_eq!(titles(&visible_records(&records, &params)), vec!["Quarterly Report"]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let records = vec![record("a", "2025-01-10", "", "")];
        let rows = visible_records(&records, &ViewParams::default());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn status_filter_acts_on_the_completed_flag_only() {
        let mut records = vec![
            record("open", "2025-01-10", "", ""),
            record("closed", "2025-01-11", "", ""),
        ];
        records[1].completed = true;
        // A done status without the flag stays "incomplete".
        records[0].status = Status::Done;

        let completed = ViewParams {
            status: StatusFilter::Completed,
            sort: SortKey::Entry,
            ..ViewParams::default()
        };
        assert_eq!(titles(&visible_records(&records, &completed)), vec!["closed"]);

        let incomplete = ViewParams {
            status: StatusFilter::Incomplete,
            sort: SortKey::Entry,
            ..ViewParams::default()
        };
        assert_eq!(titles(&visible_records(&records, &incomplete)), vec!["open"]);
    }

    #[test]
    fn date_sort_is_ascending_chronological() {
        let records = vec![
            record("may", "2025-05-01", "", ""),
            record("jan", "2025-01-10", "", ""),
            record("mar", "2025-03-20", "", ""),
        ];

        let params = ViewParams {
            sort: SortKey::Date,
            ..ViewParams::default()
        };
        assert_eq!(titles(&visible_records(&records, &params)), vec!["jan", "mar", "may"]);
    }

    #[test]
    fn status_sort_orders_by_canonical_name() {
        let mut records = vec![
            record("p", "2025-01-10", "", ""),
            record("d", "2025-01-11", "", ""),
            record("h", "2025-01-12", "", ""),
            record("i", "2025-01-13", "", ""),
        ];
        records[0].status = Status::Pending;
        records[1].status = Status::Done;
        records[2].status = Status::OnHold;
        records[3].status = Status::InProgress;

        let params = ViewParams {
            sort: SortKey::Status,
            ..ViewParams::default()
        };
        // done < in_progress < on_hold < pending
        assert_eq!(titles(&visible_records(&records, &params)), vec!["d", "i", "h", "p"]);
    }

    #[test]
    fn equal_sort_keys_keep_filtered_order() {
        let records = vec![
            record("first", "2025-03-20", "same", ""),
            record("second", "2025-03-20", "same", ""),
            record("third", "2025-03-20", "same", ""),
        ];

        for sort in [SortKey::Date, SortKey::Client, SortKey::Status] {
            let params = ViewParams {
                sort,
                ..ViewParams::default()
            };
            assert_eq!(
                titles(&visible_records(&records, &params)),
                vec!["first", "second", "third"],
                "{sort:?} must be stable"
            );
        }
    }

    #[test]
    fn positions_point_back_into_the_store() {
        let mut records = vec![
            record("z", "2025-05-01", "", ""),
            record("a", "2025-01-10", "", ""),
        ];
        records[0].completed = true;

        let params = ViewParams {
            sort: SortKey::Date,
            ..ViewParams::default()
        };
        let rows = visible_records(&records, &params);
        assert_eq!(rows[0].record.title, "a");
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[1].position, 0);
    }

    #[test]
    fn pipeline_is_pure_and_idempotent() {
        let records = vec![
            record("b", "2025-05-01", "x", ""),
            record("a", "2025-01-10", "y", ""),
        ];
        let snapshot = records.clone();

        let params = ViewParams {
            search: "".to_string(),
            status: StatusFilter::All,
            sort: SortKey::Date,
        };
        let once = titles(&visible_records(&records, &params));
        let twice = titles(&visible_records(&records, &params));
        assert_eq!(once, twice);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn completion_rate_rounds_and_survives_an_empty_view() {
        let mut records = vec![
            record("a", "2025-01-10", "", ""),
            record("b", "2025-01-11", "", ""),
            record("c", "2025-01-12", "", ""),
            record("d", "2025-01-13", "", ""),
        ];
        for row in records.iter_mut().take(3) {
            row.completed = true;
        }

        let rows = visible_records(&records, &ViewParams::default());
        let s = stats(&rows);
        assert_eq!(s.total, 4);
        assert_eq!(s.completed, 3);
        assert_eq!(s.completion_rate, 75);

        let none = visible_records(&[], &ViewParams::default());
        assert_eq!(stats(&none).completion_rate, 0);
    }

    #[test]
    fn stats_cover_the_visible_set_not_the_store() {
        let mut records = vec![
            record("done", "2025-01-10", "", ""),
            record("open", "2025-01-11", "", ""),
        ];
        records[0].completed = true;

        let params = ViewParams {
            status: StatusFilter::Completed,
            ..ViewParams::default()
        };
        let rows = visible_records(&records, &params);
        let s = stats(&rows);
        assert_eq!(s.total, 1);
        assert_eq!(s.completion_rate, 100);
    }

    #[test]
    fn due_today_or_tomorrow_is_urgent_unless_completed() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 8).expect("date");

        let due_today = record("now", "2025-04-08", "", "");
        let due_tomorrow = record("soon", "2025-04-09", "", "");
        let due_later = record("later", "2025-04-10", "", "");
        let overdue = record("late", "2025-04-07", "", "");
        let mut done = record("done", "2025-04-08", "", "");
        done.completed = true;

        assert!(is_due_soon(&due_today, today));
        assert!(is_due_soon(&due_tomorrow, today));
        assert!(!is_due_soon(&due_later, today));
        assert!(!is_due_soon(&overdue, today));
        assert!(!is_due_soon(&done, today));
    }
}
