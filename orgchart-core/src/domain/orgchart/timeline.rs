// orgchart-core/src/domain/orgchart/timeline.rs
//
// Sanity checks on a fetched history. The query assumes at most one row
// per (id_organograma, data_inicio); the database does not enforce it.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::model::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateStart {
    pub org_chart_id: i64,
    pub start_date: NaiveDate,
    pub count: usize,
}

/// Start dates shared by more than one row of the same org chart.
pub fn duplicate_start_dates(entries: &[HistoryEntry]) -> Vec<DuplicateStart> {
    let mut counts: BTreeMap<(i64, NaiveDate), usize> = BTreeMap::new();
    for e in entries {
        *counts
            .entry((e.history.org_chart_id, e.history.start_date))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((org_chart_id, start_date), count)| DuplicateStart {
            org_chart_id,
            start_date,
            count,
        })
        .collect()
}

/// Newest first; equal start dates are allowed next to each other.
pub fn is_newest_first(entries: &[HistoryEntry]) -> bool {
    entries
        .windows(2)
        .all(|w| w[0].history.start_date >= w[1].history.start_date)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::orgchart::model::OrgChartHistory;

    fn entry(id: i64, org: i64, date: (i32, u32, u32)) -> HistoryEntry {
        HistoryEntry {
            history: OrgChartHistory {
                id,
                org_chart_id: org,
                parent_id: None,
                name: format!("v{id}"),
                start_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            },
            active: true,
            parent_name: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_no_duplicates() {
        let entries = vec![entry(2, 5, (2021, 1, 1)), entry(1, 5, (2020, 1, 1))];
        assert!(duplicate_start_dates(&entries).is_empty());
        assert!(is_newest_first(&entries));
    }

    #[test]
    fn test_duplicate_start_date_detected() {
        let entries = vec![
            entry(3, 5, (2021, 1, 1)),
            entry(2, 5, (2021, 1, 1)),
            entry(1, 5, (2020, 1, 1)),
        ];
        let dups = duplicate_start_dates(&entries);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].count, 2);
        assert_eq!(dups[0].start_date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn test_out_of_order() {
        let entries = vec![entry(1, 5, (2020, 1, 1)), entry(2, 5, (2021, 1, 1))];
        assert!(!is_newest_first(&entries));
        assert!(is_newest_first(&[]));
    }
}
