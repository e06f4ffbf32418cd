use std::collections::HashMap;

use logtally_types::{AllowList, CodeStatistic, FieldRow};

/// Count rows per code and pair each allow-listed code with its first row.
///
/// Codes outside `allow` are dropped; allow-listed codes that never occur
/// produce no row. Output follows the order in which codes first appear.
pub fn compute_statistics(rows: &[FieldRow], allow: &AllowList) -> Vec<CodeStatistic> {
    // code -> index into `stats`
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<CodeStatistic> = Vec::new();

    for row in rows {
        if !allow.contains(&row.code) {
            continue;
        }
        match index.get(row.code.as_str()) {
            Some(&i) => stats[i].count += 1,
            None => {
                index.insert(row.code.as_str(), stats.len());
                stats.push(CodeStatistic {
                    first: row.clone(),
                    count: 1,
                });
            }
        }
    }

    stats
}

/// Number of rows whose code is allow-listed
pub fn allowed_row_count(rows: &[FieldRow], allow: &AllowList) -> usize {
    rows.iter().filter(|r| allow.contains(&r.code)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(date: &str, code: &str, message: &str) -> FieldRow {
        FieldRow::new(date, "user", "INFO", code, message)
    }

    #[test]
    fn test_counts_and_first_occurrence() {
        let rows = vec![
            row("d1", "20042", "first 20042"),
            row("d2", "2506", "first 2506"),
            row("d3", "20042", "second 20042"),
            row("d4", "20042", "third 20042"),
        ];
        let stats = compute_statistics(&rows, &AllowList::default());

        assert_eq!(
            stats,
            vec![
                CodeStatistic {
                    first: row("d1", "20042", "first 20042"),
                    count: 3,
                },
                CodeStatistic {
                    first: row("d2", "2506", "first 2506"),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_codes_outside_allow_list_dropped() {
        let rows: Vec<FieldRow> = (0..50).map(|i| row(&i.to_string(), "99999", "noise")).collect();
        let stats = compute_statistics(&rows, &AllowList::default());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_injected_allow_list() {
        let rows = vec![row("d1", "1", "a"), row("d2", "2", "b"), row("d3", "20042", "c")];
        let stats = compute_statistics(&rows, &AllowList::new(["2", "missing"]));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].code(), "2");
        assert_eq!(stats[0].first.message, "b");
    }

    #[test]
    fn test_count_conservation() {
        let codes = ["20042", "1", "2506", "20042", "9007", "x", "2506", "20042"];
        let rows: Vec<FieldRow> = codes
            .iter()
            .enumerate()
            .map(|(i, c)| row(&i.to_string(), c, "m"))
            .collect();
        let allow = AllowList::default();

        let stats = compute_statistics(&rows, &allow);
        let total: usize = stats.iter().map(|s| s.count).sum();
        assert_eq!(total, allowed_row_count(&rows, &allow));
        assert_eq!(total, 6);
    }

    #[test]
    fn test_deterministic_first_rows() {
        let rows = vec![row("a", "2002", "one"), row("b", "2002", "two"), row("c", "2006", "x")];
        let allow = AllowList::default();
        assert_eq!(compute_statistics(&rows, &allow), compute_statistics(&rows, &allow));
    }
}
