//! Search Operations
//!
//! Case-insensitive substring filtering of records.

use crate::db::Record;

/// Keep the records whose app name or user name contains `filter`,
/// ignoring case. An empty filter keeps everything.
pub fn filter_records(records: &mut Vec<Record>, filter: &str) {
    let filter_lower = filter.to_lowercase();
    records.retain(|r| record_matches(r, &filter_lower));
}

fn record_matches(record: &Record, filter_lower: &str) -> bool {
    record.app_name.to_lowercase().contains(filter_lower)
        || record.user_name.to_lowercase().contains(filter_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_data() -> Vec<Record> {
        [
            ("GitHub", "alice"),
            ("Mail", "bob"),
            ("Bank", "Alicia"),
            ("Ärztekammer", "Øyvind"),
        ]
        .into_iter()
        .map(|(app, user)| Record::new(app.to_string(), user.to_string(), "pw".to_string()))
        .collect()
    }

    fn apps(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.app_name.as_str()).collect()
    }

    #[test]
    fn test_filter_by_app_name() {
        let mut records = setup_test_data();
        filter_records(&mut records, "git");
        assert_eq!(apps(&records), ["GitHub"]);
    }

    #[test]
    fn test_filter_by_user_name_ignores_case() {
        let mut records = setup_test_data();
        filter_records(&mut records, "ALI");
        assert_eq!(apps(&records), ["GitHub", "Bank"]);
    }

    #[test]
    fn test_filter_non_ascii() {
        let mut records = setup_test_data();
        filter_records(&mut records, "ärzte");
        assert_eq!(apps(&records), ["Ärztekammer"]);

        let mut records = setup_test_data();
        filter_records(&mut records, "øYV");
        assert_eq!(apps(&records), ["Ärztekammer"]);
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let mut records = setup_test_data();
        filter_records(&mut records, "");
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_no_match() {
        let mut records = setup_test_data();
        filter_records(&mut records, "zzz");
        assert!(records.is_empty());
    }
}
