//! Search filter.

use crate::model::Record;

/// Returns `true` if the record matches the search term.
///
/// Name, email and role match case-insensitively by substring. The id
/// matches when its decimal text contains the term, so "1" matches ids 1,
/// 10 through 19, 21 and so on. An empty term matches everything.
pub fn matches(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    record.name.to_lowercase().contains(&needle)
        || record.email.to_lowercase().contains(&needle)
        || record.role.to_lowercase().contains(&needle)
        || record.id_text().contains(term)
}

/// Returns the records matching `term`, in their original order.
pub fn filter<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| matches(r, term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Ann", "a@x.com", "admin"),
            Record::new(2, "Bob", "b@x.com", "member"),
            Record::new(10, "Carla", "carla@corp.io", "member"),
            Record::new(21, "Dmitri", "dm@x.com", "Owner"),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "")), vec![1, 2, 10, 21]);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "bob")), vec![2]);
        assert_eq!(ids(&filter(&records, "BOB")), vec![2]);
    }

    #[test]
    fn test_email_and_role_match() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "corp.io")), vec![10]);
        assert_eq!(ids(&filter(&records, "owner")), vec![21]);
        assert_eq!(ids(&filter(&records, "MEMBER")), vec![2, 10]);
    }

    #[test]
    fn test_id_is_plain_substring() {
        let records = sample();
        assert_eq!(ids(&filter(&records, "1")), vec![1, 10, 21]);
        assert_eq!(ids(&filter(&records, "21")), vec![21]);
    }

    #[test]
    fn test_no_match() {
        let records = sample();
        assert!(filter(&records, "zzz").is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let records = vec![
            Record::new(5, "Zed", "z@x.com", "member"),
            Record::new(3, "Amy", "amy@x.com", "member"),
        ];
        assert_eq!(ids(&filter(&records, "member")), vec![5, 3]);
    }
}
