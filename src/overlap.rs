use crate::models::SnapshotOffer;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::io::{self, Write};

/// Closed validity window of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

/// Touching endpoints count as overlapping.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    !(a.end < b.start || a.start > b.end)
}

fn same_offer(left: &SnapshotOffer, right: &SnapshotOffer) -> bool {
    if !left.has_identity() || !right.has_identity() {
        return false;
    }
    if left.normalized_name != right.normalized_name {
        return false;
    }
    match (&left.interval, &right.interval) {
        (Some(a), Some(b)) => overlaps(a, b),
        _ => false,
    }
}

/// One flag per row of `left`: true when some row of `right` has the same
/// normalized name and an overlapping window.
pub fn flag_overlaps(left: &[SnapshotOffer], right: &[SnapshotOffer]) -> Vec<bool> {
    left.iter()
        .map(|offer| right.iter().any(|other| same_offer(offer, other)))
        .collect()
}

/// Original names of the flagged rows of `left`, without duplicates, in the
/// order they first appear.
pub fn overlapping_hotel_names(left: &[SnapshotOffer], right: &[SnapshotOffer]) -> Vec<String> {
    let flags = flag_overlaps(left, right);
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (offer, flagged) in left.iter().zip(flags) {
        if flagged && seen.insert(offer.hotel_name.as_str()) {
            names.push(offer.hotel_name.clone());
        }
    }

    names
}

/// Comparator output: a header line, then one hotel name per line.
pub fn write_overlap_report<W: Write>(mut out: W, names: &[String]) -> io::Result<()> {
    writeln!(out, "These hotels overlap:")?;
    for name in names {
        writeln!(out, "{}", name)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn window(start: u32, end: u32) -> Interval {
        Interval::new(jan(start), jan(end)).unwrap()
    }

    fn offer(name: &str, start: u32, end: u32) -> SnapshotOffer {
        SnapshotOffer::new(name, Some(jan(start)), Some(jan(end)))
    }

    #[test]
    fn touching_endpoints_overlap() {
        assert!(overlaps(&window(1, 5), &window(5, 10)));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!overlaps(&window(1, 2), &window(3, 4)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let windows = [window(1, 5), window(5, 10), window(3, 4), window(11, 12), window(2, 20)];
        for a in &windows {
            for b in &windows {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{:?} {:?}", a, b);
            }
        }
    }

    #[test]
    fn matching_names_with_overlapping_windows_are_reported() {
        let left = vec![offer("Hotel Royal", 1, 5)];
        let right = vec![offer("Hôtel Royal 3", 4, 10)];

        assert_eq!(flag_overlaps(&left, &right), vec![true]);
        assert_eq!(overlapping_hotel_names(&left, &right), vec!["Hotel Royal".to_string()]);
    }

    #[test]
    fn leading_article_is_part_of_the_key() {
        let left = vec![offer("Hotel Royal", 1, 5)];
        let right = vec![offer("Le Royal", 4, 10)];

        assert_eq!(flag_overlaps(&left, &right), vec![false]);
    }

    #[test]
    fn different_names_are_not_matched() {
        let left = vec![offer("Hotel Royal", 1, 5)];
        let right = vec![offer("Grand Palace", 4, 10)];

        assert_eq!(flag_overlaps(&left, &right), vec![false]);
        assert!(overlapping_hotel_names(&left, &right).is_empty());
    }

    #[test]
    fn same_name_outside_window_is_not_matched() {
        let left = vec![offer("Hotel Royal", 1, 2)];
        let right = vec![offer("Royal", 3, 10)];

        assert_eq!(flag_overlaps(&left, &right), vec![false]);
    }

    #[test]
    fn unresolvable_dates_never_match() {
        let left = vec![SnapshotOffer::new("Hotel Royal", None, Some(jan(5)))];
        let right = vec![offer("Royal", 1, 10)];

        assert_eq!(flag_overlaps(&left, &right), vec![false]);
    }

    #[test]
    fn sentinel_names_never_match() {
        let left = vec![offer("N/A", 1, 5)];
        let right = vec![offer("N/A", 1, 5)];

        assert_eq!(flag_overlaps(&left, &right), vec![false]);
    }

    #[test]
    fn names_are_reported_once_in_first_seen_order() {
        let left = vec![
            offer("Villa Marie", 1, 3),
            offer("Hotel Royal", 1, 5),
            offer("Villa Marie", 2, 4),
            offer("Grand Palace", 1, 5),
        ];
        let right = vec![offer("VILLA MARIE", 3, 3), offer("Royal", 5, 6)];

        assert_eq!(flag_overlaps(&left, &right), vec![true, true, true, false]);
        assert_eq!(
            overlapping_hotel_names(&left, &right),
            vec!["Villa Marie".to_string(), "Hotel Royal".to_string()]
        );
    }

    #[test]
    fn report_lists_one_name_per_line_after_the_header() {
        let mut out = Vec::new();
        let names = vec!["Villa Marie".to_string(), "Hôtel Le Royal 2".to_string()];

        write_overlap_report(&mut out, &names).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "These hotels overlap:\nVilla Marie\nHôtel Le Royal 2\n"
        );
    }

    #[test]
    fn report_without_overlaps_is_only_the_header() {
        let mut out = Vec::new();
        write_overlap_report(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "These hotels overlap:\n");
    }
}
