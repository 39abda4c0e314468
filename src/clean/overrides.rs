//! Fixed corrections for known defects in the upstream data.
//!
//! Corrections are keyed by the row's title as it appears upstream plus its
//! 1-based occurrence among rows sharing that title, in file order. This
//! survives reordering of unrelated rows, unlike a row index.

use chrono::NaiveDate;
use std::collections::HashMap;

/// Release date used for every "Aladdin" row in both dated tables.
pub const ALADDIN_TITLE: &str = "Aladdin";
pub const ALADDIN_RELEASE: (i32, u32, u32) = (1992, 11, 1);

/// Director rows whose attribution is too vague to keep.
pub const AMBIGUOUS_DIRECTOR_TITLES: &[&str] = &["Fantasia", "Fantasia 2000"];

/// Identifies one upstream row by title and occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey<'a> {
    pub title: &'a str,
    pub occurrence: usize,
}

const fn first(title: &'static str) -> RowKey<'static> {
    RowKey { title, occurrence: 1 }
}

const fn nth(title: &'static str, occurrence: usize) -> RowKey<'static> {
    RowKey { title, occurrence }
}

/// Release dates in the gross table that disagree with the theatrical release.
pub const RELEASE_DATE_OVERRIDES: &[(RowKey<'static>, (i32, u32, u32))] = &[
    (first("The Aristocats"), (1970, 12, 24)),
    (first("Brother Bear"), (2003, 11, 1)),
    (first("The Princess and the Frog"), (2009, 12, 11)),
];

/// Re-releases and remakes that share a title with an earlier row.
pub const TITLE_OVERRIDES: &[(RowKey<'static>, &str)] = &[
    (nth("The Jungle Book", 2), "The Jungle Book (b)"),
    (nth("Alice in Wonderland", 2), "Alice in Wonderland (b)"),
    (nth("The Jungle Book", 3), "The Jungle Book (c)"),
    (nth("Cinderella", 2), "Cinderella (b)"),
    (nth("101 Dalmatians", 2), "101 Dalmatians (b)"),
    (nth("Freaky Friday", 2), "Freaky Friday (b)"),
    (nth("Bad Company", 2), "Bad Company (b)"),
];

pub fn date(ymd: (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
}

/// Assigns each title its running occurrence count, in input order.
pub fn occurrences<'a>(titles: impl Iterator<Item = &'a str>) -> Vec<RowKey<'a>> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    titles
        .map(|title| {
            let count = seen.entry(title).or_default();
            *count += 1;
            RowKey {
                title,
                occurrence: *count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_count_per_title() {
        let titles = ["Cinderella", "Bambi", "Cinderella", "Cinderella"];
        let keys = occurrences(titles.iter().copied());
        let ordinals: Vec<usize> = keys.iter().map(|k| k.occurrence).collect();
        assert_eq!(ordinals, vec![1, 1, 2, 3]);
        assert_eq!(keys[2], nth("Cinderella", 2));
    }

    #[test]
    fn test_title_overrides_are_unique() {
        for (i, (key, _)) in TITLE_OVERRIDES.iter().enumerate() {
            assert!(!TITLE_OVERRIDES[i + 1..].iter().any(|(other, _)| other == key));
        }
    }

    #[test]
    fn test_override_dates_are_valid() {
        assert!(date(ALADDIN_RELEASE).is_some());
        for (_, ymd) in RELEASE_DATE_OVERRIDES {
            assert!(date(*ymd).is_some());
        }
    }
}
