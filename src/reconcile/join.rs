//! Left joins of aggregated counts onto reference attributes
//!
//! Counts are always left-joined: a key without a reference row is kept
//! until the last step, where it is removed and reported rather than
//! silently dropped.

use serde::Serialize;

/// Keys and records excluded because a join key had no reference row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinExclusions {
    /// Keys without a match, sorted
    pub unmatched_keys: Vec<String>,
    /// Records behind those keys
    pub excluded_records: usize,
}

impl JoinExclusions {
    /// Whether every key matched
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched_keys.is_empty()
    }
}

/// One left-joined row: the key, its count and the attribute if matched
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<V> {
    pub key: String,
    pub count: usize,
    pub attribute: Option<V>,
}

/// Left-join `(key, count)` pairs onto an attribute lookup
pub fn left_join<V>(
    counts: impl IntoIterator<Item = (String, usize)>,
    lookup: impl Fn(&str) -> Option<V>,
) -> Vec<Joined<V>> {
    counts
        .into_iter()
        .map(|(key, count)| {
            let attribute = lookup(&key);
            Joined {
                key,
                count,
                attribute,
            }
        })
        .collect()
}

/// Remove unmatched rows, returning the matched rows and what was removed
#[must_use]
pub fn split_unmatched<V>(joined: Vec<Joined<V>>) -> (Vec<(String, usize, V)>, JoinExclusions) {
    let mut matched = Vec::with_capacity(joined.len());
    let mut exclusions = JoinExclusions::default();
    for row in joined {
        match row.attribute {
            Some(attribute) => matched.push((row.key, row.count, attribute)),
            None => {
                exclusions.excluded_records += row.count;
                exclusions.unmatched_keys.push(row.key);
            }
        }
    }
    exclusions.unmatched_keys.sort();
    (matched, exclusions)
}
