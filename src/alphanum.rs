//! Natural ("alphanum") string ordering
//!
//! Strings are split into alternating text and digit runs. Digit runs
//! compare by numeric value, text runs compare as plain strings, so that
//! `img2` sorts before `img10`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::validity::{check_type_validity, Kind};

static DIGIT_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("failed to compile digit run regex"));

/// One segment of a natural sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Digit run with leading zeros stripped (`"0"` becomes `""`)
    Number(&'a str),
    Text(&'a str),
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Significant digits only, so length decides first; no overflow on long runs.
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Natural sort key of a string
///
/// Keys compare segment by segment; a key that is a strict prefix of
/// another sorts first. The empty string yields an empty key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AlphanumKey<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> AlphanumKey<'a> {
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parse a string into its text and integer components
pub fn alphanum_key(string: &str) -> AlphanumKey<'_> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for run in DIGIT_RUN_REGEX.find_iter(string) {
        if run.start() > last_end {
            segments.push(Segment::Text(&string[last_end..run.start()]));
        }
        segments.push(Segment::Number(run.as_str().trim_start_matches('0')));
        last_end = run.end();
    }
    if last_end < string.len() {
        segments.push(Segment::Text(&string[last_end..]));
    }

    AlphanumKey { segments }
}

/// Compare two strings in natural order
pub fn alphanum_cmp(a: &str, b: &str) -> Ordering {
    alphanum_key(a).cmp(&alphanum_key(b))
}

/// Return a naturally sorted copy of `strings`
///
/// E.g. sorting `["2", "1", "10"]` gives `["1", "2", "10"]`, where a plain
/// sort would give `["1", "10", "2"]`. The sort is stable.
pub fn alphanum_sort<S: AsRef<str> + Clone>(strings: &[S]) -> Vec<S> {
    let mut sorted = strings.to_vec();
    alphanum_sort_in_place(&mut sorted);
    sorted
}

pub fn alphanum_sort_in_place<S: AsRef<str>>(strings: &mut [S]) {
    strings.sort_by(|a, b| alphanum_cmp(a.as_ref(), b.as_ref()));
}

/// Naturally sort a dynamic value that must be a list of strings
pub fn alphanum_sort_values(value: &Value) -> Result<Vec<String>> {
    check_type_validity(value, &[Kind::List], "string_list")?;

    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let strings = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| Error::type_error("The provided list contains non-string elements."))?;

    Ok(alphanum_sort(&strings))
}
