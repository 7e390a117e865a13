//! Labeled tables accepted by parallel transforms
//!
//! Two shapes are recognized: `Series` (1-D) and `DataFrame` (2-D, named
//! columns, row-major). Both keep one label per row and can be sliced by
//! contiguous row ranges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};

/// Row label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Str(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{}", i),
            Label::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

fn range_index(len: usize) -> Vec<Label> {
    (0..len as i64).map(Label::Int).collect()
}

mod private {
    pub trait Sealed {}
    impl<T> Sealed for super::Series<T> {}
    impl<T> Sealed for super::DataFrame<T> {}
}

/// A table that can be split into row chunks
///
/// Implemented only by `Series` and `DataFrame`.
pub trait Table: Clone + Send + private::Sealed {
    /// One row: a value for `Series`, a slice of column values for `DataFrame`
    type Row: ?Sized;

    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row labels
    fn index(&self) -> &[Label];

    /// Row at a position; panics when out of bounds
    fn row(&self, pos: usize) -> &Self::Row;

    /// Copy of the rows in `range` (positional, like `iloc`)
    fn slice(&self, range: Range<usize>) -> Self;

    /// Apply `f` to every row, keeping row labels
    fn apply<U, F>(&self, f: F) -> Series<U>
    where
        F: Fn(&Self::Row) -> U,
    {
        Series {
            name: None,
            index: self.index().to_vec(),
            values: (0..self.len()).map(|pos| f(self.row(pos))).collect(),
        }
    }
}

/// Labeled 1-D sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries<T>")]
pub struct Series<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    index: Vec<Label>,
    values: Vec<T>,
}

impl<T> Series<T> {
    /// Series labeled `0..len`
    pub fn new(values: Vec<T>) -> Self {
        Self {
            name: None,
            index: range_index(values.len()),
            values,
        }
    }

    pub fn with_index(index: Vec<Label>, values: Vec<T>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(Error::value_error(format!(
                "Length of index ({}) does not match length of values ({})",
                index.len(),
                values.len()
            )));
        }
        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn get(&self, label: &Label) -> Option<&T> {
        self.index
            .iter()
            .position(|l| l == label)
            .map(|pos| &self.values[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &T)> {
        self.index.iter().zip(self.values.iter())
    }

    /// Concatenate series in order, keeping their labels
    ///
    /// The name of the first part is kept.
    pub fn concat(parts: Vec<Series<T>>) -> Series<T> {
        let mut parts = parts.into_iter();
        let mut merged = match parts.next() {
            Some(first) => first,
            None => return Series::new(Vec::new()),
        };
        for part in parts {
            merged.index.extend(part.index);
            merged.values.extend(part.values);
        }
        merged
    }
}

impl<T: Clone + Send> Table for Series<T> {
    type Row = T;

    fn len(&self) -> usize {
        self.values.len()
    }

    fn index(&self) -> &[Label] {
        &self.index
    }

    fn row(&self, pos: usize) -> &T {
        &self.values[pos]
    }

    fn slice(&self, range: Range<usize>) -> Self {
        Self {
            name: self.name.clone(),
            index: self.index[range.clone()].to_vec(),
            values: self.values[range].to_vec(),
        }
    }

    fn apply<U, F>(&self, f: F) -> Series<U>
    where
        F: Fn(&Self::Row) -> U,
    {
        Series {
            name: self.name.clone(),
            index: self.index.clone(),
            values: self.values.iter().map(|value| f(value)).collect(),
        }
    }
}

/// Labeled 2-D table with named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataFrame<T>")]
pub struct DataFrame<T> {
    columns: Vec<String>,
    index: Vec<Label>,
    rows: Vec<Vec<T>>,
}

impl<T> DataFrame<T> {
    /// Frame labeled `0..len`; every row must have one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<T>>) -> Result<Self> {
        let index = range_index(rows.len());
        Self::with_index(columns, index, rows)
    }

    pub fn with_index(columns: Vec<String>, index: Vec<Label>, rows: Vec<Vec<T>>) -> Result<Self> {
        if index.len() != rows.len() {
            return Err(Error::value_error(format!(
                "Length of index ({}) does not match number of rows ({})",
                index.len(),
                rows.len()
            )));
        }
        if let Some(pos) = rows.iter().position(|row| row.len() != columns.len()) {
            return Err(Error::value_error(format!(
                "Row {} has {} values, expected {} columns",
                pos,
                rows[pos].len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    /// Position of a column, for row functions that receive plain slices
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn record(&self, pos: usize) -> Option<Record<'_, T>> {
        Some(Record {
            label: self.index.get(pos)?,
            columns: &self.columns,
            values: self.rows.get(pos)?,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_, T>> {
        self.index
            .iter()
            .zip(self.rows.iter())
            .map(|(label, values)| Record {
                label,
                columns: &self.columns,
                values,
            })
    }

    /// One column as a series, labeled like the rows
    pub fn column(&self, name: &str) -> Option<Series<T>>
    where
        T: Clone,
    {
        let pos = self.column_position(name)?;
        Some(Series {
            name: Some(name.to_string()),
            index: self.index.clone(),
            values: self.rows.iter().map(|row| row[pos].clone()).collect(),
        })
    }

    /// Concatenate frames row-wise; all parts must share the same columns
    pub fn concat(parts: Vec<DataFrame<T>>) -> Result<DataFrame<T>> {
        let mut parts = parts.into_iter();
        let mut merged = match parts.next() {
            Some(first) => first,
            None => {
                return Ok(DataFrame {
                    columns: Vec::new(),
                    index: Vec::new(),
                    rows: Vec::new(),
                })
            }
        };
        for part in parts {
            if part.columns != merged.columns {
                return Err(Error::value_error(
                    "Cannot concatenate frames with different columns",
                ));
            }
            merged.index.extend(part.index);
            merged.rows.extend(part.rows);
        }
        Ok(merged)
    }
}

impl<T: Clone + Send> Table for DataFrame<T> {
    type Row = [T];

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn index(&self) -> &[Label] {
        &self.index
    }

    fn row(&self, pos: usize) -> &[T] {
        &self.rows[pos]
    }

    fn slice(&self, range: Range<usize>) -> Self {
        Self {
            columns: self.columns.clone(),
            index: self.index[range.clone()].to_vec(),
            rows: self.rows[range].to_vec(),
        }
    }
}

// Deserialized forms, checked through `with_index` before use
#[derive(Deserialize)]
struct RawSeries<T> {
    #[serde(default)]
    name: Option<String>,
    index: Vec<Label>,
    values: Vec<T>,
}

impl<T> TryFrom<RawSeries<T>> for Series<T> {
    type Error = Error;

    fn try_from(raw: RawSeries<T>) -> Result<Self> {
        let mut series = Series::with_index(raw.index, raw.values)?;
        series.name = raw.name;
        Ok(series)
    }
}

#[derive(Deserialize)]
struct RawDataFrame<T> {
    columns: Vec<String>,
    index: Vec<Label>,
    rows: Vec<Vec<T>>,
}

impl<T> TryFrom<RawDataFrame<T>> for DataFrame<T> {
    type Error = Error;

    fn try_from(raw: RawDataFrame<T>) -> Result<Self> {
        DataFrame::with_index(raw.columns, raw.index, raw.rows)
    }
}

/// Borrowed row of a `DataFrame`
#[derive(Debug, Clone, Copy)]
pub struct Record<'a, T> {
    label: &'a Label,
    columns: &'a [String],
    values: &'a [T],
}

impl<'a, T> Record<'a, T> {
    pub fn label(&self) -> &'a Label {
        self.label
    }

    pub fn values(&self) -> &'a [T] {
        self.values
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&'a T> {
        let pos = self.columns.iter().position(|c| c == column)?;
        self.values.get(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame<f64> {
        DataFrame::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_series_default_index() {
        let series = Series::new(vec!["x", "y"]);
        assert_eq!(series.index(), &[Label::Int(0), Label::Int(1)]);
        assert_eq!(series.get(&Label::Int(1)), Some(&"y"));
    }

    #[test]
    fn test_series_index_length_mismatch() {
        let err = Series::with_index(vec![Label::from("a")], vec![1, 2]).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }

    #[test]
    fn test_series_slice_and_concat() {
        let series = Series::new(vec![10, 20, 30, 40, 50]).named("n");
        let head = series.slice(0..2);
        let tail = series.slice(2..5);
        assert_eq!(head.values(), &[10, 20]);
        assert_eq!(tail.index()[0], Label::Int(2));
        assert_eq!(Series::concat(vec![head, tail]), series);
    }

    #[test]
    fn test_series_apply_keeps_labels() {
        let series = Series::with_index(vec!["a".into(), "b".into()], vec![1, 2]).unwrap();
        let doubled = series.apply(|v| v * 2);
        assert_eq!(doubled.values(), &[2, 4]);
        assert_eq!(doubled.index(), series.index());
    }

    #[test]
    fn test_frame_rejects_ragged_rows() {
        let err = DataFrame::new(vec!["a".to_string()], vec![vec![1], vec![1, 2]]).unwrap_err();
        assert_eq!(err.to_string(), "Row 1 has 2 values, expected 1 columns");
    }

    #[test]
    fn test_frame_records_and_columns() {
        let frame = frame();
        let record = frame.record(1).unwrap();
        assert_eq!(record.get("b"), Some(&4.0));
        assert_eq!(record.get("c"), None);
        assert_eq!(record.label(), &Label::Int(1));

        let column = frame.column("a").unwrap();
        assert_eq!(column.values(), &[1.0, 3.0, 5.0]);
        assert_eq!(column.name(), Some("a"));
    }

    #[test]
    fn test_frame_apply_row_wise() {
        let frame = frame();
        let sums = frame.apply(|row| row.iter().sum::<f64>());
        assert_eq!(sums.values(), &[3.0, 7.0, 11.0]);

        let b = frame.column_position("b").unwrap();
        let halves = frame.apply(|row| row[b] / 2.0);
        assert_eq!(halves.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(halves.index(), frame.index());
    }

    #[test]
    fn test_frame_slice_and_concat() {
        let frame = frame();
        let parts = vec![frame.slice(0..1), frame.slice(1..3)];
        assert_eq!(DataFrame::concat(parts).unwrap(), frame);

        let other = DataFrame::new(vec!["z".to_string()], vec![vec![0.0]]).unwrap();
        assert!(DataFrame::concat(vec![frame, other]).is_err());
    }

    #[test]
    fn test_series_deserialization_checks_index() {
        let err = serde_json::from_str::<Series<i32>>(r#"{"index":[0],"values":[1,2,3,4]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Length of index (1) does not match length of values (4)"));

        let series: Series<i32> =
            serde_json::from_str(r#"{"name":"n","index":["a","b"],"values":[1,2]}"#).unwrap();
        assert_eq!(series.name(), Some("n"));
        assert_eq!(series.get(&Label::from("b")), Some(&2));
    }

    #[test]
    fn test_frame_deserialization_checks_shape() {
        let ragged = r#"{"columns":["a","b"],"index":[0,1],"rows":[[1,2],[3]]}"#;
        let err = serde_json::from_str::<DataFrame<i32>>(ragged).unwrap_err();
        assert!(err.to_string().contains("Row 1 has 1 values, expected 2 columns"));

        let short_index = r#"{"columns":["a"],"index":[0],"rows":[[1],[2]]}"#;
        assert!(serde_json::from_str::<DataFrame<i32>>(short_index).is_err());
    }

    #[test]
    fn test_serialized_frame_round_trips() {
        let frame = frame();
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(serde_json::from_str::<DataFrame<f64>>(&json).unwrap(), frame);
    }

    #[test]
    fn test_label_serialization_is_untagged() {
        let labels = vec![Label::Int(3), Label::from("row")];
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"[3,"row"]"#);
    }
}
