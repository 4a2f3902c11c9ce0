use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::config::WeoConfig;
use crate::error::{Result, WeoError};

use super::coerce::coerce_cell;
use super::model::{RawTable, WeoRow};

/// Days from 0001-01-01 to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// December 31st of `year`.
pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

// ---------------------------------------------------------------------------
// Series – one indicator+unit, date-indexed, one column per country
// ---------------------------------------------------------------------------

/// A numeric table indexed by year-end dates with one column per ISO code.
/// `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    /// Column-major: `values[column][row]`.
    values: Vec<Vec<Option<f64>>>,
}

impl Series {
    /// Pivot `rows` so ISO codes become columns and the configured year window
    /// becomes the row axis. A repeated ISO code keeps its first row.
    pub fn pivot<'a>(
        table: &RawTable,
        rows: impl IntoIterator<Item = &'a WeoRow>,
        config: &WeoConfig,
    ) -> Self {
        let (index, positions): (Vec<NaiveDate>, Vec<Option<usize>>) = config
            .window()
            .filter_map(|y| year_end(y).map(|date| (date, table.year_position(y))))
            .unzip();

        let mut columns = Vec::new();
        let mut values = Vec::new();
        let mut seen = BTreeSet::new();

        for row in rows {
            if !seen.insert(row.iso.clone()) {
                log::warn!(
                    "Duplicate ISO column '{}' for '{}' / '{}', keeping the first row",
                    row.iso,
                    row.subject,
                    row.units
                );
                continue;
            }
            let column: Vec<Option<f64>> = positions
                .iter()
                .map(|pos| {
                    pos.and_then(|p| row.values.get(p))
                        .and_then(|raw| coerce_cell(raw))
                })
                .collect();
            columns.push(row.iso.clone());
            values.push(column);
        }

        Series {
            index,
            columns,
            values,
        }
    }

    /// Year-end dates of the row axis.
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// ISO codes, in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows (years).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns (countries).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Values of one country, aligned with [`Series::index`].
    pub fn column(&self, iso: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .position(|c| c == iso)
            .map(|i| self.values[i].as_slice())
    }

    /// Row position of `year` on the date axis.
    pub fn row_of_year(&self, year: i32) -> Option<usize> {
        self.index.iter().position(|d| d.year() == year)
    }

    /// Single cell lookup.
    pub fn value(&self, iso: &str, year: i32) -> Option<f64> {
        let row = self.row_of_year(year)?;
        self.column(iso).and_then(|col| col[row])
    }

    /// Keep only `isos`, in the requested order. Codes absent from the
    /// series become all-missing columns.
    pub fn select<S: AsRef<str>>(&self, isos: &[S]) -> Series {
        let (columns, values) = isos
            .iter()
            .map(|iso| {
                let iso = iso.as_ref();
                let column = match self.column(iso) {
                    Some(col) => col.to_vec(),
                    None => vec![None; self.len()],
                };
                (iso.to_string(), column)
            })
            .unzip();

        Series {
            index: self.index.clone(),
            columns,
            values,
        }
    }

    /// All countries' values in `year`, in column order.
    pub fn at_year(&self, year: i32) -> Result<CrossSection> {
        let row = self.row_of_year(year).ok_or_else(|| WeoError::YearOutOfRange {
            year,
            first: self.index.first().map_or(year, |d| d.year()),
            last: self.index.last().map_or(year, |d| d.year()),
        })?;

        let entries = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(iso, col)| (iso.clone(), col[row]))
            .collect();

        Ok(CrossSection { year, entries })
    }

    /// Columnar copy: a `date` (Date32) column followed by one nullable
    /// Float64 column per ISO code.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let days: Vec<i32> = self
            .index
            .iter()
            .map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            .collect();

        let mut fields = vec![Field::new("date", DataType::Date32, false)];
        let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(days))];
        for (iso, col) in self.columns.iter().zip(&self.values) {
            fields.push(Field::new(iso.as_str(), DataType::Float64, true));
            arrays.push(Arc::new(Float64Array::from(col.clone())));
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let batch = self.to_record_batch().map_err(|_| fmt::Error)?;
        let table = pretty_format_batches(&[batch]).map_err(|_| fmt::Error)?;
        write!(f, "{table}")
    }
}

// ---------------------------------------------------------------------------
// CrossSection – one year of a series
// ---------------------------------------------------------------------------

/// ISO code → value for a single year, in a meaningful order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossSection {
    pub year: i32,
    entries: Vec<(String, Option<f64>)>,
}

impl CrossSection {
    /// Sort by value, largest first. Equal values keep their order; missing
    /// values go last.
    pub fn sorted_desc(mut self) -> Self {
        self.entries.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(a), Some(b)) => b.total_cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self
    }

    /// First `n` entries.
    pub fn top(&self, n: usize) -> CrossSection {
        CrossSection {
            year: self.year,
            entries: self.entries.iter().take(n).cloned().collect(),
        }
    }

    pub fn get(&self, iso: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(code, _)| code == iso)
            .and_then(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(iso, v)| (iso.as_str(), *v))
    }

    /// ISO codes in entry order.
    pub fn isos(&self) -> Vec<&str> {
        self.entries.iter().map(|(iso, _)| iso.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, Option<f64>)> {
        self.entries
    }
}
