use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_COUNTRY: &str = "Country";
pub const COL_WEO_COUNTRY_CODE: &str = "WEO Country Code";
pub const COL_ISO: &str = "ISO";
pub const COL_SUBJECT: &str = "Subject Descriptor";
pub const COL_UNITS: &str = "Units";
pub const COL_SUBJECT_CODE: &str = "WEO Subject Code";

/// Columns every WEO country file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_COUNTRY,
    COL_WEO_COUNTRY_CODE,
    COL_ISO,
    COL_SUBJECT,
    COL_UNITS,
];

/// A header is a year column when it is made only of ASCII digits. Other
/// Unicode digits are not accepted.
pub fn is_year_token(header: &str) -> bool {
    !header.is_empty() && header.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// WeoRow – one line of the source table
// ---------------------------------------------------------------------------

/// One (country, indicator, unit) row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeoRow {
    /// Display name. `None` for footer and other malformed lines.
    pub country: Option<String>,
    pub weo_country_code: String,
    pub iso: String,
    /// Indicator name ("Subject Descriptor").
    pub subject: String,
    pub units: String,
    /// Short WEO code (e.g. `NGDPD`), when the file has the column.
    pub subject_code: Option<String>,
    /// Raw year cells, aligned with [`RawTable::years`].
    pub values: Vec<String>,
    /// Remaining non-year columns: column_name → raw text.
    pub metadata: BTreeMap<String, String>,
}

impl WeoRow {
    pub fn has_country(&self) -> bool {
        self.country.is_some()
    }

    /// The identifying triple of this row's country.
    pub fn to_country(&self) -> Option<Country> {
        self.country.as_ref().map(|name| Country {
            weo_country_code: self.weo_country_code.clone(),
            iso: self.iso.clone(),
            name: name.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Country {
    pub weo_country_code: String,
    /// ISO alpha-3 code, the column key of every series.
    pub iso: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// RawTable – the complete loaded source
// ---------------------------------------------------------------------------

/// The parsed source table. Built once by the loader, never mutated.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Header row, in source order.
    pub columns: Vec<String>,
    /// Year headers, in source order.
    pub years: Vec<String>,
    /// Every parsed row, including rows without a country.
    pub rows: Vec<WeoRow>,
    /// Numeric year → position in `years` / `WeoRow::values`.
    year_positions: BTreeMap<i32, usize>,
}

impl RawTable {
    /// Build the year index from the header and attach the rows.
    pub fn new(columns: Vec<String>, rows: Vec<WeoRow>) -> Self {
        let years: Vec<String> = columns
            .iter()
            .filter(|c| is_year_token(c))
            .cloned()
            .collect();

        let mut year_positions = BTreeMap::new();
        for (pos, token) in years.iter().enumerate() {
            if let Ok(year) = token.parse::<i32>() {
                year_positions.entry(year).or_insert(pos);
            }
        }

        RawTable {
            columns,
            years,
            rows,
            year_positions,
        }
    }

    /// Position of `year` among the year columns.
    pub fn year_position(&self, year: i32) -> Option<usize> {
        self.year_positions.get(&year).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Rows that carry a country name.
    pub fn present_rows(&self) -> impl Iterator<Item = &WeoRow> {
        self.rows.iter().filter(|r| r.has_country())
    }

    /// Number of rows, including rows without a country.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: Option<&str>) -> WeoRow {
        WeoRow {
            country: country.map(str::to_string),
            weo_country_code: "111".to_string(),
            iso: "USA".to_string(),
            subject: "Population".to_string(),
            units: "Persons".to_string(),
            subject_code: None,
            values: vec!["1".to_string(), "2".to_string()],
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn year_tokens_are_all_digits() {
        assert!(is_year_token("1980"));
        assert!(is_year_token("2024"));
        assert!(!is_year_token(""));
        assert!(!is_year_token("ISO"));
        assert!(!is_year_token("2024E"));
        assert!(!is_year_token(" 2024"));
        assert!(!is_year_token("٢٠٢٤"));
        assert!(!is_year_token("２０２４"));
    }

    #[test]
    fn years_keep_header_order() {
        let columns = ["ISO", "1981", "Units", "1980", "Estimates Start After"]
            .map(String::from)
            .to_vec();
        let table = RawTable::new(columns, vec![]);
        assert_eq!(table.years, vec!["1981", "1980"]);
        assert_eq!(table.year_position(1980), Some(1));
        assert_eq!(table.year_position(1979), None);
    }

    #[test]
    fn present_rows_skip_missing_country() {
        let table = RawTable::new(vec![], vec![row(Some("United States")), row(None)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.present_rows().count(), 1);
        assert_eq!(
            table.rows[0].to_country().map(|c| c.iso),
            Some("USA".to_string())
        );
        assert!(table.rows[1].to_country().is_none());
    }
}
