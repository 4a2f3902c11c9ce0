use serde::{Deserialize, Serialize};

use crate::error::{Result, WeoError};

/// First year of every extracted series. WEO country files start in 1980.
pub const FIRST_YEAR: i32 = 1980;

/// Default last year of the series window.
pub const DEFAULT_LATEST_YEAR: i32 = 2024;

/// Largest accepted `latest_year`. Keeps every year-end date four-digit.
pub const MAX_LATEST_YEAR: i32 = 9999;

/// How the raw bytes of the source file are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceEncoding {
    /// UTF-8 when the bytes are valid UTF-8, Windows-1252 otherwise.
    #[default]
    Auto,
    Utf8,
    /// Windows-1252, a superset of the printable ISO-8859-1 range.
    Windows1252,
}

/// Loader and query settings for a [`Dataset`](crate::Dataset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeoConfig {
    /// Last year (inclusive) of the date index produced by `get`.
    pub latest_year: i32,
    pub encoding: SourceEncoding,
    /// Field delimiter byte. WEO downloads are tab-separated.
    pub delimiter: u8,
}

impl Default for WeoConfig {
    fn default() -> Self {
        Self {
            latest_year: DEFAULT_LATEST_YEAR,
            encoding: SourceEncoding::Auto,
            delimiter: b'\t',
        }
    }
}

impl WeoConfig {
    pub fn with_latest_year(mut self, year: i32) -> Self {
        self.latest_year = year;
        self
    }

    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reject a horizon outside `FIRST_YEAR..=MAX_LATEST_YEAR`.
    pub fn validate(&self) -> Result<()> {
        if !(FIRST_YEAR..=MAX_LATEST_YEAR).contains(&self.latest_year) {
            return Err(WeoError::InvalidHorizon {
                year: self.latest_year,
                min: FIRST_YEAR,
                max: MAX_LATEST_YEAR,
            });
        }
        Ok(())
    }

    /// Years covered by the series window, ascending.
    pub fn window(&self) -> std::ops::RangeInclusive<i32> {
        FIRST_YEAR..=self.latest_year
    }

    /// Number of rows in every extracted series.
    pub fn window_len(&self) -> usize {
        self.latest_year
            .saturating_sub(FIRST_YEAR)
            .saturating_add(1)
            .max(0) as usize
    }
}
