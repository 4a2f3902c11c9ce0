use std::io::Read;
use std::path::Path;

use crate::config::WeoConfig;
use crate::data::filter::{rows_by_subject, unique_in_order, SubjectFilter};
use crate::data::loader;
use crate::data::model::{Country, RawTable, WeoRow};
use crate::data::series::{CrossSection, Series};
use crate::error::{Result, WeoError};

pub const GDP_CURRENT_PRICES: &str = "Gross domestic product, current prices";
pub const US_DOLLARS: &str = "U.S. dollars";
pub const LIBOR_6M: &str = "Six-month London interbank offered rate (LIBOR)";
pub const PERCENT: &str = "Percent";

/// Year used by [`Dataset::gdp_usd_default`].
pub const DEFAULT_GDP_YEAR: i32 = 2018;

/// A loaded World Economic Outlook country table and its query surface.
///
/// The table is read once at construction and never changes, so a `Dataset`
/// can be shared between threads for reading.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: RawTable,
    config: WeoConfig,
}

impl Dataset {
    /// Load `path` with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, WeoConfig::default())
    }

    pub fn open_with(path: impl AsRef<Path>, config: WeoConfig) -> Result<Self> {
        config.validate()?;
        let table = loader::load_file(path.as_ref(), &config)?;
        Ok(Self { table, config })
    }

    pub fn from_reader<R: Read>(reader: R, config: WeoConfig) -> Result<Self> {
        config.validate()?;
        let table = loader::load_reader(reader, &config)?;
        Ok(Self { table, config })
    }

    pub fn from_table(table: RawTable, config: WeoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn config(&self) -> &WeoConfig {
        &self.config
    }

    /// Every parsed row, including footer lines without a country.
    pub fn raw(&self) -> &RawTable {
        &self.table
    }

    // -- Inspection --

    /// Year column headers, in source order.
    pub fn years(&self) -> &[String] {
        &self.table.years
    }

    /// Rows that carry a country. Every other query starts from these.
    pub fn rows(&self) -> impl Iterator<Item = &WeoRow> {
        self.table.present_rows()
    }

    /// Distinct (WEO code, ISO, name) triples, in order of first appearance.
    pub fn countries(&self) -> Vec<Country> {
        unique_in_order(self.rows(), |r| {
            r.to_country()
                .map(|c| (c.weo_country_code, c.iso, c.name))
        })
        .into_iter()
        .map(|(weo_country_code, iso, name)| Country {
            weo_country_code,
            iso,
            name,
        })
        .collect()
    }

    /// Indicator names, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        unique_in_order(self.rows(), |r| Some(r.subject.clone()))
    }

    /// Rows whose indicator is selected by `subjects`.
    pub fn by_subject(&self, subjects: impl Into<SubjectFilter>) -> Vec<&WeoRow> {
        let filter = subjects.into();
        rows_by_subject(self.rows(), &filter).collect()
    }

    /// Units reported for `subjects`, or for the whole table when `None`.
    pub fn units(&self, subjects: Option<SubjectFilter>) -> Vec<String> {
        match subjects {
            Some(filter) => {
                unique_in_order(rows_by_subject(self.rows(), &filter), |r| {
                    Some(r.units.clone())
                })
            }
            None => unique_in_order(self.rows(), |r| Some(r.units.clone())),
        }
    }

    /// Units reported for a single indicator.
    pub fn units_of(&self, indicator: &str) -> Vec<String> {
        self.units(Some(SubjectFilter::from(indicator)))
    }

    // -- Extraction --

    /// One indicator in one unit as a date-indexed table with a column per
    /// ISO code. Unparseable cells become missing values.
    pub fn get(&self, indicator: &str, unit: &str) -> Result<Series> {
        let rows = self.by_subject(indicator);
        let valid = unique_in_order(rows.iter().copied(), |r| Some(r.units.clone()));
        if !valid.iter().any(|u| u == unit) {
            return Err(WeoError::InvalidUnit {
                indicator: indicator.to_string(),
                unit: unit.to_string(),
                valid,
            });
        }

        let series = Series::pivot(
            &self.table,
            rows.into_iter().filter(|r| r.units == unit),
            &self.config,
        );
        log::debug!(
            "Extracted '{indicator}' [{unit}]: {} years x {} countries",
            series.len(),
            series.width()
        );
        Ok(series)
    }

    // -- Country lookup --

    /// Countries whose name contains `name`, ignoring case.
    pub fn find_countries(&self, name: &str) -> Vec<Country> {
        let needle = name.to_lowercase();
        self.countries()
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// ISO code of the first country whose name contains `name`.
    pub fn iso_code(&self, name: &str) -> Result<String> {
        self.find_countries(name)
            .into_iter()
            .next()
            .map(|c| c.iso)
            .ok_or_else(|| WeoError::CountryNotFound {
                query: name.to_string(),
            })
    }

    // -- Subject codes --

    /// WEO subject codes (`NGDPD`, `LUR`, ...), in order of first appearance.
    pub fn subject_codes(&self) -> Vec<String> {
        unique_in_order(self.rows(), |r| r.subject_code.clone())
    }

    /// The (indicator, unit) pair behind a subject code.
    pub fn from_code(&self, code: &str) -> Result<(String, String)> {
        self.rows()
            .find(|r| r.subject_code.as_deref() == Some(code))
            .map(|r| (r.subject.clone(), r.units.clone()))
            .ok_or_else(|| WeoError::UnknownSubjectCode {
                code: code.to_string(),
            })
    }

    pub fn get_by_code(&self, code: &str) -> Result<Series> {
        let (indicator, unit) = self.from_code(code)?;
        self.get(&indicator, &unit)
    }

    // -- Presets --

    /// Nominal GDP in U.S. dollars for `year`, largest economy first.
    pub fn gdp_usd(&self, year: i32) -> Result<CrossSection> {
        let series = self.get(GDP_CURRENT_PRICES, US_DOLLARS)?;
        Ok(series.at_year(year)?.sorted_desc())
    }

    pub fn gdp_usd_default(&self) -> Result<CrossSection> {
        self.gdp_usd(DEFAULT_GDP_YEAR)
    }

    /// Six-month USD LIBOR. Only older WEO vintages carry this indicator.
    pub fn libor_usd(&self) -> Result<Series> {
        Ok(self.get(LIBOR_6M, PERCENT)?.select(&["USA"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn dataset_is_shareable() {
        assert_send_sync::<Dataset>();
    }
}
