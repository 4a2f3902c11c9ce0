//! Reader for the IMF World Economic Outlook (WEO) country dataset.
//!
//! The WEO "By Countries" download is a tab-separated table with one row per
//! country, indicator and unit, and one column per year. [`Dataset`] loads it
//! once and answers read-only queries: listings of indicators, units and
//! countries, and extraction of a single indicator+unit as a [`Series`]
//! indexed by year-end dates with one column per ISO code.
//!
//! # Example
//!
//! ```no_run
//! use weo_reader::{Dataset, WeoConfig};
//!
//! let weo = Dataset::open_with("WEOOct2019all.xls", WeoConfig::default().with_latest_year(2024))?;
//!
//! let debt = weo
//!     .get("General government gross debt", "Percent of GDP")?
//!     .select(&["FRA", "DEU", "ITA", "GBR", "USA"]);
//! println!("{debt}");
//!
//! for (iso, gdp) in weo.gdp_usd(2018)?.top(20).iter() {
//!     println!("{iso}: {gdp:?}");
//! }
//! # Ok::<(), weo_reader::WeoError>(())
//! ```

pub mod config;
pub mod data;
pub mod dataset;
pub mod error;

pub use config::{SourceEncoding, WeoConfig, DEFAULT_LATEST_YEAR, FIRST_YEAR, MAX_LATEST_YEAR};
pub use data::filter::SubjectFilter;
pub use data::model::{Country, RawTable, WeoRow};
pub use data::series::{CrossSection, Series};
pub use dataset::Dataset;
pub use error::{Result, WeoError};
