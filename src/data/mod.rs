//! Data layer: core types, loading, filtering and series extraction.
//!
//! Architecture:
//! ```text
//!  WEO .xls / .tsv (tab-separated, UTF-8 or Windows-1252)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  decode bytes → parse rows → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ RawTable  │  Vec<WeoRow>, year column index
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  drop rows without a country, select indicators
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  series   │  pivot + coerce → Series (year-end dates × ISO codes)
//!   └──────────┘
//! ```

pub mod coerce;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
