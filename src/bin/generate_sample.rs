//! Writes `sample_weo.tsv`, a synthetic WEO country file in Windows-1252.
//!
//! The output has the same layout as the IMF download: tab-separated,
//! comma-grouped numbers, `n/a` cells before a country's series begins, and a
//! one-cell footer line without a country.

use std::fs;

use anyhow::{Context, Result, bail};
use encoding_rs::WINDOWS_1252;

use weo_reader::{Dataset, WeoConfig, FIRST_YEAR};

const LATEST_YEAR: i32 = 2024;
const ESTIMATES_START_AFTER: i32 = 2018;
const OUTPUT_PATH: &str = "sample_weo.tsv";

/// (WEO code, ISO, name, GDP in 1980 in USD billions, first reported year)
const COUNTRIES: [(&str, &str, &str, f64, i32); 8] = [
    ("111", "USA", "United States", 2_857.3, 1980),
    ("112", "GBR", "United Kingdom", 603.3, 1980),
    ("924", "CHN", "China", 303.0, 1980),
    ("134", "DEU", "Germany", 854.3, 1991),
    ("922", "RUS", "Russia", 517.0, 1992),
    ("223", "BRA", "Brazil", 235.0, 1980),
    ("662", "CIV", "Côte d'Ivoire", 10.2, 1980),
    ("716", "STP", "São Tomé and Príncipe", 0.05, 2001),
];

/// (subject code, descriptor, units, scale)
const SUBJECTS: [(&str, &str, &str, &str); 4] = [
    (
        "NGDPD",
        "Gross domestic product, current prices",
        "U.S. dollars",
        "Billions",
    ),
    (
        "NGDP_RPCH",
        "Gross domestic product, constant prices",
        "Percent change",
        "",
    ),
    (
        "GGXWDG_NGDP",
        "General government gross debt",
        "Percent of GDP",
        "",
    ),
    (
        "GGXCNL_NGDP",
        "General government net lending/borrowing",
        "Percent of GDP",
        "",
    ),
];

/// SplitMix64 stream. Same seed, same sample file.
struct SampleRng(u64);

impl SampleRng {
    fn seeded(seed: u64) -> Self {
        SampleRng(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

/// `1234567.891` → `"1,234,567.891"`.
fn group_thousands(value: f64) -> String {
    let text = format!("{:.3}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// One simulated path per subject, `n/a` before `start`.
fn simulate(
    subject: &str,
    base_gdp: f64,
    start: i32,
    rng: &mut SampleRng,
) -> Vec<String> {
    let mut gdp = base_gdp;
    let mut debt = rng.uniform(20.0, 60.0);

    (FIRST_YEAR..=LATEST_YEAR)
        .map(|year| {
            let growth = rng.uniform(-2.0, 8.0);
            gdp *= 1.0 + rng.uniform(0.0, 0.1);
            let balance = rng.uniform(-8.0, 2.0);
            debt = (debt - balance * 0.8).max(0.0);

            if year < start {
                return "n/a".to_string();
            }
            match subject {
                "NGDPD" => group_thousands(gdp),
                "NGDP_RPCH" => format!("{growth:.3}"),
                "GGXWDG_NGDP" => format!("{debt:.3}"),
                _ => format!("{balance:.3}"),
            }
        })
        .collect()
}

fn build_table(rng: &mut SampleRng) -> String {
    let mut header = vec![
        "WEO Country Code".to_string(),
        "ISO".to_string(),
        "WEO Subject Code".to_string(),
        "Country".to_string(),
        "Subject Descriptor".to_string(),
        "Subject Notes".to_string(),
        "Units".to_string(),
        "Scale".to_string(),
        "Country/Series-specific Notes".to_string(),
    ];
    header.extend((FIRST_YEAR..=LATEST_YEAR).map(|y| y.to_string()));
    header.push("Estimates Start After".to_string());

    let mut lines = vec![header.join("\t")];

    for &(weo_code, iso, name, base_gdp, start) in &COUNTRIES {
        for &(code, descriptor, units, scale) in &SUBJECTS {
            let mut cells = vec![
                weo_code.to_string(),
                iso.to_string(),
                code.to_string(),
                name.to_string(),
                descriptor.to_string(),
                String::new(),
                units.to_string(),
                scale.to_string(),
                "Source: Synthetic".to_string(),
            ];
            cells.extend(simulate(code, base_gdp, start, rng));
            cells.push(ESTIMATES_START_AFTER.to_string());
            lines.push(cells.join("\t"));
        }
    }

    lines.push(String::new());
    lines.push(
        "International Monetary Fund, World Economic Outlook Database, synthetic sample"
            .to_string(),
    );
    lines.join("\r\n")
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SampleRng::seeded(42);
    let text = build_table(&mut rng);

    let (bytes, _, unmappable) = WINDOWS_1252.encode(&text);
    if unmappable {
        bail!("sample text contains characters outside Windows-1252");
    }
    fs::write(OUTPUT_PATH, &bytes).with_context(|| format!("writing {OUTPUT_PATH}"))?;

    // Read it back through the library as a smoke check.
    let config = WeoConfig::default().with_latest_year(LATEST_YEAR);
    let weo = Dataset::open_with(OUTPUT_PATH, config).context("reloading sample")?;
    let ranking = weo.gdp_usd(ESTIMATES_START_AFTER).context("ranking GDP")?;
    log::info!(
        "Top economies in {}: {:?}",
        ranking.year,
        ranking.top(3).isos()
    );

    println!(
        "Wrote {} countries x {} indicators ({} bytes) to {OUTPUT_PATH}",
        weo.countries().len(),
        weo.variables().len(),
        bytes.len()
    );
    Ok(())
}
