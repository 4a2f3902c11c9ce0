use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::config::{SourceEncoding, WeoConfig};
use crate::error::{Result, WeoError};

use super::model::{
    is_year_token, RawTable, WeoRow, COL_COUNTRY, COL_ISO, COL_SUBJECT, COL_SUBJECT_CODE,
    COL_UNITS, COL_WEO_COUNTRY_CODE, REQUIRED_COLUMNS,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a WEO country file from disk.
pub fn load_file(path: &Path, config: &WeoConfig) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WeoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WeoError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    parse_bytes(&bytes, config)
}

/// Load a WEO table from any byte source.
pub fn load_reader<R: Read>(mut reader: R, config: &WeoConfig) -> Result<RawTable> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_bytes(&bytes, config)
}

/// Decode and parse an in-memory WEO table.
pub fn parse_bytes(bytes: &[u8], config: &WeoConfig) -> Result<RawTable> {
    let text = decode(bytes, config.encoding);
    parse_text(&text, config.delimiter)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Turn raw bytes into text. Never fails: undecodable bytes only exist for
/// `Utf8`, where they are replaced with U+FFFD.
pub fn decode(bytes: &[u8], encoding: SourceEncoding) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match encoding {
        SourceEncoding::Utf8 => UTF_8.decode_without_bom_handling(bytes).0,
        SourceEncoding::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        SourceEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(e) => {
                log::warn!(
                    "Source is not UTF-8 (invalid byte at offset {}), decoding as Windows-1252",
                    e.valid_up_to()
                );
                WINDOWS_1252.decode_without_bom_handling(bytes).0
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Delimited-text parsing
// ---------------------------------------------------------------------------

/// Column positions resolved from the header row.
struct Layout {
    country: usize,
    weo_country_code: usize,
    iso: usize,
    subject: usize,
    units: usize,
    subject_code: Option<usize>,
    years: Vec<usize>,
    /// Everything else: (position, column name).
    metadata: Vec<(usize, String)>,
}

impl Layout {
    fn resolve(headers: &[String]) -> Result<Self> {
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(WeoError::MissingColumn {
                    column: required.to_string(),
                });
            }
        }
        // Checked above.
        let pos = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();

        let country = pos(COL_COUNTRY);
        let weo_country_code = pos(COL_WEO_COUNTRY_CODE);
        let iso = pos(COL_ISO);
        let subject = pos(COL_SUBJECT);
        let units = pos(COL_UNITS);
        let subject_code = headers.iter().position(|h| h == COL_SUBJECT_CODE);

        let known = [country, weo_country_code, iso, subject, units];
        let mut years = Vec::new();
        let mut metadata = Vec::new();
        for (i, h) in headers.iter().enumerate() {
            if is_year_token(h) {
                years.push(i);
            } else if !known.contains(&i) && Some(i) != subject_code {
                metadata.push((i, h.clone()));
            }
        }

        Ok(Layout {
            country,
            weo_country_code,
            iso,
            subject,
            units,
            subject_code,
            years,
            metadata,
        })
    }
}

/// Parse decoded text into a [`RawTable`].
///
/// Records may be shorter than the header (WEO files end with a one-cell
/// footer line); absent cells read as blank.
pub fn parse_text(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(WeoError::EmptySource);
    }

    let layout = Layout::resolve(&headers)?;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let country = Some(cell(layout.country).trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let subject_code = layout
            .subject_code
            .map(|i| cell(i).trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let values = layout.years.iter().map(|&i| cell(i).to_string()).collect();

        let mut metadata = BTreeMap::new();
        for (i, name) in &layout.metadata {
            if let Some(value) = record.get(*i) {
                metadata.insert(name.clone(), value.to_string());
            }
        }

        rows.push(WeoRow {
            country,
            weo_country_code: cell(layout.weo_country_code).to_string(),
            iso: cell(layout.iso).to_string(),
            subject: cell(layout.subject).to_string(),
            units: cell(layout.units).to_string(),
            subject_code,
            values,
            metadata,
        });
    }

    let table = RawTable::new(headers, rows);
    log::info!(
        "Loaded WEO table: {} rows ({} with a country), {} year columns",
        table.len(),
        table.present_rows().count(),
        table.years.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "WEO Country Code\tISO\tWEO Subject Code\tCountry\tSubject Descriptor\tUnits\tScale\t2018\t2019";

    #[test]
    fn parses_rows_and_metadata() {
        let text = format!(
            "{HEADER}\n111\tUSA\tNGDPD\tUnited States\tGross domestic product, current prices\tU.S. dollars\tBillions\t\"20,580.25\"\t21,427.70\n"
        );
        let table = parse_text(&text, b'\t').unwrap();

        assert_eq!(table.years, vec!["2018", "2019"]);
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.country.as_deref(), Some("United States"));
        assert_eq!(row.iso, "USA");
        assert_eq!(row.subject_code.as_deref(), Some("NGDPD"));
        assert_eq!(row.values, vec!["20,580.25", "21,427.70"]);
        assert_eq!(row.metadata.get("Scale").map(String::as_str), Some("Billions"));
        assert!(!row.metadata.contains_key("ISO"));
    }

    #[test]
    fn footer_line_has_no_country() {
        let text = format!(
            "{HEADER}\n\
             111\tUSA\tNGDPD\tUnited States\tGDP\tU.S. dollars\tBillions\t1\t2\n\
             \n\
             International Monetary Fund, World Economic Outlook Database, October 2019\n"
        );
        let table = parse_text(&text, b'\t').unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.present_rows().count(), 1);
        let footer = &table.rows[1];
        assert!(footer.country.is_none());
        assert_eq!(footer.values, vec!["", ""]);
    }

    #[test]
    fn missing_required_column_is_load_error() {
        let err = parse_text("Country\tISO\tUnits\t2018\nX\tXXX\tPercent\t1\n", b'\t').unwrap_err();
        match err {
            WeoError::MissingColumn { column } => assert_eq!(column, "WEO Country Code"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_text("", b'\t').unwrap_err();
        assert!(matches!(err, WeoError::EmptySource));
    }

    #[test]
    fn auto_decoding_falls_back_to_windows_1252() {
        // "Côte d'Ivoire" with 0xF4 for 'ô'
        let bytes = b"C\xF4te d'Ivoire";
        assert_eq!(decode(bytes, SourceEncoding::Auto), "Côte d'Ivoire");
        assert_eq!(decode(bytes, SourceEncoding::Windows1252), "Côte d'Ivoire");
    }

    #[test]
    fn auto_decoding_keeps_utf8_and_strips_bom() {
        let bytes = "\u{feff}São Tomé and Príncipe".as_bytes();
        assert_eq!(decode(bytes, SourceEncoding::Auto), "São Tomé and Príncipe");
    }

    #[test]
    fn forced_utf8_replaces_invalid_bytes() {
        let decoded = decode(b"C\xF4te", SourceEncoding::Utf8);
        assert_eq!(decoded, "C\u{FFFD}te");
    }
}
