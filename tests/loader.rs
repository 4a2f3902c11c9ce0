//! Loading WEO files from disk: encodings, footers and load failures.

use std::io::Write;

use tempfile::NamedTempFile;
use weo_reader::{Dataset, SourceEncoding, WeoConfig, WeoError};

fn create_temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

/// Two countries with Windows-1252 accented names, CRLF line endings and the
/// usual one-cell footer.
fn latin1_source() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(
        b"WEO Country Code\tISO\tWEO Subject Code\tCountry\tSubject Descriptor\tUnits\tScale\t2018\t2019\r\n",
    );
    bytes.extend_from_slice(b"662\tCIV\tLUR\tC\xF4te d'Ivoire\tUnemployment rate\tPercent of total labor force\t\tn/a\tn/a\r\n");
    bytes.extend_from_slice(b"716\tSTP\tLUR\tS\xE3o Tom\xE9 and Pr\xEDncipe\tUnemployment rate\tPercent of total labor force\t\t13.7\t13.4\r\n");
    bytes.extend_from_slice(b"\r\nInternational Monetary Fund, World Economic Outlook Database, October 2019\r\n");
    bytes
}

#[test]
fn opens_windows_1252_file() {
    let file = create_temp_file(&latin1_source());
    let weo = Dataset::open(file.path()).unwrap();

    let names: Vec<String> = weo.countries().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Côte d'Ivoire", "São Tomé and Príncipe"]);
    assert_eq!(weo.iso_code("são tomé").unwrap(), "STP");
    assert_eq!(weo.iso_code("CÔTE").unwrap(), "CIV");
    assert_eq!(weo.raw().len(), 3);
    assert_eq!(weo.rows().count(), 2);
}

#[test]
fn explicit_encoding_matches_detection() {
    let file = create_temp_file(&latin1_source());
    let detected = Dataset::open(file.path()).unwrap();
    let forced = Dataset::open_with(
        file.path(),
        WeoConfig::default().with_encoding(SourceEncoding::Windows1252),
    )
    .unwrap();
    assert_eq!(detected.countries(), forced.countries());
}

#[test]
fn opens_utf8_file_with_bom() {
    let text = "\u{feff}Country\tWEO Country Code\tISO\tSubject Descriptor\tUnits\t2019\n\
                Türkiye\t186\tTUR\tPopulation\tPersons\t82.579\n";
    let file = create_temp_file(text.as_bytes());
    let weo = Dataset::open(file.path()).unwrap();

    assert_eq!(weo.countries()[0].name, "Türkiye");
    let pop = weo.get("Population", "Persons").unwrap();
    assert_eq!(pop.value("TUR", 2019), Some(82.579));
}

#[test]
fn comma_delimited_source_with_quoted_numbers() {
    let text = "Country,WEO Country Code,ISO,Subject Descriptor,Units,2018\n\
                Japan,158,JPN,\"Gross domestic product, current prices\",U.S. dollars,\"4,971.93\"\n";
    let file = create_temp_file(text.as_bytes());
    let weo = Dataset::open_with(file.path(), WeoConfig::default().with_delimiter(b',')).unwrap();

    let gdp = weo.gdp_usd(2018).unwrap();
    assert_eq!(gdp.get("JPN"), Some(4971.93));
}

#[test]
fn missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::open(dir.path().join("WEOOct2019all.xls")).unwrap_err();
    assert!(matches!(err, WeoError::FileNotFound { .. }));
    assert!(err.is_load_error());
}

#[test]
fn missing_required_column_is_load_error() {
    let file = create_temp_file(b"Country\tWEO Country Code\tSubject Descriptor\tUnits\t2019\nX\t1\tY\tZ\t1\n");
    let err = Dataset::open(file.path()).unwrap_err();
    match err {
        WeoError::MissingColumn { ref column } => assert_eq!(column, "ISO"),
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_load_error());
}

#[test]
fn empty_file_is_load_error() {
    let file = create_temp_file(b"");
    let err = Dataset::open(file.path()).unwrap_err();
    assert!(matches!(err, WeoError::EmptySource));
}

#[test]
fn header_only_file_loads_empty() {
    let file = create_temp_file(b"Country\tWEO Country Code\tISO\tSubject Descriptor\tUnits\t2019\n");
    let weo = Dataset::open(file.path()).unwrap();
    assert!(weo.variables().is_empty());
    assert!(weo.countries().is_empty());
    assert!(matches!(
        weo.get("Population", "Persons"),
        Err(WeoError::InvalidUnit { .. })
    ));
}
