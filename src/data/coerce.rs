/// Convert a raw WEO cell to a number.
///
/// Group separators (`,`) are stripped before parsing. Anything that still
/// does not parse as `f64` (blank cells, `n/a`, `--`) is `None`, and so is a
/// literal `nan`.
pub fn coerce_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains(',') {
        trimmed.replace(',', "").parse::<f64>()
    } else {
        trimmed.parse::<f64>()
    };
    parsed.ok().filter(|v| !v.is_nan())
}
