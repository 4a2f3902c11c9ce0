use std::collections::BTreeSet;

use super::model::WeoRow;

// ---------------------------------------------------------------------------
// SubjectFilter – which indicators a query selects
// ---------------------------------------------------------------------------

/// Indicator selection: a single name or a set of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectFilter {
    One(String),
    Many(BTreeSet<String>),
}

impl SubjectFilter {
    /// Whether `subject` is selected.
    pub fn matches(&self, subject: &str) -> bool {
        match self {
            SubjectFilter::One(name) => name == subject,
            SubjectFilter::Many(names) => names.contains(subject),
        }
    }

    /// Whether the filter can never match (an empty set).
    pub fn is_empty(&self) -> bool {
        matches!(self, SubjectFilter::Many(names) if names.is_empty())
    }
}

impl From<&str> for SubjectFilter {
    fn from(name: &str) -> Self {
        SubjectFilter::One(name.to_string())
    }
}

impl From<String> for SubjectFilter {
    fn from(name: String) -> Self {
        SubjectFilter::One(name)
    }
}

impl From<&String> for SubjectFilter {
    fn from(name: &String) -> Self {
        SubjectFilter::One(name.clone())
    }
}

impl<S: AsRef<str>> From<&[S]> for SubjectFilter {
    fn from(names: &[S]) -> Self {
        SubjectFilter::Many(names.iter().map(|n| n.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for SubjectFilter {
    fn from(names: [S; N]) -> Self {
        SubjectFilter::Many(names.iter().map(|n| n.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for SubjectFilter {
    fn from(names: Vec<S>) -> Self {
        SubjectFilter::from(names.as_slice())
    }
}

impl From<BTreeSet<String>> for SubjectFilter {
    fn from(names: BTreeSet<String>) -> Self {
        SubjectFilter::Many(names)
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Rows whose indicator passes `filter`. Callers pass rows that already
/// carry a country.
pub fn rows_by_subject<'a, 'f>(
    rows: impl Iterator<Item = &'a WeoRow> + 'f,
    filter: &'f SubjectFilter,
) -> impl Iterator<Item = &'a WeoRow> + 'f
where
    'a: 'f,
{
    rows.filter(move |r| filter.matches(&r.subject))
}

/// Unique values of `key` over `rows`, in order of first appearance.
pub fn unique_in_order<'a, T, F>(rows: impl Iterator<Item = &'a WeoRow>, key: F) -> Vec<T>
where
    T: Ord + Clone,
    F: Fn(&'a WeoRow) -> Option<T>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for row in rows {
        if let Some(value) = key(row) {
            if seen.insert(value.clone()) {
                out.push(value);
            }
        }
    }
    out
}
