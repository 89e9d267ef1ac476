//! Variant labels: the per-qubit bases written as a tuple of quoted symbols.
//!
//! A label reads `('X', 'Y', 'Z')`. A single-element label keeps the
//! trailing comma, `('X',)`, so the same parser handles every width.

use crate::basis::MeasurementBasis;
use crate::error::{TomographyError, TomographyResult};

/// Render bases as a tuple label.
pub fn format_label(bases: &[MeasurementBasis]) -> String {
    let items: Vec<String> = bases.iter().map(|b| format!("'{}'", b.symbol())).collect();
    match items.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", items.join(", ")),
    }
}

/// Parse a tuple label back into bases.
pub fn parse_label(label: &str) -> TomographyResult<Vec<MeasurementBasis>> {
    let invalid = |reason: &str| TomographyError::InvalidLabel(format!("{reason}: {label}"));

    let inner = label
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| invalid("missing parentheses"))?
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
    // `('X',)` splits into ["'X'", ""].
    if items.len() > 1 && items.last().is_some_and(|s| s.is_empty()) {
        items.pop();
    }

    items
        .into_iter()
        .map(|item| {
            let symbol = item
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .ok_or_else(|| invalid("unquoted basis"))?;
            symbol.parse::<MeasurementBasis>()
        })
        .collect()
}

/// Compact form used in file names, e.g. `XYZ`.
pub fn compact_label(bases: &[MeasurementBasis]) -> String {
    bases.iter().map(|b| b.symbol()).collect()
}
