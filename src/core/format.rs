//! Number formatting shared by all exporters

use crate::types::CellValue;

/// Thousands separator (dot grouping, e.g. `1.500.000`)
pub const THOUSANDS_SEPARATOR: char = '.';

/// Render a cell for display in an exported document.
///
/// Numbers (and text that parses as a finite number) become rounded integers
/// grouped by dots; missing cells become `""`; anything else falls back to its
/// plain string form. Never panics.
pub fn format_thousands(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) if n.is_finite() => group_integer(*n),
        CellValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => group_integer(n),
            _ => s.clone(),
        },
        other => other.to_string(),
    }
}

/// Round to an integer and insert separators every three digits
fn group_integer(n: f64) -> String {
    let rounded = n.round();
    if rounded == 0.0 {
        return "0".to_string();
    }
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
