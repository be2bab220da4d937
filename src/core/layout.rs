//! PDF column width balancing
//!
//! Fixed columns are sized from their longest value and clamped; flexible
//! columns share what is left. The result is rescaled so the widths always
//! add up to the usable page width.

use serde::{Deserialize, Serialize};

/// Sizing parameters, in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthRules {
    /// Estimated width of one character
    pub char_width: f64,
    /// Horizontal cell padding (both sides together)
    pub padding: f64,
    pub min_width: f64,
    pub max_width: f64,
}

impl Default for WidthRules {
    fn default() -> Self {
        Self {
            char_width: 4.6,
            padding: 8.0,
            min_width: 36.0,
            max_width: 160.0,
        }
    }
}

/// Measurements of one column fed into the width computation
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeasure {
    /// Longest header-or-value length, in characters
    pub longest_chars: usize,
    /// Shares leftover width instead of being sized by content
    pub flexible: bool,
}

impl ColumnMeasure {
    pub fn fixed(longest_chars: usize) -> Self {
        Self {
            longest_chars,
            flexible: false,
        }
    }

    pub fn flexible(longest_chars: usize) -> Self {
        Self {
            longest_chars,
            flexible: true,
        }
    }
}

/// Widths for each column, summing to `usable_width`
pub fn column_widths(columns: &[ColumnMeasure], usable_width: f64, rules: &WidthRules) -> Vec<f64> {
    if columns.is_empty() {
        return Vec::new();
    }
    let min = rules.min_width.max(0.0);
    let max = rules.max_width.max(min);

    let fixed_total: f64 = columns
        .iter()
        .filter(|c| !c.flexible)
        .map(|c| fixed_width(c.longest_chars, rules, min, max))
        .sum();
    let flexible_count = columns.iter().filter(|c| c.flexible).count();
    let flexible_width = if flexible_count > 0 {
        ((usable_width - fixed_total).max(0.0) / flexible_count as f64).max(min)
    } else {
        0.0
    };

    let mut widths: Vec<f64> = columns
        .iter()
        .map(|c| {
            if c.flexible {
                flexible_width
            } else {
                fixed_width(c.longest_chars, rules, min, max)
            }
        })
        .collect();

    let total: f64 = widths.iter().sum();
    if total > 0.0 {
        let scale = usable_width / total;
        for w in widths.iter_mut() {
            *w *= scale;
        }
    } else {
        let even = usable_width / widths.len() as f64;
        widths.iter_mut().for_each(|w| *w = even);
    }
    widths
}

fn fixed_width(chars: usize, rules: &WidthRules, min: f64, max: f64) -> f64 {
    (chars as f64 * rules.char_width + rules.padding).clamp(min, max)
}
