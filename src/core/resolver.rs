//! Grouping-column resolution
//!
//! A policy is an ordered list of matcher rules; the first rule that yields a
//! column wins.

use serde::{Deserialize, Serialize};

use crate::error::{GroupdocError, GroupdocResult};
use crate::types::Table;

/// One way of picking the grouping column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "labels")]
pub enum MatchRule {
    /// Column named by the caller
    Explicit,
    /// Case-insensitive equality with any label
    ExactLabel(Vec<String>),
    /// Case-insensitive containment; earlier fragments take priority
    Substring(Vec<String>),
    /// First column of the table
    FirstColumn,
}

impl MatchRule {
    /// Apply this rule alone. `Ok(None)` means "no opinion, try the next rule".
    pub fn apply(&self, names: &[String], explicit: Option<&str>) -> GroupdocResult<Option<String>> {
        match self {
            MatchRule::Explicit => match explicit.map(str::trim).filter(|s| !s.is_empty()) {
                None => Ok(None),
                Some(wanted) => names
                    .iter()
                    .find(|n| n.trim().to_lowercase() == wanted.to_lowercase())
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| {
                        GroupdocError::GroupingColumnNotFound(format!(
                            "requested column '{}' is not in [{}]",
                            wanted,
                            names.join(", ")
                        ))
                    }),
            },
            MatchRule::ExactLabel(labels) => Ok(names
                .iter()
                .find(|n| {
                    let n = n.trim().to_lowercase();
                    labels.iter().any(|l| l.trim().to_lowercase() == n)
                })
                .cloned()),
            MatchRule::Substring(fragments) => Ok(fragments.iter().find_map(|fragment| {
                let fragment = fragment.to_lowercase();
                names
                    .iter()
                    .find(|n| n.to_lowercase().contains(&fragment))
                    .cloned()
            })),
            MatchRule::FirstColumn => Ok(names.first().cloned()),
        }
    }
}

/// Ordered matcher rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverPolicy {
    pub rules: Vec<MatchRule>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self::new(
            default_exact_labels(),
            default_substring_fragments(),
            false,
        )
    }
}

pub fn default_exact_labels() -> Vec<String> {
    vec!["kode kegiatan".to_string(), "activity code".to_string()]
}

pub fn default_substring_fragments() -> Vec<String> {
    vec![
        "kode kegiatan".to_string(),
        "activity code".to_string(),
        "kode".to_string(),
        "code".to_string(),
    ]
}

impl ResolverPolicy {
    /// Explicit override, exact labels, substrings, then optionally the first column
    pub fn new(exact: Vec<String>, fragments: Vec<String>, first_column_fallback: bool) -> Self {
        let mut rules = vec![
            MatchRule::Explicit,
            MatchRule::ExactLabel(exact),
            MatchRule::Substring(fragments),
        ];
        if first_column_fallback {
            rules.push(MatchRule::FirstColumn);
        }
        Self { rules }
    }

    pub fn with_rules(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    /// Name of the column to group by
    pub fn resolve(&self, table: &Table, explicit: Option<&str>) -> GroupdocResult<String> {
        let names = table.column_names();
        for rule in &self.rules {
            if let Some(found) = rule.apply(&names, explicit)? {
                return Ok(found);
            }
        }
        Err(GroupdocError::GroupingColumnNotFound(format!(
            "no column matches the grouping rules; columns: [{}]",
            names.join(", ")
        )))
    }
}
