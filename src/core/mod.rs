//! Table pipeline: ingest, resolve grouping column, filter, format, layout

pub mod filter;
pub mod format;
pub mod ingest;
pub mod layout;
pub mod resolver;

pub use filter::{filter_missing, filter_rows};
pub use format::format_thousands;
pub use ingest::{cleanup_columns, find_header_row, normalize, IngestReport, RawRows};
pub use layout::{column_widths, ColumnMeasure, WidthRules};
pub use resolver::{MatchRule, ResolverPolicy};
