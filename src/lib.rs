//! Groupdoc - split a spreadsheet by activity code and export each group
//!
//! This library reads an uploaded Excel workbook, finds its header row,
//! resolves the grouping ("kode kegiatan") column, keeps the dataset in a
//! store and renders any group as Excel, Word or PDF.
//!
//! # Features
//!
//! - Header-row detection and column cleanup for messy sheets
//! - Configurable grouping-column rules (exact, substring, explicit, positional)
//! - Global-slot store with disk snapshot, or bounded per-upload sessions
//! - Excel, Word and PDF exporters with dot-grouped thousands
//!
//! # Example
//!
//! ```no_run
//! use royalbit_groupdoc::config::GroupdocConfig;
//! use royalbit_groupdoc::export::ArtifactKind;
//! use royalbit_groupdoc::service::GroupService;
//! use royalbit_groupdoc::store::GlobalSlotStore;
//! use std::sync::Arc;
//!
//! let config = GroupdocConfig::default();
//! let service = GroupService::new(Arc::new(GlobalSlotStore::new()), &config);
//!
//! let bytes = std::fs::read("rekap.xlsx")?;
//! let upload = service.upload(&bytes, None)?;
//! println!("Grouping by {}: {:?}", upload.grouping_column, upload.groups);
//!
//! let path = service.export(&upload.handle, &upload.groups[0], ArtifactKind::Pdf)?;
//! println!("Wrote {}", path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod error;
pub mod excel;
pub mod export;
pub mod service;
pub mod store;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{ErrorReport, GroupdocError, GroupdocResult};
pub use types::{CellValue, Column, Dataset, Table};
