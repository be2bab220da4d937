//! Word and PDF exporters

mod docx;
mod pdf;

pub use docx::DocxExporter;
pub use pdf::{wrap_text, PdfExporter};
