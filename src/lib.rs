//! # PDF Splitter Library
//!
//! Splits a PDF into several output documents: one file per page, one file
//! per page range, N near-equal parts, or an explicit list of pages.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pdf_splitter::{split_pdf, PageRange, SplitMode, SplitRequest};
//!
//! let result = split_pdf(SplitRequest {
//!     output_dir: Some("./output".into()),
//!     ranges: Some(vec![PageRange::new(1, 5), PageRange::new(10, 15)]),
//!     ..SplitRequest::new("document.pdf", SplitMode::Ranges)
//! });
//!
//! if result.is_success() {
//!     for file in &result.output_files {
//!         println!("{}", file.display());
//!     }
//! } else {
//!     eprintln!("{}", result);
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types and services for easier usage
pub use error::{ErrorKind, PdfSplitError, Result};
pub use services::{
    calculate_parts, parse_page_list, parse_ranges, split_pdf, split_with_config,
    split_with_engine, validate_pages, validate_ranges, DocumentEngine, LopdfEngine,
};
pub use types::{PageRange, SplitConfig, SplitMode, SplitRequest, SplitResult, SplitStatus};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
