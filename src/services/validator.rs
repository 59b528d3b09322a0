use crate::error::{PdfSplitError, Result};
use crate::types::PageRange;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info};

/// Checks ranges against the document's page count. With `allow_overlap`
/// off, a range that revisits a page covered by an earlier one is rejected
/// and every revisited page is listed.
pub fn validate_ranges(
    ranges: &[PageRange],
    total_pages: usize,
    allow_overlap: bool,
) -> Result<()> {
    if ranges.is_empty() {
        return Err(PdfSplitError::range("ranges list is empty"));
    }

    let mut seen_pages = BTreeSet::new();

    for range in ranges {
        let (start, end) = (range.start(), range.end());

        if start < 1 || end > total_pages {
            return Err(PdfSplitError::range(format!(
                "range ({}, {}) out of bounds for PDF with {} pages (valid pages: 1-{})",
                start, end, total_pages, total_pages
            )));
        }

        if start > end {
            return Err(PdfSplitError::range(format!(
                "range ({}, {}): start must be <= end",
                start, end
            )));
        }

        if !allow_overlap {
            let overlap: Vec<usize> = (start..=end).filter(|p| seen_pages.contains(p)).collect();
            if !overlap.is_empty() {
                return Err(PdfSplitError::range(format!(
                    "overlapping ranges detected: pages {:?}",
                    overlap
                )));
            }
            seen_pages.extend(start..=end);
        }
    }

    Ok(())
}

/// Checks page numbers against the document's page count. The list is
/// neither sorted nor deduplicated.
pub fn validate_pages(pages: &[usize], total_pages: usize) -> Result<()> {
    if pages.is_empty() {
        return Err(PdfSplitError::range("pages list is empty"));
    }

    for &page in pages {
        if page < 1 {
            return Err(PdfSplitError::range(format!(
                "invalid page number: {} (must be >= 1)",
                page
            )));
        }

        if page > total_pages {
            return Err(PdfSplitError::range(format!(
                "page {} does not exist (PDF has {} pages)",
                page, total_pages
            )));
        }
    }

    Ok(())
}

/// Input must be an existing regular file with a `.pdf` extension and no
/// `..` components.
pub fn validate_pdf_path(path: &Path) -> Result<()> {
    let shown = path.display().to_string();

    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(PdfSplitError::InvalidPath {
            path: shown,
            reason: "Path traversal not allowed".to_string(),
        });
    }

    if !path.exists() {
        return Err(PdfSplitError::FileNotFound { path: shown });
    }

    if !path.is_file() {
        return Err(PdfSplitError::NotAFile { path: shown });
    }

    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if !is_pdf {
        return Err(PdfSplitError::NotAPdf { path: shown });
    }

    debug!("Validated input PDF: {}", shown);
    Ok(())
}

/// Makes sure `directory` exists (creating it when `create` is set), is a
/// directory, and accepts new files. Writability is checked by creating and
/// dropping an anonymous temporary file there.
pub fn validate_output_dir(directory: &Path, create: bool) -> Result<()> {
    if !directory.exists() {
        if !create {
            return Err(PdfSplitError::OutputDirectory {
                reason: format!("output directory does not exist: {}", directory.display()),
            });
        }

        fs::create_dir_all(directory).map_err(|e| PdfSplitError::OutputDirectory {
            reason: format!("cannot create directory {}: {}", directory.display(), e),
        })?;
        info!("Created output directory: {}", directory.display());
    }

    let metadata = fs::metadata(directory).map_err(|e| PdfSplitError::OutputDirectory {
        reason: format!("cannot read directory {}: {}", directory.display(), e),
    })?;

    if !metadata.is_dir() {
        return Err(PdfSplitError::OutputDirectory {
            reason: format!("path is not a directory: {}", directory.display()),
        });
    }

    tempfile::tempfile_in(directory).map_err(|e| PdfSplitError::OutputDirectory {
        reason: format!("directory is not writable: {}: {}", directory.display(), e),
    })?;

    Ok(())
}
