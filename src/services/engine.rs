use crate::error::{PdfSplitError, Result};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Page-level document operations the splitters rely on. Page indices
/// here are 0-based.
pub trait DocumentEngine {
    type Document;

    fn open(&self, path: &Path) -> Result<Self::Document>;

    fn page_count(&self, document: &Self::Document) -> usize;

    fn extract(&self, document: &Self::Document, page: usize) -> Result<Self::Document> {
        self.extract_range(document, page, page)
    }

    /// New document holding pages `start..=end` of `document`.
    fn extract_range(
        &self,
        document: &Self::Document,
        start: usize,
        end: usize,
    ) -> Result<Self::Document>;

    /// Creates or overwrites `path`.
    fn write(&self, document: &mut Self::Document, path: &Path) -> Result<()>;
}

/// [`DocumentEngine`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

impl DocumentEngine for LopdfEngine {
    type Document = Document;

    fn open(&self, path: &Path) -> Result<Document> {
        let document = Document::load(path).map_err(|e| {
            PdfSplitError::processing(format!("cannot read PDF {}: {}", path.display(), e))
        })?;

        debug!(
            "Opened {} ({} pages)",
            path.display(),
            document.get_pages().len()
        );
        Ok(document)
    }

    fn page_count(&self, document: &Document) -> usize {
        document.get_pages().len()
    }

    fn extract_range(&self, document: &Document, start: usize, end: usize) -> Result<Document> {
        let total = self.page_count(document);
        if start > end || end >= total {
            return Err(PdfSplitError::processing(format!(
                "cannot extract pages {}..={} from a document with {} pages",
                start, end, total
            )));
        }

        // lopdf numbers pages from 1
        let keep = (start + 1) as u32..=(end + 1) as u32;
        let to_delete: Vec<u32> = document
            .get_pages()
            .keys()
            .copied()
            .filter(|number| !keep.contains(number))
            .collect();

        let mut extracted = document.clone();
        if !to_delete.is_empty() {
            extracted.delete_pages(&to_delete);
        }
        extracted.prune_objects();
        extracted.compress();

        Ok(extracted)
    }

    fn write(&self, document: &mut Document, path: &Path) -> Result<()> {
        document.save(path).map_err(|e| {
            PdfSplitError::processing(format!("cannot write {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}
