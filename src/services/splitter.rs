use crate::error::{PdfSplitError, Result};
use crate::services::engine::DocumentEngine;
use crate::services::partition::calculate_parts;
use crate::services::validator::{validate_pages, validate_ranges};
use crate::types::{PageRange, SplitConfig, SplitMode, SplitResult};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A split strategy: opens the input once and writes one output file per
/// unit of work.
pub trait Splitter {
    fn split(&self) -> Result<SplitResult>;
}

/// Where a splitter reads from and writes to.
#[derive(Debug, Clone)]
pub struct SplitTarget {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub verbose: bool,
}

impl SplitTarget {
    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            input_path: config.input_path().to_path_buf(),
            output_dir: config.output_dir().to_path_buf(),
            prefix: config.prefix().to_string(),
            verbose: config.verbose(),
        }
    }
}

/// `{prefix}_page_{NNN}.pdf`
pub fn page_filename(prefix: &str, page: usize) -> String {
    format!("{}_page_{:03}.pdf", prefix, page)
}

/// `{prefix}_pages_{NNN}-{MMM}.pdf`
pub fn range_filename(prefix: &str, range: PageRange) -> String {
    format!("{}_pages_{:03}-{:03}.pdf", prefix, range.start(), range.end())
}

/// One output file: 0-indexed inclusive page span and its destination.
struct Unit {
    start: usize,
    end: usize,
    path: PathBuf,
}

struct Progress {
    bar: ProgressBar,
}

impl Progress {
    fn new(total: usize, message: &'static str, verbose: bool) -> Self {
        if !verbose {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total as u64).with_message(message);
        if let Ok(style) =
            ProgressStyle::with_template("{msg}: [{bar:20}] {pos}/{len} ({percent}%)")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    fn advance(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish();
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Extracts and writes every unit in order. Files written before a failure
/// stay on disk.
fn write_units<E: DocumentEngine>(
    engine: &E,
    document: &E::Document,
    units: Vec<Unit>,
    progress: Progress,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(units.len());

    for unit in units {
        let extracted = if unit.start == unit.end {
            engine.extract(document, unit.start)
        } else {
            engine.extract_range(document, unit.start, unit.end)
        };

        if let Err(e) = extracted.and_then(|mut part| engine.write(&mut part, &unit.path)) {
            progress.abandon();
            if !written.is_empty() {
                warn!(
                    "Split stopped after {} files; already written files were left in place",
                    written.len()
                );
            }
            return Err(e);
        }

        debug!(
            "Created: {} (pages {}-{})",
            unit.path.display(),
            unit.start + 1,
            unit.end + 1
        );
        written.push(unit.path);
        progress.advance();
    }

    progress.finish();
    Ok(written)
}

fn output_path(target: &SplitTarget, filename: String) -> PathBuf {
    target.output_dir.join(filename)
}

fn open_document<E: DocumentEngine>(
    engine: &E,
    input_path: &Path,
) -> Result<(E::Document, usize)> {
    let document = engine.open(input_path)?;
    let total_pages = engine.page_count(&document);
    Ok((document, total_pages))
}

/// One file per page of the whole document.
pub struct PagesSplitter<'a, E> {
    engine: &'a E,
    target: SplitTarget,
}

impl<'a, E: DocumentEngine> PagesSplitter<'a, E> {
    pub fn new(engine: &'a E, target: SplitTarget) -> Self {
        Self { engine, target }
    }
}

impl<E: DocumentEngine> Splitter for PagesSplitter<'_, E> {
    fn split(&self) -> Result<SplitResult> {
        let (document, total_pages) = open_document(self.engine, &self.target.input_path)?;
        info!(
            "Splitting '{}' into {} single pages",
            self.target.input_path.display(),
            total_pages
        );

        if total_pages == 0 {
            warn!("'{}' has no pages", self.target.input_path.display());
        }

        let units = (0..total_pages)
            .map(|page| Unit {
                start: page,
                end: page,
                path: output_path(&self.target, page_filename(&self.target.prefix, page + 1)),
            })
            .collect();

        let progress = Progress::new(total_pages, "Splitting pages", self.target.verbose);
        let output_files = write_units(self.engine, &document, units, progress)?;

        let metadata = HashMap::from([
            ("total_pages".to_string(), json!(total_pages)),
            ("mode".to_string(), json!(SplitMode::Pages.label())),
        ]);
        let message = format!("Successfully split into {} pages", output_files.len());

        Ok(SplitResult::success(output_files, message, metadata))
    }
}

/// One file per caller-supplied range, in the order given. Overlapping
/// ranges are allowed.
pub struct RangesSplitter<'a, E> {
    engine: &'a E,
    target: SplitTarget,
    ranges: Vec<PageRange>,
}

impl<'a, E: DocumentEngine> RangesSplitter<'a, E> {
    pub fn new(engine: &'a E, target: SplitTarget, ranges: Vec<PageRange>) -> Self {
        Self {
            engine,
            target,
            ranges,
        }
    }

    /// Splits an already opened document.
    fn split_document(&self, document: &E::Document) -> Result<SplitResult> {
        let total_pages = self.engine.page_count(document);
        validate_ranges(&self.ranges, total_pages, true)?;

        info!(
            "Splitting '{}' into {} ranges",
            self.target.input_path.display(),
            self.ranges.len()
        );

        let units = self
            .ranges
            .iter()
            .map(|&range| {
                let (start, end) = range.zero_indexed();
                Unit {
                    start,
                    end,
                    path: output_path(&self.target, range_filename(&self.target.prefix, range)),
                }
            })
            .collect();

        let progress = Progress::new(self.ranges.len(), "Splitting ranges", self.target.verbose);
        let output_files = write_units(self.engine, document, units, progress)?;

        let metadata = HashMap::from([
            ("total_pages".to_string(), json!(total_pages)),
            ("mode".to_string(), json!(SplitMode::Ranges.label())),
            ("ranges".to_string(), json!(self.ranges)),
        ]);
        let message = format!("Successfully split into {} ranges", output_files.len());

        Ok(SplitResult::success(output_files, message, metadata))
    }
}

impl<E: DocumentEngine> Splitter for RangesSplitter<'_, E> {
    fn split(&self) -> Result<SplitResult> {
        let (document, _) = open_document(self.engine, &self.target.input_path)?;
        self.split_document(&document)
    }
}

/// `num_parts` near-equal contiguous parts, written through
/// [`RangesSplitter`].
pub struct PartsSplitter<'a, E> {
    engine: &'a E,
    target: SplitTarget,
    num_parts: usize,
}

impl<'a, E: DocumentEngine> PartsSplitter<'a, E> {
    pub fn new(engine: &'a E, target: SplitTarget, num_parts: usize) -> Self {
        Self {
            engine,
            target,
            num_parts,
        }
    }
}

impl<E: DocumentEngine> Splitter for PartsSplitter<'_, E> {
    fn split(&self) -> Result<SplitResult> {
        let (document, total_pages) = open_document(self.engine, &self.target.input_path)?;
        let ranges = calculate_parts(total_pages, self.num_parts)?;

        info!(
            "Calculated {} parts: {}",
            ranges.len(),
            ranges
                .iter()
                .map(PageRange::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let ranges_splitter = RangesSplitter::new(self.engine, self.target.clone(), ranges);
        let mut result = ranges_splitter.split_document(&document)?;

        result
            .metadata
            .insert("mode".to_string(), json!(SplitMode::Parts.label()));
        result
            .metadata
            .insert("num_parts".to_string(), json!(self.num_parts));
        result.message = format!("Successfully split into {} equal parts", self.num_parts);

        Ok(result)
    }
}

/// One single-page file per requested page, in the order given. Repeated
/// pages map to the same filename, so the later write replaces the earlier.
pub struct SpecificPagesSplitter<'a, E> {
    engine: &'a E,
    target: SplitTarget,
    pages: Vec<usize>,
}

impl<'a, E: DocumentEngine> SpecificPagesSplitter<'a, E> {
    pub fn new(engine: &'a E, target: SplitTarget, pages: Vec<usize>) -> Self {
        Self {
            engine,
            target,
            pages,
        }
    }
}

impl<E: DocumentEngine> Splitter for SpecificPagesSplitter<'_, E> {
    fn split(&self) -> Result<SplitResult> {
        let (document, total_pages) = open_document(self.engine, &self.target.input_path)?;
        validate_pages(&self.pages, total_pages)?;

        info!(
            "Extracting {} pages from '{}'",
            self.pages.len(),
            self.target.input_path.display()
        );

        let units = self
            .pages
            .iter()
            .map(|&page| Unit {
                start: page - 1,
                end: page - 1,
                path: output_path(&self.target, page_filename(&self.target.prefix, page)),
            })
            .collect();

        let progress = Progress::new(self.pages.len(), "Extracting pages", self.target.verbose);
        let output_files = write_units(self.engine, &document, units, progress)?;

        let metadata = HashMap::from([
            ("total_pages".to_string(), json!(total_pages)),
            ("mode".to_string(), json!(SplitMode::SpecificPages.label())),
            ("pages".to_string(), json!(self.pages)),
        ]);
        let message = format!("Successfully extracted {} pages", output_files.len());

        Ok(SplitResult::success(output_files, message, metadata))
    }
}

/// Picks the strategy for `config.mode()`.
pub fn create_splitter<'a, E: DocumentEngine + 'a>(
    engine: &'a E,
    config: &SplitConfig,
) -> Result<Box<dyn Splitter + 'a>> {
    let target = SplitTarget::from_config(config);

    let splitter: Box<dyn Splitter + 'a> = match config.mode() {
        SplitMode::Pages => Box::new(PagesSplitter::new(engine, target)),
        SplitMode::Ranges => {
            let ranges = config
                .ranges()
                .ok_or_else(|| PdfSplitError::config("ranges required for ranges mode"))?;
            Box::new(RangesSplitter::new(engine, target, ranges.to_vec()))
        }
        SplitMode::Parts => {
            let num_parts = config
                .num_parts()
                .ok_or_else(|| PdfSplitError::config("num_parts required for parts mode"))?;
            Box::new(PartsSplitter::new(engine, target, num_parts))
        }
        SplitMode::SpecificPages => {
            let pages = config
                .pages()
                .ok_or_else(|| PdfSplitError::config("pages required for specific mode"))?;
            Box::new(SpecificPagesSplitter::new(engine, target, pages.to_vec()))
        }
    };

    Ok(splitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::engine::LopdfEngine;
    use crate::test_support::{page_count, write_sample_pdf};
    use crate::types::{SplitRequest, SplitStatus};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn target(dir: &TempDir, input: PathBuf) -> SplitTarget {
        SplitTarget {
            input_path: input,
            output_dir: dir.path().join("out"),
            prefix: "doc".to_string(),
            verbose: false,
        }
    }

    fn setup(num_pages: usize) -> (TempDir, SplitTarget) {
        let dir = TempDir::new().unwrap();
        let input = write_sample_pdf(dir.path(), "doc.pdf", num_pages);
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        let target = target(&dir, input);
        (dir, target)
    }

    fn file_names(result: &SplitResult) -> Vec<String> {
        result
            .output_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    /// Fails every write after the first `succeed` ones.
    struct FlakyEngine {
        succeed: usize,
        writes: Cell<usize>,
    }

    impl DocumentEngine for FlakyEngine {
        type Document = lopdf::Document;

        fn open(&self, path: &Path) -> Result<Self::Document> {
            LopdfEngine.open(path)
        }

        fn page_count(&self, document: &Self::Document) -> usize {
            LopdfEngine.page_count(document)
        }

        fn extract_range(
            &self,
            document: &Self::Document,
            start: usize,
            end: usize,
        ) -> Result<Self::Document> {
            LopdfEngine.extract_range(document, start, end)
        }

        fn write(&self, document: &mut Self::Document, path: &Path) -> Result<()> {
            let done = self.writes.get();
            if done >= self.succeed {
                return Err(PdfSplitError::processing("disk full"));
            }
            self.writes.set(done + 1);
            LopdfEngine.write(document, path)
        }
    }

    #[test]
    fn test_filenames() {
        assert_eq!(page_filename("doc", 7), "doc_page_007.pdf");
        assert_eq!(page_filename("doc", 1234), "doc_page_1234.pdf");
        assert_eq!(
            range_filename("doc", PageRange::new(1, 45)),
            "doc_pages_001-045.pdf"
        );
    }

    #[test]
    fn test_pages_splitter_writes_every_page() {
        let (_dir, target) = setup(4);
        let result = PagesSplitter::new(&LopdfEngine, target).split().unwrap();

        assert_eq!(result.status, SplitStatus::Success);
        assert_eq!(result.num_files, 4);
        assert_eq!(
            file_names(&result),
            vec![
                "doc_page_001.pdf",
                "doc_page_002.pdf",
                "doc_page_003.pdf",
                "doc_page_004.pdf"
            ]
        );
        assert!(result.output_files.iter().all(|p| page_count(p) == 1));
        assert_eq!(result.metadata["mode"], json!("pages"));
        assert_eq!(result.metadata["total_pages"], json!(4));
    }

    #[test]
    fn test_ranges_splitter_allows_overlap() {
        let (_dir, target) = setup(8);
        let ranges = vec![PageRange::new(1, 5), PageRange::new(3, 8)];
        let result = RangesSplitter::new(&LopdfEngine, target, ranges).split().unwrap();

        assert_eq!(
            file_names(&result),
            vec!["doc_pages_001-005.pdf", "doc_pages_003-008.pdf"]
        );
        assert_eq!(page_count(&result.output_files[0]), 5);
        assert_eq!(page_count(&result.output_files[1]), 6);
        assert_eq!(result.metadata["mode"], json!("ranges"));
        assert_eq!(result.metadata["ranges"], json!([[1, 5], [3, 8]]));
        assert_eq!(result.message, "Successfully split into 2 ranges");
    }

    #[test]
    fn test_ranges_splitter_rejects_out_of_bounds_before_writing() {
        let (dir, target) = setup(5);
        let ranges = vec![PageRange::new(1, 2), PageRange::new(4, 9)];
        let err = RangesSplitter::new(&LopdfEngine, target, ranges)
            .split()
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn test_parts_splitter_overrides_metadata() {
        let (_dir, target) = setup(7);
        let result = PartsSplitter::new(&LopdfEngine, target, 2).split().unwrap();

        assert_eq!(
            file_names(&result),
            vec!["doc_pages_001-004.pdf", "doc_pages_005-007.pdf"]
        );
        assert_eq!(result.metadata["mode"], json!("parts"));
        assert_eq!(result.metadata["num_parts"], json!(2));
        assert_eq!(result.message, "Successfully split into 2 equal parts");
    }

    #[test]
    fn test_parts_splitter_too_many_parts() {
        let (_dir, target) = setup(2);
        let err = PartsSplitter::new(&LopdfEngine, target, 3).split().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_specific_pages_splitter_keeps_order() {
        let (_dir, target) = setup(6);
        let result = SpecificPagesSplitter::new(&LopdfEngine, target, vec![6, 1, 3])
            .split()
            .unwrap();

        assert_eq!(
            file_names(&result),
            vec!["doc_page_006.pdf", "doc_page_001.pdf", "doc_page_003.pdf"]
        );
        assert_eq!(result.metadata["mode"], json!("specific_pages"));
        assert_eq!(result.metadata["pages"], json!([6, 1, 3]));
        assert_eq!(result.message, "Successfully extracted 3 pages");
    }

    #[test]
    fn test_verbose_run_reports_progress_without_changing_result() {
        let (_dir, mut target) = setup(3);
        target.verbose = true;

        let ranges = vec![PageRange::new(1, 2), PageRange::new(3, 3)];
        let result = RangesSplitter::new(&LopdfEngine, target.clone(), ranges)
            .split()
            .unwrap();
        assert_eq!(result.num_files, 2);

        let result = PagesSplitter::new(&LopdfEngine, target).split().unwrap();
        assert_eq!(result.num_files, 3);
        assert_eq!(result.status, SplitStatus::Success);
    }

    #[test]
    fn test_verbose_progress_bar_tracks_units() {
        let progress = Progress::new(4, "Splitting pages", true);
        progress.advance();
        progress.advance();
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.length(), Some(4));
        progress.finish();
        assert!(progress.bar.is_finished());

        let hidden = Progress::new(4, "Splitting pages", false);
        assert!(hidden.bar.is_hidden());
    }

    #[test]
    fn test_failure_mid_loop_leaves_written_files() {
        let (dir, target) = setup(5);
        let engine = FlakyEngine {
            succeed: 2,
            writes: Cell::new(0),
        };

        let err = PagesSplitter::new(&engine, target).split().unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(!err.is_validation());

        let out = dir.path().join("out");
        assert!(out.join("doc_page_001.pdf").exists());
        assert!(out.join("doc_page_002.pdf").exists());
        assert!(!out.join("doc_page_003.pdf").exists());
    }

    #[test]
    fn test_create_splitter_per_mode() {
        let (dir, _) = setup(6);
        let input = dir.path().join("doc.pdf");
        let output_dir = Some(dir.path().join("out"));

        let requests = vec![
            SplitRequest {
                output_dir: output_dir.clone(),
                ..SplitRequest::new(&input, SplitMode::Pages)
            },
            SplitRequest {
                output_dir: output_dir.clone(),
                ranges: Some(vec![PageRange::new(2, 3)]),
                ..SplitRequest::new(&input, SplitMode::Ranges)
            },
            SplitRequest {
                output_dir: output_dir.clone(),
                num_parts: Some(3),
                ..SplitRequest::new(&input, SplitMode::Parts)
            },
            SplitRequest {
                output_dir,
                pages: Some(vec![4]),
                ..SplitRequest::new(&input, SplitMode::SpecificPages)
            },
        ];

        let expected = [6, 1, 3, 1];
        for (request, files) in requests.into_iter().zip(expected) {
            let mode = request.mode;
            let config = SplitConfig::new(request).unwrap();
            let result = create_splitter(&LopdfEngine, &config).unwrap().split().unwrap();
            assert_eq!(result.num_files, files, "mode {}", mode);
            assert_eq!(result.metadata["mode"], json!(mode.label()));
        }
    }
}
