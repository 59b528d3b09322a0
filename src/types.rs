use crate::error::{PdfSplitError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Inclusive, 1-indexed span of pages.
///
/// Construction is unchecked; ranges coming from users go through the range
/// parser and [`validate_ranges`](crate::services::validator::validate_ranges)
/// before anything is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of pages covered, zero for an inverted range.
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same span as 0-indexed `(start, end)`, both inclusive.
    pub fn zero_indexed(&self) -> (usize, usize) {
        (self.start.saturating_sub(1), self.end.saturating_sub(1))
    }
}

impl From<(usize, usize)> for PageRange {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl Serialize for PageRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.start, self.end).serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitMode {
    /// One file per page
    #[default]
    #[serde(rename = "pages")]
    Pages,
    /// User-defined page ranges
    #[serde(rename = "ranges")]
    Ranges,
    /// N equal parts
    #[serde(rename = "parts")]
    Parts,
    /// An explicit list of page numbers
    #[serde(rename = "specific")]
    SpecificPages,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Ranges => "ranges",
            Self::Parts => "parts",
            Self::SpecificPages => "specific",
        }
    }

    /// Value stored under the `mode` key of a result's metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SpecificPages => "specific_pages",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = PdfSplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pages" => Ok(Self::Pages),
            "ranges" => Ok(Self::Ranges),
            "parts" => Ok(Self::Parts),
            "specific" | "specific_pages" => Ok(Self::SpecificPages),
            other => Err(PdfSplitError::config(format!(
                "unknown split mode '{}' (expected pages, ranges, parts or specific)",
                other
            ))),
        }
    }
}

/// Loose, unvalidated split parameters as handed over by a caller.
/// Turn it into a [`SplitConfig`] with [`SplitConfig::new`].
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    pub input_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub mode: SplitMode,
    pub prefix: Option<String>,
    pub ranges: Option<Vec<PageRange>>,
    pub pages: Option<Vec<usize>>,
    pub num_parts: Option<usize>,
    pub verbose: bool,
}

impl SplitRequest {
    pub fn new(input_path: impl Into<PathBuf>, mode: SplitMode) -> Self {
        Self {
            input_path: input_path.into(),
            mode,
            ..Default::default()
        }
    }
}

/// Validated split configuration. The only way to obtain one is
/// [`SplitConfig::new`], so the mode always has its parameter.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    input_path: PathBuf,
    output_dir: PathBuf,
    mode: SplitMode,
    prefix: String,
    ranges: Option<Vec<PageRange>>,
    pages: Option<Vec<usize>>,
    num_parts: Option<usize>,
    verbose: bool,
}

impl SplitConfig {
    pub fn new(request: SplitRequest) -> Result<Self> {
        let SplitRequest {
            input_path,
            output_dir,
            mode,
            prefix,
            ranges,
            pages,
            num_parts,
            verbose,
        } = request;

        let ranges = ranges.filter(|r| !r.is_empty());
        let pages = pages.filter(|p| !p.is_empty());

        match mode {
            SplitMode::Ranges if ranges.is_none() => {
                return Err(PdfSplitError::config("ranges required for ranges mode"));
            }
            SplitMode::Parts if num_parts.is_none() => {
                return Err(PdfSplitError::config("num_parts required for parts mode"));
            }
            SplitMode::SpecificPages if pages.is_none() => {
                return Err(PdfSplitError::config("pages required for specific mode"));
            }
            _ => {}
        }

        if let Some(0) = num_parts {
            return Err(PdfSplitError::config("num_parts must be >= 1, got 0"));
        }

        let prefix = match prefix.filter(|p| !p.trim().is_empty()) {
            Some(prefix) => {
                validate_prefix(&prefix)?;
                prefix
            }
            None => default_prefix(&input_path),
        };

        Ok(Self {
            input_path,
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
            mode,
            prefix,
            ranges,
            pages,
            num_parts,
            verbose,
        })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn ranges(&self) -> Option<&[PageRange]> {
        self.ranges.as_deref()
    }

    pub fn pages(&self) -> Option<&[usize]> {
        self.pages.as_deref()
    }

    pub fn num_parts(&self) -> Option<usize> {
        self.num_parts
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Output files must land directly inside the output directory, so the
/// prefix may not carry path separators or name a parent directory.
fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.contains(|c| c == '/' || c == '\\') || prefix == "." || prefix == ".." {
        return Err(PdfSplitError::config(format!(
            "prefix '{}' must be a plain file name without path separators",
            prefix
        )));
    }
    Ok(())
}

fn default_prefix(input_path: &Path) -> String {
    input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStatus {
    Success,
    Partial,
    Error,
}

impl fmt::Display for SplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    pub status: SplitStatus,
    pub num_files: usize,
    pub output_files: Vec<PathBuf>,
    pub message: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SplitResult {
    pub fn success(
        output_files: Vec<PathBuf>,
        message: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::with_status(SplitStatus::Success, output_files, message, metadata)
    }

    /// Result for a run that stopped after producing only some of its files.
    pub fn partial(
        output_files: Vec<PathBuf>,
        message: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::with_status(SplitStatus::Partial, output_files, message, metadata)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(SplitStatus::Error, Vec::new(), message, HashMap::new())
    }

    fn with_status(
        status: SplitStatus,
        output_files: Vec<PathBuf>,
        message: impl Into<String>,
        mut metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        metadata
            .entry("created_at".to_string())
            .or_insert_with(|| chrono::Utc::now().to_rfc3339().into());

        Self {
            status,
            num_files: output_files.len(),
            output_files,
            message: message.into(),
            metadata,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SplitStatus::Success
    }
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(f, "Split successful: {} files created", self.num_files)
        } else {
            write!(f, "Split failed: {}", self.message)
        }
    }
}
