use crate::error::{PdfSplitError, Result};
use crate::types::PageRange;
use regex::Regex;
use tracing::debug;

/// Parses human-entered page selections such as `"1-5,8,10-12"`.
pub struct RangeParser {
    range_pattern: Regex,
    page_pattern: Regex,
}

impl RangeParser {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| PdfSplitError::range(format!("bad pattern: {}", e)))
        };

        Ok(Self {
            range_pattern: compile(r"^(\d+)-(\d+)$")?,
            page_pattern: compile(r"^(\d+)$")?,
        })
    }

    /// Parses comma-separated `N` and `N-M` tokens into ranges, in input
    /// order. A single page `N` becomes `(N, N)`. Upper bounds are not
    /// checked here because the page count is not known yet.
    pub fn parse_ranges(&self, range_string: &str) -> Result<Vec<PageRange>> {
        if range_string.trim().is_empty() {
            return Err(PdfSplitError::range("range string is empty"));
        }

        let mut ranges = Vec::new();

        for token in range_string.split(',').map(str::trim) {
            if token.contains('-') {
                let captures = self.range_pattern.captures(token).ok_or_else(|| {
                    PdfSplitError::range(format!(
                        "invalid range format: '{}' (expected format: '1-5')",
                        token
                    ))
                })?;

                let start = parse_number(&captures[1], token)?;
                let end = parse_number(&captures[2], token)?;

                if start < 1 {
                    return Err(PdfSplitError::range(format!(
                        "{} (page numbers must be >= 1)",
                        token
                    )));
                }

                if start > end {
                    return Err(PdfSplitError::range(format!(
                        "{} (start must be <= end)",
                        token
                    )));
                }

                ranges.push(PageRange::new(start, end));
            } else {
                let page = self.parse_page(token)?;
                ranges.push(PageRange::new(page, page));
            }
        }

        debug!("Parsed '{}' into {} ranges", range_string, ranges.len());
        Ok(ranges)
    }

    /// Parses a comma-separated list of page numbers. Order and duplicates
    /// are kept exactly as written.
    pub fn parse_page_list(&self, page_string: &str) -> Result<Vec<usize>> {
        if page_string.trim().is_empty() {
            return Err(PdfSplitError::range("page list is empty"));
        }

        page_string
            .split(',')
            .map(str::trim)
            .map(|token| self.parse_page(token))
            .collect()
    }

    fn parse_page(&self, token: &str) -> Result<usize> {
        if !self.page_pattern.is_match(token) {
            return Err(PdfSplitError::range(format!(
                "invalid page number: '{}' (expected integer)",
                token
            )));
        }

        let page = parse_number(token, token)?;
        if page < 1 {
            return Err(PdfSplitError::range(format!(
                "invalid page number: {} (must be >= 1)",
                page
            )));
        }

        Ok(page)
    }
}

fn parse_number(digits: &str, token: &str) -> Result<usize> {
    digits
        .parse()
        .map_err(|_| PdfSplitError::range(format!("page number out of range in '{}'", token)))
}

/// Shorthand for [`RangeParser::parse_ranges`].
pub fn parse_ranges(range_string: &str) -> Result<Vec<PageRange>> {
    RangeParser::new()?.parse_ranges(range_string)
}

/// Shorthand for [`RangeParser::parse_page_list`].
pub fn parse_page_list(page_string: &str) -> Result<Vec<usize>> {
    RangeParser::new()?.parse_page_list(page_string)
}
