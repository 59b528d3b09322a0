use clap::Parser;
use pdf_splitter::SplitMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-split")]
#[command(about = "Split a PDF into pages, page ranges, equal parts or selected pages")]
#[command(version)]
pub struct Cli {
    /// Input PDF file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for split files
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Split mode: pages, ranges, parts or specific
    #[arg(short, long, default_value = "pages", value_parser = parse_mode)]
    pub mode: SplitMode,

    /// Page ranges for ranges mode (e.g. "1-5,8,10-12")
    #[arg(short, long, value_name = "RANGES")]
    pub ranges: Option<String>,

    /// Number of parts for parts mode
    #[arg(short = 'n', long, value_name = "N")]
    pub num_parts: Option<usize>,

    /// Page numbers for specific mode (e.g. "1,5,10")
    #[arg(short, long, value_name = "PAGES")]
    pub pages: Option<String>,

    /// Prefix for output files (default: input filename without extension)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging and progress bars
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(value: &str) -> Result<SplitMode, String> {
    value.parse().map_err(|e: pdf_splitter::PdfSplitError| e.to_string())
}
