pub mod engine;
pub mod orchestrator;
pub mod parser;
pub mod partition;
pub mod splitter;
pub mod validator;

pub use engine::{DocumentEngine, LopdfEngine};
pub use orchestrator::{split_pdf, split_with_config, split_with_engine};
pub use parser::{parse_page_list, parse_ranges, RangeParser};
pub use partition::calculate_parts;
pub use splitter::{
    create_splitter, PagesSplitter, PartsSplitter, RangesSplitter, SpecificPagesSplitter,
    SplitTarget, Splitter,
};
pub use validator::{validate_output_dir, validate_pages, validate_pdf_path, validate_ranges};
