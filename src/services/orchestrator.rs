use crate::error::PdfSplitError;
use crate::services::engine::{DocumentEngine, LopdfEngine};
use crate::services::splitter::create_splitter;
use crate::services::validator::{validate_output_dir, validate_pdf_path};
use crate::types::{SplitConfig, SplitRequest, SplitResult};
use serde_json::json;
use std::fmt;
use tracing::{debug, error, info};

/// Step of a split invocation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Configuration,
    InputValidation,
    OutputValidation,
    StrategySelection,
    Splitting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configuration => "configuration",
            Self::InputValidation => "input_validation",
            Self::OutputValidation => "output_validation",
            Self::StrategySelection => "strategy_selection",
            Self::Splitting => "splitting",
        })
    }
}

fn failure(phase: Phase, err: &PdfSplitError, message: String) -> SplitResult {
    let mut result = SplitResult::error(message);
    result
        .metadata
        .insert("error_kind".to_string(), json!(err.kind()));
    result
        .metadata
        .insert("phase".to_string(), json!(phase.to_string()));
    result
}

/// Validates `request` and splits the PDF it names with the `lopdf` engine.
///
/// Failures come back as a [`SplitResult`] with status `error`, a message,
/// and `error_kind` / `phase` metadata. Files written before a processing
/// failure are not removed.
pub fn split_pdf(request: SplitRequest) -> SplitResult {
    match SplitConfig::new(request) {
        Ok(config) => split_with_config(&config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            failure(Phase::Configuration, &e, e.to_string())
        }
    }
}

pub fn split_with_config(config: &SplitConfig) -> SplitResult {
    split_with_engine(&LopdfEngine, config)
}

pub fn split_with_engine<E: DocumentEngine>(engine: &E, config: &SplitConfig) -> SplitResult {
    info!(
        "Splitting '{}' in {} mode into {}",
        config.input_path().display(),
        config.mode(),
        config.output_dir().display()
    );

    if let Err(e) = validate_pdf_path(config.input_path()) {
        error!("Input validation failed: {}", e);
        return failure(Phase::InputValidation, &e, e.to_string());
    }

    if let Err(e) = validate_output_dir(config.output_dir(), true) {
        error!("Output directory validation failed: {}", e);
        return failure(Phase::OutputValidation, &e, e.to_string());
    }

    let splitter = match create_splitter(engine, config) {
        Ok(splitter) => splitter,
        Err(e) => {
            error!("Cannot select split strategy: {}", e);
            return failure(Phase::StrategySelection, &e, e.to_string());
        }
    };

    debug!("Input and output validated, running {} splitter", config.mode());
    match splitter.split() {
        Ok(result) => {
            info!("{}", result.message);
            result
        }
        Err(e) if e.is_validation() => {
            error!("Validation failed: {}", e);
            failure(Phase::Splitting, &e, e.to_string())
        }
        Err(e) => {
            error!("PDF processing failed: {}", e);
            failure(
                Phase::Splitting,
                &e,
                format!("Failed to split {}: {}", config.input_path().display(), e),
            )
        }
    }
}
