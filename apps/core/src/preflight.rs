//! Preflight Check System
//!
//! Verifies the classifier artifacts before the server starts and loads them once.
//! Any failure here is fatal: the process must not serve requests without a model.

use crate::brain::{
    EmotionClassifier, EmotionPipeline, LabelSet, LinearModel, ResponseTable, SequenceTokenizer,
};
use crate::config::AppConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
        }
    }

    fn fail(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Names of the failed checks, comma separated.
    pub fn failures(&self) -> String {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| format!("{} ({})", c.name, c.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn check_artifact(name: &str, path: &Path) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_file() => CheckResult::fail(name, &format!("{:?} is not a file", path)),
        Ok(meta) if meta.len() == 0 => CheckResult::fail(name, &format!("{:?} is empty", path)),
        Ok(meta) => CheckResult::pass(name, &format!("{:?} ({} bytes)", path, meta.len())),
        Err(e) => CheckResult::fail(name, &format!("{:?}: {}", path, e)),
    }
}

/// Checks every artifact the pipeline needs and logs the outcome.
pub fn run_preflight_checks(config: &AppConfig) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = vec![
        check_artifact("model", &config.model_path),
        check_artifact("tokenizer", &config.tokenizer_path),
        check_artifact("labels", &config.labels_path),
    ];
    if let Some(path) = &config.responses_path {
        checks.push(check_artifact("responses", path));
    }

    for check in &checks {
        if check.passed {
            info!("  [ok]   {}: {}", check.name, check.message);
        } else {
            error!("  [fail] {}: {}", check.name, check.message);
        }
    }

    PreflightReport {
        all_passed: checks.iter().all(|c| c.passed),
        checks,
    }
}

/// Loads every artifact and assembles the pipeline.
pub fn load_pipeline(config: &AppConfig) -> Result<EmotionPipeline, AppError> {
    let tokenizer = SequenceTokenizer::load(&config.tokenizer_path, config.max_len)?;
    let labels = LabelSet::load(&config.labels_path)?;
    let model = LinearModel::load(&config.model_path)?;
    let classifier = EmotionClassifier::new(tokenizer, Arc::new(model), labels)?;
    info!("Classifier ready with {} labels", classifier.labels().len());

    let responses = match &config.responses_path {
        Some(path) => ResponseTable::load(path)?,
        None => ResponseTable::builtin(),
    };

    Ok(EmotionPipeline::new(classifier, responses))
}

/// Runs the preflight checks, then loads the pipeline with bounded retries.
pub async fn initialize(config: &AppConfig) -> Result<EmotionPipeline, AppError> {
    let report = run_preflight_checks(config);
    if !report.all_passed {
        return Err(AppError::ModelUnavailable(format!(
            "preflight failed: {}",
            report.failures()
        )));
    }

    let mut attempt: u32 = 0;
    loop {
        match load_pipeline(config) {
            Ok(pipeline) => {
                info!("Emotion pipeline ready");
                return Ok(pipeline);
            }
            // Bad configuration will not fix itself
            Err(e @ AppError::Config(_)) => return Err(e),
            Err(e) if attempt < config.load_retries => {
                attempt += 1;
                warn!(
                    "Loading artifacts failed (attempt {}/{}): {}",
                    attempt,
                    config.load_retries + 1,
                    e
                );
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}
