use cgpa_engine::config::AppConfig;
use cgpa_engine::error::AppError;
use cgpa_engine::grading::{GradeEngine, GradingMode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_engine(config: &AppConfig) -> GradeEngine {
    GradeEngine::new(config.grading.policy())
}

pub(crate) fn parse_mode(raw: &str) -> Result<GradingMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "absolute" | "abs" => Ok(GradingMode::Absolute),
        "relative" | "rel" => Ok(GradingMode::Relative),
        other => Err(format!(
            "unknown grading mode '{other}' (expected absolute or relative)"
        )),
    }
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
