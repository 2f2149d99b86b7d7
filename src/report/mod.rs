use serde::Serialize;
use thiserror::Error;

pub mod figure;
pub mod json;
pub mod text;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plot error: {0}")]
    Plot(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub git_hash: Option<String>,
    pub simd_backend: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub root: String,
    pub layout: String,
    pub bottom_population: String,
    pub threshold: f64,
    pub frame_limit: usize,
    pub frame_interval_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub id: String,
    pub label: String,
    pub status: &'static str,
    pub skip_reason: Option<String>,
    pub replicates_used: Vec<String>,
    pub files_used: Vec<String>,
    pub files_missing: Vec<String>,
    pub files_failed: Vec<String>,
    pub n_time_points: usize,
    pub mean_ratio_median: Option<f64>,
    pub mean_ratio_p90: Option<f64>,
    pub final_ratio: Option<f64>,
    pub final_error: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub groups: Vec<GroupSummary>,
}

impl SummaryData {
    pub fn n_aggregated(&self) -> usize {
        self.groups.iter().filter(|g| g.skip_reason.is_none()).count()
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

/// Nearest-rank quantile over the finite entries; `None` when there are none.
pub fn quantile_indexed(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    Some(sorted[idx])
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.5)
}

pub fn p90(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.90)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
