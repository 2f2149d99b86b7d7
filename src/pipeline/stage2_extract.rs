use std::cmp::Ordering;

use crate::input::{Frame, Stack};
use crate::model::config::{BottomPopulation, ExperimentConfig};
use crate::model::series::{FrameStats, PopulationSeries, PopulationStats};
use crate::simd;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage2Params {
    pub threshold: f64,
    pub frame_limit: usize,
    pub frame_interval_ms: f64,
    pub bottom: BottomPopulation,
}

impl Stage2Params {
    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self {
            threshold: config.threshold,
            frame_limit: config.frame_limit,
            frame_interval_ms: config.frame_interval_ms,
            bottom: config.bottom,
        }
    }
}

/// `max(1, floor(n * fraction))`, capped at `n`.
pub fn population_size(n_pixels: usize, fraction: f64) -> usize {
    let k = (n_pixels as f64 * fraction).floor() as usize;
    k.max(1).min(n_pixels)
}

/// Mean and biased (denominator `k`) standard deviation.
pub fn population_stats(values: &[f32]) -> PopulationStats {
    if values.is_empty() {
        return PopulationStats::default();
    }
    let mean = simd::mean_f64(values);
    let var = simd::sum_sq_dev_f64(values, mean) / values.len() as f64;
    PopulationStats {
        mean,
        std: var.sqrt(),
        size: values.len(),
    }
}

fn cmp_f32(a: &f32, b: &f32) -> Ordering {
    a.total_cmp(b)
}

/// Statistics of the `max(1, floor(N*q))` brightest pixels.
pub fn top_population(frame: &Frame, threshold: f64, scratch: &mut Vec<f32>) -> PopulationStats {
    scratch.clear();
    scratch.extend_from_slice(frame.pixels());
    let n = frame.n_pixels();
    let k = population_size(n, threshold);
    if k < n {
        scratch.select_nth_unstable_by(n - k, cmp_f32);
    }
    population_stats(&scratch[n - k..])
}

/// Statistics of the `max(1, floor(N*(1-q)))` dimmest pixels.
pub fn bottom_population(
    frame: &Frame,
    threshold: f64,
    scratch: &mut Vec<f32>,
) -> PopulationStats {
    scratch.clear();
    scratch.extend_from_slice(frame.pixels());
    let n = frame.n_pixels();
    let k = population_size(n, 1.0 - threshold);
    if k < n {
        scratch.select_nth_unstable_by(k - 1, cmp_f32);
    }
    population_stats(&scratch[..k])
}

pub fn extract_frame(
    frame: &Frame,
    threshold: f64,
    bottom: &BottomPopulation,
    scratch: &mut Vec<f32>,
) -> FrameStats {
    let top = top_population(frame, threshold, scratch);
    let bottom = match *bottom {
        BottomPopulation::Symmetric => bottom_population(frame, threshold, scratch),
        BottomPopulation::FixedReference { mean, std } => PopulationStats {
            mean,
            std,
            size: 0,
        },
    };
    FrameStats { top, bottom }
}

pub fn frame_time_s(frame_index: usize, frame_interval_ms: f64) -> f64 {
    frame_index as f64 * frame_interval_ms / 1000.0
}

/// Per-frame statistics for the first `frame_limit` frames of a stack. Shorter stacks
/// give shorter series.
pub fn run_stage2(stack: &Stack, params: &Stage2Params) -> PopulationSeries {
    let n_frames = stack.len().min(params.frame_limit);
    let mut out = PopulationSeries::with_capacity(n_frames);
    let mut scratch = Vec::new();

    for (idx, frame) in stack.frames().iter().take(n_frames).enumerate() {
        let stats = extract_frame(frame, params.threshold, &params.bottom, &mut scratch);
        out.push(frame_time_s(idx, params.frame_interval_ms), stats);
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_extract.rs"]
mod tests;
