use crate::model::config::BottomPopulation;
use crate::model::series::{PopulationSeries, RatioSample, RatioSeries};

/// Contrast of one frame and its first-order uncertainty.
///
/// With a symmetric bottom population only the top-population term is propagated and
/// nothing is guarded: a zero bottom or top mean comes out non-finite. With a fixed
/// reference both terms are propagated, a zero bottom mean yields `0 ± 0` and a zero top
/// mean gives zero error.
pub fn propagate_ratio(
    top_mean: f64,
    top_std: f64,
    bottom_mean: f64,
    bottom_std: f64,
    bottom: &BottomPopulation,
) -> RatioSample {
    match bottom {
        BottomPopulation::Symmetric => {
            let value = top_mean / bottom_mean;
            let rel_top = top_std / top_mean;
            RatioSample {
                value,
                error: value * (rel_top * rel_top).sqrt(),
            }
        }
        BottomPopulation::FixedReference { .. } => {
            if bottom_mean == 0.0 {
                return RatioSample {
                    value: 0.0,
                    error: 0.0,
                };
            }
            let value = top_mean / bottom_mean;
            let error = if top_mean == 0.0 {
                0.0
            } else {
                let rel_top = top_std / top_mean;
                let rel_bottom = bottom_std / bottom_mean;
                value * (rel_top * rel_top + rel_bottom * rel_bottom).sqrt()
            };
            RatioSample { value, error }
        }
    }
}

pub fn run_stage3(series: &PopulationSeries, bottom: &BottomPopulation) -> RatioSeries {
    let n = series.len();
    let mut ratio = Vec::with_capacity(n);
    let mut error = Vec::with_capacity(n);
    for t in 0..n {
        let sample = propagate_ratio(
            series.top_mean[t],
            series.top_std[t],
            series.bottom_mean[t],
            series.bottom_std[t],
            bottom,
        );
        ratio.push(sample.value);
        error.push(sample.error);
    }
    RatioSeries {
        time_s: series.time_s.clone(),
        ratio,
        error,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_ratio.rs"]
mod tests;
