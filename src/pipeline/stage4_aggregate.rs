use thiserror::Error;

use crate::model::series::{AggregatedSeries, RatioSeries};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("no replicate series to aggregate")]
    Empty,
    #[error("replicate {index} has {found} time points, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Averages replicate contrast series point by point.
///
/// The combined error at `t` is `sqrt(sum_i error_i[t]^2) / M`, the root-sum-square
/// divided by the replicate count. Series of unequal length are rejected.
pub fn aggregate_group(series: &[RatioSeries]) -> Result<AggregatedSeries, AggregateError> {
    let Some(first) = series.first() else {
        return Err(AggregateError::Empty);
    };
    let len = first.len();
    for (index, s) in series.iter().enumerate() {
        if s.ratio.len() != len || s.error.len() != len {
            return Err(AggregateError::LengthMismatch {
                index,
                expected: len,
                found: if s.ratio.len() != len {
                    s.ratio.len()
                } else {
                    s.error.len()
                },
            });
        }
    }

    let m = series.len() as f64;
    let mut mean_ratio = Vec::with_capacity(len);
    let mut combined_error = Vec::with_capacity(len);
    for t in 0..len {
        let mut sum = 0f64;
        let mut sum_sq = 0f64;
        for s in series {
            sum += s.ratio[t];
            sum_sq += s.error[t] * s.error[t];
        }
        mean_ratio.push(sum / m);
        combined_error.push(sum_sq.sqrt() / m);
    }

    Ok(AggregatedSeries {
        time_s: first.time_s.clone(),
        mean_ratio,
        combined_error,
        n_replicates: series.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_aggregate.rs"]
mod tests;
