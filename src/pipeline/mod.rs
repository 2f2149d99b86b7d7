use std::path::{Path, PathBuf};

use crate::input::StackSource;
use crate::model::config::ExperimentConfig;
use crate::model::series::{AggregatedSeries, PopulationSeries, RatioSeries};

pub mod stage1_discover;
pub mod stage2_extract;
pub mod stage3_ratio;
pub mod stage4_aggregate;
pub mod stage5_report;

use stage1_discover::{GroupPlan, run_stage1};
use stage2_extract::{Stage2Params, run_stage2};
use stage3_ratio::run_stage3;
use stage4_aggregate::{AggregateError, aggregate_group};

#[derive(Debug, Clone)]
pub struct ReplicateResult {
    pub member: u32,
    pub label: String,
    pub path: PathBuf,
    pub populations: PopulationSeries,
    pub ratio: RatioSeries,
}

#[derive(Debug, Clone)]
pub struct FailedAcquisition {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct GroupResult {
    pub id: String,
    pub label: String,
    pub replicates: Vec<ReplicateResult>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<FailedAcquisition>,
    pub aggregate: Result<AggregatedSeries, AggregateError>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub groups: Vec<GroupResult>,
}

impl PipelineOutput {
    /// Groups whose aggregation succeeded, in configured order.
    pub fn aggregated(&self) -> impl Iterator<Item = (&GroupResult, &AggregatedSeries)> {
        self.groups
            .iter()
            .filter_map(|g| g.aggregate.as_ref().ok().map(|a| (g, a)))
    }
}

/// Runs every configured group to completion, one acquisition at a time.
pub fn run_pipeline(
    root: &Path,
    config: &ExperimentConfig,
    source: &dyn StackSource,
) -> PipelineOutput {
    let params = Stage2Params::from_config(config);
    let plans = run_stage1(root, config, source);
    let groups = plans
        .into_iter()
        .map(|plan| run_group(plan, &params, source))
        .collect();
    PipelineOutput { groups }
}

fn run_group(plan: GroupPlan, params: &Stage2Params, source: &dyn StackSource) -> GroupResult {
    let mut replicates = Vec::with_capacity(plan.acquisitions.len());
    let mut failed = Vec::new();

    for acq in plan.acquisitions {
        let stack = match source.load(&acq.path) {
            Ok(stack) => stack,
            Err(err) => {
                tracing::warn!("skipping {}: {}", acq.path.display(), err);
                failed.push(FailedAcquisition {
                    path: acq.path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let populations = run_stage2(&stack, params);
        let ratio = run_stage3(&populations, &params.bottom);
        tracing::debug!(
            "{} {}: {} of {} frame(s) analysed",
            plan.id,
            acq.label,
            ratio.len(),
            stack.len()
        );
        replicates.push(ReplicateResult {
            member: acq.member,
            label: acq.label,
            path: acq.path,
            populations,
            ratio,
        });
    }

    let ratios = replicates
        .iter()
        .map(|r| r.ratio.clone())
        .collect::<Vec<_>>();
    let aggregate = aggregate_group(&ratios);
    match &aggregate {
        Ok(agg) => tracing::info!(
            "group {} ({}): {} replicate(s) over {} time point(s)",
            plan.id,
            plan.label,
            agg.n_replicates,
            agg.len()
        ),
        Err(AggregateError::Empty) => {
            tracing::warn!("group {} ({}): no usable replicates", plan.id, plan.label)
        }
        Err(err) => tracing::error!(
            "group {} ({}): aggregation aborted: {}",
            plan.id,
            plan.label,
            err
        ),
    }

    GroupResult {
        id: plan.id,
        label: plan.label,
        replicates,
        missing: plan.missing,
        failed,
        aggregate,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
