use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::config::ExperimentConfig;
use crate::pipeline::stage4_aggregate::AggregateError;
use crate::pipeline::{GroupResult, PipelineOutput};
use crate::report::figure::{PanelView, SeriesView, render_group_panels, render_overlay};
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{
    GroupSummary, ReportError, RunMeta, SummaryData, ToolMeta, format_f64_6, median, p90,
};

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub output: &'a PipelineOutput,
    pub config: &'a ExperimentConfig,
    pub root: &'a Path,
    pub tool: ToolMeta,
    pub render_figures: bool,
}

pub fn write_reports(input: &Stage5Input<'_>, out_dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir)?;

    write_contrast_tsv(input.output, &out_dir.join("contrast.tsv"))?;
    write_groups_tsv(input.output, &out_dir.join("groups.tsv"))?;

    let summary = build_summary(input);
    write_text(&out_dir.join("summary.json"), &render_summary_json(&summary)?)?;
    write_text(&out_dir.join("report.txt"), &render_report_text(&summary))?;

    if input.render_figures {
        // A missing font or backend failure must not cost the tabular outputs.
        if let Err(err) = write_figures(input, out_dir) {
            tracing::warn!("figures not rendered: {}", err);
        }
    }

    tracing::info!("reports written to {}", out_dir.display());
    Ok(())
}

pub fn build_summary(input: &Stage5Input<'_>) -> SummaryData {
    let config = input.config;
    SummaryData {
        tool: input.tool.clone(),
        run: RunMeta {
            root: input.root.display().to_string(),
            layout: config.layout.name().to_string(),
            bottom_population: config.bottom.describe(),
            threshold: config.threshold,
            frame_limit: config.frame_limit,
            frame_interval_ms: config.frame_interval_ms,
        },
        groups: input.output.groups.iter().map(group_summary).collect(),
    }
}

fn group_summary(group: &GroupResult) -> GroupSummary {
    let replicates_used = group.replicates.iter().map(|r| r.label.clone()).collect();
    let files_used = group
        .replicates
        .iter()
        .map(|r| r.path.display().to_string())
        .collect();
    let files_missing = group
        .missing
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let files_failed = group
        .failed
        .iter()
        .map(|f| format!("{}: {}", f.path.display(), f.reason))
        .collect();

    match &group.aggregate {
        Ok(agg) => GroupSummary {
            id: group.id.clone(),
            label: group.label.clone(),
            status: "aggregated",
            skip_reason: None,
            replicates_used,
            files_used,
            files_missing,
            files_failed,
            n_time_points: agg.len(),
            mean_ratio_median: median(&agg.mean_ratio),
            mean_ratio_p90: p90(&agg.mean_ratio),
            final_ratio: agg.mean_ratio.last().copied(),
            final_error: agg.combined_error.last().copied(),
        },
        Err(err) => GroupSummary {
            id: group.id.clone(),
            label: group.label.clone(),
            status: "skipped",
            skip_reason: Some(skip_reason(err)),
            replicates_used,
            files_used,
            files_missing,
            files_failed,
            n_time_points: 0,
            mean_ratio_median: None,
            mean_ratio_p90: None,
            final_ratio: None,
            final_error: None,
        },
    }
}

fn skip_reason(err: &AggregateError) -> String {
    match err {
        AggregateError::Empty => "no usable replicates".to_string(),
        other => other.to_string(),
    }
}

fn write_contrast_tsv(output: &PipelineOutput, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "group",
        "label",
        "replicate",
        "frame",
        "time_s",
        "top_mean",
        "top_std",
        "bottom_mean",
        "bottom_std",
        "ratio",
        "ratio_error",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    for group in &output.groups {
        for rep in &group.replicates {
            let pop = &rep.populations;
            for t in 0..rep.ratio.len() {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    group.id,
                    group.label,
                    rep.member,
                    t,
                    format_f64_6(rep.ratio.time_s[t]),
                    format_f64_6(pop.top_mean[t]),
                    format_f64_6(pop.top_std[t]),
                    format_f64_6(pop.bottom_mean[t]),
                    format_f64_6(pop.bottom_std[t]),
                    format_f64_6(rep.ratio.ratio[t]),
                    format_f64_6(rep.ratio.error[t]),
                )?;
            }
        }
    }
    w.flush()
}

fn write_groups_tsv(output: &PipelineOutput, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "group\tlabel\tn_replicates\tframe\ttime_s\tmean_ratio\tcombined_error"
    )?;
    for (group, agg) in output.aggregated() {
        for t in 0..agg.len() {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                group.id,
                group.label,
                agg.n_replicates,
                t,
                format_f64_6(agg.time_s[t]),
                format_f64_6(agg.mean_ratio[t]),
                format_f64_6(agg.combined_error[t]),
            )?;
        }
    }
    w.flush()
}

fn write_figures(input: &Stage5Input<'_>, out_dir: &Path) -> Result<(), ReportError> {
    let style = &input.config.figures;

    let panels = input
        .output
        .groups
        .iter()
        .map(|group| PanelView {
            title: group.label.clone(),
            series: group
                .replicates
                .iter()
                .enumerate()
                .map(|(idx, rep)| SeriesView {
                    label: rep.label.clone(),
                    color_idx: idx,
                    time_s: &rep.ratio.time_s,
                    values: &rep.ratio.ratio,
                    errors: &rep.ratio.error,
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    let group_path = out_dir.join(&style.group_figure);
    render_group_panels(&group_path, &style.group_title, &panels, style.marker)?;
    tracing::info!("wrote {}", group_path.display());

    // Colours follow the configured group order, so a skipped group leaves its colour unused.
    let averages = input
        .output
        .groups
        .iter()
        .enumerate()
        .filter_map(|(idx, group)| group.aggregate.as_ref().ok().map(|agg| (idx, group, agg)))
        .map(|(idx, group, agg)| SeriesView {
            label: group.label.clone(),
            color_idx: idx,
            time_s: &agg.time_s,
            values: &agg.mean_ratio,
            errors: &agg.combined_error,
        })
        .collect::<Vec<_>>();
    let average_path = out_dir.join(&style.average_figure);
    render_overlay(&average_path, &style.average_title, &averages, style.marker)?;
    tracing::info!("wrote {}", average_path.display());

    Ok(())
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
