use crate::report::{GroupSummary, SummaryData, format_f64_6};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Bright-Pixel Contrast Report\n");
    out.push_str("============================\n\n");

    out.push_str("1. Run\n");
    out.push_str(&format!("Data root: {}\n", data.run.root));
    out.push_str(&format!("Layout: {}\n", data.run.layout));
    out.push_str(&format!(
        "Bottom population: {}\n",
        data.run.bottom_population
    ));
    out.push_str(&format!(
        "Threshold: {}\nFrame limit: {}\nFrame interval: {} ms\n\n",
        data.run.threshold, data.run.frame_limit, data.run.frame_interval_ms
    ));

    out.push_str("2. Groups\n");
    for group in &data.groups {
        out.push_str(&group_line(group));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("3. Caveats\n");
    let n_missing = data
        .groups
        .iter()
        .map(|g| g.files_missing.len())
        .sum::<usize>();
    let n_failed = data
        .groups
        .iter()
        .map(|g| g.files_failed.len())
        .sum::<usize>();
    out.push_str(&format!("Missing files: {n_missing}\n"));
    out.push_str(&format!("Unreadable files: {n_failed}\n"));
    out.push_str(&format!(
        "Groups aggregated: {} of {}\n",
        data.n_aggregated(),
        data.groups.len()
    ));

    out
}

fn group_line(group: &GroupSummary) -> String {
    if let Some(reason) = &group.skip_reason {
        return format!("{} ({}): skipped, {}", group.label, group.id, reason);
    }
    format!(
        "{} ({}): {} replicate(s), {} time point(s), median contrast {}, final contrast {} ± {}",
        group.label,
        group.id,
        group.replicates_used.len(),
        group.n_time_points,
        opt_f64(group.mean_ratio_median),
        opt_f64(group.final_ratio),
        opt_f64(group.final_error)
    )
}

fn opt_f64(v: Option<f64>) -> String {
    match v {
        Some(v) => format_f64_6(v),
        None => "n/a".to_string(),
    }
}
