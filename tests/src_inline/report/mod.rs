use super::*;

#[test]
fn test_quantiles_nearest_rank() {
    let values = [5.0, 1.0, 4.0, 2.0, 3.0];
    assert_eq!(median(&values), Some(3.0));
    assert_eq!(p90(&values), Some(5.0));
    assert_eq!(quantile_indexed(&values, 0.0), Some(1.0));
}

#[test]
fn test_quantiles_skip_non_finite() {
    let values = [f64::NAN, 2.0, f64::INFINITY, 1.0];
    assert_eq!(median(&values), Some(2.0));
    assert_eq!(median(&[f64::NAN]), None);
    assert_eq!(p90(&[]), None);
}

#[test]
fn test_format_f64_6() {
    assert_eq!(format_f64_6(1.0), "1.000000");
    assert_eq!(format_f64_6(0.0070710678), "0.007071");
    assert_eq!(format_f64_6(f64::NAN), "NaN");
}

#[test]
fn test_summary_json_nulls_non_finite() {
    let data = SummaryData {
        tool: ToolMeta {
            name: "kira-contrastqc".to_string(),
            version: "0.1.0".to_string(),
            git_hash: Some("abc123".to_string()),
            simd_backend: "scalar".to_string(),
        },
        run: RunMeta {
            root: "/data".to_string(),
            layout: "crops".to_string(),
            bottom_population: "fixed reference 100 ± 40".to_string(),
            threshold: 0.0001,
            frame_limit: 170,
            frame_interval_ms: 30.0,
        },
        groups: vec![GroupSummary {
            id: "y7".to_string(),
            label: "LH4832".to_string(),
            status: "aggregated",
            skip_reason: None,
            replicates_used: vec!["Crop1".to_string()],
            files_used: vec!["/data/y7/Crop1.ome".to_string()],
            files_missing: Vec::new(),
            files_failed: Vec::new(),
            n_time_points: 2,
            mean_ratio_median: Some(1.5),
            mean_ratio_p90: Some(2.0),
            final_ratio: Some(2.0),
            final_error: Some(f64::NAN),
        }],
    };
    let json = json::render_summary_json(&data).unwrap();
    assert!(json.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tool"]["git_hash"], "abc123");
    assert_eq!(value["run"]["frame_limit"], 170);
    assert_eq!(value["groups"][0]["final_ratio"], 2.0);
    assert!(value["groups"][0]["final_error"].is_null());
    assert!(value["groups"][0]["skip_reason"].is_null());

    let text = text::render_report_text(&data);
    assert!(text.contains("Bottom population: fixed reference 100 ± 40"));
    assert!(text.contains("final contrast 2.000000 ± NaN"));
    assert!(text.contains("Groups aggregated: 1 of 1"));
}
