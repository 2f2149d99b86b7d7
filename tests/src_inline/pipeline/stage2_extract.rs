use super::*;

fn frame_from(width: usize, height: usize, values: Vec<f32>) -> Frame {
    Frame::new(width, height, values).unwrap()
}

fn ramp_frame() -> Frame {
    frame_from(10, 10, (1..=100).map(|v| v as f32).collect())
}

fn constant_stack(values: &[f32], side: usize) -> Stack {
    let frames = values
        .iter()
        .map(|&v| frame_from(side, side, vec![v; side * side]))
        .collect();
    Stack::new(frames).unwrap()
}

fn params(threshold: f64, frame_limit: usize, bottom: BottomPopulation) -> Stage2Params {
    Stage2Params {
        threshold,
        frame_limit,
        frame_interval_ms: 30.0,
        bottom,
    }
}

/// Population std of `n` consecutive integers.
fn consecutive_std(n: usize) -> f64 {
    (((n * n - 1) as f64) / 12.0).sqrt()
}

#[test]
fn test_population_size_floor_and_minimum() {
    assert_eq!(population_size(100, 0.1), 10);
    assert_eq!(population_size(16, 0.5), 8);
    assert_eq!(population_size(100, 0.0001), 1);
    assert_eq!(population_size(100, 0.9), 90);
    assert_eq!(population_size(3, 0.999_999), 2);
    assert_eq!(population_size(5, 1.0), 5);
}

#[test]
fn test_population_size_monotone_in_threshold() {
    let n = 1_234;
    let mut prev = 0;
    for step in 1..1000 {
        let q = step as f64 / 1000.0;
        let k = population_size(n, q);
        assert!(k >= 1);
        assert!(k >= prev, "q={q}: {k} < {prev}");
        prev = k;
    }
}

#[test]
fn test_top_population_of_ramp() {
    let mut scratch = Vec::new();
    let top = top_population(&ramp_frame(), 0.1, &mut scratch);
    assert_eq!(top.size, 10);
    assert!((top.mean - 95.5).abs() < 1e-12);
    assert!((top.std - consecutive_std(10)).abs() < 1e-12);
}

#[test]
fn test_bottom_population_of_ramp() {
    let mut scratch = Vec::new();
    let bottom = bottom_population(&ramp_frame(), 0.1, &mut scratch);
    assert_eq!(bottom.size, 90);
    assert!((bottom.mean - 45.5).abs() < 1e-12);
    assert!((bottom.std - consecutive_std(90)).abs() < 1e-9);
}

#[test]
fn test_population_stats_uses_biased_denominator() {
    let stats = population_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_eq!(stats.mean, 5.0);
    assert_eq!(stats.std, 2.0);
    assert_eq!(stats.size, 8);
}

#[test]
fn test_extraction_is_order_invariant() {
    let mut reversed = (1..=100).map(|v| v as f32).collect::<Vec<_>>();
    reversed.reverse();
    let a = extract_frame(
        &ramp_frame(),
        0.1,
        &BottomPopulation::Symmetric,
        &mut Vec::new(),
    );
    let b = extract_frame(
        &frame_from(10, 10, reversed),
        0.1,
        &BottomPopulation::Symmetric,
        &mut Vec::new(),
    );
    assert!((a.top.mean - b.top.mean).abs() < 1e-12);
    assert!((a.top.std - b.top.std).abs() < 1e-12);
    assert!((a.bottom.mean - b.bottom.mean).abs() < 1e-12);
    assert!((a.bottom.std - b.bottom.std).abs() < 1e-12);
}

#[test]
fn test_ties_at_selection_boundary() {
    let frame = frame_from(3, 2, vec![5.0, 1.0, 5.0, 5.0, 0.0, 2.0]);
    let top = top_population(&frame, 0.5, &mut Vec::new());
    assert_eq!(top.size, 3);
    assert_eq!(top.mean, 5.0);
    assert_eq!(top.std, 0.0);
}

#[test]
fn test_single_pixel_frame() {
    let frame = frame_from(1, 1, vec![42.0]);
    let stats = extract_frame(&frame, 0.0001, &BottomPopulation::Symmetric, &mut Vec::new());
    assert_eq!(stats.top.size, 1);
    assert_eq!(stats.bottom.size, 1);
    assert_eq!(stats.top.mean, 42.0);
    assert_eq!(stats.bottom.mean, 42.0);
}

#[test]
fn test_fixed_reference_ignores_dim_pixels() {
    let stats = extract_frame(
        &ramp_frame(),
        0.1,
        &BottomPopulation::reference_v1(),
        &mut Vec::new(),
    );
    assert!((stats.top.mean - 95.5).abs() < 1e-12);
    assert_eq!(stats.bottom.mean, 100.0);
    assert_eq!(stats.bottom.std, 40.0);
}

#[test]
fn test_sequence_truncated_to_frame_limit() {
    let stack = constant_stack(&[10.0, 20.0, 30.0, 40.0, 50.0], 4);
    let series = run_stage2(&stack, &params(0.5, 3, BottomPopulation::Symmetric));
    assert_eq!(series.len(), 3);
    assert_eq!(series.top_mean, vec![10.0, 20.0, 30.0]);
    assert_eq!(series.time_s, vec![0.0, 0.03, 0.06]);
}

#[test]
fn test_sequence_not_padded_when_stack_is_short() {
    let stack = constant_stack(&[10.0, 20.0], 4);
    let series = run_stage2(&stack, &params(0.5, 170, BottomPopulation::Symmetric));
    assert_eq!(series.len(), 2);
    assert_eq!(series.bottom_mean.len(), 2);
    assert_eq!(series.top_std.len(), 2);
    assert_eq!(series.bottom_std.len(), 2);
}

#[test]
fn test_constant_frames_give_equal_populations() {
    let stack = constant_stack(&[10.0, 20.0, 30.0, 40.0, 50.0], 4);
    let series = run_stage2(&stack, &params(0.5, 170, BottomPopulation::Symmetric));
    assert_eq!(series.len(), 5);
    assert_eq!(series.top_mean, series.bottom_mean);
    assert!(series.top_std.iter().all(|&s| s == 0.0));
    assert!(series.bottom_std.iter().all(|&s| s == 0.0));
}

#[test]
fn test_frame_time_in_seconds() {
    assert_eq!(frame_time_s(0, 30.0), 0.0);
    assert_eq!(frame_time_s(1, 30.0), 0.03);
    assert_eq!(frame_time_s(169, 30.0), 5.07);
}

#[test]
fn test_params_from_config() {
    let config = ExperimentConfig::crops_v1();
    let p = Stage2Params::from_config(&config);
    assert_eq!(p.threshold, config.threshold);
    assert_eq!(p.frame_limit, 170);
    assert_eq!(p.bottom, BottomPopulation::reference_v1());
}
