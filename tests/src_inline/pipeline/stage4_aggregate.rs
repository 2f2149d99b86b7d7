use super::*;

fn series(ratio: Vec<f64>, error: Vec<f64>) -> RatioSeries {
    let time_s = (0..ratio.len()).map(|i| i as f64 * 0.03).collect();
    RatioSeries {
        time_s,
        ratio,
        error,
    }
}

#[test]
fn test_combined_error_is_root_sum_square_over_m() {
    let a = series(vec![1.0, 2.0, 3.0], vec![1.0; 3]);
    let b = series(vec![3.0, 2.0, 1.0], vec![1.0; 3]);
    let agg = aggregate_group(&[a, b]).unwrap();

    assert_eq!(agg.n_replicates, 2);
    assert_eq!(agg.mean_ratio, vec![2.0, 2.0, 2.0]);
    for e in &agg.combined_error {
        assert!((e - 2f64.sqrt() / 2.0).abs() < 1e-12);
        // Not the standard error of the mean, sqrt(2)/sqrt(2).
        assert!((e - 1.0).abs() > 0.25);
    }
}

#[test]
fn test_unequal_errors() {
    let a = series(vec![1.0], vec![3.0]);
    let b = series(vec![1.0], vec![4.0]);
    let c = series(vec![4.0], vec![0.0]);
    let agg = aggregate_group(&[a, b, c]).unwrap();
    assert_eq!(agg.mean_ratio, vec![2.0]);
    assert!((agg.combined_error[0] - 5.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_single_replicate_passes_through() {
    let a = series(vec![1.5, 1.25], vec![0.5, 0.25]);
    let agg = aggregate_group(std::slice::from_ref(&a)).unwrap();
    assert_eq!(agg.mean_ratio, a.ratio);
    assert_eq!(agg.combined_error, a.error);
    assert_eq!(agg.time_s, a.time_s);
}

#[test]
fn test_empty_group_rejected() {
    assert_eq!(aggregate_group(&[]), Err(AggregateError::Empty));
}

#[test]
fn test_length_mismatch_rejected() {
    let a = series(vec![1.0, 1.0, 1.0], vec![0.0; 3]);
    let b = series(vec![1.0, 1.0], vec![0.0; 2]);
    assert_eq!(
        aggregate_group(&[a, b]),
        Err(AggregateError::LengthMismatch {
            index: 1,
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn test_non_finite_values_propagate() {
    let a = series(vec![1.0], vec![f64::NAN]);
    let b = series(vec![1.0], vec![1.0]);
    let agg = aggregate_group(&[a, b]).unwrap();
    assert_eq!(agg.mean_ratio, vec![1.0]);
    assert!(agg.combined_error[0].is_nan());
}
