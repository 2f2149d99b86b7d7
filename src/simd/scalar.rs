pub fn sum_f32_f64(values: &[f32]) -> f64 {
    let mut sum = 0f64;
    for &v in values {
        sum += v as f64;
    }
    sum
}

pub fn sum_sq_dev_f64(values: &[f32], mean: f64) -> f64 {
    let mut acc = 0f64;
    for &v in values {
        let d = v as f64 - mean;
        acc += d * d;
    }
    acc
}

pub fn backend_name() -> &'static str {
    "scalar"
}

#[cfg(test)]
#[path = "../../tests/src_inline/simd/scalar.rs"]
mod tests;
