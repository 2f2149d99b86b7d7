#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

pub fn sum_f32_f64(values: &[f32]) -> f64 {
    let mut sum = 0f64;
    let mut i = 0usize;
    let n = values.len();
    unsafe {
        while i + 4 <= n {
            let v = vld1q_f32(values.as_ptr().add(i));
            let mut lanes = [0f32; 4];
            vst1q_f32(lanes.as_mut_ptr(), v);
            for lane in &lanes {
                sum += *lane as f64;
            }
            i += 4;
        }
    }
    while i < n {
        sum += values[i] as f64;
        i += 1;
    }
    sum
}

pub fn sum_sq_dev_f64(values: &[f32], mean: f64) -> f64 {
    let mut acc = 0f64;
    let mut i = 0usize;
    let n = values.len();
    unsafe {
        while i + 4 <= n {
            let v = vld1q_f32(values.as_ptr().add(i));
            let mut lanes = [0f32; 4];
            vst1q_f32(lanes.as_mut_ptr(), v);
            for lane in &lanes {
                let d = *lane as f64 - mean;
                acc += d * d;
            }
            i += 4;
        }
    }
    while i < n {
        let d = values[i] as f64 - mean;
        acc += d * d;
        i += 1;
    }
    acc
}

pub fn backend_name() -> &'static str {
    "neon"
}

#[cfg(test)]
#[path = "../../tests/src_inline/simd/neon.rs"]
mod tests;
