#[inline]
pub fn sum_f32_f64(values: &[f32]) -> f64 {
    backend::sum_f32_f64(values)
}

#[inline]
pub fn sum_sq_dev_f64(values: &[f32], mean: f64) -> f64 {
    backend::sum_sq_dev_f64(values, mean)
}

/// Arithmetic mean with an `f64` accumulator. Empty input yields 0.
#[inline]
pub fn mean_f64(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum_f32_f64(values) / values.len() as f64
}

#[inline]
pub fn backend_name() -> &'static str {
    backend::backend_name()
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod backend {
    pub use crate::simd::avx2::*;
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod backend {
    pub use crate::simd::neon::*;
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx2"),
    all(target_arch = "aarch64", target_feature = "neon"),
)))]
mod backend {
    pub use crate::simd::scalar::*;
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub mod avx2;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;
pub mod scalar;

#[cfg(test)]
#[path = "../../tests/src_inline/simd/mod.rs"]
mod tests;
