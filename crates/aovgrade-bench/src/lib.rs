//! Benchmark inputs for aovgrade.
//!
//! Run with: `cargo bench -p aovgrade-bench`

/// Deterministic RGBA ramp with `width * height` pixels.
///
/// `scale` sets the brightest channel value; alpha stays in `(0, 1]`.
pub fn ramp(width: usize, height: usize, scale: f32) -> Vec<f32> {
    let n = width * height;
    let mut data = Vec::with_capacity(n * 4);
    for i in 0..n {
        let t = i as f32 / n.max(1) as f32;
        data.extend_from_slice(&[t * scale, (1.0 - t) * scale, 0.5 * scale, 0.25 + 0.75 * t]);
    }
    data
}
