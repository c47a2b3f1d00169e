//! Linear stage of the grade.
//!
//! The grade's linear part collapses to a per-channel `A * x + B`:
//!
//! ```text
//! A = multiply * (gain - lift) / (whitepoint - blackpoint)
//! B = offset + lift - A * blackpoint
//! ```
//!
//! The coefficients depend only on the parameters, so they are compiled
//! once per parameter snapshot and shared by every pixel.

use tracing::{debug, warn};

use crate::GradeAovParams;

/// Smallest magnitude allowed for `whitepoint - blackpoint`.
pub const MIN_RANGE: f32 = 1e-6;

const CHANNELS: [&str; 3] = ["red", "green", "blue"];

/// Precomputed grade coefficients (RGB only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStage {
    /// Slope.
    pub a: [f32; 3],
    /// Offset.
    pub b: [f32; 3],
    /// Gamma exponent.
    pub gamma: [f32; 3],
    /// `1 / gamma`. Infinite for a zero gamma, which the gamma curve never reads.
    pub inv_gamma: [f32; 3],
}

impl LinearStage {
    /// Compile the coefficients for a parameter snapshot.
    ///
    /// A zero-width input range (`whitepoint == blackpoint`) is replaced by
    /// [`MIN_RANGE`] with the range's sign, so the slope saturates to a large
    /// finite value instead of an infinity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aovgrade_ops::{GradeAovParams, LinearStage};
    ///
    /// let params = GradeAovParams { gain: [2.0; 4], ..Default::default() };
    /// let stage = LinearStage::compile(&params);
    /// assert_eq!(stage.a, [2.0; 3]);
    /// assert_eq!(stage.b, [0.0; 3]);
    /// ```
    pub fn compile(params: &GradeAovParams) -> Self {
        let mut a = [0.0; 3];
        let mut b = [0.0; 3];
        let mut gamma = [0.0; 3];
        let mut inv_gamma = [0.0; 3];

        for i in 0..3 {
            let range = params.whitepoint[i] - params.blackpoint[i];
            let range = if range.abs() < MIN_RANGE {
                warn!(
                    channel = CHANNELS[i],
                    blackpoint = params.blackpoint[i],
                    whitepoint = params.whitepoint[i],
                    "degenerate grade range, clamping denominator"
                );
                MIN_RANGE.copysign(range)
            } else {
                range
            };

            a[i] = params.multiply[i] * (params.gain[i] - params.lift[i]) / range;
            b[i] = params.offset[i] + params.lift[i] - a[i] * params.blackpoint[i];
            gamma[i] = params.gamma[i];
            inv_gamma[i] = 1.0 / params.gamma[i];
        }

        debug!(?a, ?b, ?gamma, "compiled linear stage");
        Self { a, b, gamma, inv_gamma }
    }

    /// Forward linear stage: `A * x + B`.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        [
            self.a[0] * rgb[0] + self.b[0],
            self.a[1] * rgb[1] + self.b[1],
            self.a[2] * rgb[2] + self.b[2],
        ]
    }

    /// Guarded reciprocal of the slope.
    ///
    /// Channels with `|A| <= 1e-6` use 1.0, so the inverse saturates rather
    /// than blowing up.
    #[inline]
    pub fn inv_slope(&self) -> [f32; 3] {
        self.a.map(|a| if a.abs() > 1e-6 { 1.0 / a } else { 1.0 })
    }

    /// Inverse linear stage: `x / A - B / A`, with the guarded reciprocal.
    #[inline]
    pub fn apply_inverse(&self, rgb: [f32; 3]) -> [f32; 3] {
        let inv = self.inv_slope();
        [
            rgb[0] * inv[0] - self.b[0] * inv[0],
            rgb[1] * inv[1] - self.b[1] * inv[1],
            rgb[2] * inv[2] - self.b[2] * inv[2],
        ]
    }
}

impl Default for LinearStage {
    fn default() -> Self {
        Self::compile(&GradeAovParams::default())
    }
}
