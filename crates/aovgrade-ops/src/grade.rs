//! Grade transform: linear stage plus gamma curve, in either direction.
//!
//! Forward:
//! ```text
//! out = gamma_fwd(clamp_fwd(A * x + B))
//! ```
//! Reverse:
//! ```text
//! out = clamp_rev(gamma_rev(x) / A - B / A)
//! ```
//!
//! The clamp policy differs between directions. In the forward direction a
//! white clamp on its own floors at 0 and a black clamp on its own caps at 1
//! (the Grade node couples them that way); both together clamp to `[0, 1]`.
//! In reverse each clamp acts on its own side.

use crate::gamma_curve;
use crate::{GradeAovParams, LinearStage};

/// Direction of the grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeDirection {
    /// Apply the grade.
    #[default]
    Forward,
    /// Undo the grade.
    Reverse,
}

impl GradeDirection {
    /// Direction selected by a `reverse` flag.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Reverse } else { Self::Forward }
    }
}

/// Black/white clamp toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClampFlags {
    /// Black clamp.
    pub black: bool,
    /// White clamp.
    pub white: bool,
}

impl ClampFlags {
    /// Clamp toggles from parameters.
    pub fn from_params(params: &GradeAovParams) -> Self {
        Self { black: params.black_clamp, white: params.white_clamp }
    }

    /// Forward-direction clamp.
    #[inline]
    pub fn apply_forward(self, rgb: [f32; 3]) -> [f32; 3] {
        match (self.black, self.white) {
            (false, false) => rgb,
            (false, true) => rgb.map(|v| v.max(0.0)),
            (true, false) => rgb.map(|v| v.min(1.0)),
            (true, true) => rgb.map(|v| v.clamp(0.0, 1.0)),
        }
    }

    /// Reverse-direction clamp.
    #[inline]
    pub fn apply_reverse(self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = rgb;
        if self.black {
            out = out.map(|v| v.max(0.0));
        }
        if self.white {
            out = out.map(|v| v.min(1.0));
        }
        out
    }
}

/// Compiled grade: coefficients, clamp toggles and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeTransform {
    /// Linear stage coefficients.
    pub stage: LinearStage,
    /// Clamp toggles.
    pub clamp: ClampFlags,
    /// Grade direction.
    pub direction: GradeDirection,
}

impl GradeTransform {
    /// Create a transform from its parts.
    pub fn new(stage: LinearStage, clamp: ClampFlags, direction: GradeDirection) -> Self {
        Self { stage, clamp, direction }
    }

    /// Compile a transform from parameters.
    pub fn from_params(params: &GradeAovParams) -> Self {
        Self::new(
            LinearStage::compile(params),
            ClampFlags::from_params(params),
            GradeDirection::from_reverse(params.reverse),
        )
    }

    /// Grade an RGB triple in the configured direction.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aovgrade_ops::{GradeAovParams, GradeTransform};
    ///
    /// let grade = GradeTransform::from_params(&GradeAovParams {
    ///     gain: [2.0; 4],
    ///     ..Default::default()
    /// });
    /// assert_eq!(grade.apply([0.2, 0.3, 0.4]), [0.4, 0.6, 0.8]);
    /// ```
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self.direction {
            GradeDirection::Forward => self.apply_forward(rgb),
            GradeDirection::Reverse => self.apply_reverse(rgb),
        }
    }

    /// Forward grade.
    #[inline]
    pub fn apply_forward(&self, rgb: [f32; 3]) -> [f32; 3] {
        let lin = self.clamp.apply_forward(self.stage.apply(rgb));
        gamma_curve::forward(lin, self.stage.gamma, self.stage.inv_gamma)
    }

    /// Reverse grade.
    #[inline]
    pub fn apply_reverse(&self, rgb: [f32; 3]) -> [f32; 3] {
        let rev = gamma_curve::reverse(rgb, self.stage.gamma);
        self.clamp.apply_reverse(self.stage.apply_inverse(rev))
    }
}

impl Default for GradeTransform {
    fn default() -> Self {
        Self::from_params(&GradeAovParams::default())
    }
}
