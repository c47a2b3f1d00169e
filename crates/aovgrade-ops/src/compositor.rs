//! Per-pixel AOV merge.
//!
//! The beauty pass is premultiplied by its own alpha; the AOV is
//! premultiplied by the beauty alpha as well. Because both are premultiplied
//! the AOV's contribution can be swapped additively:
//!
//! ```text
//! out.rgb = beauty.rgb - aov.rgb + lerp(aov, graded(aov), t).rgb
//! out.a   = beauty.a
//! ```
//!
//! where `t = clamp(mask_alpha * mix, 0, 1)`. With `viewaov` the blended AOV
//! is output on its own.
//!
//! Every call is a pure function of its arguments, so pixels can be
//! processed in any order and on any thread.

use crate::{GradeAovParams, GradeTransform};

/// Floor on the alpha used to unpremultiply.
pub const MIN_ALPHA: f32 = 1e-8;

/// Blend factor from mask alpha and mix, clamped to `[0, 1]`.
#[inline]
pub fn blend_factor(mask_alpha: f32, mix: f32) -> f32 {
    (mask_alpha * mix).clamp(0.0, 1.0)
}

/// Linear blend of all four channels.
///
/// At `t >= 1` the graded value is returned as-is, so a full-strength blend
/// carries no interpolation error.
#[inline]
pub fn mix_pixel(original: [f32; 4], graded: [f32; 4], t: f32) -> [f32; 4] {
    if t >= 1.0 {
        return graded;
    }
    [
        original[0] + (graded[0] - original[0]) * t,
        original[1] + (graded[1] - original[1]) * t,
        original[2] + (graded[2] - original[2]) * t,
        original[3] + (graded[3] - original[3]) * t,
    ]
}

/// Divide all channels by `max(alpha, MIN_ALPHA)`.
#[inline]
pub fn unpremultiply(px: [f32; 4], alpha: f32) -> [f32; 4] {
    let inv = 1.0 / alpha.max(MIN_ALPHA);
    px.map(|v| v * inv)
}

/// Multiply all channels by `alpha`.
#[inline]
pub fn premultiply(px: [f32; 4], alpha: f32) -> [f32; 4] {
    px.map(|v| v * alpha)
}

#[inline]
fn with_rgb(px: [f32; 4], rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], px[3]]
}

#[inline]
fn rgb(px: [f32; 4]) -> [f32; 3] {
    [px[0], px[1], px[2]]
}

/// Grades an AOV and merges it back into the beauty pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCompositor {
    /// Compiled grade.
    pub grade: GradeTransform,
    /// Global blend strength.
    pub mix: f32,
    /// Output the blended AOV alone.
    pub viewaov: bool,
    /// Grade in the unpremultiplied domain.
    pub unpremult: bool,
}

impl PixelCompositor {
    /// Build a compositor from parameters, compiling the grade.
    pub fn from_params(params: &GradeAovParams) -> Self {
        Self::with_grade(GradeTransform::from_params(params), params)
    }

    /// Build a compositor around an already compiled grade.
    pub fn with_grade(grade: GradeTransform, params: &GradeAovParams) -> Self {
        Self {
            grade,
            mix: params.mix,
            viewaov: params.viewaov,
            unpremult: params.unpremult,
        }
    }

    /// Grade `aov` and merge it into `beauty`.
    ///
    /// `mask_alpha` should already be resolved: 1.0 when no mask is used.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aovgrade_ops::{GradeAovParams, PixelCompositor};
    ///
    /// let comp = PixelCompositor::from_params(&GradeAovParams {
    ///     gain: [2.0; 4],
    ///     ..Default::default()
    /// });
    /// let out = comp.composite([0.5, 0.5, 0.5, 1.0], [0.2, 0.2, 0.2, 1.0], 1.0);
    /// assert!((out[0] - 0.7).abs() < 1e-6);
    /// assert_eq!(out[3], 1.0);
    /// ```
    #[inline]
    pub fn composite(&self, beauty: [f32; 4], aov: [f32; 4], mask_alpha: f32) -> [f32; 4] {
        if self.mix <= 0.0 || mask_alpha <= 0.0 {
            return self.recombine(beauty, aov, aov);
        }

        let (original, graded) = self.grade_aov(beauty[3], aov);
        let t = blend_factor(mask_alpha, self.mix);
        self.recombine(beauty, aov, mix_pixel(original, graded, t))
    }

    /// Premultiplied `(original, graded)` pair for an AOV sample.
    ///
    /// With `unpremult` the grade runs on `aov / beauty_alpha` and both values
    /// are premultiplied by `beauty_alpha` afterwards. Otherwise the AOV is
    /// graded as stored.
    #[inline]
    pub fn grade_aov(&self, beauty_alpha: f32, aov: [f32; 4]) -> ([f32; 4], [f32; 4]) {
        if self.unpremult {
            let straight = unpremultiply(aov, beauty_alpha);
            let graded = with_rgb(straight, self.grade.apply(rgb(straight)));
            (premultiply(straight, beauty_alpha), premultiply(graded, beauty_alpha))
        } else {
            (aov, with_rgb(aov, self.grade.apply(rgb(aov))))
        }
    }

    /// Replace the AOV's contribution in `beauty` with `blended`.
    ///
    /// Output alpha is always the beauty alpha.
    #[inline]
    pub fn recombine(&self, beauty: [f32; 4], aov: [f32; 4], blended: [f32; 4]) -> [f32; 4] {
        let mut out = if self.viewaov {
            blended
        } else {
            // beauty + (blended - aov): exact when blended == aov
            [
                beauty[0] + (blended[0] - aov[0]),
                beauty[1] + (blended[1] - aov[1]),
                beauty[2] + (blended[2] - aov[2]),
                beauty[3],
            ]
        };
        out[3] = beauty[3];
        out
    }
}

impl Default for PixelCompositor {
    fn default() -> Self {
        Self::from_params(&GradeAovParams::default())
    }
}
