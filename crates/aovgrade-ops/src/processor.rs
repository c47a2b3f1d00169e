//! Pixel processor: applies a parameter snapshot to whole frames.
//!
//! The processor compiles the grade once, when it is created or
//! reconfigured. Processing borrows it immutably and reconfiguring needs a
//! mutable borrow, so coefficients can never change while a frame is in
//! flight.
//!
//! Frames are interleaved RGBA `f32` buffers. The mask may be RGBA or a
//! single alpha channel.
//!
//! # Example
//!
//! ```rust
//! use aovgrade_ops::{Frame, GradeAovParams, PixelProcessor};
//!
//! let params = GradeAovParams { gain: [2.0; 4], ..Default::default() };
//! let processor = PixelProcessor::new(params);
//!
//! let beauty = vec![0.5, 0.5, 0.5, 1.0, 0.25, 0.25, 0.25, 1.0];
//! let aov = vec![0.2, 0.2, 0.2, 1.0, 0.0, 0.0, 0.0, 1.0];
//! let out = processor.process(&Frame::new(2, 1, &beauty, &aov)).unwrap();
//! assert!((out[0] - 0.7).abs() < 1e-6);
//! assert_eq!(out[4], 0.25);
//! ```

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{GradeAovParams, LinearStage, OpsError, OpsResult, PixelCompositor};

/// Channels per beauty/AOV/output pixel.
pub const CHANNELS: usize = 4;

/// Input buffers for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Beauty pass, RGBA, premultiplied.
    pub beauty: &'a [f32],
    /// AOV pass, RGBA, premultiplied by the beauty alpha.
    pub aov: &'a [f32],
    /// Optional mask, RGBA or single channel.
    pub mask: Option<&'a [f32]>,
}

impl<'a> Frame<'a> {
    /// Frame without a mask.
    pub fn new(width: usize, height: usize, beauty: &'a [f32], aov: &'a [f32]) -> Self {
        Self { width, height, beauty, aov, mask: None }
    }

    /// Attach a mask buffer.
    pub fn with_mask(mut self, mask: &'a [f32]) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Number of pixels, checked for zero size and overflow.
    pub fn pixel_count(&self) -> OpsResult<usize> {
        if self.width == 0 || self.height == 0 {
            return Err(OpsError::InvalidDimensions(
                "width and height must be > 0".into(),
            ));
        }
        self.width
            .checked_mul(self.height)
            .filter(|n| n.checked_mul(CHANNELS).is_some())
            .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))
    }

    fn check_rgba(&self, name: &str, len: usize, pixels: usize) -> OpsResult<()> {
        let expected = pixels * CHANNELS;
        if len != expected {
            return Err(OpsError::SizeMismatch(format!(
                "{}: expected {} values for {}x{} RGBA, got {}",
                name, expected, self.width, self.height, len
            )));
        }
        Ok(())
    }

    /// Channel count of the mask buffer (1 or 4).
    fn mask_channels(&self, mask: &[f32], pixels: usize) -> OpsResult<usize> {
        if mask.len() == pixels * CHANNELS {
            Ok(CHANNELS)
        } else if mask.len() == pixels {
            Ok(1)
        } else {
            Err(OpsError::SizeMismatch(format!(
                "mask: expected {} (alpha) or {} (RGBA) values for {}x{}, got {}",
                pixels,
                pixels * CHANNELS,
                self.width,
                self.height,
                mask.len()
            )))
        }
    }
}

/// Resolved mask: buffer plus its channel count.
#[derive(Clone, Copy)]
struct MaskView<'a> {
    data: &'a [f32],
    channels: usize,
}

impl MaskView<'_> {
    #[inline]
    fn alpha(&self, index: usize) -> f32 {
        self.data[index * self.channels + self.channels - 1]
    }
}

#[inline]
fn read_rgba(buf: &[f32], index: usize) -> [f32; 4] {
    let i = index * CHANNELS;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

/// Applies an AOV grade to pixels and frames.
#[derive(Debug, Clone)]
pub struct PixelProcessor {
    params: GradeAovParams,
    compositor: PixelCompositor,
}

impl PixelProcessor {
    /// Create a processor, compiling the grade for `params`.
    pub fn new(params: GradeAovParams) -> Self {
        let compositor = PixelCompositor::from_params(&params);
        Self { params, compositor }
    }

    /// Replace the parameter snapshot and recompile the grade.
    pub fn set_params(&mut self, params: GradeAovParams) {
        self.compositor = PixelCompositor::from_params(&params);
        self.params = params;
    }

    /// Current parameters.
    pub fn params(&self) -> &GradeAovParams {
        &self.params
    }

    /// Compiled linear stage.
    pub fn stage(&self) -> &LinearStage {
        &self.compositor.grade.stage
    }

    /// Compiled compositor.
    pub fn compositor(&self) -> &PixelCompositor {
        &self.compositor
    }

    /// Mask alpha to use for a pixel: the sample when masking is enabled
    /// and present, otherwise 1.0.
    #[inline]
    pub fn mask_alpha(&self, mask_alpha: Option<f32>) -> f32 {
        if self.params.use_mask {
            mask_alpha.unwrap_or(1.0)
        } else {
            1.0
        }
    }

    /// Process a single pixel.
    ///
    /// Only the mask's alpha is read, and only when `use_mask` is set.
    #[inline]
    pub fn process_pixel(&self, beauty: [f32; 4], aov: [f32; 4], mask: Option<[f32; 4]>) -> [f32; 4] {
        let mask_alpha = self.mask_alpha(mask.map(|m| m[3]));
        self.compositor.composite(beauty, aov, mask_alpha)
    }

    /// Process a frame into a new RGBA buffer.
    pub fn process(&self, frame: &Frame<'_>) -> OpsResult<Vec<f32>> {
        let pixels = frame.pixel_count()?;
        let mut dst = vec![0.0f32; pixels * CHANNELS];
        self.process_into(frame, &mut dst)?;
        Ok(dst)
    }

    /// Process a frame into `dst`, which must hold `width * height` RGBA pixels.
    pub fn process_into(&self, frame: &Frame<'_>, dst: &mut [f32]) -> OpsResult<()> {
        let pixels = frame.pixel_count()?;
        frame.check_rgba("beauty", frame.beauty.len(), pixels)?;
        frame.check_rgba("aov", frame.aov.len(), pixels)?;
        frame.check_rgba("output", dst.len(), pixels)?;

        let mask = if self.params.use_mask {
            let data = frame.mask.ok_or(OpsError::MissingMask)?;
            let channels = frame.mask_channels(data, pixels)?;
            Some(MaskView { data, channels })
        } else {
            None
        };

        debug!(
            width = frame.width,
            height = frame.height,
            reverse = self.params.reverse,
            unpremult = self.params.unpremult,
            viewaov = self.params.viewaov,
            masked = mask.is_some(),
            "grading AOV frame"
        );
        let start = Instant::now();

        let row_len = frame.width * CHANNELS;

        #[cfg(feature = "parallel")]
        dst.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| self.process_row(frame, mask, y, row));

        #[cfg(not(feature = "parallel"))]
        dst.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| self.process_row(frame, mask, y, row));

        trace!(elapsed_us = start.elapsed().as_micros() as u64, "frame done");
        Ok(())
    }

    fn process_row(&self, frame: &Frame<'_>, mask: Option<MaskView<'_>>, y: usize, row: &mut [f32]) {
        let base = y * frame.width;
        for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let index = base + x;
            let beauty = read_rgba(frame.beauty, index);
            let aov = read_rgba(frame.aov, index);
            let mask_alpha = mask.map_or(1.0, |m| m.alpha(index));
            out.copy_from_slice(&self.compositor.composite(beauty, aov, mask_alpha));
        }
    }
}

impl Default for PixelProcessor {
    fn default() -> Self {
        Self::new(GradeAovParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn gain2() -> GradeAovParams {
        GradeAovParams { gain: [2.0; 4], ..Default::default() }
    }

    #[test]
    fn mask_ignored_unless_enabled() {
        let p = PixelProcessor::new(gain2());
        let out = p.process_pixel([0.5; 4], [0.2, 0.2, 0.2, 1.0], Some([0.0; 4]));
        assert!((out[0] - 0.7).abs() < EPSILON);

        let p = PixelProcessor::new(GradeAovParams { use_mask: true, ..gain2() });
        let out = p.process_pixel([0.5; 4], [0.2, 0.2, 0.2, 1.0], Some([1.0, 1.0, 1.0, 0.0]));
        assert_eq!(out[0], 0.5);
        // missing sample reads as full strength
        let out = p.process_pixel([0.5; 4], [0.2, 0.2, 0.2, 1.0], None);
        assert!((out[0] - 0.7).abs() < EPSILON);
    }

    #[test]
    fn set_params_recompiles() {
        let mut p = PixelProcessor::default();
        assert_eq!(p.stage().a, [1.0; 3]);
        p.set_params(gain2());
        assert_eq!(p.stage().a, [2.0; 3]);
        assert_eq!(p.params().gain, [2.0; 4]);
    }

    #[test]
    fn frame_matches_pixel_path() {
        let p = PixelProcessor::new(GradeAovParams {
            gamma: [2.2; 4],
            lift: [0.05; 4],
            mix: 0.8,
            ..Default::default()
        });
        let (w, h) = (7, 5);
        let beauty: Vec<f32> = (0..w * h * 4).map(|i| (i % 13) as f32 / 13.0).collect();
        let aov: Vec<f32> = (0..w * h * 4).map(|i| (i % 7) as f32 / 20.0).collect();

        let out = p.process(&Frame::new(w, h, &beauty, &aov)).unwrap();
        for i in 0..w * h {
            let expected = p.process_pixel(read_rgba(&beauty, i), read_rgba(&aov, i), None);
            assert_eq!(read_rgba(&out, i), expected, "pixel {}", i);
        }
    }

    #[test]
    fn single_channel_mask() {
        let p = PixelProcessor::new(GradeAovParams { use_mask: true, ..gain2() });
        let beauty = [0.5, 0.5, 0.5, 1.0, 0.5, 0.5, 0.5, 1.0];
        let aov = [0.2, 0.2, 0.2, 1.0, 0.2, 0.2, 0.2, 1.0];
        let mask = [0.0, 1.0];
        let out = p.process(&Frame::new(2, 1, &beauty, &aov).with_mask(&mask)).unwrap();
        assert_eq!(out[0], 0.5);
        assert!((out[4] - 0.7).abs() < EPSILON);
    }

    #[test]
    fn rgba_mask_reads_alpha() {
        let p = PixelProcessor::new(GradeAovParams { use_mask: true, ..gain2() });
        let beauty = [0.5, 0.5, 0.5, 1.0];
        let aov = [0.2, 0.2, 0.2, 1.0];
        let mask = [1.0, 1.0, 1.0, 0.0];
        let out = p.process(&Frame::new(1, 1, &beauty, &aov).with_mask(&mask)).unwrap();
        assert_eq!(out[0], 0.5);
    }

    #[test]
    fn missing_mask_is_error() {
        let p = PixelProcessor::new(GradeAovParams { use_mask: true, ..Default::default() });
        let px = [0.0; 4];
        let err = p.process(&Frame::new(1, 1, &px, &px)).unwrap_err();
        assert!(matches!(err, OpsError::MissingMask));
    }

    #[test]
    fn unused_mask_not_validated() {
        let p = PixelProcessor::default();
        let px = [0.1, 0.2, 0.3, 1.0];
        let bad_mask = [0.0; 3];
        let out = p.process(&Frame::new(1, 1, &px, &px).with_mask(&bad_mask)).unwrap();
        assert_eq!(out, px.to_vec());
    }

    #[test]
    fn size_checks() {
        let p = PixelProcessor::default();
        let px = [0.0; 8];

        let err = p.process(&Frame::new(0, 1, &px, &px)).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));

        let err = p.process(&Frame::new(1, 1, &px, &px[..4])).unwrap_err();
        assert!(matches!(err, OpsError::SizeMismatch(_)));

        let err = p.process(&Frame::new(usize::MAX, 2, &px, &px)).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));

        let mut small = [0.0; 4];
        let err = p.process_into(&Frame::new(2, 1, &px, &px), &mut small).unwrap_err();
        assert!(matches!(err, OpsError::SizeMismatch(_)));

        let masked = PixelProcessor::new(GradeAovParams { use_mask: true, ..Default::default() });
        let err = masked
            .process(&Frame::new(2, 1, &px, &px).with_mask(&[0.0; 3]))
            .unwrap_err();
        assert!(matches!(err, OpsError::SizeMismatch(_)));
    }
}
