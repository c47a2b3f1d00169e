//! AOV grade command.
//!
//! Grades an AOV pass like a Grade node and merges it back into the beauty
//! pass, optionally through a mask.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::{debug, info, trace};

use aovgrade_ops::{Frame, GradeAovParams, PixelProcessor};

use super::{load_image, parse_rgba, save_image};
use crate::io::RgbaImage;

/// Arguments for the `grade` command.
#[derive(Args)]
pub struct GradeArgs {
    /// Beauty pass (premultiplied RGBA)
    #[arg(short, long)]
    pub beauty: PathBuf,

    /// AOV pass to grade (premultiplied RGBA)
    #[arg(short, long)]
    pub aov: PathBuf,

    /// Mask image; its alpha limits the grade. Enables masking.
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// YAML parameter file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Blackpoint (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub blackpoint: Option<String>,

    /// Whitepoint (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub whitepoint: Option<String>,

    /// Lift (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub lift: Option<String>,

    /// Gain (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub gain: Option<String>,

    /// Multiply (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub multiply: Option<String>,

    /// Offset (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub offset: Option<String>,

    /// Gamma (v | R,G,B | R,G,B,A)
    #[arg(long)]
    pub gamma: Option<String>,

    /// Enable the black clamp
    #[arg(long)]
    pub black_clamp: bool,

    /// Enable the white clamp
    #[arg(long)]
    pub white_clamp: bool,

    /// Output the graded AOV on its own
    #[arg(long)]
    pub view_aov: bool,

    /// Apply the inverse grade
    #[arg(long)]
    pub reverse: bool,

    /// Grade in the unpremultiplied domain
    #[arg(long)]
    pub unpremult: bool,

    /// Blend strength (0 = original AOV, 1 = fully graded)
    #[arg(long)]
    pub mix: Option<f32>,
}

impl GradeArgs {
    /// Build parameters: defaults, then the config file, then flags.
    pub fn params(&self) -> Result<GradeAovParams> {
        let mut params = match &self.config {
            Some(path) => GradeAovParams::from_yaml_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => GradeAovParams::default(),
        };

        let vectors = [
            (&self.blackpoint, &mut params.blackpoint),
            (&self.whitepoint, &mut params.whitepoint),
            (&self.lift, &mut params.lift),
            (&self.gain, &mut params.gain),
            (&self.multiply, &mut params.multiply),
            (&self.offset, &mut params.offset),
            (&self.gamma, &mut params.gamma),
        ];
        for (arg, value) in vectors {
            if let Some(s) = arg {
                *value = parse_rgba(s, value[3])?;
            }
        }

        params.black_clamp |= self.black_clamp;
        params.white_clamp |= self.white_clamp;
        params.viewaov |= self.view_aov;
        params.reverse |= self.reverse;
        params.unpremult |= self.unpremult;
        params.use_mask |= self.mask.is_some();
        if let Some(mix) = self.mix {
            params.mix = mix;
        }

        Ok(params)
    }
}

fn ensure_same_size(name: &str, image: &RgbaImage, beauty: &RgbaImage) -> Result<()> {
    if image.width != beauty.width || image.height != beauty.height {
        bail!(
            "{} dimensions don't match beauty: {}x{} vs {}x{}",
            name, image.width, image.height, beauty.width, beauty.height
        );
    }
    Ok(())
}

/// Run the grade command.
pub fn run(args: GradeArgs) -> Result<()> {
    let params = args.params()?;
    debug!(?params, "grade parameters");

    info!("Grading AOV: {}", args.aov.display());
    let beauty = load_image(&args.beauty)?;
    let aov = load_image(&args.aov)?;
    ensure_same_size("AOV", &aov, &beauty)?;

    let mask = match &args.mask {
        Some(path) => {
            let image = load_image(path)?;
            ensure_same_size("Mask", &image, &beauty)?;
            Some(image.alpha())
        }
        None => None,
    };
    if params.use_mask && mask.is_none() {
        bail!("Masking is enabled in the config but no --mask was given");
    }

    let processor = PixelProcessor::new(params);
    trace!(stage = ?processor.stage(), "compiled grade");

    let mut frame = Frame::new(beauty.width, beauty.height, &beauty.data, &aov.data);
    if let Some(mask) = &mask {
        frame = frame.with_mask(mask);
    }
    let data = processor.process(&frame)?;

    let output = RgbaImage { width: beauty.width, height: beauty.height, data };
    save_image(&args.output, &output)?;
    info!("Saved: {}", args.output.display());

    Ok(())
}
