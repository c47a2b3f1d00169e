//! CLI command implementations

pub mod defaults;
pub mod grade;

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::{self, RgbaImage};

/// Load image from path
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &RgbaImage) -> Result<()> {
    io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parse comma-separated channel values into an RGBA vector.
///
/// One value is applied to every channel. Three values set RGB and keep
/// `alpha` for the fourth component.
pub fn parse_rgba(s: &str, alpha: f32) -> Result<[f32; 4]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid number in '{}'", s))?;

    match parts.as_slice() {
        [v] => Ok([*v; 4]),
        [r, g, b] => Ok([*r, *g, *b, alpha]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => bail!("Expected 1, 3 or 4 values (R,G,B[,A]), got {}", parts.len()),
    }
}
