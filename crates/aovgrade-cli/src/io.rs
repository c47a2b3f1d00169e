//! OpenEXR input and output.
//!
//! Reads the first RGBA layer of a file as interleaved `f32`; a missing
//! alpha channel reads as 1.0. Writes RGBA `f32` with lossless compression.

use std::path::Path;

use anyhow::{Context, Result};

/// Interleaved RGBA `f32` image.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl RgbaImage {
    /// Alpha channel only, one value per pixel.
    pub fn alpha(&self) -> Vec<f32> {
        self.data.chunks_exact(4).map(|px| px[3]).collect()
    }
}

/// Read an EXR file.
pub fn read<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    use exr::prelude::*;

    let path = path.as_ref();

    let image = read_first_rgba_layer_from_file(
        path,
        |resolution, _| {
            let width = resolution.width();
            let size = width * resolution.height();
            (width, vec![0.0f32; size * 4])
        },
        |(width, buffer), position, (r, g, b, a): (f32, f32, f32, f32)| {
            let idx = (position.y() * *width + position.x()) * 4;
            if idx + 4 <= buffer.len() {
                buffer[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
            }
        },
    )
    .with_context(|| format!("Failed to read EXR: {}", path.display()))?;

    let width = image.layer_data.size.width();
    let height = image.layer_data.size.height();
    let (_, data) = image.layer_data.channel_data.pixels;

    Ok(self::RgbaImage { width, height, data })
}

/// Write an EXR file.
pub fn write<P: AsRef<Path>>(path: P, image: &RgbaImage) -> Result<()> {
    use exr::prelude::*;

    let path = path.as_ref();
    let width = image.width;
    let data = &image.data;

    let layer = Layer::new(
        (image.width, image.height),
        LayerAttributes::named("RGBA"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgba(|pos: Vec2<usize>| {
            let i = (pos.y() * width + pos.x()) * 4;
            (data[i], data[i + 1], data[i + 2], data[i + 3])
        }),
    );

    Image::from_layer(layer)
        .write()
        .to_file(path)
        .with_context(|| format!("Failed to write EXR: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.exr");

        let image = RgbaImage {
            width: 3,
            height: 2,
            data: (0..24).map(|i| i as f32 * 0.125 - 1.0).collect(),
        };
        write(&path, &image).unwrap();
        let back = read(&path).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn alpha_extraction() {
        let image = RgbaImage {
            width: 2,
            height: 1,
            data: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
        };
        assert_eq!(image.alpha(), vec![0.4, 0.8]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read(dir.path().join("nope.exr")).is_err());
    }
}
