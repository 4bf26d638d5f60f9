#![allow(dead_code)]

use image::RgbImage;
use textsynth::render::glyph::{GlyphRasterizer, RasterGlyph};

/// Synthetic face for pipeline tests: every glyph is a solid square sitting
/// on the baseline, independent of the requested pixel size.
pub struct BlockFont {
    pub side: u32,
}

impl BlockFont {
    pub fn new(side: u32) -> Self {
        Self { side }
    }
}

impl GlyphRasterizer for BlockFont {
    fn name(&self) -> &str {
        "block"
    }

    fn rasterize(&self, _ch: char, _px: f32) -> Option<RasterGlyph> {
        Some(RasterGlyph {
            width: self.side,
            height: self.side,
            xmin: 0,
            ymin: 0,
            advance: self.side as f32 + 4.0,
            coverage: vec![255; (self.side * self.side) as usize],
        })
    }
}

pub fn uniform_patch(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, image::Rgb(rgb))
}

/// Unique scratch directory per test, under the system temp dir.
pub fn scratch_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "textsynth_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
