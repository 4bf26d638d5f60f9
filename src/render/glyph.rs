//! Glyph rasterization seam. The mask renderer only needs coverage bitmaps
//! with metrics, so fonts sit behind a trait and tests can substitute a
//! synthetic face.

use crate::foundation::error::{SynthError, SynthResult};

/// One rasterized glyph: top-down coverage rows plus placement metrics.
/// `xmin`/`ymin` follow font conventions (y up, relative to the baseline
/// origin): the bitmap's bottom edge sits `ymin` above the baseline.
#[derive(Clone, Debug)]
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    pub xmin: i32,
    pub ymin: i32,
    pub advance: f32,
    /// `width * height` coverage bytes, row-major, top row first.
    pub coverage: Vec<u8>,
}

/// Opaque font-rasterizer capability. Returning `None` for a character is
/// fatal for the requesting job.
pub trait GlyphRasterizer: Send + Sync {
    /// Stable identifier for logging and job context.
    fn name(&self) -> &str;

    fn rasterize(&self, ch: char, px: f32) -> Option<RasterGlyph>;
}

/// Production implementation over a loaded font face.
pub struct FontFace {
    pub name: String,
    font: fontdue::Font,
}

impl FontFace {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> SynthResult<Self> {
        let name = name.into();
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| SynthError::render(format!("load font '{name}': {e}")))?;
        Ok(Self { name, font })
    }
}

impl GlyphRasterizer for FontFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn rasterize(&self, ch: char, px: f32) -> Option<RasterGlyph> {
        // Glyph index 0 is the missing-glyph notdef slot.
        if self.font.lookup_glyph_index(ch) == 0 {
            return None;
        }
        let (metrics, coverage) = self.font.rasterize(ch, px);
        Some(RasterGlyph {
            width: metrics.width as u32,
            height: metrics.height as u32,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            advance: metrics.advance_width,
            coverage,
        })
    }
}
