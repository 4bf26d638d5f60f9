//! Layered compositing: tinted glyph mask, optional border ring and soft
//! shadow, alpha-blended over the background patch. Effect magnitudes scale
//! with the smallest glyph height so they stay proportionate for small text.

use image::RgbImage;

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::{Mask, Rgb};
use crate::render::blur::blur_mask;
use crate::style::ColorizationParams;

/// Final rasters for one job: the word over the natural background, and the
/// same word over a solid canvas of the resolved background color.
#[derive(Debug)]
pub struct CompositeOutput {
    pub styled: RgbImage,
    pub plain: RgbImage,
}

/// Composites `mask` (placed at the patch origin) over `patch`. The patch
/// must be at least as large as the mask in both axes.
pub fn composite(
    mask: &Mask,
    patch: &RgbImage,
    fg: Rgb,
    bg: Rgb,
    colorization: &ColorizationParams,
    min_glyph_height: u32,
) -> SynthResult<CompositeOutput> {
    let (pw, ph) = patch.dimensions();
    if pw < mask.width || ph < mask.height {
        return Err(SynthError::validation(format!(
            "background patch {pw}x{ph} is smaller than glyph mask {}x{}",
            mask.width, mask.height
        )));
    }

    let layers = EffectLayers::build(mask, colorization, min_glyph_height)?;

    let mut styled = patch.clone();
    layers.paint(&mut styled, mask, fg, colorization);

    let mut plain = RgbImage::from_pixel(pw, ph, image::Rgb(bg));
    layers.paint(&mut plain, mask, fg, colorization);

    Ok(CompositeOutput { styled, plain })
}

/// Shadow and border alphas are derived from the mask once and reused for
/// both output rasters.
struct EffectLayers {
    shadow: Option<ShadowLayer>,
    border: Option<Mask>,
}

struct ShadowLayer {
    alpha: Mask,
    dx: i32,
    dy: i32,
    opacity: f64,
}

impl EffectLayers {
    fn build(
        mask: &Mask,
        colorization: &ColorizationParams,
        min_glyph_height: u32,
    ) -> SynthResult<Self> {
        let unit = (f64::from(min_glyph_height) / 20.0).max(1.0);

        let shadow = if colorization.is_shadow {
            let sigma = ((colorization.shadow_shift[2].abs() * unit / 4.0).max(0.5)) as f32;
            let radius = ((2.0 * sigma).ceil() as u32).min(16);
            Some(ShadowLayer {
                alpha: blur_mask(mask, radius, sigma)?,
                dx: (colorization.shadow_angle.cos() * colorization.shadow_shift[0] * unit).round()
                    as i32,
                dy: (colorization.shadow_angle.sin() * colorization.shadow_shift[1] * unit).round()
                    as i32,
                opacity: colorization.shadow_opacity.clamp(0.0, 1.0),
            })
        } else {
            None
        };

        let border = if colorization.is_border {
            let radius = ((f64::from(min_glyph_height) / 12.0).round() as i32).max(1);
            Some(dilate(mask, radius))
        } else {
            None
        };

        Ok(Self { shadow, border })
    }

    /// Paint order: shadow beneath, border ring, then the tinted glyphs.
    fn paint(&self, base: &mut RgbImage, mask: &Mask, fg: Rgb, colorization: &ColorizationParams) {
        if let Some(shadow) = &self.shadow {
            let op = (shadow.opacity * 255.0).round() as u16;
            blend_layer(base, |x, y| {
                let a = shadow.alpha.get(x - shadow.dx, y - shadow.dy);
                mul_div255(u16::from(a), op)
            }, [0, 0, 0]);
        }
        if let Some(ring) = &self.border {
            blend_layer(base, |x, y| ring.get(x, y), colorization.border_color);
        }
        blend_layer(base, |x, y| mask.get(x, y), fg);
    }
}

/// Alpha-blends `color` over `base` with per-pixel alpha from `alpha_at`.
fn blend_layer(base: &mut RgbImage, alpha_at: impl Fn(i32, i32) -> u8, color: Rgb) {
    for (x, y, px) in base.enumerate_pixels_mut() {
        let a = u16::from(alpha_at(x as i32, y as i32));
        if a == 0 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            px.0[c] = mul_div255(u16::from(color[c]), a)
                .saturating_add(mul_div255(u16::from(px.0[c]), inv));
        }
    }
}

/// Disc dilation; the result includes the original mask, so painting glyphs
/// over it leaves exactly the border ring visible.
fn dilate(mask: &Mask, radius: i32) -> Mask {
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                offsets.push((dx, dy));
            }
        }
    }
    let mut out = Mask::new(mask.width, mask.height).expect("same dims as valid mask");
    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let mut v = 0u8;
            for &(dx, dy) in &offsets {
                v = v.max(mask.get(x + dx, y + dy));
                if v == 255 {
                    break;
                }
            }
            if v > 0 {
                out.put_max(x, y, v);
            }
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
