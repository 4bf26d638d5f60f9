//! Word-to-alpha-mask rasterization: natural advances, optional curved
//! baseline bent around a pivot glyph, and synthetic underline / bold /
//! oblique decorations applied at blit time.

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::{BBox, Mask};
use crate::render::glyph::{GlyphRasterizer, RasterGlyph};
use crate::style::{MaskParams, StyleConfig};

/// Slant applied per row when the style is oblique, in x pixels per y pixel.
const OBLIQUE_SLANT: f64 = 0.25;

/// Font-level text controls extracted from a style.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub size: f32,
    pub underline: bool,
    pub strong: bool,
    pub oblique: bool,
}

impl TextStyle {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            size: style.font_size as f32,
            underline: style.underline,
            strong: style.strong,
            oblique: style.oblique,
        }
    }
}

struct Placement {
    glyph: RasterGlyph,
    /// Left edge (pen + bearing), baseline-relative layout space.
    x: i32,
    /// Baseline y for this glyph (curve offset applied), layout space.
    baseline: i32,
}

impl Placement {
    fn top(&self) -> i32 {
        self.baseline - self.glyph.ymin - self.glyph.height as i32
    }
}

/// Rasterizes `text` into a coverage mask plus one bounding box per glyph in
/// text order. The canvas is sized to contain every glyph extent (including
/// decorations) with no clipping. A character the font cannot produce is a
/// fatal render error.
pub fn render_text(
    font: &dyn GlyphRasterizer,
    text: &str,
    style: &TextStyle,
    mask_params: &MaskParams,
) -> SynthResult<(Mask, Vec<BBox>)> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Err(SynthError::validation("cannot render empty text"));
    }

    let pivot = mask_params.pivot(chars.len());
    let mut placements = Vec::with_capacity(chars.len());
    let mut pen = 0.0f64;
    for (i, &ch) in chars.iter().enumerate() {
        let glyph = font.rasterize(ch, style.size).ok_or_else(|| {
            SynthError::render(format!("font has no glyph for '{ch}' (U+{:04X})", ch as u32))
        })?;
        let dy = if mask_params.is_curve {
            let d = i as f64 - pivot as f64;
            (mask_params.curve_rate * d * d).round() as i32
        } else {
            0
        };
        let x = (pen + f64::from(glyph.xmin)).round() as i32;
        pen += f64::from(glyph.advance);
        placements.push(Placement { glyph, x, baseline: dy });
    }
    let total_advance = pen.ceil() as i32;

    // Layout-space extents, including shear and the double-blit of strong.
    let strong_extra = i32::from(style.strong);
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    let mut grow = |x0: i32, y0: i32, x1: i32, y1: i32| {
        min_x = min_x.min(x0);
        min_y = min_y.min(y0);
        max_x = max_x.max(x1);
        max_y = max_y.max(y1);
    };
    for p in &placements {
        if p.glyph.width == 0 || p.glyph.height == 0 {
            continue;
        }
        let top = p.top();
        let bottom = top + p.glyph.height as i32 - 1;
        let s_top = shear_shift(style, top, p.baseline);
        let s_bottom = shear_shift(style, bottom, p.baseline);
        let s_min = s_top.min(s_bottom);
        let s_max = s_top.max(s_bottom);
        grow(
            p.x + s_min,
            top,
            p.x + p.glyph.width as i32 - 1 + s_max + strong_extra,
            bottom,
        );
    }
    if style.underline {
        let (bar_top, bar_bottom) = underline_rows(style);
        grow(0, bar_top, total_advance.max(1) - 1, bar_bottom);
    }
    if min_x > max_x || min_y > max_y {
        // Whole word rasterized to nothing (e.g. all whitespace).
        let mask = Mask::new(total_advance.max(1) as u32, 1)?;
        let boxes = placements
            .iter()
            .map(|p| BBox { x: p.x.max(0), y: 0, w: 0, h: 0 })
            .collect();
        return Ok((mask, boxes));
    }

    let origin_x = -min_x;
    let origin_y = -min_y;
    let mut mask = Mask::new((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32)?;

    let mut boxes = Vec::with_capacity(placements.len());
    for p in &placements {
        let painted = blit_glyph(&mut mask, p, style, origin_x, origin_y);
        boxes.push(painted.unwrap_or(BBox {
            x: (p.x + origin_x).max(0),
            y: (p.baseline + origin_y).max(0),
            w: 0,
            h: 0,
        }));
    }

    if style.underline {
        let (bar_top, bar_bottom) = underline_rows(style);
        for y in bar_top..=bar_bottom {
            for x in 0..total_advance.max(1) {
                mask.put_max(x + origin_x, y + origin_y, 255);
            }
        }
    }

    Ok((mask, boxes))
}

/// Shear offset for a row at layout-space `y`, relative to the glyph's
/// baseline: rows above the baseline lean right.
fn shear_shift(style: &TextStyle, y: i32, baseline: i32) -> i32 {
    if !style.oblique {
        return 0;
    }
    (OBLIQUE_SLANT * f64::from(baseline - y)).round() as i32
}

/// Underline bar rows in layout space (baseline at 0).
fn underline_rows(style: &TextStyle) -> (i32, i32) {
    let gap = ((style.size * 0.08).round() as i32).max(1);
    let thickness = ((style.size / 15.0).round() as i32).max(1);
    (gap, gap + thickness - 1)
}

/// Blits one glyph (with shear and strong) and returns the painted bbox.
fn blit_glyph(
    mask: &mut Mask,
    p: &Placement,
    style: &TextStyle,
    origin_x: i32,
    origin_y: i32,
) -> Option<BBox> {
    let top = p.top();
    let mut painted: Option<(i32, i32, i32, i32)> = None;
    for row in 0..p.glyph.height as i32 {
        let y = top + row;
        let shift = shear_shift(style, y, p.baseline);
        for col in 0..p.glyph.width as i32 {
            let v = p.glyph.coverage[(row * p.glyph.width as i32 + col) as usize];
            if v == 0 {
                continue;
            }
            let cx = p.x + col + shift + origin_x;
            let cy = y + origin_y;
            mask.put_max(cx, cy, v);
            if style.strong {
                mask.put_max(cx + 1, cy, v);
            }
            let x1 = cx + i32::from(style.strong);
            painted = Some(match painted {
                None => (cx, cy, x1, cy),
                Some((a, b, c, d)) => (a.min(cx), b.min(cy), c.max(x1), d.max(cy)),
            });
        }
    }
    painted.map(|(x0, y0, x1, y1)| BBox {
        x: x0,
        y: y0,
        w: (x1 - x0 + 1) as u32,
        h: (y1 - y0 + 1) as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::glyph::RasterGlyph;

    /// Synthetic face: every glyph is a solid square sitting on the baseline.
    struct SquareFont {
        side: u32,
        missing: Option<char>,
    }

    impl SquareFont {
        fn new(side: u32) -> Self {
            Self { side, missing: None }
        }
    }

    impl GlyphRasterizer for SquareFont {
        fn name(&self) -> &str {
            "square"
        }

        fn rasterize(&self, ch: char, _px: f32) -> Option<RasterGlyph> {
            if self.missing == Some(ch) {
                return None;
            }
            if ch == ' ' {
                return Some(RasterGlyph {
                    width: 0,
                    height: 0,
                    xmin: 0,
                    ymin: 0,
                    advance: self.side as f32,
                    coverage: Vec::new(),
                });
            }
            Some(RasterGlyph {
                width: self.side,
                height: self.side,
                xmin: 0,
                ymin: 0,
                advance: self.side as f32 + 2.0,
                coverage: vec![255; (self.side * self.side) as usize],
            })
        }
    }

    fn plain_style() -> TextStyle {
        TextStyle { size: 16.0, underline: false, strong: false, oblique: false }
    }

    fn no_curve() -> MaskParams {
        MaskParams { is_curve: false, curve_rate: 0.0, curve_center: 0.0 }
    }

    #[test]
    fn one_bbox_per_glyph_in_text_order() {
        let font = SquareFont::new(8);
        let (mask, boxes) = render_text(&font, "hello", &plain_style(), &no_curve()).unwrap();
        assert_eq!(boxes.len(), 5);
        for pair in boxes.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
        // No clipping: every box lies inside the canvas.
        for b in &boxes {
            assert!(b.x >= 0 && b.y >= 0);
            assert!(b.x + b.w as i32 <= mask.width as i32);
            assert!(b.y + b.h as i32 <= mask.height as i32);
        }
    }

    #[test]
    fn missing_glyph_is_fatal_render_error() {
        let font = SquareFont { side: 8, missing: Some('x') };
        let err = render_text(&font, "axe", &plain_style(), &no_curve()).unwrap_err();
        assert!(matches!(err, SynthError::Render(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn empty_text_is_rejected() {
        let font = SquareFont::new(8);
        assert!(render_text(&font, "", &plain_style(), &no_curve()).is_err());
    }

    #[test]
    fn curve_offsets_glyphs_around_pivot() {
        let font = SquareFont::new(6);
        let curve = MaskParams { is_curve: true, curve_rate: 2.0, curve_center: 0.5 };
        let (_, boxes) = render_text(&font, "aaaaa", &plain_style(), &curve).unwrap();
        // Pivot glyph (index 2..3) sits highest; ends bend down.
        let pivot_y = boxes[2].y.min(boxes[3].y);
        assert!(boxes[0].y > pivot_y);
        assert!(boxes[4].y > pivot_y);
    }

    #[test]
    fn single_char_curve_does_not_fail() {
        let font = SquareFont::new(6);
        let curve = MaskParams { is_curve: true, curve_rate: 1.0, curve_center: 1.0 };
        let (mask, boxes) = render_text(&font, "a", &plain_style(), &curve).unwrap();
        assert_eq!(boxes.len(), 1);
        assert!(mask.coverage() > 0);
    }

    #[test]
    fn underline_paints_below_baseline() {
        let font = SquareFont::new(8);
        let mut style = plain_style();
        let (plain, _) = render_text(&font, "ab", &style, &no_curve()).unwrap();
        style.underline = true;
        let (lined, _) = render_text(&font, "ab", &style, &no_curve()).unwrap();
        assert!(lined.height > plain.height);
        assert!(lined.coverage() > plain.coverage());
    }

    #[test]
    fn strong_widens_glyphs() {
        let font = SquareFont::new(8);
        let mut style = plain_style();
        let (plain, plain_boxes) = render_text(&font, "a", &style, &no_curve()).unwrap();
        style.strong = true;
        let (strong, strong_boxes) = render_text(&font, "a", &style, &no_curve()).unwrap();
        assert!(strong.coverage() > plain.coverage());
        assert_eq!(strong_boxes[0].w, plain_boxes[0].w + 1);
    }

    #[test]
    fn oblique_shears_but_keeps_all_content() {
        let font = SquareFont::new(8);
        let mut style = plain_style();
        let (plain, _) = render_text(&font, "abc", &style, &no_curve()).unwrap();
        style.oblique = true;
        let (sheared, _) = render_text(&font, "abc", &style, &no_curve()).unwrap();
        // Same amount of ink, wider canvas.
        assert_eq!(sheared.coverage(), plain.coverage());
        assert!(sheared.width >= plain.width);
    }

    #[test]
    fn whitespace_only_word_yields_empty_boxes() {
        let font = SquareFont::new(8);
        let (mask, boxes) = render_text(&font, "  ", &plain_style(), &no_curve()).unwrap();
        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().all(|b| b.w == 0 && b.h == 0));
        assert_eq!(mask.coverage(), 0);
    }
}
