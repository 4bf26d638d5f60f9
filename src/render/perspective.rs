//! Projective distortion of glyph masks. Builds a combined
//! rotate/zoom/shear/perspective matrix about the mask center, inverse-maps
//! the transformed content's bounding box with bilinear sampling, then pads
//! per edge.
//!
//! Degenerate geometry is the pipeline's single most important failure
//! boundary: rare sampled parameter combinations collapse or invert the
//! raster, and every such case must surface as a retryable error so the job
//! driver can resample the style, never as a crash.

use kurbo::Point;

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::Mask;
use crate::style::SurfaceParams;

/// Transforms blowing the content up beyond this edge length are treated as
/// degenerate rather than allocated.
const MAX_DIM: u32 = 8192;

const EPS: f64 = 1e-9;

/// Row-major 3x3 projective matrix.
#[derive(Clone, Copy, Debug)]
struct Mat3([f64; 9]);

impl Mat3 {
    fn translation(tx: f64, ty: f64) -> Self {
        Mat3([1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0])
    }

    fn rotation(rad: f64) -> Self {
        let (s, c) = rad.sin_cos();
        Mat3([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    fn scale(zx: f64, zy: f64) -> Self {
        Mat3([zx, 0.0, 0.0, 0.0, zy, 0.0, 0.0, 0.0, 1.0])
    }

    fn shear(sx: f64, sy: f64) -> Self {
        Mat3([1.0, sx, 0.0, sy, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    fn perspective(px: f64, py: f64) -> Self {
        Mat3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, px, py, 1.0])
    }

    fn mul(&self, rhs: &Mat3) -> Mat3 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                out[r * 3 + c] =
                    a[r * 3] * b[c] + a[r * 3 + 1] * b[3 + c] + a[r * 3 + 2] * b[6 + c];
            }
        }
        Mat3(out)
    }

    /// Projects a point; `None` when the homogeneous coordinate collapses or
    /// flips sign (content crossing the horizon) or the result is non-finite.
    fn apply(&self, p: Point) -> Option<Point> {
        let m = &self.0;
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if !w.is_finite() || w <= EPS {
            return None;
        }
        let x = (m[0] * p.x + m[1] * p.y + m[2]) / w;
        let y = (m[3] * p.x + m[4] * p.y + m[5]) / w;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Point::new(x, y))
    }

    fn inverse(&self) -> Option<Mat3> {
        let m = &self.0;
        let c00 = m[4] * m[8] - m[5] * m[7];
        let c01 = m[5] * m[6] - m[3] * m[8];
        let c02 = m[3] * m[7] - m[4] * m[6];
        let det = m[0] * c00 + m[1] * c01 + m[2] * c02;
        if !det.is_finite() || det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Mat3([
            c00 * inv_det,
            (m[2] * m[7] - m[1] * m[8]) * inv_det,
            (m[1] * m[5] - m[2] * m[4]) * inv_det,
            c01 * inv_det,
            (m[0] * m[8] - m[2] * m[6]) * inv_det,
            (m[2] * m[3] - m[0] * m[5]) * inv_det,
            c02 * inv_det,
            (m[1] * m[6] - m[0] * m[7]) * inv_det,
            (m[0] * m[4] - m[1] * m[3]) * inv_det,
        ]))
    }
}

fn retryable(what: &str, surface: &SurfaceParams) -> SynthError {
    SynthError::retryable(format!("{what} (surface params: {surface:?})"))
}

/// Applies the sampled surface distortion and per-edge padding
/// `[top, bottom, left, right]`. Degenerate transforms are retryable.
pub fn apply(mask: &Mask, surface: &SurfaceParams, padding: [u32; 4]) -> SynthResult<Mask> {
    if surface.zoom.iter().any(|&z| !(z > 0.0)) {
        return Err(retryable("zoom component is not positive", surface));
    }
    for v in [surface.rotate, surface.shear[0], surface.shear[1], surface.perspect[0], surface.perspect[1]] {
        if !v.is_finite() {
            return Err(retryable("non-finite surface parameter", surface));
        }
    }

    let w = f64::from(mask.width);
    let h = f64::from(mask.height);
    let center = Point::new(w / 2.0, h / 2.0);

    let m = Mat3::translation(center.x, center.y)
        .mul(&Mat3::perspective(surface.perspect[0], surface.perspect[1]))
        .mul(&Mat3::shear(surface.shear[0], surface.shear[1]))
        .mul(&Mat3::scale(surface.zoom[0], surface.zoom[1]))
        .mul(&Mat3::rotation(surface.rotate.to_radians()))
        .mul(&Mat3::translation(-center.x, -center.y));

    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let mut mapped = [Point::ZERO; 4];
    for (dst, src) in mapped.iter_mut().zip(corners) {
        *dst = m
            .apply(src)
            .ok_or_else(|| retryable("corner projects behind the horizon", surface))?;
    }

    // Shoelace area of the mapped quad; a collapsed or inverted outline has
    // (near-)zero or negative signed area.
    let area = 0.5
        * (0..4)
            .map(|i| {
                let a = mapped[i];
                let b = mapped[(i + 1) % 4];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>();
    if !area.is_finite() || area < 1.0 {
        return Err(retryable("transformed outline collapsed or inverted", surface));
    }

    let min_x = mapped.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = mapped.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = mapped.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = mapped.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let out_w = (max_x - min_x).ceil();
    let out_h = (max_y - min_y).ceil();
    if !(out_w >= 1.0 && out_h >= 1.0) {
        return Err(retryable("transformed bounding box is empty", surface));
    }
    if out_w > f64::from(MAX_DIM) || out_h > f64::from(MAX_DIM) {
        return Err(retryable("transformed bounding box is unreasonably large", surface));
    }
    let (out_w, out_h) = (out_w as u32, out_h as u32);

    let inv = m
        .inverse()
        .ok_or_else(|| retryable("transform matrix is singular", surface))?;

    let mut out = Mask::new(out_w, out_h)?;
    for y in 0..out_h {
        for x in 0..out_w {
            let dest = Point::new(min_x + f64::from(x) + 0.5, min_y + f64::from(y) + 0.5);
            let Some(src) = inv.apply(dest) else {
                continue;
            };
            let v = mask.sample_bilinear(src.x - 0.5, src.y - 0.5);
            if v > 0 {
                out.put_max(x as i32, y as i32, v);
            }
        }
    }

    out.padded(padding)
}
