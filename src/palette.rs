//! Precomputed color lookup table for perceptually plausible text colors.
//!
//! Each row pairs a foreground color with the background color it was
//! observed on; lookups run in Lab space against the background column, so
//! the nearest row for a given background patch yields a foreground that
//! real-world text plausibly used on a similar surface.

use std::path::Path;

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPair {
    pub fg: Rgb,
    pub bg: Rgb,
}

/// Read-only after construction; shared across all sampling.
///
/// Invariant: `pairs` and `lab` have identical length with row-wise
/// correspondence (`lab[i] == rgb_to_lab(pairs[i].bg)`).
#[derive(Clone, Debug)]
pub struct PaletteIndex {
    pairs: Vec<ColorPair>,
    lab: Vec<[f32; 3]>,
}

impl PaletteIndex {
    pub fn from_pairs(pairs: Vec<ColorPair>) -> Self {
        let lab = pairs.iter().map(|p| rgb_to_lab(p.bg)).collect();
        Self { pairs, lab }
    }

    /// Loads a plain-text table: one row per line, six integers
    /// `fg_r fg_g fg_b bg_r bg_g bg_b`, whitespace or comma separated.
    /// Blank lines and `#` comments are skipped.
    pub fn from_path(path: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read palette '{}'", path.display()))?;
        let mut pairs = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<u8> = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|e| {
                    SynthError::validation(format!(
                        "palette '{}' line {}: {e}",
                        path.display(),
                        lineno + 1
                    ))
                })?;
            if fields.len() != 6 {
                return Err(SynthError::validation(format!(
                    "palette '{}' line {}: expected 6 values, got {}",
                    path.display(),
                    lineno + 1,
                    fields.len()
                )));
            }
            pairs.push(ColorPair {
                fg: [fields[0], fields[1], fields[2]],
                bg: [fields[3], fields[4], fields[5]],
            });
        }
        if pairs.is_empty() {
            return Err(SynthError::validation(format!(
                "palette '{}' contains no rows",
                path.display()
            )));
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pair(&self, idx: usize) -> ColorPair {
        self.pairs[idx]
    }

    /// Index of the row whose background is perceptually closest to `lab`.
    /// Deterministic: ties resolve to the lowest index.
    pub fn nearest(&self, lab: [f32; 3]) -> usize {
        let mut best = 0usize;
        let mut best_d = f32::INFINITY;
        for (i, row) in self.lab.iter().enumerate() {
            let d = (row[0] - lab[0]).powi(2)
                + (row[1] - lab[1]).powi(2)
                + (row[2] - lab[2]).powi(2);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best
    }
}

/// sRGB (D65) to CIE Lab.
pub fn rgb_to_lab(rgb: Rgb) -> [f32; 3] {
    fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    fn f(t: f32) -> f32 {
        const DELTA: f32 = 6.0 / 29.0;
        if t > DELTA * DELTA * DELTA {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }

    let r = srgb_to_linear(f32::from(rgb[0]) / 255.0);
    let g = srgb_to_linear(f32::from(rgb[1]) / 255.0);
    let b = srgb_to_linear(f32::from(rgb[2]) / 255.0);

    // D65 reference white.
    let x = (0.4124 * r + 0.3576 * g + 0.1805 * b) / 0.95047;
    let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let z = (0.0193 * r + 0.1192 * g + 0.9505 * b) / 1.08883;

    let (fx, fy, fz) = (f(x), f(y), f(z));
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Channel-wise mean color of a patch.
pub fn mean_rgb(img: &RgbImage) -> Rgb {
    let n = (img.width() as u64 * img.height() as u64).max(1);
    let mut acc = [0u64; 3];
    for px in img.pixels() {
        for c in 0..3 {
            acc[c] += u64::from(px.0[c]);
        }
    }
    [
        (acc[0] / n) as u8,
        (acc[1] / n) as u8,
        (acc[2] / n) as u8,
    ]
}
