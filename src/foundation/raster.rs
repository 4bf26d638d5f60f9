use crate::foundation::error::{SynthError, SynthResult};

pub type Rgb = [u8; 3];

/// Axis-aligned glyph bounding box in raster coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl BBox {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w as i32 / 2, self.y + self.h as i32 / 2)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w as i32 && y < self.y + self.h as i32
    }
}

/// Single-channel coverage raster: one byte per pixel, 0 = background,
/// 255 = fully covered text. Row-major, `data.len() == width * height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> SynthResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| SynthError::validation("mask size overflow"))?;
        if width == 0 || height == 0 {
            return Err(SynthError::validation("mask dimensions must be positive"));
        }
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Saturating-max write; out-of-bounds coordinates are dropped.
    #[inline]
    pub fn put_max(&mut self, x: i32, y: i32, v: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = self.data[idx].max(v);
    }

    /// Bilinear sample at a fractional source position; outside reads as 0.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> u8 {
        if !x.is_finite() || !y.is_finite() {
            return 0;
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let p00 = f64::from(self.get(x0, y0));
        let p10 = f64::from(self.get(x0 + 1, y0));
        let p01 = f64::from(self.get(x0, y0 + 1));
        let p11 = f64::from(self.get(x0 + 1, y0 + 1));

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bot = p01 * (1.0 - fx) + p11 * fx;
        (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8
    }

    /// New mask enlarged by per-edge padding `[top, bottom, left, right]`,
    /// original content offset by `(left, top)`.
    pub fn padded(&self, padding: [u32; 4]) -> SynthResult<Mask> {
        let [top, bottom, left, right] = padding;
        let mut out = Mask::new(self.width + left + right, self.height + top + bottom)?;
        for y in 0..self.height {
            let src = y as usize * self.width as usize;
            let dst = (y + top) as usize * out.width as usize + left as usize;
            out.data[dst..dst + self.width as usize]
                .copy_from_slice(&self.data[src..src + self.width as usize]);
        }
        Ok(out)
    }

    pub fn coverage(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}
