//! Separable gaussian blur on single-channel coverage masks, used for soft
//! shadows. Fixed-point Q16 kernel, clamp-to-edge sampling.

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::Mask;

pub fn blur_mask(src: &Mask, radius: u32, sigma: f32) -> SynthResult<Mask> {
    if radius == 0 {
        return Ok(src.clone());
    }
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let mut tmp = Mask::new(src.width, src.height)?;
    let mut out = Mask::new(src.width, src.height)?;
    horizontal_pass(src, &mut tmp, &kernel);
    vertical_pass(&tmp, &mut out, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> SynthResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SynthError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    // Quantize to Q16 and push any rounding drift onto the center tap so the
    // weights sum to exactly one.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &Mask, dst: &mut Mask, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = src.width as i32;
    for y in 0..src.height as i32 {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                acc += u64::from(kw) * u64::from(src.get(sx, y));
            }
            dst.put_max(x, y, q16_to_u8(acc));
        }
    }
}

fn vertical_pass(src: &Mask, dst: &mut Mask, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let h = src.height as i32;
    for y in 0..h {
        for x in 0..src.width as i32 {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                acc += u64::from(kw) * u64::from(src.get(x, sy));
            }
            dst.put_max(x, y, q16_to_u8(acc));
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    (((acc + 32768) >> 16).min(255)) as u8
}
