//! Background-patch selection: pick a catalog image at random, decode it,
//! and crop a uniformly placed window of the requested size.
//!
//! Undecodable or too-small images are discarded and redrawn. The original
//! pipeline looped forever on the assumption that the catalog always holds a
//! fitting image; here the loop is bounded and exhaustion is an explicit
//! fatal error, which behaves identically under sane catalogs while keeping
//! worst-case behavior safe.

use std::path::PathBuf;

use image::RgbImage;

use crate::assets::decode::decode_image;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::rng::Sampler;

/// Returns a crop of exactly `(width, height)` drawn from a random catalog
/// image, entirely inside its bounds.
pub fn select(
    catalog: &[PathBuf],
    width: u32,
    height: u32,
    sampler: &mut Sampler,
    max_attempts: u32,
) -> SynthResult<RgbImage> {
    if catalog.is_empty() {
        return Err(SynthError::validation("background catalog is empty"));
    }
    if width == 0 || height == 0 {
        return Err(SynthError::validation("requested patch size must be positive"));
    }

    for _ in 0..max_attempts {
        let path = sampler.choice(catalog);
        let bg = match decode_image(path) {
            Ok(img) => img,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "skipping undecodable background");
                continue;
            }
        };
        let (bg_w, bg_h) = bg.dimensions();
        if bg_w < width || bg_h < height {
            continue;
        }
        let x = sampler.range_u32(0, bg_w - width);
        let y = sampler.range_u32(0, bg_h - height);
        return Ok(image::imageops::crop_imm(&bg, x, y, width, height).to_image());
    }

    Err(SynthError::exhausted(format!(
        "no background of at least {width}x{height} found in {max_attempts} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(name: &str, w: u32, h: u32) -> PathBuf {
        let mut img = RgbImage::new(w, h);
        for (x, y, px) in img.enumerate_pixels_mut() {
            px.0 = [(x % 256) as u8, (y % 256) as u8, 42];
        }
        let path = std::env::temp_dir().join(name);
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn patch_has_exact_requested_dimensions() {
        let path = write_png("textsynth_bg_exact.png", 64, 48);
        let mut s = Sampler::from_seed(1);
        for _ in 0..20 {
            let patch = select(std::slice::from_ref(&path), 30, 20, &mut s, 10).unwrap();
            assert_eq!(patch.dimensions(), (30, 20));
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn crop_lies_within_source_bounds() {
        // The gradient encodes source coordinates; a crop reading outside the
        // image would produce out-of-range channel values.
        let path = write_png("textsynth_bg_bounds.png", 40, 40);
        let mut s = Sampler::from_seed(2);
        for _ in 0..20 {
            let patch = select(std::slice::from_ref(&path), 40, 40, &mut s, 10).unwrap();
            // Only one valid offset exists for a full-size crop.
            assert_eq!(patch.get_pixel(0, 0).0, [0, 0, 42]);
            assert_eq!(patch.get_pixel(39, 39).0, [39, 39, 42]);
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn undersized_and_undecodable_images_are_skipped() {
        let small = write_png("textsynth_bg_small.png", 8, 8);
        let garbage = std::env::temp_dir().join("textsynth_bg_garbage.png");
        std::fs::write(&garbage, b"not a png").unwrap();
        let big = write_png("textsynth_bg_big.png", 100, 100);

        let catalog = vec![small.clone(), garbage.clone(), big.clone()];
        let mut s = Sampler::from_seed(3);
        let patch = select(&catalog, 50, 50, &mut s, 100).unwrap();
        assert_eq!(patch.dimensions(), (50, 50));

        for p in [small, garbage, big] {
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn exhaustion_is_a_fatal_error() {
        let small = write_png("textsynth_bg_tiny.png", 4, 4);
        let mut s = Sampler::from_seed(4);
        let err = select(std::slice::from_ref(&small), 500, 500, &mut s, 5).unwrap_err();
        assert!(matches!(err, SynthError::Exhausted(_)));
        assert!(!err.is_retryable());
        let _ = std::fs::remove_file(small);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let mut s = Sampler::from_seed(5);
        assert!(select(&[], 10, 10, &mut s, 5).is_err());
    }
}
