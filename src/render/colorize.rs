//! Foreground/background color resolution: either a uniform random pair, or
//! a palette row whose observed background is perceptually closest to the
//! chosen background patch.

use image::RgbImage;

use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::raster::Rgb;
use crate::foundation::rng::Sampler;
use crate::palette::{PaletteIndex, mean_rgb, rgb_to_lab};

/// With probability `random_color_rate` the pair is uniform random;
/// otherwise the lookup is fully deterministic for identical inputs, so the
/// two branches stay cleanly separable.
pub fn resolve(
    patch: &RgbImage,
    palette: &PaletteIndex,
    random_color_rate: f64,
    sampler: &mut Sampler,
) -> SynthResult<(Rgb, Rgb)> {
    if palette.is_empty() {
        return Err(SynthError::validation("palette index is empty"));
    }
    if sampler.odds(random_color_rate) {
        return Ok((sampler.rgb(), sampler.rgb()));
    }
    let lab = rgb_to_lab(mean_rgb(patch));
    let pair = palette.pair(palette.nearest(lab));
    Ok((pair.fg, pair.bg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorPair;

    fn palette() -> PaletteIndex {
        PaletteIndex::from_pairs(vec![
            ColorPair { fg: [250, 250, 250], bg: [10, 10, 10] },
            ColorPair { fg: [20, 20, 20], bg: [240, 240, 240] },
        ])
    }

    #[test]
    fn deterministic_branch_is_idempotent() {
        let patch = RgbImage::from_pixel(16, 16, image::Rgb([12, 12, 12]));
        let palette = palette();
        let mut s = Sampler::from_seed(1);
        let a = resolve(&patch, &palette, 0.0, &mut s).unwrap();
        let b = resolve(&patch, &palette, 0.0, &mut s).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dark_patch_selects_light_foreground() {
        let patch = RgbImage::from_pixel(8, 8, image::Rgb([5, 5, 5]));
        let mut s = Sampler::from_seed(2);
        let (fg, bg) = resolve(&patch, &palette(), 0.0, &mut s).unwrap();
        assert_eq!(fg, [250, 250, 250]);
        assert_eq!(bg, [10, 10, 10]);
    }

    #[test]
    fn random_branch_draws_from_the_sampler() {
        let patch = RgbImage::from_pixel(8, 8, image::Rgb([5, 5, 5]));
        let palette = palette();
        let mut s = Sampler::from_seed(3);
        // rate 1.0 always takes the random branch; pairs should vary.
        let pairs: Vec<_> = (0..8)
            .map(|_| resolve(&patch, &palette, 1.0, &mut s).unwrap())
            .collect();
        assert!(pairs.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let patch = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
        let empty = PaletteIndex::from_pairs(Vec::new());
        let mut s = Sampler::from_seed(4);
        assert!(resolve(&patch, &empty, 0.0, &mut s).is_err());
    }
}
