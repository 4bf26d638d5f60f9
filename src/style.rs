//! Style sampling: one immutable [`StyleConfig`] per batch of words, drawn
//! field-by-field from the configured distributions.
//!
//! The draw order in [`StyleSampler::sample`] is a reproducibility contract:
//! under a fixed seed the sampled style (and every derived output path) must
//! be identical across runs, so the order is pinned by a test and must not
//! be reshuffled.

use crate::config::GenConfig;
use crate::foundation::raster::Rgb;
use crate::foundation::rng::Sampler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capitalization {
    None,
    Capitalize,
    Uppercase,
}

impl Capitalization {
    pub fn apply(&self, word: &str) -> String {
        match self {
            Capitalization::None => word.to_string(),
            Capitalization::Uppercase => word.to_uppercase(),
            Capitalization::Capitalize => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    /// One uniform draw resolves both flags: crossing the combined threshold
    /// selects Capitalize, and the tighter uppercase threshold overrides it.
    /// The checks are deliberately not exclusive branches, so Uppercase cases
    /// are always a subset of Capitalize cases.
    pub fn resolve(u: f64, capitalize_rate: f64, uppercase_rate: f64) -> Self {
        let mut cap = Capitalization::None;
        if u < capitalize_rate + uppercase_rate {
            cap = Capitalization::Capitalize;
        }
        if u < uppercase_rate {
            cap = Capitalization::Uppercase;
        }
        cap
    }
}

/// Baseline-curvature controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskParams {
    pub is_curve: bool,
    pub curve_rate: f64,
    /// Relative pivot position in `[0, 1]`, resolved to a glyph index per word.
    pub curve_center: f64,
}

impl MaskParams {
    /// Pivot glyph index for a word of `len` glyphs, clamped into `[0, len-1]`.
    pub fn pivot(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.curve_center * len as f64).round();
        (idx.max(0.0) as usize).min(len - 1)
    }
}

/// Geometric distortion coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Degrees.
    pub rotate: f64,
    pub zoom: [f64; 2],
    pub shear: [f64; 2],
    pub perspect: [f64; 2],
}

/// Compositing effect toggles and magnitudes, sampled once per style and
/// fixed across the style's words.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorizationParams {
    pub is_border: bool,
    pub border_color: Rgb,
    pub is_shadow: bool,
    /// Radians.
    pub shadow_angle: f64,
    pub shadow_shift: [f64; 3],
    pub shadow_opacity: f64,
}

/// One sampled visual style. Immutable after construction; consumed by every
/// downstream stage; `name` is the output directory for the style's words.
#[derive(Clone, Debug)]
pub struct StyleConfig {
    /// Index into the font catalog.
    pub font: usize,
    pub font_size: u32,
    pub underline: bool,
    pub strong: bool,
    pub oblique: bool,
    pub capitalization: Capitalization,
    /// Per-edge padding `[top, bottom, left, right]`.
    pub padding: [u32; 4],
    pub fg_hint: Rgb,
    pub bg_hint: Rgb,
    pub mask: MaskParams,
    pub surface: SurfaceParams,
    pub colorization: ColorizationParams,
    pub name: String,
}

pub struct StyleSampler<'a> {
    cfg: &'a GenConfig,
    num_fonts: usize,
}

impl<'a> StyleSampler<'a> {
    pub fn new(cfg: &'a GenConfig, num_fonts: usize) -> Self {
        assert!(num_fonts > 0, "font catalog is empty");
        Self { cfg, num_fonts }
    }

    /// Pure with respect to the injected random source; no I/O.
    pub fn sample(&self, s: &mut Sampler) -> StyleConfig {
        let cfg = self.cfg;

        let font = s.index(self.num_fonts);
        let font_size = s.range_u32(cfg.font_size[0], cfg.font_size[1]);
        let underline = s.odds(cfg.underline_rate);
        let strong = s.odds(cfg.strong_rate);
        let oblique = s.odds(cfg.oblique_rate);

        let fg_hint = s.rgb();
        let bg_hint = s.rgb();

        let pad_top = s.range_u32(cfg.padding_ud[0], cfg.padding_ud[1]);
        let pad_bottom = s.range_u32(cfg.padding_ud[0], cfg.padding_ud[1]);
        let pad_left = s.range_u32(cfg.padding_lr[0], cfg.padding_lr[1]);
        let pad_right = s.range_u32(cfg.padding_lr[0], cfg.padding_lr[1]);

        let surface = SurfaceParams {
            rotate: cfg.rotate.sample(s),
            zoom: [cfg.zoom.sample(s), cfg.zoom.sample(s)],
            shear: [cfg.shear.sample(s), cfg.shear.sample(s)],
            perspect: [cfg.perspect.sample(s), cfg.perspect.sample(s)],
        };

        let mask = MaskParams {
            is_curve: s.odds(cfg.is_curve_rate),
            curve_rate: cfg.curve_rate.sample(s),
            curve_center: s.rnd(),
        };

        let capitalization =
            Capitalization::resolve(s.rnd(), cfg.capitalize_rate, cfg.uppercase_rate);

        let colorization = ColorizationParams {
            is_border: s.odds(cfg.is_border_rate),
            border_color: s.rgb(),
            is_shadow: s.odds(cfg.is_shadow_rate),
            shadow_angle: std::f64::consts::FRAC_PI_4 * *s.choice(&cfg.shadow_angle_degree)
                + s.gauss(0.0, cfg.shadow_angle_stddev),
            shadow_shift: [
                cfg.shadow_shift[0].sample(s),
                cfg.shadow_shift[1].sample(s),
                cfg.shadow_shift[2].sample(s),
            ],
            shadow_opacity: cfg.shadow_opacity.sample(s),
        };

        StyleConfig {
            font,
            font_size,
            underline,
            strong,
            oblique,
            capitalization,
            padding: [pad_top, pad_bottom, pad_left, pad_right],
            fg_hint,
            bg_hint,
            mask,
            surface,
            colorization,
            name: s.hex_name(),
        }
    }
}
