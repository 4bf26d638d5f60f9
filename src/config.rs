//! Sampled-parameter distributions. These are external configuration, not
//! tuned here; defaults mirror the reference generator and every field can
//! be overridden from a JSON file.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::SynthResult;
use crate::foundation::rng::Sampler;

/// `(stddev, mean)` pair for one gaussian draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussParam {
    pub stddev: f64,
    pub mean: f64,
}

impl GaussParam {
    pub const fn new(stddev: f64, mean: f64) -> Self {
        Self { stddev, mean }
    }

    pub fn sample(&self, s: &mut Sampler) -> f64 {
        s.gauss(self.mean, self.stddev)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Font pixel size, inclusive range.
    pub font_size: [u32; 2],
    pub underline_rate: f64,
    pub strong_rate: f64,
    pub oblique_rate: f64,
    pub capitalize_rate: f64,
    pub uppercase_rate: f64,

    /// Top/bottom padding, inclusive range.
    pub padding_ud: [u32; 2],
    /// Left/right padding, inclusive range.
    pub padding_lr: [u32; 2],

    /// Rotation in degrees.
    pub rotate: GaussParam,
    pub zoom: GaussParam,
    pub shear: GaussParam,
    pub perspect: GaussParam,

    pub is_curve_rate: f64,
    pub curve_rate: GaussParam,

    pub is_border_rate: f64,
    pub is_shadow_rate: f64,
    /// Shadow direction buckets, multiplied by pi/4.
    pub shadow_angle_degree: Vec<f64>,
    pub shadow_angle_stddev: f64,
    pub shadow_shift: [GaussParam; 3],
    pub shadow_opacity: GaussParam,

    pub random_color_rate: f64,

    /// Cap on whole-style resampling after degenerate geometry.
    pub max_retries: u32,
    /// Cap on background pick-decode-fit attempts per patch.
    pub max_background_attempts: u32,

    pub words_per_style: u32,
    /// Background variants rendered per word; indices suffix the file name
    /// when greater than 1.
    pub variants_per_word: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            font_size: [25, 60],
            underline_rate: 0.05,
            strong_rate: 0.1,
            oblique_rate: 0.1,
            capitalize_rate: 0.15,
            uppercase_rate: 0.15,
            padding_ud: [0, 15],
            padding_lr: [0, 25],
            rotate: GaussParam::new(5.0, 0.0),
            zoom: GaussParam::new(0.05, 1.0),
            shear: GaussParam::new(0.05, 0.0),
            perspect: GaussParam::new(0.0005, 0.0),
            is_curve_rate: 0.1,
            curve_rate: GaussParam::new(0.1, 0.5),
            is_border_rate: 0.05,
            is_shadow_rate: 0.1,
            shadow_angle_degree: vec![1.0, 3.0, 5.0, 7.0],
            shadow_angle_stddev: 0.5,
            shadow_shift: [
                GaussParam::new(0.0, 2.0),
                GaussParam::new(1.0, 7.0),
                GaussParam::new(2.0, 4.0),
            ],
            shadow_opacity: GaussParam::new(0.1, 0.5),
            random_color_rate: 0.1,
            max_retries: 64,
            max_background_attempts: 100,
            words_per_style: 16,
            variants_per_word: 1,
        }
    }
}

impl GenConfig {
    pub fn from_path(path: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: GenConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roundtrips_through_json() {
        let cfg = GenConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg: GenConfig =
            serde_json::from_str(r#"{"max_retries": 3, "random_color_rate": 0.9}"#).unwrap();
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.random_color_rate, 0.9);
        assert_eq!(cfg.font_size, GenConfig::default().font_size);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<GenConfig>(r#"{"not_a_field": 1}"#).is_err());
    }
}
