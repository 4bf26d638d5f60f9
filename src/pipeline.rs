//! Per-style rendering job: sample a style, then for each word rasterize,
//! distort, pick a background, resolve colors, composite and write.
//!
//! Degenerate-geometry failures propagate out of a word render as retryable;
//! [`Pipeline::run_style_job`] answers them by resampling the *entire* style
//! (fresh geometry, fresh name), bounded by `max_retries`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::catalog::SynthContext;
use crate::assets::decode::encode_png;
use crate::config::GenConfig;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::rng::Sampler;
use crate::render::mask::TextStyle;
use crate::render::{background, colorize, composite, mask, perspective};
use crate::style::{StyleConfig, StyleSampler};

pub struct Pipeline {
    ctx: Arc<SynthContext>,
    cfg: GenConfig,
    out_dir: PathBuf,
}

#[derive(Debug)]
pub struct StyleSummary {
    pub style_name: String,
    pub rendered: usize,
}

impl Pipeline {
    pub fn new(ctx: Arc<SynthContext>, cfg: GenConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            cfg,
            out_dir: out_dir.into(),
        }
    }

    /// Job-driver entry point: renders one style batch, resampling the whole
    /// style on retryable failures up to `max_retries` times. Any other
    /// error aborts only this job.
    #[tracing::instrument(skip(self, sampler))]
    pub fn run_style_job(&self, job: u64, sampler: &mut Sampler) -> SynthResult<StyleSummary> {
        for attempt in 0..=self.cfg.max_retries {
            match self.render_style(sampler) {
                Err(err) if err.is_retryable() => {
                    tracing::debug!(%err, attempt, "resampling style after degenerate geometry");
                }
                other => return other,
            }
        }
        Err(SynthError::exhausted(format!(
            "style job {job} still degenerate after {} resamples",
            self.cfg.max_retries
        )))
    }

    fn render_style(&self, sampler: &mut Sampler) -> SynthResult<StyleSummary> {
        let style = StyleSampler::new(&self.cfg, self.ctx.fonts.len()).sample(sampler);
        let style_dir = self.out_dir.join(&style.name);
        std::fs::create_dir_all(&style_dir)
            .with_context(|| format!("create style dir '{}'", style_dir.display()))?;

        let mut rendered = 0usize;
        for _ in 0..self.cfg.words_per_style {
            let word = sampler.choice(&self.ctx.words).clone();
            for variant in 0..self.cfg.variants_per_word.max(1) {
                self.render_word(&style, &style_dir, &word, variant, sampler)?;
                rendered += 1;
            }
        }
        Ok(StyleSummary {
            style_name: style.name,
            rendered,
        })
    }

    /// One (style, word, variant) render. The output file is written only
    /// after compositing fully succeeds, so an abandoned job leaves no
    /// partial artifact.
    fn render_word(
        &self,
        style: &StyleConfig,
        style_dir: &Path,
        word: &str,
        variant: u32,
        sampler: &mut Sampler,
    ) -> SynthResult<PathBuf> {
        let text = style.capitalization.apply(word);
        let font = self.ctx.fonts.face(style.font);

        let (glyph_mask, boxes) =
            mask::render_text(font, &text, &TextStyle::from_style(style), &style.mask)?;
        let glyph_mask = perspective::apply(&glyph_mask, &style.surface, style.padding)?;

        let patch = background::select(
            self.ctx.backgrounds.paths(),
            glyph_mask.width,
            glyph_mask.height,
            sampler,
            self.cfg.max_background_attempts,
        )?;

        let (fg, bg) = colorize::resolve(
            &patch,
            &self.ctx.palette,
            self.cfg.random_color_rate,
            sampler,
        )?;

        let min_h = boxes
            .iter()
            .filter(|b| b.h > 0)
            .map(|b| b.h)
            .min()
            .unwrap_or(1);

        let out = composite::composite(&glyph_mask, &patch, fg, bg, &style.colorization, min_h)?;

        let path = style_dir.join(output_file_name(word, variant, self.cfg.variants_per_word));
        encode_png(&out.styled, &path)?;
        tracing::debug!(path = %path.display(), font = font.name(), "rendered word");
        Ok(path)
    }
}

/// `{word-lowercased}.png`, with a `_{index:03}` suffix when more than one
/// background variant per word is generated.
pub fn output_file_name(word: &str, variant: u32, variants_per_word: u32) -> String {
    let word = word.to_lowercase();
    if variants_per_word > 1 {
        format!("{word}_{variant:03}.png")
    } else {
        format!("{word}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_has_index_only_for_multiple_variants() {
        assert_eq!(output_file_name("Hello", 0, 1), "hello.png");
        assert_eq!(output_file_name("Hello", 2, 5), "hello_002.png");
        assert_eq!(output_file_name("WORD", 12, 100), "word_012.png");
    }
}
