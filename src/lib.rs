//! Textsynth generates labeled training images for scene-text models.
//!
//! One job samples a visual style (font, geometry, colors, effects), renders
//! a word into an alpha mask, applies a projective distortion, picks a crop
//! of a natural background image, resolves a perceptually plausible color
//! pair, and composites shadow/border/glyph layers into a lossless PNG.
//!
//! # Pipeline overview
//!
//! 1. **Sample**: [`style::StyleSampler`] draws a [`style::StyleConfig`]
//! 2. **Rasterize**: [`render::mask::render_text`] produces a glyph mask + boxes
//! 3. **Distort**: [`render::perspective::apply`] (degeneracy is retryable)
//! 4. **Background**: [`render::background::select`] crops a fitting patch
//! 5. **Colors**: [`render::colorize::resolve`] against the [`palette::PaletteIndex`]
//! 6. **Composite**: [`render::composite::composite`], then PNG write
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Seed-deterministic**: all randomness flows through one injected
//!   [`foundation::rng::Sampler`] per job; draw order is a tested contract.
//! - **Front-loaded IO**: catalogs live in a read-only
//!   [`assets::catalog::SynthContext`] shared across workers.
//! - **Two-tier failures**: degenerate geometry is retryable, everything
//!   else abandons the single job (see [`foundation::error::SynthError`]).
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod style;

pub use config::{GaussParam, GenConfig};
pub use foundation::error::{SynthError, SynthResult};
pub use foundation::raster::{BBox, Mask, Rgb};
pub use foundation::rng::Sampler;
pub use palette::{ColorPair, PaletteIndex};
pub use pipeline::{Pipeline, StyleSummary};
pub use style::{Capitalization, ColorizationParams, MaskParams, StyleConfig, SurfaceParams};
