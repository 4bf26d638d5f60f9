//! Stage-level scenario tests composed the way the pipeline chains them.

mod support;

use support::{BlockFont, uniform_patch};
use textsynth::palette::{ColorPair, PaletteIndex};
use textsynth::render::{colorize, composite, mask, perspective};
use textsynth::style::{ColorizationParams, MaskParams, SurfaceParams};
use textsynth::{Mask, Sampler};

fn identity_surface() -> SurfaceParams {
    SurfaceParams {
        rotate: 0.0,
        zoom: [1.0, 1.0],
        shear: [0.0, 0.0],
        perspect: [0.0, 0.0],
    }
}

fn no_effects() -> ColorizationParams {
    ColorizationParams {
        is_border: false,
        border_color: [0, 0, 0],
        is_shadow: false,
        shadow_angle: 0.0,
        shadow_shift: [0.0, 0.0, 0.0],
        shadow_opacity: 0.0,
    }
}

fn no_curve() -> MaskParams {
    MaskParams {
        is_curve: false,
        curve_rate: 0.0,
        curve_center: 0.0,
    }
}

/// "hello" with all effects off over a solid gray 200x60 patch: output keeps
/// the patch dimensions, every glyph-box center is foreground-colored, and
/// everything outside the glyph boxes is untouched background.
#[test]
fn hello_over_gray_patch_end_to_end() {
    let font = BlockFont::new(20);
    let style = mask::TextStyle {
        size: 20.0,
        underline: false,
        strong: false,
        oblique: false,
    };

    let (glyph_mask, boxes) = mask::render_text(&font, "hello", &style, &no_curve()).unwrap();
    assert_eq!(boxes.len(), 5);

    // Identity distortion keeps the mask pixel-exact.
    let distorted = perspective::apply(&glyph_mask, &identity_surface(), [0, 0, 0, 0]).unwrap();
    assert_eq!(distorted, glyph_mask);
    assert!(distorted.width <= 200 && distorted.height <= 60);

    let patch = uniform_patch(200, 60, [128, 128, 128]);
    let out = composite::composite(
        &distorted,
        &patch,
        [255, 255, 255],
        [0, 0, 0],
        &no_effects(),
        boxes.iter().map(|b| b.h).min().unwrap(),
    )
    .unwrap();

    assert_eq!(out.styled.dimensions(), (200, 60));
    for b in &boxes {
        let (cx, cy) = b.center();
        assert_eq!(
            out.styled.get_pixel(cx as u32, cy as u32).0,
            [255, 255, 255],
            "glyph box center ({cx},{cy}) must be foreground"
        );
    }
    for (x, y, px) in out.styled.enumerate_pixels() {
        let inside = boxes.iter().any(|b| b.contains(x as i32, y as i32));
        if !inside {
            assert_eq!(px.0, [128, 128, 128], "pixel ({x},{y}) outside all glyph boxes");
        }
    }
}

/// Retryable classification survives the full mask-then-distort chain.
#[test]
fn degenerate_geometry_after_real_mask_is_retryable() {
    let font = BlockFont::new(12);
    let style = mask::TextStyle {
        size: 12.0,
        underline: false,
        strong: false,
        oblique: false,
    };
    let (glyph_mask, _) = mask::render_text(&font, "word", &style, &no_curve()).unwrap();

    let mut surface = identity_surface();
    surface.zoom = [-0.2, 1.0];
    let err = perspective::apply(&glyph_mask, &surface, [2, 2, 2, 2]).unwrap_err();
    assert!(err.is_retryable());
}

/// Color resolution is deterministic when the random branch is disabled,
/// even across separately constructed samplers.
#[test]
fn color_resolution_is_reproducible_without_randomness() {
    let palette = PaletteIndex::from_pairs(vec![
        ColorPair { fg: [255, 255, 255], bg: [0, 0, 0] },
        ColorPair { fg: [0, 0, 0], bg: [255, 255, 255] },
        ColorPair { fg: [200, 30, 30], bg: [120, 120, 120] },
    ]);
    let patch = uniform_patch(64, 32, [118, 121, 119]);

    let mut s1 = Sampler::from_seed(11);
    let mut s2 = Sampler::from_seed(999);
    let a = colorize::resolve(&patch, &palette, 0.0, &mut s1).unwrap();
    let b = colorize::resolve(&patch, &palette, 0.0, &mut s2).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.0, [200, 30, 30]);
}

/// A curved single-character word flows through distortion and compositing.
#[test]
fn single_char_curved_word_composites() {
    let font = BlockFont::new(10);
    let style = mask::TextStyle {
        size: 10.0,
        underline: false,
        strong: false,
        oblique: false,
    };
    let curve = MaskParams {
        is_curve: true,
        curve_rate: 0.8,
        curve_center: 1.0,
    };

    let (glyph_mask, boxes) = mask::render_text(&font, "i", &style, &curve).unwrap();
    assert_eq!(boxes.len(), 1);
    let distorted = perspective::apply(&glyph_mask, &identity_surface(), [1, 1, 1, 1]).unwrap();
    let patch = uniform_patch(distorted.width, distorted.height, [40, 40, 40]);
    let out = composite::composite(
        &distorted,
        &patch,
        [255, 0, 0],
        [0, 0, 0],
        &no_effects(),
        boxes[0].h.max(1),
    )
    .unwrap();
    assert_eq!(out.styled.dimensions(), (distorted.width, distorted.height));
}

/// The mask-dimension invariant: compositing demands the patch covers the
/// mask, matching what the background selector guarantees.
#[test]
fn composite_rejects_undersized_patch() {
    let glyph_mask = Mask::new(50, 20).unwrap();
    let patch = uniform_patch(49, 20, [0, 0, 0]);
    assert!(
        composite::composite(&glyph_mask, &patch, [1, 1, 1], [0, 0, 0], &no_effects(), 5).is_err()
    );
}
