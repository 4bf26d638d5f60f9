//! Worker-lifetime catalogs: fonts, background image paths, the word list
//! and the palette index. All of it is loaded once at startup into a
//! [`SynthContext`] that is shared read-only (via `Arc`) across jobs, so no
//! locking is needed anywhere in the pipeline.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{SynthError, SynthResult};
use crate::palette::PaletteIndex;
use crate::render::glyph::{FontFace, GlyphRasterizer};

pub struct FontCatalog {
    faces: Vec<Box<dyn GlyphRasterizer>>,
}

impl FontCatalog {
    /// Loads every `.ttf`/`.otf` in `dir`, sorted by file name so font
    /// indices are stable across runs.
    pub fn load_dir(dir: &Path) -> SynthResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("ttf" | "otf" | "TTF" | "OTF")
                )
            })
            .collect();
        paths.sort();

        let mut faces: Vec<Box<dyn GlyphRasterizer>> = Vec::with_capacity(paths.len());
        for path in &paths {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("font")
                .to_string();
            faces.push(Box::new(FontFace::from_bytes(name, &bytes)?));
        }
        if faces.is_empty() {
            return Err(SynthError::validation(format!(
                "no fonts found in '{}'",
                dir.display()
            )));
        }
        Ok(Self { faces })
    }

    pub fn from_faces(faces: Vec<Box<dyn GlyphRasterizer>>) -> Self {
        Self { faces }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face(&self, idx: usize) -> &dyn GlyphRasterizer {
        self.faces[idx].as_ref()
    }
}

pub struct BackgroundCatalog {
    paths: Vec<PathBuf>,
}

impl BackgroundCatalog {
    /// Reads a list file with one image path per line; relative paths are
    /// resolved against the list file's directory.
    pub fn from_list_file(list: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(list)
            .with_context(|| format!("read background list '{}'", list.display()))?;
        let base = list.parent().unwrap_or_else(|| Path::new("."));
        let paths: Vec<PathBuf> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| {
                let p = PathBuf::from(l);
                if p.is_absolute() { p } else { base.join(p) }
            })
            .collect();
        if paths.is_empty() {
            return Err(SynthError::validation(format!(
                "background list '{}' is empty",
                list.display()
            )));
        }
        Ok(Self { paths })
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

pub fn load_word_list(path: &Path) -> SynthResult<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read word list '{}'", path.display()))?;
    let words: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        return Err(SynthError::validation(format!(
            "word list '{}' is empty",
            path.display()
        )));
    }
    Ok(words)
}

/// Everything a worker needs, loaded once and never mutated.
pub struct SynthContext {
    pub fonts: FontCatalog,
    pub backgrounds: BackgroundCatalog,
    pub palette: PaletteIndex,
    pub words: Vec<String>,
}

impl SynthContext {
    /// Expected layout under `data_dir`:
    /// `fonts/` (ttf/otf), `bg.txt` (image path list), `words.txt`,
    /// `colors.txt` (palette rows).
    pub fn load(data_dir: &Path) -> SynthResult<Self> {
        Ok(Self {
            fonts: FontCatalog::load_dir(&data_dir.join("fonts"))?,
            backgrounds: BackgroundCatalog::from_list_file(&data_dir.join("bg.txt"))?,
            palette: PaletteIndex::from_path(&data_dir.join("colors.txt"))?,
            words: load_word_list(&data_dir.join("words.txt"))?,
        })
    }
}
