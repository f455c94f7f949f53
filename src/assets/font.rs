use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A font file that was read and accepted by the layout engine.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Where the bytes came from.
    pub path: PathBuf,
    /// Raw font file bytes, shared with the rasterizer.
    pub bytes: Arc<Vec<u8>>,
    /// Primary family name registered from the bytes.
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .finish()
    }
}

/// Well-known font files probed when no configured font is usable.
pub fn system_font_candidates() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(windows) {
        &[
            r"C:\Windows\Fonts\arial.ttf",
            r"C:\Windows\Fonts\calibri.ttf",
            r"C:\Windows\Fonts\seguiemj.ttf",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        ]
    };
    paths.iter().map(PathBuf::from).collect()
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register raw font bytes and return the primary family name.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> ReelResult<String> {
        if font_bytes.is_empty() {
            return Err(ReelError::caption("font file is empty"));
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::caption("no font families registered from font bytes"))?;

        self.font_ctx
            .collection
            .family_name(family_id)
            .map(str::to_string)
            .ok_or_else(|| ReelError::caption("registered font family has no name"))
    }

    /// Try `candidates` in order and return the first font that reads and registers.
    pub fn resolve_font(&mut self, candidates: &[PathBuf]) -> ReelResult<ResolvedFont> {
        for path in candidates {
            match self.try_font(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), family = %font.family, "caption font resolved");
                    return Ok(font);
                }
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "font candidate rejected"),
            }
        }
        Err(ReelError::caption(format!(
            "no usable font found among {} candidate(s)",
            candidates.len()
        )))
    }

    fn try_font(&mut self, path: &Path) -> ReelResult<ResolvedFont> {
        let bytes = std::fs::read(path)
            .map_err(|e| ReelError::caption(format!("read font '{}': {e}", path.display())))?;
        let family = self.register_font(&bytes)?;
        Ok(ResolvedFont {
            path: path.to_path_buf(),
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Shape `text` with a registered family, wrap at `max_width_px` and centre each line.
    pub fn layout_centered(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: f32,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if !max_width_px.is_finite() || max_width_px <= 0.0 {
            return Err(ReelError::validation(
                "text max_width_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width_px));
        layout.align(
            Some(max_width_px),
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
