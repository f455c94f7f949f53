//! Background acquisition: an ordered chain of remote image strategies that always ends in
//! a solid colour, so the pipeline never stops for lack of a background.

use std::path::{Path, PathBuf};

use crate::foundation::core::Rgb8;

/// Strategy chain and the remote image strategies.
pub mod chain;
/// HTTP transport behind the remote strategies.
pub mod fetch;

/// Which remote strategy supplied a fetched image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrigin {
    /// The text-to-image generator keyed by the prompt and a random seed.
    Generator,
    /// The deterministic stock-photo endpoint keyed by the sanitized prompt.
    Stock,
}

/// The single background chosen for one invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundSource {
    /// A fetched image materialized to a temp file owned by the invocation's scope.
    GeneratedImage {
        /// Temp file holding the encoded image bytes.
        local_path: PathBuf,
        /// Strategy that produced the bytes.
        origin: ImageOrigin,
    },
    /// Terminal fallback fill.
    SolidColor {
        /// Fill colour.
        rgb: Rgb8,
    },
}

impl BackgroundSource {
    /// Temp file backing this source, if any.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::GeneratedImage { local_path, .. } => Some(local_path),
            Self::SolidColor { .. } => None,
        }
    }

    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeneratedImage {
                origin: ImageOrigin::Generator,
                ..
            } => "generator",
            Self::GeneratedImage {
                origin: ImageOrigin::Stock,
                ..
            } => "stock",
            Self::SolidColor { .. } => "solid_color",
        }
    }
}
