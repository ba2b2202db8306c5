// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge configuration and the optional JSON options file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BindwerkError, Result};
use crate::types::PaperSize;

/// Margin kept around fitted images, in points.
pub const DEFAULT_MARGIN_PT: f32 = 36.0;

/// Settings for one merge call. Immutable once the merge starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Folder whose tree is merged.
    pub root_folder: PathBuf,
    /// Destination PDF.
    pub output_path: PathBuf,
    /// Place images on a standard page (fitted) instead of at native size.
    pub resize_images: bool,
    /// Page size for fitted image pages.
    pub paper_size: PaperSize,
    /// Margin around fitted images, in points.
    pub margin_pt: f32,
}

impl MergeConfig {
    pub fn new(root_folder: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            root_folder: root_folder.into(),
            output_path: output_path.into(),
            resize_images: false,
            paper_size: PaperSize::A4,
            margin_pt: DEFAULT_MARGIN_PT,
        }
    }

    pub fn with_resize_images(mut self, resize_images: bool) -> Self {
        self.resize_images = resize_images;
        self
    }

    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.paper_size = paper_size;
        self
    }

    pub fn with_margin(mut self, margin_pt: f32) -> Self {
        self.margin_pt = margin_pt;
        self
    }

    /// Apply every value from an options file.
    pub fn with_options(self, options: &MergeOptions) -> Self {
        self.with_resize_images(options.resize_images)
            .with_paper_size(options.paper_size)
            .with_margin(options.margin_pt)
    }

    /// Check the configuration before any traversal starts.
    pub fn validate(&self) -> Result<()> {
        if !self.root_folder.is_dir() {
            return Err(BindwerkError::InvalidRoot(self.root_folder.clone()));
        }

        let (width, height) = self.paper_size.dimensions_pt();
        if !self.margin_pt.is_finite()
            || self.margin_pt < 0.0
            || self.margin_pt * 2.0 >= width.min(height)
        {
            return Err(BindwerkError::InvalidConfig(format!(
                "margin of {} pt leaves no drawable area on a {width}x{height} pt page",
                self.margin_pt
            )));
        }

        Ok(())
    }
}

/// Options that can be stored in a JSON file and reused across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub resize_images: bool,
    pub paper_size: PaperSize,
    pub margin_pt: f32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            resize_images: false,
            paper_size: PaperSize::A4,
            margin_pt: DEFAULT_MARGIN_PT,
        }
    }
}

impl MergeOptions {
    /// Load options from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Suggested output for a folder: `<root>/<root-name>_merged.pdf`.
pub fn default_output_path(root_folder: &Path) -> PathBuf {
    let name = root_folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "merged".into());
    root_folder.join(format!("{name}_merged.pdf"))
}

/// Append `.pdf` unless the path already ends with it (any case).
pub fn ensure_pdf_extension(path: PathBuf) -> PathBuf {
    let has_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if has_pdf {
        return path;
    }
    let mut raw: OsString = path.into_os_string();
    raw.push(".pdf");
    PathBuf::from(raw)
}
