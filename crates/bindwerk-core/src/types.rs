// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bindwerk folder binder.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BindwerkError;

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl DocumentType {
    /// Infer document type from a file extension (without the dot).
    ///
    /// Matching is case-insensitive. Anything outside the supported set
    /// returns `None` and is ignored during assembly.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Whether this is a raster image that must be synthesized into a page.
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// Standard paper sizes used for fitted image pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_pt: u32, height_pt: u32 },
}

impl PaperSize {
    /// Dimensions in PDF user-space units (points), width then height.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::A3 => (842.0, 1191.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt as f32, *height_pt as f32),
        }
    }
}

impl FromStr for PaperSize {
    type Err = BindwerkError;

    /// Accepts `a4`, `a3`, `a5`, `letter`, `legal`, or `<width>x<height>` in points.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    BindwerkError::InvalidConfig(format!("unknown paper size '{s}'"))
                })?;
                let parse = |v: &str| {
                    v.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                        BindwerkError::InvalidConfig(format!("invalid paper dimension '{v}'"))
                    })
                };
                Ok(Self::Custom {
                    width_pt: parse(w)?,
                    height_pt: parse(h)?,
                })
            }
        }
    }
}

/// One bookmark in the output outline.
///
/// `start_page` is 1-based and always indexes a page contributed by the
/// entry's file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: u32,
    pub title: String,
    pub start_page: usize,
}

impl OutlineEntry {
    pub fn new(level: u32, title: impl Into<String>, start_page: usize) -> Self {
        Self {
            level,
            title: title.into(),
            start_page,
        }
    }
}

impl fmt::Display for OutlineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} -> p.{}", self.level, self.title, self.start_page)
    }
}

/// Inclusive physical page range, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse a range such as `5-10`, `7`, `12-` (to the end) or `-5` (from
    /// the first page), validated against a document of `total_pages`.
    pub fn parse(text: &str, total_pages: u32) -> Result<Self, BindwerkError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BindwerkError::InvalidPageRange(
                "page range must not be empty".into(),
            ));
        }

        let number = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                BindwerkError::InvalidPageRange(format!(
                    "invalid page number format '{text}'; use 5-10, 7, 12- or -5"
                ))
            })
        };

        let (start, end) = match text.split_once('-') {
            Some((start, end)) => {
                let start = if start.trim().is_empty() { 1 } else { number(start)? };
                let end = if end.trim().is_empty() {
                    total_pages
                } else {
                    number(end)?
                };
                (start, end)
            }
            None => {
                let page = number(text)?;
                (page, page)
            }
        };

        if start > end {
            return Err(BindwerkError::InvalidPageRange(format!(
                "start page ({start}) is greater than end page ({end})"
            )));
        }
        if start < 1 || end > total_pages {
            return Err(BindwerkError::InvalidPageRange(format!(
                "range '{text}' is outside 1 to {total_pages}"
            )));
        }

        Ok(Self { start, end })
    }

    /// Number of pages covered by the range.
    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

/// Result of a successful merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSummary {
    pub output_path: PathBuf,
    pub total_pages: usize,
    pub outline: Vec<OutlineEntry>,
    pub files_merged: usize,
    pub files_failed: usize,
    pub folders_pruned: usize,
}

/// Result of a successful page-range split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSummary {
    pub output_path: PathBuf,
    pub range: PageRange,
    pub pages: usize,
}
