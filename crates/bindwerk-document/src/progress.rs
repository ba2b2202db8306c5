// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress events emitted while a merge or split runs. Each event renders as
// one human-readable line.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// Traversal of `root` is about to begin.
    Started { root: PathBuf, resize_images: bool },
    /// Entering a subfolder, relative to the root.
    EnteringFolder { relative: PathBuf },
    ProcessingFile { name: String },
    /// A file contributed `pages` pages.
    Merged { name: String, pages: usize },
    /// A folder contributed nothing and lost its outline entry.
    FolderPruned { name: String },
    /// A file or folder could not be read; it contributes zero pages.
    EntryFailed { path: PathBuf, reason: String },
    Writing { output: PathBuf },
    Extracting { start: u32, end: u32 },
    Completed { total_pages: usize, output: PathBuf },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                root,
                resize_images,
            } => write!(
                f,
                "Merging {} (images {})",
                root.display(),
                if *resize_images { "fitted to page" } else { "at native size" }
            ),
            Self::EnteringFolder { relative } => {
                write!(f, "Entering folder: {}", relative.display())
            }
            Self::ProcessingFile { name } => write!(f, "  Processing file: {name}"),
            Self::Merged { name, pages } => {
                let unit = if *pages == 1 { "page" } else { "pages" };
                write!(f, "  Added {name} ({pages} {unit})")
            }
            Self::FolderPruned { name } => write!(f, "  Skipped empty folder: {name}"),
            Self::EntryFailed { path, reason } => {
                write!(f, "  Could not process {}: {reason}", path.display())
            }
            Self::Writing { output } => write!(f, "Writing {}", output.display()),
            Self::Extracting { start, end } => write!(f, "Extracting pages {start}-{end}"),
            Self::Completed {
                total_pages,
                output,
            } => write!(
                f,
                "Done. {total_pages} pages saved to {}",
                output.display()
            ),
        }
    }
}
