// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bindwerk-document — Folder-tree assembly engine for Bindwerk.
//
// Walks a directory tree in natural order, appends every PDF page and one
// synthesized page per raster image into a single document, builds an outline
// mirroring the folder structure, and writes the result with compaction.
// Also hosts the page-range splitter.

pub mod assemble;
pub mod image;
pub mod merge;
pub mod pdf;
pub mod progress;
pub mod sequence;
pub mod source;
pub mod split;
pub mod worker;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the primary entry points so callers can use `bindwerk_document::merge_folder` etc.
pub use self::image::synth::{PageSynthesizer, Placement};
pub use assemble::{Assembly, AssemblyStats, TreeAssembler};
pub use merge::merge_folder;
pub use pdf::{AssembledDocument, DocumentWriter, PdfReader};
pub use progress::Progress;
pub use sequence::{natural_cmp, sort_natural};
pub use split::split_pages;
pub use worker::{MergeEvent, MergeHandle, spawn_merge};
