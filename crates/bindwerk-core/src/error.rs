// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bindwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bindwerk operations.
#[derive(Debug, Error)]
pub enum BindwerkError {
    // -- Configuration errors --
    #[error("input path is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Assembly errors --
    #[error("nothing to merge: no pages were assembled")]
    NothingToMerge,

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("invalid outline: {0}")]
    InvalidOutline(String),

    #[error("invalid page range: {0}")]
    InvalidPageRange(String),

    // -- Background worker --
    #[error("merge worker failed: {0}")]
    Worker(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BindwerkError>;
