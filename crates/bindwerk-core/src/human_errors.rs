// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the terminal outcome of a merge or split.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the CLI presents the failure.

use std::io::ErrorKind;

use crate::error::BindwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something went wrong that might not happen again (disk busy, worker crash).
    Transient,
    /// User must change something (pick another folder, fix a range).
    ActionRequired,
    /// Cannot be fixed by retrying: the input is damaged or invalid.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl HumanError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }
}

/// Convert a `BindwerkError` into a `HumanError`.
pub fn humanize_error(err: &BindwerkError) -> HumanError {
    match err {
        BindwerkError::InvalidRoot(path) => HumanError::new(
            "The input folder doesn't exist or isn't a folder.",
            format!("Check the path and try again: {}", path.display()),
            Severity::ActionRequired,
        ),

        BindwerkError::InvalidConfig(detail) => HumanError::new(
            "The merge settings don't make sense.",
            format!("Adjust the settings and try again. ({detail})"),
            Severity::ActionRequired,
        ),

        BindwerkError::NothingToMerge => HumanError::new(
            "Nothing was merged.",
            "The folder contains no readable PDF or image files (pdf, jpg, jpeg, png, bmp, tiff).",
            Severity::ActionRequired,
        ),

        BindwerkError::UnsupportedDocument(detail) => HumanError::new(
            "This type of document isn't supported.",
            format!("Convert the file to PDF first. (File type: {detail})"),
            Severity::Permanent,
        ),

        BindwerkError::PdfError(_) => HumanError::new(
            "There's a problem with a PDF file.",
            "The file may be damaged or password protected. Try opening it in a viewer first.",
            Severity::Permanent,
        ),

        BindwerkError::ImageError(_) => HumanError::new(
            "There's a problem with an image.",
            "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.",
            Severity::Permanent,
        ),

        BindwerkError::InvalidOutline(_) => HumanError::new(
            "The bookmark structure couldn't be built.",
            "Please report this, together with the folder layout you were merging.",
            Severity::Permanent,
        ),

        BindwerkError::InvalidPageRange(detail) => HumanError::new(
            "The page range isn't valid.",
            format!("Use a range like 5-10, 7, 12- or -5. ({detail})"),
            Severity::ActionRequired,
        ),

        BindwerkError::Worker(_) => HumanError::new(
            "The merge stopped unexpectedly.",
            "Try again. If this keeps happening, run with --verbose and report the log.",
            Severity::Transient,
        ),

        BindwerkError::Io(io_err) => match io_err.kind() {
            ErrorKind::NotFound => HumanError::new(
                "A file or folder couldn't be found.",
                "It may have been moved or deleted. Check the paths and try again.",
                Severity::ActionRequired,
            ),
            ErrorKind::PermissionDenied => HumanError::new(
                "Permission denied while writing the output.",
                "Choose an output location you are allowed to write to.",
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, the disk may be full.",
                Severity::Transient,
            ),
        },

        BindwerkError::Serialization(_) => HumanError::new(
            "The options file couldn't be read.",
            "Check that it is valid JSON with the keys resize_images, paper_size and margin_pt.",
            Severity::ActionRequired,
        ),
    }
}
