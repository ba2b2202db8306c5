// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-range splitter — copy a contiguous run of pages out of one PDF.

use std::path::{Path, PathBuf};

use bindwerk_core::config::ensure_pdf_extension;
use bindwerk_core::error::BindwerkError;
use bindwerk_core::{PageRange, SplitSummary};
use tracing::{info, instrument};

use crate::pdf::{AssembledDocument, DocumentWriter, PdfReader};
use crate::progress::Progress;
use crate::source::normalize_path;

/// Extract the pages named by `range_text` (`5-10`, `7`, `12-`, `-5`) from
/// `input` into a new PDF.
///
/// Without an explicit `output` the result lands next to the input as
/// `<stem>_pages_<start>-<end>.pdf`.
#[instrument(skip_all, fields(input = %input.as_ref().display(), range = range_text))]
pub fn split_pages(
    input: impl AsRef<Path>,
    range_text: &str,
    output: Option<PathBuf>,
    mut progress: impl FnMut(Progress),
) -> Result<SplitSummary, BindwerkError> {
    let input = input.as_ref();
    let reader = PdfReader::open(input)?;
    let total = u32::try_from(reader.page_count()).map_err(|_| {
        BindwerkError::UnsupportedDocument(format!("{} has too many pages", input.display()))
    })?;
    let range = PageRange::parse(range_text, total)?;

    let output_path = match output {
        Some(path) => ensure_pdf_extension(path),
        None => default_split_path(input, range),
    };

    progress(Progress::Extracting {
        start: range.start,
        end: range.end,
    });

    let mut assembled = AssembledDocument::new();
    let pages = assembled.append_range(reader.into_document(), input, range)?;

    let title = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let report = DocumentWriter::new()
        .with_title(format!("{title} (pages {}-{})", range.start, range.end))
        .write(assembled, &[], &output_path)?;

    progress(Progress::Completed {
        total_pages: report.pages,
        output: report.path.clone(),
    });
    info!(pages, output = %report.path.display(), "Pages extracted");

    Ok(SplitSummary {
        output_path: report.path,
        range,
        pages,
    })
}

fn default_split_path(input: &Path, range: PageRange) -> PathBuf {
    let absolute = normalize_path(input);
    let stem = absolute
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    let name = format!("{stem}_pages_{}-{}.pdf", range.start, range.end);
    match absolute.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
