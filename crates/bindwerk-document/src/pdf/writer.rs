// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer — applies the outline to the assembled page stream and
// serialises it with structural compaction.
//
// Output is written to a temporary file next to the destination and renamed
// into place, so a failed write never leaves a partial file behind.

use std::path::{Path, PathBuf};

use bindwerk_core::OutlineEntry;
use bindwerk_core::error::BindwerkError;
use lopdf::{Dictionary, Document, Object};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use super::assembled::AssembledDocument;
use super::outline::{apply_outline, text_string};

/// What ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: u64,
}

/// Serialises assembled documents.
pub struct DocumentWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    /// Apply `outline` and write the document to `path`.
    ///
    /// Refuses to write an empty document. Missing parent directories of
    /// `path` are created.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), pages = assembled.page_count()))]
    pub fn write(
        &self,
        assembled: AssembledDocument,
        outline: &[OutlineEntry],
        path: impl AsRef<Path>,
    ) -> Result<WriteReport, BindwerkError> {
        let path = path.as_ref();
        let pages = assembled.page_count();
        if pages == 0 {
            return Err(BindwerkError::NothingToMerge);
        }

        let (mut document, catalog_id, page_ids) = assembled.into_parts();
        apply_outline(&mut document, catalog_id, &page_ids, outline)?;
        self.apply_info(&mut document);
        compact(&mut document);

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        document.save_to(&mut staged).map_err(|err| {
            BindwerkError::PdfError(format!("failed to serialise {}: {}", path.display(), err))
        })?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| BindwerkError::Io(err.error))?;

        let bytes = std::fs::metadata(path)?.len();
        info!(pages, bytes, outline_entries = outline.len(), "PDF written");

        Ok(WriteReport {
            path: path.to_path_buf(),
            pages,
            bytes,
        })
    }

    fn apply_info(&self, document: &mut Document) {
        let mut info = Dictionary::new();
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        info.set("Producer", text_string(concat!("bindwerk ", env!("CARGO_PKG_VERSION"))));
        let info_id = document.add_object(info);
        document.trailer.set("Info", Object::Reference(info_id));
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop unreachable objects, renumber densely, and Flate-compress streams.
fn compact(document: &mut Document) {
    let pruned = document.prune_objects();
    document.renumber_objects();
    document.compress();
    debug!(pruned = pruned.len(), objects = document.objects.len(), "Document compacted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn assembled(pages: usize) -> AssembledDocument {
        let mut doc = AssembledDocument::new();
        doc.append(fixtures::pdf_document(pages), Path::new("src.pdf")).unwrap();
        doc
    }

    #[test]
    fn refuses_empty_document_without_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out.pdf");

        let result = DocumentWriter::new().write(AssembledDocument::new(), &[], &out);
        assert!(matches!(result, Err(BindwerkError::NothingToMerge)));
        assert!(!out.exists());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b").join("out.pdf");

        let report = DocumentWriter::new().write(assembled(2), &[], &out).unwrap();
        assert_eq!(report.pages, 2);
        assert!(report.bytes > 0);
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 2);
    }

    #[test]
    fn outline_is_written_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let outline = vec![
            OutlineEntry::new(1, "Contracts", 1),
            OutlineEntry::new(2, "lease", 1),
            OutlineEntry::new(2, "annex", 3),
        ];

        DocumentWriter::new()
            .with_title("Contracts")
            .write(assembled(3), &outline, &out)
            .unwrap();

        let written = Document::load(&out).unwrap();
        assert_eq!(fixtures::read_outline(&written), outline);
    }

    #[test]
    fn invalid_outline_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let outline = vec![OutlineEntry::new(1, "past the end", 9)];

        let result = DocumentWriter::new().write(assembled(1), &outline, &out);
        assert!(matches!(result, Err(BindwerkError::InvalidOutline(_))));
        assert!(!out.exists());
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        std::fs::write(&out, b"stale").unwrap();

        DocumentWriter::new().write(assembled(1), &[], &out).unwrap();
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 1);
        // Only the output remains; the staging file was renamed away.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
