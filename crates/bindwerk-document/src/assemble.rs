// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tree assembler — depth-first walk of the root folder in natural order.
//
// Every PDF contributes all of its pages, every decodable image contributes
// one synthesized page, and each contributing file or folder gets an outline
// entry pointing at its first page. A folder's entry is added before its
// contents are visited and removed again if the folder added no pages, which
// prunes empty subtrees at every depth.
//
// Failures are local: an unreadable file or folder listing is logged,
// reported as a progress event, and contributes nothing.

use std::path::{Path, PathBuf};

use bindwerk_core::error::BindwerkError;
use bindwerk_core::{DocumentType, MergeConfig, OutlineEntry};
use lopdf::Document;
use tracing::{debug, info, warn};

use crate::image::{PageSynthesizer, Placement};
use crate::pdf::{AssembledDocument, PdfReader};
use crate::progress::Progress;
use crate::source::{SourceNode, normalize_path, read_children};

/// Counters reported alongside the assembled document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub files_merged: usize,
    pub files_failed: usize,
    pub folders_pruned: usize,
}

/// Everything the traversal produced.
pub struct Assembly {
    pub document: AssembledDocument,
    pub outline: Vec<OutlineEntry>,
    pub stats: AssemblyStats,
}

pub struct TreeAssembler<'a, F>
where
    F: FnMut(Progress),
{
    config: &'a MergeConfig,
    synthesizer: PageSynthesizer,
    placement: Placement,
    /// Normalized output path; never read back as an input.
    excluded: PathBuf,
    /// Canonical paths of the folders currently being visited.
    ancestors: Vec<PathBuf>,
    progress: F,
    build: Assembly,
}

impl<'a, F> TreeAssembler<'a, F>
where
    F: FnMut(Progress),
{
    pub fn new(config: &'a MergeConfig, progress: F) -> Self {
        let placement = if config.resize_images {
            Placement::Fitted
        } else {
            Placement::Native
        };
        Self {
            config,
            synthesizer: PageSynthesizer::from_config(config),
            placement,
            excluded: normalize_path(&config.output_path),
            ancestors: Vec::new(),
            progress,
            build: Assembly {
                document: AssembledDocument::new(),
                outline: Vec::new(),
                stats: AssemblyStats::default(),
            },
        }
    }

    /// Walk the whole tree. Children of the root are outline level 1.
    pub fn assemble(mut self) -> Assembly {
        let root = self.config.root_folder.clone();
        self.visit_directory(&root, 1);

        info!(
            pages = self.build.document.page_count(),
            outline_entries = self.build.outline.len(),
            files_merged = self.build.stats.files_merged,
            files_failed = self.build.stats.files_failed,
            folders_pruned = self.build.stats.folders_pruned,
            "Traversal finished"
        );
        self.build
    }

    // -- Traversal ------------------------------------------------------------

    fn visit_directory(&mut self, dir: &Path, level: u32) {
        let identity = std::fs::canonicalize(dir).unwrap_or_else(|_| normalize_path(dir));
        if self.ancestors.contains(&identity) {
            self.report_failure(dir, "folder links back to one of its parents".into());
            return;
        }

        let children = match read_children(dir) {
            Ok(children) => children,
            Err(err) => {
                self.report_failure(dir, format!("cannot list folder: {err}"));
                return;
            }
        };
        debug!(path = %dir.display(), level, children = children.len(), "Visiting folder");

        self.ancestors.push(identity);
        for child in &children {
            self.visit_node(child, level);
        }
        self.ancestors.pop();
    }

    fn visit_node(&mut self, node: &SourceNode, level: u32) {
        if normalize_path(node.path()) == self.excluded {
            debug!(path = %node.path().display(), "Skipping the output file");
            return;
        }

        match node {
            SourceNode::Directory { .. } => self.visit_subfolder(node, level),
            SourceNode::Leaf { .. } => match node.document_type() {
                Some(kind) => self.merge_file(node, kind, level),
                None => debug!(path = %node.path().display(), "Ignoring unsupported file"),
            },
        }
    }

    fn visit_subfolder(&mut self, node: &SourceNode, level: u32) {
        let relative = node
            .path()
            .strip_prefix(&self.config.root_folder)
            .unwrap_or(node.path())
            .to_path_buf();
        (self.progress)(Progress::EnteringFolder { relative });

        let pages_before = self.build.document.page_count();
        let mark = self.build.outline.len();
        self.build
            .outline
            .push(OutlineEntry::new(level, node.title(), pages_before + 1));

        self.visit_directory(node.path(), level + 1);

        if self.build.document.page_count() == pages_before {
            self.build.outline.truncate(mark);
            self.build.stats.folders_pruned += 1;
            debug!(folder = node.name(), level, "Folder contributed no pages");
            (self.progress)(Progress::FolderPruned {
                name: node.name().to_string(),
            });
        }
    }

    fn merge_file(&mut self, node: &SourceNode, kind: DocumentType, level: u32) {
        (self.progress)(Progress::ProcessingFile {
            name: node.name().to_string(),
        });

        let pages_before = self.build.document.page_count();
        let appended = self
            .load(node.path(), kind)
            .and_then(|source| self.build.document.append(source, node.path()));

        match appended {
            Ok(0) => self.file_failed(node, "document has no pages".into()),
            Ok(pages) => {
                self.build
                    .outline
                    .push(OutlineEntry::new(level, node.title(), pages_before + 1));
                self.build.stats.files_merged += 1;
                debug!(file = node.name(), pages, start_page = pages_before + 1, "File merged");
                (self.progress)(Progress::Merged {
                    name: node.name().to_string(),
                    pages,
                });
            }
            Err(err) => self.file_failed(node, err.to_string()),
        }
    }

    /// Read one source into memory. The file handle is closed on return.
    fn load(&self, path: &Path, kind: DocumentType) -> Result<Document, BindwerkError> {
        if kind.is_image() {
            self.synthesizer.synthesize_file(path, self.placement)
        } else {
            PdfReader::open(path).map(PdfReader::into_document)
        }
    }

    fn file_failed(&mut self, node: &SourceNode, reason: String) {
        self.build.stats.files_failed += 1;
        self.report_failure(node.path(), reason);
    }

    fn report_failure(&mut self, path: &Path, reason: String) {
        warn!(path = %path.display(), %reason, "Entry skipped");
        (self.progress)(Progress::EntryFailed {
            path: path.to_path_buf(),
            reason,
        });
    }
}
