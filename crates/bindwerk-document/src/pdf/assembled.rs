// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The in-progress output document: an append-only page stream backed by a
// single lopdf `Document` with a flat page tree.

use std::path::{Path, PathBuf};

use bindwerk_core::PageRange;
use bindwerk_core::error::BindwerkError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

/// Attributes a page may inherit from its ancestors in the page tree. They are
/// copied onto the page before it is re-parented into the output tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// One page of the output plus the source file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub object_id: ObjectId,
    pub source: PathBuf,
}

/// Ordered page stream accumulated during traversal.
pub struct AssembledDocument {
    document: Document,
    catalog_id: ObjectId,
    pages_id: ObjectId,
    pages: Vec<Page>,
}

impl AssembledDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");

        let pages_id = document.new_object_id();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(Vec::new()));
        pages.set("Count", Object::Integer(0));
        document.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = document.add_object(catalog);
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            catalog_id,
            pages_id,
            pages: Vec::new(),
        }
    }

    /// Total pages appended so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Append every page of `source`, in its existing order.
    ///
    /// Returns the number of pages appended. On error nothing is appended.
    pub fn append(&mut self, source: Document, origin: &Path) -> Result<usize, BindwerkError> {
        self.append_selected(source, origin, |_| true)
    }

    /// Append the pages of `source` that fall inside `range`.
    pub fn append_range(
        &mut self,
        source: Document,
        origin: &Path,
        range: PageRange,
    ) -> Result<usize, BindwerkError> {
        self.append_selected(source, origin, |number| range.contains(number))
    }

    fn append_selected(
        &mut self,
        mut source: Document,
        origin: &Path,
        keep: impl Fn(u32) -> bool,
    ) -> Result<usize, BindwerkError> {
        // Move the source's object ids past ours so both graphs can coexist.
        source.renumber_objects_with(self.document.max_id + 1);

        let selected: Vec<ObjectId> = source
            .get_pages()
            .into_iter()
            .filter(|(number, _)| keep(*number))
            .map(|(_, id)| id)
            .collect();
        if selected.is_empty() {
            return Ok(0);
        }

        for &page_id in &selected {
            let inherited = inherited_attributes(&source, page_id);
            let page = source.get_dictionary_mut(page_id).map_err(|err| {
                BindwerkError::PdfError(format!(
                    "page object {:?} in {} is not a dictionary: {}",
                    page_id,
                    origin.display(),
                    err
                ))
            })?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(self.pages_id));
        }

        // The source catalog and page tree become unreachable and are pruned
        // when the document is written.
        self.document.max_id = self.document.max_id.max(source.max_id);
        self.document.objects.extend(source.objects);
        self.pages.extend(selected.iter().map(|&object_id| Page {
            object_id,
            source: origin.to_path_buf(),
        }));

        debug!(
            source = %origin.display(),
            appended = selected.len(),
            total = self.pages.len(),
            "Pages appended"
        );
        Ok(selected.len())
    }

    /// Write `/Kids` and `/Count` from the page list.
    fn build_page_tree(&mut self) {
        let kids: Vec<Object> = self
            .pages
            .iter()
            .map(|page| Object::Reference(page.object_id))
            .collect();
        if let Ok(pages) = self.document.get_dictionary_mut(self.pages_id) {
            pages.set("Count", Object::Integer(kids.len() as i64));
            pages.set("Kids", Object::Array(kids));
        }
    }

    /// Split into the raw document, its catalog id, and page ids in order.
    /// Writes the page tree.
    pub(crate) fn into_parts(mut self) -> (Document, ObjectId, Vec<ObjectId>) {
        self.build_page_tree();
        let page_ids = self.pages.iter().map(|page| page.object_id).collect();
        (self.document, self.catalog_id, page_ids)
    }
}

impl Default for AssembledDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect inheritable attributes the page does not set itself, nearest
/// ancestor first.
fn inherited_attributes(source: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let Ok(page) = source.get_dictionary(page_id) else {
        return found;
    };

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        depth += 1;

        let Ok(node) = source.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}
