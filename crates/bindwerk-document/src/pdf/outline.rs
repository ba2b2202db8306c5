// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outline (bookmark) encoding — turns the flat `(level, title, start page)`
// list built during assembly into the PDF outline tree.

use bindwerk_core::OutlineEntry;
use bindwerk_core::error::BindwerkError;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use tracing::debug;

/// Position of one entry in the outline tree.
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Check the flat list forms a valid hierarchy over `page_count` pages:
/// starts at level 1, never skips a level going down, and every start page
/// exists.
pub fn validate(entries: &[OutlineEntry], page_count: usize) -> Result<(), BindwerkError> {
    let mut previous_level = 0;
    for (index, entry) in entries.iter().enumerate() {
        if entry.level == 0 || entry.level > previous_level + 1 {
            return Err(BindwerkError::InvalidOutline(format!(
                "entry {} ('{}') jumps from level {} to {}",
                index, entry.title, previous_level, entry.level
            )));
        }
        if entry.start_page == 0 || entry.start_page > page_count {
            return Err(BindwerkError::InvalidOutline(format!(
                "entry '{}' targets page {} of {}",
                entry.title, entry.start_page, page_count
            )));
        }
        previous_level = entry.level;
    }
    Ok(())
}

/// Build the outline tree for `entries` and attach it to the catalog.
///
/// `page_ids` are the output pages in order; entry start pages index into it.
/// Returns the `/Outlines` root, or `None` when there are no entries.
pub fn apply_outline(
    document: &mut Document,
    catalog_id: ObjectId,
    page_ids: &[ObjectId],
    entries: &[OutlineEntry],
) -> Result<Option<ObjectId>, BindwerkError> {
    if entries.is_empty() {
        return Ok(None);
    }
    validate(entries, page_ids.len())?;

    // -- Tree shape ----------------------------------------------------------

    let mut nodes: Vec<Node> = Vec::with_capacity(entries.len());
    let mut roots: Vec<usize> = Vec::new();
    // Open node at each depth; `open[d]` is the latest node at level d + 1.
    let mut open: Vec<usize> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        open.truncate(entry.level as usize - 1);
        let parent = open.last().copied();
        match parent {
            Some(p) => nodes[p].children.push(index),
            None => roots.push(index),
        }
        nodes.push(Node {
            parent,
            children: Vec::new(),
        });
        open.push(index);
    }

    // Children always follow their parent, so a reverse sweep sees every
    // subtree complete before its parent.
    let mut descendants = vec![0i64; nodes.len()];
    for index in (0..nodes.len()).rev() {
        descendants[index] = nodes[index]
            .children
            .iter()
            .map(|&child| 1 + descendants[child])
            .sum();
    }

    // -- Objects --------------------------------------------------------------

    let root_id = document.new_object_id();
    let ids: Vec<ObjectId> = entries.iter().map(|_| document.new_object_id()).collect();

    for (index, entry) in entries.iter().enumerate() {
        let node = &nodes[index];
        let mut item = Dictionary::new();
        item.set("Title", text_string(&entry.title));
        item.set(
            "Parent",
            Object::Reference(node.parent.map_or(root_id, |p| ids[p])),
        );
        item.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(page_ids[entry.start_page - 1]),
                Object::Name(b"XYZ".to_vec()),
                Object::Null,
                Object::Null,
                Object::Null,
            ]),
        );
        if let (Some(&first), Some(&last)) = (node.children.first(), node.children.last()) {
            item.set("First", Object::Reference(ids[first]));
            item.set("Last", Object::Reference(ids[last]));
            item.set("Count", Object::Integer(descendants[index]));
        }
        document.objects.insert(ids[index], Object::Dictionary(item));
    }

    link_siblings(document, &roots, &ids);
    for node in &nodes {
        link_siblings(document, &node.children, &ids);
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    if let (Some(&first), Some(&last)) = (roots.first(), roots.last()) {
        root.set("First", Object::Reference(ids[first]));
        root.set("Last", Object::Reference(ids[last]));
    }
    root.set("Count", Object::Integer(entries.len() as i64));
    document.objects.insert(root_id, Object::Dictionary(root));

    let catalog = document.get_dictionary_mut(catalog_id).map_err(|err| {
        BindwerkError::PdfError(format!("output catalog missing: {}", err))
    })?;
    catalog.set("Outlines", Object::Reference(root_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    debug!(entries = entries.len(), top_level = roots.len(), "Outline applied");
    Ok(Some(root_id))
}

/// Set `/Prev` and `/Next` along one sibling list.
fn link_siblings(document: &mut Document, siblings: &[usize], ids: &[ObjectId]) {
    for pair in siblings.windows(2) {
        let (before, after) = (ids[pair[0]], ids[pair[1]]);
        if let Ok(item) = document.get_dictionary_mut(before) {
            item.set("Next", Object::Reference(after));
        }
        if let Ok(item) = document.get_dictionary_mut(after) {
            item.set("Prev", Object::Reference(before));
        }
    }
}

/// Encode a PDF text string: plain literal for ASCII, UTF-16BE with a byte
/// order mark otherwise.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
