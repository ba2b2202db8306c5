// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures — small PDFs and images built in memory, plus helpers that
// read an outline back out of a written document.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use bindwerk_core::OutlineEntry;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// A document with `pages` text pages. `MediaBox` and `Resources` live on the
/// `/Pages` node only, so appending has to carry them down to each page.
pub fn pdf_document(pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(pages);
    for number in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 720 Td (Page {number}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let tree = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    };
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn write_pdf(path: &Path, pages: usize) {
    pdf_document(pages).save(path).unwrap();
}

/// Encoded PNG bytes of a solid `width` x `height` image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Encoded PNG bytes of a solid RGBA image with the given alpha.
pub fn rgba_png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, alpha]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Write a solid image; the format follows the file extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([40, 120, 200]))
        .save(path)
        .unwrap();
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise bytes as UTF-8).
pub fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Flatten the document outline back into depth-first `(level, title, page)`
/// entries.
pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
    let page_numbers: BTreeMap<ObjectId, usize> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number as usize))
        .collect();

    let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(root_id).unwrap();
    let Ok(outlines) = catalog.get(b"Outlines").and_then(Object::as_reference) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let first = doc
        .get_dictionary(outlines)
        .unwrap()
        .get(b"First")
        .and_then(Object::as_reference)
        .ok();
    collect(doc, &page_numbers, first, 1, &mut entries);
    entries
}

fn collect(
    doc: &Document,
    page_numbers: &BTreeMap<ObjectId, usize>,
    mut current: Option<ObjectId>,
    level: u32,
    entries: &mut Vec<OutlineEntry>,
) {
    while let Some(id) = current {
        let item = doc.get_dictionary(id).unwrap();
        let title = decode_text(item.get(b"Title").unwrap().as_str().unwrap());
        let dest = item.get(b"Dest").unwrap().as_array().unwrap();
        let page_id = dest[0].as_reference().unwrap();
        entries.push(OutlineEntry::new(level, title, page_numbers[&page_id]));

        let child = item.get(b"First").and_then(Object::as_reference).ok();
        collect(doc, page_numbers, child, level + 1, entries);
        current = item.get(b"Next").and_then(Object::as_reference).ok();
    }
}
