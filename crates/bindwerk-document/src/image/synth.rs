// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page synthesizer — turns one raster image into exactly one PDF page using
// `printpdf` 0.8, then hands the page to lopdf for assembly.
//
// Two placements:
//   Fitted: a standard page (A4 by default); the image is scaled to fit the
//           page interior inset by a fixed margin, aspect ratio preserved,
//           centred in the drawable area. Upscaling is allowed.
//   Native: the page is the image's own size at 72 dpi (1 px = 1 pt) and the
//           image fills it edge to edge.

use std::path::Path;

use bindwerk_core::error::BindwerkError;
use bindwerk_core::{MergeConfig, PaperSize};
use image::DynamicImage;
use lopdf::Document;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, instrument};

use crate::pdf::PdfReader;

/// Resolution handed to printpdf, so one pixel is one point.
const NATIVE_DPI: f32 = 72.0;

/// How an image is placed on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fitted,
    Native,
}

/// Width and height in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Shrink by `margin` on all four sides.
    pub fn inset(self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width: self.width - 2.0 * margin,
            height: self.height - 2.0 * margin,
        }
    }

    /// Scale `size` to fit inside `self` keeping its aspect ratio, centred.
    pub fn fit(self, size: Size) -> Self {
        let scale = (self.width / size.width).min(self.height / size.height);
        let width = size.width * scale;
        let height = size.height * scale;
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Page size and image rectangle for one synthesized page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page: Size,
    pub image: Rect,
}

/// Builds single-page PDFs from raster images.
pub struct PageSynthesizer {
    /// Page size for fitted placement.
    paper_size: PaperSize,
    /// Margin around fitted images, in points.
    margin_pt: f32,
}

impl PageSynthesizer {
    pub fn new(paper_size: PaperSize, margin_pt: f32) -> Self {
        Self {
            paper_size,
            margin_pt,
        }
    }

    /// A4 with the standard 36 pt margin.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4, bindwerk_core::config::DEFAULT_MARGIN_PT)
    }

    pub fn from_config(config: &MergeConfig) -> Self {
        Self::new(config.paper_size, config.margin_pt)
    }

    /// Compute where an image of `image` points goes.
    pub fn layout(&self, image: Size, placement: Placement) -> PageLayout {
        match placement {
            Placement::Fitted => {
                let (width, height) = self.paper_size.dimensions_pt();
                let page = Size { width, height };
                let drawable = Rect::from_size(page).inset(self.margin_pt);
                PageLayout {
                    page,
                    image: drawable.fit(image),
                }
            }
            Placement::Native => PageLayout {
                page: image,
                image: Rect::from_size(image),
            },
        }
    }

    /// Decode the image at `path` and synthesize its page.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn synthesize_file(
        &self,
        path: &Path,
        placement: Placement,
    ) -> Result<Document, BindwerkError> {
        let bytes = std::fs::read(path)?;
        self.synthesize(&bytes, placement)
    }

    /// Decode encoded image bytes (JPEG, PNG, BMP, TIFF) and synthesize a
    /// one-page document. Undecodable input is an `ImageError`.
    pub fn synthesize(
        &self,
        image_bytes: &[u8],
        placement: Placement,
    ) -> Result<Document, BindwerkError> {
        let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
            BindwerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        if dynamic_image.width() == 0 || dynamic_image.height() == 0 {
            return Err(BindwerkError::ImageError("image has no pixels".into()));
        }

        let pdf_bytes = self.render(dynamic_image, placement);
        let reader = PdfReader::from_bytes(&pdf_bytes)?;
        if reader.page_count() != 1 {
            return Err(BindwerkError::PdfError(format!(
                "synthesized {} pages for one image",
                reader.page_count()
            )));
        }
        Ok(reader.into_document())
    }

    fn render(&self, dynamic_image: DynamicImage, placement: Placement) -> Vec<u8> {
        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;
        let native = Size {
            width: img_width as f32,
            height: img_height as f32,
        };
        let layout = self.layout(native, placement);

        // Alpha survives as a soft mask; everything else is flattened to RGB.
        let (pixels, data_format) = if dynamic_image.color().has_alpha() {
            (dynamic_image.to_rgba8().into_raw(), RawImageFormat::RGBA8)
        } else {
            (dynamic_image.to_rgb8().into_raw(), RawImageFormat::RGB8)
        };
        let raw = RawImage {
            pixels: RawImageData::U8(pixels),
            width: img_width,
            height: img_height,
            data_format,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new("Bindwerk Image");
        let xobject_id = doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(layout.image.x)),
                translate_y: Some(Pt(layout.image.y)),
                scale_x: Some(layout.image.width / native.width),
                scale_y: Some(layout.image.height / native.height),
                dpi: Some(NATIVE_DPI),
                rotate: None,
            },
        }];

        let page = PdfPage::new(pt_to_mm(layout.page.width), pt_to_mm(layout.page.height), ops);
        doc.with_pages(vec![page]);

        debug!(
            ?placement,
            page_w = layout.page.width,
            page_h = layout.page.height,
            image_w = layout.image.width,
            image_h = layout.image.height,
            "Image placed on page"
        );

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        doc.save(&PdfSaveOptions::default(), &mut warnings)
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn media_box(doc: &Document) -> Vec<f32> {
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        page.get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect()
    }

    #[test]
    fn fitted_wide_image_fills_drawable_width() {
        let synth = PageSynthesizer::a4();
        let layout = synth.layout(Size { width: 1000.0, height: 500.0 }, Placement::Fitted);

        assert_eq!(layout.page, Size { width: 595.0, height: 842.0 });
        assert!(close(layout.image.width, 523.0));
        assert!(close(layout.image.height, 261.5));
        assert!(close(layout.image.x, 36.0));
        assert!(close(layout.image.y, 36.0 + (770.0 - 261.5) / 2.0));
    }

    #[test]
    fn fitted_tall_image_is_height_bound_and_centred() {
        let synth = PageSynthesizer::a4();
        let layout = synth.layout(Size { width: 100.0, height: 1000.0 }, Placement::Fitted);

        assert!(close(layout.image.height, 770.0));
        assert!(close(layout.image.width, 77.0));
        assert!(close(layout.image.x, 36.0 + (523.0 - 77.0) / 2.0));
        assert!(close(layout.image.y, 36.0));
    }

    #[test]
    fn fitted_small_image_is_upscaled() {
        let synth = PageSynthesizer::a4();
        let layout = synth.layout(Size { width: 10.0, height: 10.0 }, Placement::Fitted);
        assert!(close(layout.image.width, 523.0));
        assert!(close(layout.image.height, 523.0));
    }

    #[test]
    fn native_page_matches_image() {
        let synth = PageSynthesizer::a4();
        let size = Size { width: 640.0, height: 480.0 };
        let layout = synth.layout(size, Placement::Native);
        assert_eq!(layout.page, size);
        assert_eq!(layout.image, Rect::from_size(size));
    }

    #[test]
    fn synthesizes_one_fitted_page() {
        let synth = PageSynthesizer::a4();
        let png = crate::fixtures::png_bytes(40, 20);

        let doc = synth.synthesize(&png, Placement::Fitted).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let mb = media_box(&doc);
        assert!((mb[2] - mb[0] - 595.0).abs() < 0.5);
        assert!((mb[3] - mb[1] - 842.0).abs() < 0.5);
    }

    #[test]
    fn synthesizes_one_native_page() {
        let synth = PageSynthesizer::a4();
        let png = crate::fixtures::png_bytes(300, 200);

        let doc = synth.synthesize(&png, Placement::Native).unwrap();
        let mb = media_box(&doc);
        assert!((mb[2] - mb[0] - 300.0).abs() < 0.5);
        assert!((mb[3] - mb[1] - 200.0).abs() < 0.5);
    }

    #[test]
    fn transparent_png_keeps_a_soft_mask() {
        let synth = PageSynthesizer::a4();
        let png = crate::fixtures::rgba_png_bytes(16, 16, 0);

        let doc = synth.synthesize(&png, Placement::Native).unwrap();
        let masked = doc.objects.values().any(|object| match object {
            lopdf::Object::Stream(stream) => {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(lopdf::Object::as_name)
                    .is_ok_and(|name| name == b"Image")
                    && stream.dict.has(b"SMask")
            }
            _ => false,
        });
        assert!(masked, "image XObject should carry /SMask");
    }

    #[test]
    fn native_size_is_one_point_per_pixel() {
        let synth = PageSynthesizer::a4();
        let doc = synth
            .synthesize(&crate::fixtures::png_bytes(123, 45), Placement::Native)
            .unwrap();
        let mb = media_box(&doc);
        assert!((mb[2] - mb[0] - 123.0).abs() < 0.5);
        assert!((mb[3] - mb[1] - 45.0).abs() < 0.5);
    }

    #[test]
    fn undecodable_image_is_reported() {
        let synth = PageSynthesizer::a4();
        let result = synth.synthesize(b"definitely not a jpeg", Placement::Fitted);
        assert!(matches!(result, Err(BindwerkError::ImageError(_))));
    }

    #[test]
    fn custom_paper_and_margin_apply() {
        let synth = PageSynthesizer::new(PaperSize::Letter, 0.0);
        let layout = synth.layout(Size { width: 612.0, height: 792.0 }, Placement::Fitted);
        assert_eq!(layout.image, Rect { x: 0.0, y: 0.0, width: 612.0, height: 792.0 });
    }
}
