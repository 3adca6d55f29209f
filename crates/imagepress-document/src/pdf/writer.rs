// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — one page per image using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::RgbImage;
use imagepress_core::PAGE_DPI;
use imagepress_core::error::ImagePressError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

const MM_PER_INCH: f32 = 25.4;

/// Builds a PDF where every page is exactly the size of its image at a fixed
/// nominal resolution.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Pixels per inch used to size pages.
    dpi: f32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Create a writer sizing pages at [`PAGE_DPI`].
    pub fn new() -> Self {
        Self {
            title: None,
            dpi: PAGE_DPI,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Physical page size for an image of `width` x `height` pixels.
    pub fn page_size(&self, width: u32, height: u32) -> (Mm, Mm) {
        (
            Mm(width as f32 / self.dpi * MM_PER_INCH),
            Mm(height as f32 / self.dpi * MM_PER_INCH),
        )
    }

    /// Create a PDF with one page per image, in slice order.
    ///
    /// Each image is embedded as raw RGB8 and drawn at the origin so it
    /// covers its page exactly.
    #[instrument(skip(self, images), fields(pages = images.len()))]
    pub fn create_from_images(&self, images: &[&RgbImage]) -> Result<Vec<u8>, ImagePressError> {
        if images.is_empty() {
            return Err(ImagePressError::NoInput);
        }

        let title = self.title.as_deref().unwrap_or("imagepress");
        info!(title, dpi = self.dpi, "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let (width, height) = image.dimensions();
            if width == 0 || height == 0 {
                return Err(ImagePressError::PdfError(format!(
                    "page {} has an empty image ({}x{})",
                    index + 1,
                    width,
                    height
                )));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(image.as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];

            let (page_w, page_h) = self.page_size(width, height);
            debug!(
                page = index + 1,
                width,
                height,
                page_w_mm = page_w.0,
                page_h_mm = page_h.0,
                "Image placed on page"
            );
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        // Images are embedded at native resolution. printpdf's default image
        // optimisation downsamples anything over 2 MB.
        let options = PdfSaveOptions {
            image_optimization: None,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        debug!(bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

/// Write finished PDF bytes to `path`, reporting any failure as `WriteFailure`.
pub fn write_pdf(path: &Path, bytes: &[u8]) -> Result<(), ImagePressError> {
    std::fs::write(path, bytes).map_err(|err| ImagePressError::WriteFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    info!("Wrote PDF to {}", path.display());
    Ok(())
}
