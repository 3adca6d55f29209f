// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagepress-document — Image pipeline and PDF assembly for Imagepress.
//
// Provides per-image processing (alpha flattening, grayscale/blur filters,
// text watermark, JPEG compression pass), PDF page assembly at a fixed 100 DPI,
// and the `ImagePipeline` that ties them together.

pub mod image;
pub mod pdf;
pub mod pipeline;

// Re-export the primary structs so callers can use `imagepress_document::ImagePipeline` etc.
pub use crate::image::processor::ImageProcessor;
pub use crate::pdf::writer::PdfWriter;
pub use crate::pipeline::{ImagePipeline, OutputDocument, Page, SourceImage};
