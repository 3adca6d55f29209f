// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — runs every image through flatten → filter → watermark
// → compression, then assembles the results into one PDF.
//
// Processing is synchronous and fail-fast: all inputs are decoded before
// anything is written, and the destination is opened once at the very end.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use imagepress_core::error::{ImagePressError, Result};
use imagepress_core::{ConversionSummary, PageInfo, PipelineConfig};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;
use crate::pdf::writer::{PdfWriter, write_pdf};

/// An input image, optionally remembering the file it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: Option<PathBuf>,
    image: DynamicImage,
}

impl SourceImage {
    /// Decode the image at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = ImageProcessor::open(path)?.into_dynamic();
        Ok(Self {
            path: Some(path.to_path_buf()),
            image,
        })
    }

    /// Wrap an image that is already in memory.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { path: None, image }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// A processed page ready for embedding.
#[derive(Debug, Clone)]
pub struct Page {
    source: Option<PathBuf>,
    image: RgbImage,
}

impl Page {
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    fn info(&self) -> PageInfo {
        PageInfo {
            source: self.source.clone(),
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// Ordered, immutable set of processed pages.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    pages: Vec<Page>,
}

impl OutputDocument {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialise to PDF bytes.
    pub fn encode(&self, writer: &PdfWriter) -> Result<Vec<u8>> {
        let images: Vec<&RgbImage> = self.pages.iter().map(|page| &page.image).collect();
        writer.create_from_images(&images)
    }
}

/// Turns a batch of images into a single PDF according to a [`PipelineConfig`].
pub struct ImagePipeline {
    config: PipelineConfig,
    writer: PdfWriter,
}

impl ImagePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            writer: PdfWriter::new(),
        }
    }

    /// Set the title embedded in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.writer.set_title(title);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one image through every stage, returning the page image.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn process(&self, image: DynamicImage) -> Result<RgbImage> {
        let mut processor = ImageProcessor::from_dynamic(image)
            .flatten_alpha()
            .apply_filter(self.config.filter);

        if let Some(text) = self.config.watermark() {
            processor = processor.watermark(text);
        }

        let processed = processor.compress(self.config.effective_quality())?;
        Ok(processed.into_rgb8())
    }

    /// Process every image in order and collect the pages.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub fn render(&self, images: Vec<SourceImage>) -> Result<OutputDocument> {
        if images.is_empty() {
            return Err(ImagePressError::NoInput);
        }

        let mut pages = Vec::with_capacity(images.len());
        for (index, source) in images.into_iter().enumerate() {
            debug!(page = index + 1, path = ?source.path, "Processing image");
            let image = self.process(source.image)?;
            pages.push(Page {
                source: source.path,
                image,
            });
        }
        Ok(OutputDocument { pages })
    }

    /// Convert in-memory images into a PDF at `destination`.
    #[instrument(skip(self, images), fields(count = images.len(), destination = %destination.as_ref().display()))]
    pub fn convert(
        &self,
        images: Vec<SourceImage>,
        destination: impl AsRef<Path>,
    ) -> Result<ConversionSummary> {
        let destination = destination.as_ref();
        info!(
            quality = self.config.effective_quality(),
            filter = %self.config.filter,
            watermark = self.config.watermark().is_some(),
            "Starting conversion"
        );

        let document = self.render(images)?;
        if document.page_count() == 1 {
            debug!("Single image, writing one-page document");
        }
        let bytes = document.encode(&self.writer)?;
        write_pdf(destination, &bytes)?;

        let summary = ConversionSummary {
            output: destination.to_path_buf(),
            pages: document.pages.iter().map(Page::info).collect(),
            bytes_written: bytes.len(),
        };
        info!(
            pages = summary.page_count(),
            bytes = summary.bytes_written,
            "Conversion complete"
        );
        Ok(summary)
    }

    /// Load every path, then convert. Nothing is written unless all inputs decode.
    #[instrument(skip(self, paths), fields(count = paths.len(), destination = %destination.as_ref().display()))]
    pub fn convert_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        destination: impl AsRef<Path>,
    ) -> Result<ConversionSummary> {
        if paths.is_empty() {
            return Err(ImagePressError::NoInput);
        }
        let images = paths
            .iter()
            .map(|path| SourceImage::open(path))
            .collect::<Result<Vec<_>>>()?;
        self.convert(images, destination)
    }
}
