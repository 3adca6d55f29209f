// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — alpha flattening, grayscale/blur filters, text watermark,
// and the JPEG compression round trip. Operates on in-memory images using the
// `image` and `imageproc` crates.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imagepress_core::FilterKind;
use imagepress_core::error::ImagePressError;
use tracing::{debug, info, instrument};

use super::watermark;

/// Standard deviation of the fixed blur kernel.
pub const BLUR_SIGMA: f32 = 1.5;

/// Per-image stage chain operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// let page = ImageProcessor::open("photo.png")?
///     .flatten_alpha()
///     .apply_filter(FilterKind::Grayscale)
///     .watermark("DRAFT")
///     .compress(85)?
///     .into_rgb8();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    ///
    /// Any failure (missing file, unknown format, corrupt data) is reported as
    /// `UnreadableImage` naming the path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, ImagePressError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| ImagePressError::UnreadableImage {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Consume the processor and return the image as 8-bit RGB.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }

    // -- Stages (consume self, return new Self) -------------------------------

    /// Normalise the image to opaque 8-bit RGB.
    ///
    /// Alpha is dropped, not composited against a background. An image that is
    /// already RGB8 passes through untouched.
    #[instrument(skip(self), fields(color = ?self.image.color()))]
    pub fn flatten_alpha(self) -> Self {
        if matches!(self.image, DynamicImage::ImageRgb8(_)) {
            return self;
        }
        if self.image.color().has_alpha() {
            info!("Dropping alpha channel");
        } else {
            debug!("Normalising to RGB8");
        }
        Self {
            image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
        }
    }

    /// Apply the configured filter, if any.
    pub fn apply_filter(self, filter: FilterKind) -> Self {
        match filter {
            FilterKind::None => self,
            FilterKind::Grayscale => self.grayscale(),
            FilterKind::Blur => self.blur(),
        }
    }

    /// Convert the image to luminance, then back to RGB with equal channels.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        let luma = DynamicImage::ImageLuma8(self.image.to_luma8());
        Self {
            image: DynamicImage::ImageRgb8(luma.to_rgb8()),
        }
    }

    /// Gaussian blur with a fixed sigma of [`BLUR_SIGMA`].
    #[instrument(skip(self))]
    pub fn blur(self) -> Self {
        info!(sigma = BLUR_SIGMA, "Blurring image");
        let rgb = self.into_rgb8();
        Self {
            image: DynamicImage::ImageRgb8(gaussian_blur_f32(&rgb, BLUR_SIGMA)),
        }
    }

    /// Stamp `text` near the bottom-right corner. Empty text is a no-op.
    #[instrument(skip(self), fields(text_len = text.len()))]
    pub fn watermark(self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }
        let mut rgb = self.into_rgb8();
        watermark::stamp_bottom_right(&mut rgb, text);
        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    /// Lossy compression pass: encode as JPEG at `quality` (clamped to
    /// 1..=100) and decode the result back into the working image.
    #[instrument(skip(self))]
    pub fn compress(self, quality: u8) -> Result<Self, ImagePressError> {
        let quality = quality.clamp(1, 100);
        let encoded = self.to_jpeg_bytes(quality)?;
        debug!(quality, encoded_len = encoded.len(), "JPEG pass encoded");

        let decoded = image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg)
            .map_err(|err| {
                ImagePressError::ImageError(format!("JPEG decoding failed: {}", err))
            })?;
        Ok(Self {
            image: DynamicImage::ImageRgb8(decoded.to_rgb8()),
        })
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    ///
    /// Neutral images (every pixel has r == g == b) are written as
    /// single-channel JPEG so they decode without chroma drift.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, ImagePressError> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        let result = if is_neutral(&self.image) {
            self.image.to_luma8().write_with_encoder(encoder)
        } else {
            self.image.to_rgb8().write_with_encoder(encoder)
        };
        result.map_err(|err| {
            ImagePressError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }
}

/// Whether every pixel of the image has equal colour channels.
fn is_neutral(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => true,
        DynamicImage::ImageRgb8(rgb) => rgb.pixels().all(|p| p[0] == p[1] && p[1] == p[2]),
        other => other
            .to_rgb8()
            .pixels()
            .all(|p| p[0] == p[1] && p[1] == p[2]),
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};

    use super::*;

    /// Smooth gradient with a diagonal stripe so every filter has something
    /// to change.
    fn sample_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let stripe = if (x + y) % 16 < 8 { 60 } else { 0 };
            Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                (120 + stripe) as u8,
            ])
        })
    }

    #[test]
    fn flatten_drops_alpha_without_compositing() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 0]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba)).flatten_alpha();
        let out = out.into_dynamic();

        assert!(!out.color().has_alpha());
        assert_eq!(out.to_rgb8().get_pixel(0, 0), &Rgb([200, 100, 50]));
    }

    #[test]
    fn flatten_is_noop_on_opaque_rgb() {
        let rgb = sample_rgb(32, 24);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(rgb.clone()))
            .flatten_alpha()
            .into_rgb8();
        assert_eq!(out, rgb);
    }

    #[test]
    fn flatten_expands_luma_to_rgb() {
        let gray = GrayImage::from_pixel(3, 3, Luma([77u8]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(gray)).flatten_alpha();
        assert!(matches!(out.as_dynamic(), DynamicImage::ImageRgb8(_)));
        assert_eq!(out.into_rgb8().get_pixel(1, 1), &Rgb([77, 77, 77]));
    }

    #[test]
    fn grayscale_channels_are_equal() {
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(sample_rgb(40, 30)))
            .apply_filter(FilterKind::Grayscale)
            .into_rgb8();
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn blur_changes_pixels_but_not_dimensions() {
        let input = sample_rgb(40, 30);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(input.clone()))
            .apply_filter(FilterKind::Blur)
            .into_rgb8();
        assert_eq!(out.dimensions(), (40, 30));
        assert_ne!(out, input);
    }

    #[test]
    fn no_filter_passes_through() {
        let input = sample_rgb(16, 16);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(input.clone()))
            .apply_filter(FilterKind::None)
            .into_rgb8();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_watermark_is_noop() {
        let input = sample_rgb(64, 64);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(input.clone()))
            .watermark("")
            .into_rgb8();
        assert_eq!(out, input);
    }

    #[test]
    fn low_quality_encodes_smaller() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(sample_rgb(128, 96)));
        let low = processor.to_jpeg_bytes(10).unwrap();
        let high = processor.to_jpeg_bytes(100).unwrap();
        assert!(
            low.len() < high.len(),
            "quality 10 gave {} bytes, quality 100 gave {}",
            low.len(),
            high.len()
        );
    }

    #[test]
    fn compress_at_full_quality_is_near_identical() {
        let input = sample_rgb(64, 48);
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(input.clone()))
            .compress(100)
            .unwrap()
            .into_rgb8();

        assert_eq!(out.dimensions(), input.dimensions());
        let total: u64 = input
            .as_raw()
            .iter()
            .zip(out.as_raw())
            .map(|(a, b)| (*a as i32 - *b as i32).unsigned_abs() as u64)
            .sum();
        let mean = total as f64 / input.as_raw().len() as f64;
        assert!(mean < 5.0, "mean absolute error {mean}");
    }

    #[test]
    fn compress_keeps_grayscale_neutral() {
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(sample_rgb(48, 48)))
            .grayscale()
            .compress(40)
            .unwrap()
            .into_rgb8();
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn compress_clamps_zero_quality() {
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(sample_rgb(20, 20)))
            .compress(0)
            .unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
    }

    #[test]
    fn open_missing_file_is_unreadable() {
        let err = ImageProcessor::open("/nonexistent/dir/photo.png").err().unwrap();
        assert_eq!(
            err.path(),
            Some(std::path::Path::new("/nonexistent/dir/photo.png"))
        );
    }
}
