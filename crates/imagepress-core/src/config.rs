// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline parameters and persistent application settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImagePressError;

/// Quality used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 85;
/// Lowest accepted JPEG quality.
pub const MIN_QUALITY: u8 = 1;
/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u8 = 100;

/// Optional colour/blur filter applied before the watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Blur,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Blur => "blur",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ImagePressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(Self::Grayscale),
            "blur" => Ok(Self::Blur),
            other => Err(ImagePressError::Config(format!(
                "unknown filter '{other}' (expected none, grayscale, or blur)"
            ))),
        }
    }
}

/// Parameters for one conversion run.
///
/// `quality` is stored as given and clamped on use, so a settings file or
/// slider value outside 1..=100 never fails the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// JPEG quality for the compression pass.
    pub quality: i32,
    /// Text stamped near the bottom-right corner. `None` or empty disables it.
    pub watermark_text: Option<String>,
    /// Filter applied before the watermark.
    pub filter: FilterKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY as i32,
            watermark_text: None,
            filter: FilterKind::None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the form-style parameter surface: a quality value,
    /// a watermark checkbox with its text field, and a filter choice.
    pub fn from_form(
        quality: i32,
        watermark_enabled: bool,
        watermark_text: &str,
        filter: FilterKind,
    ) -> Self {
        let watermark_text = if watermark_enabled {
            Some(watermark_text.to_string())
        } else {
            None
        };
        Self {
            quality,
            watermark_text,
            filter,
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark_text = Some(text.into());
        self
    }

    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    /// Quality clamped to the JPEG range.
    pub fn effective_quality(&self) -> u8 {
        self.quality.clamp(MIN_QUALITY as i32, MAX_QUALITY as i32) as u8
    }

    /// The watermark text, if it is set and non-empty.
    pub fn watermark(&self) -> Option<&str> {
        self.watermark_text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pipeline parameters used when the command line does not override them.
    pub defaults: PipelineConfig,
    /// Title embedded in the PDF /Info dictionary.
    pub document_title: Option<String>,
}
