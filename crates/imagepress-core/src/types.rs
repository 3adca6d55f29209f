// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Imagepress.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Nominal resolution used to size PDF pages from pixel dimensions.
pub const PAGE_DPI: f32 = 100.0;

/// File extensions accepted as input, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// One page of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Where the page's image came from, if it was loaded from disk.
    pub source: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// The PDF that was written.
    pub output: PathBuf,
    /// Pages in document order.
    pub pages: Vec<PageInfo>,
    /// Size of the written PDF in bytes.
    pub bytes_written: usize,
}

impl ConversionSummary {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(is_supported_image(Path::new("scan.JPG")));
        assert!(is_supported_image(Path::new("scan.Tif")));
        assert!(!is_supported_image(Path::new("scan.gif")));
    }

    #[test]
    fn supported_from_path() {
        assert!(is_supported_image(Path::new("/scans/page-01.PNG")));
        assert!(!is_supported_image(Path::new("README")));
        assert!(!is_supported_image(Path::new("/scans/.png/notes")));
    }
}
