// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for conversion results.
//
// Every error is mapped to plain English with a clear suggestion that names
// the offending file where there is one.

use std::path::Path;

use crate::error::ImagePressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must do something (pick files, fix a path, change permissions).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged file, unsupported content.
    Permanent,
    /// Might work if tried again (disk full, file briefly locked).
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Confirmation shown after a PDF was written.
pub fn success_message(output: &Path) -> String {
    format!("PDF created successfully at {}", output.display())
}

/// Convert an `ImagePressError` into a `HumanError`.
pub fn humanize_error(err: &ImagePressError) -> HumanError {
    match err {
        ImagePressError::NoInput => HumanError {
            message: "No images were selected.".into(),
            suggestion: "Please select at least one image.".into(),
            severity: Severity::ActionRequired,
        },

        ImagePressError::UnreadableImage { path, .. } => HumanError {
            message: format!("The image {} couldn't be opened.", path.display()),
            suggestion: "The file may be missing, damaged, or not an image. Try PNG, JPEG, BMP, or TIFF files.".into(),
            severity: Severity::Permanent,
        },

        ImagePressError::WriteFailure { path, reason } => HumanError {
            message: format!("The PDF couldn't be saved to {}.", path.display()),
            suggestion: format!(
                "Check that the folder exists and that you can write to it, then try again. ({reason})"
            ),
            severity: Severity::ActionRequired,
        },

        ImagePressError::ImageError(detail) => HumanError {
            message: "There was a problem processing one of the images.".into(),
            suggestion: format!("Try a lower quality setting or a different image. ({detail})"),
            severity: Severity::Permanent,
        },

        ImagePressError::PdfError(detail) => HumanError {
            message: "The PDF couldn't be assembled.".into(),
            suggestion: format!("Try again with fewer images. ({detail})"),
            severity: Severity::Permanent,
        },

        ImagePressError::Config(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        ImagePressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission was denied.".into(),
                    suggestion: "Check the file permissions, or choose a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        ImagePressError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Fix or delete the settings file to go back to the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
