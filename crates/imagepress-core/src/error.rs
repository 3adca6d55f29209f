// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Imagepress.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Imagepress operations.
#[derive(Debug, Error)]
pub enum ImagePressError {
    // -- Conversion failures surfaced to the user --
    #[error("no input images were supplied")]
    NoInput,

    #[error("cannot read image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("cannot write {}: {reason}", path.display())]
    WriteFailure { path: PathBuf, reason: String },

    // -- Internal stage failures --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of an [`ImagePressError`] for front-ends that only
/// need to branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoInput,
    UnreadableImage,
    WriteFailure,
    Internal,
}

impl ImagePressError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoInput => FailureKind::NoInput,
            Self::UnreadableImage { .. } => FailureKind::UnreadableImage,
            Self::WriteFailure { .. } => FailureKind::WriteFailure,
            _ => FailureKind::Internal,
        }
    }

    /// The file path the failure is about, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::UnreadableImage { path, .. } | Self::WriteFailure { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ImagePressError>;
