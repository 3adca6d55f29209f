// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery and output path derivation.

use std::path::{Path, PathBuf};

use imagepress_core::error::Result;
use imagepress_core::is_supported_image;
use tracing::debug;

/// Expand command-line inputs into an ordered list of image paths.
///
/// Files are kept as given (the decoder decides whether they are images).
/// Directories contribute their supported image files, sorted by name. Order
/// between arguments is preserved.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_supported_image(path))
                .collect();
            found.sort();
            debug!(dir = %input.display(), count = found.len(), "Expanded directory");
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

/// Pick the PDF destination.
///
/// An explicit output without an extension gets `.pdf` appended. Without an
/// explicit output, the PDF is named after the first input and placed next
/// to it.
pub fn resolve_output(output: Option<&Path>, first_input: Option<&Path>) -> Option<PathBuf> {
    match output {
        Some(path) if path.extension().is_none() => Some(path.with_extension("pdf")),
        Some(path) => Some(path.to_path_buf()),
        None => first_input.map(|input| input.with_extension("pdf")),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn directories_expand_to_sorted_images() {
        let dir = TempDir::new().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.tiff"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let paths = expand_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.tiff"]);
    }

    #[test]
    fn files_keep_argument_order() {
        let inputs = vec![PathBuf::from("z.png"), PathBuf::from("a.png")];
        assert_eq!(expand_inputs(&inputs).unwrap(), inputs);
    }

    #[test]
    fn output_gets_pdf_extension() {
        assert_eq!(
            resolve_output(Some(Path::new("report")), None),
            Some(PathBuf::from("report.pdf"))
        );
        assert_eq!(
            resolve_output(Some(Path::new("report.PDF")), None),
            Some(PathBuf::from("report.PDF"))
        );
    }

    #[test]
    fn output_defaults_to_first_input() {
        assert_eq!(
            resolve_output(None, Some(Path::new("/photos/cat.jpeg"))),
            Some(PathBuf::from("/photos/cat.pdf"))
        );
        assert_eq!(resolve_output(None, None), None);
    }
}
