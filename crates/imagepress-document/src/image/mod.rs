// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — alpha flattening, filters, watermark, and compression pass.

pub mod processor;
pub mod watermark;

pub use processor::ImageProcessor;
