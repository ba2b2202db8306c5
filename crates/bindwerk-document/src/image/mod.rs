// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — one synthesized PDF page per raster image.

pub mod synth;

pub use synth::{PageLayout, PageSynthesizer, Placement, Rect, Size};
