// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading sources, accumulating the page stream, outline
// encoding, and compacted output.

pub mod assembled;
pub mod outline;
pub mod reader;
pub mod writer;

pub use assembled::{AssembledDocument, Page};
pub use reader::PdfReader;
pub use writer::{DocumentWriter, WriteReport};
