// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Natural ordering of directory-entry names, so that `item2` sorts before
// `item10` the way a file manager shows them.

use std::cmp::Ordering;

/// One run of a name: either text or an ASCII digit run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk<'a> {
    Text(String),
    Number(&'a str),
}

/// Split a name into alternating text/number chunks.
///
/// The key always starts with a (possibly empty) text chunk, so chunks at the
/// same position in two keys are always of the same kind.
fn natural_key(name: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut text_start = 0;
    let bytes = name.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let digits_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            chunks.push(Chunk::Text(name[text_start..digits_start].to_lowercase()));
            chunks.push(Chunk::Number(&name[digits_start..i]));
            text_start = i;
        } else {
            i += 1;
        }
    }
    chunks.push(Chunk::Text(name[text_start..].to_lowercase()));
    chunks
}

/// Compare two digit runs as integers of arbitrary length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_chunks(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        (Chunk::Number(a), Chunk::Number(b)) => compare_digits(a, b),
        // Keys alternate in lock-step, so mixed pairs cannot occur.
        (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
        (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
    }
}

/// Natural-order comparison of two entry names.
///
/// Digit runs compare numerically, everything else case-insensitively. Names
/// whose keys tie (`a01` vs `a1`, `A` vs `a`) fall back to a byte comparison
/// so the result is a strict total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let key_a = natural_key(a);
    let key_b = natural_key(b);

    key_a
        .iter()
        .zip(key_b.iter())
        .map(|(x, y)| compare_chunks(x, y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| key_a.len().cmp(&key_b.len()))
        .then_with(|| a.cmp(b))
}

/// Sort names in place into natural order.
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
