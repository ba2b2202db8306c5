// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source tree nodes, read fresh from the filesystem when a folder is visited.

use std::io;
use std::path::{Component, Path, PathBuf};

use bindwerk_core::DocumentType;

use crate::sequence::natural_cmp;

/// One entry of a folder being merged.
///
/// Directories carry their path rather than a child list: children are
/// listed (and sorted) only when the traversal enters the directory, so a
/// listing failure is local to that directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNode {
    Directory { name: String, path: PathBuf },
    Leaf { name: String, path: PathBuf, extension: String },
}

impl SourceNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::Leaf { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory { path, .. } | Self::Leaf { path, .. } => path,
        }
    }

    /// Supported document type of a leaf, `None` for directories and
    /// unsupported files.
    pub fn document_type(&self) -> Option<DocumentType> {
        match self {
            Self::Directory { .. } => None,
            Self::Leaf { extension, .. } => DocumentType::from_extension(extension),
        }
    }

    /// Outline title: folder name, or file name without its final extension.
    pub fn title(&self) -> String {
        match self {
            Self::Directory { name, .. } => name.clone(),
            Self::Leaf { name, path, .. } => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.clone()),
        }
    }
}

/// List the children of `dir` in natural order.
///
/// Directories are detected by following symlinks. An entry whose metadata
/// cannot be read is treated as a leaf; opening it later reports the problem.
pub fn read_children(dir: &Path) -> io::Result<Vec<SourceNode>> {
    let mut children = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = std::fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);

        if is_dir {
            children.push(SourceNode::Directory { name, path });
        } else {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            children.push(SourceNode::Leaf {
                name,
                path,
                extension,
            });
        }
    }

    children.sort_by(|a, b| natural_cmp(a.name(), b.name()));
    Ok(children)
}

/// Absolute, lexically normalized form of `path` (`.` and `..` resolved,
/// symlinks left alone).
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
