// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge orchestration — validate, assemble, write.

use bindwerk_core::error::BindwerkError;
use bindwerk_core::{MergeConfig, MergeSummary};
use tracing::{info, instrument, warn};

use crate::assemble::{Assembly, TreeAssembler};
use crate::pdf::DocumentWriter;
use crate::progress::Progress;
use crate::source::normalize_path;

/// Merge the folder tree described by `config` into one PDF.
///
/// Configuration errors abort before traversal. Per-entry failures are
/// reported through `progress` and never fail the merge. An empty result is
/// `NothingToMerge` and writes nothing.
#[instrument(skip_all, fields(root = %config.root_folder.display()))]
pub fn merge_folder(
    config: &MergeConfig,
    mut progress: impl FnMut(Progress),
) -> Result<MergeSummary, BindwerkError> {
    config.validate()?;

    info!(
        output = %config.output_path.display(),
        resize_images = config.resize_images,
        "Merge started"
    );
    progress(Progress::Started {
        root: config.root_folder.clone(),
        resize_images: config.resize_images,
    });

    let Assembly {
        document,
        outline,
        stats,
    } = TreeAssembler::new(config, &mut progress).assemble();

    if document.page_count() == 0 {
        warn!("No pages collected; nothing written");
        return Err(BindwerkError::NothingToMerge);
    }

    progress(Progress::Writing {
        output: config.output_path.clone(),
    });

    let title = normalize_path(&config.root_folder)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Merged".into());
    let report = DocumentWriter::new()
        .with_title(title)
        .write(document, &outline, &config.output_path)?;

    progress(Progress::Completed {
        total_pages: report.pages,
        output: report.path.clone(),
    });
    info!(pages = report.pages, bytes = report.bytes, "Merge complete");

    Ok(MergeSummary {
        output_path: report.path,
        total_pages: report.pages,
        outline,
        files_merged: stats.files_merged,
        files_failed: stats.files_failed,
        folders_pruned: stats.folders_pruned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use bindwerk_core::OutlineEntry;
    use lopdf::Document;
    use std::fs;
    use std::path::Path;

    fn build_reference_tree(root: &Path) {
        fs::create_dir_all(root.join("A")).unwrap();
        fs::create_dir_all(root.join("B")).unwrap();
        fixtures::write_pdf(&root.join("A").join("1.pdf"), 2);
        fixtures::write_image(&root.join("A").join("2.jpg"), 64, 32);
    }

    fn reference_outline() -> Vec<OutlineEntry> {
        vec![
            OutlineEntry::new(1, "A", 1),
            OutlineEntry::new(2, "1", 1),
            OutlineEntry::new(2, "2", 3),
        ]
    }

    #[test]
    fn merges_reference_tree() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        build_reference_tree(input.path());

        let out = output.path().join("merged.pdf");
        let config = MergeConfig::new(input.path(), &out).with_resize_images(true);
        let summary = merge_folder(&config, |_| {}).unwrap();

        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.outline, reference_outline());
        assert_eq!(summary.files_merged, 2);
        assert_eq!(summary.folders_pruned, 1);

        let written = Document::load(&out).unwrap();
        assert_eq!(written.get_pages().len(), 3);
        assert_eq!(fixtures::read_outline(&written), reference_outline());
    }

    #[test]
    fn unsupported_files_change_nothing() {
        let input = tempfile::tempdir().unwrap();
        build_reference_tree(input.path());
        fs::write(input.path().join("A").join("report.docx"), b"PK\x03\x04").unwrap();

        let out = input.path().join("out.pdf");
        let config = MergeConfig::new(input.path(), &out).with_resize_images(true);
        let mut failures = 0;
        let summary = merge_folder(&config, |event| {
            if matches!(event, Progress::EntryFailed { .. }) {
                failures += 1;
            }
        })
        .unwrap();

        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.outline, reference_outline());
        assert_eq!(failures, 0);
    }

    #[test]
    fn rerun_with_output_inside_root_is_stable() {
        let input = tempfile::tempdir().unwrap();
        build_reference_tree(input.path());
        let out = input.path().join("bundle.pdf");
        let config = MergeConfig::new(input.path(), &out).with_resize_images(true);

        let first = merge_folder(&config, |_| {}).unwrap();
        let second = merge_folder(&config, |_| {}).unwrap();

        assert_eq!(first.total_pages, second.total_pages);
        assert_eq!(first.outline, second.outline);
        let written = Document::load(&out).unwrap();
        assert_eq!(fixtures::read_outline(&written), reference_outline());
    }

    #[test]
    fn invalid_root_fails_before_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let config = MergeConfig::new(&missing, dir.path().join("out.pdf"));

        let mut events = 0;
        let result = merge_folder(&config, |_| events += 1);
        assert!(matches!(result, Err(BindwerkError::InvalidRoot(_))));
        assert_eq!(events, 0);
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[test]
    fn empty_tree_is_nothing_to_merge() {
        let input = tempfile::tempdir().unwrap();
        fs::create_dir(input.path().join("empty")).unwrap();
        fs::write(input.path().join("readme.txt"), b"hello").unwrap();
        let out = input.path().join("sub").join("out.pdf");

        let config = MergeConfig::new(input.path(), &out);
        let result = merge_folder(&config, |_| {});
        assert!(matches!(result, Err(BindwerkError::NothingToMerge)));
        assert!(!out.exists());
        assert!(!input.path().join("sub").exists());
    }

    #[test]
    fn progress_brackets_the_run() {
        let input = tempfile::tempdir().unwrap();
        build_reference_tree(input.path());
        let config = MergeConfig::new(input.path(), input.path().join("out.pdf"));

        let mut events = Vec::new();
        merge_folder(&config, |event| events.push(event)).unwrap();

        assert!(matches!(events.first(), Some(Progress::Started { .. })));
        assert!(matches!(
            events.last(),
            Some(Progress::Completed { total_pages: 3, .. })
        ));
        assert!(events.iter().any(
            |e| matches!(e, Progress::EnteringFolder { relative } if relative == Path::new("A"))
        ));
    }
}
