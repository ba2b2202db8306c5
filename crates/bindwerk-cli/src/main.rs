// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bindwerk — folder-to-PDF binder.
//
// Entry point. Parses the command line, initialises logging, and runs a merge
// or split on a background worker while printing its progress lines.

use std::path::PathBuf;
use std::process::ExitCode;

use bindwerk_core::config::{default_output_path, ensure_pdf_extension};
use bindwerk_core::error::BindwerkError;
use bindwerk_core::human_errors::humanize_error;
use bindwerk_core::{MergeConfig, MergeOptions, PaperSize};
use bindwerk_document::{split_pages, spawn_merge};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bindwerk")]
#[command(
    about = "Bind a folder tree of PDFs and images into one bookmarked PDF",
    version,
    long_about = "Walks a folder in natural order, appends every PDF and one page per image,\n\
                  and adds an outline that mirrors the folder structure.\n\
                  \n\
                  Examples:\n\
                  \x20 bindwerk merge ~/Contracts\n\
                  \x20 bindwerk merge scans -o bundle.pdf --resize-images\n\
                  \x20 bindwerk split bundle.pdf 5-10"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug detail to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a folder tree into one PDF.
    #[command(visible_alias = "m")]
    Merge {
        /// Folder to merge.
        root: PathBuf,

        /// Output PDF [default: <ROOT>/<ROOT name>_merged.pdf].
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fit images onto a standard page instead of keeping their size.
        #[arg(long)]
        resize_images: bool,

        /// Page size for fitted images: a4, a3, a5, letter, legal or WxH in points.
        #[arg(long, value_name = "SIZE")]
        paper: Option<PaperSize>,

        /// Margin around fitted images, in points.
        #[arg(long, value_name = "PT")]
        margin: Option<f32>,

        /// JSON options file; flags given here take precedence.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Copy a range of pages out of a PDF.
    #[command(
        visible_alias = "s",
        after_help = "Ranges:\n  5-10   pages 5 to 10\n  7      page 7 only\n  12-    page 12 to the end\n  -5     first page to page 5"
    )]
    Split {
        input: PathBuf,

        #[arg(value_name = "RANGE")]
        range: String,

        /// Output PDF [default: <stem>_pages_<start>-<end>.pdf next to INPUT].
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" })),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Merge {
            root,
            output,
            resize_images,
            paper,
            margin,
            config,
        } => run_merge(root, output, resize_images, paper, margin, config).await,
        Commands::Split {
            input,
            range,
            output,
        } => run_split(input, range, output).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "Command failed");
            let human = humanize_error(&err);
            eprintln!("Error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run_merge(
    root: PathBuf,
    output: Option<PathBuf>,
    resize_images: bool,
    paper: Option<PaperSize>,
    margin: Option<f32>,
    config_file: Option<PathBuf>,
) -> Result<(), BindwerkError> {
    let options = match config_file {
        Some(path) => MergeOptions::load(path)?,
        None => MergeOptions::default(),
    };

    let output = output
        .map(ensure_pdf_extension)
        .unwrap_or_else(|| default_output_path(&root));

    let mut config = MergeConfig::new(root, output).with_options(&options);
    if resize_images {
        config = config.with_resize_images(true);
    }
    if let Some(paper) = paper {
        config = config.with_paper_size(paper);
    }
    if let Some(margin) = margin {
        config = config.with_margin(margin);
    }

    let summary = spawn_merge(config)
        .wait(|progress| println!("{progress}"))
        .await?;

    if summary.files_failed > 0 {
        println!(
            "{} file(s) could not be read and were skipped.",
            summary.files_failed
        );
    }
    Ok(())
}

async fn run_split(
    input: PathBuf,
    range: String,
    output: Option<PathBuf>,
) -> Result<(), BindwerkError> {
    tokio::task::spawn_blocking(move || {
        split_pages(&input, &range, output, |progress| println!("{progress}"))
    })
    .await
    .map_err(|err| BindwerkError::Worker(format!("split task failed: {err}")))??;
    Ok(())
}
