// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background merge worker — runs `merge_folder` on tokio's blocking pool and
// streams its progress to the caller.

use bindwerk_core::error::BindwerkError;
use bindwerk_core::{MergeConfig, MergeSummary};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::merge::merge_folder;
use crate::progress::Progress;

/// One message from a running merge.
#[derive(Debug)]
pub enum MergeEvent {
    Progress(Progress),
    /// Terminal outcome; always the last event.
    Finished(Result<MergeSummary, BindwerkError>),
}

/// Receiving end of a spawned merge.
pub struct MergeHandle {
    events: mpsc::UnboundedReceiver<MergeEvent>,
    finished: bool,
}

/// Start a merge on a blocking worker thread. Must be called from within a
/// tokio runtime.
pub fn spawn_merge(config: MergeConfig) -> MergeHandle {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let progress_tx = tx.clone();
        let outcome = merge_folder(&config, |event| {
            // A dropped handle only means nobody is listening.
            let _ = progress_tx.send(MergeEvent::Progress(event));
        });
        debug!(success = outcome.is_ok(), "Merge worker finished");
        let _ = tx.send(MergeEvent::Finished(outcome));
    });

    MergeHandle {
        events: rx,
        finished: false,
    }
}

impl MergeHandle {
    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<MergeEvent> {
        if self.finished {
            return None;
        }
        match self.events.recv().await {
            Some(MergeEvent::Finished(outcome)) => {
                self.finished = true;
                Some(MergeEvent::Finished(outcome))
            }
            Some(event) => Some(event),
            None => {
                // Channel closed without a result: the worker panicked.
                self.finished = true;
                error!("Merge worker stopped without reporting a result");
                Some(MergeEvent::Finished(Err(BindwerkError::Worker(
                    "merge worker stopped unexpectedly".into(),
                ))))
            }
        }
    }

    /// Drain the stream, passing progress to `on_progress`, and return the
    /// terminal outcome.
    pub async fn wait(
        mut self,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<MergeSummary, BindwerkError> {
        while let Some(event) = self.next_event().await {
            match event {
                MergeEvent::Progress(progress) => on_progress(progress),
                MergeEvent::Finished(outcome) => return outcome,
            }
        }
        Err(BindwerkError::Worker("merge result already consumed".into()))
    }
}
