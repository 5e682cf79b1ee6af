//! Background thread for dataset export (native only)
//!
//! Packaging a dataset copies every image into the archive, which can take a
//! while for large folders. `ExportWorker` runs it on its own thread and hands
//! the result back to the event loop through a channel, so the interaction
//! thread never blocks.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use super::{Archiver, DatasetSnapshot, ExportArtifact, ExportError};

type ExportResult = Result<ExportArtifact, ExportError>;

/// A single in-flight export.
///
/// Dropping the worker never blocks: an export still running is left to finish
/// on its own and its result is thrown away.
pub struct ExportWorker {
    /// Receiver for the one result the thread sends
    result_rx: Receiver<ExportResult>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// Set once the result has been handed out
    finished: bool,
}

impl ExportWorker {
    /// Start exporting `snapshot` on a background thread.
    pub fn spawn(
        snapshot: DatasetSnapshot,
        archiver: Arc<dyn Archiver>,
    ) -> Result<Self, ExportError> {
        let (result_tx, result_rx) = mpsc::channel::<ExportResult>();

        let thread_handle = thread::Builder::new()
            .name("dataset-export".to_string())
            .spawn(move || {
                log::debug!("Export thread started");
                let result = snapshot.export(archiver.as_ref());
                if result_tx.send(result).is_err() {
                    log::debug!("Export result discarded, worker was dropped");
                }
            })
            .map_err(|e| ExportError::Worker(format!("Failed to spawn export thread: {}", e)))?;

        Ok(Self {
            result_rx,
            thread_handle: Some(thread_handle),
            finished: false,
        })
    }

    /// Non-blocking check for the result. Returns `None` while the export is running
    /// or after the result has already been returned.
    pub fn poll(&mut self) -> Option<ExportResult> {
        if self.finished {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(ExportError::Worker(
                    "export thread exited without a result".to_string(),
                )))
            }
        }
    }

    /// Block until the export completes.
    pub fn wait(mut self) -> ExportResult {
        if self.finished {
            return Err(ExportError::Worker("result already taken".to_string()));
        }
        self.finished = true;
        self.result_rx.recv().unwrap_or_else(|_| {
            Err(ExportError::Worker(
                "export thread exited without a result".to_string(),
            ))
        })
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        // Only join once the thread has delivered; a running export is detached
        // and its result discarded.
        if self.finished || handle.is_finished() {
            if handle.join().is_err() {
                log::error!("Export thread panicked");
            }
        } else {
            log::debug!("Export worker dropped while running; detaching thread");
        }
    }
}
