//! Async task management for background operations
//!
//! This module handles all background tasks including:
//! - Fullscreen requests and exits
//! - Resize debouncing

use crate::constants::{MIN_FULLSCREEN_HEIGHT, MIN_FULLSCREEN_WIDTH};
use crate::error::{AppError, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Messages sent from background tasks to the main thread
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMessage {
    /// The prompter entered or left fullscreen
    FullscreenChanged { active: bool },

    /// Resize event after debounce timeout
    ResizeComplete { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

/// Decide the outcome of a fullscreen request for a terminal of `size`.
///
/// Entering fails when the terminal cannot hold a usable prompter; exiting
/// always succeeds.
pub fn resolve_fullscreen(request: FullscreenRequest, size: (u16, u16)) -> Result<bool> {
    match request {
        FullscreenRequest::Exit => Ok(false),
        FullscreenRequest::Enter => {
            let (width, height) = size;
            if width < MIN_FULLSCREEN_WIDTH || height < MIN_FULLSCREEN_HEIGHT {
                return Err(AppError::FullscreenUnavailable(format!(
                    "terminal is {}x{}, need at least {}x{}",
                    width, height, MIN_FULLSCREEN_WIDTH, MIN_FULLSCREEN_HEIGHT
                )));
            }
            Ok(true)
        }
    }
}

/// Manages spawning and communication with background tasks
pub struct AsyncTaskRunner {
    tx: mpsc::UnboundedSender<TaskMessage>,
}

impl AsyncTaskRunner {
    /// Create a new task runner
    pub fn new(tx: mpsc::UnboundedSender<TaskMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a fullscreen request.
    ///
    /// `size_query` reports the terminal size; on success a
    /// [`TaskMessage::FullscreenChanged`] is sent, on failure the error is
    /// logged and nothing changes.
    pub fn spawn_fullscreen_request<F>(
        &self,
        request: FullscreenRequest,
        size_query: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce() -> std::io::Result<(u16, u16)> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move { fullscreen_task(request, size_query, tx).await })
    }

    /// Spawn a resize debouncer
    ///
    /// Collects resize events and sends a single resize message after debounce timeout
    pub fn spawn_resize_debouncer(&self, debounce_ms: u64) -> mpsc::UnboundedSender<(u16, u16)> {
        let tx = self.tx.clone();
        let (resize_tx, resize_rx) = mpsc::unbounded_channel::<(u16, u16)>();

        tokio::spawn(async move { resize_debounce_task(resize_rx, tx, debounce_ms).await });

        resize_tx
    }
}

/// Background task for a fullscreen request
async fn fullscreen_task<F>(
    request: FullscreenRequest,
    size_query: F,
    tx: mpsc::UnboundedSender<TaskMessage>,
) where
    F: FnOnce() -> std::io::Result<(u16, u16)> + Send + 'static,
{
    tracing::debug!("Fullscreen request: {:?}", request);

    // Querying the terminal is blocking I/O
    let size = match tokio::task::spawn_blocking(size_query).await {
        Ok(Ok(size)) => size,
        Ok(Err(e)) => {
            tracing::error!("Error toggling fullscreen: {}", AppError::from(e));
            return;
        }
        Err(e) => {
            tracing::error!("Error toggling fullscreen: task join error: {}", e);
            return;
        }
    };

    match resolve_fullscreen(request, size) {
        Ok(active) => {
            tracing::info!("Fullscreen {}", if active { "entered" } else { "exited" });
            let _ = tx.send(TaskMessage::FullscreenChanged { active });
        }
        Err(e) => {
            tracing::error!("Error toggling fullscreen: {}", e);
        }
    }
}

/// Background task for debouncing resize events
async fn resize_debounce_task(
    mut resize_rx: mpsc::UnboundedReceiver<(u16, u16)>,
    tx: mpsc::UnboundedSender<TaskMessage>,
    debounce_ms: u64,
) {
    tracing::debug!("Resize debouncer started (debounce: {}ms)", debounce_ms);
    let mut last_size: Option<(u16, u16)> = None;

    loop {
        match tokio::time::timeout(Duration::from_millis(debounce_ms), resize_rx.recv()).await {
            Ok(Some(size)) => {
                // Got new resize event
                tracing::trace!("Resize event received: {}x{}", size.0, size.1);
                last_size = Some(size);
            }
            Ok(None) => {
                tracing::debug!("Resize channel closed");
                break;
            }
            Err(_) => {
                // Timeout - no more resize events for debounce period
                if let Some((width, height)) = last_size.take() {
                    tracing::debug!("Debounced resize event: {}x{}", width, height);
                    let _ = tx.send(TaskMessage::ResizeComplete { width, height });
                }
            }
        }
    }
}
