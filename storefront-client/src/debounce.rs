//! Debounced search input
//!
//! Raw keystrokes go in; one value comes out once the input has been
//! quiet for the whole window. Each keystroke restarts the window.
//! Cancelling or dropping the input mid-burst emits nothing.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Idle deadline used while no value is pending
const IDLE_WAIT_SECS: u64 = 3600;

pub struct DebouncedSearchInput {
    input_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl DebouncedSearchInput {
    /// Start the debounce task
    ///
    /// Returns the input handle and the receiver of settled values. The
    /// task stops when `shutdown` is cancelled, when this handle is
    /// dropped, or when the receiver is dropped.
    pub fn spawn(
        window: Duration,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let cancel = shutdown.child_token();
        let handle = tokio::spawn(run(window, cancel.clone(), input_rx, output_tx));
        (
            Self {
                input_tx,
                cancel,
                handle,
            },
            output_rx,
        )
    }

    /// Feed one raw input value
    pub fn input(&self, value: impl Into<String>) {
        // Fails only after the task has stopped
        let _ = self.input_tx.send(value.into());
    }

    /// Stop without emitting a pending value
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DebouncedSearchInput {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    window: Duration,
    cancel: CancellationToken,
    mut input_rx: mpsc::UnboundedReceiver<String>,
    output_tx: mpsc::UnboundedSender<String>,
) {
    let mut pending: Option<String> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let sleep_until =
            deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(IDLE_WAIT_SECS));

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                if pending.is_some() {
                    tracing::debug!("Search input cancelled, dropping pending value");
                }
                break;
            }

            _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                deadline = None;
                if let Some(value) = pending.take() {
                    tracing::debug!(term = %value, "Search input settled");
                    if output_tx.send(value).is_err() {
                        break;
                    }
                }
            }

            value = input_rx.recv() => {
                match value {
                    Some(value) => {
                        pending = Some(value);
                        deadline = Some(Instant::now() + window);
                    }
                    None => break,
                }
            }
        }
    }
}
