// WolPanel - app/log_poll.rs
//
// Relay log polling: asks `GET /api/logs` for new records on a fixed
// interval and streams them to the UI thread.
//
// Architecture:
//   - `LogPoller` lives on the UI thread; `run_poll_loop` runs on a
//     background thread.
//   - An `Arc<AtomicBool>` cancel flag allows the UI to stop polling; the
//     poller also stops itself when dropped.
//   - Records are sent as `PollProgress::Records` over an mpsc channel that
//     the UI thread drains each frame.
//
// Fetch failures are logged and otherwise ignored; the next tick simply tries
// again. There is no retry or backoff, and no dedup beyond what the relay
// does (it drains its queue on every read).

use crate::app::api::RelayApi;
use crate::core::model::RelayLogRecord;
use crate::util::constants::POLL_CANCEL_CHECK_INTERVAL_MS;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Messages from the poll thread to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PollProgress {
    /// The poll thread is running.
    Started,
    /// New records arrived from the relay, in relay order.
    Records { records: Vec<RelayLogRecord> },
    /// The poll thread exited after a stop request.
    Stopped,
}

/// Manages the relay log poll thread.
pub struct LogPoller {
    /// Channel receiver for the UI to poll progress messages.
    progress_rx: Option<mpsc::Receiver<PollProgress>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl LogPoller {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start polling `api` every `interval`. If polling is already running it
    /// is stopped first.
    pub fn start(&mut self, api: Arc<dyn RelayApi>, interval: Duration) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            run_poll_loop(api, interval, tx, cancel);
        });

        tracing::info!(interval_ms = interval.as_millis() as u64, "Log polling started");
    }

    /// Request the background thread to stop.
    ///
    /// The thread exits within `POLL_CANCEL_CHECK_INTERVAL_MS` (or after the
    /// request in progress returns).
    pub fn stop(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
            tracing::info!("Log polling stopped");
        }
        self.progress_rx = None;
    }

    /// Returns `true` while a poll thread is active.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Drain up to `max` queued messages without blocking.
    pub fn poll_progress(&self, max: usize) -> Vec<PollProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while messages.len() < max {
                match rx.try_recv() {
                    Ok(msg) => messages.push(msg),
                    Err(_) => break,
                }
            }
        }
        messages
    }
}

impl Default for LogPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background poll loop.
fn run_poll_loop(
    api: Arc<dyn RelayApi>,
    interval: Duration,
    tx: mpsc::Sender<PollProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // UI channel closed, exit silently.
                return;
            }
        };
    }

    send!(PollProgress::Started);

    let check = Duration::from_millis(POLL_CANCEL_CHECK_INTERVAL_MS);
    let slices = (interval.as_millis() as u64 / POLL_CANCEL_CHECK_INTERVAL_MS).max(1);

    loop {
        for _ in 0..slices {
            std::thread::sleep(check);
            if cancel.load(Ordering::SeqCst) {
                let _ = tx.send(PollProgress::Stopped);
                return;
            }
        }

        match api.fetch_logs() {
            Ok(records) if records.is_empty() => {}
            Ok(records) => {
                tracing::debug!(count = records.len(), "Relay log records received");
                send!(PollProgress::Records { records });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Relay log fetch failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ClientConfig, ConfigDocument, LogKind, SaveResponse};
    use crate::util::error::ApiError;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Returns one record per call, or a 502 on every other call.
    #[derive(Default)]
    struct CountingRelay {
        calls: AtomicUsize,
    }

    impl RelayApi for CountingRelay {
        fn fetch_config(&self) -> Result<Vec<ClientConfig>, ApiError> {
            Ok(Vec::new())
        }

        fn save_config(&self, _: &ConfigDocument) -> Result<SaveResponse, ApiError> {
            Ok(SaveResponse::default())
        }

        fn fetch_logs(&self) -> Result<Vec<RelayLogRecord>, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(ApiError::Status {
                    url: "http://fake/api/logs".to_string(),
                    status: 502,
                });
            }
            Ok(vec![RelayLogRecord {
                timestamp: n as f64,
                message: format!("record {n}"),
                kind: LogKind::Info,
                source: "mqtt".to_string(),
            }])
        }
    }

    fn collect_until(poller: &LogPoller, want_records: usize) -> Vec<PollProgress> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            seen.extend(poller.poll_progress(100));
            let records = seen
                .iter()
                .filter(|m| matches!(m, PollProgress::Records { .. }))
                .count();
            if records >= want_records {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        seen
    }

    #[test]
    fn test_poller_survives_fetch_errors() {
        let relay = Arc::new(CountingRelay::default());
        let mut poller = LogPoller::new();
        poller.start(relay.clone(), Duration::from_millis(100));

        let seen = collect_until(&poller, 2);
        poller.stop();

        assert_eq!(seen.first(), Some(&PollProgress::Started));
        let messages: Vec<String> = seen
            .iter()
            .filter_map(|m| match m {
                PollProgress::Records { records } => Some(records[0].message.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(messages[..2], ["record 0".to_string(), "record 2".to_string()]);
        assert!(relay.calls.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_stop_halts_requests() {
        let relay = Arc::new(CountingRelay::default());
        let mut poller = LogPoller::new();
        poller.start(relay.clone(), Duration::from_millis(100));
        collect_until(&poller, 1);
        poller.stop();
        assert!(!poller.is_active());

        // Allow an in-progress tick to finish, then expect silence.
        std::thread::sleep(Duration::from_millis(250));
        let after_stop = relay.calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(400));
        assert_eq!(relay.calls.load(Ordering::SeqCst), after_stop);
    }
}
