// WolPanel - app/config_sync.rs
//
// Load/save lifecycle for the relay's client configuration. Each request runs
// on its own background thread and reports back over an mpsc channel that
// the UI thread drains once per frame.
//
// Sequencing:
//   - Every request gets a sequence number from one monotonic counter.
//   - Only the reply to the most recent load is applied, and a load reply is
//     dropped if a save was requested after that load was sent (the server
//     snapshot it carries predates local edits).
//   - At most one save is in flight. Saves requested meanwhile are coalesced
//     into a single queued save carrying the newest document, sent as soon as
//     the in-flight save finishes. The server therefore sees writes in issue
//     order and ends on the newest list.

use crate::app::api::RelayApi;
use crate::core::model::{ClientConfig, ClientId, ConfigDocument, SaveResponse};
use crate::util::error::ApiError;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// A request to replace the server-side client list.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Full snapshot of the list, in render order.
    pub document: ConfigDocument,
    /// Panel whose form triggered the save (None for deletes).
    pub origin: Option<ClientId>,
}

/// Result of a save as seen by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The relay stored the list.
    Saved,
    /// The relay answered but reported `success: false`.
    Rejected { message: Option<String> },
    /// Transport failure, non-2xx status, or undecodable reply.
    Failed { error: String },
}

/// Sequenced results delivered to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The most recent load succeeded.
    Loaded { clients: Vec<ClientConfig> },
    /// The most recent load failed.
    LoadFailed { error: String },
    /// A save finished. `origins` lists every panel whose submit was folded
    /// into this save.
    Saved {
        origins: Vec<ClientId>,
        outcome: SaveOutcome,
    },
}

/// Raw replies from worker threads, before sequencing.
enum Reply {
    Load {
        seq: u64,
        result: Result<Vec<ClientConfig>, ApiError>,
    },
    Save {
        seq: u64,
        origins: Vec<ClientId>,
        result: Result<SaveResponse, ApiError>,
    },
}

struct QueuedSave {
    document: ConfigDocument,
    origins: Vec<ClientId>,
}

/// Issues config loads/saves on background threads and sequences replies.
pub struct ConfigSync {
    api: Arc<dyn RelayApi>,
    tx: mpsc::Sender<Reply>,
    rx: mpsc::Receiver<Reply>,
    next_seq: u64,
    /// Sequence of the load whose reply is still wanted.
    pending_load: Option<u64>,
    /// Sequence of the most recently requested save (sent or queued).
    last_save_requested: u64,
    save_in_flight: Option<u64>,
    queued_save: Option<QueuedSave>,
}

impl ConfigSync {
    pub fn new(api: Arc<dyn RelayApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            next_seq: 1,
            pending_load: None,
            last_save_requested: 0,
            save_in_flight: None,
            queued_save: None,
        }
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Fetch the client list. Supersedes any load still in flight.
    pub fn load(&mut self) {
        let seq = self.take_seq();
        self.pending_load = Some(seq);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = api.fetch_config();
            // Receiver gone means the app is shutting down.
            let _ = tx.send(Reply::Load { seq, result });
        });

        tracing::info!(seq, "Config load requested");
    }

    /// Replace the server-side list with `request.document`.
    pub fn save(&mut self, request: SaveRequest) {
        let seq = self.take_seq();
        self.last_save_requested = seq;

        if self.save_in_flight.is_some() {
            let queued = self.queued_save.get_or_insert_with(|| QueuedSave {
                document: ConfigDocument::default(),
                origins: Vec::new(),
            });
            queued.document = request.document;
            if let Some(origin) = request.origin {
                if !queued.origins.contains(&origin) {
                    queued.origins.push(origin);
                }
            }
            tracing::debug!(seq, "Save queued behind in-flight save");
            return;
        }

        self.dispatch_save(seq, request.document, request.origin.into_iter().collect());
    }

    fn dispatch_save(&mut self, seq: u64, document: ConfigDocument, origins: Vec<ClientId>) {
        self.save_in_flight = Some(seq);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let count = document.clients.len();
        std::thread::spawn(move || {
            let result = api.save_config(&document);
            let _ = tx.send(Reply::Save {
                seq,
                origins,
                result,
            });
        });

        tracing::info!(seq, clients = count, "Config save sent");
    }

    /// True while the reply to the latest load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// True while a save is in flight or queued.
    pub fn is_saving(&self) -> bool {
        self.save_in_flight.is_some() || self.queued_save.is_some()
    }

    /// Drain all pending replies without blocking.
    pub fn poll(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            self.handle_reply(reply, &mut events);
        }
        events
    }

    /// Block until every outstanding request has been answered or `timeout`
    /// elapses, returning the events produced on the way.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<SyncEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while self.is_loading() || self.is_saving() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!("Timed out waiting for config requests");
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(reply) => self.handle_reply(reply, &mut events),
                Err(_) => break,
            }
        }
        events
    }

    fn handle_reply(&mut self, reply: Reply, events: &mut Vec<SyncEvent>) {
        match reply {
            Reply::Load { seq, result } => {
                if self.pending_load != Some(seq) {
                    tracing::debug!(seq, "Dropping reply to superseded load");
                    return;
                }
                self.pending_load = None;

                if self.last_save_requested > seq {
                    tracing::debug!(seq, "Dropping load reply older than a later save");
                    return;
                }

                match result {
                    Ok(clients) => {
                        tracing::info!(seq, clients = clients.len(), "Config loaded");
                        events.push(SyncEvent::Loaded { clients });
                    }
                    Err(e) => {
                        tracing::warn!(seq, error = %e, "Config load failed");
                        events.push(SyncEvent::LoadFailed {
                            error: e.to_string(),
                        });
                    }
                }
            }
            Reply::Save {
                seq,
                origins,
                result,
            } => {
                if self.save_in_flight == Some(seq) {
                    self.save_in_flight = None;
                }

                let outcome = match result {
                    Ok(reply) if reply.success => {
                        tracing::info!(seq, "Config saved");
                        SaveOutcome::Saved
                    }
                    Ok(reply) => {
                        tracing::warn!(seq, message = ?reply.message, "Relay rejected config");
                        SaveOutcome::Rejected {
                            message: reply.message,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(seq, error = %e, "Config save failed");
                        SaveOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                events.push(SyncEvent::Saved { origins, outcome });

                if self.save_in_flight.is_none() {
                    if let Some(next) = self.queued_save.take() {
                        let seq = self.last_save_requested;
                        self.dispatch_save(seq, next.document, next.origins);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RelayLogRecord;
    use std::sync::Mutex;

    /// Fake relay: scripted config replies, records every POST body.
    #[derive(Default)]
    struct FakeRelay {
        loads: Mutex<Vec<(Duration, Vec<ClientConfig>)>>,
        save_delay: Duration,
        posted: Mutex<Vec<ConfigDocument>>,
        fail_saves: bool,
    }

    impl RelayApi for FakeRelay {
        fn fetch_config(&self) -> Result<Vec<ClientConfig>, ApiError> {
            let (delay, clients) = self.loads.lock().unwrap().remove(0);
            std::thread::sleep(delay);
            Ok(clients)
        }

        fn save_config(&self, document: &ConfigDocument) -> Result<SaveResponse, ApiError> {
            std::thread::sleep(self.save_delay);
            self.posted.lock().unwrap().push(document.clone());
            if self.fail_saves {
                return Err(ApiError::Status {
                    url: "http://fake/api/config".to_string(),
                    status: 500,
                });
            }
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        fn fetch_logs(&self) -> Result<Vec<RelayLogRecord>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn named(topic: &str) -> ClientConfig {
        ClientConfig {
            topic: topic.to_string(),
            ..Default::default()
        }
    }

    fn doc(topics: &[&str]) -> ConfigDocument {
        ConfigDocument {
            clients: topics.iter().map(|t| named(t)).collect(),
        }
    }

    #[test]
    fn test_stale_load_reply_is_dropped() {
        let relay = Arc::new(FakeRelay::default());
        relay.loads.lock().unwrap().extend([
            (Duration::from_millis(300), vec![named("stale")]),
            (Duration::from_millis(0), vec![named("fresh")]),
        ]);
        let mut sync = ConfigSync::new(relay);

        sync.load();
        // Make sure the first worker has taken the slow script entry.
        std::thread::sleep(Duration::from_millis(50));
        sync.load();
        let mut events = sync.wait_idle(Duration::from_secs(5));
        // Let the slow reply arrive and be discarded.
        std::thread::sleep(Duration::from_millis(400));
        events.extend(sync.poll());

        assert_eq!(
            events,
            vec![SyncEvent::Loaded {
                clients: vec![named("fresh")]
            }]
        );
        assert!(!sync.is_loading());
    }

    #[test]
    fn test_rapid_saves_are_serialised_and_coalesced() {
        let relay = Arc::new(FakeRelay {
            save_delay: Duration::from_millis(100),
            ..Default::default()
        });
        let mut sync = ConfigSync::new(relay.clone());

        sync.save(SaveRequest {
            document: doc(&["a"]),
            origin: Some(ClientId(1)),
        });
        sync.save(SaveRequest {
            document: doc(&["a", "b"]),
            origin: Some(ClientId(2)),
        });
        sync.save(SaveRequest {
            document: doc(&["a", "b", "c"]),
            origin: None,
        });
        assert!(sync.is_saving());

        let events = sync.wait_idle(Duration::from_secs(5));
        let posted = relay.posted.lock().unwrap().clone();

        assert_eq!(posted, vec![doc(&["a"]), doc(&["a", "b", "c"])]);
        assert_eq!(
            events,
            vec![
                SyncEvent::Saved {
                    origins: vec![ClientId(1)],
                    outcome: SaveOutcome::Saved
                },
                SyncEvent::Saved {
                    origins: vec![ClientId(2)],
                    outcome: SaveOutcome::Saved
                },
            ]
        );
    }

    #[test]
    fn test_load_reply_older_than_save_is_dropped() {
        let relay = Arc::new(FakeRelay::default());
        relay
            .loads
            .lock()
            .unwrap()
            .push((Duration::from_millis(200), vec![named("server")]));
        let mut sync = ConfigSync::new(relay);

        sync.load();
        sync.save(SaveRequest {
            document: doc(&["local"]),
            origin: None,
        });
        let events = sync.wait_idle(Duration::from_secs(5));

        assert!(events
            .iter()
            .all(|e| !matches!(e, SyncEvent::Loaded { .. })));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_failed_save_reports_error() {
        let relay = Arc::new(FakeRelay {
            fail_saves: true,
            ..Default::default()
        });
        let mut sync = ConfigSync::new(relay);
        sync.save(SaveRequest {
            document: doc(&["a"]),
            origin: Some(ClientId(7)),
        });
        let events = sync.wait_idle(Duration::from_secs(5));
        match &events[..] {
            [SyncEvent::Saved {
                origins,
                outcome: SaveOutcome::Failed { error },
            }] => {
                assert_eq!(origins, &vec![ClientId(7)]);
                assert!(error.contains("500"));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
