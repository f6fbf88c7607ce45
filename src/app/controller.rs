// WolPanel - app/controller.rs
//
// Drives the background workers from the UI thread: starts the initial load
// and log polling, applies their results to `AppState` once per frame, and
// dispatches the save/reload requests panels leave in the state.

use crate::app::api::RelayApi;
use crate::app::config_sync::{ConfigSync, SyncEvent};
use crate::app::log_poll::{LogPoller, PollProgress};
use crate::app::state::AppState;
use crate::util::constants::MAX_POLL_MESSAGES_PER_FRAME;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Owns the application state together with the workers that feed it.
pub struct Controller {
    pub state: AppState,
    api: Arc<dyn RelayApi>,
    sync: ConfigSync,
    poller: LogPoller,
    poll_interval: Duration,
}

impl Controller {
    pub fn new(state: AppState, api: Arc<dyn RelayApi>, poll_interval: Duration) -> Self {
        Self {
            state,
            sync: ConfigSync::new(Arc::clone(&api)),
            api,
            poller: LogPoller::new(),
            poll_interval,
        }
    }

    /// Record startup, fetch the client list and begin log polling.
    pub fn start(&mut self) {
        self.state.record_startup();
        self.sync.load();
        self.poller.start(Arc::clone(&self.api), self.poll_interval);
        self.update_busy();
    }

    /// Process everything that happened since the last frame.
    pub fn tick(&mut self, now: Instant) {
        for event in self.sync.poll() {
            self.apply_event(event, now);
        }

        for msg in self.poller.poll_progress(MAX_POLL_MESSAGES_PER_FRAME) {
            match msg {
                PollProgress::Records { records } => {
                    self.state.logs.ingest(records);
                }
                PollProgress::Started | PollProgress::Stopped => {}
            }
        }

        self.dispatch_requests();
        self.state.expire_notices(now);
        self.update_busy();
    }

    /// Send whatever the panels asked for during the last frame.
    pub fn dispatch_requests(&mut self) {
        if let Some(request) = self.state.pending_save.take() {
            self.sync.save(request);
        }
        if std::mem::take(&mut self.state.request_reload) {
            self.sync.load();
        }
    }

    fn apply_event(&mut self, event: SyncEvent, now: Instant) {
        match event {
            SyncEvent::Loaded { clients } => self.state.apply_loaded(clients),
            SyncEvent::LoadFailed { error } => self.state.apply_load_failed(&error),
            SyncEvent::Saved { origins, outcome } => {
                self.state.apply_save_outcome(&origins, &outcome, now)
            }
        }
    }

    fn update_busy(&mut self) {
        self.state.busy_message = if self.sync.is_saving() {
            Some("Saving configuration...".to_string())
        } else if self.sync.is_loading() {
            Some("Loading configuration...".to_string())
        } else {
            None
        };
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// Block until outstanding config requests finish, applying their
    /// results. Used at shutdown and in tests.
    pub fn settle(&mut self, timeout: Duration) {
        self.dispatch_requests();
        let now = Instant::now();
        for event in self.sync.wait_idle(timeout) {
            self.apply_event(event, now);
        }
        self.update_busy();
    }

    /// Stop log polling. Config requests in flight are left to finish.
    pub fn shutdown(&mut self) {
        self.poller.stop();
    }
}
