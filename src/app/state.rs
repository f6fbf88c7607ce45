// WolPanel - app/state.rs
//
// Application state: the client list with its per-panel form state, the
// activity log, and the flags panels raise for the controller to act on
// (pending save, reload request, confirmation prompt).
// Owned by the `Controller`; rendered by the ui layer.

use crate::app::config_sync::{SaveOutcome, SaveRequest};
use crate::app::log_manager::LogManager;
use crate::core::clients::ClientList;
use crate::core::model::{ClientConfig, ClientId, LogKind};
use crate::core::validate::{self, FormErrors};
use crate::util::constants::{CONFIG_LOG_SOURCE, NOTICE_DISPLAY_MS, SYSTEM_LOG_SOURCE};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A message shown in the banner or inside a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// None = stays until dismissed or replaced.
    pub expires_at: Option<Instant>,
}

impl Notice {
    /// A notice that disappears after `NOTICE_DISPLAY_MS`.
    pub fn transient(kind: NoticeKind, text: impl Into<String>, now: Instant) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: Some(now + Duration::from_millis(NOTICE_DISPLAY_MS)),
        }
    }

    /// A notice that stays until dismissed.
    pub fn sticky(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|t| now >= t)
    }
}

/// UI state of one client panel. Not persisted; rebuilt on every load.
#[derive(Debug, Clone)]
pub struct PanelState {
    /// Form contents, committed to the client list only on a valid submit.
    pub draft: ClientConfig,
    /// Errors from the most recent validation pass.
    pub errors: FormErrors,
    pub expanded: bool,
    pub show_password: bool,
    /// Inline save result.
    pub notice: Option<Notice>,
}

impl PanelState {
    fn new(config: &ClientConfig) -> Self {
        Self {
            draft: config.clone(),
            errors: FormErrors::default(),
            expanded: false,
            show_password: false,
            notice: None,
        }
    }
}

/// An action waiting for the operator's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteClient(ClientId),
    ClearLogs,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Client configurations in render order.
    pub clients: ClientList,

    /// Form state per client.
    pub panels: HashMap<ClientId, PanelState>,

    /// Activity log.
    pub logs: LogManager,

    /// Page-level alert (load failure, logs cleared, ...).
    pub banner: Option<Notice>,

    /// Confirmation prompt currently shown.
    pub confirm: Option<PendingConfirm>,

    /// Save the controller should send on its next tick.
    pub pending_save: Option<SaveRequest>,

    /// Set when a panel asks for the list to be re-fetched.
    pub request_reload: bool,

    /// Panel whose topic field should take keyboard focus next frame.
    pub focus_client: Option<ClientId>,

    /// "Loading..." / "Saving..." while requests are outstanding.
    pub busy_message: Option<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Relay base URL, shown in the status bar.
    pub server_url: String,

    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    /// Body font size in points.
    pub font_size: f32,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(logs: LogManager, server_url: impl Into<String>, debug_mode: bool) -> Self {
        Self {
            clients: ClientList::new(),
            panels: HashMap::new(),
            logs,
            banner: None,
            confirm: None,
            pending_save: None,
            request_reload: false,
            focus_client: None,
            busy_message: None,
            status_message: "Connecting to relay...".to_string(),
            server_url: server_url.into(),
            dark_mode: true,
            font_size: crate::util::constants::DEFAULT_FONT_SIZE,
            show_about: false,
            debug_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Client list
    // -------------------------------------------------------------------------

    /// Replace the list with a fresh server snapshot and rebuild all panels.
    pub fn apply_loaded(&mut self, configs: Vec<ClientConfig>) {
        self.clients.replace_all(configs);
        self.rebuild_panels();
        self.status_message = format!("Loaded {} client(s).", self.clients.len());
    }

    /// Report a failed load; the current list stays as it is.
    pub fn apply_load_failed(&mut self, error: &str) {
        self.banner = Some(Notice::sticky(
            NoticeKind::Error,
            format!("Failed to load configuration ({error}). Use Reload to try again."),
        ));
        self.status_message = "Configuration load failed.".to_string();
    }

    fn rebuild_panels(&mut self) {
        self.panels = self
            .clients
            .entries()
            .iter()
            .map(|e| (e.id, PanelState::new(&e.config)))
            .collect();
    }

    /// Append a blank client with a generated topic. Nothing is sent to the
    /// relay until the operator saves it.
    pub fn add_new_client(&mut self, epoch_ms: i64) -> ClientId {
        let config = ClientConfig::placeholder(epoch_ms);
        let mut panel = PanelState::new(&config);
        panel.expanded = true;

        let id = self.clients.push(config);
        self.panels.insert(id, panel);
        self.focus_client = Some(id);
        tracing::debug!(client = %id, "Client added locally");
        id
    }

    /// Validate the panel's draft; on success commit it and queue a save of
    /// the whole list. Returns whether the form was valid.
    pub fn submit_client(&mut self, id: ClientId) -> bool {
        let Some(panel) = self.panels.get_mut(&id) else {
            return false;
        };

        panel.errors = validate::validate_client(&panel.draft);
        if !panel.errors.is_valid() {
            tracing::debug!(
                client = %id,
                fields = ?panel.errors.fields().collect::<Vec<_>>(),
                "Form validation failed"
            );
            return false;
        }

        // Whitespace only matters to validation; values are committed as entered.
        panel.notice = None;
        if !self.clients.update(id, panel.draft.clone()) {
            return false;
        }

        self.pending_save = Some(SaveRequest {
            document: self.clients.to_document(),
            origin: Some(id),
        });
        true
    }

    /// Discard edits by re-fetching the list from the relay.
    pub fn cancel_edit(&mut self, _id: ClientId) {
        self.request_reload = true;
    }

    pub fn request_delete(&mut self, id: ClientId) {
        self.confirm = Some(PendingConfirm::DeleteClient(id));
    }

    /// Remove a client and queue a save of the remaining list.
    pub fn delete_client(&mut self, id: ClientId) {
        let Some(removed) = self.clients.remove(id) else {
            return;
        };
        self.panels.remove(&id);
        if self.focus_client == Some(id) {
            self.focus_client = None;
        }
        tracing::info!(topic = %removed.topic, "Client deleted");

        self.pending_save = Some(SaveRequest {
            document: self.clients.to_document(),
            origin: None,
        });
    }

    pub fn toggle_expanded(&mut self, id: ClientId) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.expanded = !panel.expanded;
        }
    }

    pub fn toggle_password(&mut self, id: ClientId) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.show_password = !panel.show_password;
        }
    }

    /// Report a finished save inline and in the activity log.
    pub fn apply_save_outcome(&mut self, origins: &[ClientId], outcome: &SaveOutcome, now: Instant) {
        let (log_message, kind, notice) = match outcome {
            SaveOutcome::Saved => (
                "Configuration saved".to_string(),
                LogKind::Success,
                Notice::transient(NoticeKind::Success, "Saved.", now),
            ),
            SaveOutcome::Rejected { message } => {
                let reason = message.as_deref().unwrap_or("unknown error");
                (
                    format!("Configuration save failed: {reason}"),
                    LogKind::Error,
                    Notice::sticky(NoticeKind::Error, format!("Save failed: {reason}")),
                )
            }
            SaveOutcome::Failed { error } => (
                format!("Configuration save failed: {error}"),
                LogKind::Error,
                Notice::sticky(NoticeKind::Error, "Save failed: network error."),
            ),
        };

        for id in origins {
            if let Some(panel) = self.panels.get_mut(id) {
                panel.notice = Some(notice.clone());
            }
        }
        self.status_message = log_message.clone();
        self.logs.add_log(log_message, kind, CONFIG_LOG_SOURCE);
    }

    // -------------------------------------------------------------------------
    // Activity log
    // -------------------------------------------------------------------------

    pub fn request_clear_logs(&mut self) {
        self.confirm = Some(PendingConfirm::ClearLogs);
    }

    pub fn clear_logs(&mut self, now: Instant) {
        match self.logs.clear() {
            Ok(()) => {
                self.banner = Some(Notice::transient(NoticeKind::Success, "Logs cleared.", now));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear activity log");
                self.banner = Some(Notice::sticky(
                    NoticeKind::Error,
                    format!("Could not clear logs: {e}"),
                ));
            }
        }
    }

    /// Surface config.toml problems found at start-up.
    pub fn show_config_warnings(&mut self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        self.banner = Some(Notice::sticky(
            NoticeKind::Error,
            format!("config.toml: {}", warnings.join(" ")),
        ));
    }

    /// Record that the panel has started.
    pub fn record_startup(&mut self) {
        self.logs
            .add_log("Admin panel started", LogKind::Info, SYSTEM_LOG_SOURCE);
    }

    // -------------------------------------------------------------------------
    // Confirmation and notices
    // -------------------------------------------------------------------------

    /// Resolve the open confirmation prompt.
    pub fn answer_confirm(&mut self, accepted: bool, now: Instant) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        if !accepted {
            return;
        }
        match pending {
            PendingConfirm::DeleteClient(id) => self.delete_client(id),
            PendingConfirm::ClearLogs => self.clear_logs(now),
        }
    }

    /// Drop notices whose display time has passed.
    pub fn expire_notices(&mut self, now: Instant) {
        if self.banner.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.banner = None;
        }
        for panel in self.panels.values_mut() {
            if panel.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
                panel.notice = None;
            }
        }
    }

    /// Earliest expiry among visible notices, used to schedule a repaint.
    pub fn next_notice_expiry(&self) -> Option<Instant> {
        self.banner
            .iter()
            .chain(self.panels.values().filter_map(|p| p.notice.as_ref()))
            .filter_map(|n| n.expires_at)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::log_store::LogStore;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        let logs = LogManager::new(LogStore::new(dir.path().join("wol_logs.json"), 100));
        AppState::new(logs, "http://relay", false)
    }

    fn valid(topic: &str) -> ClientConfig {
        ClientConfig {
            topic: topic.to_string(),
            target_mac: "AA:BB:CC:DD:EE:FF".to_string(),
            broadcast_ip: "192.168.1.255".to_string(),
            ip: "192.168.1.10".to_string(),
            username: "admin".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_add_then_delete_restores_list() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a"), valid("b")]);
        let before = s.clients.to_document();

        let id = s.add_new_client(1_700_000_000_000);
        assert_eq!(s.clients.len(), 3);
        assert!(s.panels[&id].expanded);
        assert_eq!(s.focus_client, Some(id));
        assert!(s.pending_save.is_none(), "adding must not contact the relay");

        s.request_delete(id);
        s.answer_confirm(true, Instant::now());
        assert_eq!(s.clients.to_document(), before);
        assert_eq!(s.focus_client, None);
    }

    #[test]
    fn test_declined_delete_keeps_client() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a")]);
        let id = s.clients.ids().next().unwrap();

        s.request_delete(id);
        s.answer_confirm(false, Instant::now());
        assert_eq!(s.clients.len(), 1);
        assert!(s.pending_save.is_none());
        assert!(s.confirm.is_none());
    }

    #[test]
    fn test_delete_queues_save_of_remaining_list() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a"), valid("b"), valid("c")]);
        let b = s.clients.ids().nth(1).unwrap();

        s.delete_client(b);
        let save = s.pending_save.take().unwrap();
        let topics: Vec<_> = save.document.clients.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["a", "c"]);
        assert_eq!(save.origin, None);
    }

    #[test]
    fn test_invalid_submit_sets_errors_and_does_not_save() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        let id = s.add_new_client(1);

        assert!(!s.submit_client(id));
        assert!(!s.panels[&id].errors.is_valid());
        assert!(s.pending_save.is_none());
        assert_eq!(s.clients.get(id).unwrap().target_mac, "");
    }

    #[test]
    fn test_valid_submit_commits_draft_and_saves_full_list_in_order() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a"), valid("b")]);
        let a = s.clients.ids().next().unwrap();

        s.panels.get_mut(&a).unwrap().draft.ip = "10.0.0.7".to_string();
        assert!(s.submit_client(a));

        let save = s.pending_save.take().unwrap();
        assert_eq!(save.origin, Some(a));
        assert_eq!(save.document.clients.len(), 2);
        assert_eq!(save.document.clients[0].ip, "10.0.0.7");
        assert_eq!(save.document.clients[1].topic, "b");
        assert!(s.panels[&a].errors.is_valid());
    }

    #[test]
    fn test_padded_values_validate_but_are_saved_as_entered() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a")]);
        let a = s.clients.ids().next().unwrap();

        {
            let draft = &mut s.panels.get_mut(&a).unwrap().draft;
            draft.topic = " office-pc ".to_string();
            draft.target_mac = " AA:BB:CC:DD:EE:FF".to_string();
            draft.ip = "10.0.0.7 ".to_string();
        }
        assert!(s.submit_client(a));

        let save = s.pending_save.take().unwrap();
        let posted = &save.document.clients[0];
        assert_eq!(posted.topic, " office-pc ");
        assert_eq!(posted.target_mac, " AA:BB:CC:DD:EE:FF");
        assert_eq!(posted.ip, "10.0.0.7 ");
        assert_eq!(s.panels[&a].draft.ip, "10.0.0.7 ");
    }

    #[test]
    fn test_resubmit_clears_previous_errors() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        let id = s.add_new_client(1);
        assert!(!s.submit_client(id));

        s.panels.get_mut(&id).unwrap().draft = valid("fixed");
        assert!(s.submit_client(id));
        assert!(s.panels[&id].errors.is_valid());
    }

    #[test]
    fn test_load_failure_keeps_list_and_shows_banner() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a")]);
        s.apply_load_failed("HTTP 500");

        assert_eq!(s.clients.len(), 1);
        let banner = s.banner.as_ref().unwrap();
        assert_eq!(banner.kind, NoticeKind::Error);
        assert!(banner.expires_at.is_none());
    }

    #[test]
    fn test_save_outcome_is_logged_and_shown_inline() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a")]);
        let a = s.clients.ids().next().unwrap();
        let now = Instant::now();

        s.apply_save_outcome(&[a], &SaveOutcome::Saved, now);
        assert_eq!(s.panels[&a].notice.as_ref().unwrap().kind, NoticeKind::Success);
        let last = s.logs.entries().last().unwrap();
        assert_eq!(last.kind, LogKind::Success);
        assert_eq!(last.source, "config");

        s.expire_notices(now + Duration::from_millis(NOTICE_DISPLAY_MS));
        assert!(s.panels[&a].notice.is_none());

        s.apply_save_outcome(
            &[a],
            &SaveOutcome::Rejected {
                message: Some("disk full".to_string()),
            },
            now,
        );
        let notice = s.panels[&a].notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("disk full"));
        assert!(s.logs.entries().last().unwrap().message.contains("disk full"));
    }

    #[test]
    fn test_reload_rebuilds_panels_collapsed() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.apply_loaded(vec![valid("a")]);
        let old = s.clients.ids().next().unwrap();
        s.toggle_expanded(old);
        assert!(s.panels[&old].expanded);

        s.apply_loaded(vec![valid("a")]);
        assert!(!s.panels.contains_key(&old));
        assert!(s.panels.values().all(|p| !p.expanded));
    }

    #[test]
    fn test_config_warnings_go_to_banner() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.show_config_warnings(&[]);
        assert!(s.banner.is_none());

        s.show_config_warnings(&["[ui] theme = \"blue\" is not recognised.".to_string()]);
        let banner = s.banner.as_ref().unwrap();
        assert!(banner.text.contains("theme"));
        assert!(banner.expires_at.is_none());
    }

    #[test]
    fn test_clear_logs_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut s = state(&dir);
        s.record_startup();
        s.request_clear_logs();
        assert_eq!(s.logs.entries().len(), 1);

        s.answer_confirm(true, Instant::now());
        assert!(s.logs.entries().is_empty());
        assert_eq!(s.banner.as_ref().unwrap().kind, NoticeKind::Success);
    }
}
