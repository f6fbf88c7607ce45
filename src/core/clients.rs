// WolPanel - core/clients.rs
//
// Ordered in-memory list of client configurations.
//
// List order is render order is submission order. Each entry carries a
// `ClientId` assigned here from a monotonic counter, so UI actions keep
// addressing the right client even after entries before it are removed.

use crate::core::model::{ClientConfig, ClientId, ConfigDocument};

/// One configuration together with its local identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub id: ClientId,
    pub config: ClientConfig,
}

/// Ordered client configurations with stable ids.
#[derive(Debug, Default)]
pub struct ClientList {
    entries: Vec<ClientEntry>,
    next_id: u64,
}

impl ClientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, assigning fresh ids in the given order.
    ///
    /// Ids from before the call are never reused.
    pub fn replace_all(&mut self, configs: Vec<ClientConfig>) {
        self.entries.clear();
        for config in configs {
            self.push(config);
        }
    }

    /// Append a configuration and return its id.
    pub fn push(&mut self, config: ClientConfig) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;
        self.entries.push(ClientEntry { id, config });
        id
    }

    /// Remove the entry with `id`, returning its configuration.
    pub fn remove(&mut self, id: ClientId) -> Option<ClientConfig> {
        let pos = self.position(id)?;
        Some(self.entries.remove(pos).config)
    }

    /// Overwrite the configuration for `id` in place. Returns false if `id`
    /// is no longer in the list.
    pub fn update(&mut self, id: ClientId, config: ClientConfig) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.config = config;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ClientId) -> Option<&ClientConfig> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.config)
    }

    /// Current index of `id` in render order.
    pub fn position(&self, id: ClientId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ClientEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the list in the shape the relay expects.
    pub fn to_document(&self) -> ConfigDocument {
        ConfigDocument {
            clients: self.entries.iter().map(|e| e.config.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(topic: &str) -> ClientConfig {
        ClientConfig {
            topic: topic.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_survive_removal_of_earlier_entries() {
        let mut list = ClientList::new();
        let a = list.push(named("a"));
        let b = list.push(named("b"));
        let c = list.push(named("c"));

        assert_eq!(list.remove(a).map(|c| c.topic), Some("a".to_string()));
        assert_eq!(list.get(c).map(|c| c.topic.as_str()), Some("c"));
        assert_eq!(list.position(b), Some(0));
        assert_eq!(list.position(c), Some(1));
    }

    #[test]
    fn test_replace_all_never_reuses_ids() {
        let mut list = ClientList::new();
        let old = list.push(named("old"));
        list.replace_all(vec![named("x"), named("y")]);

        assert!(list.get(old).is_none());
        assert!(list.ids().all(|id| id != old));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_update_missing_id_is_rejected() {
        let mut list = ClientList::new();
        let id = list.push(named("a"));
        list.remove(id);
        assert!(!list.update(id, named("b")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_document_preserves_order() {
        let mut list = ClientList::new();
        list.push(named("first"));
        list.push(named("second"));
        list.push(named("third"));
        let topics: Vec<_> = list
            .to_document()
            .clients
            .into_iter()
            .map(|c| c.topic)
            .collect();
        assert_eq!(topics, vec!["first", "second", "third"]);
    }
}
