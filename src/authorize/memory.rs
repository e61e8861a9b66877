//! In-memory default implementations for the collaborator traits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use dashmap::DashMap;
use super::error::AuthorizeError;
use super::provider::{ClientManager, ConsentStore};
use super::types::{Client, Scope};

#[derive(Clone, Default)]
pub struct InMemoryClientManager {
    clients: Arc<DashMap<String, Client>>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryClientManager {
    /// Creates a new in-memory client manager with an initial set of clients.
    pub fn new(initial_clients: Vec<Client>) -> Self {
        let map = DashMap::new();
        for client in initial_clients {
            map.insert(client.id.clone(), client);
        }
        Self { clients: Arc::new(map), lookups: Arc::new(AtomicUsize::new(0)) }
    }

    /// Inserts or replaces a client.
    pub fn save(&self, client: Client) {
        self.clients.insert(client.id.clone(), client);
    }

    /// Removes a client, returning it if it was present.
    pub fn remove(&self, identifier: &str) -> Option<Client> {
        self.clients.remove(identifier).map(|(_, client)| client)
    }

    /// Number of `find` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ClientManager for InMemoryClientManager {
    async fn find(&self, identifier: &str) -> Result<Option<Client>, AuthorizeError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.clients.get(identifier).map(|entry| entry.value().clone()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryConsentStore {
    consents: Arc<DashMap<(String, String), Vec<Scope>>>,
}

impl InMemoryConsentStore {
    /// Creates a new, empty in-memory consent store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsentStore for InMemoryConsentStore {
    async fn record_consent(&self, client_id: &str, owner_id: &str, scopes: &[Scope]) -> Result<(), AuthorizeError> {
        let key = (client_id.to_owned(), owner_id.to_owned());
        self.consents.insert(key, scopes.to_vec());
        Ok(())
    }

    async fn check_consent(&self, client_id: &str, owner_id: &str, scopes: &[Scope]) -> Result<bool, AuthorizeError> {
        let key = (client_id.to_owned(), owner_id.to_owned());
        match self.consents.get(&key) {
            Some(entry) => {
                let granted = entry.value();
                Ok(scopes.iter().all(|s| granted.contains(s)))
            }
            None => Ok(false),
        }
    }
}
