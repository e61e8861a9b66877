//! Collaborator traits the authorization decision depends on.

use async_trait::async_trait;
use super::error::AuthorizeError;
use super::types::{Client, Scope};

/// Trait for looking up registered clients.
#[async_trait]
pub trait ClientManager: Send + Sync + 'static {
    /// Finds a client by identifier. `Ok(None)` means no such client exists;
    /// `Err` is reserved for storage failures.
    async fn find(&self, identifier: &str) -> Result<Option<Client>, AuthorizeError>;
}

/// Converts wire-format scope tokens into domain scopes.
///
/// Implementations must preserve order and must not deduplicate.
pub trait ScopeConverter: Send + Sync + 'static {
    fn to_domain(&self, scopes: &[String]) -> Vec<Scope>;
}

/// Identity conversion: every wire token becomes a scope of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScopeConverter;

impl ScopeConverter for DefaultScopeConverter {
    fn to_domain(&self, scopes: &[String]) -> Vec<Scope> {
        scopes.iter().map(|s| Scope::new(s.as_str())).collect()
    }
}

/// Trait for persisting the scopes a resource owner granted to a client.
#[async_trait]
pub trait ConsentStore: Send + Sync + 'static {
    /// Records consent for the given client and owner with the specified scopes.
    async fn record_consent(&self, client_id: &str, owner_id: &str, scopes: &[Scope]) -> Result<(), AuthorizeError>;

    /// Checks whether every scope in `scopes` was previously granted.
    async fn check_consent(&self, client_id: &str, owner_id: &str, scopes: &[Scope]) -> Result<bool, AuthorizeError>;
}
