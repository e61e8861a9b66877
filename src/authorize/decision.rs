//! The authorization decision shared by every decider of one request.
//!
//! A decision starts denied. Deciders either resolve it (approve/deny) or hand
//! control to a custom response; both mark it decided, which stops the chain.
//! The last of the two calls wins: resolving clears a custom response, and a
//! custom response shadows the resolution.

use std::fmt;
use std::sync::Arc;
use once_cell::sync::OnceCell as SyncOnceCell;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use uuid::Uuid;
use super::error::AuthorizeError;
use super::provider::{ClientManager, ScopeConverter};
use super::types::{AuthorizationRequest, Client, HttpResponse, ResourceOwner, Scope};

pub const AUTHORIZATION_APPROVED: bool = true;
pub const AUTHORIZATION_DENIED: bool = false;

pub struct AuthorizationDecision {
    id: Uuid,
    request: AuthorizationRequest,
    client_manager: Arc<dyn ClientManager>,
    scope_converter: Arc<dyn ScopeConverter>,
    resolution: bool,
    response: Option<HttpResponse>,
    resource_owner: Option<ResourceOwner>,
    decided: bool,
    // Filled on first access only.
    client: OnceCell<Client>,
    scopes: SyncOnceCell<Vec<Scope>>,
}

impl AuthorizationDecision {
    /// Creates an undecided, denied decision for `request`.
    ///
    /// Neither the client record nor the domain scopes are resolved here.
    pub fn new(
        request: AuthorizationRequest,
        client_manager: Arc<dyn ClientManager>,
        scope_converter: Arc<dyn ScopeConverter>,
    ) -> Self {
        AuthorizationDecision {
            id: Uuid::new_v4(),
            request,
            client_manager,
            scope_converter,
            resolution: AUTHORIZATION_DENIED,
            response: None,
            resource_owner: None,
            decided: false,
            client: OnceCell::new(),
            scopes: SyncOnceCell::new(),
        }
    }

    /// Correlation id for logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Approves or denies the request, dropping any custom response, and
    /// stops the chain.
    pub fn resolve(&mut self, outcome: bool) -> &mut Self {
        debug!(decision_id = %self.id, outcome, "authorization resolved");
        self.resolution = outcome;
        self.response = None;
        self.decided = true;
        self
    }

    pub fn resolution(&self) -> bool {
        self.resolution
    }

    pub fn has_custom_response(&self) -> bool {
        self.response.is_some()
    }

    /// Returns the custom response. Call [`has_custom_response`](Self::has_custom_response) first.
    pub fn custom_response(&self) -> Result<&HttpResponse, AuthorizeError> {
        self.response.as_ref().ok_or(AuthorizeError::PreconditionViolation(
            "there is no custom response; check has_custom_response first",
        ))
    }

    /// Consumes the decision, yielding the custom response.
    pub fn into_custom_response(self) -> Result<HttpResponse, AuthorizeError> {
        self.response.ok_or(AuthorizeError::PreconditionViolation(
            "there is no custom response; check has_custom_response first",
        ))
    }

    /// Hands control to `response` and stops the chain. The stored resolution
    /// is left as is but no longer consulted.
    pub fn set_custom_response(&mut self, response: HttpResponse) -> &mut Self {
        debug!(decision_id = %self.id, status = response.status, "custom response set");
        self.response = Some(response);
        self.decided = true;
        self
    }

    /// True once a decider resolved the request or set a custom response.
    pub fn is_decided(&self) -> bool {
        self.decided
    }

    pub fn resource_owner(&self) -> Option<&ResourceOwner> {
        self.resource_owner.as_ref()
    }

    /// Attaches (or clears) the authenticated owner. Does not stop the chain.
    pub fn set_resource_owner(&mut self, owner: Option<ResourceOwner>) -> &mut Self {
        self.resource_owner = owner;
        self
    }

    pub fn grant_type_id(&self) -> &str {
        &self.request.grant_type_id
    }

    pub fn client_id(&self) -> &str {
        &self.request.client_id
    }

    /// Looks up the requesting client on first call and caches it for the
    /// lifetime of this decision.
    ///
    /// A miss is a data-integrity fault: the protocol layer already accepted
    /// this client, so the store and the protocol layer disagree.
    pub async fn client(&self) -> Result<&Client, AuthorizeError> {
        self.client
            .get_or_try_init(|| async {
                let identifier = self.request.client_id.as_str();
                debug!(decision_id = %self.id, client_id = identifier, "looking up client");
                let found = self.client_manager.find(identifier).await?;
                found.ok_or_else(|| {
                    warn!(decision_id = %self.id, client_id = identifier, "client vanished after request validation");
                    AuthorizeError::ClientNotFound { identifier: identifier.to_string() }
                })
            })
            .await
    }

    /// Requested scopes as domain values, in request order. Converted once.
    pub fn scopes(&self) -> &[Scope] {
        self.scopes
            .get_or_init(|| self.scope_converter.to_domain(&self.request.scopes))
    }

    /// Whether the protocol layer deems the request approved. This is not
    /// the business resolution.
    pub fn is_authorization_approved(&self) -> bool {
        self.request.authorization_approved
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.request.redirect_uri.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.request.state.as_deref()
    }

    pub fn code_challenge(&self) -> &str {
        &self.request.code_challenge
    }

    pub fn code_challenge_method(&self) -> &str {
        &self.request.code_challenge_method
    }
}

impl fmt::Debug for AuthorizationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationDecision")
            .field("id", &self.id)
            .field("client_id", &self.request.client_id)
            .field("resolution", &self.resolution)
            .field("has_custom_response", &self.response.is_some())
            .field("resource_owner", &self.resource_owner)
            .field("decided", &self.decided)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::authorize::memory::InMemoryClientManager;
    use crate::authorize::provider::DefaultScopeConverter;

    fn decision(scopes: &[&str]) -> AuthorizationDecision {
        let request = AuthorizationRequest {
            grant_type_id: "authorization_code".to_string(),
            client_id: "app-1".to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            ..AuthorizationRequest::default()
        };
        AuthorizationDecision::new(
            request,
            Arc::new(InMemoryClientManager::new(vec![Client::new("app-1")])),
            Arc::new(DefaultScopeConverter),
        )
    }

    #[test]
    fn starts_denied_and_undecided() {
        let decision = decision(&[]);
        assert_eq!(decision.resolution(), AUTHORIZATION_DENIED);
        assert!(!decision.is_decided());
        assert!(!decision.has_custom_response());
        assert!(decision.custom_response().is_err());
    }

    #[test]
    fn later_resolve_overwrites_earlier_one() {
        let mut decision = decision(&[]);
        decision.resolve(AUTHORIZATION_APPROVED).resolve(AUTHORIZATION_DENIED);
        assert_eq!(decision.resolution(), AUTHORIZATION_DENIED);
        assert!(decision.is_decided());
    }

    #[test]
    fn custom_response_keeps_stored_resolution() {
        let mut decision = decision(&[]);
        decision.resolve(AUTHORIZATION_APPROVED);
        decision.set_custom_response(HttpResponse::html("<p>consent</p>"));
        assert_eq!(decision.resolution(), AUTHORIZATION_APPROVED);
        assert_eq!(decision.custom_response().unwrap().status, 200);

        decision.resolve(AUTHORIZATION_DENIED);
        assert!(!decision.has_custom_response());
        assert!(decision.into_custom_response().is_err());
    }

    #[test]
    fn setting_the_owner_does_not_decide() {
        let mut decision = decision(&[]);
        decision.set_resource_owner(Some(ResourceOwner::new("alice")));
        assert_eq!(decision.resource_owner().map(|o| o.id.as_str()), Some("alice"));
        assert!(!decision.is_decided());
        decision.set_resource_owner(None);
        assert!(decision.resource_owner().is_none());
    }

    #[test]
    fn scopes_keep_request_order() {
        let decision = decision(&["write", "read", "write"]);
        let names: Vec<&str> = decision.scopes().iter().map(Scope::as_str).collect();
        assert_eq!(names, ["write", "read", "write"]);
    }

    #[test]
    fn debug_hides_response_body() {
        let mut decision = decision(&[]);
        decision.set_custom_response(HttpResponse::html("secret-page"));
        let rendered = format!("{decision:?}");
        assert!(rendered.contains("has_custom_response: true"));
        assert!(!rendered.contains("secret-page"));
    }
}
