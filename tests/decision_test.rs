use std::sync::Arc;
use async_trait::async_trait;
use oauth_authorize::{
    AuthorizationDecision, AuthorizationRequest, AuthorizeError, Client, ClientManager,
    DefaultScopeConverter, HttpResponse, InMemoryClientManager, ResourceOwner, Scope,
    AUTHORIZATION_DENIED,
};

fn request(client_id: &str, scopes: &[&str]) -> AuthorizationRequest {
    AuthorizationRequest {
        grant_type_id: "authorization_code".to_string(),
        client_id: client_id.to_string(),
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        redirect_uri: Some("https://app.local/callback".to_string()),
        state: Some("xyz".to_string()),
        code_challenge: "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".to_string(),
        code_challenge_method: "S256".to_string(),
        authorization_approved: true,
    }
}

fn decision_with(manager: Arc<InMemoryClientManager>, req: AuthorizationRequest) -> AuthorizationDecision {
    AuthorizationDecision::new(req, manager, Arc::new(DefaultScopeConverter))
}

fn store() -> Arc<InMemoryClientManager> {
    Arc::new(InMemoryClientManager::new(vec![
        Client::new("app-1").with_redirect_uri("https://app.local/callback"),
    ]))
}

struct BrokenStore;

#[async_trait]
impl ClientManager for BrokenStore {
    async fn find(&self, _identifier: &str) -> Result<Option<Client>, AuthorizeError> {
        Err(AuthorizeError::storage("connection refused"))
    }
}

#[test]
fn fresh_decision_denies_by_default() {
    let decision = decision_with(store(), request("app-1", &["email"]));
    assert_eq!(decision.resolution(), AUTHORIZATION_DENIED);
    assert!(!decision.has_custom_response());
    assert!(decision.resource_owner().is_none());
    assert!(!decision.is_decided());
}

#[test]
fn custom_response_set_after_resolve_takes_precedence() {
    let mut decision = decision_with(store(), request("app-1", &[]));
    let page = HttpResponse::html("<h1>consent</h1>");
    decision.resolve(true).set_custom_response(page.clone());
    assert!(decision.is_decided());
    assert!(decision.has_custom_response());
    assert_eq!(decision.custom_response().unwrap(), &page);
}

#[test]
fn resolve_after_custom_response_clears_it() {
    let mut decision = decision_with(store(), request("app-1", &[]));
    decision.set_custom_response(HttpResponse::html("page")).resolve(false);
    assert!(decision.is_decided());
    assert!(!decision.has_custom_response());
    assert!(!decision.resolution());
}

#[test]
fn reading_unset_custom_response_is_a_precondition_violation() {
    let decision = decision_with(store(), request("app-1", &[]));
    let err = decision.custom_response().unwrap_err();
    assert!(matches!(err, AuthorizeError::PreconditionViolation(_)));
    let err = decision.into_custom_response().unwrap_err();
    assert!(matches!(err, AuthorizeError::PreconditionViolation(_)));
}

#[test]
fn resource_owner_does_not_decide() {
    let mut decision = decision_with(store(), request("app-1", &[]));
    decision.set_resource_owner(Some(ResourceOwner::new("alice")));
    assert_eq!(decision.resource_owner().unwrap().id, "alice");
    assert!(!decision.is_decided());
    decision.set_resource_owner(None);
    assert!(decision.resource_owner().is_none());
}

#[test]
fn scopes_keep_request_order() {
    let decision = decision_with(store(), request("app-1", &["read", "write"]));
    assert_eq!(decision.scopes(), &[Scope::from("read"), Scope::from("write")]);
}

#[test]
fn projections_mirror_the_request() {
    let decision = decision_with(store(), request("app-1", &["email"]));
    assert_eq!(decision.grant_type_id(), "authorization_code");
    assert_eq!(decision.client_id(), "app-1");
    assert_eq!(decision.redirect_uri(), Some("https://app.local/callback"));
    assert_eq!(decision.state(), Some("xyz"));
    assert_eq!(decision.code_challenge(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    assert_eq!(decision.code_challenge_method(), "S256");
    assert!(decision.is_authorization_approved());
}

#[tokio::test]
async fn client_is_not_looked_up_until_asked() {
    let manager = store();
    let decision = decision_with(manager.clone(), request("app-1", &[]));
    assert_eq!(manager.lookup_count(), 0);
    drop(decision);
    assert_eq!(manager.lookup_count(), 0);
}

#[tokio::test]
async fn client_lookup_is_cached_per_decision() {
    let manager = store();
    let decision = decision_with(manager.clone(), request("app-1", &[]));
    let first = decision.client().await.unwrap().id.clone();
    let second = decision.client().await.unwrap().id.clone();
    assert_eq!(first, "app-1");
    assert_eq!(first, second);
    assert_eq!(manager.lookup_count(), 1);
}

#[tokio::test]
async fn missing_client_is_reported_with_its_identifier() {
    let decision = decision_with(store(), request("ghost", &[]));
    let err = decision.client().await.unwrap_err();
    match err {
        AuthorizeError::ClientNotFound { identifier } => assert_eq!(identifier, "ghost"),
        other => panic!("expected ClientNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn client_deleted_mid_flow_is_not_found() {
    let manager = store();
    let decision = decision_with(manager.clone(), request("app-1", &[]));
    manager.remove("app-1");
    assert!(matches!(
        decision.client().await,
        Err(AuthorizeError::ClientNotFound { .. })
    ));
}

#[tokio::test]
async fn storage_failures_propagate_unchanged() {
    let decision = AuthorizationDecision::new(
        request("app-1", &[]),
        Arc::new(BrokenStore),
        Arc::new(DefaultScopeConverter),
    );
    let err = decision.client().await.unwrap_err();
    match err {
        AuthorizeError::Storage(inner) => assert_eq!(inner.to_string(), "connection refused"),
        other => panic!("expected Storage, got {other:?}"),
    }
}
