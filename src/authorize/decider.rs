//! Deciders: independently registered handlers that inspect and mutate the
//! shared [`AuthorizationDecision`].

use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use super::config::AuthorizeConfig;
use super::decision::{AuthorizationDecision, AUTHORIZATION_APPROVED};
use super::error::AuthorizeError;
use super::provider::ConsentStore;
use super::types::{response_type, HttpResponse};
use super::url_encoding::append_params;

/// A handler taking part in the arbitration of one authorization request.
///
/// A decider that has nothing to say simply returns `Ok(())` without
/// touching the decision; the next decider then runs.
#[async_trait]
pub trait Decider: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn decide(&self, decision: &mut AuthorizationDecision) -> Result<(), AuthorizeError>;
}

/// Adapter turning a synchronous closure into a [`Decider`].
pub struct FnDecider<F> {
    name: String,
    f: F,
}

/// Wraps `f` as a named decider.
pub fn decider_fn<F>(name: impl Into<String>, f: F) -> FnDecider<F>
where
    F: Fn(&mut AuthorizationDecision) -> Result<(), AuthorizeError> + Send + Sync + 'static,
{
    FnDecider { name: name.into(), f }
}

#[async_trait]
impl<F> Decider for FnDecider<F>
where
    F: Fn(&mut AuthorizationDecision) -> Result<(), AuthorizeError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, decision: &mut AuthorizationDecision) -> Result<(), AuthorizeError> {
        (self.f)(decision)
    }
}

/// Auto-approves first-party clients.
///
/// Inactive client records are never approved. Requests without an attached
/// resource owner are left undecided.
#[derive(Debug, Clone, Default)]
pub struct TrustedClientDecider {
    trusted: HashSet<String>,
}

impl TrustedClientDecider {
    pub fn new<I, S>(client_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrustedClientDecider { trusted: client_ids.into_iter().map(Into::into).collect() }
    }

    pub fn from_config(config: &AuthorizeConfig) -> Self {
        TrustedClientDecider { trusted: config.trusted_clients.clone() }
    }
}

#[async_trait]
impl Decider for TrustedClientDecider {
    fn name(&self) -> &str {
        "trusted_client"
    }

    async fn decide(&self, decision: &mut AuthorizationDecision) -> Result<(), AuthorizeError> {
        if !self.trusted.contains(decision.client_id()) {
            return Ok(());
        }
        // Approval needs a user; leave anonymous requests to the consent page.
        if decision.resource_owner().is_none() {
            debug!(client_id = decision.client_id(), "trusted client without resource owner, not auto-approving");
            return Ok(());
        }
        let active = decision.client().await?.active;
        if !active {
            debug!(client_id = decision.client_id(), "trusted client is inactive, not auto-approving");
            return Ok(());
        }
        decision.resolve(AUTHORIZATION_APPROVED);
        Ok(())
    }
}

/// Approves when the attached resource owner already granted every
/// requested scope to the client.
pub struct ConsentDecider<S: ConsentStore> {
    store: Arc<S>,
}

impl<S: ConsentStore> ConsentDecider<S> {
    pub fn new(store: Arc<S>) -> Self {
        ConsentDecider { store }
    }
}

#[async_trait]
impl<S: ConsentStore> Decider for ConsentDecider<S> {
    fn name(&self) -> &str {
        "stored_consent"
    }

    async fn decide(&self, decision: &mut AuthorizationDecision) -> Result<(), AuthorizeError> {
        let Some(owner) = decision.resource_owner() else {
            return Ok(());
        };
        let granted = self
            .store
            .check_consent(decision.client_id(), &owner.id, decision.scopes())
            .await?;
        if granted {
            decision.resolve(AUTHORIZATION_APPROVED);
        }
        Ok(())
    }
}

/// Hands control to an interactive consent page.
///
/// The page receives the request parameters in its query string, including
/// the `response_type` of the grant, and is expected to call back into the
/// authorization endpoint once the owner answered.
#[derive(Debug, Clone)]
pub struct ConsentPageDecider {
    consent_page_url: String,
}

impl ConsentPageDecider {
    pub fn new(consent_page_url: impl Into<String>) -> Self {
        ConsentPageDecider { consent_page_url: consent_page_url.into() }
    }

    /// `None` when no consent page is configured.
    pub fn from_config(config: &AuthorizeConfig) -> Option<Self> {
        config.consent_page_url.as_deref().map(ConsentPageDecider::new)
    }
}

#[async_trait]
impl Decider for ConsentPageDecider {
    fn name(&self) -> &str {
        "consent_page"
    }

    async fn decide(&self, decision: &mut AuthorizationDecision) -> Result<(), AuthorizeError> {
        let scope = decision
            .scopes()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let non_empty = |v: &str| (!v.is_empty()).then(|| v.to_string());
        let params = [
            ("response_type", response_type(decision.grant_type_id()).map(str::to_string)),
            ("client_id", Some(decision.client_id().to_string())),
            ("scope", non_empty(&scope)),
            ("redirect_uri", decision.redirect_uri().map(str::to_string)),
            ("state", decision.state().map(str::to_string)),
            ("code_challenge", non_empty(decision.code_challenge())),
            ("code_challenge_method", non_empty(decision.code_challenge_method())),
        ];
        let location = append_params(
            &self.consent_page_url,
            params.iter().map(|(k, v)| (*k, v.as_deref())),
            false,
        );
        decision.set_custom_response(HttpResponse::redirect(location));
        Ok(())
    }
}
