//! The authorization endpoint orchestrator: one decision per request, one
//! chain walk, one outcome.

use std::sync::Arc;
use tracing::{info, instrument};
use super::chain::DeciderChain;
use super::config::AuthorizeConfig;
use super::decider::{ConsentDecider, ConsentPageDecider, TrustedClientDecider};
use super::decision::AuthorizationDecision;
use super::error::AuthorizeError;
use super::outcome::AuthorizeOutcome;
use super::provider::{ClientManager, ConsentStore, DefaultScopeConverter, ScopeConverter};
use super::types::AuthorizationRequest;

/// Arbitrates authorization requests with configurable collaborators.
#[derive(Clone)]
pub struct AuthorizeEndpoint {
    client_manager: Arc<dyn ClientManager>,
    scope_converter: Arc<dyn ScopeConverter>,
    chain: DeciderChain,
    config: AuthorizeConfig,
}

impl AuthorizeEndpoint {
    /// Creates an endpoint with the identity scope converter and default settings.
    pub fn new(client_manager: Arc<dyn ClientManager>, chain: DeciderChain) -> Self {
        AuthorizeEndpoint {
            client_manager,
            scope_converter: Arc::new(DefaultScopeConverter),
            chain,
            config: AuthorizeConfig::default(),
        }
    }

    /// Creates an endpoint running the built-in deciders in this order:
    /// trusted clients, stored consent, then the consent page if configured.
    pub fn standard<S: ConsentStore>(
        client_manager: Arc<dyn ClientManager>,
        consent_store: Arc<S>,
        config: AuthorizeConfig,
    ) -> Self {
        let mut chain = DeciderChain::new()
            .with(TrustedClientDecider::from_config(&config))
            .with(ConsentDecider::new(consent_store));
        if let Some(page) = ConsentPageDecider::from_config(&config) {
            chain = chain.with(page);
        }
        AuthorizeEndpoint::new(client_manager, chain).config(config)
    }

    /// Sets a custom scope converter.
    pub fn scope_converter(mut self, converter: Arc<dyn ScopeConverter>) -> Self {
        self.scope_converter = converter;
        self
    }

    /// Replaces the endpoint settings.
    pub fn config(mut self, config: AuthorizeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn chain(&self) -> &DeciderChain {
        &self.chain
    }

    /// Creates the decision for a request the protocol layer already parsed.
    /// Callers may attach a resource owner before [`process`](Self::process).
    pub fn new_decision(&self, request: AuthorizationRequest) -> AuthorizationDecision {
        AuthorizationDecision::new(request, self.client_manager.clone(), self.scope_converter.clone())
    }

    /// Walks the chain and renders the final outcome.
    #[instrument(skip_all, fields(decision_id = %decision.id(), client_id = decision.client_id()))]
    pub async fn process(&self, mut decision: AuthorizationDecision) -> Result<AuthorizeOutcome, AuthorizeError> {
        self.chain.run(&mut decision).await?;
        let outcome = AuthorizeOutcome::from_decision(decision, &self.config).await?;
        match &outcome {
            AuthorizeOutcome::Custom(response) => info!(status = response.status, "authorization handed to custom response"),
            AuthorizeOutcome::Approved(approved) => info!(owner = %approved.resource_owner.id, "authorization approved"),
            AuthorizeOutcome::Denied(_) => info!("authorization denied"),
        }
        Ok(outcome)
    }

    /// [`new_decision`](Self::new_decision) followed by [`process`](Self::process).
    pub async fn handle(&self, request: AuthorizationRequest) -> Result<AuthorizeOutcome, AuthorizeError> {
        self.process(self.new_decision(request)).await
    }
}
