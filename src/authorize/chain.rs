//! Ordered, short-circuiting walk over the registered deciders.

use std::sync::Arc;
use tracing::{debug, instrument};
use super::decider::Decider;
use super::decision::AuthorizationDecision;
use super::error::AuthorizeError;

/// Deciders in registration order.
#[derive(Clone, Default)]
pub struct DeciderChain {
    deciders: Vec<Arc<dyn Decider>>,
}

impl DeciderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decider; it runs after every decider registered before it.
    pub fn register(&mut self, decider: Arc<dyn Decider>) -> &mut Self {
        self.deciders.push(decider);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<D: Decider>(mut self, decider: D) -> Self {
        self.deciders.push(Arc::new(decider));
        self
    }

    pub fn len(&self) -> usize {
        self.deciders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deciders.is_empty()
    }

    /// Invokes the deciders in order until one leaves the decision decided.
    ///
    /// The decided flag is checked before each invocation, so a decision that
    /// arrives already decided runs nothing. A decider error aborts the walk.
    /// Returns how many deciders ran.
    #[instrument(skip_all, fields(decision_id = %decision.id(), client_id = decision.client_id()))]
    pub async fn run(&self, decision: &mut AuthorizationDecision) -> Result<usize, AuthorizeError> {
        let mut invoked = 0;
        for decider in &self.deciders {
            if decision.is_decided() {
                break;
            }
            debug!(decider = decider.name(), "invoking authorization decider");
            invoked += 1;
            decider.decide(decision).await?;
        }
        debug!(invoked, decided = decision.is_decided(), "decider chain finished");
        Ok(invoked)
    }
}
