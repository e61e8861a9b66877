pub mod authorize;

pub use authorize::chain::DeciderChain;
pub use authorize::config::AuthorizeConfig;
pub use authorize::decider::{decider_fn, ConsentDecider, ConsentPageDecider, Decider, FnDecider, TrustedClientDecider};
pub use authorize::decision::{AuthorizationDecision, AUTHORIZATION_APPROVED, AUTHORIZATION_DENIED};
pub use authorize::endpoint::AuthorizeEndpoint;
pub use authorize::error::AuthorizeError;
pub use authorize::memory::{InMemoryClientManager, InMemoryConsentStore};
pub use authorize::outcome::{ApprovedAuthorization, AuthorizeOutcome, DeniedAuthorization};
pub use authorize::provider::{ClientManager, ConsentStore, DefaultScopeConverter, ScopeConverter};
pub use authorize::types::{AuthorizationRequest, Client, HttpResponse, ResourceOwner, Scope};
