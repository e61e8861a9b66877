//! Authorization endpoint configuration.

use std::collections::HashSet;
use serde::Deserialize;
use super::error::AuthorizeError;

/// Default `error_description` of a denial redirect.
const DEFAULT_DENIAL_DESCRIPTION: &str = "The resource owner or authorization server denied the request.";

/// Default `hint` of a denial redirect.
const DEFAULT_DENIAL_HINT: &str = "The user denied the request";

/// Settings of the authorization endpoint and its built-in deciders.
///
/// # Example
/// ```
/// use oauth_authorize::AuthorizeConfig;
/// let config = AuthorizeConfig::from_json(r#"{ "trusted_clients": ["dashboard"] }"#).unwrap();
/// assert!(config.trusted_clients.contains("dashboard"));
/// assert!(config.fallback_to_registered_redirect);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizeConfig {
    /// First-party clients approved without asking the resource owner.
    pub trusted_clients: HashSet<String>,

    /// Interactive consent page. `None` disables the consent page decider.
    pub consent_page_url: Option<String>,

    /// `error_description` sent with `access_denied`.
    pub denial_description: String,

    /// Optional `hint` sent with `access_denied`.
    pub denial_hint: Option<String>,

    /// Redirect to the client's first registered URI when the request names none.
    pub fallback_to_registered_redirect: bool,
}

impl Default for AuthorizeConfig {
    fn default() -> Self {
        Self {
            trusted_clients: HashSet::new(),
            consent_page_url: None,
            denial_description: DEFAULT_DENIAL_DESCRIPTION.to_owned(),
            denial_hint: Some(DEFAULT_DENIAL_HINT.to_owned()),
            fallback_to_registered_redirect: true,
        }
    }
}

impl AuthorizeConfig {
    /// Parses a JSON document; missing keys take their defaults.
    pub fn from_json(input: &str) -> Result<Self, AuthorizeError> {
        Ok(serde_json::from_str(input)?)
    }
}
