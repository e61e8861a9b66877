//! Rendering of a finished decision into exactly one outcome.

use serde_json::json;
use super::config::AuthorizeConfig;
use super::decision::AuthorizationDecision;
use super::error::AuthorizeError;
use super::types::{Client, HttpResponse, ResourceOwner, Scope, IMPLICIT_GRANT};
use super::url_encoding::append_params;

/// The single result of one authorization request.
#[derive(Debug, Clone)]
pub enum AuthorizeOutcome {
    /// A decider took over; emit the response verbatim.
    Custom(HttpResponse),
    /// The request was approved; issue a grant and redirect.
    Approved(ApprovedAuthorization),
    /// The request was denied (or nobody decided).
    Denied(DeniedAuthorization),
}

/// Everything the grant issuer needs to complete an approved request.
#[derive(Debug, Clone)]
pub struct ApprovedAuthorization {
    pub grant_type_id: String,
    pub client: Client,
    /// Granted scopes, in request order.
    pub scopes: Vec<Scope>,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub resource_owner: ResourceOwner,
}

impl ApprovedAuthorization {
    /// Redirect back to the client carrying the issued grant and the unchanged state.
    ///
    /// `params` are the issuer's response parameters, `code` for the
    /// authorization code grant or `access_token`, `token_type` and
    /// `expires_in` for the implicit grant. The implicit grant puts them in
    /// the fragment.
    pub fn redirect_url<'a, I>(&'a self, params: I) -> String
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        append_params(
            &self.redirect_uri,
            params.into_iter().chain([("state", self.state.as_deref())]),
            self.is_implicit(),
        )
    }

    pub fn into_response<'a, I>(&'a self, params: I) -> HttpResponse
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        HttpResponse::redirect(self.redirect_url(params))
    }

    pub fn is_implicit(&self) -> bool {
        self.grant_type_id == IMPLICIT_GRANT
    }
}

/// An `access_denied` answer to the client.
#[derive(Debug, Clone)]
pub struct DeniedAuthorization {
    pub grant_type_id: String,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub description: String,
    pub hint: Option<String>,
}

impl DeniedAuthorization {
    /// The error redirect, or `None` when no redirect URI is known.
    pub fn redirect_url(&self) -> Option<String> {
        let uri = self.redirect_uri.as_deref()?;
        Some(append_params(
            uri,
            [
                ("error", Some("access_denied")),
                ("error_description", Some(self.description.as_str())),
                ("hint", self.hint.as_deref()),
                ("state", self.state.as_deref()),
            ],
            self.grant_type_id == IMPLICIT_GRANT,
        ))
    }

    /// `302` to the error redirect, or a `401` JSON error without one.
    pub fn into_response(&self) -> HttpResponse {
        match self.redirect_url() {
            Some(location) => HttpResponse::redirect(location),
            None => {
                let mut body = json!({
                    "error": "access_denied",
                    "error_description": self.description,
                });
                if let Some(hint) = &self.hint {
                    body["hint"] = json!(hint);
                }
                HttpResponse::json(401, &body)
            }
        }
    }
}

impl AuthorizeOutcome {
    /// Reads a finished decision once.
    ///
    /// A custom response always wins over the resolution. The client record
    /// is only looked up when the outcome needs it.
    pub async fn from_decision(
        decision: AuthorizationDecision,
        config: &AuthorizeConfig,
    ) -> Result<Self, AuthorizeError> {
        if decision.has_custom_response() {
            return Ok(AuthorizeOutcome::Custom(decision.into_custom_response()?));
        }

        if decision.resolution() {
            let resource_owner = decision
                .resource_owner()
                .cloned()
                .ok_or(AuthorizeError::MissingResourceOwner)?;
            let client = decision.client().await?.clone();
            let redirect_uri = resolve_redirect_uri(&decision, Some(&client), config)
                .ok_or(AuthorizeError::PreconditionViolation("approved request has no redirect URI"))?;
            return Ok(AuthorizeOutcome::Approved(ApprovedAuthorization {
                grant_type_id: decision.grant_type_id().to_string(),
                scopes: decision.scopes().to_vec(),
                redirect_uri,
                state: decision.state().map(str::to_string),
                code_challenge: decision.code_challenge().to_string(),
                code_challenge_method: decision.code_challenge_method().to_string(),
                client,
                resource_owner,
            }));
        }

        let client = if decision.redirect_uri().is_none() && config.fallback_to_registered_redirect {
            Some(decision.client().await?)
        } else {
            None
        };
        Ok(AuthorizeOutcome::Denied(DeniedAuthorization {
            grant_type_id: decision.grant_type_id().to_string(),
            redirect_uri: resolve_redirect_uri(&decision, client, config),
            state: decision.state().map(str::to_string),
            description: config.denial_description.clone(),
            hint: config.denial_hint.clone(),
        }))
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, AuthorizeOutcome::Approved(_))
    }
}

fn resolve_redirect_uri(
    decision: &AuthorizationDecision,
    client: Option<&Client>,
    config: &AuthorizeConfig,
) -> Option<String> {
    if let Some(uri) = decision.redirect_uri() {
        return Some(uri.to_string());
    }
    if !config.fallback_to_registered_redirect {
        return None;
    }
    client.and_then(Client::default_redirect_uri).map(str::to_string)
}
