//! Authorization endpoint primitives: Client, Scope, ResourceOwner, the
//! incoming AuthorizationRequest and the opaque HttpResponse a decider may
//! hand back instead of the standard redirect.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Grant type identifier of the authorization code grant.
pub const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

/// Grant type identifier of the implicit grant. Its redirects use the URI fragment.
pub const IMPLICIT_GRANT: &str = "implicit";

/// The `response_type` an authorization request carries for `grant_type_id`.
pub fn response_type(grant_type_id: &str) -> Option<&'static str> {
    match grant_type_id {
        AUTHORIZATION_CODE_GRANT => Some("code"),
        IMPLICIT_GRANT => Some("token"),
        _ => None,
    }
}

/// Represents a registered OAuth 2.0 client application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier.
    pub id: String,
    /// Allowed redirect URIs, in registration order.
    pub redirect_uris: Vec<String>,
    /// Scopes the client may request.
    pub scopes: Vec<Scope>,
    /// Inactive clients are kept for auditing but must not be auto-approved.
    pub active: bool,
}

impl Client {
    /// Creates an active client with no redirect URIs or scopes.
    pub fn new(id: impl Into<String>) -> Self {
        Client {
            id: id.into(),
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            active: true,
        }
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Marks the client as inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// The first registered redirect URI, used when a request names none.
    pub fn default_redirect_uri(&self) -> Option<&str> {
        self.redirect_uris.first().map(String::as_str)
    }
}

/// A domain scope value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(scope: impl Into<String>) -> Self {
        Scope(scope.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Scope(value.to_string())
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Scope(value)
    }
}

/// The authenticated user on whose behalf the client asks for access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwner {
    /// Stable user identifier, handed to the protocol layer on approval.
    pub id: String,
}

impl ResourceOwner {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceOwner { id: id.into() }
    }
}

/// An authorization request as already validated by the protocol layer.
///
/// This is read-only input: deciders only ever see it through the
/// projections of [`AuthorizationDecision`](super::decision::AuthorizationDecision).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Grant type identifier, e.g. `authorization_code` or `implicit`.
    pub grant_type_id: String,
    /// Identifier of the requesting client.
    pub client_id: String,
    /// Requested scopes in wire format, in request order.
    pub scopes: Vec<String>,
    /// Redirect URI named by the request, if any.
    pub redirect_uri: Option<String>,
    /// Opaque state echoed back to the client.
    pub state: Option<String>,
    /// PKCE code challenge.
    pub code_challenge: String,
    /// PKCE code challenge method (`plain` or `S256`).
    pub code_challenge_method: String,
    /// Whether the protocol layer considers the request approved.
    /// Independent from the business decision arbitrated by the deciders.
    pub authorization_approved: bool,
}

/// HTTP response handed back verbatim to the user agent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        HttpResponse { status, headers, body }
    }

    /// A `302 Found` pointing at `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        HttpResponse {
            status: 302,
            headers: vec![("Location".to_string(), location.into())],
            body: Vec::new(),
        }
    }

    /// A `200 OK` HTML page.
    pub fn html(body: impl Into<String>) -> Self {
        HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/html; charset=utf-8".to_string())],
            body: body.into().into_bytes(),
        }
    }

    /// A JSON body with the given status.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
