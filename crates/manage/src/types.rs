//! Core types for talking to the management endpoints.
//!
//! A [`Request`] is a structural description of one HTTP call: the verb,
//! the logical API it targets, a path relative to that API's root, query
//! parameters and an optional body. Backends turn it into a real call (or
//! answer it from memory, for tests).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Read a resource.
    Get,
    /// Create a resource, or trigger a state change.
    Post,
    /// Replace a resource's properties, or store a document.
    Put,
}

impl Verb {
    /// Lowercase verb name, as shown in plans and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Logical API a request is addressed to.
///
/// Each API lives on its own port with its own path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Api {
    /// Management API (`/manage/v2`, port 8002 by default).
    Manage,
    /// Client REST API (`/v1`, port 8000 by default).
    Rest,
}

impl Api {
    /// Identifier of the API.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Rest => "rest",
        }
    }

    /// Path prefix under which the API is mounted.
    #[must_use]
    pub fn root(&self) -> &'static str {
        match self {
            Self::Manage => "/manage/v2",
            Self::Rest => "/v1",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Body of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON payload.
    Json(Value),
    /// Raw bytes with a content type (document upload).
    Bytes {
        /// MIME type sent as `Content-Type`.
        content_type: String,
        /// Document content.
        data: Vec<u8>,
    },
}

/// A structural HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP verb.
    pub verb: Verb,
    /// Target API.
    pub api: Api,
    /// Path relative to the API root, starting with `/`.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Optional body.
    pub body: Option<Body>,
}

impl Request {
    /// Create a request without query or body.
    pub fn new(verb: Verb, api: Api, path: impl Into<String>) -> Self {
        Self {
            verb,
            api,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Shortcut for a `GET` on the management API.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, Api::Manage, path)
    }

    /// Shortcut for a `POST` on the management API.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, Api::Manage, path)
    }

    /// Shortcut for a `PUT` on the management API.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, Api::Manage, path)
    }

    /// Switch the target API.
    pub fn api(mut self, api: Api) -> Self {
        self.api = api;
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(Body::Json(value));
        self
    }

    /// Set a raw body.
    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = Some(Body::Bytes {
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// Path plus query string, unencoded (for display and matching).
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// The JSON body, if any.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(Body::Json(value)) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.verb, self.api, self.url())
    }
}

/// A response, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body, when the response carried one.
    pub body: Option<Value>,
}

impl Response {
    /// `200 OK` with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    /// A body-less response with the given status.
    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }

    /// `404 Not Found`.
    pub fn not_found() -> Self {
        Self::status(404)
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is `404`.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Best-effort error message from the body.
    ///
    /// The management API wraps failures in `{"errorResponse": {"message": ...}}`.
    pub fn message(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        body.pointer("/errorResponse/message")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or_else(|| body.as_str().map(ToString::to_string))
    }
}

/// Connection settings for a cluster.
///
/// Credentials are sent with HTTP basic authentication only. MarkLogic app
/// servers default to `digest`, which answers 401 to every request; set the
/// Manage (8002) and REST app servers to `basic` or `digestbasic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectInfo {
    /// Host name of any node in the cluster.
    pub host: String,
    /// User name for basic authentication.
    pub user: String,
    /// Password for basic authentication.
    #[serde(default)]
    pub password: String,
    /// Port of the management API.
    #[serde(default = "default_manage_port")]
    pub manage_port: u16,
    /// Port of the REST API used for document uploads.
    #[serde(default = "default_rest_port")]
    pub rest_port: u16,
    /// Use HTTPS instead of HTTP.
    #[serde(default)]
    pub ssl: bool,
}

fn default_manage_port() -> u16 {
    8002
}

fn default_rest_port() -> u16 {
    8000
}

impl ConnectInfo {
    /// Connection to `host` with default ports.
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            manage_port: default_manage_port(),
            rest_port: default_rest_port(),
            ssl: false,
        }
    }

    /// Base URL of an API, without trailing slash.
    pub fn base_url(&self, api: Api) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        let port = match api {
            Api::Manage => self.manage_port,
            Api::Rest => self.rest_port,
        };
        format!("{}://{}:{}{}", scheme, self.host, port, api.root())
    }
}
