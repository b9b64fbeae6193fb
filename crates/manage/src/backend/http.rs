//! HTTP backend.
//!
//! This module provides the [`HttpBackend`] implementation, which sends
//! requests to a cluster with a blocking `ureq` agent and basic
//! authentication. Digest authentication is not implemented, see
//! [`ConnectInfo`].

use crate::backend::Backend;
use crate::error::Result;
use crate::types::{Body, ConnectInfo, Request, Response, Verb};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Maximum response size (the management API answers small documents).
const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// HTTP backend.
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Connection settings.
    connect: ConnectInfo,
}

impl HttpBackend {
    /// Create a new HTTP backend for a cluster.
    #[must_use]
    pub fn new(connect: ConnectInfo) -> Self {
        // Statuses are interpreted by the client, not turned into errors.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            connect,
        }
    }

    /// Get the connection settings.
    #[must_use]
    pub fn connect(&self) -> &ConnectInfo {
        &self.connect
    }

    /// Build the absolute URL of a request (without query).
    fn url(&self, request: &Request) -> String {
        format!("{}{}", self.connect.base_url(request.api), request.path)
    }

    /// Build the `Authorization` header value.
    fn authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.connect.user, self.connect.password));
        format!("Basic {}", token)
    }
}

impl Backend for HttpBackend {
    fn send(&self, request: &Request) -> Result<Response> {
        let url = self.url(request);
        log::debug!("{} {}", request.verb, url);

        let query = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()));

        let mut response = match request.verb {
            Verb::Get => self
                .agent
                .get(&url)
                .query_pairs(query)
                .header("Accept", "application/json")
                .header("Authorization", &self.authorization())
                .call()?,
            Verb::Post | Verb::Put => {
                let builder = match request.verb {
                    Verb::Post => self.agent.post(&url),
                    _ => self.agent.put(&url),
                }
                .query_pairs(query)
                .header("Accept", "application/json")
                .header("Authorization", &self.authorization());

                match &request.body {
                    Some(Body::Json(value)) => builder.send_json(value)?,
                    Some(Body::Bytes { content_type, data }) => builder
                        .header("Content-Type", content_type)
                        .send(&data[..])?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_string()?;
        log::trace!("{} {} -> {} ({} bytes)", request.verb, url, status, text.len());

        Ok(Response {
            status,
            body: parse_body(&text),
        })
    }
}

/// Parse a response body, keeping non-JSON text as a JSON string.
fn parse_body(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Api;
    use serde_json::json;

    fn backend() -> HttpBackend {
        HttpBackend::new(ConnectInfo::new("ml.example.com", "admin", "secret"))
    }

    #[test]
    fn test_manage_url() {
        let req = Request::get("/databases/content/properties");
        assert_eq!(
            backend().url(&req),
            "http://ml.example.com:8002/manage/v2/databases/content/properties"
        );
    }

    #[test]
    fn test_rest_url() {
        let req = Request::put("/documents").api(Api::Rest).query("uri", "/a.xml");
        assert_eq!(backend().url(&req), "http://ml.example.com:8000/v1/documents");
    }

    #[test]
    fn test_authorization_header() {
        // "admin:secret" in base64
        assert_eq!(backend().authorization(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), None);
        assert_eq!(parse_body("  \n"), None);
        assert_eq!(parse_body(r#"{"a": 1}"#), Some(json!({"a": 1})));
        assert_eq!(
            parse_body("Unauthorized"),
            Some(Value::String("Unauthorized".to_string()))
        );
    }

    #[test]
    fn test_connect_accessor() {
        assert_eq!(backend().connect().host, "ml.example.com");
    }
}
