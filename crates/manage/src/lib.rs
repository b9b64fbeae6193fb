//! # manage
//!
//! Blocking client for the MarkLogic Management API (and the slice of the
//! REST API used to upload documents).
//!
//! The crate separates *what* is sent from *how*: callers build
//! [`Request`] values, a [`backend::Backend`] sends them, and the
//! [`Client`] interprets statuses.
//!
//! ## Example
//!
//! ```no_run
//! use manage::{Client, ConnectInfo, Request};
//!
//! let client = Client::new(ConnectInfo::new("localhost", "admin", "admin"));
//!
//! // `None` means the database does not exist
//! match client.read(&Request::get("/databases/Documents/properties")).unwrap() {
//!     Some(props) => println!("forests: {}", props["forest"]),
//!     None => println!("no such database"),
//! }
//! ```
//!
//! ## Status handling
//!
//! | Call                 | 2xx            | 404        | other     |
//! |----------------------|----------------|------------|-----------|
//! | [`Client::read`]     | `Some(body)`   | `None`     | `Err`     |
//! | [`Client::execute`]  | `Ok(response)` | `Err`      | `Err`     |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::MockBackend;
pub use error::{Error, ErrorCategory, Result};
pub use types::{Api, Body, ConnectInfo, Request, Response, Verb};

use backend::Backend;
use backend::http::HttpBackend;
use serde_json::Value;

/// High-level client for management operations.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a new Client talking HTTP to a cluster.
    #[must_use]
    pub fn new(connect: ConnectInfo) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(connect)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Send a read request.
    ///
    /// A `404` is the expected "does not exist" signal, not an error.
    pub fn read(&self, request: &Request) -> Result<Option<Value>> {
        let response = self.backend.send(request)?;
        if response.is_not_found() {
            log::debug!("{} -> not found", request);
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::status(
                request.to_string(),
                response.status,
                response.message(),
            ));
        }
        // A success without body still means "exists".
        Ok(Some(response.body.unwrap_or(Value::Null)))
    }

    /// Send a write request; any non-2xx status is an error.
    pub fn execute(&self, request: &Request) -> Result<Response> {
        let response = self.backend.send(request)?;
        if !response.is_success() {
            return Err(Error::status(
                request.to_string(),
                response.status,
                response.message(),
            ));
        }
        log::debug!("{} -> {}", request, response.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_read_found() {
        let mock = MockBackend::new();
        mock.respond(
            Verb::Get,
            "/databases/content/properties",
            Response::ok(json!({"database-name": "content"})),
        );
        let client = Client::with_backend(Box::new(mock));

        let body = client
            .read(&Request::get("/databases/content/properties"))
            .unwrap();
        assert_eq!(body, Some(json!({"database-name": "content"})));
    }

    #[test]
    fn test_client_read_not_found_is_none() {
        let client = Client::with_backend(Box::new(MockBackend::new()));
        let body = client
            .read(&Request::get("/databases/missing/properties"))
            .unwrap();
        assert!(body.is_none());
    }

    #[test]
    fn test_client_read_server_error() {
        let mock = MockBackend::new();
        mock.respond(Verb::Get, "/forests", Response::status(500));
        let client = Client::with_backend(Box::new(mock));

        let err = client.read(&Request::get("/forests")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Status);
    }

    #[test]
    fn test_client_read_empty_success() {
        let mock = MockBackend::new();
        mock.respond(Verb::Get, "/forests", Response::status(200));
        let client = Client::with_backend(Box::new(mock));

        assert_eq!(client.read(&Request::get("/forests")).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_client_execute_success() {
        let mock = MockBackend::new();
        let client = Client::with_backend(Box::new(mock.clone()));

        let resp = client
            .execute(&Request::post("/databases").json(json!({"database-name": "x"})))
            .unwrap();
        assert_eq!(resp.status, 201);
        assert_eq!(mock.writes().len(), 1);
    }

    #[test]
    fn test_client_execute_not_found_is_error() {
        let mock = MockBackend::new();
        mock.respond(Verb::Post, "/forests/f?state=attach&database=d", Response::not_found());
        let client = Client::with_backend(Box::new(mock));

        let req = Request::post("/forests/f")
            .query("state", "attach")
            .query("database", "d");
        let err = client.execute(&req).unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
