//! Backend trait and implementations for sending requests.
//!
//! [`http::HttpBackend`] talks to a real cluster. [`MockBackend`] answers
//! from an in-memory table and records every request it sees, so planning
//! and execution can be tested without network access:
//!
//! ```
//! use manage::backend::{Backend, MockBackend};
//! use manage::{Request, Response, Verb};
//! use serde_json::json;
//!
//! let mock = MockBackend::new();
//! mock.respond(
//!     Verb::Get,
//!     "/databases/content/properties",
//!     Response::ok(json!({"database-name": "content"})),
//! );
//!
//! let resp = mock.send(&Request::get("/databases/content/properties")).unwrap();
//! assert_eq!(resp.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::error::Result;
use crate::types::{Request, Response, Verb};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Backend trait for sending requests.
///
/// Implementations return the response whatever its status; interpreting
/// the status is the [`crate::Client`]'s job.
pub trait Backend: Send + Sync {
    /// Send one request.
    fn send(&self, request: &Request) -> Result<Response>;
}

/// Mock backend for testing without network access.
///
/// Answers are keyed by verb and URL (path plus query). Unscripted `GET`
/// requests answer `404`; unscripted writes answer `201`. Clones share
/// the same table and request log.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<(Verb, String), Response>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for a verb and URL.
    pub fn respond(&self, verb: Verb, url: impl Into<String>, response: Response) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert((verb, url.into()), response);
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent so far, excluding reads.
    pub fn writes(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.verb != Verb::Get)
            .collect()
    }
}

impl Backend for MockBackend {
    fn send(&self, request: &Request) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        if let Some(resp) = responses.get(&(request.verb, request.url())) {
            return Ok(resp.clone());
        }

        Ok(match request.verb {
            Verb::Get => Response::not_found(),
            Verb::Post | Verb::Put => Response::status(201),
        })
    }
}
