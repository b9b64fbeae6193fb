//! Action queue
//!
//! Planning interleaves two kinds of operations:
//! - [`Read`]s run immediately through [`ActionList::read`] and return the
//!   remote body, or `None` when the resource does not exist.
//! - [`Action`]s are side-effecting writes, appended to the list and only
//!   sent by [`ActionList::execute`], strictly in insertion order.

use crate::context::{ExecProgress, Reporter};
use crate::error::{Error, Result};
use manage::{Api, Client, Request};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// A synchronous read of remote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read<'a> {
    /// Properties of a database, by name.
    DatabaseProps(&'a str),
    /// Properties of an app server, by name within a group.
    ServerProps {
        /// Server name.
        name: &'a str,
        /// Group the server belongs to.
        group: &'a str,
    },
    /// The cluster forest list.
    ForestList,
}

impl Read<'_> {
    /// The request implementing this read.
    pub fn request(&self) -> Request {
        match self {
            Self::DatabaseProps(name) => Request::get(format!("/databases/{}/properties", name)),
            Self::ServerProps { name, group } => {
                Request::get(format!("/servers/{}/properties", name)).query("group-id", *group)
            }
            Self::ForestList => Request::get("/forests"),
        }
    }
}

/// Extract the forest names from a forest list body.
pub fn available_forests(body: &Value) -> Vec<String> {
    body.pointer("/forest-default-list/list-items/list-item")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("nameref").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A queued write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Create a database from a full payload.
    DatabaseCreate {
        /// Database name.
        name: String,
        /// Creation payload.
        payload: Map<String, Value>,
    },
    /// Set one property of a database.
    DatabaseUpdate {
        /// Database name.
        database: String,
        /// API field name.
        property: String,
        /// New value (`null` unsets a link).
        value: Value,
    },
    /// Provision a new forest for a database.
    ForestCreate {
        /// Forest name.
        forest: String,
        /// Owning database name.
        database: String,
    },
    /// Attach an existing, unassigned forest to a database.
    ForestAttach {
        /// Forest name.
        forest: String,
        /// Target database name.
        database: String,
    },
    /// Detach a forest from a database, keeping its data.
    ForestDetach {
        /// Forest name.
        forest: String,
        /// Database it is detached from.
        database: String,
    },
    /// Create an app server from a full payload.
    ServerCreate {
        /// Server name.
        name: String,
        /// Group the server is created in.
        group: String,
        /// Creation payload.
        payload: Map<String, Value>,
    },
    /// Set one property of an app server.
    ServerUpdate {
        /// Server name.
        server: String,
        /// Group of the server.
        group: String,
        /// API field name.
        property: String,
        /// New value (`null` unsets a link).
        value: Value,
    },
    /// Insert a file as a document in a database.
    DocInsert {
        /// Target database name.
        database: String,
        /// Document URI.
        uri: String,
        /// Local file.
        path: PathBuf,
    },
}

impl Action {
    /// Human-readable description ("create database content").
    pub fn describe(&self) -> String {
        match self {
            Self::DatabaseCreate { name, .. } => format!("create database {}", name),
            Self::DatabaseUpdate {
                database, property, ..
            } => format!("update {} on database {}", property, database),
            Self::ForestCreate { forest, .. } => format!("create forest {}", forest),
            Self::ForestAttach { forest, database } => {
                format!("attach forest {} to {}", forest, database)
            }
            Self::ForestDetach { forest, database } => {
                format!("detach forest {} from {}", forest, database)
            }
            Self::ServerCreate { name, .. } => format!("create server {}", name),
            Self::ServerUpdate {
                server, property, ..
            } => format!("update {} on server {}", property, server),
            Self::DocInsert { uri, database, .. } => {
                format!("insert document {} into {}", uri, database)
            }
        }
    }

    /// Build the request implementing this action.
    ///
    /// Document inserts read the file here, at execution time.
    pub fn request(&self) -> manage::Result<Request> {
        let req = match self {
            Self::DatabaseCreate { payload, .. } => {
                Request::post("/databases").json(Value::Object(payload.clone()))
            }
            Self::DatabaseUpdate {
                database,
                property,
                value,
            } => Request::put(format!("/databases/{}/properties", database))
                .json(single(property, value)),
            Self::ForestCreate { forest, database } => {
                Request::post("/forests").json(json!({
                    "forest-name": forest,
                    "database": database,
                }))
            }
            Self::ForestAttach { forest, database } => Request::post(format!("/forests/{}", forest))
                .query("state", "attach")
                .query("database", database.as_str()),
            Self::ForestDetach { forest, database } => Request::post(format!("/forests/{}", forest))
                .query("state", "detach")
                .query("database", database.as_str()),
            Self::ServerCreate { group, payload, .. } => Request::post("/servers")
                .query("group-id", group.as_str())
                .json(Value::Object(payload.clone())),
            Self::ServerUpdate {
                server,
                group,
                property,
                value,
            } => Request::put(format!("/servers/{}/properties", server))
                .query("group-id", group.as_str())
                .json(single(property, value)),
            Self::DocInsert {
                database,
                uri,
                path,
            } => {
                let data = std::fs::read(path).map_err(|e| manage::Error::io(path, e))?;
                Request::put("/documents")
                    .api(Api::Rest)
                    .query("uri", uri.as_str())
                    .query("database", database.as_str())
                    .bytes(content_type(uri), data)
            }
        };
        Ok(req)
    }
}

fn single(property: &str, value: &Value) -> Value {
    let mut obj = Map::new();
    obj.insert(property.to_string(), value.clone());
    Value::Object(obj)
}

/// MIME type for a document URI, from its extension.
pub fn content_type(uri: &str) -> &'static str {
    let ext = uri.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match ext {
        "xml" | "xsl" | "xslt" | "xsd" => "application/xml",
        "json" => "application/json",
        "xqy" | "xql" | "xq" | "xqm" => "application/xquery",
        "sjs" | "js" | "mjs" => "application/javascript",
        "html" | "htm" => "text/html",
        "txt" | "md" | "csv" => "text/plain",
        "css" => "text/css",
        _ => "application/octet-stream",
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    /// Databases, forests and servers created.
    pub created: usize,
    /// Properties updated.
    pub updated: usize,
    /// Forests attached.
    pub attached: usize,
    /// Forests detached.
    pub detached: usize,
    /// Documents inserted.
    pub inserted: usize,
}

impl ExecuteSummary {
    /// Total number of actions executed.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.attached + self.detached + self.inserted
    }

    /// Count a successfully executed action.
    pub fn add_action(&mut self, action: &Action) {
        match action {
            Action::DatabaseCreate { .. }
            | Action::ForestCreate { .. }
            | Action::ServerCreate { .. } => self.created += 1,
            Action::DatabaseUpdate { .. } | Action::ServerUpdate { .. } => self.updated += 1,
            Action::ForestAttach { .. } => self.attached += 1,
            Action::ForestDetach { .. } => self.detached += 1,
            Action::DocInsert { .. } => self.inserted += 1,
        }
    }
}

/// The action queue, shared by every entity during one planning pass.
pub struct ActionList<'a> {
    client: &'a Client,
    reporter: &'a dyn Reporter,
    actions: Vec<Action>,
}

impl<'a> ActionList<'a> {
    /// Create an empty queue.
    pub fn new(client: &'a Client, reporter: &'a dyn Reporter) -> Self {
        Self {
            client,
            reporter,
            actions: Vec::new(),
        }
    }

    /// Run a read now. `None` means "not found".
    pub fn read(&self, read: Read<'_>) -> manage::Result<Option<Value>> {
        self.client.read(&read.request())
    }

    /// Append a write.
    pub fn add(&mut self, action: Action) {
        log::debug!("queued: {}", action.describe());
        self.actions.push(action);
    }

    /// The progress reporter.
    pub fn reporter(&self) -> &'a dyn Reporter {
        self.reporter
    }

    /// Queued writes, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of queued writes.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Send every queued write, in order, stopping at the first failure.
    pub fn execute(&self, progress: &mut dyn ExecProgress) -> Result<ExecuteSummary> {
        let mut summary = ExecuteSummary::default();
        let total = self.actions.len();

        for (index, action) in self.actions.iter().enumerate() {
            progress.on_action_start(index, total, action);

            let outcome = action
                .request()
                .and_then(|request| self.client.execute(&request));
            if let Err(source) = outcome {
                log::warn!(
                    "aborting after {} of {} actions: {}",
                    summary.total(),
                    total,
                    source
                );
                return Err(Error::Execute {
                    action: action.describe(),
                    completed: summary.total(),
                    source,
                });
            }

            summary.add_action(action);
            progress.on_action_complete(index, action);
        }

        Ok(summary)
    }
}
