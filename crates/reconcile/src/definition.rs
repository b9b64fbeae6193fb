//! Resolved definitions, as produced by the environment loader.
//!
//! These are plain serde types: parameters are already substituted and
//! imports already merged. [`crate::Space::build`] turns them into the
//! entity model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reference to a database from another database or a server.
///
/// ```
/// use reconcile::DbRef;
///
/// let r: DbRef = serde_json::from_str(r#"{"idref": "content"}"#).unwrap();
/// assert_eq!(r, DbRef::IdRef { idref: "content".into() });
///
/// let r: DbRef = serde_json::from_str(r#""self""#).unwrap();
/// assert!(r.is_self());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DbRef {
    /// `"self"`, or a bare database name.
    Name(String),
    /// `{"idref": "..."}`: a database by id.
    IdRef {
        /// Referenced id.
        idref: String,
    },
    /// `{"nameref": "..."}`: a database by name.
    NameRef {
        /// Referenced name.
        nameref: String,
    },
    /// A database defined in place.
    Embedded(Box<DatabaseDef>),
}

impl DbRef {
    /// Whether this is the `"self"` alias.
    pub fn is_self(&self) -> bool {
        matches!(self, Self::Name(name) if name == "self")
    }
}

/// A database definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDef {
    /// Identifier, for `idref` references and import merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Database name on the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schema database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<DbRef>,
    /// Security database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<DbRef>,
    /// Triggers database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<DbRef>,
    /// Forest count or list of forest names; `null` means one forest.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub forests: Value,
    /// Every other key, parsed as properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DatabaseDef {
    /// Id or name, for error messages.
    pub fn label(&self) -> String {
        format!(
            "id:{}|name:{}",
            self.id.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default()
        )
    }
}

/// An app server definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerDef {
    /// Identifier, for import merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Server name on the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Group; `Default` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Content database (mandatory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<DbRef>,
    /// Modules database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<DbRef>,
    /// Every other key, parsed as properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// The whole resolved environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceDef {
    /// Parameters, including the built-in `@code` and `@srcdir`.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Databases, in declaration order.
    #[serde(default)]
    pub databases: Vec<DatabaseDef>,
    /// Servers, in declaration order.
    #[serde(default)]
    pub servers: Vec<ServerDef>,
}
