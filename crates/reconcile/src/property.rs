//! Configured properties
//!
//! A [`Property`] is one typed configuration value. It writes itself into
//! creation payloads and diffs itself against the properties read back from
//! the cluster, queueing a correction when they differ.
//!
//! Which configuration keys exist, the API field each maps to and their
//! kind is described by the static [`DATABASE_PROPERTIES`] and
//! [`SERVER_PROPERTIES`] tables.

use crate::action::{Action, ActionList};
use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A plain string.
    String,
    /// An integer; numeric strings are accepted.
    Integer,
    /// A boolean; `"true"` and `"false"` are accepted.
    Boolean,
    /// An unordered list of values or objects.
    List,
    /// A nested object.
    Object,
}

impl Kind {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::List => "a list",
            Self::Object => "an object",
        }
    }
}

/// Static description of a supported property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    /// Key in the environment file.
    pub key: &'static str,
    /// Field name in the management API.
    pub field: &'static str,
    /// Value kind.
    pub kind: Kind,
}

const fn spec(key: &'static str, field: &'static str, kind: Kind) -> PropertySpec {
    PropertySpec { key, field, kind }
}

/// Supported database properties.
pub const DATABASE_PROPERTIES: &[PropertySpec] = &[
    spec("lang", "language", Kind::String),
    spec("stemmed-searches", "stemmed-searches", Kind::String),
    spec("word-searches", "word-searches", Kind::Boolean),
    spec("word-positions", "word-positions", Kind::Boolean),
    spec("fast-phrase-searches", "fast-phrase-searches", Kind::Boolean),
    spec(
        "fast-case-sensitive-searches",
        "fast-case-sensitive-searches",
        Kind::Boolean,
    ),
    spec(
        "fast-diacritic-sensitive-searches",
        "fast-diacritic-sensitive-searches",
        Kind::Boolean,
    ),
    spec(
        "fast-element-word-searches",
        "fast-element-word-searches",
        Kind::Boolean,
    ),
    spec("uri-lexicon", "uri-lexicon", Kind::Boolean),
    spec("collection-lexicon", "collection-lexicon", Kind::Boolean),
    spec("triple-index", "triple-index", Kind::Boolean),
    spec("directory-creation", "directory-creation", Kind::String),
    spec("rebalancer-enable", "rebalancer-enable", Kind::Boolean),
    spec("range-element-index", "range-element-index", Kind::List),
    spec("range-path-index", "range-path-index", Kind::List),
    spec("path-namespace", "path-namespace", Kind::List),
    spec("merge-max-size", "merge-max-size", Kind::Integer),
];

/// Supported server properties.
pub const SERVER_PROPERTIES: &[PropertySpec] = &[
    spec("type", "server-type", Kind::String),
    spec("port", "port", Kind::Integer),
    spec("root", "root", Kind::String),
    spec("rewriter", "url-rewriter", Kind::String),
    spec("handler", "error-handler", Kind::String),
    spec("auth", "authentication", Kind::String),
    spec("default-user", "default-user", Kind::String),
    spec("threads", "threads", Kind::Integer),
    spec("request-timeout", "request-timeout", Kind::Integer),
    spec("session-timeout", "session-timeout", Kind::Integer),
    spec(
        "rewrite-resolves-globally",
        "rewrite-resolves-globally",
        Kind::Boolean,
    ),
    spec("output", "output-options", Kind::Object),
];

/// Look a property up by configuration key.
pub fn find_spec(table: &'static [PropertySpec], key: &str) -> Option<&'static PropertySpec> {
    table.iter().find(|s| s.key == key)
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// A list, compared unordered.
    List(Vec<Value>),
    /// An object, compared as a subset.
    Object(Map<String, Value>),
}

impl PropValue {
    /// Parse a configured value, `None` if it has the wrong shape.
    pub fn parse(kind: Kind, raw: &Value) -> Option<Self> {
        match kind {
            Kind::String => match raw {
                Value::String(s) => Some(Self::String(s.clone())),
                Value::Number(n) => Some(Self::String(n.to_string())),
                _ => None,
            },
            Kind::Integer => as_integer(raw).map(Self::Integer),
            Kind::Boolean => as_boolean(raw).map(Self::Boolean),
            Kind::List => raw.as_array().map(|items| Self::List(items.clone())),
            Kind::Object => raw.as_object().map(|obj| Self::Object(obj.clone())),
        }
    }

    /// The value as sent to the management API.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Boolean(b) => Value::Bool(*b),
            Self::List(items) => Value::Array(items.clone()),
            Self::Object(obj) => Value::Object(obj.clone()),
        }
    }

    /// Whether the remote value already satisfies this one.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Self::String(s) => scalar_text(actual).as_deref() == Some(s.as_str()),
            Self::Integer(i) => as_integer(actual) == Some(*i),
            Self::Boolean(b) => as_boolean(actual) == Some(*b),
            Self::List(_) | Self::Object(_) => value_matches(&self.to_json(), actual),
        }
    }
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Boolean(b) => write!(f, "{}", b),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose structural comparison of a desired value against a remote one.
///
/// Objects match when every desired key matches; the cluster adds default
/// fields we never configured. Lists are unordered and must have the same
/// length. Scalars compare by their text form.
pub fn value_matches(desired: &Value, actual: &Value) -> bool {
    match (desired, actual) {
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(k, v)| have.get(k).is_some_and(|a| value_matches(v, a))),
        (Value::Array(want), Value::Array(have)) => {
            if want.len() != have.len() {
                return false;
            }
            let mut used = vec![false; have.len()];
            want.iter().all(|w| {
                let found = have
                    .iter()
                    .enumerate()
                    .find(|(i, h)| !used[*i] && value_matches(w, h))
                    .map(|(i, _)| i);
                match found {
                    Some(i) => {
                        used[i] = true;
                        true
                    }
                    None => false,
                }
            })
        }
        (Value::Null, Value::Null) => true,
        (want, have) => match (scalar_text(want), scalar_text(have)) {
            (Some(w), Some(h)) => w == h,
            _ => false,
        },
    }
}

/// The entity a property belongs to, used to address update actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    /// A database, by name.
    Database(&'a str),
    /// An app server, by name and group.
    Server {
        /// Server name.
        name: &'a str,
        /// Server group.
        group: &'a str,
    },
}

impl Owner<'_> {
    /// The update action setting `field` to `value` on this owner.
    pub fn update(&self, field: &str, value: Value) -> Action {
        match self {
            Self::Database(name) => Action::DatabaseUpdate {
                database: (*name).to_string(),
                property: field.to_string(),
                value,
            },
            Self::Server { name, group } => Action::ServerUpdate {
                server: (*name).to_string(),
                group: (*group).to_string(),
                property: field.to_string(),
                value,
            },
        }
    }
}

/// One configured property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    spec: &'static PropertySpec,
    value: PropValue,
}

impl Property {
    /// A property with an already-typed value.
    pub fn new(spec: &'static PropertySpec, value: PropValue) -> Self {
        Self { spec, value }
    }

    /// Parse a configured value for `spec`.
    pub fn parse(spec: &'static PropertySpec, raw: &Value, owner: &str) -> Result<Self, ConfigError> {
        PropValue::parse(spec.kind, raw)
            .map(|value| Self { spec, value })
            .ok_or_else(|| ConfigError::InvalidProperty {
                owner: owner.to_string(),
                property: spec.key.to_string(),
                expected: spec.kind.name().to_string(),
            })
    }

    /// Configuration key.
    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    /// API field name.
    pub fn field(&self) -> &'static str {
        self.spec.field
    }

    /// Configured value.
    pub fn value(&self) -> &PropValue {
        &self.value
    }

    /// Write this property into a creation payload.
    pub fn create(&self, payload: &mut Map<String, Value>) {
        payload.insert(self.spec.field.to_string(), self.value.to_json());
    }

    /// Queue an update if the remote value differs.
    pub fn update(&self, actions: &mut ActionList<'_>, actual: &Value, owner: Owner<'_>) {
        if self.value.matches(actual.get(self.spec.field)) {
            return;
        }
        actions.reporter().add(1, "update", self.spec.field, None);
        actions.add(owner.update(self.spec.field, self.value.to_json()));
    }
}

/// The configured properties of one entity, keyed by configuration key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    props: BTreeMap<&'static str, Property>,
}

impl Properties {
    /// Extract the known properties of `table` from a definition.
    ///
    /// Unknown keys are logged and skipped. `null` values count as unset.
    pub fn parse(
        table: &'static [PropertySpec],
        raw: &Map<String, Value>,
        owner: &str,
    ) -> Result<Self, ConfigError> {
        let mut props = BTreeMap::new();
        for (key, value) in raw {
            if value.is_null() {
                continue;
            }
            match find_spec(table, key) {
                Some(spec) => {
                    props.insert(spec.key, Property::parse(spec, value, owner)?);
                }
                None => log::warn!("{}: ignoring unknown property '{}'", owner, key),
            }
        }
        Ok(Self { props })
    }

    /// Property by configuration key.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.props.get(key)
    }

    /// Add or replace a property.
    pub fn insert(&mut self, property: Property) {
        self.props.insert(property.key(), property);
    }

    /// Properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.props.values()
    }

    /// Number of configured properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether no property is configured.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Write every property into a creation payload.
    pub fn create(&self, payload: &mut Map<String, Value>) {
        for prop in self.props.values() {
            prop.create(payload);
        }
    }

    /// Diff every property against the remote body.
    pub fn update(&self, actions: &mut ActionList<'_>, actual: &Value, owner: Owner<'_>) {
        for prop in self.props.values() {
            prop.update(actions, actual, owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RecordingReporter;
    use manage::{Client, MockBackend};
    use serde_json::json;

    fn parse(table: &'static [PropertySpec], raw: Value) -> Result<Properties, ConfigError> {
        Properties::parse(table, raw.as_object().unwrap(), "test")
    }

    #[test]
    fn test_parse_known_properties() {
        let props = parse(
            SERVER_PROPERTIES,
            json!({"type": "http", "port": "8010", "unknown": 1, "root": null}),
        )
        .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("port").unwrap().value(), &PropValue::Integer(8010));
        assert_eq!(props.get("type").unwrap().field(), "server-type");
        assert!(props.get("root").is_none());
    }

    #[test]
    fn test_parse_ill_typed_property() {
        let err = parse(SERVER_PROPERTIES, json!({"port": "eighty"})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidProperty {
                owner: "test".to_string(),
                property: "port".to_string(),
                expected: "an integer".to_string(),
            }
        );

        assert!(parse(DATABASE_PROPERTIES, json!({"uri-lexicon": "yes"})).is_err());
        assert!(parse(DATABASE_PROPERTIES, json!({"range-path-index": {}})).is_err());
    }

    #[test]
    fn test_create_uses_api_field_names() {
        let props = parse(
            DATABASE_PROPERTIES,
            json!({"lang": "fr", "uri-lexicon": "true", "merge-max-size": 2048}),
        )
        .unwrap();
        let mut payload = Map::new();
        props.create(&mut payload);
        assert_eq!(
            Value::Object(payload),
            json!({"language": "fr", "uri-lexicon": true, "merge-max-size": 2048})
        );
    }

    #[test]
    fn test_scalar_matching_is_loose() {
        assert!(PropValue::Integer(8010).matches(Some(&json!("8010"))));
        assert!(PropValue::Integer(8010).matches(Some(&json!(8010))));
        assert!(!PropValue::Integer(8010).matches(Some(&json!(8011))));
        assert!(PropValue::Boolean(true).matches(Some(&json!("true"))));
        assert!(!PropValue::Boolean(true).matches(None));
        assert!(PropValue::String("http".into()).matches(Some(&json!("http"))));
    }

    #[test]
    fn test_list_matching_is_unordered_subset() {
        let desired = PropValue::List(vec![
            json!({"scalar-type": "string", "localname": "a"}),
            json!({"scalar-type": "int", "localname": "b"}),
        ]);
        let actual = json!([
            {"scalar-type": "int", "localname": "b", "collation": ""},
            {"scalar-type": "string", "localname": "a", "collation": "http://x"},
        ]);
        assert!(desired.matches(Some(&actual)));

        let shorter = json!([{"scalar-type": "int", "localname": "b"}]);
        assert!(!desired.matches(Some(&shorter)));
    }

    #[test]
    fn test_object_matching_is_subset() {
        let desired = PropValue::Object(
            json!({"indent": "yes"}).as_object().unwrap().clone(),
        );
        assert!(desired.matches(Some(&json!({"indent": "yes", "method": "xml"}))));
        assert!(!desired.matches(Some(&json!({"indent": "no"}))));
    }

    #[test]
    fn test_update_queues_only_divergent() {
        let client = Client::with_backend(Box::new(MockBackend::new()));
        let reporter = RecordingReporter::new();
        let mut actions = ActionList::new(&client, &reporter);

        let props = parse(SERVER_PROPERTIES, json!({"port": 8010, "root": "/app"})).unwrap();
        let actual = json!({"port": 8010, "root": "/old"});
        props.update(
            &mut actions,
            &actual,
            Owner::Server {
                name: "app",
                group: "Default",
            },
        );

        assert_eq!(
            actions.actions(),
            &[Action::ServerUpdate {
                server: "app".to_string(),
                group: "Default".to_string(),
                property: "root".to_string(),
                value: json!("/app"),
            }]
        );
        assert_eq!(reporter.lines(), vec!["   need to update root"]);
    }
}
