//! Databases and their forests

use crate::action::{Action, ActionList, Read, available_forests};
use crate::component::Component;
use crate::context::Display;
use crate::definition::DatabaseDef;
use crate::error::{ConfigError, Result};
use crate::property::{DATABASE_PROPERTIES, Owner, Properties};
use crate::space::{DbId, DbLink};
use serde_json::{Map, Value};

/// Default schema database of a new database on the cluster.
pub const DEFAULT_SCHEMA_DATABASE: &str = "Schemas";

/// Default security database of a new database on the cluster.
pub const DEFAULT_SECURITY_DATABASE: &str = "Security";

/// Maximum number of forests generated from a count.
pub const MAX_FORESTS: i64 = 100;

/// A forest, owned by its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    database: String,
    name: String,
}

impl Forest {
    /// A forest of `database`.
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            name: name.into(),
        }
    }

    /// Forest name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the forest if it is available, create it otherwise.
    pub fn create(&self, actions: &mut ActionList<'_>, available: &[String]) {
        let forest = self.name.clone();
        let database = self.database.clone();
        if available.contains(&self.name) {
            actions.reporter().add(1, "attach", "forest", Some(&self.name));
            actions.add(Action::ForestAttach { forest, database });
        } else {
            actions.reporter().add(1, "create", "forest", Some(&self.name));
            actions.add(Action::ForestCreate { forest, database });
        }
    }

    /// Detach the forest. Forests are never deleted.
    pub fn remove(&self, actions: &mut ActionList<'_>) {
        actions.reporter().remove(1, "detach", "forest", Some(&self.name));
        actions.add(Action::ForestDetach {
            forest: self.name.clone(),
            database: self.database.clone(),
        });
    }
}

/// Forest names for a database, from its `forests` definition.
///
/// `null` means one forest, a count `n` generates `<name>-001` to
/// `<name>-<n>`, a list is used in order, without duplicates.
pub fn forest_names(name: &str, forests: &Value, label: &str) -> std::result::Result<Vec<String>, ConfigError> {
    let count = match forests {
        Value::Null => 1,
        Value::Number(n) => n.as_i64().ok_or_else(|| ConfigError::InvalidForests {
            database: label.to_string(),
        })?,
        Value::Array(items) => {
            let mut names: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let forest = item.as_str().ok_or_else(|| ConfigError::InvalidForests {
                    database: label.to_string(),
                })?;
                // one forest per name, first occurrence wins
                if !names.iter().any(|n| n == forest) {
                    names.push(forest.to_string());
                }
            }
            return Ok(names);
        }
        _ => {
            return Err(ConfigError::InvalidForests {
                database: label.to_string(),
            });
        }
    };

    if count < 0 {
        return Err(ConfigError::NegativeForests {
            count,
            database: label.to_string(),
        });
    }
    if count > MAX_FORESTS {
        return Err(ConfigError::TooManyForests {
            count,
            max: MAX_FORESTS,
            database: label.to_string(),
        });
    }
    Ok((1..=count).map(|k| format!("{}-{:03}", name, k)).collect())
}

/// Decide the new value of a sub-database link, if it must change.
///
/// `actual` is the remote field (empty counts as absent), `desired` the
/// configured database name and `default` the value the cluster uses when
/// the link is not set.
pub fn link_update(actual: Option<&str>, desired: Option<&str>, default: Option<&str>) -> Option<Value> {
    let actual = actual.filter(|a| !a.is_empty());
    match desired {
        None => match actual {
            None => None,
            Some(a) if Some(a) == default => None,
            Some(_) => Some(default.map_or(Value::Null, Value::from)),
        },
        Some(name) if actual == Some(name) => None,
        Some(name) => Some(Value::from(name)),
    }
}

/// A database.
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    handle: DbId,
    id: Option<String>,
    name: String,
    schema: Option<DbLink>,
    security: Option<DbLink>,
    triggers: Option<DbLink>,
    forests: Vec<Forest>,
    props: Properties,
}

impl Database {
    /// Build a database from its definition and resolved links.
    pub fn new(
        handle: DbId,
        def: &DatabaseDef,
        schema: Option<DbLink>,
        security: Option<DbLink>,
        triggers: Option<DbLink>,
    ) -> std::result::Result<Self, ConfigError> {
        let name = def.name.clone().ok_or_else(|| ConfigError::MissingName {
            kind: "database".to_string(),
            id: def.id.clone(),
        })?;
        let label = def.label();
        let forests = forest_names(&name, &def.forests, &label)?
            .into_iter()
            .map(|f| Forest::new(name.as_str(), f))
            .collect();
        let props = Properties::parse(DATABASE_PROPERTIES, &def.properties, &name)?;

        Ok(Self {
            handle,
            id: def.id.clone(),
            name,
            schema,
            security,
            triggers,
            forests,
            props,
        })
    }

    /// Arena handle.
    pub fn handle(&self) -> DbId {
        self.handle
    }

    /// Configured id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Schema database link.
    pub fn schema(&self) -> Option<&DbLink> {
        self.schema.as_ref()
    }

    /// Security database link.
    pub fn security(&self) -> Option<&DbLink> {
        self.security.as_ref()
    }

    /// Triggers database link.
    pub fn triggers(&self) -> Option<&DbLink> {
        self.triggers.as_ref()
    }

    /// Desired forests, in declared order.
    pub fn forests(&self) -> &[Forest] {
        &self.forests
    }

    /// Configured properties.
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    fn links(&self) -> [(&Option<DbLink>, &'static str, Option<&'static str>); 3] {
        [
            (
                &self.schema,
                "schema-database",
                Some(DEFAULT_SCHEMA_DATABASE),
            ),
            (
                &self.security,
                "security-database",
                Some(DEFAULT_SECURITY_DATABASE),
            ),
            (&self.triggers, "triggers-database", None),
        ]
    }

    /// Queue the creation of the database and its forests.
    pub fn create(&self, actions: &mut ActionList<'_>, available: &[String]) {
        actions.reporter().add(0, "create", "database", Some(&self.name));

        let mut payload = Map::new();
        payload.insert("database-name".to_string(), Value::from(self.name.as_str()));
        for (link, field, _) in self.links() {
            if let Some(link) = link {
                payload.insert(field.to_string(), Value::from(link.name.as_str()));
            }
        }
        self.props.create(&mut payload);
        actions.add(Action::DatabaseCreate {
            name: self.name.clone(),
            payload,
        });

        actions.reporter().check(1, "forests", None);
        for forest in &self.forests {
            forest.create(actions, available);
        }
    }

    /// Queue the corrections bringing an existing database in line.
    pub fn update(&self, actions: &mut ActionList<'_>, actual: &Value, available: &[String]) {
        for (link, field, default) in self.links() {
            let current = actual.get(field).and_then(Value::as_str);
            let desired = link.as_ref().map(|l| l.name.as_str());
            if let Some(value) = link_update(current, desired, default) {
                actions.reporter().add(0, "update", field, None);
                actions.add(Action::DatabaseUpdate {
                    database: self.name.clone(),
                    property: field.to_string(),
                    value,
                });
            }
        }

        actions.reporter().check(1, "forests", None);
        let remote = remote_forests(actual);
        for name in &remote {
            if !self.forests.iter().any(|f| f.name() == name) {
                Forest::new(self.name.as_str(), name.as_str()).remove(actions);
            }
        }
        for forest in &self.forests {
            if !remote.iter().any(|r| r == forest.name()) {
                forest.create(actions, available);
            }
        }

        actions.reporter().check(1, "properties", None);
        self.props
            .update(actions, actual, Owner::Database(&self.name));
    }
}

/// Forests attached to a database, from its properties body.
fn remote_forests(body: &Value) -> Vec<String> {
    match body.get("forest") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(name)) => vec![name.clone()],
        _ => Vec::new(),
    }
}

impl Component for Database {
    fn kind(&self) -> &'static str {
        "database"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn show(&self, display: &mut dyn Display) {
        display.entity(self.kind(), &self.name);
        if let Some(id) = &self.id {
            display.field("id", id);
        }
        for (link, field, _) in self.links() {
            if let Some(link) = link {
                display.field(field, &link.name);
            }
        }
        let forests: Vec<String> = self.forests.iter().map(|f| f.name.clone()).collect();
        display.list("forests", &forests);
        for prop in self.props.iter() {
            display.field(prop.field(), &prop.value().to_string());
        }
    }

    fn setup(&self, actions: &mut ActionList<'_>) -> Result<()> {
        actions.reporter().check(0, "the database", Some(&self.name));
        let body = actions.read(Read::DatabaseProps(&self.name))?;
        let forests = actions.read(Read::ForestList)?;
        let available = forests.as_ref().map(available_forests).unwrap_or_default();

        match body {
            None => self.create(actions, &available),
            Some(body) => self.update(actions, &body, &available),
        }
        Ok(())
    }
}
