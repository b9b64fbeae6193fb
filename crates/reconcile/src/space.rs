//! The space: every database and server of an environment.
//!
//! Databases live in an arena and reference each other by [`DbId`]. Links
//! also carry the referenced name, which is all reconciliation ever needs.
//!
//! Building happens in three steps:
//! 1. Embedded database definitions are lifted into the arena, each one
//!    placed before the definition referring to it.
//! 2. Ids and names are indexed; duplicates are rejected.
//! 3. References are resolved and the entities constructed.

use crate::action::ActionList;
use crate::component::Component;
use crate::context::Display;
use crate::database::Database;
use crate::definition::{DatabaseDef, DbRef, ServerDef, SpaceDef};
use crate::error::{ConfigError, Result};
use crate::server::Server;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Index of a database in its space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbId(pub(crate) usize);

impl DbId {
    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A resolved reference to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbLink {
    /// Arena handle.
    pub id: DbId,
    /// Database name.
    pub name: String,
}

/// A reference after embedded definitions were lifted.
#[derive(Debug, Clone)]
enum Pending {
    Myself,
    Id(String),
    Name(String),
    Index(usize),
}

struct FlatDatabase {
    def: DatabaseDef,
    schema: Option<Pending>,
    security: Option<Pending>,
    triggers: Option<Pending>,
}

struct FlatServer {
    def: ServerDef,
    content: Option<Pending>,
    modules: Option<Pending>,
}

fn lower(reference: DbRef, arena: &mut Vec<FlatDatabase>) -> Pending {
    match reference {
        DbRef::Name(name) if name == "self" => Pending::Myself,
        DbRef::Name(name) | DbRef::NameRef { nameref: name } => Pending::Name(name),
        DbRef::IdRef { idref } => Pending::Id(idref),
        DbRef::Embedded(def) => Pending::Index(flatten(*def, arena)),
    }
}

fn flatten(mut def: DatabaseDef, arena: &mut Vec<FlatDatabase>) -> usize {
    let schema = def.schema.take().map(|r| lower(r, arena));
    let security = def.security.take().map(|r| lower(r, arena));
    let triggers = def.triggers.take().map(|r| lower(r, arena));
    arena.push(FlatDatabase {
        def,
        schema,
        security,
        triggers,
    });
    arena.len() - 1
}

struct Index {
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    names: Vec<String>,
}

impl Index {
    fn build(arena: &[FlatDatabase]) -> std::result::Result<Self, ConfigError> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut names = Vec::with_capacity(arena.len());

        for (i, flat) in arena.iter().enumerate() {
            let name = flat.def.name.clone().ok_or_else(|| ConfigError::MissingName {
                kind: "database".to_string(),
                id: flat.def.id.clone(),
            })?;
            if let Some(id) = &flat.def.id {
                if by_id.insert(id.clone(), i).is_some() {
                    return Err(ConfigError::Duplicate {
                        kind: "database id".to_string(),
                        key: id.clone(),
                    });
                }
            }
            if by_name.insert(name.clone(), i).is_some() {
                return Err(ConfigError::Duplicate {
                    kind: "database name".to_string(),
                    key: name,
                });
            }
            names.push(name);
        }

        Ok(Self {
            by_id,
            by_name,
            names,
        })
    }

    fn link(&self, index: usize) -> DbLink {
        DbLink {
            id: DbId(index),
            name: self.names[index].clone(),
        }
    }

    /// Resolve a reference held by `owner`; `me` is the owner's own index
    /// for databases, `None` for servers.
    fn resolve(
        &self,
        pending: Option<&Pending>,
        me: Option<usize>,
        owner: &str,
        link: &str,
    ) -> std::result::Result<Option<DbLink>, ConfigError> {
        let Some(pending) = pending else {
            return Ok(None);
        };
        let index = match pending {
            Pending::Myself => me.ok_or_else(|| ConfigError::InvalidSelfReference {
                owner: owner.to_string(),
                link: link.to_string(),
            })?,
            Pending::Index(i) => *i,
            Pending::Id(id) => *self.by_id.get(id).ok_or_else(|| ConfigError::UnresolvedReference {
                owner: owner.to_string(),
                link: link.to_string(),
                target: id.clone(),
            })?,
            Pending::Name(name) => {
                *self
                    .by_name
                    .get(name)
                    .ok_or_else(|| ConfigError::UnresolvedReference {
                        owner: owner.to_string(),
                        link: link.to_string(),
                        target: name.clone(),
                    })?
            }
        };
        Ok(Some(self.link(index)))
    }
}

/// The resolved environment.
#[derive(Debug, Clone, Default)]
pub struct Space {
    params: BTreeMap<String, String>,
    databases: Vec<Database>,
    servers: Vec<Server>,
}

impl Space {
    /// Build the entity model from resolved definitions.
    pub fn build(def: SpaceDef) -> std::result::Result<Self, ConfigError> {
        let SpaceDef {
            params,
            databases,
            servers,
        } = def;

        let mut arena = Vec::new();
        for db in databases {
            flatten(db, &mut arena);
        }
        let servers: Vec<FlatServer> = servers
            .into_iter()
            .map(|mut srv| {
                let content = srv.content.take().map(|r| lower(r, &mut arena));
                let modules = srv.modules.take().map(|r| lower(r, &mut arena));
                FlatServer {
                    def: srv,
                    content,
                    modules,
                }
            })
            .collect();

        let index = Index::build(&arena)?;

        let mut built = Vec::with_capacity(arena.len());
        for (i, flat) in arena.iter().enumerate() {
            let owner = &index.names[i];
            let schema = index.resolve(flat.schema.as_ref(), Some(i), owner, "schema")?;
            let security = index.resolve(flat.security.as_ref(), Some(i), owner, "security")?;
            let triggers = index.resolve(flat.triggers.as_ref(), Some(i), owner, "triggers")?;
            built.push(Database::new(DbId(i), &flat.def, schema, security, triggers)?);
        }

        let srcdir = params.get("@srcdir").map(String::as_str);
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(servers.len());
        for flat in &servers {
            let owner = flat.def.name.as_deref().unwrap_or_default();
            let content = index.resolve(flat.content.as_ref(), None, owner, "content")?;
            let modules = index.resolve(flat.modules.as_ref(), None, owner, "modules")?;
            let server = Server::new(&flat.def, content, modules, srcdir)?;
            let key = (server.group().to_string(), server.name().to_string());
            if !seen.insert(key) {
                return Err(ConfigError::Duplicate {
                    kind: "server".to_string(),
                    key: server.name().to_string(),
                });
            }
            resolved.push(server);
        }

        log::debug!(
            "built space: {} databases, {} servers",
            built.len(),
            resolved.len()
        );
        Ok(Self {
            params,
            databases: built,
            servers: resolved,
        })
    }

    /// A parameter value, built-ins included (`@srcdir`, `@code`).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Every parameter.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Databases, embedded definitions first.
    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    /// Servers, in declaration order.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// A database by handle.
    pub fn database(&self, id: DbId) -> Option<&Database> {
        self.databases.get(id.0)
    }

    /// A database by id, then by name.
    pub fn find_database(&self, key: &str) -> Option<&Database> {
        self.databases
            .iter()
            .find(|db| db.id() == Some(key))
            .or_else(|| self.databases.iter().find(|db| db.name() == key))
    }

    /// A server by id, then by name.
    pub fn find_server(&self, key: &str) -> Option<&Server> {
        self.servers
            .iter()
            .find(|srv| srv.id() == Some(key))
            .or_else(|| self.servers.iter().find(|srv| srv.name() == key))
    }

    /// Every component, databases first.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.databases
            .iter()
            .map(|db| db as &dyn Component)
            .chain(self.servers.iter().map(|srv| srv as &dyn Component))
    }

    /// Plan the setup of every database, then every server.
    ///
    /// Stops at the first failed read.
    pub fn setup(&self, actions: &mut ActionList<'_>) -> Result<()> {
        for component in self.components() {
            log::debug!("planning {} {}", component.kind(), component.name());
            component.setup(actions)?;
        }
        log::info!("planned {} actions", actions.len());
        Ok(())
    }

    /// Describe every component.
    pub fn show(&self, display: &mut dyn Display) {
        for component in self.components() {
            component.show(display);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::context::{LogReporter, NoReport};
    use manage::{Client, MockBackend, Response, Verb};
    use serde_json::{Value, json};

    fn space(value: Value) -> std::result::Result<Space, ConfigError> {
        Space::build(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_self_and_id_references() {
        let space = space(json!({
            "databases": [
                {"id": "content", "name": "app-content", "schema": {"idref": "schemas"}, "security": "self"},
                {"id": "schemas", "name": "app-schemas", "schema": "self"}
            ]
        }))
        .unwrap();

        let content = space.find_database("content").unwrap();
        assert_eq!(content.schema().unwrap().name, "app-schemas");
        assert_eq!(content.security().unwrap().id, content.handle());
        let schemas = space.find_database("app-schemas").unwrap();
        assert_eq!(schemas.schema().unwrap().id, schemas.handle());
    }

    #[test]
    fn test_embedded_definitions_come_first() {
        let space = space(json!({
            "params": {"@srcdir": "/p/src/"},
            "databases": [
                {"name": "content", "triggers": {"name": "content-triggers", "forests": 0}}
            ],
            "servers": [
                {"name": "app", "content": {"nameref": "content"}, "modules": {"name": "app-modules"}}
            ]
        }))
        .unwrap();

        let names: Vec<&str> = space.databases().iter().map(Component::name).collect();
        assert_eq!(names, vec!["content-triggers", "content", "app-modules"]);
        let srv = &space.servers()[0];
        assert_eq!(srv.modules().unwrap().name, "app-modules");
        assert_eq!(space.database(srv.content().id).unwrap().name(), "content");
    }

    #[test]
    fn test_unresolved_reference() {
        let err = space(json!({
            "databases": [{"name": "c", "schema": {"idref": "nope"}}]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnresolvedReference {
                owner: "c".to_string(),
                link: "schema".to_string(),
                target: "nope".to_string(),
            }
        );
    }

    #[test]
    fn test_self_reference_on_server() {
        let err = space(json!({
            "servers": [{"name": "app", "content": "self", "root": "/"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelfReference { .. }));
    }

    #[test]
    fn test_duplicates() {
        let err = space(json!({
            "databases": [{"id": "a", "name": "x"}, {"id": "b", "name": "x"}]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Duplicate {
                kind: "database name".to_string(),
                key: "x".to_string(),
            }
        );

        let err = space(json!({
            "databases": [{"name": "c"}],
            "servers": [
                {"name": "app", "content": "c", "root": "/"},
                {"name": "app", "content": "c", "root": "/"}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate { .. }));
    }

    #[test]
    fn test_forest_errors_surface() {
        let err = space(json!({"databases": [{"name": "c", "forests": -1}]})).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeForests { .. }));
    }

    #[test]
    fn test_setup_orders_databases_before_servers() {
        let mock = MockBackend::new();
        mock.respond(
            Verb::Get,
            "/servers/app/properties?group-id=Default",
            Response::ok(json!({"content-database": "old", "root": "/"})),
        );
        let client = Client::with_backend(Box::new(mock));
        let mut actions = ActionList::new(&client, &NoReport);

        // the server is declared with its content database embedded
        let space = space(json!({
            "servers": [{"name": "app", "root": "/", "content": {"name": "new", "forests": 0}}],
            "databases": [{"name": "other", "forests": 0}]
        }))
        .unwrap();
        space.setup(&mut actions).unwrap();

        assert_eq!(
            actions.actions(),
            &[
                Action::DatabaseCreate {
                    name: "other".to_string(),
                    payload: json!({"database-name": "other"}).as_object().unwrap().clone(),
                },
                Action::DatabaseCreate {
                    name: "new".to_string(),
                    payload: json!({"database-name": "new"}).as_object().unwrap().clone(),
                },
                Action::ServerUpdate {
                    server: "app".to_string(),
                    group: "Default".to_string(),
                    property: "content-database".to_string(),
                    value: json!("new"),
                },
            ]
        );
    }

    #[test]
    fn test_quiet_reporter_plans_the_same_actions() {
        let space = space(json!({"databases": [{"name": "other", "forests": ["other-a"]}]})).unwrap();

        let client = Client::with_backend(Box::new(MockBackend::new()));
        let mut silent = ActionList::new(&client, &NoReport);
        space.setup(&mut silent).unwrap();

        let mut logged = ActionList::new(&client, &LogReporter);
        space.setup(&mut logged).unwrap();

        assert_eq!(logged.actions(), silent.actions());
        assert_eq!(logged.len(), 2);
    }

    #[derive(Default)]
    struct Entities(Vec<String>);

    impl Display for Entities {
        fn entity(&mut self, kind: &str, name: &str) {
            self.0.push(format!("{} {}", kind, name));
        }
        fn field(&mut self, _key: &str, _value: &str) {}
        fn list(&mut self, _key: &str, _items: &[String]) {}
    }

    #[test]
    fn test_show_lists_databases_then_servers() {
        let space = space(json!({
            "params": {"@srcdir": "/src/"},
            "servers": [{"name": "app", "content": {"name": "app-content"}}],
            "databases": [{"name": "other"}]
        }))
        .unwrap();

        let mut entities = Entities::default();
        space.show(&mut entities);
        assert_eq!(
            entities.0,
            vec!["database other", "database app-content", "server app"]
        );
    }

    #[test]
    fn test_find_by_id_then_name() {
        let space = space(json!({
            "params": {"@srcdir": "/src/"},
            "databases": [{"id": "content", "name": "app-content"}],
            "servers": [{"id": "app", "name": "my-app", "content": {"idref": "content"}}]
        }))
        .unwrap();
        assert!(space.find_database("content").is_some());
        assert!(space.find_database("app-content").is_some());
        assert!(space.find_database("missing").is_none());
        assert_eq!(space.find_server("app").unwrap().name(), "my-app");
        assert_eq!(space.param("@srcdir"), Some("/src/"));
    }
}
