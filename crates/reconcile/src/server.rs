//! App servers

use crate::action::{Action, ActionList, Read};
use crate::component::Component;
use crate::context::Display;
use crate::definition::ServerDef;
use crate::error::{ConfigError, Result};
use crate::property::{Owner, PropValue, Properties, Property, SERVER_PROPERTIES, find_spec};
use crate::space::DbLink;
use serde_json::{Map, Value};

/// Group used when a server does not name one.
pub const DEFAULT_GROUP: &str = "Default";

/// Server type shown in progress messages when none is configured.
pub const DEFAULT_SERVER_TYPE: &str = "http";

/// An app server.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    id: Option<String>,
    name: String,
    group: String,
    content: DbLink,
    modules: Option<DbLink>,
    props: Properties,
}

impl Server {
    /// Build a server from its definition and resolved links.
    ///
    /// Without modules database nor explicit `root`, the server serves its
    /// code from `srcdir`, which must then be known.
    pub fn new(
        def: &ServerDef,
        content: Option<DbLink>,
        modules: Option<DbLink>,
        srcdir: Option<&str>,
    ) -> std::result::Result<Self, ConfigError> {
        let name = def.name.clone().ok_or_else(|| ConfigError::MissingName {
            kind: "server".to_string(),
            id: def.id.clone(),
        })?;
        let content = content.ok_or_else(|| ConfigError::MissingContent {
            server: name.clone(),
        })?;
        let mut props = Properties::parse(SERVER_PROPERTIES, &def.properties, &name)?;

        if modules.is_none() && props.get("root").is_none() {
            let dir = srcdir.ok_or_else(|| ConfigError::MissingSrcDir {
                server: name.clone(),
            })?;
            if let Some(spec) = find_spec(SERVER_PROPERTIES, "root") {
                props.insert(Property::new(spec, PropValue::String(dir.to_string())));
            }
        }

        Ok(Self {
            id: def.id.clone(),
            name,
            group: def.group.clone().unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            content,
            modules,
            props,
        })
    }

    /// Configured id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Group the server belongs to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Content database link.
    pub fn content(&self) -> &DbLink {
        &self.content
    }

    /// Modules database link.
    pub fn modules(&self) -> Option<&DbLink> {
        self.modules.as_ref()
    }

    /// Configured properties, including a defaulted `root`.
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    /// Server type (`http`, `xdbc`...), for messages.
    pub fn server_type(&self) -> String {
        self.props
            .get("type")
            .map(|p| p.value().to_string())
            .unwrap_or_else(|| DEFAULT_SERVER_TYPE.to_string())
    }

    fn owner(&self) -> Owner<'_> {
        Owner::Server {
            name: &self.name,
            group: &self.group,
        }
    }

    /// Queue the creation of the server.
    pub fn create(&self, actions: &mut ActionList<'_>) {
        actions.reporter().add(0, "create", "server", Some(&self.name));

        let mut payload = Map::new();
        payload.insert("server-name".to_string(), Value::from(self.name.as_str()));
        payload.insert(
            "content-database".to_string(),
            Value::from(self.content.name.as_str()),
        );
        if let Some(modules) = &self.modules {
            payload.insert(
                "modules-database".to_string(),
                Value::from(modules.name.as_str()),
            );
        }
        self.props.create(&mut payload);

        actions.add(Action::ServerCreate {
            name: self.name.clone(),
            group: self.group.clone(),
            payload,
        });
    }

    /// Queue the corrections bringing an existing server in line.
    pub fn update(&self, actions: &mut ActionList<'_>, actual: &Value) {
        let content = actual.get("content-database").and_then(Value::as_str);
        if content != Some(self.content.name.as_str()) {
            actions.reporter().add(0, "update", "content-database", None);
            actions.add(
                self.owner()
                    .update("content-database", Value::from(self.content.name.as_str())),
            );
        }

        let current = actual
            .get("modules-database")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty());
        let desired = self.modules.as_ref().map(|m| m.name.as_str());
        if current != desired {
            actions.reporter().add(0, "update", "modules-database", None);
            actions.add(
                self.owner()
                    .update("modules-database", desired.map_or(Value::Null, Value::from)),
            );
        }

        actions.reporter().check(1, "properties", None);
        self.props.update(actions, actual, self.owner());
    }
}

impl Component for Server {
    fn kind(&self) -> &'static str {
        "server"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn show(&self, display: &mut dyn Display) {
        display.entity(self.kind(), &self.name);
        if let Some(id) = &self.id {
            display.field("id", id);
        }
        display.field("group", &self.group);
        display.field("content", &self.content.name);
        if let Some(modules) = &self.modules {
            display.field("modules", &modules.name);
        }
        for prop in self.props.iter() {
            display.field(prop.field(), &prop.value().to_string());
        }
    }

    fn setup(&self, actions: &mut ActionList<'_>) -> Result<()> {
        let what = format!("the {} server", self.server_type());
        actions.reporter().check(0, &what, Some(&self.name));
        let body = actions.read(Read::ServerProps {
            name: &self.name,
            group: &self.group,
        })?;

        match body {
            None => self.create(actions),
            Some(body) => self.update(actions, &body),
        }
        Ok(())
    }
}
