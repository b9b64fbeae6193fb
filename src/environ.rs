//! Environment files
//!
//! An environment lives in `xproject/mlenvs/<name>.json` (or `.toml`) with
//! a single root object `mlproj`:
//!
//! ```json
//! {
//!     "mlproj": {
//!         "format": "0.1",
//!         "import": "base.json",
//!         "params": { "port": "8010" },
//!         "connect": { "host": "localhost", "user": "admin" },
//!         "databases": [{ "id": "content", "name": "@{code}-content" }],
//!         "servers": [{ "id": "app", "name": "@{code}", "port": "${port}",
//!                       "content": { "idref": "content" } }]
//!     }
//! }
//! ```
//!
//! Loading resolves `import` chains, merges them (the importing file wins),
//! then substitutes `${param}` and `@{builtin}` references in every string.

use anyhow::{Context, Result};
use manage::ConnectInfo;
use reconcile::{Space, SpaceDef};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::settings::ConnectDefaults;

/// Root key of an environment file.
pub const ROOT_KEY: &str = "mlproj";

/// Environment used when none is given.
pub const DEFAULT_ENVIRON: &str = "default";

static PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([$@])\{([^}]*)\}").expect("param regex"));

static ABBREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\babbrev\s*=\s*"([^"]*)""#).expect("abbrev regex"));

/// Project descriptor written by `mlproj new`.
pub const PROJECT_FILE: &str = "xproject/project.xml";

/// Environment loading errors.
#[derive(Debug, thiserror::Error)]
pub enum EnvironError {
    #[error("no environment '{name}' in {} (looked for .json and .toml)", .dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("unsupported environment file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{}: missing root object 'mlproj'", .0.display())]
    MissingRoot(PathBuf),

    #[error("{}: '{key}' must be {expected}", .path.display())]
    InvalidKey {
        path: PathBuf,
        key: String,
        expected: String,
    },

    #[error("import cycle: {0}")]
    ImportCycle(String),

    #[error("unknown parameter '{sigil}{{{name}}}' in \"{text}\"")]
    UnknownParam {
        sigil: char,
        name: String,
        text: String,
    },

    #[error("invalid parameter '{0}', expected name=value")]
    InvalidOverride(String),

    #[error("missing connection setting '{0}' (set it in the environment or config.toml)")]
    MissingConnect(String),
}

/// Where the environment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A named environment of the project.
    Name(String),
    /// An explicit file.
    File(PathBuf),
}

/// A loaded, merged and substituted environment.
#[derive(Debug, Clone)]
pub struct Environ {
    /// File the environment was loaded from.
    pub path: PathBuf,
    /// Project directory.
    pub project: PathBuf,
    /// Value of `@code`.
    pub code: String,
    /// Value of `@srcdir`, if any.
    pub srcdir: Option<String>,
    /// User parameters, after overrides.
    pub params: BTreeMap<String, String>,
    /// Connection settings from the environment.
    pub connect: Map<String, Value>,
    /// Database and server definitions.
    pub space: SpaceDef,
}

/// Find the file of a named environment.
pub fn locate(project: &Path, name: &str) -> Result<PathBuf> {
    let dir = crate::paths::environs_dir(project);
    for ext in ["json", "toml"] {
        let path = dir.join(format!("{}.{}", name, ext));
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(EnvironError::NotFound {
        name: name.to_string(),
        dir,
    }
    .into())
}

/// Parse `name=value` overrides.
/// The `abbrev` attribute of the project descriptor, if any.
pub fn project_abbrev(project: &Path) -> Option<String> {
    let text = fs::read_to_string(project.join(PROJECT_FILE)).ok()?;
    let abbrev = ABBREV_RE.captures(&text)?.get(1)?.as_str().trim();
    (!abbrev.is_empty()).then(|| abbrev.to_string())
}

pub fn parse_overrides(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| EnvironError::InvalidOverride(item.clone()).into())
        })
        .collect()
}

/// Read one file and return its `mlproj` object.
fn read_file(path: &Path) -> Result<Map<String, Value>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let doc: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?,
        _ => return Err(EnvironError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    match doc {
        Value::Object(mut root) => match root.remove(ROOT_KEY) {
            Some(Value::Object(obj)) => Ok(obj),
            _ => Err(EnvironError::MissingRoot(path.to_path_buf()).into()),
        },
        _ => Err(EnvironError::MissingRoot(path.to_path_buf()).into()),
    }
}

/// Read a file and everything it imports, merged.
fn load_chain(path: &Path, stack: &mut Vec<PathBuf>) -> Result<Map<String, Value>> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Could not read {}", path.display()))?;
    if stack.contains(&canonical) {
        let chain: Vec<String> = stack
            .iter()
            .chain(std::iter::once(&canonical))
            .map(|p| p.display().to_string())
            .collect();
        return Err(EnvironError::ImportCycle(chain.join(" -> ")).into());
    }
    stack.push(canonical);

    let mut doc = read_file(path)?;
    let merged = match doc.remove("import") {
        None => doc,
        Some(Value::String(import)) => {
            let base_path = path.parent().unwrap_or(Path::new(".")).join(&import);
            log::debug!("{} imports {}", path.display(), base_path.display());
            let base = load_chain(&base_path, stack)?;
            merge(base, doc)
        }
        Some(_) => {
            return Err(EnvironError::InvalidKey {
                path: path.to_path_buf(),
                key: "import".to_string(),
                expected: "a file name".to_string(),
            }
            .into());
        }
    };

    stack.pop();
    Ok(merged)
}

/// Merge an importing document over its base.
///
/// `params` and `connect` merge key by key, `databases` and `servers` merge
/// by `id` and append the rest, other keys are replaced.
pub fn merge(mut base: Map<String, Value>, over: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in over {
        let merged = match (key.as_str(), base.remove(&key), value) {
            ("params" | "connect", Some(Value::Object(mut old)), Value::Object(new)) => {
                old.extend(new);
                Value::Object(old)
            }
            ("databases" | "servers", Some(Value::Array(old)), Value::Array(new)) => {
                Value::Array(merge_by_id(old, new))
            }
            (_, _, value) => value,
        };
        base.insert(key, merged);
    }
    base
}

fn merge_by_id(mut base: Vec<Value>, over: Vec<Value>) -> Vec<Value> {
    for item in over {
        let id = item.get("id").and_then(Value::as_str).map(ToString::to_string);
        let existing = id.and_then(|id| {
            base.iter()
                .position(|b| b.get("id").and_then(Value::as_str) == Some(id.as_str()))
        });
        match existing {
            Some(idx) => deep_merge(&mut base[idx], item),
            None => base.push(item),
        }
    }
    base
}

fn deep_merge(target: &mut Value, over: Value) {
    match (target, over) {
        (Value::Object(target), Value::Object(over)) => {
            for (key, value) in over {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, over) => *target = over,
    }
}

/// Parameter values for substitution.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// `${name}` values.
    pub user: BTreeMap<String, String>,
    /// `@{name}` values (`code`, `srcdir`).
    pub builtin: BTreeMap<String, String>,
}

impl Params {
    /// Replace every `${name}` and `@{name}` in `text`.
    pub fn substitute(&self, text: &str) -> Result<String, EnvironError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in PARAM_RE.captures_iter(text) {
            let (Some(whole), Some(sigil), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let table = if sigil.as_str() == "$" {
                &self.user
            } else {
                &self.builtin
            };
            let value = table
                .get(name.as_str())
                .ok_or_else(|| EnvironError::UnknownParam {
                    sigil: if sigil.as_str() == "$" { '$' } else { '@' },
                    name: name.as_str().to_string(),
                    text: text.to_string(),
                })?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Add user parameters whose values may reference each other.
    ///
    /// Runs substitution passes until every value is resolved; what is left
    /// after a pass without progress refers to an unknown name or a cycle.
    pub fn resolve(&mut self, mut pending: BTreeMap<String, String>) -> Result<(), EnvironError> {
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|name, text| match self.substitute(text) {
                Ok(value) => {
                    self.user.insert(name.clone(), value);
                    false
                }
                Err(_) => true,
            });
            if pending.len() == before {
                break;
            }
        }
        match pending.into_iter().next() {
            None => Ok(()),
            Some((name, text)) => Err(EnvironError::UnknownParam {
                sigil: '$',
                name: self.first_unresolved(&text).unwrap_or(name),
                text,
            }),
        }
    }

    /// First `${name}` of `text` without a resolved value.
    fn first_unresolved(&self, text: &str) -> Option<String> {
        PARAM_RE
            .captures_iter(text)
            .filter(|caps| caps.get(1).is_some_and(|s| s.as_str() == "$"))
            .filter_map(|caps| caps.get(2))
            .map(|name| name.as_str().to_string())
            .find(|name| !self.user.contains_key(name))
    }

    /// Substitute in every string of a JSON value.
    pub fn substitute_value(&self, value: &mut Value) -> Result<(), EnvironError> {
        match value {
            Value::String(s) => *s = self.substitute(s)?,
            Value::Array(items) => {
                for item in items {
                    self.substitute_value(item)?;
                }
            }
            Value::Object(obj) => {
                for item in obj.values_mut() {
                    self.substitute_value(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn object(doc: &mut Map<String, Value>, key: &str, path: &Path) -> Result<Map<String, Value>> {
    match doc.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(obj)) => Ok(obj),
        Some(_) => Err(EnvironError::InvalidKey {
            path: path.to_path_buf(),
            key: key.to_string(),
            expected: "an object".to_string(),
        }
        .into()),
    }
}

fn array(doc: &mut Map<String, Value>, key: &str, path: &Path) -> Result<Value> {
    match doc.remove(key) {
        None | Some(Value::Null) => Ok(Value::Array(Vec::new())),
        Some(value @ Value::Array(_)) => Ok(value),
        Some(_) => Err(EnvironError::InvalidKey {
            path: path.to_path_buf(),
            key: key.to_string(),
            expected: "a list".to_string(),
        }
        .into()),
    }
}

impl Environ {
    /// Load an environment of `project`.
    pub fn load(project: &Path, source: &Source, overrides: &[(String, String)]) -> Result<Self> {
        let path = match source {
            Source::Name(name) => locate(project, name)?,
            Source::File(file) => project.join(file),
        };
        log::info!("Loading environment {}", path.display());

        let mut doc = load_chain(&path, &mut Vec::new())?;

        let mut params = Params::default();
        let code = match doc.remove("code") {
            Some(Value::String(code)) => code,
            _ => project_abbrev(project)
                .or_else(|| {
                    project
                        .canonicalize()
                        .ok()
                        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                })
                .unwrap_or_else(|| "mlproj".to_string()),
        };
        params.builtin.insert("code".to_string(), code.clone());
        let src = project.join("src");
        let srcdir = src
            .is_dir()
            .then(|| src.canonicalize().unwrap_or(src))
            .map(|dir| format!("{}/", dir.display()));
        if let Some(dir) = &srcdir {
            params.builtin.insert("srcdir".to_string(), dir.clone());
        }

        let mut pending = BTreeMap::new();
        for (name, value) in object(&mut doc, "params", &path)? {
            let text = scalar(&value).ok_or_else(|| EnvironError::InvalidKey {
                path: path.clone(),
                key: format!("params.{}", name),
                expected: "a scalar".to_string(),
            })?;
            pending.insert(name, text);
        }
        pending.extend(overrides.iter().cloned());
        params.resolve(pending)?;

        let mut connect = Value::Object(object(&mut doc, "connect", &path)?);
        params.substitute_value(&mut connect)?;
        let mut databases = array(&mut doc, "databases", &path)?;
        params.substitute_value(&mut databases)?;
        let mut servers = array(&mut doc, "servers", &path)?;
        params.substitute_value(&mut servers)?;

        let mut space_params = BTreeMap::new();
        for (name, value) in &params.builtin {
            space_params.insert(format!("@{}", name), value.clone());
        }
        space_params.extend(params.user.clone());

        let space = SpaceDef {
            params: space_params,
            databases: serde_json::from_value(databases)
                .with_context(|| format!("Invalid databases in {}", path.display()))?,
            servers: serde_json::from_value(servers)
                .with_context(|| format!("Invalid servers in {}", path.display()))?,
        };

        Ok(Self {
            path,
            project: project.to_path_buf(),
            code,
            srcdir,
            params: params.user,
            connect: match connect {
                Value::Object(obj) => obj,
                _ => Map::new(),
            },
            space,
        })
    }

    /// Build the entity model.
    pub fn build_space(&self) -> Result<Space> {
        Space::build(self.space.clone())
            .with_context(|| format!("Invalid environment {}", self.path.display()))
    }

    /// Connection settings: user defaults, overridden by the environment.
    ///
    /// The password may come back empty; the caller prompts for it.
    pub fn connect_info(&self, defaults: &ConnectDefaults) -> Result<ConnectInfo> {
        let mut merged = defaults.to_map();
        merged.extend(self.connect.clone());
        // ports given as strings, e.g. from parameters
        for key in ["manage-port", "rest-port"] {
            if let Some(Value::String(s)) = merged.get(key) {
                let port: u16 = s
                    .parse()
                    .with_context(|| format!("Invalid connect.{}: {}", key, s))?;
                merged.insert(key.to_string(), Value::from(port));
            }
        }
        if !merged.contains_key("host") {
            merged.insert("host".to_string(), Value::from("localhost"));
        }
        if !merged.contains_key("user") {
            return Err(EnvironError::MissingConnect("user".to_string()).into());
        }
        serde_json::from_value(Value::Object(merged)).context("Invalid connect settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("xproject/mlenvs")).unwrap();
        dir
    }

    fn write_env(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join("xproject/mlenvs").join(name), content).unwrap();
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(obj) => obj,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_merge_rules() {
        let base = as_map(json!({
            "params": {"a": "1", "b": "2"},
            "databases": [{"id": "content", "name": "c", "forests": 1}],
            "servers": [{"id": "app", "name": "app"}],
            "code": "base"
        }));
        let over = as_map(json!({
            "params": {"b": "3"},
            "databases": [{"id": "content", "forests": 2}, {"id": "modules", "name": "m"}],
            "code": "over"
        }));
        let merged = merge(base, over);
        assert_eq!(merged["params"], json!({"a": "1", "b": "3"}));
        assert_eq!(
            merged["databases"],
            json!([
                {"id": "content", "name": "c", "forests": 2},
                {"id": "modules", "name": "m"}
            ])
        );
        assert_eq!(merged["servers"], json!([{"id": "app", "name": "app"}]));
        assert_eq!(merged["code"], json!("over"));
    }

    #[test]
    fn test_substitute() {
        let mut params = Params::default();
        params.user.insert("port".to_string(), "8010".to_string());
        params.builtin.insert("code".to_string(), "app".to_string());

        assert_eq!(params.substitute("${port}").unwrap(), "8010");
        assert_eq!(params.substitute("@{code}-content").unwrap(), "app-content");
        assert_eq!(params.substitute("plain").unwrap(), "plain");
        assert_eq!(
            params.substitute("@{code}:${port}/@{code}").unwrap(),
            "app:8010/app"
        );

        let err = params.substitute("${nope}").unwrap_err();
        assert!(matches!(err, EnvironError::UnknownParam { sigil: '$', .. }));
        assert!(params.substitute("@{port}").is_err());
    }

    #[test]
    fn test_resolve_params_in_any_order() {
        let mut params = Params::default();
        let mut pending = BTreeMap::new();
        pending.insert("a-url".to_string(), "http://${host}:${port}".to_string());
        pending.insert("host".to_string(), "dev".to_string());
        pending.insert("port".to_string(), "8010".to_string());
        params.resolve(pending).unwrap();
        assert_eq!(params.user["a-url"], "http://dev:8010");

        let mut cycle = BTreeMap::new();
        cycle.insert("x".to_string(), "${y}".to_string());
        cycle.insert("y".to_string(), "${x}".to_string());
        let err = Params::default().resolve(cycle).unwrap_err();
        assert!(matches!(err, EnvironError::UnknownParam { .. }));
    }

    #[test]
    fn test_override_reaches_dependent_params() {
        let dir = project();
        write_env(
            &dir,
            "default.json",
            r#"{"mlproj": {
                "params": {"host": "dev", "url": "http://${host}"},
                "databases": [{"name": "${url}", "forests": 0}]
            }}"#,
        );

        let env = Environ::load(
            dir.path(),
            &Source::Name(DEFAULT_ENVIRON.to_string()),
            &[("host".to_string(), "prod".to_string())],
        )
        .unwrap();
        assert_eq!(env.params["host"], "prod");
        assert_eq!(env.params["url"], "http://prod");
        assert_eq!(env.space.databases[0].name.as_deref(), Some("http://prod"));
    }

    #[test]
    fn test_parse_overrides() {
        let parsed = parse_overrides(&["port=8020".to_string(), "x=a=b".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("port".to_string(), "8020".to_string()),
                ("x".to_string(), "a=b".to_string())
            ]
        );
        assert!(parse_overrides(&["novalue".to_string()]).is_err());
        assert!(parse_overrides(&["=v".to_string()]).is_err());
    }

    #[test]
    fn test_load_with_import_and_params() {
        let dir = project();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        write_env(
            &dir,
            "base.json",
            r#"{"mlproj": {
                "format": "0.1",
                "code": "demo",
                "params": {"port": "8010"},
                "databases": [{"id": "content", "name": "@{code}-content"}],
                "servers": [{"id": "app", "name": "@{code}", "port": "${port}",
                             "content": {"idref": "content"}}]
            }}"#,
        );
        write_env(
            &dir,
            "dev.toml",
            r#"
[mlproj]
import = "base.json"

[mlproj.connect]
host = "localhost"
user = "admin"
password = "admin"

[[mlproj.databases]]
id = "content"
forests = 3
"#,
        );

        let env = Environ::load(
            dir.path(),
            &Source::Name("dev".to_string()),
            &[("port".to_string(), "8020".to_string())],
        )
        .unwrap();
        assert_eq!(env.code, "demo");
        assert_eq!(env.params["port"], "8020");
        assert!(env.srcdir.as_deref().unwrap().ends_with("src/"));

        let space = env.build_space().unwrap();
        let db = space.find_database("content").unwrap();
        assert_eq!(reconcile::Component::name(db), "demo-content");
        assert_eq!(db.forests().len(), 3);
        let srv = space.find_server("app").unwrap();
        assert_eq!(
            srv.properties().get("port").unwrap().value(),
            &reconcile::PropValue::Integer(8020)
        );
        assert!(srv.properties().get("root").is_some());

        let connect = env.connect_info(&ConnectDefaults::default()).unwrap();
        assert_eq!(connect.user, "admin");
        assert_eq!(connect.manage_port, 8002);
    }

    #[test]
    fn test_import_cycle() {
        let dir = project();
        write_env(&dir, "a.json", r#"{"mlproj": {"import": "b.json"}}"#);
        write_env(&dir, "b.json", r#"{"mlproj": {"import": "a.json"}}"#);

        let err = Environ::load(dir.path(), &Source::Name("a".to_string()), &[]).unwrap_err();
        assert!(err.to_string().starts_with("import cycle"));
    }

    #[test]
    fn test_missing_environ_and_root() {
        let dir = project();
        let err = Environ::load(dir.path(), &Source::Name("prod".to_string()), &[]).unwrap_err();
        assert!(err.to_string().contains("no environment 'prod'"));

        write_env(&dir, "bad.json", r#"{"other": {}}"#);
        let err = Environ::load(dir.path(), &Source::Name("bad".to_string()), &[]).unwrap_err();
        assert!(err.to_string().contains("missing root object"));
    }

    #[test]
    fn test_explicit_file_and_default_code() {
        let dir = project();
        let file = dir.path().join("custom.json");
        fs::write(&file, r#"{"mlproj": {"databases": [{"name": "x", "forests": 0}]}}"#).unwrap();

        let env = Environ::load(dir.path(), &Source::File(file), &[]).unwrap();
        let expected = dir
            .path()
            .canonicalize()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(env.code, expected);
        assert!(env.srcdir.is_none());
        assert_eq!(env.space.databases.len(), 1);
    }

    #[test]
    fn test_code_from_project_descriptor() {
        let dir = project();
        write_env(&dir, "default.json", r#"{"mlproj": {"databases": [{"name": "@{code}-content"}]}}"#);
        fs::write(
            dir.path().join(PROJECT_FILE),
            "<project xmlns=\"http://expath.org/ns/project\"\n  name=\"http://example.org/x\"\n  abbrev=\"shop\">\n</project>\n",
        )
        .unwrap();
        assert_eq!(project_abbrev(dir.path()).as_deref(), Some("shop"));

        let env = Environ::load(dir.path(), &Source::Name(DEFAULT_ENVIRON.to_string()), &[]).unwrap();
        assert_eq!(env.code, "shop");

        // an explicit code still wins
        write_env(&dir, "other.json", r#"{"mlproj": {"code": "mine"}}"#);
        let env = Environ::load(dir.path(), &Source::Name("other".to_string()), &[]).unwrap();
        assert_eq!(env.code, "mine");
    }

    #[test]
    fn test_connect_defaults_and_errors() {
        let dir = project();
        write_env(
            &dir,
            "default.json",
            r#"{"mlproj": {"connect": {"host": "ml", "manage-port": "18002"}}}"#,
        );
        let env = Environ::load(
            dir.path(),
            &Source::Name(DEFAULT_ENVIRON.to_string()),
            &[],
        )
        .unwrap();

        let err = env.connect_info(&ConnectDefaults::default()).unwrap_err();
        assert!(err.to_string().contains("'user'"));

        let defaults = ConnectDefaults {
            user: Some("admin".to_string()),
            host: Some("ignored".to_string()),
            ..Default::default()
        };
        let connect = env.connect_info(&defaults).unwrap();
        assert_eq!(connect.host, "ml");
        assert_eq!(connect.manage_port, 18002);
        assert!(connect.password.is_empty());
    }
}
