//! `mlproj new`: scaffold a project.
//!
//! Creates `src/`, `xproject/project.xml` and the four environments
//! `xproject/mlenvs/{base,default,dev,prod}.json`. `default` imports `dev`,
//! `dev` and `prod` import `base`.

use anyhow::{Context as AnyhowContext, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Context;
use crate::cli::NewArgs;
use crate::environ::{PROJECT_FILE, ROOT_KEY};
use crate::paths;
use crate::ui;

/// Format written in new environment files.
const FORMAT: &str = "0.1";

/// Values filled into the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub name: String,
    pub abbrev: String,
    pub title: String,
    pub version: String,
    pub port: String,
}

impl Scaffold {
    /// Fill the blanks of `args`; `abbrev` defaults to the directory name.
    pub fn from_args(args: &NewArgs, dir: &Path) -> Self {
        let abbrev = args.abbrev.clone().unwrap_or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "app".to_string())
        });
        Self {
            name: args
                .name
                .clone()
                .unwrap_or_else(|| format!("http://example.org/{}", abbrev)),
            title: args.title.clone().unwrap_or_else(|| abbrev.clone()),
            version: args.version.clone(),
            port: args.port.to_string(),
            abbrev,
        }
    }

    /// Every file to write, relative to the project directory.
    pub fn files(&self) -> Result<Vec<(PathBuf, String)>> {
        let envs = PathBuf::from(paths::ENVIRONS_DIR);
        Ok(vec![
            (PathBuf::from(PROJECT_FILE), self.project_xml()),
            (envs.join("base.json"), environ(self.base())?),
            (
                envs.join("default.json"),
                environ(json!({"format": FORMAT, "import": "dev.json"}))?,
            ),
            (envs.join("dev.json"), environ(dev())?),
            (envs.join("prod.json"), environ(prod())?),
        ])
    }

    fn project_xml(&self) -> String {
        format!(
            "<project xmlns=\"http://expath.org/ns/project\"\n         name=\"{}\"\n         abbrev=\"{}\"\n         version=\"{}\">\n\n   <title>{}</title>\n\n</project>\n",
            escape_xml(&self.name),
            escape_xml(&self.abbrev),
            escape_xml(&self.version),
            escape_xml(&self.title)
        )
    }

    fn base(&self) -> Value {
        json!({
            "format": FORMAT,
            "params": {"port": self.port},
            "databases": [{"id": "content", "name": "@{code}-content"}],
            "servers": [{
                "id": "app",
                "name": "@{code}",
                "type": "http",
                "port": "${port}",
                "content": {"idref": "content"}
            }]
        })
    }
}

fn dev() -> Value {
    json!({
        "format": FORMAT,
        "import": "base.json",
        "connect": {"host": "localhost", "user": "admin", "password": "admin"}
    })
}

fn prod() -> Value {
    json!({
        "format": FORMAT,
        "import": "base.json",
        "connect": {"host": "prod.server", "user": "admin"},
        "databases": [{"id": "modules", "name": "@{code}-modules"}],
        "servers": [{"id": "app", "modules": {"idref": "modules"}, "root": "/"}]
    })
}

fn environ(body: Value) -> Result<String> {
    let mut doc = serde_json::Map::new();
    doc.insert(ROOT_KEY.to_string(), body);
    let mut text = serde_json::to_string_pretty(&Value::Object(doc))?;
    text.push('\n');
    Ok(text)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

/// Write the project skeleton below `dir`, returning the written files.
///
/// Existing files are only overwritten with `force`; nothing is written
/// when one of them is in the way.
pub fn scaffold(dir: &Path, scaffold: &Scaffold, force: bool) -> Result<Vec<PathBuf>> {
    let files = scaffold.files()?;
    if !force
        && let Some((existing, _)) = files.iter().find(|(rel, _)| dir.join(rel).exists())
    {
        bail!(
            "{} already exists (use --force to overwrite)",
            dir.join(existing).display()
        );
    }

    let src = dir.join("src");
    fs::create_dir_all(&src).with_context(|| format!("Could not create {}", src.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for (rel, content) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Could not write {}", path.display()))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

pub fn run(ctx: &Context, args: NewArgs) -> Result<()> {
    let dir = args
        .dir
        .as_deref()
        .map_or_else(|| ctx.project.clone(), |d| paths::expand(&d.to_string_lossy()));
    fs::create_dir_all(&dir).with_context(|| format!("Could not create {}", dir.display()))?;

    let values = Scaffold::from_args(&args, &dir);
    ui::header(&format!("New project {}", values.abbrev));
    let written = scaffold(&dir, &values, args.force)?;
    for path in &written {
        ui::success(&path.display().to_string());
    }
    println!();
    ui::info("Run `mlproj setup` to create the databases and the server");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::{DEFAULT_ENVIRON, Environ, Source};
    use tempfile::TempDir;

    fn values() -> Scaffold {
        Scaffold {
            name: "http://example.org/demo".to_string(),
            abbrev: "demo".to_string(),
            title: "Demo & co".to_string(),
            version: "0.1.0".to_string(),
            port: "8010".to_string(),
        }
    }

    #[test]
    fn test_scaffold_writes_loadable_environments() {
        let dir = TempDir::new().unwrap();
        let written = scaffold(dir.path(), &values(), false).unwrap();
        assert_eq!(written.len(), 5);
        assert!(dir.path().join("src").is_dir());

        let xml = fs::read_to_string(dir.path().join("xproject/project.xml")).unwrap();
        assert!(xml.contains("abbrev=\"demo\""));
        assert!(xml.contains("<title>Demo &amp; co</title>"));

        // default -> dev -> base
        let env = Environ::load(
            dir.path(),
            &Source::Name(DEFAULT_ENVIRON.to_string()),
            &[],
        )
        .unwrap();
        assert_eq!(env.code, "demo");
        let space = env.build_space().unwrap();
        let server = space.find_server("app").unwrap();
        assert_eq!(server.content().name, "demo-content");
        assert_eq!(
            server.properties().get("port").unwrap().value(),
            &reconcile::PropValue::Integer(8010)
        );

        let prod = Environ::load(dir.path(), &Source::Name("prod".to_string()), &[]).unwrap();
        let space = prod.build_space().unwrap();
        let server = space.find_server("app").unwrap();
        assert_eq!(server.modules().unwrap().name, "demo-modules");
        assert!(prod.connect.get("password").is_none());
    }

    #[test]
    fn test_scaffold_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("xproject/mlenvs")).unwrap();
        fs::write(dir.path().join("xproject/mlenvs/dev.json"), "keep").unwrap();

        let err = scaffold(dir.path(), &values(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            fs::read_to_string(dir.path().join("xproject/mlenvs/dev.json")).unwrap(),
            "keep"
        );
        assert!(!dir.path().join("xproject/project.xml").exists());

        scaffold(dir.path(), &values(), true).unwrap();
        let dev = fs::read_to_string(dir.path().join("xproject/mlenvs/dev.json")).unwrap();
        assert!(dev.contains("\"import\": \"base.json\""));
    }

    #[test]
    fn test_defaults_from_directory() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("my-app");
        fs::create_dir_all(&project).unwrap();

        let args = NewArgs {
            dir: None,
            force: false,
            name: None,
            abbrev: None,
            title: None,
            version: "1.0.0".to_string(),
            port: 8080,
        };
        let values = Scaffold::from_args(&args, &project);
        assert_eq!(values.abbrev, "my-app");
        assert_eq!(values.name, "http://example.org/my-app");
        assert_eq!(values.title, "my-app");
        assert_eq!(values.port, "8080");
    }
}
