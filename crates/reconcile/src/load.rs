//! Resolution of `load` and `deploy` arguments.
//!
//! Both commands insert files as documents into one database. They only
//! differ in their defaults: `deploy` targets the modules database of the
//! server and the source directory, `load` the content database and the
//! `data` directory.

use crate::action::{Action, ActionList};
use crate::component::{Component, SysDatabase, Target};
use crate::error::ConfigError;
use crate::space::{DbLink, Space};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, ConfigError>;

/// Which command is resolving its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Documents into the content database.
    Load,
    /// Code into the modules database.
    Deploy,
}

impl Mode {
    fn server_link(&self) -> &'static str {
        match self {
            Self::Load => "content",
            Self::Deploy => "modules",
        }
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::Load => "data",
            Self::Deploy => "src",
        }
    }
}

/// Explicit target options; at most one may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// `--db`: a database of the environment, by id or name.
    pub database: Option<String>,
    /// `--as`: a server, whose content or modules database is used.
    pub server: Option<String>,
    /// `--sys`: a database outside the environment, by name.
    pub system: Option<String>,
}

/// Explicit content options; at most one may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentArgs {
    /// Positional `what`, used when no option is given.
    pub what: Option<String>,
    /// `--src`: a named source set (only `src` exists).
    pub sourceset: Option<String>,
    /// `--dir`: a directory.
    pub directory: Option<String>,
    /// `--doc`: a single file.
    pub document: Option<String>,
}

/// What gets inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Every file below a directory.
    Directory(PathBuf),
    /// A single file, with its URI.
    Document {
        /// Local file.
        path: PathBuf,
        /// Document URI.
        uri: String,
    },
}

/// Resolve the database documents go to.
pub fn resolve_target(space: &Space, mode: Mode, args: &TargetArgs) -> Result<Target> {
    let given = [&args.database, &args.server, &args.system]
        .iter()
        .filter(|a| a.is_some())
        .count();
    if given > 1 {
        return Err(ConfigError::ConflictingTargets);
    }

    if let Some(key) = &args.system {
        return Ok(Target::System(SysDatabase::new(key.as_str())));
    }
    if let Some(key) = &args.database {
        let db = space
            .find_database(key)
            .ok_or_else(|| ConfigError::UnknownDatabase { key: key.clone() })?;
        return Ok(Target::Database(DbLink {
            id: db.handle(),
            name: db.name().to_string(),
        }));
    }

    let server = match &args.server {
        Some(key) => space
            .find_server(key)
            .ok_or_else(|| ConfigError::UnknownServer { key: key.clone() })?,
        None => match space.servers() {
            [single] => single,
            _ if mode == Mode::Deploy => {
                return Err(ConfigError::NoDefaultTarget {
                    expected: "server".to_string(),
                });
            }
            _ => match space.databases() {
                [single] => {
                    return Ok(Target::Database(DbLink {
                        id: single.handle(),
                        name: single.name().to_string(),
                    }));
                }
                _ => {
                    return Err(ConfigError::NoDefaultTarget {
                        expected: "server or database".to_string(),
                    });
                }
            },
        },
    };

    let link = match mode {
        Mode::Load => Some(server.content()),
        Mode::Deploy => server.modules(),
    };
    link.cloned()
        .map(Target::Database)
        .ok_or_else(|| ConfigError::ServerWithoutDatabase {
            server: server.name().to_string(),
            link: mode.server_link().to_string(),
        })
}

/// Resolve what gets inserted. Relative paths are taken from `base`.
pub fn resolve_content(space: &Space, mode: Mode, args: &ContentArgs, base: &Path) -> Result<Content> {
    let given = [&args.sourceset, &args.directory, &args.document]
        .iter()
        .filter(|a| a.is_some())
        .count();
    if given > 1 {
        return Err(ConfigError::ConflictingContent);
    }

    if let Some(doc) = &args.document {
        return Ok(Content::Document {
            path: base.join(doc),
            uri: document_uri(doc)?,
        });
    }

    let (sourceset, directory) = match (&args.sourceset, &args.directory) {
        (None, None) => {
            let what = args.what.as_deref().unwrap_or(mode.default_content());
            if what == "src" && space.param("@srcdir").is_some() {
                (Some(what.to_string()), None)
            } else {
                (None, Some(what.to_string()))
            }
        }
        (src, dir) => (src.clone(), dir.clone()),
    };

    if let Some(name) = sourceset {
        if name != "src" {
            return Err(ConfigError::UnknownSourceSet { name });
        }
        let dir = space
            .param("@srcdir")
            .ok_or_else(|| ConfigError::UnknownSourceSet { name })?;
        return Ok(Content::Directory(base.join(dir)));
    }

    // `directory` is always set when no source set is
    Ok(Content::Directory(base.join(directory.unwrap_or_default())))
}

/// URI of a single document: its path from the first `/`.
pub fn document_uri(path: &str) -> Result<String> {
    path.find('/')
        .map(|idx| path[idx..].to_string())
        .ok_or_else(|| ConfigError::DocumentWithoutParent {
            path: path.to_string(),
        })
}

/// URI of a file found below `dir`: its relative path, rooted at `/`.
pub fn file_uri(dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}", parts.join("/")))
}

/// Queue one insert per `(path, uri)` into `target`.
pub fn insert_documents(actions: &mut ActionList<'_>, target: &Target, documents: Vec<(PathBuf, String)>) {
    for (path, uri) in documents {
        actions.reporter().add(0, "insert", "document", Some(&uri));
        actions.add(Action::DocInsert {
            database: target.name().to_string(),
            uri,
            path,
        });
    }
}
