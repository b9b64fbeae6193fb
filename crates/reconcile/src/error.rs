//! Error types for reconciliation.

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors, raised while building the space.
///
/// These are fatal to the current command and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Forest count below zero.
    #[error("negative number of forests ({count}) on database {database}")]
    NegativeForests {
        /// Configured count.
        count: i64,
        /// Database id or name.
        database: String,
    },

    /// Forest count above the supported maximum.
    #[error("number of forests greater than {max} ({count}) on database {database}")]
    TooManyForests {
        /// Configured count.
        count: i64,
        /// Supported maximum.
        max: i64,
        /// Database id or name.
        database: String,
    },

    /// `forests` is neither a count nor a list of names.
    #[error("invalid forests on database {database}: expected a number or a list of names")]
    InvalidForests {
        /// Database id or name.
        database: String,
    },

    /// Server without modules database nor root, and no `@srcdir`.
    #[error("no @srcdir for the root of the server: {server}")]
    MissingSrcDir {
        /// Server name.
        server: String,
    },

    /// Server without content database.
    #[error("no content database for the server: {server}")]
    MissingContent {
        /// Server name.
        server: String,
    },

    /// Reference to a database that is not in the configuration.
    #[error("{owner}: cannot resolve {link} database reference '{target}'")]
    UnresolvedReference {
        /// Entity holding the reference.
        owner: String,
        /// Link name (schema, content...).
        link: String,
        /// Referenced id or name.
        target: String,
    },

    /// `"self"` used where it is meaningless (on a server).
    #[error("{owner}: '{link}' cannot reference 'self'")]
    InvalidSelfReference {
        /// Entity holding the reference.
        owner: String,
        /// Link name.
        link: String,
    },

    /// Two databases with the same id or name, or two servers with the same name.
    #[error("duplicate {kind} {key}")]
    Duplicate {
        /// Entity kind.
        kind: String,
        /// Duplicated id or name.
        key: String,
    },

    /// A configured property has the wrong type.
    #[error("invalid value for property {property} on {owner}: expected {expected}")]
    InvalidProperty {
        /// Entity holding the property.
        owner: String,
        /// Property configuration key.
        property: String,
        /// Expected kind.
        expected: String,
    },

    /// A database or server definition without name.
    #[error("{kind} without name{}", .id.as_deref().map(|id| format!(" (id: {})", id)).unwrap_or_default())]
    MissingName {
        /// Entity kind.
        kind: String,
        /// Entity id, if any.
        id: Option<String>,
    },

    /// More than one of `--db`, `--as` and `--sys`.
    #[error("target options --db, --as and --sys are mutually exclusive")]
    ConflictingTargets,

    /// No explicit target and no obvious default.
    #[error("not exactly one {expected} in the environ")]
    NoDefaultTarget {
        /// What would have been the default ("server", "server or database").
        expected: String,
    },

    /// `--db` names no database of the environment.
    #[error("no database with id or name '{key}'")]
    UnknownDatabase {
        /// Id or name given.
        key: String,
    },

    /// `--as` names no server of the environment.
    #[error("no server with id or name '{key}'")]
    UnknownServer {
        /// Id or name given.
        key: String,
    },

    /// The target server has no database of the needed kind.
    #[error("server {server} has no {link} database")]
    ServerWithoutDatabase {
        /// Server name.
        server: String,
        /// "content" or "modules".
        link: String,
    },

    /// More than one of `--src`, `--dir` and `--doc`.
    #[error("content options --src, --dir and --doc are mutually exclusive")]
    ConflictingContent,

    /// A source set other than `src`, or `src` without `@srcdir`.
    #[error("unknown source set '{name}' (only \"src\" is supported, and needs @srcdir)")]
    UnknownSourceSet {
        /// Source set name.
        name: String,
    },

    /// `--doc` path without any `/`.
    #[error("path of a single document must contain at least one parent dir: {path}")]
    DocumentWithoutParent {
        /// Path given.
        path: String,
    },
}

/// Errors that can occur while planning or executing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A read during planning failed.
    #[error(transparent)]
    Remote(#[from] manage::Error),

    /// A queued action failed during execution.
    #[error("failed to {action}: {source}")]
    Execute {
        /// Description of the failed action.
        action: String,
        /// Number of actions that succeeded before this one.
        completed: usize,
        /// Underlying error.
        #[source]
        source: manage::Error,
    },
}

impl Error {
    /// The underlying management error, if any.
    pub fn remote(&self) -> Option<&manage::Error> {
        match self {
            Self::Config(_) => None,
            Self::Remote(err) | Self::Execute { source: err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_count_messages() {
        let err = ConfigError::NegativeForests {
            count: -1,
            database: "content".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "negative number of forests (-1) on database content"
        );

        let err = ConfigError::TooManyForests {
            count: 101,
            max: 100,
            database: "content".to_string(),
        };
        assert!(err.to_string().contains("greater than 100 (101)"));
    }

    #[test]
    fn test_missing_name_message() {
        let err = ConfigError::MissingName {
            kind: "database".to_string(),
            id: Some("content".to_string()),
        };
        assert_eq!(err.to_string(), "database without name (id: content)");

        let err = ConfigError::MissingName {
            kind: "server".to_string(),
            id: None,
        };
        assert_eq!(err.to_string(), "server without name");
    }

    #[test]
    fn test_remote_accessor() {
        let err: Error = ConfigError::MissingSrcDir {
            server: "app".to_string(),
        }
        .into();
        assert!(err.remote().is_none());

        let err = Error::Execute {
            action: "create database content".to_string(),
            completed: 0,
            source: manage::Error::status("post manage /databases", 400, None),
        };
        assert!(err.remote().is_some());
        assert!(err.to_string().starts_with("failed to create database content"));
    }
}
