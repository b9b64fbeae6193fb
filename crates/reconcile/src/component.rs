//! Component trait and load targets

use crate::action::ActionList;
use crate::context::Display;
use crate::error::Result;
use crate::space::DbLink;

/// Something declared in the environment that can be set up on the cluster.
///
/// Implemented by [`crate::Database`] and [`crate::Server`]. Forests are
/// handled by their database, and [`SysDatabase`] has no lifecycle at all.
pub trait Component {
    /// Entity kind ("database", "server").
    fn kind(&self) -> &'static str;

    /// Name on the cluster.
    fn name(&self) -> &str;

    /// Describe the desired state.
    fn show(&self, display: &mut dyn Display);

    /// Read the remote state and queue the actions converging it.
    fn setup(&self, actions: &mut ActionList<'_>) -> Result<()>;
}

/// A database outside the environment, targeted by name.
///
/// Used to load documents into system databases (`Security`,
/// `Modules`...). It is never set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysDatabase {
    name: String,
}

impl SysDatabase {
    /// Target the database `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Database receiving documents on `load` and `deploy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A database of the environment.
    Database(DbLink),
    /// A database forced by name.
    System(SysDatabase),
}

impl Target {
    /// Name of the target database.
    pub fn name(&self) -> &str {
        match self {
            Self::Database(link) => &link.name,
            Self::System(sys) => sys.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::DbId;

    #[test]
    fn test_target_name() {
        let target = Target::System(SysDatabase::new("Security"));
        assert_eq!(target.name(), "Security");

        let target = Target::Database(DbLink {
            id: DbId(2),
            name: "app-content".to_string(),
        });
        assert_eq!(target.name(), "app-content");
    }
}
