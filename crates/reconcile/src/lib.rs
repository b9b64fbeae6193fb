//! # Reconcile
//!
//! Declarative reconciliation of databases, forests and app servers.
//!
//! An environment declares the desired shape of a cluster; this crate
//! reads the actual state back through the management API and queues the
//! writes converging one to the other. Nothing is ever deleted: forests
//! that are no longer wanted are detached, keeping their data.
//!
//! ## Core Concepts
//!
//! - **Space**: the resolved environment, an arena of [`Database`]s plus
//!   the [`Server`]s referring to them
//! - **Component**: something that can be set up ([`Database`], [`Server`])
//! - **ActionList**: reads run immediately while planning, writes are
//!   queued and executed later in insertion order
//! - **Property**: a typed configuration value that diffs itself
//!
//! ## Example
//!
//! ```
//! use manage::{Client, MockBackend};
//! use reconcile::{ActionList, NoProgress, NoReport, Space, SpaceDef};
//!
//! let def: SpaceDef = serde_json::from_str(r#"{
//!     "databases": [{"name": "content", "forests": 2}]
//! }"#).unwrap();
//! let space = Space::build(def).unwrap();
//!
//! // nothing exists on this (mock) cluster
//! let client = Client::with_backend(Box::new(MockBackend::new()));
//! let mut actions = ActionList::new(&client, &NoReport);
//! space.setup(&mut actions).unwrap();
//! assert_eq!(actions.len(), 3);
//!
//! let summary = actions.execute(&mut NoProgress).unwrap();
//! assert_eq!(summary.created, 3);
//! ```
//!
//! ## Provider Traits
//!
//! - [`Reporter`]: receives planning progress ("checking", "need to")
//! - [`Display`]: receives the description of the space
//! - [`ExecProgress`]: receives execution progress

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod component;
pub mod context;
pub mod database;
pub mod definition;
pub mod error;
pub mod load;
pub mod property;
pub mod server;
pub mod space;

// Re-export main types at crate root
pub use action::{Action, ActionList, ExecuteSummary, Read};
pub use component::{Component, SysDatabase, Target};
pub use context::{Display, ExecProgress, LogReporter, NoProgress, NoReport, RecordingReporter, Reporter};
pub use database::{Database, Forest};
pub use definition::{DatabaseDef, DbRef, ServerDef, SpaceDef};
pub use error::{ConfigError, Error, Result};
pub use load::{Content, ContentArgs, Mode, TargetArgs};
pub use property::{PropValue, Properties, Property};
pub use server::Server;
pub use space::{DbId, DbLink, Space};
