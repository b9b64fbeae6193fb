use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mlproj")]
#[command(version)]
#[command(about = "Declarative setup of MarkLogic databases, forests and app servers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Environment name (xproject/mlenvs/<name>.json or .toml)
    #[arg(short, long, global = true, conflicts_with = "file")]
    pub environ: Option<String>,

    /// Environment file, instead of a named environment
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Override a parameter (name=value), can be repeated
    #[arg(short, long = "param", value_name = "NAME=VALUE", global = true)]
    pub params: Vec<String>,

    /// Project directory
    #[arg(short = 'C', long = "project", value_name = "DIR", global = true, default_value = ".")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new project skeleton
    New(NewArgs),

    /// Show the resolved environment
    Show,

    /// Create or update databases, forests and servers
    Setup(SetupArgs),

    /// Load documents into a database
    Load(LoadArgs),

    /// Deploy code into the modules database
    Deploy(LoadArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct NewArgs {
    /// Project directory (default: the -C directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Project name, a URI
    #[arg(long)]
    pub name: Option<String>,

    /// Project abbreviation, used as @code (default: directory name)
    #[arg(long)]
    pub abbrev: Option<String>,

    /// Project title
    #[arg(long)]
    pub title: Option<String>,

    /// Project version
    #[arg(id = "project_version", long = "project-version", default_value = "0.1.0")]
    pub version: String,

    /// Port of the app server
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args)]
pub struct SetupArgs {
    /// Show what would be done without doing it
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct LoadArgs {
    /// Directory or source set to load (default: data, or src for deploy)
    pub what: Option<String>,

    /// Target database, by id or name
    #[arg(long = "db", value_name = "DB", group = "target")]
    pub database: Option<String>,

    /// Use the database of this server, by id or name
    #[arg(long = "as", value_name = "SERVER", group = "target")]
    pub server: Option<String>,

    /// Target a database outside the environment (e.g. Documents)
    #[arg(long = "sys", value_name = "DB", group = "target")]
    pub system: Option<String>,

    /// Source set to load
    #[arg(long = "src", value_name = "NAME", group = "content")]
    pub sourceset: Option<String>,

    /// Directory to load
    #[arg(long = "dir", value_name = "DIR", group = "content")]
    pub directory: Option<String>,

    /// Single document to load
    #[arg(long = "doc", value_name = "FILE", group = "content")]
    pub document: Option<String>,
}

impl LoadArgs {
    /// Target options, for resolution.
    pub fn target(&self) -> reconcile::TargetArgs {
        reconcile::TargetArgs {
            database: self.database.clone(),
            server: self.server.clone(),
            system: self.system.clone(),
        }
    }

    /// Content options, for resolution.
    pub fn content(&self) -> reconcile::ContentArgs {
        reconcile::ContentArgs {
            what: self.what.clone(),
            sourceset: self.sourceset.clone(),
            directory: self.directory.clone(),
            document: self.document.clone(),
        }
    }
}
