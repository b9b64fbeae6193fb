mod cli;
mod commands;
mod environ;
mod paths;
mod settings;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use environ::{DEFAULT_ENVIRON, Source};
use reconcile::Mode;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub project: PathBuf,
    pub source: Source,
    pub params: Vec<(String, String)>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "mlproj", &mut io::stdout());
        return Ok(());
    }

    let source = match (cli.file, cli.environ) {
        (Some(file), _) => Source::File(paths::expand(&file.to_string_lossy())),
        (None, Some(name)) => Source::Name(name),
        (None, None) => Source::Name(DEFAULT_ENVIRON.to_string()),
    };
    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        project: cli.project,
        source,
        params: environ::parse_overrides(&cli.params)?,
    };
    log::debug!("verbosity {}, project {}", ctx.verbose, ctx.project.display());

    match cli.command {
        Command::New(args) => commands::new::run(&ctx, args),
        Command::Show => commands::show::run(&ctx),
        Command::Setup(args) => commands::setup::run(&ctx, args),
        Command::Load(args) => commands::load::run(&ctx, Mode::Load, args),
        Command::Deploy(args) => commands::load::run(&ctx, Mode::Deploy, args),
        Command::Completions { .. } => Ok(()),
    }
}

fn report(err: &anyhow::Error) {
    ui::error(&format!("{:#}", err));

    let remote = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<manage::Error>()
            .or_else(|| cause.downcast_ref::<reconcile::Error>().and_then(|e| e.remote()))
    });
    if let Some(remote) = remote {
        ui::print_advice(remote);
    }
}
