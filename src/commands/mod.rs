pub mod load;
pub mod new;
pub mod setup;
pub mod show;

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use manage::{Client, ConnectInfo};
use reconcile::{ActionList, LogReporter, Reporter, Space};

use crate::Context;
use crate::environ::Environ;
use crate::settings::Settings;
use crate::ui;

/// Everything a command needs from the project.
pub struct Project {
    pub environ: Environ,
    pub settings: Settings,
    pub space: Space,
}

impl Project {
    /// Load settings and environment, then build the space.
    pub fn load(ctx: &Context) -> Result<Self> {
        let settings = Settings::load()?;
        let environ = Environ::load(&ctx.project, &ctx.source, &ctx.params)?;
        let space = environ.build_space()?;
        log::info!(
            "{} databases, {} servers",
            space.databases().len(),
            space.servers().len()
        );
        Ok(Self {
            environ,
            settings,
            space,
        })
    }

    /// Connection settings, asking for the password when none is configured.
    pub fn connect_info(&self) -> Result<ConnectInfo> {
        let mut connect = self.environ.connect_info(&self.settings.connect)?;
        if connect.password.is_empty() {
            connect.password = dialoguer::Password::new()
                .with_prompt(format!("Password for {}@{}", connect.user, connect.host))
                .interact()
                .context("Could not read the password")?;
        }
        Ok(connect)
    }

    pub fn client(&self) -> Result<Client> {
        Ok(Client::new(self.connect_info()?))
    }
}

/// Planning reporter; with `--quiet` the lines only go to the log.
pub fn reporter(ctx: &Context) -> Box<dyn Reporter> {
    if ctx.quiet {
        Box::new(LogReporter)
    } else {
        Box::new(ui::TermReporter)
    }
}

/// Execute the queued actions behind a progress bar.
pub fn execute(actions: &ActionList<'_>) -> Result<()> {
    let mut progress = ui::BarProgress::new(actions.len());
    let result = actions.execute(&mut progress);
    progress.finish();

    match result {
        Ok(summary) => {
            ui::print_summary(&summary);
            Ok(())
        }
        Err(err) => {
            if let reconcile::Error::Execute { completed, .. } = &err {
                println!(
                    "  {} stopped after {} of {} actions",
                    "✗".red(),
                    completed,
                    actions.len()
                );
            }
            Err(err.into())
        }
    }
}
