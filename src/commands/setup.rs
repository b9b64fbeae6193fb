use anyhow::Result;
use colored::Colorize;
use reconcile::ActionList;

use super::Project;
use crate::Context;
use crate::cli::SetupArgs;
use crate::ui;

pub fn run(ctx: &Context, args: SetupArgs) -> Result<()> {
    let project = Project::load(ctx)?;
    let client = project.client()?;
    let reporter = super::reporter(ctx);

    ui::header(&format!("Setting up {}", project.environ.code));
    let mut actions = ActionList::new(&client, reporter.as_ref());
    project.space.setup(&mut actions)?;

    if actions.is_empty() {
        println!();
        ui::success("Everything is up to date");
        return Ok(());
    }

    ui::print_actions(actions.actions());

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(());
    }

    if !args.yes && project.settings.setup.confirm {
        println!();
        if !confirm_proceed()? {
            println!("  {} Aborted", "✗".red());
            return Ok(());
        }
    }

    super::execute(&actions)
}

fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}
