use anyhow::{Result, bail};
use reconcile::load::{file_uri, insert_documents, resolve_content, resolve_target};
use reconcile::{ActionList, Content, Mode};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Project;
use crate::Context;
use crate::cli::LoadArgs;
use crate::ui;

pub fn run(ctx: &Context, mode: Mode, args: LoadArgs) -> Result<()> {
    let project = Project::load(ctx)?;
    let target = resolve_target(&project.space, mode, &args.target())?;
    let content = resolve_content(
        &project.space,
        mode,
        &args.content(),
        &project.environ.project,
    )?;

    let documents = collect_documents(&content)?;
    if documents.is_empty() {
        ui::warn("No documents to insert");
        return Ok(());
    }

    let verb = match mode {
        Mode::Load => "Loading",
        Mode::Deploy => "Deploying",
    };
    ui::header(&format!(
        "{} {} documents into {}",
        verb,
        documents.len(),
        target.name()
    ));

    let client = project.client()?;
    let reporter = super::reporter(ctx);
    let mut actions = ActionList::new(&client, reporter.as_ref());
    insert_documents(&mut actions, &target, documents);

    super::execute(&actions)
}

/// Files to insert, with their URIs, in a stable order.
pub fn collect_documents(content: &Content) -> Result<Vec<(PathBuf, String)>> {
    match content {
        Content::Document { path, uri } => {
            if !path.is_file() {
                bail!("Document not found: {}", path.display());
            }
            Ok(vec![(path.clone(), uri.clone())])
        }
        Content::Directory(dir) => walk(dir),
    }
}

fn walk(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        match file_uri(dir, entry.path()) {
            Some(uri) => documents.push((entry.into_path(), uri)),
            None => log::debug!("Skipping {}", entry.path().display()),
        }
    }
    log::info!("{} files below {}", documents.len(), dir.display());
    Ok(documents)
}
