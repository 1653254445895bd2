use std::path::PathBuf;

use clap::{Parser, Subcommand};

use treegate::cli::{self, Workspace};
use treegate::entity::EntityKind;

#[derive(Parser)]
#[command(name = "treegate", version, about = "Path-scoped access control for catalog trees")]
struct Cli {
    /// Project root holding `.treegate/`. Defaults to the current directory.
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect and edit the category/product tree.
    Tree {
        #[command(subcommand)]
        action: TreeAction,
    },
    /// Allow a principal to see an entity.
    Grant {
        kind: EntityKind,
        entity_id: String,
        principal: String,
        /// Also materialize the grant onto every descendant.
        #[arg(long)]
        recursive: bool,
    },
    /// Remove a principal's grant on an entity. Descendant grants are
    /// left alone; the ancestor chain blocks them at read time.
    Revoke {
        kind: EntityKind,
        entity_id: String,
        principal: String,
    },
    /// Push a category's grants down to its whole subtree.
    Sync {
        category_id: String,
        /// Only sync this principal's grant.
        #[arg(long)]
        principal: Option<String>,
    },
    /// Is an entity visible to a principal? Exits 0/2.
    Check {
        principal: String,
        kind: EntityKind,
        entity_id: String,
    },
    /// Print every category path visible to a principal.
    Paths { principal: String },
    /// Keyword search over the catalog as a principal sees it.
    Search {
        principal: String,
        /// Substring to match names against; empty browses everything visible.
        #[arg(default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TreeAction {
    /// Create a node under a parent path.
    Add {
        kind: EntityKind,
        id: String,
        name: String,
        parent: String,
    },
    /// Move a subtree under a new parent category.
    Mv {
        kind: EntityKind,
        id: String,
        new_parent: String,
    },
    /// Rename a node; its path segment and all descendant paths follow.
    Rename {
        kind: EntityKind,
        id: String,
        new_name: String,
    },
    /// Delete a path and its subtree, cascading to grants.
    Rm { path: String },
    /// List direct children of a path.
    Ls { path: Option<String> },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = match cli.project {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    let ws = Workspace::open(&project_root)?;

    match cli.command {
        Command::Tree { action } => match action {
            TreeAction::Add {
                kind,
                id,
                name,
                parent,
            } => cli::tree_cmd::add(&ws, kind, &id, &name, &parent)?,
            TreeAction::Mv {
                kind,
                id,
                new_parent,
            } => cli::tree_cmd::mv(&ws, kind, &id, &new_parent)?,
            TreeAction::Rename {
                kind,
                id,
                new_name,
            } => cli::tree_cmd::rename(&ws, kind, &id, &new_name)?,
            TreeAction::Rm { path } => cli::tree_cmd::rm(&ws, &path)?,
            TreeAction::Ls { path } => cli::tree_cmd::ls(&ws, path.as_deref())?,
        },
        Command::Grant {
            kind,
            entity_id,
            principal,
            recursive,
        } => cli::grant::run(&ws, kind, &entity_id, &principal, recursive)?,
        Command::Revoke {
            kind,
            entity_id,
            principal,
        } => cli::grant::revoke(&ws, kind, &entity_id, &principal)?,
        Command::Sync {
            category_id,
            principal,
        } => cli::sync::run(&ws, &category_id, principal.as_deref())?,
        Command::Check {
            principal,
            kind,
            entity_id,
        } => cli::check::run(&ws, &principal, kind, &entity_id)?,
        Command::Paths { principal } => cli::check::paths(&ws, &principal)?,
        Command::Search {
            principal,
            query,
            page,
            page_size,
            json,
        } => cli::search_cmd::run(&ws, &principal, &query, page, page_size, json)?,
    }

    Ok(())
}
