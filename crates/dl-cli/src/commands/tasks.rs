//! Task catalog management.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use dl_core::{TaskDef, TaskCatalog};
use dl_db::Database;

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// List catalog tasks.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a task to the catalog.
    Add {
        /// Task name.
        name: String,
        /// Logged without an end time (e.g. "Wake up").
        #[arg(long)]
        point_in_time: bool,
        /// Counts toward the productivity ratio.
        #[arg(long)]
        productive: bool,
    },
    /// Remove a task from the catalog. Logged activities keep their label.
    Remove {
        /// Task name.
        name: String,
    },
}

pub fn run<W: Write>(writer: &mut W, db: &Database, action: &TaskAction) -> Result<()> {
    let mut catalog = db.load_tasks().context("failed to load tasks")?;
    match action {
        TaskAction::List { json } => list(writer, &catalog, *json),
        TaskAction::Add {
            name,
            point_in_time,
            productive,
        } => {
            let mut task = TaskDef::new(name)?;
            if *point_in_time {
                task = task.point_in_time();
            }
            if *productive {
                task = task.productive();
            }
            let name = catalog.add(task)?.name.clone();
            db.save_tasks(&catalog).context("failed to save tasks")?;
            tracing::info!(%name, "task added");
            writeln!(writer, "Added task {name}")?;
            Ok(())
        }
        TaskAction::Remove { name } => {
            let removed = catalog.remove(name)?;
            db.save_tasks(&catalog).context("failed to save tasks")?;
            tracing::info!(name = %removed.name, "task removed");
            writeln!(writer, "Removed task {}", removed.name)?;
            Ok(())
        }
    }
}

fn list<W: Write>(writer: &mut W, catalog: &TaskCatalog, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(catalog)?)?;
        return Ok(());
    }
    if catalog.is_empty() {
        writeln!(writer, "No tasks defined.")?;
        return Ok(());
    }
    for task in catalog.iter() {
        let mut flags = Vec::new();
        if task.point_in_time {
            flags.push("point-in-time");
        }
        if task.productive {
            flags.push("productive");
        }
        if flags.is_empty() {
            writeln!(writer, "{}", task.name)?;
        } else {
            writeln!(writer, "{:<12} {}", task.name, flags.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn exec(db: &Database, action: &TaskAction) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, db, action)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn fresh_database_lists_default_catalog() {
        let db = Database::open_in_memory().unwrap();
        let output = exec(&db, &TaskAction::List { json: false }).unwrap();
        assert_snapshot!(output, @r"
        Wake up      point-in-time
        Sleep        point-in-time
        Work         productive
        Study        productive
        Exercise     productive
        Reading      productive
        Breakfast
        Lunch
        Dinner
        Break
        Commute
        ");
    }

    #[test]
    fn add_persists_new_task_with_flags() {
        let db = Database::open_in_memory().unwrap();
        let output = exec(
            &db,
            &TaskAction::Add {
                name: "  Meditate ".to_string(),
                point_in_time: false,
                productive: true,
            },
        )
        .unwrap();
        assert_eq!(output, "Added task Meditate\n");

        let catalog = db.load_tasks().unwrap();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.is_productive("meditate"));
    }

    #[test]
    fn add_rejects_duplicate_ignoring_case() {
        let db = Database::open_in_memory().unwrap();
        let err = exec(
            &db,
            &TaskAction::Add {
                name: "WORK".to_string(),
                point_in_time: false,
                productive: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("task already exists"));
        assert_eq!(db.load_tasks().unwrap(), TaskCatalog::default());
    }

    #[test]
    fn remove_drops_task() {
        let db = Database::open_in_memory().unwrap();
        let output = exec(
            &db,
            &TaskAction::Remove {
                name: "commute".to_string(),
            },
        )
        .unwrap();
        assert_eq!(output, "Removed task Commute\n");
        assert!(db.load_tasks().unwrap().get("Commute").is_none());

        let err = exec(
            &db,
            &TaskAction::Remove {
                name: "commute".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("task not found: commute"));
    }
}
