use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_cli::commands::util::Now;
use dl_cli::commands::{ai, goals, log, remind, show, streak, tasks};
use dl_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(dl_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = dl_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (db, config) = open_database(cli.config.as_deref())?;
    let now = Now::system();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Log(args) => log::run(&mut out, &db, args, now)?,
        Commands::Edit(args) => log::edit(&mut out, &db, args)?,
        Commands::Rm { id } => log::remove(&mut out, &db, *id)?,
        Commands::Show(args) => show::run(&mut out, &db, args, now)?,
        Commands::Days { json } => show::days(&mut out, &db, *json)?,
        Commands::DeleteDay { date } => show::delete_day(&mut out, &db, date, now)?,
        Commands::Streak(args) => streak::run(&mut out, &db, args, now)?,
        Commands::Tasks(action) => tasks::run(&mut out, &db, action)?,
        Commands::Goals(action) => goals::run(&mut out, &db, action, now)?,
        Commands::Remind { watch: false } => {
            remind::run(&mut out, &db, config.reminder_threshold_minutes, now)?;
        }
        Commands::Remind { watch: true } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(remind::watch(
                &mut out,
                &db,
                config.reminder_threshold_minutes,
                config.reminder_interval_minutes,
                Now::system,
            ))?;
        }
        Commands::Suggest => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(ai::suggest(&mut out, &db, &config, now))?;
        }
        Commands::Summarize(args) => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(ai::summarize(&mut out, &db, &config, args, now))?;
        }
        Commands::Insights(args) => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(ai::insights(&mut out, &db, &config, args, now))?;
        }
    }

    out.flush()?;
    Ok(())
}
