//! CLI entry point for tasklane.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::TaskService;
use tasklane_app::{AppConfig, TaskRepository};
use tasklane_store::FileStore;

mod commands;

/// Owner-scoped to-do tasks kept in a local document store.
#[derive(Parser, Debug)]
#[command(name = "tasklane", version, about = "tasklane: to-do tasks with owner-scoped queries")]
struct Cli {
    /// Project directory holding `.tasklane/` (defaults to current).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Store file, overriding the configured one.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Owner email, overriding `owner_email` from the config.
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

/// Output format for listing commands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task for the current owner.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        important: bool,
        /// today, tomorrow, YYYY-MM-DD, a local date-time or an RFC 3339 instant.
        #[arg(long)]
        due: Option<String>,
    },

    /// List the current owner's tasks.
    Ls {
        /// all, active or completed.
        #[arg(long, default_value = "all")]
        status: String,
        /// any, yes or no.
        #[arg(long, default_value = "any")]
        important: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show one task as JSON.
    Show { task: String },

    /// Change fields of a task; unspecified fields keep their values.
    Edit {
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        important: Option<bool>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task completed.
    Done { task: String },

    /// Mark a task active again.
    Undone { task: String },

    /// Delete a task.
    Rm { task: String },

    /// Count the current owner's tasks due on a local day.
    Due {
        #[arg(long, default_value = "today")]
        on: String,
    },

    /// Summary counts for the current owner.
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Rewrite stored tasks that still use legacy field names.
    Migrate {
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let Cli {
        dir,
        store,
        owner,
        cmd,
    } = Cli::parse();

    install_tracing();

    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let mut config = AppConfig::load(&dir)?;
    if let Some(owner) = owner {
        config.set_owner_email(owner)?;
    }
    if let Some(store) = store {
        config.set_store_path(store);
    }
    execute_command(&config, cmd)
}

fn execute_command(config: &AppConfig, command: Command) -> Result<()> {
    let time_zone = config.resolve_time_zone()?;
    let store = FileStore::open(config.store_path());
    let repo = TaskRepository::new(store).with_time_zone(time_zone);
    let service = TaskService::new(repo, config.owner_email().map(str::to_owned));

    let runtime = tokio::runtime::Runtime::new()?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(commands::run(command, &service, Timestamp::now(), &mut stdout))
}

fn install_tracing() {
    // RUST_LOG is honoured; warnings and errors are shown by default.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
