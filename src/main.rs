use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::path::PathBuf;
use todostore::{Config, FileStorage, NewTask, Query, StatusFilter, TaskFormatter, TaskStore, TaskUpdate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - create, complete, filter and sort your tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/todostore/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task list (overrides data_dir from the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Due time (HH:MM, 24-hour)
        #[arg(long)]
        time: Option<String>,

        /// low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Change fields of an existing task
    Edit {
        id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, conflicts_with = "clear_date")]
        date: Option<String>,

        #[arg(long)]
        clear_date: bool,

        #[arg(long, conflicts_with = "clear_time")]
        time: Option<String>,

        #[arg(long)]
        clear_time: bool,

        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Flip a task between pending and completed
    Toggle { id: String },

    /// Delete one task
    Delete { id: String },

    /// Delete every task
    Clear,

    /// List tasks
    List {
        /// all, pending or completed
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Only tasks whose description contains this text (case-insensitive)
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Order tasks by due date and time, undated last
    Sort,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.data_dir()?,
    };

    // Open store
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let mut store = TaskStore::open(storage, config.store_options())?;
    let formatter = TaskFormatter::new(config.preview_len);

    match cli.command {
        Commands::Add {
            description,
            date,
            time,
            priority,
        } => {
            let task = store.create(NewTask {
                description,
                due_date: date,
                due_time: time,
                priority,
            })?;
            println!("Task added successfully");
            println!("{}", formatter.row(&task));
        }
        Commands::Edit {
            id,
            description,
            date,
            clear_date,
            time,
            clear_time,
            priority,
        } => {
            let mut update = TaskUpdate {
                description,
                priority,
                ..Default::default()
            };
            if clear_date {
                update = update.clear_due_date();
            } else if let Some(date) = date {
                update = update.due_date(date);
            }
            if clear_time {
                update = update.clear_due_time();
            } else if let Some(time) = time {
                update = update.due_time(time);
            }

            let task = store.update(&id, update)?;
            println!("Todo updated");
            println!("{}", formatter.row(&task));
        }
        Commands::Toggle { id } => {
            let task = store.toggle_completed(&id)?;
            println!("{}", formatter.row(&task));
        }
        Commands::Delete { id } => {
            if store.delete(&id)? {
                println!("Todo deleted");
            } else {
                println!("No task found");
            }
        }
        Commands::Clear => {
            if store.delete_all()? {
                println!("All todos cleared");
            } else {
                println!("No task found");
            }
        }
        Commands::List { status, search } => {
            let tasks = store.query(&Query::new(status, search));
            if tasks.is_empty() {
                println!("No task found");
            }
            for task in tasks {
                println!("{}", formatter.row(task));
            }
        }
        Commands::Sort => {
            store.sort_by_due_moment()?;
            for task in store.tasks() {
                println!("{}", formatter.row(task));
            }
        }
    }

    Ok(())
}
