//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "buildtrack", version, about = "Import and track construction tasks")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "BUILDTRACK_DB", default_value = "buildtrack.sqlite3")]
    pub db: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true, env = "BUILDTRACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, global = true, env = "BUILDTRACK_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a task file and print the records without saving them.
    Preview {
        file: PathBuf,
    },
    /// Parse a task file and bulk-insert its tasks into a project.
    Import {
        #[arg(long)]
        project: String,
        file: PathBuf,
    },
    /// Print a blank task document in the expected template.
    Template {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Manage projects.
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage users.
    #[command(subcommand)]
    User(UserCommand),
    /// Query and update tasks.
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    Create { name: String },
    Archive { id: String },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Add(AddUserArgs),
}

#[derive(Debug, Args)]
pub struct AddUserArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    List {
        #[arg(long)]
        project: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    SetStatus {
        task: String,
        status: String,
    },
}
