//! `buildtrack` command-line front-end over `buildtrack_core`.

mod cli;

use anyhow::{anyhow, bail, Context, Result};
use buildtrack_core::db::open_db;
use buildtrack_core::{
    default_log_level, init_logging, init_stderr_logging, render_document, ExtractedTaskRecord,
    ImportFormat, ImportSource, Priority, Project, ProjectRepository, SqliteProjectRepository,
    SqliteTaskRepository, SqliteUserRepository, TaskImportService, TaskListQuery, TaskService,
    TaskStatus, User, UserRepository,
};
use clap::Parser;
use cli::{Cli, Command, ProjectCommand, TasksCommand, UserCommand};
use log::info;
use std::path::Path;
use uuid::Uuid;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let logging = match cli.log_dir.as_deref() {
        Some(dir) => init_logging(level, dir),
        None => init_stderr_logging(level),
    };
    logging
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")?;

    match cli.command {
        Command::Preview { file } => preview(&file),
        Command::Import { project, file } => import(&cli.db, &project, &file),
        Command::Template { count } => {
            let blanks: Vec<ExtractedTaskRecord> = (1..=count)
                .map(|index| ExtractedTaskRecord::new(format!("Task {index}")))
                .collect();
            println!("{}", render_document(&blanks));
            Ok(())
        }
        Command::Project(command) => project(&cli.db, command),
        Command::User(UserCommand::Add(args)) => {
            let conn = open_db(&cli.db).context("failed to open database")?;
            let user = User::new(&args.email, args.name)?;
            let id = SqliteUserRepository::new(&conn).create_user(&user)?;
            println!("{id}");
            Ok(())
        }
        Command::Tasks(command) => tasks(&cli.db, command),
    }
}

fn read_source(file: &Path) -> Result<ImportSource> {
    let format = ImportFormat::from_path(file)?;
    let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    info!(
        "event=cli_read_source module=cli status=ok format={} bytes={}",
        format.as_str(),
        bytes.len()
    );
    Ok(ImportSource::from_bytes(format, &bytes)?)
}

fn preview(file: &Path) -> Result<()> {
    let batch = buildtrack_core::parse_source(&read_source(file)?);
    println!("{}", serde_json::to_string_pretty(&batch.records)?);
    eprintln!("records={} rejected={}", batch.records.len(), batch.rejected);
    Ok(())
}

fn import(db: &Path, project: &str, file: &Path) -> Result<()> {
    let project_id = parse_id(project)?;
    let source = read_source(file)?;
    let mut conn = open_db(db).context("failed to open database")?;

    let mut service = TaskImportService::new(SqliteTaskRepository::new(&mut conn));
    let report = service.import_tasks(project_id, &source)?;
    println!("created={} rejected={}", report.created, report.rejected);
    Ok(())
}

fn project(db: &Path, command: ProjectCommand) -> Result<()> {
    let conn = open_db(db).context("failed to open database")?;
    let repo = SqliteProjectRepository::new(&conn);
    match command {
        ProjectCommand::Create { name } => {
            let id = repo.create_project(&Project::new(name)?)?;
            println!("{id}");
        }
        ProjectCommand::Archive { id } => {
            repo.set_project_archived(parse_id(&id)?, true)?;
        }
    }
    Ok(())
}

fn tasks(db: &Path, command: TasksCommand) -> Result<()> {
    let mut conn = open_db(db).context("failed to open database")?;
    let service = TaskService::new(SqliteTaskRepository::new(&mut conn));
    match command {
        TasksCommand::List {
            project,
            status,
            priority,
        } => {
            let query = TaskListQuery {
                project_id: Some(parse_id(&project)?),
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..TaskListQuery::default()
            };
            let tasks = service.list_tasks(&query)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TasksCommand::SetStatus { task, status } => {
            let updated = service.update_status(parse_id(&task)?, parse_status(&status)?)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
    }
    Ok(())
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("invalid id `{value}`"))
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    match TaskStatus::parse_lenient(value) {
        Some(status) => Ok(status),
        None => bail!("unknown status `{value}`"),
    }
}

fn parse_priority(value: &str) -> Result<Priority> {
    Priority::parse_lenient(value).ok_or_else(|| anyhow!("unknown priority `{value}`"))
}
