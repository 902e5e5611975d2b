mod auth;
mod config;

pub use auth::{cmd_login, cmd_logout, cmd_signup, cmd_strength, cmd_whoami};
pub use config::cmd_config;

use std::io::BufRead;
use std::path::PathBuf;

use chrono::Local;

use crate::backend::{Backend, BackendError, RestBackend};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, default_config_path};
use crate::io::session_store::SessionStore;
use crate::model::{DATE_FORMAT, StatusFilter, TaskDraft, TaskStatus, parse_date};
use crate::ops::task_store::TaskStore;
use crate::tui::render::task_list::EMPTY_MESSAGE;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let config_path = cli
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match cli.command {
        None => crate::tui::run(Some(config_path)),
        Some(cmd) => match cmd {
            Commands::Login(args) => cmd_login(args, &config_path, json),
            Commands::Signup(args) => cmd_signup(args, &config_path, json),
            Commands::Logout => cmd_logout(&config_path),
            Commands::Whoami => cmd_whoami(&config_path, json),
            Commands::List(args) => cmd_list(args, &config_path, json),
            Commands::Add(args) => cmd_add(args, &config_path, json),
            Commands::Edit(args) => cmd_edit(args, &config_path, json),
            Commands::Delete(args) => cmd_delete(args, &config_path),
            Commands::Strength(args) => cmd_strength(args, json),
            Commands::Config(cmd) => cmd_config(cmd.action, &config_path, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// REST backend for the configured project, with the saved session loaded
fn open_backend(config_path: &std::path::Path) -> Result<RestBackend, Box<dyn std::error::Error>> {
    let config = config_io::load_config(config_path)?;
    config_io::require_backend(&config)?;
    Ok(RestBackend::new(
        &config.backend,
        Some(SessionStore::default_location()),
    ))
}

/// Store for the signed-in user; errors when there is no session
fn signed_in_store(backend: &mut dyn Backend) -> Result<TaskStore, Box<dyn std::error::Error>> {
    let session = backend
        .get_session()
        .ok_or_else(|| format!("{} (run `tf login`)", BackendError::NotAuthenticated))?;
    Ok(TaskStore::new(session.user_id))
}

/// Read one line from stdin, without the line ending
fn read_stdin_line() -> Result<String, std::io::Error> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn parse_status(s: &str) -> Result<TaskStatus, Box<dyn std::error::Error>> {
    Ok(s.parse::<TaskStatus>()?)
}

fn check_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".into());
    }
    Ok(())
}

fn check_due(due: &str) -> Result<(), String> {
    if parse_date(due).is_none() {
        return Err(format!("invalid due date '{due}' (expected YYYY-MM-DD)"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, config_path: &std::path::Path, json: bool) -> CmdResult {
    let filter = match args.status.as_deref() {
        Some(s) => StatusFilter::parse(s)?,
        None => StatusFilter::All,
    };
    let mut backend = open_backend(config_path)?;
    let mut store = signed_in_store(&mut backend)?;
    store.load(&mut backend)?;
    let tasks = store.filtered(filter);

    if json {
        let out: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("{EMPTY_MESSAGE}");
    }
    for task in tasks {
        for line in format_task_entry(task) {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_add(args: AddArgs, config_path: &std::path::Path, json: bool) -> CmdResult {
    check_title(&args.title)?;
    let status = match args.status.as_deref() {
        Some(s) => parse_status(s)?,
        None => TaskStatus::Todo,
    };
    let due_date = args
        .due
        .unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string());
    check_due(&due_date)?;
    let draft = TaskDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        status,
        due_date,
    };

    let mut backend = open_backend(config_path)?;
    let mut store = signed_in_store(&mut backend)?;
    let task = store.create(&mut backend, draft)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("Task created: {}", format_task_line(task));
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, config_path: &std::path::Path, json: bool) -> CmdResult {
    let status = args.status.as_deref().map(parse_status).transpose()?;
    if let Some(title) = &args.title {
        check_title(title)?;
    }
    if let Some(due) = &args.due {
        check_due(due)?;
    }

    let mut backend = open_backend(config_path)?;
    let mut store = signed_in_store(&mut backend)?;
    store.load(&mut backend)?;
    let mut draft = store
        .get(&args.id)
        .map(|t| t.draft())
        .ok_or_else(|| BackendError::rejected("Task not found"))?;

    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(status) = status {
        draft.status = status;
    }
    if let Some(due) = args.due {
        draft.due_date = due;
    }
    store.update(&mut backend, &args.id, draft)?;

    let task = store
        .get(&args.id)
        .ok_or_else(|| BackendError::rejected("Task not found"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("Task updated: {}", format_task_line(task));
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs, config_path: &std::path::Path) -> CmdResult {
    let mut backend = open_backend(config_path)?;
    let mut store = signed_in_store(&mut backend)?;
    store.delete(&mut backend, &args.id)?;
    println!("Task deleted: {}", args.id);
    Ok(())
}
