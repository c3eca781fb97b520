//! GoalPro - Main Entry Point
//!
//! Thin CLI over the `goalpro` library: every subcommand maps onto one
//! tracker operation. Commands are one-shot; the tracker flushes pending
//! writes on teardown, so a mutation is always persisted before exit.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use clap::{CommandFactory, Parser, Subcommand};
use goalpro::{Filter, GoalPatch, GoalTracker, NewGoal, Priority, Tab};
use std::path::PathBuf;
use uuid::Uuid;

/// GoalPro - goal and task tracker over a local JSON store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the goal data file
    file: PathBuf,

    /// Log level (trace/debug/info/warn/error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List goals through the active filter
    List {
        /// Free-text query matched against titles, descriptions and tasks
        #[arg(long)]
        query: Option<String>,
        /// Restrict to one category id
        #[arg(long)]
        category: Option<Uuid>,
        /// Tab: all, today, or completed
        #[arg(long, default_value = "all")]
        tab: String,
    },
    /// Create a goal
    AddGoal {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Category id the goal references
        #[arg(long)]
        category: Option<Uuid>,
        /// Priority: low, medium, or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Deadline as YYYY-MM-DD or "YYYY-MM-DD HH:MM" (local time)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Update fields of a goal (missing id is ignored)
    UpdateGoal {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Category id; empty string clears the reference
        #[arg(long)]
        category: Option<String>,
        /// Priority: low, medium, or high
        #[arg(long)]
        priority: Option<String>,
        /// New deadline; empty string clears it
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Delete a goal
    DeleteGoal { id: Uuid },
    /// Append a task to a goal's checklist
    AddTask { goal: Uuid, title: String },
    /// Flip a task's done flag
    Toggle { goal: Uuid, task: Uuid },
    /// Create a category
    AddCategory {
        name: String,
        #[arg(long, default_value = "#888888")]
        color: String,
    },
    /// Delete a category (blocked while goals reference it)
    DeleteCategory { id: Uuid },
    /// Write a backup file (date-stamped filename by default)
    Export { path: Option<PathBuf> },
    /// Replace all data from a backup file
    Import { path: PathBuf },
    /// Print goals due within the next hour, once per goal
    DueSoon,
}

/// Parse a CLI deadline into local-time epoch milliseconds
///
/// Date-only input means start of day.
fn parse_deadline(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M").or_else(|_| {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
    });
    let naive = match naive {
        Ok(n) => n,
        Err(_) => bail!(
            "Invalid deadline '{}'. Use YYYY-MM-DD or \"YYYY-MM-DD HH:MM\" (e.g., '2026-03-15 18:00')",
            input
        ),
    };
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp_millis())
        .with_context(|| format!("deadline '{}' is ambiguous in the local timezone", input))
}

fn run(tracker: &GoalTracker, command: Command) -> Result<()> {
    match command {
        Command::List {
            query,
            category,
            tab,
        } => {
            let filter = Filter {
                query,
                category,
                tab: tab.parse::<Tab>().map_err(anyhow::Error::msg)?,
            };
            println!("{}", tracker.render(&filter));
        }
        Command::AddGoal {
            title,
            description,
            category,
            priority,
            deadline,
        } => {
            let goal = tracker.create_goal(NewGoal {
                title,
                description,
                category_id: category,
                priority: priority.parse::<Priority>().map_err(anyhow::Error::msg)?,
                deadline: deadline.as_deref().map(parse_deadline).transpose()?,
            })?;
            println!("Goal created with ID: {}", goal.id);
        }
        Command::UpdateGoal {
            id,
            title,
            description,
            category,
            priority,
            deadline,
        } => {
            let deadline = match deadline.as_deref() {
                None => None,
                Some("") => Some(None),
                Some(s) => Some(Some(parse_deadline(s)?)),
            };
            let category_id = match category.as_deref() {
                None => None,
                Some("") => Some(None),
                Some(s) => Some(Some(s.parse::<Uuid>().context("invalid category id")?)),
            };
            tracker.update_goal(
                id,
                GoalPatch {
                    title,
                    description,
                    category_id,
                    priority: priority
                        .map(|p| p.parse::<Priority>().map_err(anyhow::Error::msg))
                        .transpose()?,
                    deadline,
                },
            );
            println!("Goal {} updated", id);
        }
        Command::DeleteGoal { id } => {
            if tracker.delete_goal(id) {
                println!("Goal {} deleted", id);
            } else {
                println!("Goal {} not found", id);
            }
        }
        Command::AddTask { goal, title } => match tracker.add_task(goal, &title) {
            Some(task) => println!("Task created with ID: {}", task.id),
            None => println!("Nothing added (blank title or unknown goal)"),
        },
        Command::Toggle { goal, task } => {
            tracker.toggle_task(goal, task);
            println!("Toggled task {}", task);
        }
        Command::AddCategory { name, color } => {
            let id = tracker.create_category(&name, &color)?;
            println!("Category created with ID: {}", id);
        }
        Command::DeleteCategory { id } => {
            tracker.delete_category(id)?;
            println!("Category {} deleted", id);
        }
        Command::Export { path } => {
            let written = tracker.export(path)?;
            println!("Exported to {}", written.display());
        }
        Command::Import { path } => {
            tracker.import(&path)?;
            println!("Imported {}", path.display());
        }
        Command::DueSoon => {
            let titles = tracker.collect_due_notifications();
            if titles.is_empty() {
                println!("Nothing due within the next hour");
            } else {
                for title in titles {
                    println!("Due soon: {}", title);
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // No arguments: show help and exit with an error code
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    let level = args
        .log_level
        .unwrap_or_else(|| goalpro::logging::default_log_level().to_string());
    if let Err(e) = goalpro::logging::init_logging(&level) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let tracker = GoalTracker::new(&args.file)?;
    if let Some(notice) = tracker.startup_notice() {
        eprintln!("Warning: stored data could not be read ({}); starting fresh", notice);
    }

    run(&tracker, args.command)
}
