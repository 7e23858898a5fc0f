use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use tasklane_app::{
    AsyncDocumentStore, Dashboard, TaskRepository, list_filter, parse_due_date, parse_flag,
    parse_status,
};
use tasklane_core::{Task, TaskId};

use crate::{Command, OutputFormat};

/// Service façade binding the repository to the acting owner.
pub struct TaskService<S> {
    repo: TaskRepository<S>,
    owner: Option<String>,
}

impl<S: AsyncDocumentStore> TaskService<S> {
    #[must_use]
    pub const fn new(repo: TaskRepository<S>, owner: Option<String>) -> Self {
        Self { repo, owner }
    }

    fn owner(&self) -> Result<&str> {
        self.owner
            .as_deref()
            .ok_or_else(|| anyhow!("No owner email configured; pass --owner or set owner_email"))
    }

    fn time_zone(&self) -> &TimeZone {
        self.repo.time_zone()
    }

    fn parse_due(&self, token: &str, now: Timestamp) -> Result<Timestamp> {
        Ok(parse_due_date(token, now, self.time_zone())?)
    }
}

pub async fn run<S, W>(command: Command, service: &TaskService<S>, now: Timestamp, out: &mut W) -> Result<()>
where
    S: AsyncDocumentStore,
    W: Write,
{
    let repo = &service.repo;
    match command {
        Command::Add {
            title,
            description,
            important,
            due,
        } => {
            let owner = service.owner()?;
            let mut task = Task::new(title)
                .with_description(description.unwrap_or_default())
                .with_important(important);
            if let Some(due) = due {
                task = task.with_due_date(service.parse_due(&due, now)?);
            }
            let id = repo.upsert_task(task, Some(owner)).await?;
            writeln!(out, "created task: {id}")?;
        }
        Command::Ls {
            status,
            important,
            format,
        } => {
            let owner = service.owner()?;
            let filter = list_filter(
                Some(owner),
                parse_status(&status)?,
                parse_flag("important", &important)?,
            );
            let tasks = repo.list_tasks(&filter).await?;
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?,
                OutputFormat::Table if tasks.is_empty() => writeln!(out, "No tasks found")?,
                OutputFormat::Table => render_task_table(out, &tasks, service.time_zone())?,
            }
        }
        Command::Show { task } => {
            let task = repo.get_task(&parse_task_id(&task)?).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&task)?)?;
        }
        Command::Edit {
            task,
            title,
            description,
            important,
            due,
            clear_due,
        } => {
            // Upserts overwrite the whole record, so start from the stored one.
            let mut current = repo.get_task(&parse_task_id(&task)?).await?;
            if let Some(title) = title {
                current.title = title;
            }
            if let Some(description) = description {
                current.description = description;
            }
            if let Some(important) = important {
                current.important = important;
            }
            if let Some(due) = due {
                current.due_date = Some(service.parse_due(&due, now)?);
            } else if clear_due {
                current.due_date = None;
            }
            let id = repo.upsert_task(current, None).await?;
            writeln!(out, "updated task: {id}")?;
        }
        Command::Done { task } => {
            let task = repo.set_completed(&parse_task_id(&task)?, true).await?;
            writeln!(out, "completed: {}", task.title)?;
        }
        Command::Undone { task } => {
            let task = repo.set_completed(&parse_task_id(&task)?, false).await?;
            writeln!(out, "reopened: {}", task.title)?;
        }
        Command::Rm { task } => {
            let id = parse_task_id(&task)?;
            repo.delete_task(&id).await?;
            writeln!(out, "deleted task: {id}")?;
        }
        Command::Due { on } => {
            let owner = service.owner()?;
            let instant = service.parse_due(&on, now)?;
            let count = repo.count_tasks_due_on(Some(instant), Some(owner)).await?;
            let date = instant.to_zoned(service.time_zone().clone()).date();
            writeln!(out, "{count} task(s) due on {date}")?;
        }
        Command::Stats { format } => {
            let owner = service.owner()?;
            let dashboard = Dashboard::load(repo, owner, now).await?;
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&dashboard)?)?,
                OutputFormat::Table => {
                    writeln!(out, "Completed | Active | Important | Due today")?;
                    writeln!(out, "--------- | ------ | --------- | ---------")?;
                    writeln!(
                        out,
                        "{} | {} | {} | {}",
                        dashboard.completed, dashboard.active, dashboard.important, dashboard.due_today
                    )?;
                }
            }
        }
        Command::Migrate { dry_run } => {
            let report = repo.migrate_legacy_fields(dry_run).await?;
            let verb = if dry_run { "would rewrite" } else { "rewrote" };
            writeln!(
                out,
                "scanned {} task(s), {verb} {}",
                report.scanned,
                report.rewritten.len()
            )?;
            for id in &report.rewritten {
                let marker = if report.conflicted.contains(id) {
                    " (legacy values dropped)"
                } else {
                    ""
                };
                writeln!(out, "  {id}{marker}")?;
            }
        }
    }

    Ok(())
}

fn render_task_table<W: Write>(out: &mut W, tasks: &[Task], tz: &TimeZone) -> Result<()> {
    writeln!(out, "ID | Done | Important | Title | Due")?;
    writeln!(out, "-- | ---- | --------- | ----- | ---")?;

    for task in tasks {
        let id = task.id.as_ref().map_or("-", TaskId::as_str);
        let done = if task.completed { "x" } else { " " };
        let important = if task.important { "!" } else { " " };
        let due = task.due_date.map_or_else(
            || "-".to_owned(),
            |due| due.to_zoned(tz.clone()).strftime("%Y-%m-%d %H:%M").to_string(),
        );
        writeln!(out, "{id} | {done} | {important} | {} | {due}", task.title)?;
    }
    Ok(())
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))
}
