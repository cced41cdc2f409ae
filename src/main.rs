use anyhow::Context;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway::client::FilePart;
use gateway::models::category::CategoryInput;
use gateway::models::project::ProjectCreate;
use gateway::models::tag::TagInput;
use gateway::models::task::{Task, TaskCreate, TaskFilter, TaskPriority, TaskStatus, TaskUpdate};
use gateway::Taskboard;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table output on stdout stays pipeable.
    let json_logs = std::env::var("TASKBOARD_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (plain_layer, json_layer) = if json_logs {
        (None, Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gateway=info,taskboard=info".into()),
        ))
        .with(plain_layer)
        .with(json_layer)
        .init();

    let cfg = gateway::config::load()?;
    let args = cli::Cli::parse();

    let result = run(cfg, args).await;
    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run(cfg: gateway::config::Config, args: cli::Cli) -> anyhow::Result<()> {
    let board = Taskboard::new(&cfg).context("failed to build HTTP client")?;

    let username = args
        .username
        .context("no username given (use --username or TASKBOARD_USERNAME)")?;
    let password = args
        .password
        .context("no password given (use --password or TASKBOARD_PASSWORD)")?;

    tracing::debug!(base = %cfg.api_base_url, "logging in");
    board
        .auth
        .login(&username, &password)
        .await
        .context("login failed")?;

    match args.command {
        cli::Commands::Whoami => {
            let me = board.auth.current_user().await?;
            println!(
                "User:\n  ID:       {}\n  Username: {}\n  Email:    {}\n  Name:     {}",
                me.id,
                me.username,
                me.email,
                me.full_name.as_deref().unwrap_or("-")
            );
        }
        cli::Commands::Tasks { command } => handle_task_command(command, &board).await?,
        cli::Commands::Projects { command } => handle_project_command(command, &board).await?,
        cli::Commands::Categories { command } => handle_category_command(command, &board).await?,
        cli::Commands::Tags { command } => handle_tag_command(command, &board).await?,
        cli::Commands::Notifications { command } => {
            handle_notification_command(command, &board).await?
        }
        cli::Commands::Comments { command } => match command {
            cli::CommentCommands::List { task_id } => {
                let comments = board.comments.list(task_id).await?;
                if comments.is_empty() {
                    println!("No comments.");
                }
                for c in comments {
                    println!(
                        "[{}] {}: {}",
                        c.created_at.format("%Y-%m-%d %H:%M"),
                        c.author.as_deref().unwrap_or("?"),
                        c.content
                    );
                }
            }
            cli::CommentCommands::Add { task_id, body } => {
                let c = board.comments.create(task_id, body).await?;
                println!("Comment {} added to task {}.", c.id, task_id);
            }
        },
        cli::Commands::Attachments { command } => handle_attachment_command(command, &board).await?,
        cli::Commands::Search { query, limit } => {
            let results = board.search.search(&query, Some(limit)).await?;
            println!("Tasks ({}):", results.tasks.len());
            print_tasks(&results.tasks);
            println!("\nProjects ({}):", results.projects.len());
            for p in results.projects {
                println!("  {:<8} {}", p.id, p.name);
            }
        }
        cli::Commands::Logout { all } => {
            if all {
                board.auth.logout_all().await?;
                println!("All sessions ended.");
            } else {
                board.auth.logout().await?;
                println!("Logged out.");
            }
        }
    }
    Ok(())
}

async fn handle_task_command(cmd: cli::TaskCommands, board: &Taskboard) -> anyhow::Result<()> {
    match cmd {
        cli::TaskCommands::List {
            status,
            priority,
            project,
            search,
            limit,
        } => {
            let filter = TaskFilter {
                status: status.map(|s| s.parse::<TaskStatus>()).transpose().map_err(anyhow::Error::msg)?,
                priority: priority.map(|p| p.parse::<TaskPriority>()).transpose().map_err(anyhow::Error::msg)?,
                project_id: project,
                search,
                limit: Some(limit),
                ..Default::default()
            };
            let list = board.tasks.list(&filter).await?;
            if list.tasks.is_empty() {
                println!("No tasks found.");
            } else {
                print_tasks(&list.tasks);
                println!("\n{} of {} tasks", list.tasks.len(), list.total);
            }
        }
        cli::TaskCommands::Show { id } => {
            let t = board.tasks.get(id).await?;
            let tags: Vec<&str> = t.tags.iter().map(|t| t.name.as_str()).collect();
            println!(
                "Task {}:\n  Title:    {}\n  Status:   {}\n  Priority: {}\n  Due:      {}\n  Project:  {}\n  Tags:     {}\n\n{}",
                t.id,
                t.title,
                t.status.as_str(),
                t.priority.as_str(),
                t.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".into()),
                t.project_id.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                if tags.is_empty() { "-".to_string() } else { tags.join(", ") },
                t.description.as_deref().unwrap_or("")
            );
        }
        cli::TaskCommands::Create {
            title,
            description,
            priority,
            due,
            project,
            category,
            tags,
        } => {
            let mut new_task = TaskCreate::new(title);
            new_task.description = description;
            new_task.priority = priority.parse::<TaskPriority>().map_err(anyhow::Error::msg)?;
            new_task.due_date = due.as_deref().map(parse_due).transpose()?;
            new_task.project_id = project;
            new_task.category_id = category;
            new_task.tag_ids = tags.unwrap_or_default();

            let t = board.tasks.create(&new_task).await?;
            println!("Task created:\n  ID:    {}\n  Title: {}", t.id, t.title);
        }
        cli::TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            due,
        } => {
            let update = TaskUpdate {
                title,
                description,
                status: status.map(|s| s.parse::<TaskStatus>()).transpose().map_err(anyhow::Error::msg)?,
                priority: priority.map(|p| p.parse::<TaskPriority>()).transpose().map_err(anyhow::Error::msg)?,
                due_date: due.as_deref().map(parse_due).transpose()?,
                ..Default::default()
            };
            let t = board.tasks.update(id, &update).await?;
            println!("Task {} updated ({}).", t.id, t.status.as_str());
        }
        cli::TaskCommands::Delete { id } => {
            board.tasks.delete(id).await?;
            println!("Task {} deleted.", id);
        }
    }
    Ok(())
}

async fn handle_project_command(cmd: cli::ProjectCommands, board: &Taskboard) -> anyhow::Result<()> {
    match cmd {
        cli::ProjectCommands::List => {
            let projects = board.projects.list().await?;
            if projects.is_empty() {
                println!("No projects found.");
            } else {
                println!("{:<8} {:<30} {:<8}", "ID", "NAME", "TASKS");
                for p in projects {
                    println!(
                        "{:<8} {:<30} {:<8}",
                        p.id,
                        p.name,
                        p.task_count.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
                    );
                }
            }
        }
        cli::ProjectCommands::Create {
            name,
            description,
            color,
        } => {
            let p = board
                .projects
                .create(&ProjectCreate {
                    name,
                    description,
                    color,
                })
                .await?;
            println!("Project created:\n  ID:   {}\n  Name: {}", p.id, p.name);
        }
        cli::ProjectCommands::Delete { id } => {
            board.projects.delete(id).await?;
            println!("Project {} deleted.", id);
        }
    }
    Ok(())
}

async fn handle_category_command(cmd: cli::LabelCommands, board: &Taskboard) -> anyhow::Result<()> {
    match cmd {
        cli::LabelCommands::List => {
            let categories = board.categories.list().await?;
            if categories.is_empty() {
                println!("No categories found.");
            }
            for c in categories {
                println!("{:<8} {:<24} {}", c.id, c.name, c.color.as_deref().unwrap_or(""));
            }
        }
        cli::LabelCommands::Create { name, color } => {
            let c = board
                .categories
                .create(&CategoryInput {
                    name,
                    description: None,
                    color,
                })
                .await?;
            println!("Category {} created ({}).", c.name, c.id);
        }
        cli::LabelCommands::Delete { id } => {
            board.categories.delete(id).await?;
            println!("Category {} deleted.", id);
        }
    }
    Ok(())
}

async fn handle_tag_command(cmd: cli::LabelCommands, board: &Taskboard) -> anyhow::Result<()> {
    match cmd {
        cli::LabelCommands::List => {
            let tags = board.tags.list().await?;
            if tags.is_empty() {
                println!("No tags found.");
            }
            for t in tags {
                println!("{:<8} {:<24} {}", t.id, t.name, t.color.as_deref().unwrap_or(""));
            }
        }
        cli::LabelCommands::Create { name, color } => {
            let t = board.tags.create(&TagInput { name, color }).await?;
            println!("Tag {} created ({}).", t.name, t.id);
        }
        cli::LabelCommands::Delete { id } => {
            board.tags.delete(id).await?;
            println!("Tag {} deleted.", id);
        }
    }
    Ok(())
}

async fn handle_notification_command(
    cmd: cli::NotificationCommands,
    board: &Taskboard,
) -> anyhow::Result<()> {
    match cmd {
        cli::NotificationCommands::List { unread } => {
            let items = board.notifications.list(unread).await?;
            let unread_count = board.notifications.unread_count().await?;
            if items.is_empty() {
                println!("No notifications.");
            }
            for n in items {
                println!(
                    "{} {:<8} {:<16} {}",
                    if n.is_read { " " } else { "*" },
                    n.id,
                    n.created_at.format("%Y-%m-%d %H:%M"),
                    n.title
                );
            }
            println!("\n{} unread", unread_count);
        }
        cli::NotificationCommands::Read { id } => {
            board.notifications.mark_read(id).await?;
            println!("Notification {} marked as read.", id);
        }
        cli::NotificationCommands::ReadAll => {
            board.notifications.mark_all_read().await?;
            println!("All notifications marked as read.");
        }
    }
    Ok(())
}

async fn handle_attachment_command(
    cmd: cli::AttachmentCommands,
    board: &Taskboard,
) -> anyhow::Result<()> {
    match cmd {
        cli::AttachmentCommands::List { task_id } => {
            let items = board.attachments.list(task_id).await?;
            if items.is_empty() {
                println!("No attachments.");
            }
            for a in items {
                println!(
                    "{:<8} {:<40} {:>10}",
                    a.id,
                    a.filename,
                    a.size.map(|s| s.to_string()).unwrap_or_default()
                );
            }
        }
        cli::AttachmentCommands::Upload { task_id, path, mime } => {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("upload path has no file name")?;

            let mut part = FilePart::new("file", file_name, data);
            if let Some(m) = mime {
                part = part.with_mime(m);
            }
            let a = board.attachments.upload(task_id, part).await?;
            println!("Uploaded {} as attachment {}.", a.filename, a.id);
        }
        cli::AttachmentCommands::Delete { attachment_id } => {
            board.attachments.delete(attachment_id).await?;
            println!("Attachment {} deleted.", attachment_id);
        }
    }
    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    println!(
        "{:<8} {:<40} {:<12} {:<8} {:<10}",
        "ID", "TITLE", "STATUS", "PRIORITY", "DUE"
    );
    for t in tasks {
        println!(
            "{:<8} {:<40} {:<12} {:<8} {:<10}",
            t.id,
            truncate(&t.title, 40),
            t.status.as_str(),
            t.priority.as_str(),
            t.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

/// Accepts `YYYY-MM-DD` (end of that day, UTC) or a full RFC 3339 timestamp.
fn parse_due(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid due date '{}', expected YYYY-MM-DD", s))?;
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .context("invalid time of day")?;
    Ok(Utc.from_utc_datetime(&end_of_day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_accepts_plain_date() {
        let d = parse_due("2026-03-01").unwrap();
        assert_eq!(d.to_rfc3339(), "2026-03-01T23:59:59+00:00");
    }

    #[test]
    fn test_parse_due_accepts_rfc3339() {
        let d = parse_due("2026-03-01T10:00:00+02:00").unwrap();
        assert_eq!(d.to_rfc3339(), "2026-03-01T08:00:00+00:00");
    }

    #[test]
    fn test_parse_due_rejects_garbage() {
        assert!(parse_due("next tuesday").is_err());
    }

    #[test]
    fn test_truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
