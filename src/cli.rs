use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Taskboard — command-line client for the Taskboard task service
#[derive(Parser)]
#[command(name = "taskboard", version, about)]
pub struct Cli {
    /// Account to log in as
    #[arg(long, short, env = "TASKBOARD_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for the account
    #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the logged-in user
    Whoami,

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: LabelCommands,
    },

    /// Manage tags
    Tags {
        #[command(subcommand)]
        command: LabelCommands,
    },

    /// Read and acknowledge notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Task comments
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Task attachments
    Attachments {
        #[command(subcommand)]
        command: AttachmentCommands,
    },

    /// Search tasks and projects
    Search {
        query: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// End the session on the server
    Logout {
        /// End every session of this account, not just this one
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks
    List {
        /// todo, in_progress or done
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        project: Option<i64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "50")]
        limit: u32,
    },
    /// Show one task
    Show { id: i64 },
    /// Create a task
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        project: Option<i64>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<i64>>,
    },
    /// Update fields of a task
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a task
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List,
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a project
    Delete { id: i64 },
}

/// Shared by categories and tags.
#[derive(Subcommand)]
pub enum LabelCommands {
    /// List all
    List,
    /// Create one
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete one
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List notifications
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { id: i64 },
    /// Mark every notification as read
    ReadAll,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// List comments on a task
    List { task_id: i64 },
    /// Add a comment to a task
    Add {
        task_id: i64,
        #[arg(long)]
        body: String,
    },
}

#[derive(Subcommand)]
pub enum AttachmentCommands {
    /// List attachments of a task
    List { task_id: i64 },
    /// Upload a file to a task
    Upload {
        task_id: i64,
        path: PathBuf,
        /// MIME type, e.g. application/pdf
        #[arg(long)]
        mime: Option<String>,
    },
    /// Delete an attachment
    Delete { attachment_id: i64 },
}
