//! Typed wrappers over [`ApiClient`](crate::client::ApiClient), one per
//! resource of the task service.

pub mod attachments;
pub mod categories;
pub mod comments;
pub mod notifications;
pub mod projects;
pub mod search;
pub mod tags;
pub mod tasks;

pub use attachments::AttachmentService;
pub use categories::CategoryService;
pub use comments::CommentService;
pub use notifications::NotificationService;
pub use projects::ProjectService;
pub use search::SearchService;
pub use tags::TagService;
pub use tasks::TaskService;
