pub mod attachment;
pub mod category;
pub mod comment;
pub mod notification;
pub mod project;
pub mod search;
pub mod tag;
pub mod task;
pub mod token;
pub mod user;

use serde::{Deserialize, Serialize};

/// Body of a 204 response, or any response whose content is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}
