pub mod common;
pub mod project;
pub mod search;
pub mod task;
pub mod team;
pub mod user;

pub use common::{coerce_date, coerce_int, present, validate_required};
pub use project::{create_project, get_projects, CreateProjectRequest};
pub use search::{search, SearchParams};
pub use task::{
    create_task, get_tasks, get_user_tasks, update_task_status, CreateTaskRequest,
    TaskListParams,
};
pub use team::get_teams;
pub use user::{create_user, get_user, get_users};
