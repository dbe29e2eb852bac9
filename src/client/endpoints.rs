//! Declarative endpoint registry.
//!
//! Every backend operation the client knows about is one [`Endpoint`]
//! variant. The variant decides the HTTP method, the path, the body, the cache
//! key of its result and the tags it provides or invalidates, so the client
//! itself never special-cases a resource.

use reqwest::Method;
use serde_json::Value;

use crate::models::{NewProject, NewTask, NewUser, StatusUpdate};

/// Resource family a cached result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    Projects,
    Tasks,
    Users,
    Teams,
}

/// Cache tag: a whole collection (`id == None`) or a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub id: Option<i64>,
}

impl Tag {
    pub const fn collection(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    pub const fn item(kind: TagKind, id: i64) -> Self {
        Self { kind, id: Some(id) }
    }

    /// A collection tag invalidates every tag of its kind; an item tag only its own id
    pub fn is_invalidated_by(&self, invalidated: &Tag) -> bool {
        self.kind == invalidated.kind && (invalidated.id.is_none() || invalidated.id == self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    GetProjects,
    CreateProject(NewProject),
    GetTasks { project_id: i32 },
    GetTasksByUser { user_id: i32 },
    CreateTask(NewTask),
    UpdateTaskStatus { task_id: i32, status: String },
    GetUsers,
    GetUser { cognito_id: String },
    CreateUser(NewUser),
    GetTeams,
    Search { query: String },
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GetProjects => "getProjects",
            Endpoint::CreateProject(_) => "createProject",
            Endpoint::GetTasks { .. } => "getTasks",
            Endpoint::GetTasksByUser { .. } => "getTasksByUser",
            Endpoint::CreateTask(_) => "createTask",
            Endpoint::UpdateTaskStatus { .. } => "updateTaskStatus",
            Endpoint::GetUsers => "getUsers",
            Endpoint::GetUser { .. } => "getUser",
            Endpoint::CreateUser(_) => "createUser",
            Endpoint::GetTeams => "getTeams",
            Endpoint::Search { .. } => "search",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::CreateProject(_) | Endpoint::CreateTask(_) | Endpoint::CreateUser(_) => {
                Method::POST
            }
            Endpoint::UpdateTaskStatus { .. } => Method::PATCH,
            _ => Method::GET,
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::GetProjects | Endpoint::CreateProject(_) => "projects".to_string(),
            Endpoint::GetTasks { .. } | Endpoint::CreateTask(_) => "tasks".to_string(),
            Endpoint::GetTasksByUser { user_id } => format!("tasks/user/{}", user_id),
            Endpoint::UpdateTaskStatus { task_id, .. } => format!("tasks/{}/status", task_id),
            Endpoint::GetUsers | Endpoint::CreateUser(_) => "users".to_string(),
            Endpoint::GetUser { cognito_id } => format!("users/{}", cognito_id),
            Endpoint::GetTeams => "teams".to_string(),
            Endpoint::Search { .. } => "search".to_string(),
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::GetTasks { project_id } => vec![("projectId", project_id.to_string())],
            Endpoint::Search { query } => vec![("query", query.clone())],
            _ => Vec::new(),
        }
    }

    /// JSON body for writes
    pub fn body(&self) -> Result<Option<Value>, serde_json::Error> {
        let body = match self {
            Endpoint::CreateProject(project) => serde_json::to_value(project)?,
            Endpoint::CreateTask(task) => serde_json::to_value(task)?,
            Endpoint::CreateUser(user) => serde_json::to_value(user)?,
            Endpoint::UpdateTaskStatus { status, .. } => serde_json::to_value(StatusUpdate {
                status: status.clone(),
            })?,
            _ => return Ok(None),
        };
        Ok(Some(body))
    }

    /// Key under which a read result is cached; writes and uncached reads have none
    pub fn cache_key(&self) -> Option<String> {
        match self {
            Endpoint::GetProjects => Some("getProjects".to_string()),
            Endpoint::GetTasks { project_id } => Some(format!("getTasks({})", project_id)),
            Endpoint::GetTasksByUser { user_id } => Some(format!("getTasksByUser({})", user_id)),
            Endpoint::GetUsers => Some("getUsers".to_string()),
            Endpoint::GetTeams => Some("getTeams".to_string()),
            Endpoint::Search { query } => Some(format!("search({})", query)),
            _ => None,
        }
    }

    /// Tags a successful read result provides
    pub fn provides(&self, result: &Value) -> Vec<Tag> {
        match self {
            Endpoint::GetProjects => vec![Tag::collection(TagKind::Projects)],
            Endpoint::GetTasks { .. } | Endpoint::GetTasksByUser { .. } => {
                let mut tags = vec![Tag::collection(TagKind::Tasks)];
                tags.extend(item_ids(result).map(|id| Tag::item(TagKind::Tasks, id)));
                tags
            }
            Endpoint::GetUsers => vec![Tag::collection(TagKind::Users)],
            Endpoint::GetTeams => vec![Tag::collection(TagKind::Teams)],
            _ => Vec::new(),
        }
    }

    /// Tags a successful write invalidates
    pub fn invalidates(&self) -> Vec<Tag> {
        match self {
            Endpoint::CreateProject(_) => vec![Tag::collection(TagKind::Projects)],
            Endpoint::CreateTask(_) => vec![Tag::collection(TagKind::Tasks)],
            Endpoint::UpdateTaskStatus { task_id, .. } => {
                vec![Tag::item(TagKind::Tasks, i64::from(*task_id))]
            }
            Endpoint::CreateUser(_) => vec![Tag::collection(TagKind::Users)],
            _ => Vec::new(),
        }
    }
}

fn item_ids(result: &Value) -> impl Iterator<Item = i64> + '_ {
    result
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("id").and_then(Value::as_i64))
}
