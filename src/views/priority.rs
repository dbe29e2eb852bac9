use crate::client::ApiClient;
use crate::forms::NewTaskModal;
use crate::models::{Priority, Task};
use crate::views::{TaskCard, TaskRow, ViewState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Table,
}

/// Rendered content of a priority page, per view mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityTasks {
    List(Vec<TaskCard>),
    Table(Vec<TaskRow>),
}

/// Tasks of the signed-in user with one priority
#[derive(Debug, Clone)]
pub struct PriorityPage {
    pub priority: Priority,
    pub mode: ViewMode,
    pub new_task: NewTaskModal,
}

impl PriorityPage {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            mode: ViewMode::default(),
            new_task: NewTaskModal::default(),
        }
    }

    pub fn title(&self) -> String {
        format!("{} Priority Tasks", self.priority)
    }

    pub fn empty_message(&self) -> String {
        format!(
            "No {} priority tasks found.",
            self.priority.as_str().to_lowercase()
        )
    }

    pub fn filter<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|task| task.priority_value() == Some(self.priority))
            .collect()
    }

    pub fn render(&self, tasks: &[Task]) -> PriorityTasks {
        let matching = self.filter(tasks);
        match self.mode {
            ViewMode::List => {
                PriorityTasks::List(matching.into_iter().map(TaskCard::from).collect())
            }
            ViewMode::Table => {
                PriorityTasks::Table(matching.into_iter().map(TaskRow::from).collect())
            }
        }
    }

    /// Resolve the signed-in user, fetch their tasks and apply the filter
    pub async fn load(&self, client: &ApiClient) -> ViewState<PriorityTasks> {
        let tasks = match client.get_auth_user().await {
            Ok(me) => client.get_tasks_by_user(me.user_details.user_id).await,
            Err(err) => Err(err),
        };

        match ViewState::from_result(tasks, "tasks") {
            ViewState::Ready(tasks) if self.filter(&tasks).is_empty() => ViewState::Empty,
            state => state.map(|tasks| self.render(&tasks)),
        }
    }
}
