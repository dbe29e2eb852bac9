use crate::client::{ApiClient, Mutation};
use crate::forms::{
    optional_date, optional_number, optional_text, required_text, FormError, ModalState,
};
use crate::models::{NewTask, Priority, Status, Task};

/// New-task form, raw input as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Selects start unset; the server applies its defaults
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub tags: String,
    pub start_date: String,
    pub due_date: String,
    pub points: String,
    pub assigned_user_id: String,
    /// Only shown when the modal was opened outside a project
    pub project_id: String,
}

impl TaskForm {
    /// Build the create payload for `author_user_id`.
    /// `project_id` is the id supplied by the surrounding page, if any; it wins
    /// over the entered one.
    pub fn to_payload(
        &self,
        project_id: Option<i32>,
        author_user_id: i32,
    ) -> Result<NewTask, FormError> {
        let title = required_text("title", &self.title)?;
        let project_id = self.resolve_project_id(project_id)?;

        Ok(NewTask {
            title,
            description: optional_text(&self.description),
            status: self.status,
            priority: self.priority,
            tags: optional_text(&self.tags),
            start_date: optional_date("startDate", &self.start_date)?,
            due_date: optional_date("dueDate", &self.due_date)?,
            points: optional_number("points", &self.points)?,
            project_id,
            author_user_id,
            assigned_user_id: optional_number("assignedUserId", &self.assigned_user_id)?,
        })
    }

    fn resolve_project_id(&self, external: Option<i32>) -> Result<i32, FormError> {
        match external {
            Some(id) => Ok(id),
            None => optional_number("projectId", &self.project_id)?
                .ok_or(FormError::MissingField("projectId")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskModal {
    pub form: TaskForm,
    pub state: ModalState,
    /// Project of the page the modal was opened from
    pub project_id: Option<i32>,
}

impl NewTaskModal {
    pub fn for_project(project_id: i32) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    pub fn can_submit(&self) -> bool {
        let has_project = self.project_id.is_some() || !self.form.project_id.trim().is_empty();
        !self.form.title.trim().is_empty() && has_project && !self.state.is_loading
    }

    /// Validate, resolve the author from the signed-in user, then create the task
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Mutation<Task>, FormError> {
        // Validation runs before the author lookup so bad input never hits the network
        if let Err(err) = self.form.to_payload(self.project_id, 0) {
            self.state.error = Some(err.to_string());
            return Err(err);
        }

        self.state.begin();
        match self.create(client).await {
            Ok(created) => {
                tracing::info!(task_id = created.data.id, "Task created");
                self.form = TaskForm::default();
                self.state.succeed();
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Task creation failed");
                self.state.fail(&err);
                Err(err)
            }
        }
    }

    async fn create(&self, client: &ApiClient) -> Result<Mutation<Task>, FormError> {
        let author = client.get_auth_user().await?;
        let payload = self
            .form
            .to_payload(self.project_id, author.user_details.user_id)?;
        Ok(client.create_task(payload).await?)
    }
}
