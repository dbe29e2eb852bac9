use crate::client::{ApiClient, Mutation};
use crate::forms::{optional_date, optional_text, required_text, FormError, ModalState};
use crate::models::{NewProject, Project};

/// New-project form, raw input as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl ProjectForm {
    pub fn to_payload(&self) -> Result<NewProject, FormError> {
        Ok(NewProject {
            name: required_text("name", &self.name)?,
            description: optional_text(&self.description),
            start_date: optional_date("startDate", &self.start_date)?,
            end_date: optional_date("endDate", &self.end_date)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProjectModal {
    pub form: ProjectForm,
    pub state: ModalState,
}

impl NewProjectModal {
    pub fn can_submit(&self) -> bool {
        !self.form.name.trim().is_empty() && !self.state.is_loading
    }

    pub async fn submit(&mut self, client: &ApiClient) -> Result<Mutation<Project>, FormError> {
        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.state.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.state.begin();
        match client.create_project(payload).await {
            Ok(created) => {
                tracing::info!(project_id = created.data.id, "Project created");
                self.form = ProjectForm::default();
                self.state.succeed();
                Ok(created)
            }
            Err(err) => {
                let err = FormError::from(err);
                tracing::warn!(error = %err, "Project creation failed");
                self.state.fail(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_optionals_are_left_out() {
        let form = ProjectForm {
            name: "Launch".to_string(),
            ..Default::default()
        };

        let payload = form.to_payload().unwrap();
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"name": "Launch"}));
    }

    #[test]
    fn test_dates_are_expanded() {
        let form = ProjectForm {
            name: " Launch ".to_string(),
            description: "Go-to-market".to_string(),
            start_date: "2024-03-01".to_string(),
            end_date: "".to_string(),
        };

        assert_eq!(
            serde_json::to_value(form.to_payload().unwrap()).unwrap(),
            json!({
                "name": "Launch",
                "description": "Go-to-market",
                "startDate": "2024-03-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_can_submit_needs_a_name() {
        let mut modal = NewProjectModal::default();
        assert!(!modal.can_submit());

        modal.form.name = "Launch".to_string();
        assert!(modal.can_submit());

        modal.state.is_loading = true;
        assert!(!modal.can_submit());
    }
}
