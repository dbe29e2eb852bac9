use sea_orm::{ActiveModelTrait, NotSet, Set};

use taskdeck::entity::{comment, team};
use taskdeck::models::{CreateProject, CreateTask, NewUser, Project, Task, User};
use taskdeck::repositories::{ProjectRepository, TaskRepository, UserRepository};
use taskdeck::services::AuthService;
use taskdeck::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user: User,
    /// Identity-provider subject the token was issued for
    pub subject: String,
    pub token: String,
}

#[allow(dead_code)]
impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a user linked to an identity subject and issue a token for it
    pub async fn create_user(&self, username: &str) -> TestAuth {
        let subject = format!("sub-{}", username);
        let user = UserRepository::create(
            &self.state.db,
            &NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                cognito_id: Some(subject.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let token = AuthService::generate_token(&subject, Some(username), &self.state.config)
            .unwrap();

        TestAuth {
            user,
            subject,
            token,
        }
    }

    /// Token for a subject with no backend user record
    pub fn token_for(&self, subject: &str) -> String {
        AuthService::generate_token(subject, None, &self.state.config).unwrap()
    }

    pub async fn create_project(&self, name: &str) -> Project {
        let input = CreateProject {
            name: name.to_string(),
            description: None,
            start_date: None,
            end_date: None,
        };

        ProjectRepository::create(&self.state.db, &input)
            .await
            .unwrap()
    }

    pub async fn create_task(
        &self,
        project_id: i32,
        title: &str,
        author_user_id: i32,
        assigned_user_id: Option<i32>,
    ) -> Task {
        let input = CreateTask {
            title: title.to_string(),
            description: None,
            status: "To Do".to_string(),
            priority: "Medium".to_string(),
            tags: None,
            start_date: None,
            due_date: None,
            points: None,
            project_id,
            author_user_id,
            assigned_user_id,
        };

        TaskRepository::create(&self.state.db, &input)
            .await
            .unwrap()
    }

    pub async fn create_team(
        &self,
        team_name: &str,
        product_owner_user_id: Option<i32>,
        project_manager_user_id: Option<i32>,
    ) -> team::Model {
        team::ActiveModel {
            id: NotSet,
            team_name: Set(team_name.to_string()),
            product_owner_user_id: Set(product_owner_user_id),
            project_manager_user_id: Set(project_manager_user_id),
        }
        .insert(&self.state.db)
        .await
        .unwrap()
    }

    pub async fn add_comment(&self, task_id: i32, user_id: i32, text: &str) -> comment::Model {
        comment::ActiveModel {
            id: NotSet,
            text: Set(text.to_string()),
            task_id: Set(task_id),
            user_id: Set(user_id),
        }
        .insert(&self.state.db)
        .await
        .unwrap()
    }
}
