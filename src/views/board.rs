use crate::client::{ApiClient, ClientResult, Mutation};
use crate::models::{Status, Task};
use crate::views::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub status: Status,
    pub tasks: Vec<Task>,
}

/// One column per status, in board order. Tasks whose stored status is not a
/// known value are left off the board.
pub fn group_by_status(tasks: &[Task]) -> Vec<BoardColumn> {
    Status::ALL
        .into_iter()
        .map(|status| BoardColumn {
            status,
            tasks: tasks
                .iter()
                .filter(|task| task.status_value() == Some(status))
                .cloned()
                .collect(),
        })
        .collect()
}

pub async fn load_board(client: &ApiClient, project_id: i32) -> ViewState<Vec<BoardColumn>> {
    ViewState::from_result(client.get_tasks(project_id).await, "tasks")
        .map(|tasks| group_by_status(&tasks))
}

/// Drop a card onto another column
pub async fn move_task(
    client: &ApiClient,
    task_id: i32,
    to: Status,
) -> ClientResult<Mutation<Task>> {
    client.update_task_status(task_id, to.as_str()).await
}
