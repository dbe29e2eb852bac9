//! Page view models.
//!
//! Each page turns client results into plain data ready to render. Nothing
//! here draws anything.

pub mod board;
pub mod dashboard;
pub mod priority;
pub mod task_card;
pub mod users;

pub use board::{group_by_status, load_board, move_task, BoardColumn};
pub use dashboard::{ChartPalette, Dashboard, DistributionEntry};
pub use priority::{PriorityPage, PriorityTasks, ViewMode};
pub use task_card::{TaskCard, TaskRow};
pub use users::{load_users, UserRow};

use crate::client::ClientError;

/// What a page shows for one data source
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    /// Failures become a generic message naming what could not be fetched;
    /// the detail only goes to the log
    pub fn from_result(result: Result<T, ClientError>, what: &str) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(err) => {
                tracing::error!(error = %err, "Error fetching {}", what);
                ViewState::Error(format!("Error fetching {}. Please try again later.", what))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Error(message) => ViewState::Error(message),
            ViewState::Empty => ViewState::Empty,
            ViewState::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// Like [`ViewState::from_result`], with an empty list shown as `Empty`
    pub fn from_list(result: Result<Vec<T>, ClientError>, what: &str) -> Self {
        match Self::from_result(result, what) {
            ViewState::Ready(items) if items.is_empty() => ViewState::Empty,
            state => state,
        }
    }
}
