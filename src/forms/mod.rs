//! Creation forms and the modal dialogs that submit them.
//!
//! Forms hold raw text as typed. Turning a form into a payload trims text,
//! leaves blank optional fields out, expands date-only input to a complete
//! timestamp and parses numeric input.

pub mod project;
pub mod task;

pub use project::{NewProjectModal, ProjectForm};
pub use task::{NewTaskModal, TaskForm};

use crate::client::ClientError;
use crate::dates;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a date (YYYY-MM-DD) or a timestamp, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{0}")]
    Submit(String),
}

impl From<ClientError> for FormError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http { message, .. } => FormError::Submit(message),
            other => FormError::Submit(other.to_string()),
        }
    }
}

/// Open/loading/error flags shared by the creation modals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub is_open: bool,
    pub is_loading: bool,
    /// Inline error shown under the form
    pub error: Option<String>,
}

impl ModalState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.error = None;
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn succeed(&mut self) {
        self.is_loading = false;
        self.is_open = false;
    }

    fn fail(&mut self, err: &FormError) {
        self.is_loading = false;
        self.error = Some(err.to_string());
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, FormError> {
    optional_text(value).ok_or(FormError::MissingField(field))
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_date(field: &'static str, value: &str) -> Result<Option<String>, FormError> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };

    dates::parse_flexible(&value)
        .map(|timestamp| Some(dates::to_timestamp(timestamp)))
        .ok_or(FormError::InvalidDate { field, value })
}

fn optional_number(field: &'static str, value: &str) -> Result<Option<i32>, FormError> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };

    value
        .parse()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber { field, value })
}
