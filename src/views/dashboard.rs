use crate::client::ApiClient;
use crate::models::{Project, Task};
use crate::ui_state::UiState;
use crate::views::{TaskRow, ViewState};

/// Slice colors of the project status pie
pub const PIE_COLORS: [&str; 5] = ["#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub bar: &'static str,
    pub bar_grid: &'static str,
    pub text: &'static str,
    pub tooltip_background: &'static str,
}

impl ChartPalette {
    pub const LIGHT: ChartPalette = ChartPalette {
        bar: "#3B82F6",
        bar_grid: "#E5E7EB",
        text: "#111827",
        tooltip_background: "#FFFFFF",
    };

    pub const DARK: ChartPalette = ChartPalette {
        bar: "#3B82F6",
        bar_grid: "#374151",
        text: "#F9FAFB",
        tooltip_background: "#1F2937",
    };

    pub fn for_theme(ui: &UiState) -> Self {
        if ui.is_dark_mode() {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub priority_distribution: Vec<DistributionEntry>,
    pub project_status: Vec<DistributionEntry>,
    pub recent_tasks: Vec<TaskRow>,
    pub palette: ChartPalette,
}

impl Dashboard {
    pub fn build(tasks: &[Task], projects: &[Project], ui: &UiState) -> Self {
        Self {
            priority_distribution: priority_distribution(tasks),
            project_status: project_status_distribution(projects),
            recent_tasks: tasks.iter().map(TaskRow::from).collect(),
            palette: ChartPalette::for_theme(ui),
        }
    }

    /// Tasks of `project_id` plus all projects; either failing fails the page
    pub async fn load(client: &ApiClient, ui: &UiState, project_id: i32) -> ViewState<Dashboard> {
        let fetched =
            futures::future::try_join(client.get_tasks(project_id), client.get_projects()).await;

        ViewState::from_result(fetched, "data")
            .map(|(tasks, projects)| Dashboard::build(&tasks, &projects, ui))
    }
}

/// Task count per priority, in first-seen order; tasks without a priority are skipped
pub fn priority_distribution(tasks: &[Task]) -> Vec<DistributionEntry> {
    count_in_order(tasks.iter().filter_map(|task| task.priority.as_deref()))
}

/// Projects with an end date count as completed, the rest as active
pub fn project_status_distribution(projects: &[Project]) -> Vec<DistributionEntry> {
    count_in_order(projects.iter().map(|project| project.status().as_str()))
}

fn count_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = Vec::new();

    for name in names {
        match entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.count += 1,
            None => entries.push(DistributionEntry {
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    entries
}
