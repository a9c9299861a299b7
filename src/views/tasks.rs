//! Tasks view - the worker home: assigned projects, summary stats and
//! recent reviews.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{require_token, Generation};
use crate::api::dto::{AssignedProject, TaskReview, TasksDashboard};
use crate::api::DhritiApi;
use crate::error::Error;
use crate::session::SessionStore;
use crate::table::{Column, Row, TableConfig, TableView};

/// Headline numbers above the assignment grid. When the backend omits the
/// stats block they fall back to sums over the assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct TasksOverview {
    pub assigned_projects: i64,
    pub tasks_completed: i64,
    pub tasks_pending: i64,
    pub avg_rating: Option<f64>,
}

impl TasksOverview {
    pub fn avg_rating_label(&self) -> String {
        match self.avg_rating {
            Some(rating) => format!("{rating:.2}"),
            None => "—".to_string(),
        }
    }
}

pub struct TasksController {
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
    state: Mutex<TasksDashboard>,
    generation: Generation,
}

impl TasksController {
    pub fn new(api: Arc<dyn DhritiApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(TasksDashboard {
                stats: None,
                assignments: Vec::new(),
                recent_reviews: Vec::new(),
            }),
            generation: Generation::default(),
        }
    }

    pub async fn refresh(&self) -> Result<(), Error> {
        let seq = self.generation.begin();
        let token = require_token(&self.session)?;
        let dashboard = self.api.tasks_dashboard(&token).await?;
        if !self.generation.is_current(seq) {
            return Ok(());
        }
        *self.state.lock().unwrap() = dashboard;
        Ok(())
    }

    pub fn assignments(&self) -> Vec<AssignedProject> {
        self.state.lock().unwrap().assignments.clone()
    }

    pub fn recent_reviews(&self) -> Vec<TaskReview> {
        self.state.lock().unwrap().recent_reviews.clone()
    }

    pub fn overview(&self) -> TasksOverview {
        let state = self.state.lock().unwrap();
        let completed_sum: i64 = state.assignments.iter().map(|a| a.completed_tasks).sum();
        let pending_sum: i64 = state.assignments.iter().map(|a| a.pending_tasks).sum();
        match &state.stats {
            Some(stats) => TasksOverview {
                assigned_projects: stats.assigned_projects,
                tasks_completed: stats.tasks_completed,
                tasks_pending: stats.tasks_pending,
                avg_rating: stats.avg_rating,
            },
            None => TasksOverview {
                assigned_projects: state.assignments.len() as i64,
                tasks_completed: completed_sum,
                tasks_pending: pending_sum,
                avg_rating: None,
            },
        }
    }

    fn row(assignment: &AssignedProject) -> Row {
        Row::new(assignment.assignment_id)
            .field("assignment_id", assignment.assignment_id)
            .field("project_id", assignment.project_id)
            .field("project", assignment.project_name.clone())
            .field(
                "status",
                assignment
                    .status
                    .clone()
                    .unwrap_or_else(|| "Active".to_string()),
            )
            .field("avg_task_time_minutes", assignment.avg_task_time_minutes)
            .field("avg_task_time_label", assignment.avg_task_time_label.clone())
            .field("rating", assignment.rating)
            .field("completed_tasks", assignment.completed_tasks)
            .field("pending_tasks", assignment.pending_tasks)
    }

    fn avg_time_label(value: &Value, row: &Row) -> String {
        if let Some(label) = row.get("avg_task_time_label").and_then(Value::as_str) {
            return label.to_string();
        }
        match value.as_i64() {
            Some(minutes) => format!("{minutes} minutes"),
            None => "—".to_string(),
        }
    }

    fn rating_badge(value: &Value, _row: &Row) -> String {
        match value.as_f64() {
            Some(rating) => format!("★ {rating:.1}"),
            None => "No reviews".to_string(),
        }
    }

    pub fn table(&self, rows_per_page: usize) -> TableView {
        let columns = vec![
            Column::new("Project", "project"),
            Column::new("Status", "status"),
            Column::new("Avg Task Time", "avg_task_time_minutes").render(Self::avg_time_label),
            Column::new("Rating", "rating").render(Self::rating_badge),
            Column::new("Completed", "completed_tasks").align_right(),
            Column::new("Pending", "pending_tasks").align_right(),
        ];
        let state = self.state.lock().unwrap();
        let rows = state.assignments.iter().map(Self::row).collect();
        TableView::with_config(
            columns,
            rows,
            TableConfig {
                rows_per_page,
                ..TableConfig::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::TasksStats;
    use crate::views::stub::StubApi;

    fn assignment(id: i64, name: &str, rating: Option<f64>) -> AssignedProject {
        AssignedProject {
            assignment_id: id,
            project_id: id * 10,
            project_name: name.to_string(),
            avg_task_time_minutes: Some(12),
            avg_task_time_label: Some("12 minutes".to_string()),
            rating,
            completed_tasks: 5,
            pending_tasks: 3,
            status: Some("Active".to_string()),
        }
    }

    fn controller(api: Arc<StubApi>) -> TasksController {
        let session = Arc::new(SessionStore::in_memory());
        session.set_token("tok").unwrap();
        TasksController::new(api, session)
    }

    #[tokio::test]
    async fn renders_assignments_with_badges() {
        let api = Arc::new(StubApi::default());
        api.task_dashboards.lock().unwrap().push_back(Ok(TasksDashboard {
            stats: None,
            assignments: vec![
                assignment(1, "Imaging", Some(4.25)),
                assignment(2, "Speech", None),
            ],
            recent_reviews: Vec::new(),
        }));

        let controller = controller(api);
        controller.refresh().await.unwrap();

        let render = controller.table(10).render_page();
        assert_eq!(render.rows[0].cells[0], "Imaging");
        assert_eq!(render.rows[0].cells[2], "12 minutes");
        assert_eq!(render.rows[0].cells[3], "★ 4.2");
        assert_eq!(render.rows[1].cells[3], "No reviews");
    }

    #[tokio::test]
    async fn overview_prefers_backend_stats() {
        let api = Arc::new(StubApi::default());
        api.task_dashboards.lock().unwrap().push_back(Ok(TasksDashboard {
            stats: Some(TasksStats {
                assigned_projects: 7,
                tasks_completed: 100,
                tasks_pending: 20,
                avg_rating: Some(4.5),
            }),
            assignments: vec![assignment(1, "Imaging", None)],
            recent_reviews: Vec::new(),
        }));

        let controller = controller(api);
        controller.refresh().await.unwrap();

        let overview = controller.overview();
        assert_eq!(overview.assigned_projects, 7);
        assert_eq!(overview.tasks_completed, 100);
        assert_eq!(overview.avg_rating_label(), "4.50");
    }

    #[tokio::test]
    async fn overview_falls_back_to_assignment_sums() {
        let api = Arc::new(StubApi::default());
        api.task_dashboards.lock().unwrap().push_back(Ok(TasksDashboard {
            stats: None,
            assignments: vec![
                assignment(1, "Imaging", None),
                assignment(2, "Speech", None),
            ],
            recent_reviews: Vec::new(),
        }));

        let controller = controller(api);
        controller.refresh().await.unwrap();

        let overview = controller.overview();
        assert_eq!(overview.assigned_projects, 2);
        assert_eq!(overview.tasks_completed, 10);
        assert_eq!(overview.tasks_pending, 6);
        assert_eq!(overview.avg_rating_label(), "—");
    }

    #[tokio::test]
    async fn search_narrows_assignments() {
        let api = Arc::new(StubApi::default());
        api.task_dashboards.lock().unwrap().push_back(Ok(TasksDashboard {
            stats: None,
            assignments: vec![
                assignment(1, "Imaging", None),
                assignment(2, "Speech", None),
                assignment(3, "Imaging QA", None),
            ],
            recent_reviews: Vec::new(),
        }));

        let controller = controller(api);
        controller.refresh().await.unwrap();

        let mut table = controller.table(10);
        table.set_query("imaging");
        assert_eq!(table.filtered().len(), 2);
    }

    #[tokio::test]
    async fn requires_a_session_token() {
        let api = Arc::new(StubApi::default());
        let controller = TasksController::new(api.clone(), Arc::new(SessionStore::in_memory()));
        assert!(matches!(
            controller.refresh().await.unwrap_err(),
            Error::AuthRequired
        ));
        assert_eq!(api.call_count(), 0);
    }
}
