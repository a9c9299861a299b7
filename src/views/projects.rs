//! Projects view - admin project list, creation and assignment.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::{require_token, Generation};
use crate::api::dto::{Assignment, AssignmentRequest, Project, ProjectCreate, UserSummary};
use crate::api::DhritiApi;
use crate::error::Error;
use crate::session::SessionStore;
use crate::table::{Column, Row, TableConfig, TableView};

pub struct ProjectsController {
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
    rows: Mutex<Vec<Project>>,
    generation: Generation,
}

impl ProjectsController {
    pub fn new(api: Arc<dyn DhritiApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            rows: Mutex::new(Vec::new()),
            generation: Generation::default(),
        }
    }

    pub async fn refresh(&self) -> Result<(), Error> {
        let seq = self.generation.begin();
        let token = require_token(&self.session)?;
        let projects = self.api.list_projects(&token).await?;
        if !self.generation.is_current(seq) {
            return Ok(());
        }
        *self.rows.lock().unwrap() = projects;
        Ok(())
    }

    pub fn projects(&self) -> Vec<Project> {
        self.rows.lock().unwrap().clone()
    }

    fn row(project: &Project) -> Row {
        Row::new(project.id)
            .field("id", project.id)
            .field("name", project.name.clone())
            .field("status", project.status.clone())
            .field(
                "default_avg_task_time_minutes",
                project.default_avg_task_time_minutes,
            )
    }

    fn minutes_label(value: &Value, _row: &Row) -> String {
        match value.as_i64() {
            Some(minutes) => format!("{minutes} min"),
            None => "—".to_string(),
        }
    }

    pub fn table(&self, rows_per_page: usize) -> TableView {
        let columns = vec![
            Column::new("Project Name", "name"),
            Column::new("Status", "status"),
            Column::new("Default Task Time", "default_avg_task_time_minutes")
                .render(Self::minutes_label)
                .align_right(),
        ];
        let rows = self.rows.lock().unwrap().iter().map(Self::row).collect();
        TableView::with_config(
            columns,
            rows,
            TableConfig {
                rows_per_page,
                ..TableConfig::default()
            },
        )
    }

    /// Create a project, then re-fetch so the list reflects server truth.
    pub async fn create(&self, payload: &ProjectCreate) -> Result<Project, Error> {
        payload.validate()?;
        let token = require_token(&self.session)?;
        let created = self.api.create_project(&token, payload).await?;
        info!("Created project {}", created.name);
        self.refresh().await?;
        Ok(created)
    }

    /// Users available in the assignment picker.
    pub async fn assignable_users(&self) -> Result<Vec<UserSummary>, Error> {
        let token = require_token(&self.session)?;
        self.api.list_task_users(&token).await
    }

    /// Assign a project to a user.
    pub async fn assign(&self, request: &AssignmentRequest) -> Result<Assignment, Error> {
        request.validate()?;
        let token = require_token(&self.session)?;
        let assignment = self.api.create_assignment(&token, request).await?;
        info!(
            "Assigned project {} to user {}",
            assignment.project_id, assignment.user_id
        );
        Ok(assignment)
    }
}
