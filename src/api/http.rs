//! reqwest-backed implementation of the backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::dto::{
    Assignment, AssignmentRequest, DashboardSummary, LoginRequest, LoginResponse, Project,
    ProjectCreate, ProtectedResponse, TasksDashboard, UserCreate, UserSummary, UserUpdate,
};
use super::DhritiApi;
use crate::config::ApiConfig;
use crate::error::Error;

/// HTTP client for the platform backend.
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, Error> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extract the backend's `detail` message from a non-success response.
    /// An unparseable body falls back to the per-operation message instead
    /// of surfacing a decode error.
    async fn api_error(response: Response, fallback: &str) -> Error {
        #[derive(Deserialize)]
        struct ErrorBody {
            detail: Option<String>,
        }

        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| fallback.to_string());
        Error::Api { status, message }
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        fallback: &str,
    ) -> Result<T, Error> {
        if !response.status().is_success() {
            return Err(Self::api_error(response, fallback).await);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DhritiApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        debug!("POST /auth/login for {}", request.email);
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response, "Unable to sign in right now.").await
    }

    async fn whoami(&self, token: &str) -> Result<ProtectedResponse, Error> {
        let response = self
            .client
            .get(self.url("/protected"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to verify your session.").await
    }

    async fn dashboard_summary(&self, token: &str) -> Result<DashboardSummary, Error> {
        let response = self
            .client
            .get(self.url("/dashboard/summary"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to load dashboard right now.").await
    }

    async fn tasks_dashboard(&self, token: &str) -> Result<TasksDashboard, Error> {
        let response = self
            .client
            .get(self.url("/tasks/dashboard"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to load tasks right now.").await
    }

    async fn list_projects(&self, token: &str) -> Result<Vec<Project>, Error> {
        let response = self
            .client
            .get(self.url("/tasks/admin/projects"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to load projects right now.").await
    }

    async fn create_project(&self, token: &str, project: &ProjectCreate) -> Result<Project, Error> {
        debug!("POST /tasks/admin/projects ({})", project.name);
        let response = self
            .client
            .post(self.url("/tasks/admin/projects"))
            .bearer_auth(token)
            .json(project)
            .send()
            .await?;
        Self::read_json(response, "Unable to create project.").await
    }

    async fn list_task_users(&self, token: &str) -> Result<Vec<UserSummary>, Error> {
        let response = self
            .client
            .get(self.url("/tasks/admin/users"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to fetch users.").await
    }

    async fn create_assignment(
        &self,
        token: &str,
        assignment: &AssignmentRequest,
    ) -> Result<Assignment, Error> {
        debug!(
            "POST /tasks/admin/assignments (project {} -> user {})",
            assignment.project_id, assignment.user_id
        );
        let response = self
            .client
            .post(self.url("/tasks/admin/assignments"))
            .bearer_auth(token)
            .json(assignment)
            .send()
            .await?;
        Self::read_json(response, "Unable to assign project.").await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserSummary>, Error> {
        let response = self
            .client
            .get(self.url("/users"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response, "Unable to load users right now.").await
    }

    async fn create_user(&self, token: &str, user: &UserCreate) -> Result<UserSummary, Error> {
        debug!("POST /users ({})", user.email);
        let response = self
            .client
            .post(self.url("/users"))
            .bearer_auth(token)
            .json(user)
            .send()
            .await?;
        Self::read_json(response, "Unable to save user.").await
    }

    async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> Result<UserSummary, Error> {
        debug!("PUT /users/{id}");
        let response = self
            .client
            .put(self.url(&format!("/users/{id}")))
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        Self::read_json(response, "Unable to save user.").await
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), Error> {
        debug!("DELETE /users/{id}");
        let response = self
            .client
            .delete(self.url(&format!("/users/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() != StatusCode::NO_CONTENT {
            return Err(Self::api_error(response, "Unable to delete user.").await);
        }
        Ok(())
    }
}
