//! REST client for the platform backend
//!
//! The [`DhritiApi`] trait is the seam the view controllers talk through;
//! [`HttpApi`] is the reqwest implementation. Tests substitute their own
//! stub implementations.

pub mod dto;
pub mod http;

pub use http::HttpApi;

use async_trait::async_trait;

use crate::error::Error;
use dto::{
    Assignment, AssignmentRequest, DashboardSummary, LoginRequest, LoginResponse, Project,
    ProjectCreate, ProtectedResponse, TasksDashboard, UserCreate, UserSummary, UserUpdate,
};

/// Backend operations used by the views. Every call except `login` carries
/// a bearer token.
#[async_trait]
pub trait DhritiApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error>;
    async fn whoami(&self, token: &str) -> Result<ProtectedResponse, Error>;

    async fn dashboard_summary(&self, token: &str) -> Result<DashboardSummary, Error>;
    async fn tasks_dashboard(&self, token: &str) -> Result<TasksDashboard, Error>;

    async fn list_projects(&self, token: &str) -> Result<Vec<Project>, Error>;
    async fn create_project(&self, token: &str, project: &ProjectCreate) -> Result<Project, Error>;
    async fn list_task_users(&self, token: &str) -> Result<Vec<UserSummary>, Error>;
    async fn create_assignment(
        &self,
        token: &str,
        assignment: &AssignmentRequest,
    ) -> Result<Assignment, Error>;

    async fn list_users(&self, token: &str) -> Result<Vec<UserSummary>, Error>;
    async fn create_user(&self, token: &str, user: &UserCreate) -> Result<UserSummary, Error>;
    async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> Result<UserSummary, Error>;
    async fn delete_user(&self, token: &str, id: i64) -> Result<(), Error>;
}
