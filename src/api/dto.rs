//! Wire DTOs for the platform backend
//!
//! Shapes mirror the REST API exactly; request payloads carry the
//! client-side field checks that block a submission before any network
//! call.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

// ── Auth ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Convenience copy of the role claim; the stored token stays the
    /// source of truth.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtectedResponse {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

// ── Dashboard ──────────────────────────────────────────────────

/// One stat card. `value` is a JSON value because the backend mixes
/// numbers with "—" placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStat {
    pub id: String,
    pub label: String,
    pub value: Value,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub stats: Vec<DashboardStat>,
}

// ── Projects ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub default_avg_task_time_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ProjectCreate {
    #[validate(length(min = 3, message = "Project name must be at least 3 characters."))]
    pub name: String,
    #[validate(length(min = 1, message = "Status is required."))]
    pub status: String,
    #[validate(range(min = 1, message = "Default task time must be at least 1 minute."))]
    pub default_avg_task_time_minutes: Option<i64>,
}

impl Default for ProjectCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            status: "Active".to_string(),
            default_avg_task_time_minutes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AssignmentRequest {
    pub user_id: i64,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[validate(range(min = 1, message = "Average task time must be at least 1 minute."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_task_time_minutes: Option<i64>,
    #[validate(range(min = 0, message = "Completed tasks cannot be negative."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_tasks: Option<i64>,
    #[validate(range(min = 0, message = "Pending tasks cannot be negative."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_tasks: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub status: String,
    #[serde(default)]
    pub avg_task_time_minutes: Option<i64>,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
}

// ── Users ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub role: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

/// Update payload. Email is immutable; the password is only sent when the
/// form left it non-blank.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ── Tasks ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AssignedProject {
    pub assignment_id: i64,
    pub project_id: i64,
    pub project_name: String,
    #[serde(default)]
    pub avg_task_time_minutes: Option<i64>,
    #[serde(default)]
    pub avg_task_time_label: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub completed_tasks: i64,
    #[serde(default)]
    pub pending_tasks: i64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskReview {
    pub id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
    /// Backend timestamps carry no offset.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksStats {
    pub assigned_projects: i64,
    pub tasks_completed: i64,
    pub tasks_pending: i64,
    #[serde(default)]
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksDashboard {
    #[serde(default)]
    pub stats: Option<TasksStats>,
    #[serde(default)]
    pub assignments: Vec<AssignedProject>,
    #[serde(default)]
    pub recent_reviews: Vec<TaskReview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_validation() {
        let ok = LoginRequest {
            email: "user@test.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = LoginRequest {
            email: "nope".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = LoginRequest {
            email: "user@test.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn login_response_tolerates_minimal_body() {
        let resp: LoginResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.role, None);
    }

    #[test]
    fn update_skips_absent_fields_but_keeps_phone() {
        let update = UserUpdate {
            name: Some("Ana".to_string()),
            phone: None,
            ..UserUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["name"], "Ana");
        assert!(body["phone"].is_null());
        assert!(body.get("password").is_none());
        assert!(body.get("role").is_none());
    }

    #[test]
    fn dashboard_stat_value_keeps_mixed_types() {
        let raw = r#"{"stats":[
            {"id":"a","label":"Active","value":4,"trend":"—","icon":"📁"},
            {"id":"b","label":"Avg","value":"—"}
        ]}"#;
        let summary: DashboardSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.stats.len(), 2);
        assert_eq!(summary.stats[0].value, serde_json::json!(4));
        assert_eq!(summary.stats[1].value, serde_json::json!("—"));
        assert_eq!(summary.stats[1].trend, None);
    }

    #[test]
    fn tasks_dashboard_defaults_missing_sections() {
        let dash: TasksDashboard = serde_json::from_str("{}").unwrap();
        assert!(dash.stats.is_none());
        assert!(dash.assignments.is_empty());
        assert!(dash.recent_reviews.is_empty());
    }

    #[test]
    fn review_timestamps_parse_without_an_offset() {
        let raw = r#"{
            "id": 1,
            "project_id": 2,
            "project_name": "Imaging",
            "rating": 4.5,
            "comment": null,
            "created_at": "2025-08-07T12:30:00"
        }"#;
        let review: TaskReview = serde_json::from_str(raw).unwrap();
        assert_eq!(review.project_name, "Imaging");
        assert_eq!(review.comment, None);
    }
}
