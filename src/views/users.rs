//! Users view - admin management of admins, experts and vendors.
//!
//! One controller instance per role tab; the backend returns the whole
//! user list and the tab filters it client-side by role equality.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::{require_token, Generation};
use crate::api::dto::{UserCreate, UserSummary, UserUpdate};
use crate::api::DhritiApi;
use crate::domain::Role;
use crate::error::Error;
use crate::session::SessionStore;
use crate::table::{Column, Row, TableConfig, TableView};

/// Form fields shared by the add and edit modals. On edit the email is
/// immutable and a blank password keeps the current one.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub password: String,
}

pub struct UsersController {
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
    tab: Role,
    rows: Mutex<Vec<UserSummary>>,
    generation: Generation,
}

impl UsersController {
    pub fn new(api: Arc<dyn DhritiApi>, session: Arc<SessionStore>, tab: Role) -> Self {
        Self {
            api,
            session,
            tab,
            rows: Mutex::new(Vec::new()),
            generation: Generation::default(),
        }
    }

    pub fn tab(&self) -> Role {
        self.tab
    }

    /// Fetch the user list and keep the rows for this tab's role. A newer
    /// refresh supersedes this one; on failure previously displayed rows
    /// stay untouched.
    pub async fn refresh(&self) -> Result<(), Error> {
        let seq = self.generation.begin();
        let token = require_token(&self.session)?;
        let users = self.api.list_users(&token).await?;
        if !self.generation.is_current(seq) {
            return Ok(());
        }
        let filtered: Vec<UserSummary> = users
            .into_iter()
            .filter(|u| Role::parse(&u.role) == Some(self.tab))
            .collect();
        *self.rows.lock().unwrap() = filtered;
        Ok(())
    }

    pub fn users(&self) -> Vec<UserSummary> {
        self.rows.lock().unwrap().clone()
    }

    pub fn find(&self, id: i64) -> Option<UserSummary> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn row(user: &UserSummary) -> Row {
        Row::new(user.id)
            .field("id", user.id)
            .field("name", user.name.clone().unwrap_or_default())
            .field("email", user.email.clone())
            .field("phone", user.phone.clone().unwrap_or_default())
            .field(
                "status",
                user.status.clone().unwrap_or_else(|| "Active".to_string()),
            )
            .field("role", user.role.clone())
    }

    fn dash_when_empty(value: &Value, _row: &Row) -> String {
        let text = crate::table::display_value(value);
        if text.is_empty() {
            "—".to_string()
        } else {
            text
        }
    }

    fn status_label(value: &Value, _row: &Row) -> String {
        let text = crate::table::display_value(value);
        if text.is_empty() {
            "Unknown".to_string()
        } else {
            text
        }
    }

    /// Tabular view of the current rows.
    pub fn table(&self, rows_per_page: usize) -> TableView {
        let columns = vec![
            Column::new("Name", "name"),
            Column::new("Email", "email"),
            Column::new("Phone", "phone").render(Self::dash_when_empty),
            Column::new("Status", "status").render(Self::status_label),
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

    /// Create a user on this tab. The role is pinned to the tab, never
    /// taken from the form.
    pub async fn create(&self, form: &UserForm) -> Result<UserSummary, Error> {
        let payload = UserCreate {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: normalize_phone(&form.phone),
            status: normalize_status(&form.status),
            role: self.tab.as_str().to_string(),
            password: form.password.trim().to_string(),
        };
        payload.validate()?;

        let token = require_token(&self.session)?;
        let created = self.api.create_user(&token, &payload).await?;
        info!("Created {} {}", self.tab, created.email);
        self.refresh().await?;
        Ok(created)
    }

    /// Update a user. A blank password is omitted so the backend keeps the
    /// current one.
    pub async fn update(&self, id: i64, form: &UserForm) -> Result<UserSummary, Error> {
        let password = form.password.trim();
        let payload = UserUpdate {
            name: Some(form.name.trim().to_string()),
            phone: normalize_phone(&form.phone),
            status: Some(normalize_status(&form.status)),
            role: Some(self.tab.as_str().to_string()),
            password: (!password.is_empty()).then(|| password.to_string()),
        };
        payload.validate()?;

        let token = require_token(&self.session)?;
        let updated = self.api.update_user(&token, id, &payload).await?;
        info!("Updated {} {}", self.tab, id);
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete a user and drop the row locally. Confirmation is the table
    /// layer's concern; by the time this runs the user already agreed.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let token = require_token(&self.session)?;
        self.api.delete_user(&token, id).await?;
        self.rows.lock().unwrap().retain(|u| u.id != id);
        info!("Deleted user {id}");
        Ok(())
    }
}

fn normalize_phone(phone: &Option<String>) -> Option<String> {
    phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
}

fn normalize_status(status: &str) -> String {
    let status = status.trim();
    if status.is_empty() {
        "Active".to_string()
    } else {
        status.to_string()
    }
}
