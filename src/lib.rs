//! # Dhriti.AI Console
//!
//! Client for the Dhriti.AI task-annotation platform: operators manage
//! projects, users and assignments; workers review their assigned
//! projects and ratings. The crate talks to the platform's REST backend
//! and renders everything through one generic tabular view.
//!
//! ## Architecture
//!
//! - **session**: token persistence and role derivation
//! - **guard**: role-based route resolution and redirects
//! - **table**: generic filterable, searchable, paginated grid
//! - **api**: REST client for the platform backend
//! - **views**: per-view controllers (dashboard, projects, users, tasks)
//!
//! The guard's role check is a navigation convenience only; the backend
//! authorizes every call on its own.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod guard;
pub mod session;
pub mod table;
pub mod views;

pub use config::{default_config_path, AppConfig};
pub use domain::Role;
pub use error::Error;
pub use session::SessionStore;
