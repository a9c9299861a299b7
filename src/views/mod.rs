//! View controllers
//!
//! One controller per view. Each owns its row set, requires a session
//! token before touching the backend, and maps API shapes into the
//! generic table model. A controller's newest load supersedes any older
//! in-flight one; the stale result is discarded when it lands. Dropping a
//! `refresh` future abandons the request outright; tearing a view down
//! can never write state afterwards.

pub mod dashboard;
pub mod login;
pub mod projects;
pub mod tasks;
pub mod users;

pub use dashboard::DashboardController;
pub use login::LoginFlow;
pub use projects::ProjectsController;
pub use tasks::TasksController;
pub use users::UsersController;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::session::SessionStore;

/// Monotonic load sequencing shared by the controllers.
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    /// Start a load, invalidating any load begun earlier.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the load with this sequence number is still the latest.
    pub fn is_current(&self, seq: u64) -> bool {
        self.0.load(Ordering::SeqCst) == seq
    }
}

pub(crate) fn require_token(session: &SessionStore) -> Result<String, Error> {
    session.token().ok_or(Error::AuthRequired)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_generation_invalidates_older() {
        let generation = Generation::default();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }
}
