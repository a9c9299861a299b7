//! Login and logout flows - the only writers of the session store.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::api::dto::LoginRequest;
use crate::api::DhritiApi;
use crate::error::Error;
use crate::guard::{dispatch_home, Route};
use crate::session::SessionStore;

pub struct LoginFlow {
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn DhritiApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Validate the form, exchange credentials for a token and persist it.
    /// Returns where the signed-in session lands from `/`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Route, Error> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.login(&request).await?;
        self.session.set_token(&response.access_token)?;
        info!("Signed in as {}", request.email);

        Ok(dispatch_home(&self.session.snapshot()))
    }

    /// Clear the persisted session.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.session.clear()?;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;
    use crate::api::dto::LoginResponse;
    use crate::session::Claims;
    use crate::views::stub::StubApi;

    fn flow_with(api: Arc<StubApi>) -> (LoginFlow, Arc<SessionStore>) {
        let session = Arc::new(SessionStore::in_memory());
        (LoginFlow::new(api, session.clone()), session)
    }

    #[tokio::test]
    async fn successful_login_persists_the_token() {
        let api = Arc::new(StubApi::default());
        let (flow, session) = flow_with(api.clone());

        // Stub answers with {access_token: "abc"}.
        flow.sign_in("user@test.com", "secret1").await.unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn invalid_form_blocks_the_network_call() {
        let api = Arc::new(StubApi::default());
        let (flow, session) = flow_with(api.clone());

        let err = flow.sign_in("not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = flow.sign_in("user@test.com", "12345").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(api.call_count(), 0);
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn landing_route_follows_the_token_role() {
        let api = Arc::new(StubApi::default());
        let claims = Claims {
            sub: "admin@test.com".to_string(),
            role: Some("admin".to_string()),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();
        api.login_responses.lock().unwrap().push_back(Ok(LoginResponse {
            access_token: token,
            token_type: None,
            role: Some("admin".to_string()),
        }));

        let (flow, _session) = flow_with(api);
        let landing = flow.sign_in("admin@test.com", "secret1").await.unwrap();
        assert_eq!(landing, Route::Dashboard);
    }

    #[tokio::test]
    async fn failed_login_leaves_the_session_empty() {
        let api = Arc::new(StubApi::default());
        api.login_responses
            .lock()
            .unwrap()
            .push_back(Err(Error::api(400, "Invalid credentials")));

        let (flow, session) = flow_with(api);
        let err = flow.sign_in("user@test.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn sign_out_clears_the_session() {
        let api = Arc::new(StubApi::default());
        let (flow, session) = flow_with(api);
        flow.sign_in("user@test.com", "secret1").await.unwrap();
        assert!(session.token().is_some());

        flow.sign_out().unwrap();
        assert_eq!(session.token(), None);
    }
}
