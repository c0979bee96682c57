//! Session service: registration, login, logout, and session restore.
//!
//! Thin orchestration over the auth endpoints and the local session store.
//! The backend owns token refresh and session expiry; this service only
//! persists what login hands back and keeps the API client's bearer token
//! in step with the current session.

use tracing::{info, warn};

use courier_core::error::{CourierError, CourierResult};
use courier_models::{Database, Session};
use courier_api::ApiClient;
use courier_api::endpoints::auth::RegisterParams;
use courier_api::response::RegisteredUser;

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState};

/// Service managing authentication state.
pub struct SessionService {
    state: ServiceState,
    database: Database,
    event_bus: EventBus,
}

impl SessionService {
    /// Create a new SessionService.
    pub fn new(database: Database, event_bus: EventBus) -> Self {
        Self {
            state: ServiceState::Created,
            database,
            event_bus,
        }
    }

    // ─── Registration flow ───────────────────────────────────────────────

    /// Step 1: ask the backend to mail an activation code.
    pub async fn request_activation_code(
        &self,
        api: &ApiClient,
        email: &str,
    ) -> CourierResult<()> {
        api.request_activation_code(email).await?;
        info!("activation code requested for {email}");
        Ok(())
    }

    /// Step 2: verify the code the user typed in.
    pub async fn activate_email(
        &self,
        api: &ApiClient,
        email: &str,
        code: &str,
    ) -> CourierResult<()> {
        api.activate_email(email, code).await
    }

    /// Step 3: create the account with the verified code.
    pub async fn register(
        &self,
        api: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
        code: &str,
    ) -> CourierResult<RegisteredUser> {
        let params = RegisterParams {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            email_code: code.to_string(),
        };
        let user = api.register(&params).await?;
        info!("registered account {} ({})", user.id, user.email);
        Ok(user)
    }

    // ─── Login / logout ──────────────────────────────────────────────────

    /// Log in, persist the returned session as current, and install the
    /// bearer token on the API client.
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> CourierResult<Session> {
        let response = api.login(email, password).await?;

        let session = Session {
            user_id: response.user_id.clone(),
            access_token: response.access_token.clone(),
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            is_current: true,
        };

        {
            let conn = self.database.conn()?;
            session.save(&conn, true)?;
        }
        api.set_access_token(Some(response.access_token)).await;

        info!("logged in as {}", session.user_id);
        self.event_bus.emit(AppEvent::SessionChanged {
            user_id: Some(session.user_id.clone()),
        });
        Ok(session)
    }

    /// Reinstall the stored current session's token on the API client.
    /// Returns the session, or `NotLoggedIn` when none is stored.
    pub async fn restore(&self, api: &ApiClient) -> CourierResult<Session> {
        let session = {
            let conn = self.database.conn()?;
            Session::current(&conn)?
        }
        .ok_or(CourierError::NotLoggedIn)?;

        api.set_access_token(Some(session.access_token.clone())).await;
        info!("restored session for {}", session.user_id);
        Ok(session)
    }

    /// Log out: best-effort backend invalidation, then drop the current
    /// flag locally and clear the bearer token.
    pub async fn logout(&self, api: &ApiClient) -> CourierResult<()> {
        if let Err(e) = api.logout().await {
            // The local logout proceeds even when the backend is unreachable
            warn!("backend logout failed: {e}");
        }

        {
            let conn = self.database.conn()?;
            Session::clear_current(&conn)?;
        }
        api.set_access_token(None).await;

        info!("logged out");
        self.event_bus.emit(AppEvent::SessionChanged { user_id: None });
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The current session, if any.
    pub fn current_session(&self) -> CourierResult<Option<Session>> {
        let conn = self.database.conn()?;
        Session::current(&conn)
    }

    /// Whether a current session exists.
    pub fn is_logged_in(&self) -> CourierResult<bool> {
        Ok(self.current_session()?.is_some())
    }
}

impl Service for SessionService {
    fn name(&self) -> &str { "session" }
    fn state(&self) -> ServiceState { self.state }
    fn init(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Running;
        info!("session service initialized");
        Ok(())
    }
    fn shutdown(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Database {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let config = courier_core::config::DatabaseConfig::default();
        let db = Database::init(&path, &config).unwrap();
        std::mem::forget(dir);
        db
    }

    fn stored_session(db: &Database, user_id: &str, current: bool) {
        let conn = db.conn().unwrap();
        Session {
            user_id: user_id.into(),
            access_token: format!("token-{user_id}"),
            token_type: "Bearer".into(),
            refresh_token: format!("refresh-{user_id}"),
            is_current: current,
        }
        .save(&conn, current)
        .unwrap();
    }

    #[test]
    fn test_session_service_name() {
        let db = create_test_db();
        let svc = SessionService::new(db, EventBus::new(16));
        assert_eq!(svc.name(), "session");
    }

    #[test]
    fn test_logged_out_by_default() {
        let db = create_test_db();
        let svc = SessionService::new(db, EventBus::new(16));
        assert!(!svc.is_logged_in().unwrap());
        assert!(svc.current_session().unwrap().is_none());
    }

    #[test]
    fn test_current_session_lookup() {
        let db = create_test_db();
        let svc = SessionService::new(db.clone(), EventBus::new(16));

        stored_session(&db, "u1", true);
        assert!(svc.is_logged_in().unwrap());
        assert_eq!(svc.current_session().unwrap().unwrap().user_id, "u1");
    }

    #[tokio::test]
    async fn test_restore_installs_token() {
        let db = create_test_db();
        let svc = SessionService::new(db.clone(), EventBus::new(16));
        stored_session(&db, "u1", true);

        let api = ApiClient::new(&courier_core::config::BackendConfig {
            address: "https://api.courier.example".into(),
            ..Default::default()
        })
        .unwrap();

        assert!(!api.has_access_token().await);
        let session = svc.restore(&api).await.unwrap();
        assert_eq!(session.user_id, "u1");
        assert!(api.has_access_token().await);
    }

    #[tokio::test]
    async fn test_restore_without_session_fails() {
        let db = create_test_db();
        let svc = SessionService::new(db, EventBus::new(16));

        let api = ApiClient::new(&courier_core::config::BackendConfig {
            address: "https://api.courier.example".into(),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            svc.restore(&api).await,
            Err(CourierError::NotLoggedIn)
        ));
    }
}
