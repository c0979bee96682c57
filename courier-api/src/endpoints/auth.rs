//! Authentication and registration endpoints.
//!
//! Covers the linear registration flow (request activation code, activate
//! the email, register the account) and login. Token refresh is handled by
//! the backend client library and has no endpoint here.

use serde::Serialize;
use courier_core::error::{CourierError, CourierResult};
use courier_core::platform::Platform;
use crate::client::ApiClient;
use crate::response::{RegisteredUser, SessionResponse};

/// Parameters for registering a new account.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Activation code previously verified via `activate_email`.
    pub email_code: String,
}

impl ApiClient {
    /// Request an activation code to be mailed to the given address.
    pub async fn request_activation_code(&self, email: &str) -> CourierResult<()> {
        let body = serde_json::json!({ "email": email });
        self.post("/activate/send", &body).await?;
        Ok(())
    }

    /// Verify an activation code against an email address.
    ///
    /// Succeeds silently when the code matches; the backend answers
    /// `invalid-code` otherwise.
    pub async fn activate_email(&self, email: &str, code: &str) -> CourierResult<()> {
        let body = serde_json::json!({ "email": email, "code": code, "dryrun": true });
        self.post("/activate", &body).await?;
        Ok(())
    }

    /// Register a new account with a verified activation code.
    pub async fn register(&self, params: &RegisterParams) -> CourierResult<RegisteredUser> {
        let body = serde_json::to_value(params)
            .map_err(|e| CourierError::Serialization(e.to_string()))?;
        self.post_json("/register", &body).await
    }

    /// Log in with email and password. The device label helps the user tell
    /// their sessions apart on the backend.
    pub async fn login(&self, email: &str, password: &str) -> CourierResult<SessionResponse> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "label": Platform::hostname(),
        });
        self.post_json("/login", &body).await
    }

    /// Invalidate the current session on the backend.
    pub async fn logout(&self) -> CourierResult<()> {
        self.post("/logout", &serde_json::json!({})).await?;
        Ok(())
    }
}
