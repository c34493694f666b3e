//! Administrator authentication.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use metrodesk_api::auth::{
    parse_ack, parse_login, parse_reset_issued, AdminUser, ResetIssued, Role,
};

use crate::gateway::Backend;
use crate::session::Session;
use crate::signal::{Signal, SignalBus};
use crate::{DeskError, Result};

pub struct AuthResource {
    backend: Arc<dyn Backend>,
    session: Arc<Session>,
    bus: Arc<SignalBus>,
}

impl AuthResource {
    pub fn new(backend: Arc<dyn Backend>, session: Arc<Session>, bus: Arc<SignalBus>) -> Self {
        Self {
            backend,
            session,
            bus,
        }
    }

    /// Signs in. Only an `ADMIN` account results in a stored credential;
    /// any other role is rejected and the session stays untouched.
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DeskError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let v = self
            .backend
            .post("/auth/login", json!({ "email": email, "password": password }))
            .await?;
        let login = parse_login(&v)?;

        if !login.success {
            return Err(DeskError::Rejected(
                login.message.unwrap_or_else(|| "login failed".to_string()),
            ));
        }
        let token = login
            .token
            .ok_or_else(|| DeskError::Rejected("login response carried no token".to_string()))?;
        let user = login
            .user
            .ok_or_else(|| DeskError::Rejected("login response carried no user".to_string()))?;

        if user.role != Role::Admin {
            warn!("non-admin account {} refused back-office access", email);
            return Err(DeskError::Rejected(
                "account is not an administrator".to_string(),
            ));
        }

        self.session.store_token(&token).await?;
        self.session.store_user(&user).await?;
        info!("administrator {} signed in", user.email);
        Ok(user)
    }

    /// Starts a password reset. The backend includes the reset token in the
    /// response only on deployments that short-circuit mail delivery.
    pub async fn forgot_password(&self, email: &str) -> Result<ResetIssued> {
        if email.trim().is_empty() {
            return Err(DeskError::InvalidInput("email is required".to_string()));
        }
        let v = self
            .backend
            .post("/auth/forgot-password", json!({ "email": email }))
            .await?;
        let issued = parse_reset_issued(&v)?;
        if !issued.success {
            return Err(DeskError::Rejected(
                issued
                    .message
                    .unwrap_or_else(|| "reset request failed".to_string()),
            ));
        }
        Ok(issued)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        if token.trim().is_empty() || new_password.is_empty() {
            return Err(DeskError::InvalidInput(
                "reset token and new password are required".to_string(),
            ));
        }
        let v = self
            .backend
            .post(
                "/auth/reset-password",
                json!({ "token": token, "new_password": new_password }),
            )
            .await?;
        let ack = parse_ack(&v)?;
        if !ack.success {
            return Err(DeskError::Rejected(
                ack.message
                    .unwrap_or_else(|| "reset token invalid or expired".to_string()),
            ));
        }
        Ok(())
    }

    /// Signs out locally: clears the stored credential and announces it.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await?;
        self.bus.emit(Signal::LoggedOut);
        Ok(())
    }
}
