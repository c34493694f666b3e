//! Admin session state.
//!
//! The bearer credential and signed-in administrator are cached in memory
//! and mirrored to the profile store so a restart resumes the session.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use metrodesk_api::AdminUser;

use crate::profile::{keys, ProfileStore};
use crate::Result;

pub struct Session {
    profile: Arc<ProfileStore>,
    token: RwLock<Option<String>>,
    user: RwLock<Option<AdminUser>>,
}

impl Session {
    pub fn new(profile: Arc<ProfileStore>) -> Self {
        let token: Option<String> = profile.get_or_default(keys::ADMIN_TOKEN);
        let user: Option<AdminUser> = profile.get_or_default(keys::ADMIN_USER);
        Self {
            profile,
            token: RwLock::new(token),
            user: RwLock::new(user),
        }
    }

    /// Current bearer credential, if signed in.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn user(&self) -> Option<AdminUser> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn store_token(&self, token: &str) -> Result<()> {
        self.profile.put(keys::ADMIN_TOKEN, &token)?;
        *self.token.write().await = Some(token.to_string());
        debug!("session credential stored");
        Ok(())
    }

    pub async fn store_user(&self, user: &AdminUser) -> Result<()> {
        self.profile.put(keys::ADMIN_USER, user)?;
        *self.user.write().await = Some(user.clone());
        Ok(())
    }

    /// Drops the credential and the cached user. Safe to call repeatedly.
    pub async fn clear(&self) -> Result<()> {
        self.profile.delete(keys::ADMIN_TOKEN)?;
        self.profile.delete(keys::ADMIN_USER)?;
        *self.token.write().await = None;
        *self.user.write().await = None;
        info!("session cleared");
        Ok(())
    }
}
