//! System announcement wire shapes (`/admin/announcements`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    /// Identifier field name has drifted across backend revisions.
    #[serde(
        alias = "ann_id",
        alias = "announcement_id",
        deserialize_with = "envelope::de_id"
    )]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_md: String,
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub visible_from: Option<DateTime<Utc>>,
}

/// `POST /admin/announcements` body. New announcements go live immediately.
#[derive(Debug, Clone, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub content_md: String,
    pub visible_from: DateTime<Utc>,
    pub is_active: bool,
}

impl NewAnnouncement {
    pub fn now(title: impl Into<String>, content_md: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_md: content_md.into(),
            visible_from: Utc::now(),
            is_active: true,
        }
    }
}

pub fn parse_announcements(v: &Value) -> Result<Vec<Announcement>> {
    envelope::items(v, None)
}
