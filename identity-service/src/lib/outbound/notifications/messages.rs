use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::auth::models::ResetNotice;

/// Serializable envelope for notifications consumed by the mailer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum NotificationMessage {
    PasswordResetRequested(PasswordResetMessage),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetMessage {
    pub event_id: String,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

impl From<&ResetNotice> for NotificationMessage {
    fn from(notice: &ResetNotice) -> Self {
        NotificationMessage::PasswordResetRequested(PasswordResetMessage {
            event_id: uuid::Uuid::new_v4().to_string(),
            email: notice.email.to_string(),
            token: notice.token.clone(),
            expires_at: notice.expires_at,
            requested_at: Utc::now(),
        })
    }
}
