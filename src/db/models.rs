use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account model representing the account table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Account info without password hash - for listing accounts
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountInfo {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            is_admin: a.is_admin,
            created_at: a.created_at,
        }
    }
}

/// Parameters for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccountParams {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Speaker lead record as stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub created_by: String,

    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub business_email: String,
    pub personal_email: String,
    pub work_phone: String,
    pub mobile_phone: String,
    pub linkedin_url: String,
    pub twitter_handle: String,
    pub facebook_url: String,
    pub website: String,
    pub blog_url: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub industry: String,
    pub department: String,
    pub bio: String,
    pub speaking_topics: String,
    pub past_events: String,
    pub event_name: String,
    pub session_title: String,
    pub video_url: String,
    pub headshot_url: String,
    pub source: String,
    pub notes: String,

    pub email_verified: bool,
    pub linkedin_verified: bool,
    pub is_speaker: bool,
    pub is_author: bool,
    pub is_media: bool,
    pub do_not_contact: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Speaker record shape before persistence: everything except the
/// store-assigned id and timestamps. Produced by the import pipeline's
/// coercer and by the single-add handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerDraft {
    pub created_by: String,

    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub business_email: String,
    pub personal_email: String,
    pub work_phone: String,
    pub mobile_phone: String,
    pub linkedin_url: String,
    pub twitter_handle: String,
    pub facebook_url: String,
    pub website: String,
    pub blog_url: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub industry: String,
    pub department: String,
    pub bio: String,
    pub speaking_topics: String,
    pub past_events: String,
    pub event_name: String,
    pub session_title: String,
    pub video_url: String,
    pub headshot_url: String,
    pub source: String,
    pub notes: String,

    pub email_verified: bool,
    pub linkedin_verified: bool,
    pub is_speaker: bool,
    pub is_author: bool,
    pub is_media: bool,
    pub do_not_contact: bool,
}
