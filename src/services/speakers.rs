//! Speaker lead handlers: CRUD, duplicate check, CSV import and export.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthInfo;
use crate::db::models::{Speaker, SpeakerDraft};
use crate::error::{AppError, AppResult};
use crate::import::{ImportSummary, OwnerContext, parse_csv};
use crate::startup::AppState;
use crate::validation::require_valid_email;

/// Speaker fields accepted from clients. Everything defaults, matching the
/// store's empty-string/false defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpeakerPayload {
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

impl SpeakerPayload {
    fn into_draft(self, created_by: String) -> SpeakerDraft {
        SpeakerDraft {
            created_by,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            title: self.title,
            company: self.company,
            business_email: self.business_email.trim().to_string(),
            personal_email: self.personal_email,
            work_phone: self.work_phone,
            mobile_phone: self.mobile_phone,
            linkedin_url: self.linkedin_url,
            twitter_handle: self.twitter_handle,
            facebook_url: self.facebook_url,
            website: self.website,
            blog_url: self.blog_url,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            industry: self.industry,
            department: self.department,
            bio: self.bio,
            speaking_topics: self.speaking_topics,
            past_events: self.past_events,
            event_name: self.event_name,
            session_title: self.session_title,
            video_url: self.video_url,
            headshot_url: self.headshot_url,
            source: self.source,
            notes: self.notes,
            email_verified: self.email_verified,
            linkedin_verified: self.linkedin_verified,
            is_speaker: self.is_speaker,
            is_author: self.is_author,
            is_media: self.is_media,
            do_not_contact: self.do_not_contact,
        }
    }
}

fn can_touch(auth: &AuthInfo, speaker: &Speaker) -> bool {
    auth.is_admin || speaker.created_by.eq_ignore_ascii_case(&auth.email)
}

async fn visible_speakers(state: &AppState, auth: &AuthInfo) -> AppResult<Vec<Speaker>> {
    if auth.is_admin {
        state.db.speakers.list_all().await
    } else {
        state.db.speakers.list_by_owner(&auth.email).await
    }
}

/// `GET /v1/speakers`: own records, or all for admins.
pub async fn list_speakers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> AppResult<Json<Vec<Speaker>>> {
    Ok(Json(visible_speakers(&state, &auth).await?))
}

/// `POST /v1/speakers`: single add.
pub async fn create_speaker(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Json(payload): Json<SpeakerPayload>,
) -> AppResult<Json<Speaker>> {
    // Admins may credit another account; interns always own their records.
    let created_by = if auth.is_admin && !payload.created_by.trim().is_empty() {
        payload.created_by.trim().to_string()
    } else {
        auth.email.clone()
    };

    let draft = payload.into_draft(created_by);
    if !draft.business_email.is_empty() {
        require_valid_email(&draft.business_email)?;
    }

    let speaker = state.db.speakers.insert(&draft).await?;
    info!(speaker_id = %speaker.id, created_by = %speaker.created_by, "Speaker created");

    Ok(Json(speaker))
}

/// `PUT /v1/speakers/{id}`: update in place; `id` and `created_by` stay immutable.
pub async fn update_speaker(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SpeakerPayload>,
) -> AppResult<Json<Speaker>> {
    let existing = state.db.speakers.get(id).await?;
    if !can_touch(&auth, &existing) {
        return Err(AppError::PermissionDenied(
            "Not the owner of this record".to_string(),
        ));
    }

    let draft = payload.into_draft(existing.created_by.clone());
    if !draft.business_email.is_empty() {
        require_valid_email(&draft.business_email)?;
    }

    state.db.speakers.update(id, &draft).await?;
    Ok(Json(state.db.speakers.get(id).await?))
}

/// `DELETE /v1/speakers/{id}`
pub async fn delete_speaker(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Path(id): Path<Uuid>,
) -> AppResult<()> {
    let existing = state.db.speakers.get(id).await?;
    if !can_touch(&auth, &existing) {
        return Err(AppError::PermissionDenied(
            "Not the owner of this record".to_string(),
        ));
    }

    state.db.speakers.delete(id).await?;
    info!(speaker_id = %id, deleted_by = %auth.email, "Speaker deleted");
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct EmailCheckQuery {
    pub email: String,
    /// Record to exclude when editing an existing speaker.
    pub exclude: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EmailCheckResponse {
    pub in_use: bool,
}

/// `GET /v1/speakers/email-check`: inline duplicate feedback.
pub async fn email_check(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthInfo>,
    Query(query): Query<EmailCheckQuery>,
) -> AppResult<Json<EmailCheckResponse>> {
    let in_use = state
        .db
        .speakers
        .email_in_use(&query.email, query.exclude)
        .await?;
    Ok(Json(EmailCheckResponse { in_use }))
}

/// `POST /v1/speakers/import`: CSV body in, import counts out.
pub async fn import_speakers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    body: Bytes,
) -> AppResult<Json<ImportSummary>> {
    let parsed = parse_csv(&body)?;
    let owner = OwnerContext {
        email: auth.email.clone(),
        is_admin: auth.is_admin,
    };

    let summary = state
        .pipeline
        .import(&state.db.speakers, &parsed, &owner)
        .await?;

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        rows = parsed.rows.len(),
        by = %auth.email,
        "CSV import finished"
    );

    Ok(Json(summary))
}

/// `GET /v1/speakers/export`: visible records as CSV.
pub async fn export_speakers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> AppResult<impl IntoResponse> {
    let speakers = visible_speakers(&state, &auth).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for speaker in &speakers {
        writer
            .serialize(speaker)
            .map_err(|e| AppError::Internal(format!("CSV export error: {e}")))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export error: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"speakers.csv\"",
            ),
        ],
        body,
    ))
}
