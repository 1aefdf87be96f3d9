//! Speaker repository, including the chunked transactional bulk insert.

use sqlx::postgres::PgPool;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{Speaker, SpeakerDraft};
use crate::error::AppError;

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Rows per multi-row INSERT statement. 38 binds per row keeps a full chunk
/// well under Postgres' 65535 bind parameter limit.
pub const INSERT_CHUNK_SIZE: usize = 200;

/// Column list shared by the single and bulk insert statements.
const INSERT_COLUMNS: &str = "id, created_by, first_name, last_name, full_name, title, company, \
     business_email, personal_email, work_phone, mobile_phone, linkedin_url, twitter_handle, \
     facebook_url, website, blog_url, street_address, city, state, postal_code, country, \
     industry, department, bio, speaking_topics, past_events, event_name, session_title, \
     video_url, headshot_url, source, notes, email_verified, linkedin_verified, is_speaker, \
     is_author, is_media, do_not_contact";

/// Skip-on-collision policy for the business email uniqueness index. An
/// existing row with the same email silently blocks the new row.
const ON_CONFLICT_SKIP: &str =
    " ON CONFLICT (LOWER(business_email)) WHERE business_email <> '' DO NOTHING";

fn push_draft_binds(b: &mut sqlx::query_builder::Separated<'_, '_, Postgres, &'static str>, r: &SpeakerDraft) {
    b.push_bind(Uuid::new_v4())
        .push_bind(r.created_by.clone())
        .push_bind(r.first_name.clone())
        .push_bind(r.last_name.clone())
        .push_bind(r.full_name.clone())
        .push_bind(r.title.clone())
        .push_bind(r.company.clone())
        .push_bind(r.business_email.clone())
        .push_bind(r.personal_email.clone())
        .push_bind(r.work_phone.clone())
        .push_bind(r.mobile_phone.clone())
        .push_bind(r.linkedin_url.clone())
        .push_bind(r.twitter_handle.clone())
        .push_bind(r.facebook_url.clone())
        .push_bind(r.website.clone())
        .push_bind(r.blog_url.clone())
        .push_bind(r.street_address.clone())
        .push_bind(r.city.clone())
        .push_bind(r.state.clone())
        .push_bind(r.postal_code.clone())
        .push_bind(r.country.clone())
        .push_bind(r.industry.clone())
        .push_bind(r.department.clone())
        .push_bind(r.bio.clone())
        .push_bind(r.speaking_topics.clone())
        .push_bind(r.past_events.clone())
        .push_bind(r.event_name.clone())
        .push_bind(r.session_title.clone())
        .push_bind(r.video_url.clone())
        .push_bind(r.headshot_url.clone())
        .push_bind(r.source.clone())
        .push_bind(r.notes.clone())
        .push_bind(r.email_verified)
        .push_bind(r.linkedin_verified)
        .push_bind(r.is_speaker)
        .push_bind(r.is_author)
        .push_bind(r.is_media)
        .push_bind(r.do_not_contact);
}

/// Database repository for speaker lead operations
#[derive(Debug, Clone)]
pub struct SpeakerRepository {
    pool: PgPool,
}

impl SpeakerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a speaker by ID
    pub async fn get(&self, id: Uuid) -> Result<Speaker, AppError> {
        sqlx::query_as::<_, Speaker>(r#"SELECT * FROM speaker WHERE id = $1 LIMIT 1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found("Speaker", id))
    }

    /// List every speaker (admin view)
    pub async fn list_all(&self) -> Result<Vec<Speaker>, AppError> {
        sqlx::query_as::<_, Speaker>(r#"SELECT * FROM speaker ORDER BY created_at DESC"#)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    /// List speakers created by one account (intern view)
    pub async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<Speaker>, AppError> {
        sqlx::query_as::<_, Speaker>(
            r#"
            SELECT *
              FROM speaker
             WHERE LOWER(created_by) = LOWER($1)
             ORDER BY created_at DESC
            "#,
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a single speaker, assigning a fresh id.
    ///
    /// A business email collision surfaces as `AppError::Conflict`; the
    /// uniqueness index is the invariant enforcer even when the caller
    /// already ran the duplicate check.
    pub async fn insert(&self, draft: &SpeakerDraft) -> Result<Speaker, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO speaker ({INSERT_COLUMNS}) "));
        qb.push_values(std::iter::once(draft), |mut b, r| {
            push_draft_binds(&mut b, r);
        });
        qb.push(" RETURNING *");

        qb.build_query_as::<Speaker>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err)
                    if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
                {
                    AppError::conflict("Speaker", "business email")
                }
                _ => e.into(),
            })
    }

    /// Insert a deduplicated batch, all chunks inside one transaction.
    ///
    /// Rows colliding with an already-stored business email are skipped by
    /// the conflict policy, never overwritten. Any other failure rolls the
    /// whole batch back. Returns the number of rows actually inserted.
    pub async fn insert_batch(&self, records: &[SpeakerDraft]) -> Result<u64, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut qb: QueryBuilder<'_, Postgres> =
                QueryBuilder::new(format!("INSERT INTO speaker ({INSERT_COLUMNS}) "));
            qb.push_values(chunk.iter(), |mut b, r| {
                push_draft_binds(&mut b, r);
            });
            qb.push(ON_CONFLICT_SKIP);

            let result = qb.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Update a speaker in place. `id` and `created_by` are immutable.
    pub async fn update(&self, id: Uuid, draft: &SpeakerDraft) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE speaker
               SET first_name = $2,
                   last_name = $3,
                   full_name = $4,
                   title = $5,
                   company = $6,
                   business_email = $7,
                   personal_email = $8,
                   work_phone = $9,
                   mobile_phone = $10,
                   linkedin_url = $11,
                   twitter_handle = $12,
                   facebook_url = $13,
                   website = $14,
                   blog_url = $15,
                   street_address = $16,
                   city = $17,
                   state = $18,
                   postal_code = $19,
                   country = $20,
                   industry = $21,
                   department = $22,
                   bio = $23,
                   speaking_topics = $24,
                   past_events = $25,
                   event_name = $26,
                   session_title = $27,
                   video_url = $28,
                   headshot_url = $29,
                   source = $30,
                   notes = $31,
                   email_verified = $32,
                   linkedin_verified = $33,
                   is_speaker = $34,
                   is_author = $35,
                   is_media = $36,
                   do_not_contact = $37,
                   updated_at = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.full_name)
        .bind(&draft.title)
        .bind(&draft.company)
        .bind(&draft.business_email)
        .bind(&draft.personal_email)
        .bind(&draft.work_phone)
        .bind(&draft.mobile_phone)
        .bind(&draft.linkedin_url)
        .bind(&draft.twitter_handle)
        .bind(&draft.facebook_url)
        .bind(&draft.website)
        .bind(&draft.blog_url)
        .bind(&draft.street_address)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.postal_code)
        .bind(&draft.country)
        .bind(&draft.industry)
        .bind(&draft.department)
        .bind(&draft.bio)
        .bind(&draft.speaking_topics)
        .bind(&draft.past_events)
        .bind(&draft.event_name)
        .bind(&draft.session_title)
        .bind(&draft.video_url)
        .bind(&draft.headshot_url)
        .bind(&draft.source)
        .bind(&draft.notes)
        .bind(draft.email_verified)
        .bind(draft.linkedin_verified)
        .bind(draft.is_speaker)
        .bind(draft.is_author)
        .bind(draft.is_media)
        .bind(draft.do_not_contact)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::conflict("Speaker", "business email")
            }
            _ => AppError::from(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Speaker", id));
        }

        Ok(())
    }

    /// Delete a speaker by ID
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM speaker WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Speaker", id));
        }

        Ok(())
    }

    /// Does any other stored record already use this business email?
    ///
    /// Case-insensitive; `exclude` skips the record being edited. A
    /// courtesy check for inline feedback; the uniqueness index still
    /// rejects races at persistence time.
    pub async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        if email.trim().is_empty() {
            return Ok(false);
        }

        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                  FROM speaker
                 WHERE business_email <> ''
                   AND LOWER(business_email) = LOWER($1)
                   AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(Into::into)
    }
}
