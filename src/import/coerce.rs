//! Record coercion: defaults, boolean parsing, derived fields, owner
//! injection and the row admission filter.

use std::collections::HashMap;

use super::OwnerContext;
use super::aliases::Field;
use crate::db::models::SpeakerDraft;

/// Parse a boolean-like CSV value. True exactly when the value, lower-cased,
/// is one of `true`, `1`, `yes`.
pub(crate) fn parse_flag(raw: Option<&String>) -> bool {
    raw.is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// Coerce a mapped row into a full draft record.
///
/// Returns `None` when the row has no usable business email: such rows are
/// rejected before deduplication and counted in neither total. All other
/// field validation is deferred to human review.
pub(crate) fn coerce_record(
    mapped: &HashMap<Field, String>,
    owner: &OwnerContext,
) -> Option<SpeakerDraft> {
    let business_email = mapped
        .get(&Field::BusinessEmail)
        .map(|v| v.trim())
        .unwrap_or_default();
    if business_email.is_empty() {
        return None;
    }

    let text = |field: Field| mapped.get(&field).cloned().unwrap_or_default();

    let first_name = text(Field::FirstName);
    let last_name = text(Field::LastName);
    let mut full_name = text(Field::FullName);
    if full_name.is_empty() {
        full_name = format!("{first_name} {last_name}").trim().to_string();
    }

    // Self-service imports always own their rows; admins may credit the
    // account named in the row.
    let created_by = match mapped.get(&Field::CreatedBy) {
        Some(v) if owner.is_admin && !v.trim().is_empty() => v.trim().to_string(),
        _ => owner.email.clone(),
    };

    Some(SpeakerDraft {
        created_by,
        first_name,
        last_name,
        full_name,
        title: text(Field::Title),
        company: text(Field::Company),
        business_email: business_email.to_string(),
        personal_email: text(Field::PersonalEmail),
        work_phone: text(Field::WorkPhone),
        mobile_phone: text(Field::MobilePhone),
        linkedin_url: text(Field::LinkedinUrl),
        twitter_handle: text(Field::TwitterHandle),
        facebook_url: text(Field::FacebookUrl),
        website: text(Field::Website),
        blog_url: text(Field::BlogUrl),
        street_address: text(Field::StreetAddress),
        city: text(Field::City),
        state: text(Field::State),
        postal_code: text(Field::PostalCode),
        country: text(Field::Country),
        industry: text(Field::Industry),
        department: text(Field::Department),
        bio: text(Field::Bio),
        speaking_topics: text(Field::SpeakingTopics),
        past_events: text(Field::PastEvents),
        event_name: text(Field::EventName),
        session_title: text(Field::SessionTitle),
        video_url: text(Field::VideoUrl),
        headshot_url: text(Field::HeadshotUrl),
        source: text(Field::Source),
        notes: text(Field::Notes),
        email_verified: parse_flag(mapped.get(&Field::EmailVerified)),
        linkedin_verified: parse_flag(mapped.get(&Field::LinkedinVerified)),
        is_speaker: parse_flag(mapped.get(&Field::IsSpeaker)),
        is_author: parse_flag(mapped.get(&Field::IsAuthor)),
        is_media: parse_flag(mapped.get(&Field::IsMedia)),
        do_not_contact: parse_flag(mapped.get(&Field::DoNotContact)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intern() -> OwnerContext {
        OwnerContext {
            email: "intern@example.com".to_string(),
            is_admin: false,
        }
    }

    fn admin() -> OwnerContext {
        OwnerContext {
            email: "admin@example.com".to_string(),
            is_admin: true,
        }
    }

    fn mapped(pairs: &[(Field, &str)]) -> HashMap<Field, String> {
        pairs.iter().map(|(f, v)| (*f, v.to_string())).collect()
    }

    #[test]
    fn row_without_business_email_is_rejected() {
        assert!(coerce_record(&mapped(&[(Field::FirstName, "Z")]), &intern()).is_none());
        assert!(
            coerce_record(&mapped(&[(Field::BusinessEmail, "   ")]), &intern()).is_none()
        );
    }

    #[test]
    fn absent_fields_default_to_empty_and_false() {
        let draft =
            coerce_record(&mapped(&[(Field::BusinessEmail, "a@x.com")]), &intern()).unwrap();

        assert_eq!(draft.company, "");
        assert_eq!(draft.notes, "");
        assert!(!draft.email_verified);
        assert!(!draft.do_not_contact);
    }

    #[test]
    fn full_name_is_derived_when_absent() {
        let draft = coerce_record(
            &mapped(&[
                (Field::BusinessEmail, "a@x.com"),
                (Field::FirstName, "Ada"),
                (Field::LastName, "Lovelace"),
            ]),
            &intern(),
        )
        .unwrap();
        assert_eq!(draft.full_name, "Ada Lovelace");

        // Only one part present: no stray whitespace
        let draft = coerce_record(
            &mapped(&[(Field::BusinessEmail, "a@x.com"), (Field::FirstName, "Ada")]),
            &intern(),
        )
        .unwrap();
        assert_eq!(draft.full_name, "Ada");
    }

    #[test]
    fn explicit_full_name_is_kept() {
        let draft = coerce_record(
            &mapped(&[
                (Field::BusinessEmail, "a@x.com"),
                (Field::FullName, "Countess Lovelace"),
                (Field::FirstName, "Ada"),
            ]),
            &intern(),
        )
        .unwrap();
        assert_eq!(draft.full_name, "Countess Lovelace");
    }

    #[test]
    fn boolean_coercion_accepts_known_truthy_spellings() {
        for truthy in ["true", "TRUE", "1", "yes", "Yes"] {
            let draft = coerce_record(
                &mapped(&[
                    (Field::BusinessEmail, "a@x.com"),
                    (Field::EmailVerified, truthy),
                ]),
                &intern(),
            )
            .unwrap();
            assert!(draft.email_verified, "{truthy}");
        }

        for falsy in ["false", "0", "no", "y", "on", ""] {
            let draft = coerce_record(
                &mapped(&[
                    (Field::BusinessEmail, "a@x.com"),
                    (Field::EmailVerified, falsy),
                ]),
                &intern(),
            )
            .unwrap();
            assert!(!draft.email_verified, "{falsy:?}");
        }
    }

    #[test]
    fn self_service_import_owns_its_rows() {
        // A created-by column in the file must not let interns assign rows
        // to someone else.
        let draft = coerce_record(
            &mapped(&[
                (Field::BusinessEmail, "a@x.com"),
                (Field::CreatedBy, "other@example.com"),
            ]),
            &intern(),
        )
        .unwrap();
        assert_eq!(draft.created_by, "intern@example.com");
    }

    #[test]
    fn admin_import_respects_row_owner() {
        let draft = coerce_record(
            &mapped(&[
                (Field::BusinessEmail, "a@x.com"),
                (Field::CreatedBy, "intern@example.com"),
            ]),
            &admin(),
        )
        .unwrap();
        assert_eq!(draft.created_by, "intern@example.com");

        // No owner in the row: falls back to the admin
        let draft =
            coerce_record(&mapped(&[(Field::BusinessEmail, "a@x.com")]), &admin()).unwrap();
        assert_eq!(draft.created_by, "admin@example.com");
    }
}
