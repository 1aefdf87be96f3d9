//! Header normalization and the alias table mapping raw CSV headers to
//! canonical speaker fields.

use std::collections::HashMap;

/// A canonical speaker field an imported CSV column can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    FullName,
    Title,
    Company,
    BusinessEmail,
    PersonalEmail,
    WorkPhone,
    MobilePhone,
    LinkedinUrl,
    TwitterHandle,
    FacebookUrl,
    Website,
    BlogUrl,
    StreetAddress,
    City,
    State,
    PostalCode,
    Country,
    Industry,
    Department,
    Bio,
    SpeakingTopics,
    PastEvents,
    EventName,
    SessionTitle,
    VideoUrl,
    HeadshotUrl,
    Source,
    Notes,
    EmailVerified,
    LinkedinVerified,
    IsSpeaker,
    IsAuthor,
    IsMedia,
    DoNotContact,
    CreatedBy,
}

/// Known header spellings. Keys are normalized when the lookup is built, so
/// human-readable spellings are fine here.
const ALIASES: &[(&str, Field)] = &[
    ("first name", Field::FirstName),
    ("firstname", Field::FirstName),
    ("first", Field::FirstName),
    ("given name", Field::FirstName),
    ("last name", Field::LastName),
    ("lastname", Field::LastName),
    ("surname", Field::LastName),
    ("family name", Field::LastName),
    ("full name", Field::FullName),
    ("name", Field::FullName),
    ("speaker name", Field::FullName),
    ("title", Field::Title),
    ("job title", Field::Title),
    ("position", Field::Title),
    ("company", Field::Company),
    ("company name", Field::Company),
    ("organization", Field::Company),
    ("organisation", Field::Company),
    ("employer", Field::Company),
    ("email", Field::BusinessEmail),
    ("e-mail", Field::BusinessEmail),
    ("email address", Field::BusinessEmail),
    ("work email", Field::BusinessEmail),
    ("business email", Field::BusinessEmail),
    ("business e-mail", Field::BusinessEmail),
    ("company email", Field::BusinessEmail),
    ("personal email", Field::PersonalEmail),
    ("secondary email", Field::PersonalEmail),
    ("alternate email", Field::PersonalEmail),
    ("phone", Field::WorkPhone),
    ("phone number", Field::WorkPhone),
    ("telephone", Field::WorkPhone),
    ("work phone", Field::WorkPhone),
    ("office phone", Field::WorkPhone),
    ("mobile", Field::MobilePhone),
    ("mobile phone", Field::MobilePhone),
    ("cell", Field::MobilePhone),
    ("cell phone", Field::MobilePhone),
    ("linkedin", Field::LinkedinUrl),
    ("linkedin url", Field::LinkedinUrl),
    ("linkedin profile", Field::LinkedinUrl),
    ("twitter", Field::TwitterHandle),
    ("twitter handle", Field::TwitterHandle),
    ("x handle", Field::TwitterHandle),
    ("facebook", Field::FacebookUrl),
    ("facebook url", Field::FacebookUrl),
    ("website", Field::Website),
    ("web site", Field::Website),
    ("personal website", Field::Website),
    ("url", Field::Website),
    ("blog", Field::BlogUrl),
    ("blog url", Field::BlogUrl),
    ("address", Field::StreetAddress),
    ("street address", Field::StreetAddress),
    ("street", Field::StreetAddress),
    ("city", Field::City),
    ("town", Field::City),
    ("state", Field::State),
    ("province", Field::State),
    ("region", Field::State),
    ("zip", Field::PostalCode),
    ("zip code", Field::PostalCode),
    ("postal code", Field::PostalCode),
    ("postcode", Field::PostalCode),
    ("country", Field::Country),
    ("industry", Field::Industry),
    ("sector", Field::Industry),
    ("department", Field::Department),
    ("dept", Field::Department),
    ("bio", Field::Bio),
    ("biography", Field::Bio),
    ("about", Field::Bio),
    ("topics", Field::SpeakingTopics),
    ("topic", Field::SpeakingTopics),
    ("speaking topics", Field::SpeakingTopics),
    ("expertise", Field::SpeakingTopics),
    ("past events", Field::PastEvents),
    ("previous events", Field::PastEvents),
    ("past talks", Field::PastEvents),
    ("event", Field::EventName),
    ("event name", Field::EventName),
    ("conference", Field::EventName),
    ("session", Field::SessionTitle),
    ("session title", Field::SessionTitle),
    ("talk title", Field::SessionTitle),
    ("video", Field::VideoUrl),
    ("video url", Field::VideoUrl),
    ("talk video", Field::VideoUrl),
    ("headshot", Field::HeadshotUrl),
    ("headshot url", Field::HeadshotUrl),
    ("photo", Field::HeadshotUrl),
    ("photo url", Field::HeadshotUrl),
    ("source", Field::Source),
    ("lead source", Field::Source),
    ("notes", Field::Notes),
    ("comments", Field::Notes),
    ("remarks", Field::Notes),
    ("email verified", Field::EmailVerified),
    ("email valid", Field::EmailVerified),
    ("valid email", Field::EmailVerified),
    ("verified", Field::EmailVerified),
    ("linkedin verified", Field::LinkedinVerified),
    ("is speaker", Field::IsSpeaker),
    ("speaker", Field::IsSpeaker),
    ("has spoken", Field::IsSpeaker),
    ("is author", Field::IsAuthor),
    ("author", Field::IsAuthor),
    ("is media", Field::IsMedia),
    ("press", Field::IsMedia),
    ("do not contact", Field::DoNotContact),
    ("opt out", Field::DoNotContact),
    ("created by", Field::CreatedBy),
    ("owner", Field::CreatedBy),
    ("added by", Field::CreatedBy),
];

/// Normalize a raw CSV header: lower-cased, all whitespace removed.
///
/// Empty input returns an empty string. Pure, no failure mode.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Immutable alias lookup, built once at startup and owned by the pipeline.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    map: HashMap<String, Field>,
}

impl FieldAliases {
    /// Build the standard lookup from the alias table.
    #[must_use]
    pub fn standard() -> Self {
        let map = ALIASES
            .iter()
            .map(|(alias, field)| (normalize_header(alias), *field))
            .collect();
        Self { map }
    }

    /// Resolve a raw header to a canonical field, if recognized.
    #[must_use]
    pub fn resolve(&self, raw_header: &str) -> Option<Field> {
        self.map.get(&normalize_header(raw_header)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_case_insensitive() {
        for raw in ["Business Email", "  First\tName ", "LinkedIn URL"] {
            assert_eq!(normalize_header(raw), normalize_header(&raw.to_uppercase()));
        }
    }

    #[test]
    fn normalize_strips_all_whitespace() {
        let normalized = normalize_header(" Work \t E-mail \n");
        assert!(!normalized.contains(char::is_whitespace));
        assert_eq!(normalized, "worke-mail");
    }

    #[test]
    fn normalize_empty_input() {
        assert_eq!(normalize_header(""), "");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn resolves_email_spellings_to_business_email() {
        let aliases = FieldAliases::standard();
        for raw in ["Email", "WORK EMAIL", "Business E-Mail", "email address"] {
            assert_eq!(aliases.resolve(raw), Some(Field::BusinessEmail), "{raw}");
        }
    }

    #[test]
    fn unknown_headers_do_not_resolve() {
        let aliases = FieldAliases::standard();
        assert_eq!(aliases.resolve("favorite color"), None);
        assert_eq!(aliases.resolve(""), None);
    }

    #[test]
    fn name_spellings_resolve_distinctly() {
        let aliases = FieldAliases::standard();
        assert_eq!(aliases.resolve("First Name"), Some(Field::FirstName));
        assert_eq!(aliases.resolve("Surname"), Some(Field::LastName));
        assert_eq!(aliases.resolve("Name"), Some(Field::FullName));
    }
}
