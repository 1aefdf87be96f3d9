//! CSV import reconciliation pipeline.
//!
//! A raw CSV file flows through the field mapper (via the header
//! normalizer), the record coercer, the deduplicator and finally the bulk
//! upsert, which reports counts back to the caller. Every import entry
//! point shares this one pipeline.

pub mod aliases;
mod coerce;
pub mod dedupe;
mod mapper;
pub mod reader;

use serde::Serialize;
use thiserror::Error;

use crate::db::SpeakerRepository;
use crate::db::models::SpeakerDraft;
use crate::error::AppError;
pub use aliases::FieldAliases;
pub use reader::{ParsedCsv, RawRow, parse_csv};

/// How many of the headers seen are echoed back in a "no usable rows"
/// error, to help the user fix column naming.
const HEADER_SAMPLE_LEN: usize = 8;

/// Identity on whose behalf an import runs.
#[derive(Debug, Clone)]
pub struct OwnerContext {
    pub email: String,
    pub is_admin: bool,
}

/// Import failures reported to the caller as a single message.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not parse CSV input: {0}")]
    Parse(String),

    #[error("No rows with a business email found (headers seen: {})", .headers.join(", "))]
    NoUsableRows { headers: Vec<String> },
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        AppError::InvalidArgument(e.to_string())
    }
}

/// Result counts of one bulk import.
///
/// `skipped` is measured against the pre-deduplication batch size, so
/// batch-internal duplicates and store conflicts both fold into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: u64,
    pub skipped: u64,
}

/// The import pipeline with its immutable alias configuration, constructed
/// once at startup and shared via application state.
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    aliases: FieldAliases,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            aliases: FieldAliases::standard(),
        }
    }

    /// Map and coerce raw rows into draft records.
    ///
    /// Rows without a usable business email are excluded here, before
    /// deduplication, and count toward neither imported nor skipped totals.
    #[must_use]
    pub fn map_and_coerce(&self, rows: &[RawRow], owner: &OwnerContext) -> Vec<SpeakerDraft> {
        rows.iter()
            .filter_map(|row| {
                let mapped = mapper::map_row(&self.aliases, row);
                coerce::coerce_record(&mapped, owner)
            })
            .collect()
    }

    /// Run the full pipeline over a decoded CSV file and persist the batch.
    pub async fn import(
        &self,
        repo: &SpeakerRepository,
        parsed: &ParsedCsv,
        owner: &OwnerContext,
    ) -> Result<ImportSummary, AppError> {
        let drafts = self.map_and_coerce(&parsed.rows, owner);
        if drafts.is_empty() {
            let headers = parsed
                .headers
                .iter()
                .take(HEADER_SAMPLE_LEN)
                .cloned()
                .collect();
            return Err(ImportError::NoUsableRows { headers }.into());
        }

        bulk_import(repo, drafts).await
    }
}

/// Persist a coerced batch: dedupe within the batch, then insert everything
/// in one transaction with skip-on-conflict semantics.
pub async fn bulk_import(
    repo: &SpeakerRepository,
    drafts: Vec<SpeakerDraft>,
) -> Result<ImportSummary, AppError> {
    let submitted = drafts.len() as u64;
    let unique = dedupe::dedupe_by_email(drafts);
    let imported = repo.insert_batch(&unique).await?;

    Ok(ImportSummary {
        imported,
        skipped: submitted - imported,
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

    fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pipeline_maps_coerces_and_filters() {
        let pipeline = ImportPipeline::new();
        let rows = vec![
            raw_row(&[("Email", "a@x.com"), ("First Name", "A")]),
            raw_row(&[("Business Email", ""), ("First Name", "Z")]),
            raw_row(&[("email", "b@x.com"), ("Speaker", "yes")]),
        ];

        let drafts = pipeline.map_and_coerce(&rows, &intern());

        // The empty-email row is excluded before dedup
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].business_email, "a@x.com");
        assert_eq!(drafts[0].created_by, "intern@example.com");
        assert!(drafts[1].is_speaker);
    }

    #[test]
    fn batch_duplicates_keep_first_occurrence() {
        let pipeline = ImportPipeline::new();
        let rows = vec![
            raw_row(&[("Email", "a@x.com"), ("First Name", "A")]),
            raw_row(&[("email", "A@X.com"), ("First Name", "B")]),
        ];

        let drafts = pipeline.map_and_coerce(&rows, &intern());
        assert_eq!(drafts.len(), 2);

        let unique = dedupe::dedupe_by_email(drafts);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].first_name, "A");
    }

    #[test]
    fn parse_then_pipeline_end_to_end() {
        let parsed =
            parse_csv(b"Work Email,Given Name,Surname,Verified\nada@x.com,Ada,Lovelace,yes\n")
                .unwrap();
        let drafts = ImportPipeline::new().map_and_coerce(&parsed.rows, &intern());

        assert_eq!(drafts.len(), 1);
        let d = &drafts[0];
        assert_eq!(d.business_email, "ada@x.com");
        assert_eq!(d.full_name, "Ada Lovelace");
        assert!(d.email_verified);
    }

    #[test]
    fn no_usable_rows_error_lists_header_sample() {
        let err = ImportError::NoUsableRows {
            headers: vec!["Contact".to_string(), "Firm".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Contact"));
        assert!(msg.contains("Firm"));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::InvalidArgument(_)));
    }

    #[test]
    fn parse_error_converts_to_invalid_argument() {
        let err = parse_csv(b"Email,Name\n\xff\xfe,bad\n").unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(app, AppError::InvalidArgument(_)));
    }
}
