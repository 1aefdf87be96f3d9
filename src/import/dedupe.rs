//! Batch deduplication by case-insensitive business email.

use std::collections::HashSet;

use crate::db::models::SpeakerDraft;

/// Keep, for each distinct lower-cased business email, only the first
/// occurrence in original order. Later duplicates are dropped silently (the
/// caller folds them into its skipped count). Records with an empty business
/// email should never reach this stage; if one does, it is dropped.
#[must_use]
pub fn dedupe_by_email(batch: Vec<SpeakerDraft>) -> Vec<SpeakerDraft> {
    let mut seen = HashSet::new();
    batch
        .into_iter()
        .filter(|draft| {
            let key = draft.business_email.trim().to_lowercase();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str, first_name: &str) -> SpeakerDraft {
        SpeakerDraft {
            business_email: email.to_string(),
            first_name: first_name.to_string(),
            ..SpeakerDraft::default()
        }
    }

    #[test]
    fn first_occurrence_wins_case_insensitively() {
        let out = dedupe_by_email(vec![
            draft("a@x.com", "A"),
            draft("A@X.com", "B"),
        ]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].first_name, "A");
    }

    #[test]
    fn order_is_preserved() {
        let out = dedupe_by_email(vec![
            draft("c@x.com", "C"),
            draft("a@x.com", "A"),
            draft("c@x.com", "C2"),
            draft("b@x.com", "B"),
        ]);

        let names: Vec<_> = out.iter().map(|d| d.first_name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn empty_emails_are_dropped_defensively() {
        let out = dedupe_by_email(vec![draft("", "Z"), draft("a@x.com", "A")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].first_name, "A");
    }

    #[test]
    fn distinct_emails_all_survive() {
        let batch: Vec<_> = (0..10).map(|i| draft(&format!("u{i}@x.com"), "n")).collect();
        assert_eq!(dedupe_by_email(batch).len(), 10);
    }
}
