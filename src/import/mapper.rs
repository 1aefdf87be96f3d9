//! Field mapping: reshape a raw CSV row into canonical fields.

use std::collections::HashMap;

use super::aliases::{Field, FieldAliases};
use super::reader::RawRow;

/// Map one raw row (ordered header→value pairs) to canonical fields.
///
/// Unresolved headers are silently dropped. When several headers resolve to
/// the same canonical field, the last one in row order wins.
pub(crate) fn map_row(aliases: &FieldAliases, row: &RawRow) -> HashMap<Field, String> {
    let mut mapped = HashMap::new();
    for (header, value) in row {
        if let Some(field) = aliases.resolve(header) {
            mapped.insert(field, value.clone());
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolvable_headers_are_mapped() {
        let aliases = FieldAliases::standard();
        let mapped = map_row(
            &aliases,
            &row(&[
                ("First Name", "Ada"),
                ("Company", "Analytical Engines"),
                ("Work Email", "ada@engines.example"),
            ]),
        );

        assert_eq!(mapped.get(&Field::FirstName).unwrap(), "Ada");
        assert_eq!(mapped.get(&Field::Company).unwrap(), "Analytical Engines");
        assert_eq!(
            mapped.get(&Field::BusinessEmail).unwrap(),
            "ada@engines.example"
        );
    }

    #[test]
    fn unresolved_headers_are_dropped() {
        let aliases = FieldAliases::standard();
        let mapped = map_row(
            &aliases,
            &row(&[("Favorite Color", "green"), ("Email", "a@x.com")]),
        );

        assert_eq!(mapped.len(), 1);
        assert!(mapped.contains_key(&Field::BusinessEmail));
    }

    #[test]
    fn last_header_wins_when_aliases_collide() {
        let aliases = FieldAliases::standard();
        // "Email" and "Work Email" both resolve to the business email; the
        // later column in row order takes effect.
        let mapped = map_row(
            &aliases,
            &row(&[("Email", "first@x.com"), ("Work Email", "second@x.com")]),
        );

        assert_eq!(mapped.get(&Field::BusinessEmail).unwrap(), "second@x.com");
    }
}
