//! CSV decoding into raw header→value rows.

use super::ImportError;

/// One raw CSV row: header→value pairs in column order. Order matters; the
/// mapper's last-write-wins tie-break is defined over it.
pub type RawRow = Vec<(String, String)>;

/// A decoded CSV file.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Headers as seen in the file, BOM-stripped and trimmed.
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Decode CSV bytes into raw rows.
///
/// Strips a leading byte-order mark, trims header and field whitespace, and
/// tolerates rows with a deviating field count (extra fields are dropped,
/// missing ones are absent from the row).
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedCsv, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 {
                h.trim_start_matches('\u{feff}')
            } else {
                h
            };
            h.trim().to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Parse(e.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(ParsedCsv { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_csv() {
        let parsed = parse_csv(b"Email,First Name\na@x.com,Ada\nb@x.com,Bob\n").unwrap();

        assert_eq!(parsed.headers, ["Email", "First Name"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.rows[0],
            vec![
                ("Email".to_string(), "a@x.com".to_string()),
                ("First Name".to_string(), "Ada".to_string()),
            ]
        );
    }

    #[test]
    fn strips_byte_order_mark_from_first_header() {
        let parsed = parse_csv("\u{feff}Email,Name\na@x.com,Ada\n".as_bytes()).unwrap();
        assert_eq!(parsed.headers[0], "Email");
    }

    #[test]
    fn trims_header_and_field_whitespace() {
        let parsed = parse_csv(b" Email , First Name \n a@x.com , Ada \n").unwrap();
        assert_eq!(parsed.headers, ["Email", "First Name"]);
        assert_eq!(parsed.rows[0][0].1, "a@x.com");
    }

    #[test]
    fn tolerates_short_rows() {
        let parsed = parse_csv(b"Email,First Name,City\na@x.com,Ada\n").unwrap();
        assert_eq!(parsed.rows[0].len(), 2);
    }

    #[test]
    fn unparseable_input_is_one_error() {
        // Invalid UTF-8 in a record
        let result = parse_csv(b"Email,Name\n\xff\xfe,bad\n");
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[test]
    fn empty_file_yields_no_rows() {
        let parsed = parse_csv(b"Email,Name\n").unwrap();
        assert!(parsed.rows.is_empty());
    }
}
