//! Parsing of the raw catalog document.
//!
//! The document is expected to look like
//! `{ "files": [ { "name": "...", "url": "...", "size": 123 }, ... ] }`.

use super::CatalogError;
use serde::Deserialize;

/// A single entry of the catalog document, before any normalization.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawTrackRecord {
    pub name: String,
    pub url: String,
    pub size: i64,
}

#[derive(Deserialize)]
struct CatalogDocument {
    files: Vec<serde_json::Value>,
}

/// Parses a catalog document into its records, preserving document order.
///
/// The envelope is decoded first so that a broken document and a broken
/// record are reported as different errors.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawTrackRecord>, CatalogError> {
    let document: CatalogDocument =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;

    document
        .files
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RawTrackRecord>(value).map_err(|e| CatalogError::Record {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_records_in_order() {
        let body = br#"{"files": [
            {"name": "Sunrise", "url": "http://a/1.mp3", "size": 3},
            {"name": "Moonlight", "url": "http://a/2.mp3", "size": 7, "extra": true}
        ]}"#;

        let records = parse_records(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Sunrise");
        assert_eq!(records[0].size, 3);
        assert_eq!(records[1].url, "http://a/2.mp3");
    }

    #[test]
    fn test_empty_file_list_is_not_an_error() {
        let records = parse_records(br#"{"files": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_files_key_is_parse_error() {
        let result = parse_records(br#"{"tracks": []}"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let result = parse_records(b"<html>nope</html>");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_files_not_a_list_is_parse_error() {
        let result = parse_records(br#"{"files": {"name": "x"}}"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_record_missing_url_reports_index() {
        let body = br#"{"files": [
            {"name": "ok", "url": "http://a/1.mp3", "size": 1},
            {"name": "broken", "size": 2}
        ]}"#;

        match parse_records(body) {
            Err(CatalogError::Record { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("url"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_size_is_record_error() {
        let body = br#"{"files": [{"name": "x", "url": "http://a/1.mp3", "size": "big"}]}"#;
        assert!(matches!(
            parse_records(body),
            Err(CatalogError::Record { index: 0, .. })
        ));
    }
}
