//! Entry row type and payload codec.

use crate::entry::Entry;
use crate::error::{GatelinkError, Result};

/// Raw row data from the entries table, before decoding the payload.
#[derive(Debug)]
pub struct EntryRow {
    pub name: String,
    pub payload: Vec<u8>,
}

impl TryFrom<EntryRow> for Entry {
    type Error = GatelinkError;

    fn try_from(row: EntryRow) -> Result<Self> {
        serde_json::from_slice(&row.payload).map_err(|e| GatelinkError::CorruptPayload {
            name: row.name,
            source: e,
        })
    }
}

/// Encode an entry into its opaque payload representation.
///
/// JSON is self-describing, and every field added after the first
/// release carries `#[serde(default)]`, so payloads written by older
/// builds keep decoding.
pub fn encode(entry: &Entry) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(entry)?)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::entry::Blacklist;

    fn decode(name: &str, payload: Vec<u8>) -> Result<Entry> {
        EntryRow {
            name: name.to_string(),
            payload,
        }
        .try_into()
    }

    #[test]
    fn test_round_trip_zero_value_entry() {
        let entry = Entry::new("", "")
            .with_creation(Utc.timestamp_opt(0, 0).unwrap());

        let payload = encode(&entry).expect("encode should succeed");
        let decoded = decode("", payload).expect("decode should succeed");
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_round_trip_full_entry() {
        let mut blacklist = Blacklist::new();
        blacklist.add("203.0.113.0/24");
        blacklist.add("!203.0.113.9");

        let mut entry = Entry::new("report", "https://example.com/q3.pdf")
            .with_creation(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
            .with_redirect(true)
            .with_filename("uploads/q3.pdf")
            .with_content_type("application/pdf")
            .with_deny_redirect("landing")
            .with_expiry(10);
        entry.blacklist = blacklist;
        entry.blacklist_hits = 4;
        entry.access_count = 7;
        entry.set_training(true);

        let payload = encode(&entry).expect("encode should succeed");
        let decoded = decode("report", payload).expect("decode should succeed");
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_round_trip_boundary_expiry() {
        let entry = Entry::new("once", "https://example.com")
            .with_creation(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
            .with_expiry(0);

        let payload = encode(&entry).expect("encode should succeed");
        let decoded = decode("once", payload).expect("decode should succeed");
        assert_eq!(decoded, entry);
        assert!(decoded.is_expired());
    }

    #[test]
    fn test_decode_tolerates_missing_optional_fields() {
        // A payload written before the optional fields existed.
        let payload = br#"{
            "name": "old",
            "url": "https://example.com",
            "redirect": true,
            "creation": "2023-11-14T22:13:20Z"
        }"#
        .to_vec();

        let entry = decode("old", payload).expect("decode should succeed");
        assert_eq!(entry.name, "old");
        assert!(entry.redirect);
        assert_eq!(entry.filename, None);
        assert!(entry.blacklist.is_empty());
        assert_eq!(entry.access_count, 0);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_decode_garbage_is_corrupt_payload() {
        let result = decode("bad", b"not json at all".to_vec());
        match result {
            Err(GatelinkError::CorruptPayload { name, .. }) => assert_eq!(name, "bad"),
            other => panic!("expected CorruptPayload, got {:?}", other),
        }
    }
}
