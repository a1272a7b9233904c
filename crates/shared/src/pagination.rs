//! Cursor-based pagination for log history listings.
//!
//! Cursors are opaque to clients: base64url(RFC3339_timestamp:id). The
//! composite keeps pagination stable when several log rows share the same
//! `updated_at`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a cursor from a row's `updated_at` and id.
pub fn encode_cursor(updated_at: DateTime<Utc>, id: i64) -> String {
    let raw = format!(
        "{}:{}",
        updated_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a cursor into `(updated_at, id)`.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, i64), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;
    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // Split on the last colon; the RFC3339 timestamp itself contains colons.
    let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;
    let id: i64 = s[colon_pos + 1..]
        .parse()
        .map_err(|_| CursorError::InvalidId)?;
    let updated_at = DateTime::parse_from_rfc3339(&s[..colon_pos])
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((updated_at, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_roundtrip() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 11, 14, 7, 38).unwrap();
        let cursor = encode_cursor(ts, 42);
        let (decoded_ts, decoded_id) = decode_cursor(&cursor).unwrap();
        assert_eq!(decoded_ts, ts);
        assert_eq!(decoded_id, 42);
    }

    #[test]
    fn test_roundtrip_preserves_microseconds() {
        let ts = Utc
            .with_ymd_and_hms(2025, 5, 11, 14, 7, 38)
            .unwrap()
            .with_nanosecond(654321000)
            .unwrap();
        let (decoded_ts, _) = decode_cursor(&encode_cursor(ts, 7)).unwrap();
        assert_eq!(decoded_ts.timestamp_micros(), ts.timestamp_micros());
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_cursor("!!not-base64!!"),
            Err(CursorError::InvalidEncoding)
        ));
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        let cursor = URL_SAFE_NO_PAD.encode(b"no-separator-here");
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidFormat)
        ));
    }

    #[test]
    fn test_decode_rejects_non_numeric_id() {
        let cursor = URL_SAFE_NO_PAD.encode(b"2025-05-11T14:07:38Z:abc");
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::InvalidId)));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let cursor = URL_SAFE_NO_PAD.encode(b"yesterday:42");
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidTimestamp)
        ));
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let cursor = encode_cursor(Utc::now(), i64::MAX);
        assert!(!cursor.contains('+'));
        assert!(!cursor.contains('/'));
        assert!(!cursor.contains('='));
    }
}
