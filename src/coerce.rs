//! Lenient field coercion for service payloads.
//!
//! Every helper here is total: a missing key or a value of the wrong shape
//! yields the field default instead of an error, and conversion failures are
//! logged rather than propagated.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

/// A JSON object as delivered by the service.
pub type Fields = Map<String, Value>;

static TIMEZONE_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([-+])(\d\d)(:)?(\d\d)$").expect("timezone offset pattern"));

static MILLISECONDS_AND_ZONE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\.\d\d\d)?\s+([a-z]{3,4})$").expect("zone name pattern")
});

static COORDINATED_UTC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(T\d\d:\d\d:\d\dZ)$").expect("zulu pattern"));

type TimestampParser = fn(&str) -> Result<DateTime<FixedOffset>, String>;

/// Timestamp grammars in priority order. Only the first grammar whose
/// pattern matches is attempted.
static TIMESTAMP_GRAMMARS: [(&Lazy<Regex>, TimestampParser); 3] = [
    (&TIMEZONE_OFFSET, parse_numeric_offset),
    (&MILLISECONDS_AND_ZONE_NAME, parse_zone_name),
    (&COORDINATED_UTC, parse_zulu),
];

/// Render a JSON value the way it is stored in string fields.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn string_of(values: &Fields, key: &str) -> String {
    values.get(key).map(stringify).unwrap_or_default()
}

/// Integer value of `key`, or `0` when the key is absent or not convertible.
pub fn int_of(values: &Fields, key: &str) -> i64 {
    let Some(value) = values.get(key) else {
        return 0;
    };

    match coerce_int(value) {
        Some(n) => n,
        None => {
            warn!("Couldn't parse the int ({}: {}), defaulting to 0", key, value);
            0
        }
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Owned copy of the array under `key`; anything else gives an empty list.
pub fn list_of(values: &Fields, key: &str) -> Vec<Value> {
    match values.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

pub fn string_list_of(values: &Fields, key: &str) -> Vec<String> {
    list_of(values, key).iter().map(stringify).collect()
}

/// Parse the timestamp under `key`.
///
/// Returns `None` for an absent or null value, for a value no grammar
/// recognises, and for a value whose first matching grammar rejects it.
pub fn timestamp_of(values: &Fields, key: &str) -> Option<DateTime<FixedOffset>> {
    let raw = match values.get(key)? {
        Value::Null => return None,
        value => stringify(value),
    };

    let Some((_, parse)) = TIMESTAMP_GRAMMARS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&raw))
    else {
        warn!("Couldn't parse the date ({}): unrecognised format", raw);
        return None;
    };

    match parse(&raw) {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            warn!("Couldn't parse the date ({}). Error occurred: {}", raw, e);
            None
        }
    }
}

// 2009-03-19T21:47:17-04:00 or 2009-03-19T21:47:17-0400
fn parse_numeric_offset(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    let normalized = TIMEZONE_OFFSET.replace(raw, "${1}${2}${4}");
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%z").map_err(|e| e.to_string())
}

// 2009-03-19 21:47:17.000 UTC
fn parse_zone_name(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    let normalized = MILLISECONDS_AND_ZONE_NAME.replace(raw, " ${2}");
    let (datetime, zone) = normalized
        .rsplit_once(' ')
        .ok_or_else(|| "missing time zone name".to_string())?;

    let naive = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| e.to_string())?;

    match zone.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" => Ok(naive.and_utc().fixed_offset()),
        other => Err(format!("unsupported time zone name '{}'", other)),
    }
}

// 2020-01-01T00:00:00Z
fn parse_zulu(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_string_of() {
        let values = fields(json!({"name": "Domain Admin", "age": 42, "gone": null}));
        assert_eq!(string_of(&values, "name"), "Domain Admin");
        assert_eq!(string_of(&values, "age"), "42");
        assert_eq!(string_of(&values, "gone"), "");
        assert_eq!(string_of(&values, "missing"), "");
    }

    #[test]
    fn test_int_of_lenient() {
        let values = fields(json!({
            "plain": 7,
            "text": " 12 ",
            "float": 3.9,
            "flag": true,
            "word": "seven",
            "list": [1],
        }));
        assert_eq!(int_of(&values, "plain"), 7);
        assert_eq!(int_of(&values, "text"), 12);
        assert_eq!(int_of(&values, "float"), 3);
        assert_eq!(int_of(&values, "flag"), 1);
        assert_eq!(int_of(&values, "word"), 0);
        assert_eq!(int_of(&values, "list"), 0);
        assert_eq!(int_of(&values, "missing"), 0);
    }

    #[test]
    fn test_list_of() {
        let values = fields(json!({"hosts": ["ns1.example.com", "ns2.example.com"], "one": "x"}));
        assert_eq!(
            string_list_of(&values, "hosts"),
            vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()]
        );
        assert!(list_of(&values, "one").is_empty());
        assert!(list_of(&values, "missing").is_empty());
    }

    #[test]
    fn test_timestamp_with_offset() {
        let expected = FixedOffset::west_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2009, 3, 19, 21, 47, 17)
            .unwrap();

        for raw in ["2009-03-19T21:47:17-04:00", "2009-03-19T21:47:17-0400"] {
            let values = fields(json!({ "createdDate": raw }));
            let parsed = timestamp_of(&values, "createdDate").unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.offset().local_minus_utc(), -4 * 3600);
            assert_eq!(
                parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
                "2009-03-19 21:47:17"
            );
        }
    }

    #[test]
    fn test_timestamp_zulu() {
        let values = fields(json!({"updatedDate": "2020-01-01T00:00:00Z"}));
        let parsed = timestamp_of(&values, "updatedDate").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_timestamp_zone_name() {
        let values = fields(json!({
            "utc": "2014-02-21 05:01:39.000 UTC",
            "gmt": "2014-02-21 05:01:39 gmt",
            "est": "2014-02-21 05:01:39.000 EST",
        }));
        let expected = Utc.with_ymd_and_hms(2014, 2, 21, 5, 1, 39).unwrap();
        assert_eq!(timestamp_of(&values, "utc").unwrap(), expected);
        assert_eq!(timestamp_of(&values, "gmt").unwrap(), expected);
        assert!(timestamp_of(&values, "est").is_none());
    }

    #[test]
    fn test_timestamp_unparseable() {
        let values = fields(json!({
            "garbage": "next tuesday-ish",
            "null": null,
            "date_only": "2020-01-01",
        }));
        assert!(timestamp_of(&values, "garbage").is_none());
        assert!(timestamp_of(&values, "null").is_none());
        assert!(timestamp_of(&values, "date_only").is_none());
        assert!(timestamp_of(&values, "missing").is_none());
    }

    #[test]
    fn test_timestamp_first_match_commits() {
        // Matches the numeric offset grammar but is not a valid date.
        let values = fields(json!({"expiresDate": "2020-13-45T00:00:00+00:00"}));
        assert!(timestamp_of(&values, "expiresDate").is_none());
    }
}
