//! Conversion of heterogeneous raw records into canonical [`Series`].
//!
//! Metric feeds do not agree on field names: timestamps arrive under `t`,
//! `time`, `timestamp`, or `date`, as epochs or ISO strings; values arrive
//! under short provider keys (`p`, `c`, `v`) or domain keys (`fees`,
//! `buybacks_usd`). The probe orders below are the single source of truth
//! for which candidate wins when several are present.

use serde_json::{Map, Value};

use crate::{Point, Series, UtcDateTime};

/// Timestamp field candidates, tried in priority order.
pub const TIMESTAMP_KEYS: [&str; 4] = ["t", "time", "timestamp", "date"];

/// Value field candidates, tried in priority order when the caller does not
/// name a domain-specific key.
pub const VALUE_KEYS: [&str; 7] = ["p", "c", "close", "price", "v", "val", "value"];

/// Anonymous value aliases probed after a caller-supplied key. Named metric
/// feeds ship their numbers under these regardless of the metric; the
/// price-style aliases above must not leak into a named lookup, or a fees
/// probe of a price row would return the price.
pub const GENERIC_VALUE_KEYS: [&str; 3] = ["v", "val", "value"];

/// Epochs at or above this magnitude are interpreted as milliseconds.
/// 10^11 seconds is the year 5138; 10^11 milliseconds is 1973.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Convert raw JSON records into a canonical series.
///
/// Records that yield no timestamp or no finite numeric value are dropped;
/// one corrupt record never fails the batch. When `value_key` is given it is
/// probed first, followed only by the [`GENERIC_VALUE_KEYS`] aliases;
/// without it the full [`VALUE_KEYS`] order applies.
pub fn normalize(records: &[Value], value_key: Option<&str>) -> Series {
    let points = records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|record| {
            let time = extract_timestamp(record)?;
            let value = extract_value(record, value_key)?;
            Point::new(time, value).ok()
        })
        .collect();

    Series::from_unordered(points)
}

/// Locate the record array inside a fetched document.
///
/// Accepts `{ "series": [...] }`, `{ "rows": [...] }`, or a bare array.
pub fn document_records(document: &Value) -> Option<&[Value]> {
    match document {
        Value::Array(records) => Some(records),
        Value::Object(map) => map
            .get("series")
            .or_else(|| map.get("rows"))
            .and_then(Value::as_array)
            .map(Vec::as_slice),
        _ => None,
    }
}

fn extract_timestamp(record: &Map<String, Value>) -> Option<UtcDateTime> {
    for key in TIMESTAMP_KEYS {
        let Some(raw) = record.get(key) else {
            continue;
        };

        match raw {
            Value::Number(number) => {
                let epoch = number.as_i64().or_else(|| number.as_f64().map(|f| f as i64))?;
                let parsed = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
                    UtcDateTime::from_unix_millis(epoch)
                } else {
                    UtcDateTime::from_unix_seconds(epoch)
                };
                return parsed.ok();
            }
            Value::String(text) => return UtcDateTime::parse(text).ok(),
            Value::Null => continue,
            _ => return None,
        }
    }

    None
}

fn extract_value(record: &Map<String, Value>, value_key: Option<&str>) -> Option<f64> {
    let aliases: &[&str] = if value_key.is_some() {
        &GENERIC_VALUE_KEYS
    } else {
        &VALUE_KEYS
    };
    let candidates = value_key.into_iter().chain(aliases.iter().copied());

    for key in candidates {
        let Some(raw) = record.get(key) else {
            continue;
        };

        // Null means "no observation for this metric on this date"; keep
        // probing in case a later candidate carries the value.
        if raw.is_null() {
            continue;
        }

        let value = match raw {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        return value.filter(|v| v.is_finite());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_date_and_price_records() {
        let records = vec![
            json!({"date": "2024-01-02", "price": 2.0}),
            json!({"date": "2024-01-01", "price": 1.0}),
        ];

        let series = normalize(&records, None);
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn probes_timestamp_keys_in_priority_order() {
        // `t` wins over `date` when both are present.
        let records = vec![json!({"t": 1_706_659_200, "date": "1999-01-01", "close": 4.2})];

        let series = normalize(&records, None);
        assert_eq!(
            series.first().map(|p| p.time.format_rfc3339()).as_deref(),
            Some("2024-01-31T00:00:00Z")
        );
    }

    #[test]
    fn interprets_large_epochs_as_millis() {
        let records = vec![json!({"t": 1_706_659_200_000_i64, "p": 1.0})];

        let series = normalize(&records, None);
        assert_eq!(
            series.first().map(|p| p.time.format_rfc3339()).as_deref(),
            Some("2024-01-31T00:00:00Z")
        );
    }

    #[test]
    fn caller_key_wins_over_generic_keys() {
        let records = vec![json!({"date": "2024-01-01", "price": 1.0, "fees": 9.5})];

        let series = normalize(&records, Some("fees"));
        assert_eq!(series.first().map(|p| p.value), Some(9.5));
    }

    #[test]
    fn caller_key_does_not_fall_back_to_price_aliases() {
        // A fees probe of a price-only row must come back empty, not return
        // the price.
        let records = vec![json!({"date": "2024-01-01", "price": 1.0})];

        let series = normalize(&records, Some("fees"));
        assert!(series.is_empty());
    }

    #[test]
    fn caller_key_still_accepts_anonymous_aliases() {
        let records = vec![json!({"date": "2024-01-01", "v": 3.0})];

        let series = normalize(&records, Some("fees"));
        assert_eq!(series.first().map(|p| p.value), Some(3.0));
    }

    #[test]
    fn coerces_numeric_strings() {
        let records = vec![json!({"date": "2024-01-01", "value": "3.25"})];

        let series = normalize(&records, None);
        assert_eq!(series.first().map(|p| p.value), Some(3.25));
    }

    #[test]
    fn drops_malformed_records_without_failing_batch() {
        let records = vec![
            json!({"date": "2024-01-01", "price": 1.0}),
            json!({"price": 2.0}),
            json!({"date": "2024-01-02"}),
            json!({"date": "2024-01-03", "price": "not a number"}),
            json!({"date": "2024-01-04", "price": null}),
            json!("not even an object"),
            json!({"date": "2024-01-05", "price": 5.0}),
        ];

        let series = normalize(&records, None);
        assert_eq!(series.len(), 2);
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 5.0]);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = normalize(&[], None);
        assert!(series.is_empty());
    }

    #[test]
    fn finds_records_in_envelope_rows_or_bare_array() {
        let envelope = json!({"series": [{"date": "2024-01-01", "p": 1.0}]});
        assert_eq!(document_records(&envelope).map(<[Value]>::len), Some(1));

        let rows = json!({"rows": [{"date": "2024-01-01", "p": 1.0}]});
        assert_eq!(document_records(&rows).map(<[Value]>::len), Some(1));

        let bare = json!([{"date": "2024-01-01", "p": 1.0}]);
        assert_eq!(document_records(&bare).map(<[Value]>::len), Some(1));

        assert!(document_records(&json!({"data": []})).is_none());
        assert!(document_records(&json!(42)).is_none());
    }
}
