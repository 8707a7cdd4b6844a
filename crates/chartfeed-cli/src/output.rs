use std::collections::BTreeMap;

use serde_json::{Map, Value};

use chartfeed_core::{Series, UtcDateTime};

use crate::error::CliError;

/// Print a JSON value to stdout, optionally pretty-printed.
pub fn render(value: &Value, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Chart document shape: `{ "series": [ { "date": ..., "<metric>": ... } ] }`.
///
/// Columns are merged by date, outer-join style: a date missing from one
/// series yields an explicit null for that column.
pub fn document(columns: &[(String, Series)]) -> Value {
    let mut by_date: BTreeMap<UtcDateTime, Map<String, Value>> = BTreeMap::new();
    for (label, series) in columns {
        for point in series {
            by_date
                .entry(point.time)
                .or_default()
                .insert(label.clone(), point.value.into());
        }
    }

    let rows: Vec<Value> = by_date
        .into_iter()
        .map(|(time, mut values)| {
            let mut row = Map::new();
            row.insert("date".to_owned(), Value::String(time.format_date()));
            for (label, _) in columns {
                row.insert(label.clone(), values.remove(label.as_str()).unwrap_or(Value::Null));
            }
            Value::Object(row)
        })
        .collect();

    let mut document = Map::new();
    document.insert("series".to_owned(), Value::Array(rows));
    Value::Object(document)
}
