use std::collections::BTreeSet;

use chartfeed_core::{
    cumulative, document_records, normalize, scale, value_at_or_before, Series, UtcDateTime,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::DeriveArgs;
use crate::error::CliError;
use crate::output;

/// Price field fallbacks seen across exported documents.
const PRICE_KEYS: [&str; 2] = ["price", "price_usd"];

/// Buyback field fallbacks, USD-denominated names first.
const BUYBACK_KEYS: [&str; 4] = [
    "buybacks_usd",
    "buybacks",
    "buybacks_native_usd",
    "buybacks_native",
];

pub fn run(args: &DeriveArgs, pretty: bool) -> Result<(), CliError> {
    let body = std::fs::read_to_string(&args.input)?;
    let document: Value = serde_json::from_str(&body)?;
    let records = document_records(&document).ok_or_else(|| {
        CliError::Command(format!(
            "no series records found in '{}'",
            args.input.display()
        ))
    })?;

    let price = first_non_empty(records, &PRICE_KEYS);
    let buybacks = first_non_empty(records, &BUYBACK_KEYS);
    if buybacks.is_empty() {
        return Err(CliError::Command(format!(
            "no buyback series found in '{}' (tried {})",
            args.input.display(),
            BUYBACK_KEYS.join(", ")
        )));
    }

    let cum = cumulative(&buybacks);
    let mcap = args.circ_supply.map(|supply| scale(&price, supply));

    let mut dates: BTreeSet<UtcDateTime> = cum.iter().map(|point| point.time).collect();
    if let Some(mcap) = &mcap {
        dates.extend(mcap.iter().map(|point| point.time));
    }

    let rows: Vec<Value> = dates
        .iter()
        .map(|&time| {
            // Sampling at-or-before forward-fills both curves across gaps.
            let cum_value = value_at_or_before(&cum, time);
            let mcap_value = mcap.as_ref().and_then(|m| value_at_or_before(m, time));
            let pct_bought = match (cum_value, mcap_value) {
                (Some(bought), Some(mcap)) if mcap != 0.0 => Some(bought / mcap),
                _ => None,
            };

            json!({
                "date": time.format_date(),
                "cum_buybacks_usd": cum_value,
                "mcap_usd": mcap_value,
                "pct_bought": pct_bought,
            })
        })
        .collect();

    let derived = json!({ "series": rows });
    match &args.out {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&derived)?)?;
            info!(path = %path.display(), rows = dates.len(), "wrote derived document");
            Ok(())
        }
        None => output::render(&derived, pretty),
    }
}

fn first_non_empty(records: &[Value], keys: &[&str]) -> Series {
    keys.iter()
        .map(|&key| normalize(records, Some(key)))
        .find(|series| !series.is_empty())
        .unwrap_or_default()
}
