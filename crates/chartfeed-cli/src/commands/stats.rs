use std::str::FromStr;

use chartfeed_core::{change_over_range, change_summary, RangeToken};
use serde_json::json;

use crate::cli::StatsArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: &StatsArgs, pretty: bool) -> Result<(), CliError> {
    let series = super::load_series(&args.source, args.metric.as_deref()).await?;

    let payload = match args.range.as_deref() {
        Some(raw) => {
            let range = RangeToken::from_str(raw)?;
            json!({
                "source": args.source,
                "points": series.len(),
                "range": range.as_str(),
                "percent": change_over_range(&series, range),
            })
        }
        None => json!({
            "source": args.source,
            "points": series.len(),
            "latest": series.last(),
            "changes": change_summary(&series),
        }),
    };

    output::render(&payload, pretty)
}
