mod derive;
mod fetch;
mod stats;

use std::sync::Arc;

use chartfeed_core::{document_records, normalize, FeedClient, ReqwestHttpClient, Series, SourceSpec};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Fetch(args) => fetch::run(args, cli.pretty).await,
        Command::Stats(args) => stats::run(args, cli.pretty).await,
        Command::Derive(args) => derive::run(args, cli.pretty),
    }
}

/// Load a series from a local document or an HTTP(S) resource.
pub(crate) async fn load_series(source: &str, metric: Option<&str>) -> Result<Series, CliError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let mut spec = SourceSpec::new(source, source);
        if let Some(metric) = metric {
            spec = spec.with_value_key(metric);
        }

        let client = FeedClient::new(Arc::new(ReqwestHttpClient::new()));
        let series = client.load(&spec).await?;
        Ok((*series).clone())
    } else {
        let body = std::fs::read_to_string(source)?;
        let document: serde_json::Value = serde_json::from_str(&body)?;
        let records = document_records(&document).ok_or_else(|| {
            CliError::Command(format!("no series records found in '{source}'"))
        })?;
        Ok(normalize(records, metric))
    }
}
