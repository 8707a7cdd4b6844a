use std::sync::Arc;

use chartfeed_core::{FeedClient, ReqwestHttpClient, Series, SourceSpec};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::info;

use crate::cli::FetchArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: &FetchArgs, pretty: bool) -> Result<(), CliError> {
    let client =
        FeedClient::new(Arc::new(ReqwestHttpClient::new())).with_timeout_ms(args.timeout_ms);
    let document = fetch_document(&client, args).await?;

    match &args.out {
        Some(path) => {
            let body = serde_json::to_string_pretty(&document)?;
            std::fs::write(path, body)?;
            info!(path = %path.display(), "wrote chart document");
            Ok(())
        }
        None => output::render(&document, pretty),
    }
}

/// Fetch every requested metric concurrently and merge them by date into one
/// chart document, the shape a two-axis chart consumes directly.
pub(crate) async fn fetch_document(
    client: &FeedClient,
    args: &FetchArgs,
) -> Result<Value, CliError> {
    let labels: Vec<String> = if args.metrics.is_empty() {
        vec![String::from("value")]
    } else {
        args.metrics.clone()
    };

    let mut tasks = JoinSet::new();
    for (index, label) in labels.iter().enumerate() {
        // One cache entry per url+metric pair; the metrics of one document
        // are independent series.
        let mut spec = SourceSpec::new(format!("{}#{label}", args.url), &args.url);
        if !args.metrics.is_empty() {
            spec = spec.with_value_key(label);
        }
        for param in &args.params {
            let (name, value) = param.split_once('=').ok_or_else(|| {
                CliError::Command(format!("--param must be NAME=VALUE, got '{param}'"))
            })?;
            spec = spec.with_param(name, value);
        }

        let client = client.clone();
        tasks.spawn(async move { (index, client.load(&spec).await) });
    }

    let mut columns: Vec<Option<(String, Series)>> = vec![None; labels.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) =
            joined.map_err(|error| CliError::Command(format!("fetch task failed: {error}")))?;
        let series = result?;
        info!(
            url = args.url.as_str(),
            metric = labels[index].as_str(),
            points = series.len(),
            "fetched series"
        );
        columns[index] = Some((labels[index].clone(), (*series).clone()));
    }

    let columns: Vec<(String, Series)> = columns.into_iter().flatten().collect();
    Ok(output::document(&columns))
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use chartfeed_core::{HttpClient, HttpError, HttpRequest, HttpResponse};
    use serde_json::json;

    use super::*;

    /// Canned transport that returns the same document for every request.
    struct FixtureHttpClient {
        body: &'static str,
    }

    impl HttpClient for FixtureHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let _ = request;
            let response = HttpResponse::ok_json(self.body);
            Box::pin(async move { Ok(response) })
        }
    }

    fn fetch_args(metrics: &[&str]) -> FetchArgs {
        FetchArgs {
            url: String::from("https://feed.test/pump.json"),
            metrics: metrics.iter().map(|&m| m.to_owned()).collect(),
            params: Vec::new(),
            timeout_ms: 1_000,
            out: None,
        }
    }

    #[tokio::test]
    async fn two_metric_fetch_merges_rows_by_date() {
        let client = FeedClient::new(Arc::new(FixtureHttpClient {
            body: r#"{"series":[
                {"date":"2024-01-01","price":1.0,"fees":5.0},
                {"date":"2024-01-02","price":2.0}
            ]}"#,
        }));

        let document = fetch_document(&client, &fetch_args(&["price", "fees"]))
            .await
            .expect("must fetch");

        assert_eq!(
            document,
            json!({"series": [
                {"date": "2024-01-01", "price": 1.0, "fees": 5.0},
                {"date": "2024-01-02", "price": 2.0, "fees": null},
            ]})
        );
    }

    #[tokio::test]
    async fn metricless_fetch_uses_generic_probe_and_value_column() {
        let client = FeedClient::new(Arc::new(FixtureHttpClient {
            body: r#"{"series":[{"t":1704067200,"p":1.5}]}"#,
        }));

        let document = fetch_document(&client, &fetch_args(&[]))
            .await
            .expect("must fetch");

        assert_eq!(
            document,
            json!({"series": [{"date": "2024-01-01", "value": 1.5}]})
        );
    }

    #[tokio::test]
    async fn malformed_param_is_a_command_error() {
        let client = FeedClient::new(Arc::new(FixtureHttpClient {
            body: r#"{"series":[]}"#,
        }));

        let mut args = fetch_args(&["price"]);
        args.params.push(String::from("no-equals-sign"));

        let err = fetch_document(&client, &args).await.expect_err("must fail");
        assert!(matches!(err, CliError::Command(_)));
    }
}
