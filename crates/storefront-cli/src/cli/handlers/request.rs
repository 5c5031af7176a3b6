//! Ad-hoc request handler

use crate::error::{CliError, Result};
use console::style;
use serde_json::Value;
use storefront_client::{ApiResponse, Method, RequestSpec, StorefrontClient};

/// Send one request and print the outcome
pub async fn handle_request(
    client: &StorefrontClient,
    method: &str,
    path: &str,
    data: Option<String>,
    query: Vec<String>,
    raw: bool,
) -> Result<()> {
    let spec = build_spec(method, path, data.as_deref(), &query)?;

    match client.execute(spec).await {
        Ok(response) => {
            if raw {
                println!("{}", pretty(&response.into_body()));
            } else {
                println!("{}", render_response(&response));
            }
            Ok(())
        }
        Err(err) => Err(CliError::Api(err)),
    }
}

/// Turn command-line input into a request description
pub fn build_spec(
    method: &str,
    path: &str,
    data: Option<&str>,
    query: &[String],
) -> Result<RequestSpec> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| CliError::InvalidArgument(format!("unknown HTTP method '{method}'")))?;

    let mut spec = RequestSpec::new(method, path);

    for pair in query {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            CliError::InvalidArgument(format!("query '{pair}' is not in key=value form"))
        })?;
        spec = spec.query(key, value);
    }

    if let Some(data) = data {
        let body: Value = serde_json::from_str(data)
            .map_err(|e| CliError::InvalidArgument(format!("--data is not valid JSON: {e}")))?;
        spec = spec.json(body);
    }

    Ok(spec)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn render_response(response: &ApiResponse) -> String {
    format!(
        "{} {}\n{} {}\n\n{}",
        style("Status:").bold(),
        style(response.status()).green(),
        style("Request ID:").bold(),
        response.request_id(),
        pretty(response.body())
    )
}
