mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Result, bail};

use crate::parser::Payload;

/// Performs the single polling GET and tags the body by content type.
///
/// `application/json` bodies come back as [`Payload::Json`]; everything
/// else is treated as text (CSV/TSV, or JSON served as plain text by the
/// spreadsheet script).
///
/// # Errors
///
/// Fails on network errors, a non-success HTTP status, or a JSON content
/// type whose body does not decode.
pub async fn fetch_payload<C: HttpClient>(client: &C, url: &str) -> Result<Payload> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("endpoint returned HTTP {status}");
    }

    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        Ok(Payload::Json(resp.json().await?))
    } else {
        Ok(Payload::Text(resp.text().await?))
    }
}
