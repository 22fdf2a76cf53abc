use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::application::AppError;
use crate::domain::DateRange;

use super::TransactionSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches transactions from the backend's JSON endpoint, forwarding the
/// date range as `start_date` / `end_date` query parameters.
#[derive(Debug, Clone)]
pub struct HttpTransactionSource {
    http: Client,
    url: Url,
}

impl HttpTransactionSource {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid backend URL '{}'", url))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, url })
    }

    /// The backend URL with the range's bounds appended as query parameters.
    pub fn request_url(&self, range: &DateRange) -> Url {
        let mut url = self.url.clone();
        if !range.is_unbounded() {
            let mut query = url.query_pairs_mut();
            if let Some(start) = range.start {
                query.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
            }
            if let Some(end) = range.end {
                query.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
            }
        }
        url
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn fetch(&self, range: &DateRange) -> Result<Value, AppError> {
        let url = self.request_url(range);
        tracing::debug!("Fetching transactions from {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::InvalidPayload(format!("response body is not JSON: {}", e)))?;
        Ok(payload)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
