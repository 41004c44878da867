use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, Method};
use tracing::debug;

use crate::config::LoadTestConfig;
use crate::result::{RequestOptions, RequestResult};

/// Issues timed requests against one base URL.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection
/// pool between clones.
#[derive(Clone, Debug)]
pub struct RequestExecutor {
    client: Client,
    base_url: String,
}

impl RequestExecutor {
    pub fn new(config: &LoadTestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to construct HTTP client")?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs one request and always returns a result; transport failures
    /// are recorded with status 0.
    pub async fn execute(
        &self,
        user_id: usize,
        method: Method,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> RequestResult {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.request(method.clone(), url);
        if let Some(options) = options {
            if !options.query.is_empty() {
                request = request.query(&options.query);
            }
            if let Some(body) = &options.json {
                request = request.json(body);
            }
            for (name, value) in options.headers.iter() {
                request = request.header(name, value);
            }
        }

        let timestamp = Utc::now();
        let start = Instant::now();
        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                response.bytes().await.map(|body| (status, body.len()))
            }
            Err(err) => Err(err),
        };
        let response_time = start.elapsed();

        match outcome {
            Ok((status, size)) => RequestResult::from_response(
                user_id,
                method,
                endpoint,
                status,
                response_time,
                size,
                timestamp,
            ),
            Err(err) => {
                let message = describe_transport_error(&err);
                debug!(user_id, endpoint, error = %message, "request failed without response");
                RequestResult::from_transport_error(
                    user_id,
                    method,
                    endpoint,
                    message,
                    response_time,
                    timestamp,
                )
            }
        }
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_builder() {
        "invalid request"
    } else if err.is_body() || err.is_decode() {
        "failed to read response body"
    } else {
        "request error"
    };
    format!("{}: {}", kind, err)
}
