use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

/// Outcome of one timed request.
///
/// Only two constructors exist, one per outcome, so `success` always agrees
/// with `status_code` and `error` is only ever set when no response arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestResult {
    method: Method,
    endpoint: String,
    status_code: u16,
    response_time: Duration,
    success: bool,
    response_size: usize,
    error: Option<String>,
    user_id: usize,
    timestamp: DateTime<Utc>,
}

impl RequestResult {
    /// A response was received, whatever its status.
    pub fn from_response(
        user_id: usize,
        method: Method,
        endpoint: impl Into<String>,
        status_code: u16,
        response_time: Duration,
        response_size: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            status_code,
            response_time,
            success: is_success_status(status_code),
            response_size,
            error: None,
            user_id,
            timestamp,
        }
    }

    /// No response was obtained (DNS, connect, timeout, body read).
    pub fn from_transport_error(
        user_id: usize,
        method: Method,
        endpoint: impl Into<String>,
        error: impl Into<String>,
        response_time: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            status_code: 0,
            response_time,
            success: false,
            response_size: 0,
            error: Some(error.into()),
            user_id,
            timestamp,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 0 when the request never produced an HTTP response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn response_time(&self) -> Duration {
        self.response_time
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn response_size(&self) -> usize {
        self.response_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user_id(&self) -> usize {
        self.user_id
    }

    /// Wall-clock time the request was started.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

pub fn is_success_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}

/// Optional extras for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn json(body: Value) -> Self {
        Self {
            json: Some(body),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_follows_status_range() {
        let now = Utc::now();
        let cases = [
            (199, false),
            (200, true),
            (302, true),
            (399, true),
            (400, false),
            (503, false),
        ];
        for (status, expected) in cases {
            let result = RequestResult::from_response(
                0,
                Method::GET,
                "/",
                status,
                Duration::from_millis(5),
                10,
                now,
            );
            assert_eq!(result.success(), expected, "status {}", status);
            assert!(result.error().is_none());
        }
    }

    #[test]
    fn transport_error_has_zero_status_and_message() {
        let result = RequestResult::from_transport_error(
            4,
            Method::GET,
            "/health",
            "connection refused",
            Duration::from_millis(2),
            Utc::now(),
        );
        assert_eq!(result.status_code(), 0);
        assert!(!result.success());
        assert_eq!(result.response_size(), 0);
        assert_eq!(result.error(), Some("connection refused"));
        assert_eq!(result.user_id(), 4);
    }
}
