use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::stats::PerformanceReport;

pub const NO_RESULTS_MESSAGE: &str = "No test results available";

/// JSON document for a run; an empty run becomes an `error` object.
pub fn report_json(report: Option<&PerformanceReport>) -> Result<Value> {
    match report {
        Some(report) => serde_json::to_value(report).context("failed to serialise report"),
        None => Ok(json!({ "error": NO_RESULTS_MESSAGE })),
    }
}

pub async fn write_report(path: &Path, report: Option<&PerformanceReport>) -> Result<()> {
    let document = report_json(report)?;
    let bytes = serde_json::to_vec_pretty(&document).context("failed to encode report")?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write report to {}", path.display()))
}

/// Console rendering: headline summary followed by one line per endpoint.
pub fn render_summary(report: Option<&PerformanceReport>) -> String {
    let Some(report) = report else {
        return format!("{}\n", NO_RESULTS_MESSAGE);
    };

    let rule = "=".repeat(60);
    let summary = &report.summary;
    let mut out = String::new();
    out.push_str(&format!("\n{}\nLOAD TEST RESULTS\n{}\n", rule, rule));
    out.push_str(&format!("Total Requests: {}\n", summary.total_requests));
    out.push_str(&format!(
        "Successful: {} ({:.1}%)\n",
        summary.successful_requests, summary.success_rate
    ));
    out.push_str(&format!("Failed: {}\n", summary.failed_requests));
    out.push_str(&format!("Requests/sec: {:.1}\n", summary.requests_per_second));
    out.push_str(&format!(
        "Avg Response Time: {}\n",
        format_ms(summary.latency.map(|l| l.avg))
    ));
    out.push_str(&format!(
        "95th Percentile: {}\n",
        format_ms(summary.latency.map(|l| l.p95))
    ));
    out.push_str(&format!(
        "99th Percentile: {}\n",
        format_ms(summary.latency.map(|l| l.p99))
    ));

    out.push_str("\nEndpoint Performance:\n");
    out.push_str(&format!("{}\n", "-".repeat(60)));
    for (endpoint, stats) in &report.endpoint_details {
        out.push_str(&format!(
            "{:30} | {:5.1}% | {:>8}\n",
            endpoint,
            stats.success_rate,
            format_ms(stats.latency.map(|l| l.avg))
        ));
    }
    out
}

fn format_ms(value: Option<Duration>) -> String {
    match value {
        Some(value) => format!("{:.1}ms", value.as_secs_f64() * 1000.0),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::RequestResult;
    use crate::stats::aggregate;
    use chrono::Utc;
    use reqwest::Method;

    fn sample_report() -> PerformanceReport {
        let now = Utc::now();
        let results = vec![
            RequestResult::from_response(
                0,
                Method::GET,
                "/health",
                200,
                Duration::from_millis(12),
                2,
                now,
            ),
            RequestResult::from_transport_error(
                1,
                Method::GET,
                "/metrics",
                "connection failed",
                Duration::from_millis(3),
                now,
            ),
        ];
        aggregate(&results).unwrap()
    }

    #[test]
    fn empty_run_renders_error_object() {
        let value = report_json(None).unwrap();
        assert_eq!(value, json!({ "error": NO_RESULTS_MESSAGE }));
        assert!(render_summary(None).contains(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn report_has_summary_and_endpoint_details() {
        let report = sample_report();
        let value = report_json(Some(&report)).unwrap();
        assert_eq!(value["summary"]["total_requests"], 2);
        assert_eq!(value["summary"]["failed_requests"], 1);
        assert_eq!(value["endpoint_details"]["/metrics"]["success_rate"], 0.0);
        assert!(value["endpoint_details"]["/metrics"]
            .get("avg_response_time")
            .is_none());
    }

    #[test]
    fn console_summary_lists_each_endpoint() {
        let text = render_summary(Some(&sample_report()));
        assert!(text.contains("Total Requests: 2"));
        assert!(text.contains("Successful: 1 (50.0%)"));
        assert!(text.contains("/health"));
        assert!(text.contains("12.0ms"));
        let metrics_line = text.lines().find(|l| l.starts_with("/metrics")).unwrap();
        assert!(metrics_line.contains("n/a"));
    }
}
