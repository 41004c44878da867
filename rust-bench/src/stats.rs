use std::time::Duration;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::result::RequestResult;

/// Latency figures over successful requests. Absent entirely when a group has
/// no successful samples, so a missing value can never be read as "0 s".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    #[serde(rename = "avg_response_time", serialize_with = "as_secs")]
    pub avg: Duration,
    #[serde(rename = "min_response_time", serialize_with = "as_secs")]
    pub min: Duration,
    #[serde(rename = "max_response_time", serialize_with = "as_secs")]
    pub max: Duration,
    #[serde(rename = "p95_response_time", serialize_with = "as_secs")]
    pub p95: Duration,
    #[serde(rename = "p99_response_time", serialize_with = "as_secs")]
    pub p99: Duration,
}

impl LatencySummary {
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        let mut sorted = samples.to_vec();
        sorted.sort();
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let total: u128 = sorted.iter().map(Duration::as_nanos).sum();
        let avg = nanos_to_duration(total / sorted.len() as u128);

        Some(Self {
            avg,
            min,
            max,
            p95: quantile_cut(&sorted, 19, 20)?,
            p99: quantile_cut(&sorted, 99, 100)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Durations of successful requests, in the order they were recorded.
    #[serde(serialize_with = "as_secs_seq")]
    pub response_times: Vec<Duration>,
    #[serde(flatten)]
    pub latency: Option<LatencySummary>,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    #[serde(flatten)]
    pub latency: Option<LatencySummary>,
    pub requests_per_second: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub summary: RunSummary,
    /// Keyed by the literal endpoint label, in first-seen order.
    pub endpoint_details: IndexMap<String, EndpointStats>,
}

/// Builds summary and per-endpoint statistics from a finished run.
///
/// Returns `None` when there are no results at all.
pub fn aggregate(results: &[RequestResult]) -> Option<PerformanceReport> {
    if results.is_empty() {
        return None;
    }

    let mut groups: IndexMap<&str, GroupCounts> = IndexMap::new();
    let mut overall = GroupCounts::default();
    for result in results {
        groups.entry(result.endpoint()).or_default().record(result);
        overall.record(result);
    }

    let endpoint_details = groups
        .into_iter()
        .map(|(endpoint, counts)| (endpoint.to_string(), counts.into_endpoint_stats()))
        .collect();

    let summary = RunSummary {
        total_requests: overall.total,
        successful_requests: overall.successful,
        failed_requests: overall.total - overall.successful,
        success_rate: success_rate(overall.successful, overall.total),
        latency: LatencySummary::from_samples(&overall.response_times),
        requests_per_second: requests_per_second(results),
    };

    Some(PerformanceReport {
        summary,
        endpoint_details,
    })
}

#[derive(Default)]
struct GroupCounts {
    total: u64,
    successful: u64,
    response_times: Vec<Duration>,
}

impl GroupCounts {
    fn record(&mut self, result: &RequestResult) {
        self.total += 1;
        if result.success() {
            self.successful += 1;
            self.response_times.push(result.response_time());
        }
    }

    fn into_endpoint_stats(self) -> EndpointStats {
        EndpointStats {
            total_requests: self.total,
            successful_requests: self.successful,
            failed_requests: self.total - self.successful,
            latency: LatencySummary::from_samples(&self.response_times),
            response_times: self.response_times,
            success_rate: success_rate(self.successful, self.total),
        }
    }
}

fn success_rate(successful: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    successful as f64 / total as f64 * 100.0
}

/// Total results divided by the span between the earliest and latest request
/// start. Zero when no interval exists.
pub fn requests_per_second(results: &[RequestResult]) -> f64 {
    if results.len() < 2 {
        return 0.0;
    }
    let first = results.iter().map(RequestResult::timestamp).min();
    let last = results.iter().map(RequestResult::timestamp).max();
    let span = match (first, last) {
        (Some(first), Some(last)) => (last - first).to_std().unwrap_or_default(),
        _ => return 0.0,
    };
    if span.is_zero() {
        return 0.0;
    }
    results.len() as f64 / span.as_secs_f64()
}

/// The `i`-th of the `k - 1` cut points that split `sorted` into `k`
/// equal-probability groups.
///
/// Ranks follow the exclusive rule: cut point `i` sits at 1-based position
/// `i * (n + 1) / k` and is linearly interpolated between its neighbours.
/// Positions outside `[1, n]` clamp to the extremes. Interpolation is done in
/// whole nanoseconds so the result never leaves `[min, max]`.
pub fn quantile_cut(sorted: &[Duration], i: usize, k: usize) -> Option<Duration> {
    let n = sorted.len();
    if n == 0 || k == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let scaled = i * (n + 1);
    let j = scaled / k;
    let delta = (scaled % k) as u128;
    if j < 1 {
        return Some(sorted[0]);
    }
    if j >= n {
        return Some(sorted[n - 1]);
    }

    let lower = sorted[j - 1].as_nanos();
    let upper = sorted[j].as_nanos();
    Some(nanos_to_duration(
        lower + (upper - lower) * delta / k as u128,
    ))
}

fn nanos_to_duration(nanos: u128) -> Duration {
    let secs = (nanos / 1_000_000_000) as u64;
    let subsec = (nanos % 1_000_000_000) as u32;
    Duration::new(secs, subsec)
}

fn as_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

fn as_secs_seq<S: Serializer>(values: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(Duration::as_secs_f64))
}
