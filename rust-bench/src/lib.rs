mod config;
mod executor;
mod fixtures;
mod logging;
mod report;
mod result;
mod runner;
mod session;
mod stats;

pub use config::{
    LoadTestConfig, DEFAULT_FIXTURE_PRODUCTS, DEFAULT_PACING, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_WAVE_PAUSE,
};
pub use executor::RequestExecutor;
pub use fixtures::{create_test_data, FixtureSummary, CATEGORIES};
pub use logging::init_tracing;
pub use report::{render_summary, report_json, write_report, NO_RESULTS_MESSAGE};
pub use reqwest::Method;
pub use result::{RequestOptions, RequestResult};
pub use runner::{ctrl_c, run_load_test, run_load_test_until, run_wave, LoadTestOutcome};
pub use session::{run_user_session, ResultSink, SESSION_SCRIPT};
pub use stats::{
    aggregate, quantile_cut, requests_per_second, EndpointStats, LatencySummary,
    PerformanceReport, RunSummary,
};
