use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);
pub const DEFAULT_WAVE_PAUSE: Duration = Duration::from_secs(1);
pub const DEFAULT_FIXTURE_PRODUCTS: usize = 50;

#[derive(Clone, Debug)]
pub struct LoadTestConfig {
    /// Base URL of the target service with any trailing slash removed.
    pub base_url: String,
    pub concurrent_users: usize,
    /// Wall-clock budget, checked only between waves.
    pub duration: Duration,
    pub request_timeout: Duration,
    /// Delay between consecutive requests of one simulated user.
    pub pacing: Duration,
    /// Gap between the end of one wave and the duration check.
    pub wave_pause: Duration,
    pub create_fixtures: bool,
    pub fixture_products: usize,
}

impl LoadTestConfig {
    pub fn try_new(
        base_url: impl AsRef<str>,
        concurrent_users: usize,
        duration: Duration,
    ) -> Result<Self> {
        if concurrent_users == 0 {
            return Err(anyhow!("concurrent_users must be greater than zero"));
        }

        let parsed = Url::parse(base_url.as_ref())
            .with_context(|| format!("invalid base URL: {}", base_url.as_ref()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "base URL must use http or https, got {}",
                parsed.scheme()
            ));
        }

        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            concurrent_users,
            duration,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pacing: DEFAULT_PACING,
            wave_pause: DEFAULT_WAVE_PAUSE,
            create_fixtures: true,
            fixture_products: DEFAULT_FIXTURE_PRODUCTS,
        })
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        if !request_timeout.is_zero() {
            self.request_timeout = request_timeout;
        }
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_wave_pause(mut self, wave_pause: Duration) -> Self {
        self.wave_pause = wave_pause;
        self
    }

    pub fn with_fixtures(mut self, create_fixtures: bool, fixture_products: usize) -> Self {
        self.create_fixtures = create_fixtures;
        self.fixture_products = fixture_products;
        self
    }
}
