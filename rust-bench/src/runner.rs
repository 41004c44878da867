use std::future::{self, Future};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::LoadTestConfig;
use crate::executor::RequestExecutor;
use crate::fixtures::create_test_data;
use crate::result::RequestResult;
use crate::session::{run_user_session, ResultSink};

/// Everything collected by one run.
#[derive(Debug, Clone)]
pub struct LoadTestOutcome {
    pub results: Vec<RequestResult>,
    pub waves_completed: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

pub async fn run_load_test(config: LoadTestConfig) -> Result<LoadTestOutcome> {
    run_load_test_until(config, future::pending::<()>()).await
}

/// Runs waves until the duration elapses or `shutdown` resolves, whichever
/// comes first. A wave already in flight always runs to completion; test data
/// setup is abandoned and no wave starts.
pub async fn run_load_test_until<F>(
    config: LoadTestConfig,
    shutdown: F,
) -> Result<LoadTestOutcome>
where
    F: Future<Output = ()>,
{
    let start = Instant::now();
    let executor = RequestExecutor::new(&config)?;
    tokio::pin!(shutdown);
    let mut interrupted = false;

    if config.create_fixtures {
        info!("creating test data");
        tokio::select! {
            _ = create_test_data(
                executor.client(),
                executor.base_url(),
                config.fixture_products,
            ) => {}
            _ = &mut shutdown => {
                interrupted = true;
                warn!("interrupt received during test data setup, skipping waves");
            }
        }
    }

    let (result_tx, result_rx) = mpsc::unbounded_channel();
    let collector = tokio::spawn(collect_results(result_rx));
    let sink = ResultSink::new(result_tx);
    let mut waves_completed = 0;

    if !interrupted {
        info!(
            users = config.concurrent_users,
            duration_secs = config.duration.as_secs_f64(),
            "starting load test"
        );
    }

    let loop_start = Instant::now();
    while !interrupted {
        let wave = run_wave(config.concurrent_users, &executor, &sink, config.pacing);
        tokio::pin!(wave);
        tokio::select! {
            _ = &mut wave => {}
            _ = &mut shutdown => {
                interrupted = true;
                warn!(wave = waves_completed + 1, "interrupt received, finishing current wave");
                (&mut wave).await;
            }
        }
        waves_completed += 1;
        info!(wave = waves_completed, "wave complete");

        if interrupted {
            break;
        }

        tokio::select! {
            _ = sleep(config.wave_pause) => {}
            _ = &mut shutdown => {
                interrupted = true;
                warn!("interrupt received, no further waves");
            }
        }
        if loop_start.elapsed() >= config.duration {
            break;
        }
    }

    drop(sink);
    let results = collector
        .await
        .map_err(|err| anyhow!("result collector task failed: {}", err))?;

    info!(
        waves = waves_completed,
        results = results.len(),
        interrupted,
        "load test completed"
    );

    Ok(LoadTestOutcome {
        results,
        waves_completed,
        interrupted,
        elapsed: start.elapsed(),
    })
}

/// Launches `users` sessions concurrently and returns once every one of them
/// has finished.
pub async fn run_wave(
    users: usize,
    executor: &RequestExecutor,
    sink: &ResultSink,
    pacing: Duration,
) {
    let mut join_set = JoinSet::new();
    for user_id in 0..users {
        let executor = executor.clone();
        let sink = sink.clone();
        join_set.spawn(async move { run_user_session(user_id, &executor, &sink, pacing).await });
    }

    while let Some(join_result) = join_set.join_next().await {
        if let Err(err) = join_result {
            warn!(error = %err, "user session task ended abnormally");
        }
    }
}

async fn collect_results(mut rx: mpsc::UnboundedReceiver<RequestResult>) -> Vec<RequestResult> {
    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    results
}

/// Resolves on Ctrl-C. The signal handler is installed when this is called,
/// not when the returned future is first polled, so an interrupt during test
/// data setup is already caught. If installation fails the future never
/// resolves.
pub fn ctrl_c() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let listener = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
        .context("failed to listen for Ctrl-C");
    #[cfg(not(unix))]
    let listener: Result<_> = Ok(tokio::spawn(tokio::signal::ctrl_c()));

    async move {
        match listener {
            #[cfg(unix)]
            Ok(mut signal) => {
                if signal.recv().await.is_some() {
                    return;
                }
            }
            #[cfg(not(unix))]
            Ok(handle) => {
                if matches!(handle.await, Ok(Ok(()))) {
                    return;
                }
            }
            Err(err) => warn!(error = %err, "interrupt handling disabled"),
        }
        future::pending::<()>().await;
    }
}
