use tracing_subscriber::EnvFilter;

/// Installs a console subscriber. `level` takes any `EnvFilter` directive;
/// when it does not parse, `RUST_LOG` and then `info` are used instead.
pub fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already initialised");
    }
}
