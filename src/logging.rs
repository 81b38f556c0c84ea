use tracing_subscriber::EnvFilter;

/// Directives used when RUST_LOG is unset: the chosen level for this crate and its dependencies.
fn fallback_directives(level: &str) -> String {
    format!("{level},attack_graph={level}")
}

/// Installs the global subscriber. Output goes to stderr, leaving stdout to the report.
pub fn init_logging(level: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::new(fallback_directives(level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
