use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset. Library chatter stays quiet so it
/// does not interleave with the REPL.
const DEFAULT_FILTER: &str = "warn,manu_cli=info";

/// Installs the global tracing subscriber, writing to stderr.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
