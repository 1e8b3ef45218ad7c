use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the fmt subscriber on stderr. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "clanops=debug,clanops_engine=debug,clanops_render=debug"
    } else {
        "clanops=info,clanops_render=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
