use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` overrides the default level (`warn`, or `debug` when
/// `verbose`). `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(verbose: bool) {
    let filter = build_filter(verbose, std::env::var("RUST_LOG").ok().as_deref());
    let use_json = wants_json(std::env::var("RUST_LOG_FORMAT").ok().as_deref());

    let registry = tracing_subscriber::registry().with(filter);
    let result = if use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    // A subscriber may already be installed (tests, embedding binaries).
    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}

fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::from_level(Level::DEBUG)
    } else {
        LevelFilter::from_level(Level::WARN)
    }
}

fn build_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .parse_lossy(rust_log.unwrap_or_default())
}

fn wants_json(format: Option<&str>) -> bool {
    format == Some("json")
}
