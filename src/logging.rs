use supports_color::Stream;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PERIDOT_LOG=debug`.
pub const LOG_ENV: &str = "PERIDOT_LOG";

/// Installs the stderr subscriber.
///
/// The filter comes from [`LOG_ENV`] and defaults to `warn`; `debug` forces
/// the `debug` level.
pub fn init(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .with_ansi(detect_ansi(Stream::Stderr))
                             .with_target(false)
                             .compact()
                             .try_init()
                             .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(())
}

/// Whether ANSI colours should be written to `stream`.
///
/// `NO_COLOR` disables colours and `FORCE_COLOR` enables them; otherwise the
/// terminal is asked.
#[must_use]
pub fn detect_ansi(stream: Stream) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    supports_color::on_cached(stream).is_some()
}
