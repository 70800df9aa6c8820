use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormat, LogLevel};

/// Install the stderr subscriber. `RUST_LOG` wins over `--log-level` when set.
pub fn init(level: LogLevel, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str();
        EnvFilter::new(format!("vcsstatus={level},vcsstatus_core={level}"))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().finish().try_init(),
        LogFormat::Text => builder.finish().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        assert!(init(LogLevel::Warn, LogFormat::Text).is_ok());
        assert!(init(LogLevel::Warn, LogFormat::Json).is_err());
    }
}
