//! Execution-side wiring for Intervue: subscriber setup and turn event streaming.

pub mod tracing_layer;

pub use tracing_layer::{TURN_TARGET, TurnEvent, TurnEventLayer};

use anyhow::Context;
use intervue_core::config::LogSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Builds the level filter: `RUST_LOG` wins over the configured level.
pub fn env_filter(settings: &LogSettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level '{}'", settings.level)),
    }
}

/// Installs the global tracing subscriber.
///
/// Output is human-readable or JSON lines depending on `settings.json`.
/// When `turn_events` is given, interview turn events are also forwarded to
/// its channel.
pub fn init_tracing(
    settings: &LogSettings,
    turn_events: Option<TurnEventLayer>,
) -> anyhow::Result<()> {
    let json = settings.json.then(|| fmt::layer().json());
    let plain = (!settings.json).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(env_filter(settings)?)
        .with(json)
        .with(plain)
        .with(turn_events)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(level = %settings.level, json = settings.json, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_reported() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = LogSettings {
            level: "intervue=verbose".to_string(),
            json: false,
        };
        assert!(env_filter(&settings).is_err());
    }

    #[test]
    fn test_configured_level_is_used() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = LogSettings {
            level: "intervue=debug,warn".to_string(),
            json: true,
        };
        let filter = env_filter(&settings).unwrap();
        assert!(filter.to_string().contains("intervue=debug"));
    }
}
