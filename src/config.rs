// limit_core/src/config.rs

use serde::{Deserialize, Serialize};

/// Engine configuration. `Default` always produces a valid config usable in
/// tests without any file or environment present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ring capacity; rounded up to the next power of two by `EventRing::new`.
    pub ring_capacity: usize,
    /// Carried for diagnostics and log context only; the engine is
    /// single-instrument and never branches on this value.
    pub instrument: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_capacity: 1024,
            instrument: "default".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `MATCHING_`-prefixed environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let cfg = config::Config::builder()
            .set_default("ring_capacity", defaults.ring_capacity as i64)?
            .set_default("instrument", defaults.instrument)?
            .add_source(config::Environment::with_prefix("MATCHING"))
            .build()?;

        cfg.try_deserialize()
    }

    /// Load configuration from a file, overlaid with `MATCHING_`-prefixed
    /// environment variables.
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let cfg = config::Config::builder()
            .set_default("ring_capacity", defaults.ring_capacity as i64)?
            .set_default("instrument", defaults.instrument)?
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("MATCHING"))
            .build()?;

        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.ring_capacity, 1024);
        assert_eq!(cfg.instrument, "default");
    }
}
