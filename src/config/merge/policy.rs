//! Default values every merged configuration starts from.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with defaults; later sources override these keys.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.backend", "sled")?
        .set_default("storage.stale_paths", "recreate")?
        .set_default("catalog.source", "default")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
