//! Environment variable source: KVFS prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses KVFS prefix and __ as separator for nested keys (`KVFS__STORAGE__PATH`).
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("KVFS")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
