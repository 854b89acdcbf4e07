//! Global config file source: `$XDG_CONFIG_HOME/kvfs/config.toml` (optional)

use crate::config::paths::xdg_root;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

/// Add the global config file to the builder when one can be located.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg_root::global_config_file() {
        Ok(path) => Ok(builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        )),
        Err(e) => {
            tracing::debug!("No global config location: {}", e);
            Ok(builder)
        }
    }
}
