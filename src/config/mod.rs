mod loader;
mod settings;

pub use loader::{load_config, LoadedConfig, ReplayConfig, CONFIG_FILE_NAME};
pub use settings::{
    normalize, RunSettings, SettingsError, SettingsOverrides, DEFAULT_RETRY, DEFAULT_SLEEP_SECS,
};
