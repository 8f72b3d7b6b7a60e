use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::executor::ExecutionOptions;

use super::loader::LoadedConfig;

pub const DEFAULT_RETRY: u32 = 1;
pub const DEFAULT_SLEEP_SECS: u64 = 0;

/// Zero means "unset" for both values and is replaced by the default.
pub fn normalize(retry: u32, sleep: u64) -> (u32, u64) {
    let retry = if retry == 0 { DEFAULT_RETRY } else { retry };
    let sleep = if sleep == 0 { DEFAULT_SLEEP_SECS } else { sleep };
    (retry, sleep)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("missing required option --{0}")]
    Missing(&'static str),
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub retry: Option<u32>,
    pub sleep: Option<u64>,
    pub timeout: Option<u64>,
    pub keep_going: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub source: PathBuf,
    pub output: PathBuf,
    pub retry: u32,
    pub sleep: Duration,
    pub timeout: Option<Duration>,
    pub keep_going: bool,
}

impl RunSettings {
    pub fn resolve(
        overrides: SettingsOverrides,
        config: Option<&LoadedConfig>,
    ) -> Result<Self, SettingsError> {
        let file = config.map(|loaded| &loaded.config);

        let source = overrides
            .source
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(SettingsError::Missing("source"))?;
        let output = overrides
            .output
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| config.and_then(LoadedConfig::output))
            .ok_or(SettingsError::Missing("output"))?;

        let retry = overrides
            .retry
            .filter(|retry| *retry != 0)
            .or_else(|| file.and_then(|f| f.retry))
            .unwrap_or(DEFAULT_RETRY);
        let sleep = overrides
            .sleep
            .filter(|sleep| *sleep != 0)
            .or_else(|| file.and_then(|f| f.sleep))
            .unwrap_or(DEFAULT_SLEEP_SECS);
        let (retry, sleep) = normalize(retry, sleep);

        let timeout = overrides
            .timeout
            .or_else(|| file.and_then(|f| f.timeout))
            .filter(|secs| *secs != 0)
            .map(Duration::from_secs);
        let keep_going =
            overrides.keep_going || file.and_then(|f| f.keep_going).unwrap_or(false);

        Ok(Self {
            source,
            output,
            retry,
            sleep: Duration::from_secs(sleep),
            timeout,
            keep_going,
        })
    }

    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            timeout: self.timeout,
        }
    }
}
