//! Driver configuration.
//!
//! Read from the environment the same way the mock server reads `PORT`, or
//! deserialized from whatever config format the host application uses.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DriverError, Result};
use crate::request::Endpoint;

pub const ENV_ENDPOINT: &str = "OBJECT_DRIVER_ENDPOINT";
pub const ENV_EXTENSION: &str = "OBJECT_DRIVER_EXTENSION";
pub const ENV_TIMEOUT_SECS: &str = "OBJECT_DRIVER_TIMEOUT_SECS";

/// Suffix appended to every resource name when none is configured.
pub const DEFAULT_FILE_EXTENSION: &str = ".mustache";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub endpoint_base: String,
    pub file_extension: String,
    /// Whole-request deadline handed to the transport.
    #[serde(with = "opt_secs")]
    pub timeout: Option<Duration>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            endpoint_base: String::new(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            timeout: None,
        }
    }
}

impl DriverConfig {
    pub fn new(endpoint_base: &str) -> Self {
        Self {
            endpoint_base: endpoint_base.to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint_base = lookup(ENV_ENDPOINT)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DriverError::Config(format!("{ENV_ENDPOINT} is not set")))?;
        let file_extension =
            lookup(ENV_EXTENSION).unwrap_or_else(|| DEFAULT_FILE_EXTENSION.to_string());
        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    DriverError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };
        Ok(Self {
            endpoint_base,
            file_extension,
            timeout,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.endpoint_base, &self.file_extension)
    }
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
