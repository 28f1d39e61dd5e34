//! Client configuration.

use crate::client::query::DEFAULT_BASE_URL;
use crate::error::FmiError;
use crate::parsing::policy::FailurePolicy;
use crate::parsing::xml::namespaces::NamespaceMap;
use bon::Builder;
use std::env;
use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "FMI_API_KEY";
pub const BASE_URL_VAR: &str = "FMI_BASE_URL";

/// Settings for [`crate::FmiClient`].
///
/// # Examples
///
/// ```
/// use fmi_timeseries::{FailurePolicy, FmiConfig};
/// use std::time::Duration;
///
/// let config = FmiConfig::builder()
///     .api_key("my-key")
///     .failure_policy(FailurePolicy::Strict)
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.base_url, "https://data.fmi.fi/fmi-apikey");
/// ```
#[derive(Clone, Builder)]
pub struct FmiConfig {
    #[builder(into)]
    pub api_key: String,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Applied to every parser the client runs.
    #[builder(default)]
    pub failure_policy: FailurePolicy,
    /// Prefixes used to query WFS responses.
    #[builder(default)]
    pub namespaces: NamespaceMap,
    /// Whole-request timeout. None leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl FmiConfig {
    /// Reads `FMI_API_KEY` (required, non-empty) and `FMI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, FmiError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(FmiError::MissingApiKey)?;
        Ok(Self::builder()
            .api_key(api_key)
            .maybe_base_url(env::var(BASE_URL_VAR).ok())
            .build())
    }
}

impl fmt::Debug for FmiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("failure_policy", &self.failure_policy)
            .field("namespaces", &self.namespaces)
            .field("timeout", &self.timeout)
            .finish()
    }
}
