//! Process configuration for the adapter.
//!
//! Read once at startup and passed explicitly to the components that
//! need it. Nothing looks at the environment after `main` returns from
//! [`AdapterConfig::from_env`].

use std::time::Duration;

/// Default upstream Photon instance.
pub const DEFAULT_PHOTON_URL: &str = "https://photon.komoot.io";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upstream request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the adapter process.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Base URL of the Photon geocoder, without a trailing slash.
    pub photon_url: String,

    /// Port to listen on.
    pub port: u16,

    /// Timeout for a single upstream request (seconds).
    pub timeout_secs: u64,
}

impl AdapterConfig {
    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Missing variables take their defaults. Values that fail to parse are
    /// logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let photon_url = lookup("PHOTON_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PHOTON_URL.to_string());

        Self {
            photon_url: normalize_base_url(&photon_url),
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT, |_| true),
            // A zero timeout would fail every upstream call.
            timeout_secs: parse_or_default(
                &lookup,
                "PHOTON_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
                |secs| *secs > 0,
            ),
        }
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Set a custom Photon base URL (for testing).
    pub fn with_photon_url(mut self, url: impl AsRef<str>) -> Self {
        self.photon_url = normalize_base_url(url.as_ref());
        self
    }

    /// Set the upstream request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Returns the upstream timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            photon_url: DEFAULT_PHOTON_URL.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T, valid: fn(&T) -> bool) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    let raw = match lookup(key) {
        None => return default,
        Some(raw) => raw,
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(variable = key, value = %raw, %default, "invalid value, using default");
            default
        }
    }
}
