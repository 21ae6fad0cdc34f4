//! Server configuration.
//!
//! Configuration is loaded once at startup from environment variables via
//! [`SiloConfig::from_env`] and validated with [`SiloConfig::validate`]
//! before the server binds its listener.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Server configuration.
///
/// # Examples
///
/// ```
/// use silo_core::config::SiloConfig;
///
/// let config = SiloConfig::default();
/// assert_eq!(config.listen, "0.0.0.0:9000");
/// assert_eq!(config.max_presign_expires, 604_800);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SiloConfig {
    /// Bind address for the HTTP listener.
    #[builder(default = String::from("0.0.0.0:9000"))]
    pub listen: String,

    /// Root directory for object and multipart storage.
    #[builder(default = String::from("./data"))]
    pub data_dir: String,

    /// Maximum accepted request body size in bytes. A declared
    /// `Content-Length` above this is rejected before the body is read, and
    /// bodies are capped while streaming regardless of declaration.
    #[builder(default = 5_368_709_120)]
    pub max_request_size: u64,

    /// Credential table: `(access_key_id, secret_key)` pairs.
    #[builder(default)]
    pub credentials: Vec<(String, String)>,

    /// Access keys accepted under legacy access-key-only mode.
    #[builder(default)]
    pub allowed_access_keys: Vec<String>,

    /// Whether allow-listed access keys may skip signature verification.
    #[builder(default = false)]
    pub allow_legacy_access_key_only: bool,

    /// Maximum tolerated clock skew for signed requests, in seconds.
    #[builder(default = 900)]
    pub clock_skew_seconds: i64,

    /// Upper bound on `X-Amz-Expires` for presigned URLs, in seconds.
    #[builder(default = 604_800)]
    pub max_presign_expires: u64,

    /// Whether proxied-host fallbacks participate in signature verification.
    #[builder(default = false)]
    pub allow_host_candidate_fallbacks: bool,

    /// Path of the signature-mismatch trace log. Empty disables it.
    #[builder(default)]
    pub auth_debug_log: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SiloConfig {
    fn default() -> Self {
        Self {
            listen: String::from("0.0.0.0:9000"),
            data_dir: String::from("./data"),
            max_request_size: 5_368_709_120,
            credentials: Vec::new(),
            allowed_access_keys: Vec::new(),
            allow_legacy_access_key_only: false,
            clock_skew_seconds: 900,
            max_presign_expires: 604_800,
            allow_host_candidate_fallbacks: false,
            auth_debug_log: String::new(),
            log_level: String::from("info"),
        }
    }
}

impl SiloConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LISTEN` | `0.0.0.0:9000` |
    /// | `DATA_DIR` | `./data` |
    /// | `MAX_REQUEST_SIZE` | `5368709120` (5 GiB) |
    /// | `CREDENTIALS` | *(empty)* - `akid:secret[,akid:secret...]` |
    /// | `ALLOWED_ACCESS_KEYS` | *(empty)* - comma-separated |
    /// | `ALLOW_LEGACY_ACCESS_KEY_ONLY` | `false` |
    /// | `CLOCK_SKEW_SECONDS` | `900` |
    /// | `MAX_PRESIGN_EXPIRES` | `604800` |
    /// | `ALLOW_HOST_CANDIDATE_FALLBACKS` | `false` |
    /// | `AUTH_DEBUG_LOG` | *(empty, disabled)* |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("DATA_DIR") {
            config.data_dir = v;
        }
        if let Ok(v) = std::env::var("MAX_REQUEST_SIZE") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_request_size = n;
            }
        }
        if let Ok(v) = std::env::var("CREDENTIALS") {
            config.credentials = parse_credentials(&v);
        }
        if let Ok(v) = std::env::var("ALLOWED_ACCESS_KEYS") {
            config.allowed_access_keys = parse_list(&v);
        }
        if let Ok(v) = std::env::var("ALLOW_LEGACY_ACCESS_KEY_ONLY") {
            config.allow_legacy_access_key_only = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("CLOCK_SKEW_SECONDS") {
            if let Ok(n) = v.parse::<i64>() {
                config.clock_skew_seconds = n;
            }
        }
        if let Ok(v) = std::env::var("MAX_PRESIGN_EXPIRES") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_presign_expires = n;
            }
        }
        if let Ok(v) = std::env::var("ALLOW_HOST_CANDIDATE_FALLBACKS") {
            config.allow_host_candidate_fallbacks = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("AUTH_DEBUG_LOG") {
            config.auth_debug_log = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration can authenticate at least one client.
    ///
    /// # Errors
    ///
    /// Fails if the credential table is empty and legacy mode is not enabled
    /// with a non-empty allow-list.
    pub fn validate(&self) -> anyhow::Result<()> {
        let legacy_usable =
            self.allow_legacy_access_key_only && !self.allowed_access_keys.is_empty();
        if self.credentials.is_empty() && !legacy_usable {
            anyhow::bail!(
                "no credentials configured: set CREDENTIALS, or enable \
                 ALLOW_LEGACY_ACCESS_KEY_ONLY with a non-empty ALLOWED_ACCESS_KEYS"
            );
        }
        Ok(())
    }
}

/// Parse a `akid:secret[,akid:secret...]` credential list.
///
/// Entries without a `:` are skipped.
fn parse_credentials(value: &str) -> Vec<(String, String)> {
    value
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (akid, secret) = entry.split_once(':')?;
            if akid.is_empty() || secret.is_empty() {
                return None;
            }
            Some((akid.to_owned(), secret.to_owned()))
        })
        .collect()
}

/// Parse a comma-separated list, trimming entries and dropping empties.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
