//! Environment-variable bootstrap.
//!
//! Credentials come from three environment variables; `.env` loading is an
//! explicit candidate-path list supplied by the caller, not implicit
//! filesystem probing baked into the client.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::auth::ScriptCredentials;
use crate::error::Error;

/// Environment variable holding the site base URL.
pub const SITE_URL_VAR: &str = "FLOW_SITE_URL";
/// Environment variable holding the script name (client id).
pub const SCRIPT_NAME_VAR: &str = "FLOW_SCRIPT_NAME";
/// Environment variable holding the script key (client secret).
pub const SCRIPT_KEY_VAR: &str = "FLOW_SCRIPT_KEY";

/// Default `.env` candidate locations, nearest first.
pub const DEFAULT_DOTENV_CANDIDATES: &[&str] = &[".env", "../.env", "../../.env"];

/// Client settings read from the environment.
pub struct EnvConfig {
    site_url: String,
    script_name: String,
    script_key: String,
}

impl EnvConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing or empty
    /// variable. No network call is attempted.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Ok(Self {
            site_url: require(&lookup, SITE_URL_VAR)?,
            script_name: require(&lookup, SCRIPT_NAME_VAR)?,
            script_key: require(&lookup, SCRIPT_KEY_VAR)?,
        })
    }

    /// Returns the site base URL.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Returns the script name.
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Consume the config, producing script credentials.
    pub fn into_credentials(self) -> ScriptCredentials {
        ScriptCredentials::new(self.script_name, self.script_key)
    }
}

// Intentionally hide the script key in Debug output
impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("site_url", &self.site_url)
            .field("script_name", &self.script_name)
            .field("script_key", &"[REDACTED]")
            .finish()
    }
}

fn require(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<String, Error> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config {
            message: format!("{} environment variable is required", key),
        }),
    }
}

/// Best-effort load of `.env` files from an explicit candidate list.
///
/// Absent or unreadable candidates are skipped silently. Variables already
/// set in the environment are not overridden.
pub fn load_dotenv<P: AsRef<Path>>(candidates: &[P]) {
    for candidate in candidates {
        let path = candidate.as_ref();
        if dotenvy::from_path(path).is_ok() {
            debug!(path = %path.display(), "loaded environment file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_all_three_variables() {
        let vars = env(&[
            (SITE_URL_VAR, "https://studio.shotgunstudio.com"),
            (SCRIPT_NAME_VAR, "pipeline_script"),
            (SCRIPT_KEY_VAR, "secret"),
        ]);
        let config = EnvConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.site_url(), "https://studio.shotgunstudio.com");
        assert_eq!(config.script_name(), "pipeline_script");
    }

    #[test]
    fn missing_variable_is_a_config_error() {
        let vars = env(&[
            (SITE_URL_VAR, "https://studio.shotgunstudio.com"),
            (SCRIPT_NAME_VAR, "pipeline_script"),
        ]);
        let err = EnvConfig::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains(SCRIPT_KEY_VAR));
    }

    #[test]
    fn empty_variable_is_a_config_error() {
        let vars = env(&[
            (SITE_URL_VAR, ""),
            (SCRIPT_NAME_VAR, "pipeline_script"),
            (SCRIPT_KEY_VAR, "secret"),
        ]);
        let err = EnvConfig::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains(SITE_URL_VAR));
    }

    #[test]
    fn debug_hides_script_key() {
        let vars = env(&[
            (SITE_URL_VAR, "https://studio.shotgunstudio.com"),
            (SCRIPT_NAME_VAR, "pipeline_script"),
            (SCRIPT_KEY_VAR, "supersecret"),
        ]);
        let config = EnvConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn load_dotenv_reads_candidate_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "FLOWTRACK_DOTENV_PROBE=from-file").unwrap();

        load_dotenv(&[&path]);

        assert_eq!(
            std::env::var("FLOWTRACK_DOTENV_PROBE").as_deref(),
            Ok("from-file")
        );
    }

    #[test]
    fn load_dotenv_skips_absent_candidates() {
        let dir = tempfile::tempdir().unwrap();
        // must not panic or error
        load_dotenv(&[dir.path().join("missing.env")]);
    }
}
