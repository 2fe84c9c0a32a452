//! Script credentials type.

use std::fmt;

use crate::error::Error;

/// Script credentials for the OAuth2 client-credentials grant.
///
/// This type holds the script name (client id) and script key (client secret)
/// used to obtain and re-obtain access tokens. The pair is long-lived and
/// never mutated after construction.
///
/// # Security
///
/// The script key is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use flowtrack::ScriptCredentials;
///
/// let creds = ScriptCredentials::new("pipeline_script", "abcdef123456");
/// assert_eq!(creds.script_name(), "pipeline_script");
/// ```
pub struct ScriptCredentials {
    script_name: String,
    script_key: String,
}

impl ScriptCredentials {
    /// Create new script credentials.
    ///
    /// # Arguments
    ///
    /// * `script_name` - The API script name (OAuth2 client id)
    /// * `script_key` - The API script key (OAuth2 client secret)
    pub fn new(script_name: impl Into<String>, script_key: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            script_key: script_key.into(),
        }
    }

    /// Returns the script name (client id).
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Returns the script key (client secret).
    ///
    /// # Security
    ///
    /// Use this only when constructing token exchange requests.
    /// Never log or display this value.
    pub(crate) fn script_key(&self) -> &str {
        &self.script_key
    }

    /// Check that both credential fields are present.
    ///
    /// Called at client construction, before any network call is attempted.
    pub(crate) fn ensure_present(&self) -> Result<(), Error> {
        if self.script_name.trim().is_empty() {
            return Err(Error::Config {
                message: "script name is required".to_string(),
            });
        }
        if self.script_key.trim().is_empty() {
            return Err(Error::Config {
                message: "script key is required".to_string(),
            });
        }
        Ok(())
    }
}

// Intentionally hide the script key in Debug output
impl fmt::Debug for ScriptCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptCredentials")
            .field("script_name", &self.script_name)
            .field("script_key", &"[REDACTED]")
            .finish()
    }
}

// Clone is intentionally implemented to allow credentials to be reused,
// but the type is not Copy to make credential passing explicit.
impl Clone for ScriptCredentials {
    fn clone(&self) -> Self {
        Self {
            script_name: self.script_name.clone(),
            script_key: self.script_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hide_key_in_debug() {
        let creds = ScriptCredentials::new("pipeline_script", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("pipeline_script"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_script_name_is_a_config_error() {
        let creds = ScriptCredentials::new("", "secret");
        assert!(matches!(
            creds.ensure_present(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn empty_script_key_is_a_config_error() {
        let creds = ScriptCredentials::new("pipeline_script", "  ");
        assert!(matches!(
            creds.ensure_present(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn present_credentials_pass() {
        let creds = ScriptCredentials::new("pipeline_script", "secret");
        assert!(creds.ensure_present().is_ok());
    }
}
