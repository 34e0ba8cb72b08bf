use crate::{env_or_default, ConfigError, FromEnv};

pub const DEFAULT_COOKIE_NAME: &str = "admin_session";
pub const DEFAULT_COOKIE_VALUE: &str = "true";

/// Admin session gate settings.
///
/// Write routes accept a request only when it carries a cookie named
/// `cookie_name` whose value is exactly `cookie_value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminConfig {
    pub cookie_name: String,
    pub cookie_value: String,
}

impl AdminConfig {
    pub fn new(cookie_name: impl Into<String>, cookie_value: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            cookie_value: cookie_value.into(),
        }
    }
}

impl FromEnv for AdminConfig {
    /// Reads:
    /// - ADMIN_COOKIE_NAME: defaults to "admin_session"
    /// - ADMIN_COOKIE_VALUE: defaults to "true"
    fn from_env() -> Result<Self, ConfigError> {
        let cookie_name = env_or_default("ADMIN_COOKIE_NAME", DEFAULT_COOKIE_NAME);
        let cookie_value = env_or_default("ADMIN_COOKIE_VALUE", DEFAULT_COOKIE_VALUE);

        if cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ADMIN_COOKIE_NAME".to_string(),
                details: "cookie name cannot be empty".to_string(),
            });
        }
        if cookie_value.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ADMIN_COOKIE_VALUE".to_string(),
                details: "cookie value cannot be empty".to_string(),
            });
        }

        Ok(Self {
            cookie_name,
            cookie_value,
        })
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME, DEFAULT_COOKIE_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_config_defaults() {
        temp_env::with_vars(
            [
                ("ADMIN_COOKIE_NAME", None::<&str>),
                ("ADMIN_COOKIE_VALUE", None::<&str>),
            ],
            || {
                let config = AdminConfig::from_env().unwrap();
                assert_eq!(config, AdminConfig::default());
                assert_eq!(config.cookie_name, "admin_session");
                assert_eq!(config.cookie_value, "true");
            },
        );
    }

    #[test]
    fn test_admin_config_custom_values() {
        temp_env::with_vars(
            [
                ("ADMIN_COOKIE_NAME", Some("backoffice")),
                ("ADMIN_COOKIE_VALUE", Some("s3cret")),
            ],
            || {
                let config = AdminConfig::from_env().unwrap();
                assert_eq!(config.cookie_name, "backoffice");
                assert_eq!(config.cookie_value, "s3cret");
            },
        );
    }

    #[test]
    fn test_admin_config_rejects_empty_name() {
        temp_env::with_var("ADMIN_COOKIE_NAME", Some("  "), || {
            let err = AdminConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("ADMIN_COOKIE_NAME"));
        });
    }
}
