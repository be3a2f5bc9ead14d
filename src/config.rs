use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::SqlHelperError;
use crate::types::DatabaseType;

/// Pool settings, usually read from a TOML file at startup.
///
/// ```toml
/// driver = "sqlite"
/// url = "/var/lib/app/app.db"
/// max_size = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelperConfig {
    /// `postgres` or `sqlite`, case-insensitive.
    pub driver: String,
    /// libpq URL or key/value string for Postgres; file path for `SQLite`.
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub max_size: Option<u32>,
    #[serde(default)]
    pub connection_timeout_secs: Option<u64>,
    /// Replaces the backend's default generated-id query.
    #[serde(default)]
    pub insert_id_query: Option<String>,
}

impl HelperConfig {
    /// # Errors
    /// Returns `SqlHelperError::ConfigError` if the text is not valid TOML for this
    /// struct or fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, SqlHelperError> {
        let config: HelperConfig = toml::from_str(text)
            .map_err(|e| SqlHelperError::ConfigError(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `SqlHelperError::ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SqlHelperError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SqlHelperError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded helper config");
        Self::from_toml_str(&text)
    }

    /// # Errors
    /// Returns `SqlHelperError::ConfigError` for an empty driver or url, an unknown
    /// driver, or a zero pool size.
    pub fn validate(&self) -> Result<(), SqlHelperError> {
        if self.driver.trim().is_empty() {
            return Err(SqlHelperError::ConfigError("driver is required".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(SqlHelperError::ConfigError("url is required".to_string()));
        }
        if self.max_size == Some(0) {
            return Err(SqlHelperError::ConfigError(
                "max_size must be greater than zero".to_string(),
            ));
        }
        self.database_type().map(|_| ())
    }

    /// # Errors
    /// Returns `SqlHelperError::ConfigError` if `driver` names no enabled backend.
    pub fn database_type(&self) -> Result<DatabaseType, SqlHelperError> {
        DatabaseType::from_str(self.driver.trim(), true)
            .map_err(|_| SqlHelperError::ConfigError(format!("unknown driver {:?}", self.driver)))
    }

    #[must_use]
    pub fn connection_timeout(&self) -> Option<Duration> {
        self.connection_timeout_secs.map(Duration::from_secs)
    }

    /// The `url` with any `sqlite://` or `sqlite:` prefix removed.
    #[must_use]
    pub fn sqlite_path(&self) -> &str {
        let url = self.url.trim();
        url.strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = HelperConfig::from_toml_str(
            r#"
            driver = "Postgres"
            url = "postgres://app@localhost/app"
            username = "svc"
            password = "pw"
            max_size = 8
            connection_timeout_secs = 3
            insert_id_query = "SELECT currval('users_id_seq')"
            "#,
        );
        #[cfg(feature = "postgres")]
        {
            let config = config.expect("valid config");
            assert_eq!(config.database_type().ok(), Some(DatabaseType::Postgres));
            assert_eq!(config.max_size, Some(8));
            assert_eq!(config.connection_timeout(), Some(Duration::from_secs(3)));
            assert_eq!(config.username.as_deref(), Some("svc"));
        }
        #[cfg(not(feature = "postgres"))]
        assert!(config.is_err());
    }

    #[test]
    fn optional_keys_default_to_none() {
        let config = HelperConfig::from_toml_str("driver = \"sqlite\"\nurl = \"a.db\"\n");
        #[cfg(feature = "sqlite")]
        {
            let config = config.expect("valid config");
            assert!(config.max_size.is_none());
            assert!(config.connection_timeout().is_none());
            assert!(config.insert_id_query.is_none());
        }
        #[cfg(not(feature = "sqlite"))]
        assert!(config.is_err());
    }

    #[test]
    fn rejects_bad_values() {
        for text in [
            "driver = \"\"\nurl = \"a.db\"\n",
            "driver = \"sqlite\"\nurl = \"  \"\n",
            "driver = \"oracle\"\nurl = \"a.db\"\n",
            "driver = \"sqlite\"\nurl = \"a.db\"\nmax_size = 0\n",
            "driver = \"sqlite\"\nurl = \"a.db\"\nflavour = \"x\"\n",
            "url = \"a.db\"\n",
        ] {
            assert!(
                matches!(
                    HelperConfig::from_toml_str(text),
                    Err(SqlHelperError::ConfigError(_))
                ),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn sqlite_prefixes_are_stripped() {
        let mut config = HelperConfig {
            driver: "sqlite".into(),
            url: "sqlite://data/app.db".into(),
            ..HelperConfig::default()
        };
        assert_eq!(config.sqlite_path(), "data/app.db");
        config.url = "sqlite:app.db".into();
        assert_eq!(config.sqlite_path(), "app.db");
        config.url = "/tmp/app.db".into();
        assert_eq!(config.sqlite_path(), "/tmp/app.db");
    }
}
