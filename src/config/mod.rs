#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_CLOUDINARY_URL: &str = "https://api.cloudinary.com";

/// Credentials and endpoints of the three external services.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub firebase: FirebaseConfig,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Web API key, used by both sign-in and document requests.
    pub api_key: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    #[serde(default = "default_cloudinary_url")]
    pub api_url: String,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_firestore_url() -> String {
    DEFAULT_FIRESTORE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_cloudinary_url() -> String {
    DEFAULT_CLOUDINARY_URL.to_string()
}

impl AdminConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| AdminError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Reads `FIREBASE_*` and `CLOUDINARY_*` variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            firebase: FirebaseConfig {
                project_id: required_env("FIREBASE_PROJECT_ID")?,
                api_key: required_env("FIREBASE_API_KEY")?,
                database: std::env::var("FIREBASE_DATABASE").unwrap_or_else(|_| default_database()),
                firestore_url: default_firestore_url(),
                auth_url: default_auth_url(),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: required_env("CLOUDINARY_CLOUD_NAME")?,
                upload_preset: required_env("CLOUDINARY_UPLOAD_PRESET")?,
                api_url: default_cloudinary_url(),
            },
        })
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| AdminError::MissingConfig {
        field: name.to_string(),
    })
}

/// Replaces `${VAR}` with the variable's value. Unknown variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdminError::Config {
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl Validate for AdminConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("firebase.project_id", &self.firebase.project_id)?;
        validate_non_empty_string("firebase.api_key", &self.firebase.api_key)?;
        validate_non_empty_string("firebase.database", &self.firebase.database)?;
        validate_url("firebase.firestore_url", &self.firebase.firestore_url)?;
        validate_url("firebase.auth_url", &self.firebase.auth_url)?;
        validate_non_empty_string("cloudinary.cloud_name", &self.cloudinary.cloud_name)?;
        validate_non_empty_string("cloudinary.upload_preset", &self.cloudinary.upload_preset)?;
        validate_url("cloudinary.api_url", &self.cloudinary.api_url)?;

        for (field, value) in [
            ("firebase.project_id", &self.firebase.project_id),
            ("firebase.api_key", &self.firebase.api_key),
            ("cloudinary.cloud_name", &self.cloudinary.cloud_name),
            ("cloudinary.upload_preset", &self.cloudinary.upload_preset),
        ] {
            if value.starts_with("${") {
                return Err(AdminError::InvalidConfigValue {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[firebase]
project_id = "blog-admin"
api_key = "web-key"

[cloudinary]
cloud_name = "demo"
upload_preset = "unsigned"
"#;

    #[test]
    fn test_defaults_are_filled_in() {
        let config = AdminConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.firebase.database, "(default)");
        assert_eq!(config.firebase.firestore_url, DEFAULT_FIRESTORE_URL);
        assert_eq!(config.firebase.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.cloudinary.api_url, DEFAULT_CLOUDINARY_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("CONTENT_ADMIN_TEST_PRESET", "from-env");
        let toml = MINIMAL.replace("\"unsigned\"", "\"${CONTENT_ADMIN_TEST_PRESET}\"");

        let config = AdminConfig::from_toml_str(&toml).unwrap();

        assert_eq!(config.cloudinary.upload_preset, "from-env");
    }

    #[test]
    fn test_unset_variable_fails_validation() {
        let toml = MINIMAL.replace("\"web-key\"", "\"${CONTENT_ADMIN_TEST_UNSET_KEY}\"");

        let config = AdminConfig::from_toml_str(&toml).unwrap();

        assert!(matches!(
            config.validate(),
            Err(AdminError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let err = AdminConfig::from_toml_str("[firebase]\nproject_id = \"x\"\n").unwrap_err();
        assert!(matches!(err, AdminError::Config { .. }));
    }
}
