use anyhow::Result;
use content_admin::utils::validation::Validate;
use content_admin::{AdminConfig, AdminError};
use tempfile::TempDir;

#[tokio::test]
async fn test_load_config_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("admin.toml");

    std::env::set_var("CONTENT_ADMIN_FILE_TEST_KEY", "secret-web-key");
    let config_content = r#"
[firebase]
project_id = "blog-admin"
api_key = "${CONTENT_ADMIN_FILE_TEST_KEY}"
firestore_url = "http://127.0.0.1:8080/v1"

[cloudinary]
cloud_name = "demo-cloud"
upload_preset = "unsigned"
"#;
    tokio::fs::write(&config_path, config_content).await?;

    let config = AdminConfig::from_file(&config_path)?;
    config.validate()?;

    assert_eq!(config.firebase.project_id, "blog-admin");
    assert_eq!(config.firebase.api_key, "secret-web-key");
    assert_eq!(config.firebase.firestore_url, "http://127.0.0.1:8080/v1");
    assert_eq!(config.cloudinary.cloud_name, "demo-cloud");
    Ok(())
}

#[tokio::test]
async fn test_bad_endpoint_fails_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("admin.toml");
    let config_content = r#"
[firebase]
project_id = "blog-admin"
api_key = "k"

[cloudinary]
cloud_name = "demo-cloud"
upload_preset = "unsigned"
api_url = "ftp://api.cloudinary.com"
"#;
    tokio::fs::write(&config_path, config_content).await?;

    let config = AdminConfig::from_file(&config_path)?;

    match config.validate() {
        Err(AdminError::InvalidConfigValue { field, .. }) => {
            assert_eq!(field, "cloudinary.api_url");
        }
        other => panic!("expected invalid value, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let err = AdminConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, AdminError::Io(_)));
}
