use crate::config::CloudinaryConfig;
use crate::domain::media::{ResourceType, UploadFile, UploadResult};
use crate::domain::ports::MediaUploader;
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Unsigned uploads to Cloudinary, authorized by an upload preset.
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: Client,
    api_url: String,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    original_filename: Option<String>,
    format: Option<String>,
    bytes: Option<u64>,
    created_at: Option<String>,
}

impl CloudinaryUploader {
    pub fn new(
        api_url: impl Into<String>,
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
        }
    }

    pub fn from_config(config: &CloudinaryConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.cloud_name.clone(),
            config.upload_preset.clone(),
        )
    }

    fn endpoint(&self, resource_type: ResourceType) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.api_url, self.cloud_name, resource_type
        )
    }

    fn form(&self, file: &UploadFile, resource_type: ResourceType) -> Form {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let part = match &file.content_type {
            Some(mime) => part.mime_str(mime).unwrap_or_else(|_| {
                Part::bytes(file.bytes.clone()).file_name(file.file_name.clone())
            }),
            None => part,
        };

        Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("resource_type", resource_type.as_str())
    }

    async fn send(&self, file: &UploadFile, resource_type: ResourceType) -> Result<UploadResponse> {
        let url = self.endpoint(resource_type);
        tracing::debug!(
            file = %file.file_name,
            size = file.bytes.len(),
            "Uploading to {}",
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(self.form(file, resource_type))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::Store {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Maps the provider response onto [`UploadResult`]. A missing or non-https
/// `secure_url` is an error, never an empty URL.
fn normalize(response: UploadResponse, file: &UploadFile) -> Result<UploadResult> {
    let url = response
        .secure_url
        .filter(|raw| Url::parse(raw).is_ok_and(|u| u.scheme() == "https"))
        .ok_or_else(|| {
            tracing::error!(file = %file.file_name, "Upload response has no usable secure_url");
            AdminError::Upload
        })?;

    let uploaded_at = response
        .created_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Ok(UploadResult {
        url,
        file_name: response
            .original_filename
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| file.file_name.clone()),
        file_type: response.format.filter(|format| !format.is_empty()),
        uploaded_at,
        size: response.bytes.unwrap_or(file.bytes.len() as u64),
    })
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, file: &UploadFile, resource_type: ResourceType) -> Result<UploadResult> {
        let response = self.send(file, resource_type).await.map_err(|e| {
            tracing::error!(file = %file.file_name, error = %e, "Cloudinary upload error");
            AdminError::Upload
        })?;

        let result = normalize(response, file)?;
        tracing::info!(file = %file.file_name, url = %result.url, "Upload complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn uploader(server: &MockServer) -> CloudinaryUploader {
        CloudinaryUploader::new(server.base_url(), "demo-cloud", "unsigned-preset")
    }

    #[tokio::test]
    async fn test_raw_upload_is_normalized() {
        let server = MockServer::start_async().await;
        let upload_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1_1/demo-cloud/raw/upload")
                    .body_contains("name=\"upload_preset\"")
                    .body_contains("unsigned-preset")
                    .body_contains("name=\"resource_type\"")
                    .body_contains("filename=\"syllabus.pdf\"");
                then.status(200).json_body(json!({
                    "secure_url": "https://res.cloudinary.com/demo-cloud/raw/upload/v1/syllabus.pdf",
                    "original_filename": "syllabus",
                    "format": "pdf",
                    "bytes": 2048,
                    "created_at": "2024-06-01T08:30:00Z"
                }));
            })
            .await;

        let file = UploadFile::new("syllabus.pdf", b"%PDF-1.4".to_vec());
        let result = uploader(&server)
            .upload(&file, ResourceType::Raw)
            .await
            .unwrap();

        upload_mock.assert_async().await;
        assert_eq!(
            result.url,
            "https://res.cloudinary.com/demo-cloud/raw/upload/v1/syllabus.pdf"
        );
        assert_eq!(result.file_name, "syllabus");
        assert_eq!(result.file_type.as_deref(), Some("pdf"));
        assert_eq!(result.size, 2048);
        assert!(result.uploaded_at.is_some());
    }

    #[tokio::test]
    async fn test_image_upload_url_only() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo-cloud/image/upload");
                then.status(200).json_body(json!({
                    "secure_url": "https://res.cloudinary.com/demo-cloud/image/upload/v1/cover.png",
                    "format": "png",
                    "bytes": 10
                }));
            })
            .await;

        let file = UploadFile::new("cover.png", vec![0u8; 10]).with_content_type("image/png");
        let url = uploader(&server)
            .upload_url(&file, ResourceType::Image)
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://res.cloudinary.com/demo-cloud/image/upload/v1/cover.png"
        );
    }

    #[tokio::test]
    async fn test_missing_secure_url_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo-cloud/auto/upload");
                then.status(200).json_body(json!({ "url": "http://insecure/x", "bytes": 1 }));
            })
            .await;

        let file = UploadFile::new("x.bin", vec![1]);
        let err = uploader(&server)
            .upload(&file, ResourceType::Auto)
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Upload));
    }

    #[tokio::test]
    async fn test_provider_rejection_hides_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo-cloud/image/upload");
                then.status(400).json_body(json!({
                    "error": { "message": "Upload preset not found" }
                }));
            })
            .await;

        let file = UploadFile::new("a.png", vec![1]);
        let err = uploader(&server)
            .upload(&file, ResourceType::Image)
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Upload));
        assert!(!err.to_string().contains("preset"));
    }

    #[test]
    fn test_normalize_falls_back_to_local_name_and_size() {
        let file = UploadFile::new("notes.txt", vec![0u8; 5]);
        let response = UploadResponse {
            secure_url: Some("https://res.cloudinary.com/x/raw/upload/notes.txt".to_string()),
            original_filename: None,
            format: None,
            bytes: None,
            created_at: Some("garbage".to_string()),
        };

        let result = normalize(response, &file).unwrap();

        assert_eq!(result.file_name, "notes.txt");
        assert_eq!(result.file_type, None);
        assert_eq!(result.size, 5);
        assert_eq!(result.uploaded_at, None);
    }

    #[test]
    fn test_normalize_rejects_empty_url() {
        let file = UploadFile::new("a.png", vec![]);
        let response = UploadResponse {
            secure_url: Some(String::new()),
            original_filename: None,
            format: None,
            bytes: None,
            created_at: None,
        };
        assert!(matches!(normalize(response, &file), Err(AdminError::Upload)));
    }
}
