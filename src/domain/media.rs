use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Processing hint passed to the media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    /// Documents and other files stored byte-for-byte.
    Raw,
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Raw => "raw",
            ResourceType::Auto => "auto",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file picked for upload, held in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    /// Lower-cased extension of the local file name.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
    }
}

/// Normalized metadata of a completed upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    /// Always a non-empty https URL.
    pub url: String,
    pub file_name: String,
    /// Format detected by the media host, if it reported one.
    pub file_type: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub size: u64,
}

/// Provider-detected format, else the local extension, else `unknown`.
pub fn infer_file_type(result: &UploadResult, file: &UploadFile) -> String {
    result
        .file_type
        .as_deref()
        .map(str::trim)
        .filter(|format| !format.is_empty())
        .map(str::to_string)
        .or_else(|| file.extension())
        .unwrap_or_else(|| "unknown".to_string())
}
