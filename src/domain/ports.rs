use crate::domain::media::{ResourceType, UploadFile, UploadResult};
use crate::domain::model::{Collection, Document, Fields};
use crate::domain::session::AuthUser;
use crate::utils::error::Result;
use async_trait::async_trait;

/// External document store holding the four collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection`, newest `order_field` first.
    async fn list_ordered(&self, collection: Collection, order_field: &str)
        -> Result<Vec<Document>>;

    /// Atomic insert. The store sets `timestamp_field` to its own clock. Returns the new id.
    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        timestamp_field: &str,
    ) -> Result<String>;

    /// Atomic remove-by-id. Fails with `NotFound` when no such document exists.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &UploadFile, resource_type: ResourceType)
        -> Result<UploadResult>;

    async fn upload_url(&self, file: &UploadFile, resource_type: ResourceType) -> Result<String> {
        Ok(self.upload(file, resource_type).await?.url)
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;
}
