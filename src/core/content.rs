use crate::core::fetch::{CollectionAdapter, FetchState};
use crate::core::session::SessionHandle;
use crate::domain::media::{infer_file_type, ResourceType, UploadFile, UploadResult};
use crate::domain::model::Collection;
use crate::domain::ports::{DocumentStore, MediaUploader};
use crate::domain::records::{study_material_fields, BlogDraft, Entity, HighlightDraft};
use crate::utils::error::Result;
use std::sync::Arc;

/// Write side of the dashboard: form submissions and deletions.
///
/// Every operation is one request (or an upload followed by one insert) and is
/// never retried. Mutations require a signed-in user.
pub struct ContentService<S: DocumentStore + ?Sized, U: MediaUploader + ?Sized> {
    store: Arc<S>,
    uploader: Arc<U>,
    session: SessionHandle,
}

impl<S: DocumentStore + ?Sized, U: MediaUploader + ?Sized> ContentService<S, U> {
    pub fn new(store: Arc<S>, uploader: Arc<U>, session: SessionHandle) -> Self {
        Self {
            store,
            uploader,
            session,
        }
    }

    pub fn adapter<E: Entity>(&self) -> CollectionAdapter<S, E> {
        CollectionAdapter::new(Arc::clone(&self.store))
    }

    pub async fn create_blog(&self, draft: BlogDraft, image: Option<&UploadFile>) -> Result<String> {
        self.session.require_user()?;
        draft.validate()?;

        let image_url = self.upload_image(image).await?;
        let collection = Collection::Blogs;
        let id = self
            .store
            .insert(
                collection,
                draft.into_fields(image_url),
                collection.timestamp_field(),
            )
            .await?;

        tracing::info!(collection = %collection, id = %id, "Blog published");
        Ok(id)
    }

    pub async fn create_highlight(
        &self,
        draft: HighlightDraft,
        image: Option<&UploadFile>,
    ) -> Result<String> {
        self.session.require_user()?;
        draft.validate()?;

        let image_url = self.upload_image(image).await?;
        let collection = Collection::Highlights;
        let id = self
            .store
            .insert(
                collection,
                draft.into_fields(image_url),
                collection.timestamp_field(),
            )
            .await?;

        tracing::info!(collection = %collection, id = %id, "Highlight added");
        Ok(id)
    }

    /// Uploads a document as a raw resource and records it as study material.
    pub async fn upload_study_material(&self, file: &UploadFile) -> Result<String> {
        self.session.require_user()?;

        let uploaded = self.uploader.upload(file, ResourceType::Raw).await?;
        let file_type = infer_file_type(&uploaded, file);
        let name = if file.file_name.trim().is_empty() {
            uploaded.file_name.clone()
        } else {
            file.file_name.clone()
        };

        let collection = Collection::StudyMaterials;
        let id = self
            .store
            .insert(
                collection,
                study_material_fields(name, file_type, uploaded.url),
                collection.timestamp_field(),
            )
            .await?;

        tracing::info!(collection = %collection, id = %id, "Study material uploaded");
        Ok(id)
    }

    /// Uploads without recording anything in the store.
    pub async fn upload_media(
        &self,
        file: &UploadFile,
        resource_type: ResourceType,
    ) -> Result<UploadResult> {
        self.session.require_user()?;
        self.uploader.upload(file, resource_type).await
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.session.require_user()?;
        self.store.delete(collection, id).await?;
        tracing::info!(collection = %collection, id = %id, "Record deleted");
        Ok(())
    }

    /// Deletes and re-reads the adapter's collection so the removal is visible.
    pub async fn delete_and_refresh<E: Entity>(
        &self,
        adapter: &CollectionAdapter<S, E>,
        id: &str,
    ) -> Result<FetchState<E>> {
        self.delete(E::COLLECTION, id).await?;
        Ok(adapter.refresh().await)
    }

    async fn upload_image(&self, image: Option<&UploadFile>) -> Result<String> {
        match image {
            Some(file) => self.uploader.upload_url(file, ResourceType::Image).await,
            None => Ok(String::new()),
        }
    }
}
