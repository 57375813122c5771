use crate::adapters::firestore_value::{decode_document, encode_fields};
use crate::config::FirebaseConfig;
use crate::core::session::SessionHandle;
use crate::domain::model::{Collection, Document, Fields};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_document_id;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

/// Document store backed by the Firestore REST API.
///
/// Requests carry the signed-in user's ID token when there is one.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    /// `projects/{project}/databases/{database}/documents`
    documents_path: String,
    api_key: Option<String>,
    session: SessionHandle,
}

impl FirestoreStore {
    pub fn new(
        base_url: impl Into<String>,
        project_id: &str,
        database: &str,
        session: SessionHandle,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            documents_path: format!("projects/{}/databases/{}/documents", project_id, database),
            api_key: None,
            session,
        }
    }

    pub fn from_config(config: &FirebaseConfig, session: SessionHandle) -> Self {
        Self::new(
            config.firestore_url.clone(),
            &config.project_id,
            &config.database,
            session,
        )
        .with_api_key(config.api_key.clone())
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.documents_path, suffix)
    }

    /// URL of one document. The id is encoded as a single path segment.
    fn document_url(&self, collection: Collection, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("")).map_err(|e| AdminError::Config {
            message: format!("Invalid Firestore URL: {}", e),
        })?;
        url.path_segments_mut()
            .map_err(|_| AdminError::Config {
                message: "Firestore URL cannot take a path".to_string(),
            })?
            .push(collection.name())
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        match self.session.current_user() {
            Some(user) => request.bearer_auth(user.id_token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);

        Err(AdminError::Store {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_ordered(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection.name() }],
                "orderBy": [{
                    "field": { "fieldPath": order_field },
                    "direction": "DESCENDING"
                }]
            }
        });

        let url = self.url(":runQuery");
        tracing::debug!("Running query on {} via {}", collection, url);
        let response = self
            .authorize(self.client.post(&url))
            .json(&query)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            // Rows without a document only carry read metadata.
            let Some(resource) = row.get("document") else {
                continue;
            };
            match decode_document(resource) {
                Ok(doc) => documents.push(doc),
                Err(e) => tracing::warn!(collection = %collection, error = %e, "Skipping document"),
            }
        }

        Ok(documents)
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        timestamp_field: &str,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{}/{}/{}", self.documents_path, collection.name(), id);

        // Insert and server timestamp land in a single atomic commit.
        let body = json!({
            "writes": [{
                "update": { "name": name, "fields": encode_fields(&fields) },
                "updateTransforms": [{
                    "fieldPath": timestamp_field,
                    "setToServerValue": "REQUEST_TIME"
                }],
                "currentDocument": { "exists": false }
            }]
        });

        let url = self.url(":commit");
        tracing::debug!("Committing new document {} to {}", id, collection);
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;

        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        validate_document_id(id)?;
        let url = self.document_url(collection, id)?;
        tracing::debug!("Deleting {}", url);
        let response = self
            .authorize(self.client.delete(url))
            .query(&[("currentDocument.exists", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AdminError::NotFound {
                collection: collection.name().to_string(),
                id: id.to_string(),
            });
        }
        Self::check(response).await?;
        Ok(())
    }
}
