use crate::domain::model::{Collection, Document, FieldValue, Fields};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_document_id;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-process document store with the same ordering and precondition rules as
/// the hosted one. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<Collection, Vec<Stored>>,
    last_stamp: Option<DateTime<Utc>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Stored {
    seq: u64,
    doc: Document,
}

impl Inner {
    /// Store clock. Strictly increasing so inserts never tie.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        let inner = self.inner.lock().await;
        inner.collections.get(&collection).map_or(0, Vec::len)
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Option<Document> {
        let inner = self.inner.lock().await;
        inner
            .collections
            .get(&collection)?
            .iter()
            .find(|stored| stored.doc.id == id)
            .map(|stored| stored.doc.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_ordered(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let inner = self.inner.lock().await;
        let mut stored: Vec<Stored> = inner
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|s| s.doc.fields.contains_key(order_field))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        stored.sort_by(|a, b| {
            let a_ts = a.doc.fields.get(order_field).and_then(FieldValue::as_timestamp);
            let b_ts = b.doc.fields.get(order_field).and_then(FieldValue::as_timestamp);
            b_ts.cmp(&a_ts).then(b.seq.cmp(&a.seq))
        });

        Ok(stored.into_iter().map(|s| s.doc).collect())
    }

    async fn insert(
        &self,
        collection: Collection,
        mut fields: Fields,
        timestamp_field: &str,
    ) -> Result<String> {
        let mut inner = self.inner.lock().await;
        let stamp = inner.stamp();
        fields.insert(timestamp_field.to_string(), FieldValue::Timestamp(stamp));

        let id = uuid::Uuid::new_v4().simple().to_string();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(Stored {
                seq,
                doc: Document::new(id.clone(), fields),
            });

        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        validate_document_id(id)?;
        let mut inner = self.inner.lock().await;
        let docs = inner.collections.entry(collection).or_default();
        match docs.iter().position(|stored| stored.doc.id == id) {
            Some(index) => {
                docs.remove(index);
                Ok(())
            }
            None => Err(AdminError::NotFound {
                collection: collection.name().to_string(),
                id: id.to_string(),
            }),
        }
    }
}
