use crate::domain::ports::DocumentStore;
use crate::domain::records::Entity;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot handed to views: the records plus whether a read is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<E> {
    pub records: Vec<E>,
    pub loading: bool,
}

impl<E> Default for FetchState<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
        }
    }
}

/// Reads one collection, newest first.
///
/// Every read goes to the store; nothing is cached between adapters. A failed
/// read is logged and leaves `records` empty, so callers see the same state as
/// for an empty collection. After a create or delete the caller re-runs
/// [`refresh`](CollectionAdapter::refresh) to see the change.
pub struct CollectionAdapter<S: DocumentStore + ?Sized, E: Entity> {
    store: Arc<S>,
    state: watch::Sender<FetchState<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<S: DocumentStore + ?Sized, E: Entity> CollectionAdapter<S, E> {
    pub fn new(store: Arc<S>) -> Self {
        let (state, _rx) = watch::channel(FetchState::default());
        Self {
            store,
            state,
            _entity: PhantomData,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<E>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState<E> {
        self.state.borrow().clone()
    }

    pub async fn fetch_all(&self) -> FetchState<E> {
        let collection = E::COLLECTION;
        self.state.send_modify(|state| state.loading = true);

        let records = match self
            .store
            .list_ordered(collection, collection.timestamp_field())
            .await
        {
            Ok(documents) => {
                tracing::debug!(
                    collection = %collection,
                    count = documents.len(),
                    "Fetched documents"
                );
                documents.iter().map(E::from_document).collect()
            }
            Err(e) => {
                tracing::error!(collection = %collection, error = %e, "Error fetching records");
                Vec::new()
            }
        };

        let snapshot = FetchState {
            records,
            loading: false,
        };
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    /// Re-reads the collection after a mutation.
    pub async fn refresh(&self) -> FetchState<E> {
        self.fetch_all().await
    }
}
