mod dynamo;
pub use dynamo::DynamoStorage;

mod memory;
pub use memory::MemoryStorage;

use async_trait::async_trait;

use crate::{
    error::StorageError,
    item::Item,
    key::{ItemKey, KeyValue},
    query::SortCondition,
};

/// Most keys a single batch-get call may carry, matching the provider's
/// per-call maximum. The facade does not chunk or retry around it.
pub const MAX_BATCH_GET_KEYS: usize = 100;

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub table: String,
    pub key: ItemKey,
}

#[derive(Debug, Clone)]
pub struct BatchGetRequest {
    pub table: String,
    pub keys: Vec<ItemKey>,
}

/// A batch-get result. `unprocessed_keys` is the collaborator's report of
/// keys it declined to serve this call; the facade logs and omits them.
#[derive(Debug, Default)]
pub struct BatchGetResponse {
    pub items: Vec<Item>,
    pub unprocessed_keys: Vec<ItemKey>,
}

#[derive(Debug, Clone)]
pub struct PutRequest {
    pub table: String,
    pub item: Item,
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub table: String,
    /// Queries this index instead of the base table when set.
    pub index_name: Option<String>,
    pub partition: KeyValue,
    pub sort_condition: Option<SortCondition>,
    /// The sort attribute of the queried table or index; collaborators that
    /// order results themselves order by this attribute.
    pub sort_key_name: String,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Item>,
    pub descending: bool,
}

#[derive(Debug, Default)]
pub struct QueryResponse {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

/// The remote storage collaborator: plain request/response primitives with
/// no retry, ordering, or encryption concerns of its own.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, request: GetRequest) -> Result<Option<Item>, StorageError>;

    async fn batch_get_items(
        &self,
        request: BatchGetRequest,
    ) -> Result<BatchGetResponse, StorageError>;

    async fn put_item(&self, request: PutRequest) -> Result<(), StorageError>;

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, StorageError>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    async fn get_item(&self, request: GetRequest) -> Result<Option<Item>, StorageError> {
        (**self).get_item(request).await
    }

    async fn batch_get_items(
        &self,
        request: BatchGetRequest,
    ) -> Result<BatchGetResponse, StorageError> {
        (**self).batch_get_items(request).await
    }

    async fn put_item(&self, request: PutRequest) -> Result<(), StorageError> {
        (**self).put_item(request).await
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, StorageError> {
        (**self).query(request).await
    }
}
