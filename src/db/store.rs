use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::StoreResult;

/// A persisted todo item, as every backend returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Column values written by an update. Everything else on the row is immutable.
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub title: String,
    pub description: String,
    pub status: String,
    pub updated: DateTime<Utc>,
}

/// Owner filter shared by both list policies; `status` narrows it further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFilter {
    pub user_id: Uuid,
    pub status: Option<String>,
}

impl OwnerFilter {
    pub fn new(user_id: Uuid, status: Option<String>) -> Self {
        let status = status.filter(|value| !value.is_empty());
        Self { user_id, status }
    }
}

/// One page of a cursor scan. `paging_state` is `None` once the scan is exhausted.
#[derive(Debug, Clone, Default)]
pub struct CursorPage {
    pub items: Vec<TodoItem>,
    pub paging_state: Option<Vec<u8>>,
}

/// Persistence seam for the todo service.
///
/// Implementations are shared across all requests for the life of the process,
/// so they must be cheap to call concurrently. Each method is a single logical
/// statement; nothing here is transactional.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    async fn insert(&self, item: &TodoItem) -> StoreResult<()>;

    /// Returns `StoreError::NotFound` when no row has this id.
    async fn fetch(&self, id: Uuid) -> StoreResult<TodoItem>;

    /// Unconditional overwrite. A missing id is not an error.
    async fn update(&self, id: Uuid, changes: &TodoChanges) -> StoreResult<()>;

    /// Unconditional delete. A missing id is not an error.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn count(&self, filter: &OwnerFilter) -> StoreResult<u64>;

    /// Rows `offset..offset + limit` of the owner's items in backend scan order.
    async fn fetch_window(
        &self,
        filter: &OwnerFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<TodoItem>>;

    /// Up to `limit` rows starting where `paging_state` left off.
    /// Unreadable paging state yields `StoreError::InvalidPagingState`.
    async fn fetch_page(
        &self,
        filter: &OwnerFilter,
        limit: u32,
        paging_state: Option<Vec<u8>>,
    ) -> StoreResult<CursorPage>;

    async fn close(&self) -> StoreResult<()>;
}
