use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::prelude::TodoItems;
use super::entities::todo_item;
use super::error::{StoreError, StoreResult};
use super::store::{CursorPage, OwnerFilter, TodoChanges, TodoItem, TodoStore};

/// `TodoStore` over a sea-orm connection (Postgres or SQLite).
///
/// Cursor pages are keyset scans ordered by id; the paging state is the raw
/// 16 bytes of the last id handed out. Ids are UUIDv7 so byte order follows
/// creation order.
#[derive(Clone)]
pub struct SqlTodoStore {
    db: DatabaseConnection,
    backend: &'static str,
}

impl SqlTodoStore {
    pub fn new(db: DatabaseConnection, backend: &'static str) -> Self {
        Self { db, backend }
    }

    /// Creates the `items` table and its indexes from the entity definition.
    pub async fn sync_schema(&self) -> StoreResult<()> {
        self.db
            .get_schema_registry("scylla_todo::db::entities::*")
            .sync(&self.db)
            .await?;
        Ok(())
    }

    fn owner_query(filter: &OwnerFilter) -> Select<TodoItems> {
        let query = TodoItems::find().filter(todo_item::Column::UserId.eq(filter.user_id));
        match filter.status.as_deref() {
            Some(status) => query.filter(todo_item::Column::Status.eq(status)),
            None => query,
        }
    }
}

fn decode_position(bytes: &[u8]) -> StoreResult<Uuid> {
    Uuid::from_slice(bytes).map_err(|_| StoreError::InvalidPagingState)
}

#[async_trait]
impl TodoStore for SqlTodoStore {
    fn backend(&self) -> &'static str {
        self.backend
    }

    async fn insert(&self, item: &TodoItem) -> StoreResult<()> {
        TodoItems::insert(todo_item::ActiveModel::from(item))
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> StoreResult<TodoItem> {
        TodoItems::find_by_id(id)
            .one(&self.db)
            .await?
            .map(TodoItem::from)
            .ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: Uuid, changes: &TodoChanges) -> StoreResult<()> {
        TodoItems::update_many()
            .set(todo_item::ActiveModel {
                title: Set(changes.title.clone()),
                description: Set(changes.description.clone()),
                status: Set(changes.status.clone()),
                updated: Set(changes.updated),
                ..Default::default()
            })
            .filter(todo_item::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        TodoItems::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn count(&self, filter: &OwnerFilter) -> StoreResult<u64> {
        Ok(Self::owner_query(filter).count(&self.db).await?)
    }

    async fn fetch_window(
        &self,
        filter: &OwnerFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<TodoItem>> {
        let rows = Self::owner_query(filter)
            .order_by_asc(todo_item::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn fetch_page(
        &self,
        filter: &OwnerFilter,
        limit: u32,
        paging_state: Option<Vec<u8>>,
    ) -> StoreResult<CursorPage> {
        let after = paging_state.as_deref().map(decode_position).transpose()?;

        let mut query = Self::owner_query(filter).order_by_asc(todo_item::Column::Id);
        if let Some(after) = after {
            query = query.filter(todo_item::Column::Id.gt(after));
        }

        let page_size = limit as usize;
        let mut rows = query
            .limit(u64::from(limit).saturating_add(1))
            .all(&self.db)
            .await?;

        let has_more = rows.len() > page_size;
        if has_more {
            rows.truncate(page_size);
        }
        let paging_state = match rows.last() {
            Some(last) if has_more => Some(last.id.as_bytes().to_vec()),
            _ => None,
        };

        Ok(CursorPage {
            items: rows.into_iter().map(TodoItem::from).collect(),
            paging_state,
        })
    }

    async fn close(&self) -> StoreResult<()> {
        self.db.close_by_ref().await?;
        Ok(())
    }
}
