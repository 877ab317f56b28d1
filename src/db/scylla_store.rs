use std::pin::pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::{Stream, TryStreamExt};
use scylla::DeserializeRow;
use scylla::client::session::Session;
use scylla::response::{PagingState, PagingStateResponse};
use scylla::statement::prepared::PreparedStatement;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::store::{CursorPage, OwnerFilter, TodoChanges, TodoItem, TodoStore};

const INSERT_ITEM: &str = "INSERT INTO items (id, user_id, title, description, status, created, updated) \
     VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_ITEM: &str = "SELECT id, user_id, title, description, status, created, updated \
     FROM items WHERE id = ?";
// IF EXISTS keeps a missing id from materialising a row with only these columns.
const UPDATE_ITEM: &str = "UPDATE items SET title = ?, description = ?, status = ?, updated = ? \
     WHERE id = ? IF EXISTS";
const DELETE_ITEM: &str = "DELETE FROM items WHERE id = ?";
const SELECT_BY_OWNER: &str = "SELECT id, user_id, title, description, status, created, updated \
     FROM items WHERE user_id = ?";
const SELECT_BY_OWNER_STATUS: &str = "SELECT id, user_id, title, description, status, created, updated \
     FROM items WHERE user_id = ? AND status = ? ALLOW FILTERING";
const COUNT_BY_OWNER: &str = "SELECT COUNT(*) FROM items WHERE user_id = ?";
const COUNT_BY_OWNER_STATUS: &str =
    "SELECT COUNT(*) FROM items WHERE user_id = ? AND status = ? ALLOW FILTERING";

#[derive(Debug, DeserializeRow)]
struct ItemRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    status: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<ItemRow> for TodoItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            status: row.status,
            created: row.created,
            updated: row.updated,
        }
    }
}

struct Statements {
    insert: PreparedStatement,
    select: PreparedStatement,
    update: PreparedStatement,
    delete: PreparedStatement,
    by_owner: PreparedStatement,
    by_owner_status: PreparedStatement,
    count_by_owner: PreparedStatement,
    count_by_owner_status: PreparedStatement,
}

impl Statements {
    async fn prepare(session: &Session) -> StoreResult<Self> {
        let prepare = |cql: &'static str| async move {
            session.prepare(cql).await.map_err(StoreError::backend)
        };

        Ok(Self {
            insert: prepare(INSERT_ITEM).await?,
            select: prepare(SELECT_ITEM).await?,
            update: prepare(UPDATE_ITEM).await?,
            delete: prepare(DELETE_ITEM).await?,
            by_owner: prepare(SELECT_BY_OWNER).await?,
            by_owner_status: prepare(SELECT_BY_OWNER_STATUS).await?,
            count_by_owner: prepare(COUNT_BY_OWNER).await?,
            count_by_owner_status: prepare(COUNT_BY_OWNER_STATUS).await?,
        })
    }

    fn listing(&self, filter: &OwnerFilter) -> &PreparedStatement {
        match filter.status {
            Some(_) => &self.by_owner_status,
            None => &self.by_owner,
        }
    }
}

/// Rows `offset..offset + limit` of a scan, in scan order. Polling stops as
/// soon as the window is full, so later pages are never fetched.
async fn collect_window<S, T, E>(rows: S, offset: u64, limit: u64) -> Result<Vec<T>, E>
where
    S: Stream<Item = Result<T, E>>,
{
    let mut rows = pin!(rows);
    let mut items = Vec::new();
    if limit == 0 {
        return Ok(items);
    }

    let mut position = 0u64;
    while let Some(row) = rows.try_next().await? {
        if position >= offset {
            items.push(row);
            if items.len() as u64 >= limit {
                break;
            }
        }
        position += 1;
    }
    Ok(items)
}

/// A request-side paging state; `None` starts a fresh scan.
fn resume_from(paging_state: Option<Vec<u8>>) -> PagingState {
    match paging_state {
        Some(bytes) => PagingState::new_from_raw_bytes(bytes),
        None => PagingState::start(),
    }
}

/// The raw bytes to hand back to the client, or `None` once the scan is done.
fn next_paging_state(response: PagingStateResponse) -> Option<Vec<u8>> {
    match response {
        PagingStateResponse::HasMorePages { state } => {
            state.as_bytes_slice().map(|bytes| bytes.to_vec())
        }
        PagingStateResponse::NoMorePages => None,
    }
}

/// `TodoStore` over a ScyllaDB / Cassandra session.
///
/// Every statement is prepared once at construction. Consistency comes from the
/// session's default execution profile.
pub struct ScyllaTodoStore {
    session: Session,
    statements: Statements,
}

impl ScyllaTodoStore {
    pub async fn new(session: Session) -> StoreResult<Self> {
        let statements = Statements::prepare(&session).await?;
        Ok(Self {
            session,
            statements,
        })
    }
}

#[async_trait]
impl TodoStore for ScyllaTodoStore {
    fn backend(&self) -> &'static str {
        "scylla"
    }

    async fn insert(&self, item: &TodoItem) -> StoreResult<()> {
        self.session
            .execute_unpaged(
                &self.statements.insert,
                (
                    item.id,
                    item.user_id,
                    &item.title,
                    &item.description,
                    &item.status,
                    item.created,
                    item.updated,
                ),
            )
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> StoreResult<TodoItem> {
        let row = self
            .session
            .execute_unpaged(&self.statements.select, (id,))
            .await
            .map_err(StoreError::backend)?
            .into_rows_result()
            .map_err(StoreError::backend)?
            .maybe_first_row::<ItemRow>()
            .map_err(StoreError::backend)?;

        row.map(TodoItem::from).ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: Uuid, changes: &TodoChanges) -> StoreResult<()> {
        // The [applied] column is ignored: a missing id is a successful no-op.
        self.session
            .execute_unpaged(
                &self.statements.update,
                (
                    &changes.title,
                    &changes.description,
                    &changes.status,
                    changes.updated,
                    id,
                ),
            )
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.session
            .execute_unpaged(&self.statements.delete, (id,))
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn count(&self, filter: &OwnerFilter) -> StoreResult<u64> {
        let result = match filter.status.as_deref() {
            Some(status) => {
                self.session
                    .execute_unpaged(
                        &self.statements.count_by_owner_status,
                        (filter.user_id, status),
                    )
                    .await
            }
            None => {
                self.session
                    .execute_unpaged(&self.statements.count_by_owner, (filter.user_id,))
                    .await
            }
        }
        .map_err(StoreError::backend)?;

        let (count,) = result
            .into_rows_result()
            .map_err(StoreError::backend)?
            .single_row::<(i64,)>()
            .map_err(StoreError::backend)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn fetch_window(
        &self,
        filter: &OwnerFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<TodoItem>> {
        // CQL has no OFFSET: stream in scan order and stop once the window is full.
        let statement = self.statements.listing(filter).clone();
        let pager = match filter.status.clone() {
            Some(status) => {
                self.session
                    .execute_iter(statement, (filter.user_id, status))
                    .await
            }
            None => self.session.execute_iter(statement, (filter.user_id,)).await,
        }
        .map_err(StoreError::backend)?;

        let rows = pager
            .rows_stream::<ItemRow>()
            .map_err(StoreError::backend)?;

        let rows = collect_window(rows, offset, limit)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn fetch_page(
        &self,
        filter: &OwnerFilter,
        limit: u32,
        paging_state: Option<Vec<u8>>,
    ) -> StoreResult<CursorPage> {
        let page_size = i32::try_from(limit).map_err(StoreError::backend)?;
        let mut statement = self.statements.listing(filter).clone();
        statement.set_page_size(page_size);

        let paging_state = resume_from(paging_state);

        let (result, response) = match filter.status.as_deref() {
            Some(status) => {
                self.session
                    .execute_single_page(&statement, (filter.user_id, status), paging_state)
                    .await
            }
            None => {
                self.session
                    .execute_single_page(&statement, (filter.user_id,), paging_state)
                    .await
            }
        }
        .map_err(StoreError::backend)?;

        let items = result
            .into_rows_result()
            .map_err(StoreError::backend)?
            .rows::<ItemRow>()
            .map_err(StoreError::backend)?
            .map(|row| row.map(TodoItem::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::backend)?;

        Ok(CursorPage {
            items,
            paging_state: next_paging_state(response),
        })
    }

    async fn close(&self) -> StoreResult<()> {
        // The driver has no explicit close; its pools shut down when the last
        // handle to the session is dropped.
        tracing::debug!("scylla session released on drop");
        Ok(())
    }
}
