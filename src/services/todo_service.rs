use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::{ListPolicy, ListingConfig},
    db::{OwnerFilter, TodoChanges, TodoItem, TodoStore},
    error::AppError,
    services::{
        clock::MillisClock,
        pagination::{self, PageMeta, PageWindow},
    },
};

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct TodoUpdate {
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub paging_state: Option<String>,
}

#[derive(Debug)]
pub struct CursorListing {
    pub items: Vec<TodoItem>,
    pub paging_state: String,
}

#[derive(Debug)]
pub struct OffsetListing {
    pub items: Vec<TodoItem>,
    pub meta: PageMeta,
}

#[derive(Debug)]
pub enum Listing {
    Cursor(CursorListing),
    Offset(OffsetListing),
}

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    listing: ListingConfig,
    clock: Arc<MillisClock>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, listing: ListingConfig, clock: Arc<MillisClock>) -> Self {
        Self {
            store,
            listing,
            clock,
        }
    }

    pub async fn create(&self, input: NewTodo) -> Result<TodoItem, AppError> {
        let now = self.clock.now();
        let item = TodoItem {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            title: input.title,
            description: input.description,
            status: input.status,
            created: now,
            updated: now,
        };

        self.store.insert(&item).await?;
        tracing::debug!(id = %item.id, user_id = %item.user_id, "todo item created");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> Result<TodoItem, AppError> {
        Ok(self.store.fetch(id).await?)
    }

    pub async fn update(&self, id: Uuid, input: TodoUpdate) -> Result<(), AppError> {
        let changes = TodoChanges {
            title: input.title,
            description: input.description,
            status: input.status,
            updated: self.clock.now(),
        };
        self.store.update(id, &changes).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(id).await?;
        Ok(())
    }

    /// Serves `GET /todos` with whichever policy this deployment runs.
    pub async fn list(&self, params: ListParams) -> Result<Listing, AppError> {
        let filter = owner_filter(params.user_id.as_deref(), params.status)?;
        let limit = pagination::resolve_limit(params.limit, &self.listing)?;

        match self.listing.policy {
            ListPolicy::Cursor => self
                .list_cursor(filter, limit, params.paging_state.as_deref())
                .await
                .map(Listing::Cursor),
            ListPolicy::Offset => {
                let window = PageWindow::new(params.page, limit)?;
                self.list_offset(filter, window).await.map(Listing::Offset)
            }
        }
    }

    pub async fn list_cursor(
        &self,
        filter: OwnerFilter,
        limit: u64,
        paging_state: Option<&str>,
    ) -> Result<CursorListing, AppError> {
        let paging_state = pagination::decode_paging_state(paging_state)?;
        let limit = u32::try_from(limit)
            .map_err(|_| AppError::bad_request(format!("Invalid limit: {limit}")))?;

        let page = self.store.fetch_page(&filter, limit, paging_state).await?;
        Ok(CursorListing {
            items: page.items,
            paging_state: pagination::encode_paging_state(page.paging_state.as_deref()),
        })
    }

    /// Count, then fetch the window. The two reads are not a snapshot; a
    /// concurrent write can make `totalCount` disagree with the page.
    pub async fn list_offset(
        &self,
        filter: OwnerFilter,
        window: PageWindow,
    ) -> Result<OffsetListing, AppError> {
        let total_count = self.store.count(&filter).await?;
        let items = if window.offset() >= total_count {
            Vec::new()
        } else {
            self.store
                .fetch_window(&filter, window.offset(), window.limit)
                .await?
        };

        Ok(OffsetListing {
            items,
            meta: PageMeta::new(window, total_count),
        })
    }
}

pub fn owner_filter(user_id: Option<&str>, status: Option<String>) -> Result<OwnerFilter, AppError> {
    let user_id = user_id.map(str::trim).unwrap_or_default();
    if user_id.is_empty() {
        return Err(AppError::bad_request("user_id is required"));
    }
    let user_id = Uuid::parse_str(user_id)
        .map_err(|err| AppError::bad_request(format!("Invalid user_id: {err}")))?;
    Ok(OwnerFilter::new(user_id, status))
}
