use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::TodoItem,
    error::AppError,
    services::{
        pagination::PageMeta,
        todo_service::{Listing, ListParams, NewTodo, TodoUpdate},
    },
    state::AppState,
};

const INVALID_QUERY_MESSAGE: &str = "Invalid query";

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
}

/// Owner and timestamps may be present in the body; they are not applied.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub paging_state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CursorListResponse {
    pub todos: Vec<TodoResponse>,
    pub paging_state: String,
}

#[derive(Debug, Serialize)]
pub struct OffsetListResponse {
    pub todos: Vec<TodoResponse>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    Cursor(CursorListResponse),
    Offset(OffsetListResponse),
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route(
            "/todos/{id}",
            get(read_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let Json(body) = body.map_err(json_rejection)?;
    let item = state
        .todo_service()
        .create(NewTodo {
            user_id: body.user_id,
            title: body.title,
            description: body.description,
            status: body.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

async fn read_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let Path(id) = id.map_err(path_rejection)?;
    let item = state.todo_service().get(id).await?;
    Ok(Json(item.into()))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id.map_err(path_rejection)?;
    let Json(body) = body.map_err(json_rejection)?;
    state
        .todo_service()
        .update(
            id,
            TodoUpdate {
                title: body.title,
                description: body.description,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "TODO item updated",
    }))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id.map_err(path_rejection)?;
    state.todo_service().delete(id).await?;
    Ok(Json(MessageResponse {
        message: "TODO item deleted",
    }))
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(query) = query
        .map_err(|err| AppError::bad_request(format!("{INVALID_QUERY_MESSAGE}: {err}")))?;
    let listing = state
        .todo_service()
        .list(ListParams {
            user_id: query.user_id,
            status: query.status,
            limit: query.limit,
            page: query.page,
            paging_state: query.paging_state,
        })
        .await?;

    let response = match listing {
        Listing::Cursor(listing) => ListResponse::Cursor(CursorListResponse {
            todos: listing.items.into_iter().map(TodoResponse::from).collect(),
            paging_state: listing.paging_state,
        }),
        Listing::Offset(listing) => ListResponse::Offset(OffsetListResponse {
            todos: listing.items.into_iter().map(TodoResponse::from).collect(),
            meta: listing.meta,
        }),
    };
    Ok(Json(response))
}

fn json_rejection(err: JsonRejection) -> AppError {
    AppError::bad_request(err.body_text())
}

fn path_rejection(err: PathRejection) -> AppError {
    AppError::bad_request(err.body_text())
}

impl From<TodoItem> for TodoResponse {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            title: item.title,
            description: item.description,
            status: item.status,
            created: item.created,
            updated: item.updated,
        }
    }
}
