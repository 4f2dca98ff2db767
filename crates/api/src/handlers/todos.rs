//! Handlers for the `/todos` resource.
//!
//! Create and update accept multipart forms because the client sends the
//! todo fields together with an optional image upload. Everything else is
//! plain JSON.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tasca_core::error::CoreError;
use tasca_core::todo::{Importance, Status};
use tasca_core::types::{DbId, Timestamp};
use tasca_db::models::todo::{TodoFilters, TodoWithCategory};

use crate::error::{AppError, AppResult};
use crate::service::todos::{self, Pagination, TodoInput, UploadedImage, DEFAULT_PAGE_SIZE};
use crate::state::AppState;

/// Query parameters for the todo listing endpoint. Date bounds accept either
/// RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
#[derive(Debug, Default, Deserialize)]
pub struct TodoListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<DbId>,
    pub importance: Option<String>,
}

/// Response envelope for the todo listing endpoint.
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoWithCategory>,
    pub pagination: Pagination,
}

/// Body for PATCH /todos/{id}/status. The status arrives as a string so a
/// bad value yields the API's own 400 envelope instead of a serde reject.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// Body for PATCH /todos/{id}/importance.
#[derive(Debug, Deserialize)]
pub struct ImportanceBody {
    pub importance: String,
}

/// GET /api/todos
///
/// List todos newest first with optional filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TodoListQuery>,
) -> AppResult<Json<TodoListResponse>> {
    let filters = build_filters(&query)?;
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let (todos, pagination) = todos::list(&state, &filters, page, limit).await?;
    Ok(Json(TodoListResponse { todos, pagination }))
}

/// GET /api/todos/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TodoWithCategory>> {
    let todo = todos::get(&state, id).await?;
    Ok(Json(todo))
}

/// POST /api/todos
///
/// Multipart form: `title`, `description`, `category_id`, `importance` and
/// an optional `image` file part. New todos always start as `Active`.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<TodoWithCategory>)> {
    let form = parse_todo_form(multipart).await?;
    let todo = todos::create(&state, form.input, form.image).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/todos/{id}
///
/// Full replacement via the same multipart form as create, plus `status`
/// and the image removal convention: a fresh `image` part replaces the
/// stored file, an empty `image` part or `removeImage=true` deletes it,
/// and omitting the field keeps it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<TodoWithCategory>> {
    let form = parse_todo_form(multipart).await?;
    let todo = todos::update(&state, id, form.input, form.image, form.remove_image).await?;
    Ok(Json(todo))
}

/// DELETE /api/todos/{id}
///
/// Fails if the mirrored Trello card cannot be deleted.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    todos::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/todos/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<StatusBody>,
) -> AppResult<Json<TodoWithCategory>> {
    let status = Status::parse(&body.status)?;
    let todo = todos::update_status(&state, id, status).await?;
    Ok(Json(todo))
}

/// PATCH /api/todos/{id}/importance
pub async fn update_importance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ImportanceBody>,
) -> AppResult<Json<TodoWithCategory>> {
    let importance = Importance::parse(&body.importance)?;
    let todo = todos::update_importance(&state, id, importance).await?;
    Ok(Json(todo))
}

/// Everything a todo multipart form can carry.
struct TodoForm {
    input: TodoInput,
    image: Option<UploadedImage>,
    remove_image: bool,
}

/// Parse the multipart form shared by create and update. Unknown fields are
/// ignored; field-level decode errors surface as 400s.
async fn parse_todo_form(mut multipart: Multipart) -> AppResult<TodoForm> {
    let mut input = TodoInput::default();
    let mut image: Option<UploadedImage> = None;
    let mut remove_image = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => input.title = text(field).await?,
            "description" => input.description = Some(text(field).await?),
            "category_id" => {
                // A non-numeric value falls through to the "valid category
                // is required" validation instead of erroring here.
                input.category_id = text(field).await?.trim().parse().ok();
            }
            "importance" => input.importance = Some(text(field).await?),
            "status" => input.status = Some(text(field).await?),
            "image" => {
                let mime = field.content_type().unwrap_or("").to_string();
                let filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if data.is_empty() {
                    // An empty part is the client clearing the image.
                    remove_image = true;
                } else {
                    image = Some(UploadedImage {
                        bytes: data.to_vec(),
                        mime,
                        filename,
                    });
                }
            }
            "removeImage" => {
                remove_image = text(field).await? == "true";
            }
            _ => {}
        }
    }

    Ok(TodoForm {
        input,
        image,
        remove_image,
    })
}

async fn text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Turn the raw query strings into typed filters, validating enum values
/// and date bounds.
fn build_filters(query: &TodoListQuery) -> Result<TodoFilters, AppError> {
    let status = query.status.as_deref().map(Status::parse).transpose()?;
    let importance = query
        .importance
        .as_deref()
        .map(Importance::parse)
        .transpose()?;

    Ok(TodoFilters {
        start_date: parse_date_bound(query.start_date.as_deref(), false)?,
        end_date: parse_date_bound(query.end_date.as_deref(), true)?,
        status,
        category_id: query.category_id,
        importance,
    })
}

/// Parse a date filter bound. Bare dates expand to the start of the day for
/// lower bounds and the end of the day for upper bounds, so `endDate` is
/// inclusive of the named day.
fn parse_date_bound(raw: Option<&str>, is_upper: bool) -> Result<Option<Timestamp>, CoreError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date filter: {raw}")))?;
    let time = if is_upper {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    // Both constructions use in-range constants.
    Ok(time.map(|t| t.and_utc()))
}
