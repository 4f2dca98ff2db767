//! Todo write paths: transactional create/update/delete with image
//! side-effects and best-effort Trello mirroring, plus filtered listing.
//!
//! Policy on Trello failures (see DESIGN.md): create, update, status and
//! importance changes log and continue; delete propagates a failed card
//! delete and aborts. Image file deletion never blocks anything.

use serde::Serialize;
use tasca_core::error::CoreError;
use tasca_core::todo::{self, Importance, Status};
use tasca_core::types::DbId;
use tasca_db::models::todo::{NewTodo, TodoFilters, TodoValues, TodoWithCategory};
use tasca_db::repositories::{CategoryRepo, TodoRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw todo fields as parsed from a multipart form. Validation happens here,
/// not in the handler.
#[derive(Debug, Default)]
pub struct TodoInput {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub importance: Option<String>,
    pub status: Option<String>,
}

/// An uploaded image: raw bytes plus the declared metadata.
#[derive(Debug)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: Option<String>,
}

/// Pagination envelope returned by the list endpoint. Field names mirror
/// the original API's camelCase wire format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// Default page size when the query omits `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Upper bound on `limit` to keep a single response bounded.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Create a todo, optionally storing an image and mirroring a Trello card.
///
/// All validation runs before any file write or transaction. The stored
/// image is deleted again if the database work fails (best-effort
/// compensation, not a two-phase commit). The Trello card create happens
/// between insert and commit; its failure is logged and the todo still
/// succeeds.
pub async fn create(
    state: &AppState,
    input: TodoInput,
    image: Option<UploadedImage>,
) -> AppResult<TodoWithCategory> {
    let new_todo = validate_input(state, &input).await?;
    if let Some(image) = &image {
        state.images.validate(&image.mime, image.bytes.len())?;
    }

    let image_path = match &image {
        Some(image) => Some(
            state
                .images
                .store(&image.bytes, &image.mime, image.filename.as_deref())
                .await?,
        ),
        None => None,
    };

    match create_in_tx(state, &new_todo, image_path.as_deref()).await {
        Ok(todo) => Ok(todo),
        Err(err) => {
            // Compensate: don't leave an orphaned file behind a failed insert.
            if let Some(path) = &image_path {
                state.images.delete(path).await;
            }
            Err(err)
        }
    }
}

async fn create_in_tx(
    state: &AppState,
    new_todo: &NewTodo,
    image_path: Option<&str>,
) -> AppResult<TodoWithCategory> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let inserted = TodoRepo::insert(&mut *tx, new_todo, image_path)
        .await
        .map_err(AppError::Database)?;
    let mut todo = TodoRepo::find_with_category(&mut *tx, inserted.id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InternalError("Created todo vanished".to_string()))?;

    match state
        .trello
        .create_card(&todo.title, todo.description.as_deref(), todo.importance)
        .await
    {
        Ok(Some(card_id)) => {
            if let Some(path) = image_path {
                let file = state.images.path_of(path);
                if let Err(err) = state.trello.upload_attachment(&card_id, &file).await {
                    tracing::warn!(card_id, error = %err, "Trello attachment upload failed, continuing");
                }
            }
            TodoRepo::set_trello_card(&mut *tx, todo.id, &card_id)
                .await
                .map_err(AppError::Database)?;
            todo.trello_card_id = Some(card_id);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "Trello card creation failed, continuing without it");
        }
    }

    tx.commit().await.map_err(AppError::Database)?;
    Ok(todo)
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Fetch a single todo joined with its category names.
pub async fn get(state: &AppState, id: DbId) -> AppResult<TodoWithCategory> {
    TodoRepo::find_with_category(&state.pool, id)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))
}

/// List todos matching `filters`, newest first, with a 1-indexed page.
pub async fn list(
    state: &AppState,
    filters: &TodoFilters,
    page: i64,
    limit: i64,
) -> AppResult<(Vec<TodoWithCategory>, Pagination)> {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let total_items = TodoRepo::count(&state.pool, filters)
        .await
        .map_err(AppError::Database)?;
    let todos = TodoRepo::list(&state.pool, filters, limit, offset)
        .await
        .map_err(AppError::Database)?;

    let pagination = Pagination {
        current_page: page,
        total_pages: (total_items as u64).div_ceil(limit as u64) as i64,
        total_items,
        items_per_page: limit,
    };
    Ok((todos, pagination))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Replace a todo's fields, resolving the image in this order: new upload
/// wins, then an explicit removal flag, otherwise the existing image is
/// kept. Mirrors the change to Trello best-effort.
///
/// The replacement image is stored before the transaction and the displaced
/// file is deleted only after a successful commit, so a failed update never
/// leaves the row pointing at a missing file. A failed update instead
/// deletes the freshly stored replacement (same compensation as create).
pub async fn update(
    state: &AppState,
    id: DbId,
    input: TodoInput,
    image: Option<UploadedImage>,
    remove_image: bool,
) -> AppResult<TodoWithCategory> {
    let new_values = validate_input(state, &input).await?;
    let status = match &input.status {
        Some(s) => Status::parse(s)?,
        None => Status::Active,
    };
    if let Some(image) = &image {
        state.images.validate(&image.mime, image.bytes.len())?;
    }

    let stored_new = match &image {
        Some(image) => Some(
            state
                .images
                .store(&image.bytes, &image.mime, image.filename.as_deref())
                .await?,
        ),
        None => None,
    };

    match update_in_tx(state, id, new_values, status, stored_new.clone(), remove_image).await {
        Ok((todo, displaced)) => {
            if let Some(old) = displaced {
                state.images.delete(&old).await;
            }
            Ok(todo)
        }
        Err(err) => {
            if let Some(path) = &stored_new {
                state.images.delete(path).await;
            }
            Err(err)
        }
    }
}

/// Run the transactional part of an update. Returns the updated todo and
/// the image file it displaced (replaced or removed), which the caller
/// deletes once the commit is durable.
async fn update_in_tx(
    state: &AppState,
    id: DbId,
    new_values: NewTodo,
    status: Status,
    stored_new: Option<String>,
    remove_image: bool,
) -> AppResult<(TodoWithCategory, Option<String>)> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let existing = TodoRepo::find_by_id(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;

    todo::check_status_transition(existing.status, status)?;

    let (image_path, displaced) = if stored_new.is_some() {
        (stored_new, existing.image_path)
    } else if remove_image {
        (None, existing.image_path)
    } else {
        (existing.image_path, None)
    };

    let values = TodoValues {
        title: new_values.title,
        description: new_values.description,
        category_id: new_values.category_id,
        importance: new_values.importance,
        status,
        image_path,
    };
    TodoRepo::update(&mut *tx, id, &values)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;

    let updated = TodoRepo::find_with_category(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InternalError("Updated todo vanished".to_string()))?;

    mirror_update(state, &updated).await;

    tx.commit().await.map_err(AppError::Database)?;
    Ok((updated, displaced))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Delete a todo, its image file and its Trello card.
///
/// A failed card delete propagates and aborts the todo delete (reference
/// behavior); a failed file delete is logged and swallowed. The card and
/// file deletions happen before the row delete commits and are not rolled
/// back if the commit fails.
pub async fn delete(state: &AppState, id: DbId) -> AppResult<()> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let todo = TodoRepo::find_by_id(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;

    if let Some(card_id) = &todo.trello_card_id {
        state.trello.delete_card(card_id).await?;
    }

    if let Some(image) = &todo.image_path {
        state.images.delete(image).await;
    }

    TodoRepo::delete(&mut *tx, id)
        .await
        .map_err(AppError::Database)?;

    tx.commit().await.map_err(AppError::Database)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-field mutations
// ---------------------------------------------------------------------------

/// Change only the status, enforcing the transition rule and mirroring to
/// Trello (including the completed-list move).
pub async fn update_status(state: &AppState, id: DbId, status: Status) -> AppResult<TodoWithCategory> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let existing = TodoRepo::find_by_id(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;

    todo::check_status_transition(existing.status, status)?;

    TodoRepo::set_status(&mut *tx, id, status)
        .await
        .map_err(AppError::Database)?;

    let updated = TodoRepo::find_with_category(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InternalError("Updated todo vanished".to_string()))?;

    mirror_update(state, &updated).await;

    tx.commit().await.map_err(AppError::Database)?;
    Ok(updated)
}

/// Change only the importance and re-mirror the card.
pub async fn update_importance(
    state: &AppState,
    id: DbId,
    importance: Importance,
) -> AppResult<TodoWithCategory> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let exists = TodoRepo::find_by_id(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .is_some();
    if !exists {
        return Err(AppError::Core(CoreError::NotFound { entity: "Todo", id }));
    }

    TodoRepo::set_importance(&mut *tx, id, importance)
        .await
        .map_err(AppError::Database)?;

    let updated = TodoRepo::find_with_category(&mut *tx, id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InternalError("Updated todo vanished".to_string()))?;

    if let Some(card_id) = &updated.trello_card_id {
        state
            .trello
            .update_card(
                card_id,
                &updated.title,
                updated.description.as_deref(),
                updated.importance,
            )
            .await;
    }

    tx.commit().await.map_err(AppError::Database)?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mirror an updated todo onto its Trello card, moving it to the completed
/// list when the new status is `Completed`. Both calls swallow failures.
async fn mirror_update(state: &AppState, todo: &TodoWithCategory) {
    let Some(card_id) = &todo.trello_card_id else {
        return;
    };
    state
        .trello
        .update_card(
            card_id,
            &todo.title,
            todo.description.as_deref(),
            todo.importance,
        )
        .await;
    if todo.status == Status::Completed {
        state.trello.move_to_completed_list(card_id).await;
    }
}

/// Validate the shared todo fields (title, category, importance) and check
/// the category actually exists so the failure is a 400, not an FK error.
async fn validate_input(state: &AppState, input: &TodoInput) -> AppResult<NewTodo> {
    let title = todo::validate_title(&input.title)?;

    let importance = match &input.importance {
        Some(s) => Importance::parse(s)?,
        None => Importance::default(),
    };

    let category_id = input
        .category_id
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::Validation("Valid category is required".to_string()))?;

    let category = CategoryRepo::find_by_id(&state.pool, category_id)
        .await
        .map_err(AppError::Database)?;
    if category.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Valid category is required".to_string(),
        )));
    }

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(NewTodo {
        title,
        description,
        category_id,
        importance,
    })
}
