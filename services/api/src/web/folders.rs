//! services/api/src/web/folders.rs
//!
//! Folder registry endpoints. Every operation is scoped to the user
//! resolved by the auth middleware; a folder owned by someone else is
//! indistinguishable from one that does not exist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::CurrentUser;
use crate::web::port_error_response;
use crate::web::state::AppState;
use documind_core::domain::Folder;
use documind_core::ports::FolderStore;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateFolderRequest {
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RenameFolderRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct DeleteFolderQuery {
    /// Folder that receives the contained documents; omitted means they are
    /// cleared to "no folder".
    pub reassign_to: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub document_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            document_count: folder.document_count,
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /folders - Create a folder
#[utoipa::path(
    post,
    path = "/folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = FolderResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let folder = state
        .store
        .create_folder(user.id, &req.name)
        .await
        .map_err(|e| port_error_response(&e))?;

    Ok((StatusCode::CREATED, Json(FolderResponse::from(folder))))
}

/// GET /folders - List folders with document counts
#[utoipa::path(
    get,
    path = "/folders",
    responses(
        (status = 200, description = "Folders ordered by name", body = [FolderResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_folders_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let folders = state
        .store
        .list_folders(user.id)
        .await
        .map_err(|e| port_error_response(&e))?;

    let folders: Vec<FolderResponse> = folders.into_iter().map(FolderResponse::from).collect();
    Ok(Json(folders))
}

/// GET /folders/{folder_id} - Fetch one folder
#[utoipa::path(
    get,
    path = "/folders/{folder_id}",
    responses(
        (status = 200, description = "The folder", body = FolderResponse),
        (status = 404, description = "Folder not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(("folder_id" = Uuid, Path, description = "Folder id"))
)]
pub async fn get_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(folder_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let folder = state
        .store
        .get_folder(folder_id, user.id)
        .await
        .map_err(|e| port_error_response(&e))?
        .ok_or((StatusCode::NOT_FOUND, "Folder not found".to_string()))?;

    Ok(Json(FolderResponse::from(folder)))
}

/// PUT /folders/{folder_id} - Rename a folder
#[utoipa::path(
    put,
    path = "/folders/{folder_id}",
    request_body = RenameFolderRequest,
    responses(
        (status = 200, description = "The renamed folder", body = FolderResponse),
        (status = 404, description = "Folder not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(("folder_id" = Uuid, Path, description = "Folder id"))
)]
pub async fn rename_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(folder_id): Path<Uuid>,
    Json(req): Json<RenameFolderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let folder = state
        .store
        .rename_folder(folder_id, user.id, &req.name)
        .await
        .map_err(|e| port_error_response(&e))?
        .ok_or((StatusCode::NOT_FOUND, "Folder not found".to_string()))?;

    Ok(Json(FolderResponse::from(folder)))
}

/// DELETE /folders/{folder_id} - Delete a folder
///
/// Documents inside the folder are moved to `reassign_to` (or cleared to no
/// folder) before the folder row is removed.
#[utoipa::path(
    delete,
    path = "/folders/{folder_id}",
    responses(
        (status = 200, description = "Folder deleted"),
        (status = 404, description = "Folder not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(
        ("folder_id" = Uuid, Path, description = "Folder id"),
        ("reassign_to" = Option<Uuid>, Query, description = "Folder receiving the contained documents")
    )
)]
pub async fn delete_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(folder_id): Path<Uuid>,
    Query(query): Query<DeleteFolderQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state
        .store
        .delete_folder(folder_id, user.id, query.reassign_to)
        .await
        .map_err(|e| port_error_response(&e))?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Folder not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Folder deleted successfully" })))
}
