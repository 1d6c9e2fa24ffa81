//! services/api/src/web/documents.rs
//!
//! Document registry endpoints: upload, listing, search, move, and delete.
//! The upload handler stores the file, invokes the external classifier
//! synchronously, and persists the outcome either way - a failed
//! classification still produces a record the user can see and retry.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::CurrentUser;
use crate::web::port_error_response;
use crate::web::state::AppState;
use documind_core::domain::{Document, DocumentType, NewDocument, Page, SearchFilters};
use documind_core::ports::{DocumentClassifier, DocumentStore, PortError};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub original_filename: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub document_type: String,
    #[schema(value_type = Object)]
    pub extracted_data: serde_json::Value,
    pub summary: Option<String>,
    pub confidence_score: f32,
    pub processing_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            folder_id: doc.folder_id,
            original_filename: doc.original_filename,
            file_size: doc.file_size,
            mime_type: doc.mime_type,
            document_type: doc.document_type.as_str().to_string(),
            extracted_data: serde_json::Value::Object(doc.extracted_data),
            summary: doc.summary,
            confidence_score: doc.confidence_score,
            processing_status: doc.processing_status.as_str().to_string(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
    pub pagination: Pagination,
}

impl DocumentListResponse {
    fn new(documents: Vec<Document>, page: Page) -> Self {
        let documents: Vec<DocumentResponse> =
            documents.into_iter().map(DocumentResponse::from).collect();
        let pagination = Pagination {
            limit: page.limit(),
            offset: page.offset(),
            total: documents.len(),
        };
        Self {
            documents,
            pagination,
        }
    }
}

/// Search filters as they arrive on the wire. The document type is a plain
/// string here and validated on conversion, so a typo is a 400 rather than
/// an empty result set.
#[derive(Deserialize, ToSchema)]
pub struct SearchRequest {
    pub document_type: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub folder_id: Option<Uuid>,
    pub query: Option<String>,
}

impl SearchRequest {
    fn into_filters(self) -> Result<SearchFilters, PortError> {
        let document_type = self
            .document_type
            .map(|raw| raw.parse::<DocumentType>())
            .transpose()
            .map_err(PortError::InvalidArgument)?;

        Ok(SearchFilters {
            document_type,
            date_from: self.date_from,
            date_to: self.date_to,
            folder_id: self.folder_id,
            query: self.query,
        })
    }
}

#[derive(Deserialize, ToSchema)]
pub struct MoveDocumentRequest {
    /// Target folder; `null` clears the document to "no folder".
    pub folder_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub folder_id: Option<Uuid>,
}

fn page_from(query: &PageQuery) -> Result<Page, (StatusCode, String)> {
    Page::new(
        query.limit.unwrap_or(Page::DEFAULT_LIMIT),
        query.offset.unwrap_or(0),
    )
    .map_err(|e| port_error_response(&PortError::from(e)))
}

/// Removes a stored upload whose database record never materialized, so a
/// rejected create does not leave an orphan on disk. A missing file is fine;
/// any other failure is logged and otherwise ignored.
async fn discard_stored_file(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("failed to remove stored file {}: {e}", path.display());
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /documents/upload - Upload and classify a document
///
/// Accepts a multipart/form-data request with a single file part. The file
/// is stored first; classification runs synchronously and its outcome
/// (including failure) is persisted before the response is sent.
#[utoipa::path(
    post,
    path = "/documents/upload",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 201, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Missing file part"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Target folder not found")
    ),
    params(("folder_id" = Option<Uuid>, Query, description = "Folder to file the document under"))
)]
pub async fn upload_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart data: {e}"),
            )
        })?
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ))?;

    let original_filename = field.file_name().unwrap_or("untitled").to_string();
    let mime_type = field.content_type().map(|m| m.to_string());
    let data = field.bytes().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read file bytes: {e}"),
        )
    })?;
    let file_size = Some(data.len() as i64);

    // Store under an opaque name; the original filename only lives in the
    // database record.
    let stored_name = match std::path::Path::new(&original_filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    };
    let stored_path = state.config.upload_dir.join(&stored_name);

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| {
            error!("Failed to create upload directory: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store file".to_string(),
            )
        })?;
    tokio::fs::write(&stored_path, &data).await.map_err(|e| {
        error!("Failed to write uploaded file: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store file".to_string(),
        )
    })?;

    let file_path = stored_path.to_string_lossy().into_owned();

    let new_doc = match state
        .classifier
        .classify(&file_path, mime_type.as_deref())
        .await
    {
        Ok(classification) => NewDocument::completed(
            original_filename,
            file_path,
            file_size,
            mime_type,
            classification,
        ),
        Err(PortError::ProcessingFailed(reason)) => {
            // Swallowed by design: the record is persisted as failed so the
            // user can see the upload and retry it.
            warn!("classification failed for {original_filename}: {reason}");
            NewDocument::failed(original_filename, file_path, file_size, mime_type)
        }
        Err(e) => return Err(port_error_response(&e)),
    };

    let document = match state
        .store
        .create_document(user.id, &new_doc, query.folder_id)
        .await
    {
        Ok(document) => document,
        Err(e) => {
            discard_stored_file(&stored_path).await;
            return Err(port_error_response(&e));
        }
    };

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

/// GET /documents - List the user's documents, newest first
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "Documents for the user", body = DocumentListResponse),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Not authenticated")
    ),
    params(
        ("limit" = Option<i64>, Query, description = "Page size, 1-100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip")
    )
)]
pub async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = page_from(&query)?;
    let documents = state
        .store
        .list_documents(user.id, page)
        .await
        .map_err(|e| port_error_response(&e))?;

    Ok(Json(DocumentListResponse::new(documents, page)))
}

/// POST /documents/search - Search with conjunctive filters
#[utoipa::path(
    post,
    path = "/documents/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching documents", body = DocumentListResponse),
        (status = 400, description = "Invalid pagination or filter"),
        (status = 401, description = "Not authenticated")
    ),
    params(
        ("limit" = Option<i64>, Query, description = "Page size, 1-100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip")
    )
)]
pub async fn search_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = page_from(&query)?;
    let filters = req.into_filters().map_err(|e| port_error_response(&e))?;

    let documents = state
        .store
        .search_documents(user.id, &filters, page)
        .await
        .map_err(|e| port_error_response(&e))?;

    Ok(Json(DocumentListResponse::new(documents, page)))
}

/// GET /documents/{document_id} - Fetch one document
#[utoipa::path(
    get,
    path = "/documents/{document_id}",
    responses(
        (status = 200, description = "The document", body = DocumentResponse),
        (status = 404, description = "Document not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(("document_id" = Uuid, Path, description = "Document id"))
)]
pub async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = state
        .store
        .get_document(document_id, user.id)
        .await
        .map_err(|e| port_error_response(&e))?
        .ok_or((StatusCode::NOT_FOUND, "Document not found".to_string()))?;

    Ok(Json(DocumentResponse::from(document)))
}

/// PUT /documents/{document_id}/folder - Move a document between folders
#[utoipa::path(
    put,
    path = "/documents/{document_id}/folder",
    request_body = MoveDocumentRequest,
    responses(
        (status = 200, description = "Document moved"),
        (status = 404, description = "Document or target folder not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(("document_id" = Uuid, Path, description = "Document id"))
)]
pub async fn move_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
    Json(req): Json<MoveDocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let moved = state
        .store
        .move_document(document_id, user.id, req.folder_id)
        .await
        .map_err(|e| port_error_response(&e))?;

    if !moved {
        return Err((StatusCode::NOT_FOUND, "Document not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Document moved successfully" })))
}

/// DELETE /documents/{document_id} - Delete a document
#[utoipa::path(
    delete,
    path = "/documents/{document_id}",
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, description = "Document not found"),
        (status = 401, description = "Not authenticated")
    ),
    params(("document_id" = Uuid, Path, description = "Document id"))
)]
pub async fn delete_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state
        .store
        .delete_document(document_id, user.id)
        .await
        .map_err(|e| port_error_response(&e))?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Document not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Document deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_validates_document_type() {
        let req = SearchRequest {
            document_type: Some("invoice".to_string()),
            date_from: None,
            date_to: None,
            folder_id: None,
            query: Some("acme".to_string()),
        };
        let filters = req.into_filters().unwrap();
        assert_eq!(filters.document_type, Some(DocumentType::Invoice));
        assert_eq!(filters.query.as_deref(), Some("acme"));

        let bad = SearchRequest {
            document_type: Some("spreadsheet".to_string()),
            date_from: None,
            date_to: None,
            folder_id: None,
            query: None,
        };
        assert!(matches!(
            bad.into_filters(),
            Err(PortError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn discarding_a_stored_file_removes_it_and_tolerates_absence() {
        let dir = std::env::temp_dir().join(format!("documind-test-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("upload.pdf");
        tokio::fs::write(&path, b"pdf bytes").await.unwrap();

        discard_stored_file(&path).await;
        assert!(!path.exists());

        // A second pass must not panic or log spuriously for a missing file.
        discard_stored_file(&path).await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let page = page_from(&PageQuery {
            limit: None,
            offset: None,
        })
        .unwrap();
        assert_eq!(page.limit(), Page::DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);

        let err = page_from(&PageQuery {
            limit: Some(500),
            offset: None,
        })
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
