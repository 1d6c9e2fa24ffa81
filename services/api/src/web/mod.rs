//! services/api/src/web/mod.rs
//!
//! HTTP surface: handlers, auth middleware, shared state, and the mapping
//! from port errors to status codes. Handlers never contain ownership
//! logic; they extract arguments, call a port with the resolved user id,
//! and shape the response.

pub mod auth;
pub mod documents;
pub mod folders;
pub mod middleware;
pub mod state;

use axum::http::{header, HeaderMap, StatusCode};
use documind_core::ports::PortError;
use utoipa::OpenApi;

pub use middleware::require_auth;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        documents::upload_document_handler,
        documents::list_documents_handler,
        documents::search_documents_handler,
        documents::get_document_handler,
        documents::move_document_handler,
        documents::delete_document_handler,
        folders::create_folder_handler,
        folders::list_folders_handler,
        folders::get_folder_handler,
        folders::rename_folder_handler,
        folders::delete_folder_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::AuthResponse,
        auth::UserResponse,
        documents::DocumentResponse,
        documents::DocumentListResponse,
        documents::Pagination,
        documents::SearchRequest,
        documents::MoveDocumentRequest,
        folders::FolderResponse,
        folders::CreateFolderRequest,
        folders::RenameFolderRequest,
    )),
    tags(
        (name = "DocuMind API", description = "Document management endpoints: accounts, folders, and processed documents.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping and Token Extraction
//=========================================================================================

/// Maps a port error to the response the HTTP layer returns. This is the
/// only place status codes are decided.
pub fn port_error_response(err: &PortError) -> (StatusCode, String) {
    let status = match err {
        PortError::Unauthenticated | PortError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        PortError::DuplicateEmail | PortError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        PortError::NotFound => StatusCode::NOT_FOUND,
        PortError::ProcessingFailed(_) => StatusCode::BAD_GATEWAY,
        PortError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

/// Pulls the session token out of a request: `Authorization: Bearer <token>`
/// first, then a `session=` cookie as a fallback for browser clients.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer);
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|c| {
                let c = c.trim();
                c.strip_prefix("session=")
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn error_mapping_matches_the_contract() {
        let cases = [
            (PortError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (PortError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (PortError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (PortError::NotFound, StatusCode::NOT_FOUND),
            (
                PortError::InvalidArgument("limit".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PortError::Unavailable("pool timed out".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PortError::Unexpected("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(port_error_response(&err).0, expected, "{err:?}");
        }
    }

    #[test]
    fn token_extraction_prefers_bearer_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc-123"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=cookie-token"),
        );
        assert_eq!(extract_token(&headers), Some("abc-123"));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(extract_token(&headers), Some("cookie-token"));

        headers.remove(header::COOKIE);
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn malformed_authorization_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc-123"));
        assert_eq!(extract_token(&headers), None);
    }
}
