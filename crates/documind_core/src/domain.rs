//! crates/documind_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP concern beyond
//! plain serde derives.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Semi-structured payload produced by the classifier for a document.
/// Treated as an opaque string -> JSON mapping at this layer; its internal
/// shape varies by document type.
pub type ExtractedData = serde_json::Map<String, serde_json::Value>;

/// Folders provisioned for every new account, in insertion order.
pub const DEFAULT_FOLDER_NAMES: [&str; 6] = [
    "Emails",
    "Forms",
    "Resumes",
    "Invoices",
    "Letters",
    "News Articles",
];

/// Lifetime of a login session.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Represents a user account. The password hash never appears here; it is
/// confined to [`UserCredentials`], which only the login path sees.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Profile fields supplied at registration. The plaintext password is hashed
/// before it reaches any port, so it is deliberately absent here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
}

/// Only used internally for login - contains sensitive data.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// A durable login session. The token is an opaque UUIDv4 string; at 122
/// random bits no collision check is performed on creation.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Expiry for a session created at `now`.
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(SESSION_TTL_DAYS)
    }
}

/// A named per-user container for documents. `document_count` is derived at
/// read time, scoped to the owning user.
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub document_count: i64,
}

/// Classification assigned to a processed document. `Unknown` is reserved
/// for uploads whose processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Resume,
    Form,
    Letter,
    NewsArticle,
    Email,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Resume => "resume",
            DocumentType::Form => "form",
            DocumentType::Letter => "letter",
            DocumentType::NewsArticle => "news_article",
            DocumentType::Email => "email",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(DocumentType::Invoice),
            "resume" => Ok(DocumentType::Resume),
            "form" => Ok(DocumentType::Form),
            "letter" => Ok(DocumentType::Letter),
            "news_article" => Ok(DocumentType::NewsArticle),
            "email" => Ok(DocumentType::Email),
            "unknown" => Ok(DocumentType::Unknown),
            other => Err(format!("unrecognized document type '{other}'")),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "completed" => Ok(ProcessingStatus::Completed),
            "failed" => Ok(ProcessingStatus::Failed),
            other => Err(format!("unrecognized processing status '{other}'")),
        }
    }
}

/// A stored, processed document owned by a single user.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub document_type: DocumentType,
    pub extracted_data: ExtractedData,
    pub summary: Option<String>,
    pub confidence_score: f32,
    pub processing_status: ProcessingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to persist a document record once the upload has been
/// stored and (successfully or not) classified.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub original_filename: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub document_type: DocumentType,
    pub extracted_data: ExtractedData,
    pub summary: Option<String>,
    pub confidence_score: f32,
    pub processing_status: ProcessingStatus,
}

impl NewDocument {
    /// Record for an upload whose classification succeeded.
    pub fn completed(
        original_filename: String,
        file_path: String,
        file_size: Option<i64>,
        mime_type: Option<String>,
        classification: Classification,
    ) -> Self {
        Self {
            original_filename,
            file_path,
            file_size,
            mime_type,
            document_type: classification.document_type,
            extracted_data: classification.extracted_data,
            summary: classification.summary,
            confidence_score: classification.confidence_score,
            processing_status: ProcessingStatus::Completed,
        }
    }

    /// Partial record for an upload whose classification failed. The upload
    /// is kept so the user can see it and retry, rather than discarded.
    pub fn failed(
        original_filename: String,
        file_path: String,
        file_size: Option<i64>,
        mime_type: Option<String>,
    ) -> Self {
        Self {
            original_filename,
            file_path,
            file_size,
            mime_type,
            document_type: DocumentType::Unknown,
            extracted_data: ExtractedData::new(),
            summary: None,
            confidence_score: 0.0,
            processing_status: ProcessingStatus::Failed,
        }
    }
}

/// Output of the external classification collaborator for one document.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub document_type: DocumentType,
    pub extracted_data: ExtractedData,
    pub summary: Option<String>,
    pub confidence_score: f32,
}

/// Optional, conjunctive filters for document search. Absent fields impose
/// no constraint, so the default value matches a plain listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub document_type: Option<DocumentType>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub folder_id: Option<Uuid>,
    pub query: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.document_type.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.folder_id.is_none()
            && self.query.is_none()
    }
}

/// Validated pagination window. Out-of-range values are rejected rather than
/// silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid pagination: {0}")]
pub struct PageError(pub String);

impl Page {
    pub const MIN_LIMIT: i64 = 1;
    pub const MAX_LIMIT: i64 = 100;
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn new(limit: i64, offset: i64) -> Result<Self, PageError> {
        if !(Self::MIN_LIMIT..=Self::MAX_LIMIT).contains(&limit) {
            return Err(PageError(format!(
                "limit must be between {} and {}, got {limit}",
                Self::MIN_LIMIT,
                Self::MAX_LIMIT
            )));
        }
        if offset < 0 {
            return Err(PageError(format!(
                "offset must be non-negative, got {offset}"
            )));
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_rejects_out_of_range_values() {
        assert!(Page::new(0, 0).is_err());
        assert!(Page::new(101, 0).is_err());
        assert!(Page::new(50, -1).is_err());
        let page = Page::new(100, 30).unwrap();
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 30);
    }

    #[test]
    fn default_page_is_valid() {
        let page = Page::default();
        assert!(Page::new(page.limit(), page.offset()).is_ok());
    }

    #[test]
    fn session_expiry_window() {
        let now = Utc::now();
        let expires_at = Session::expiry_from(now);
        // Still valid six days in, already past expiry at eight days.
        assert!(expires_at > now + Duration::days(6));
        assert!(expires_at <= now + Duration::days(8));
    }

    #[test]
    fn document_type_round_trips_through_str() {
        for ty in [
            DocumentType::Invoice,
            DocumentType::Resume,
            DocumentType::Form,
            DocumentType::Letter,
            DocumentType::NewsArticle,
            DocumentType::Email,
            DocumentType::Unknown,
        ] {
            assert_eq!(ty.as_str().parse::<DocumentType>().unwrap(), ty);
        }
        assert!("spreadsheet".parse::<DocumentType>().is_err());
    }

    #[test]
    fn default_folder_set_is_complete() {
        assert_eq!(DEFAULT_FOLDER_NAMES.len(), 6);
        assert!(DEFAULT_FOLDER_NAMES.contains(&"Invoices"));
    }

    #[test]
    fn empty_filters_match_plain_listing() {
        assert!(SearchFilters::default().is_empty());
        let filters = SearchFilters {
            query: Some("acme".to_string()),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }

    #[test]
    fn failed_upload_keeps_a_partial_record() {
        let doc = NewDocument::failed(
            "scan.pdf".to_string(),
            "/uploads/abc.pdf".to_string(),
            Some(1024),
            Some("application/pdf".to_string()),
        );
        assert_eq!(doc.processing_status, ProcessingStatus::Failed);
        assert_eq!(doc.document_type, DocumentType::Unknown);
        assert!(doc.extracted_data.is_empty());
        assert_eq!(doc.confidence_score, 0.0);
    }
}
