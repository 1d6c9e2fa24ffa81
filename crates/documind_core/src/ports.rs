//! crates/documind_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or the classification service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Classification, Document, Folder, NewDocument, NewUser, Page, PageError, SearchFilters,
    Session, User, UserCredentials,
};

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The closed set of failures a port operation can produce. Every adapter
/// maps its library-specific errors into exactly one of these variants; the
/// HTTP layer decides status codes from them and nothing else.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Missing, unknown, or expired session token. Expired and nonexistent
    /// tokens are deliberately indistinguishable.
    #[error("not authenticated")]
    Unauthenticated,

    /// Login rejected. Unknown email, inactive account, and wrong password
    /// all collapse into this variant to prevent account enumeration.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An active account already uses this email address.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The row is absent or owned by a different user. The two cases are
    /// identical on purpose so existence never leaks across users.
    #[error("not found")]
    NotFound,

    /// Out-of-range pagination or a malformed filter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The classification collaborator failed. Recorded against the upload,
    /// never raised to the end user as a hard failure.
    #[error("document processing failed: {0}")]
    ProcessingFailed(String),

    /// Transient storage failure. Reads are safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Anything else.
    #[error("an unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<PageError> for PortError {
    fn from(err: PageError) -> Self {
        PortError::InvalidArgument(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable login sessions. Sessions live in storage, never in process
/// memory, so a restart or scale-out does not invalidate active logins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for `user_id` with a fresh opaque token expiring
    /// seven days from now.
    async fn create_session(&self, user_id: Uuid) -> PortResult<Session>;

    /// Resolves a token to its active user. Fails with
    /// [`PortError::Unauthenticated`] for absent, expired, or
    /// inactive-account tokens alike.
    async fn validate_session(&self, token: &str) -> PortResult<User>;

    /// Deletes the session row. Idempotent; unknown tokens are a no-op.
    async fn invalidate_session(&self, token: &str) -> PortResult<()>;
}

/// Account creation and lookup. Password hashing happens above this port;
/// only the finished hash crosses it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates the account and provisions the default folder set in one
    /// atomic unit. The unique constraint on email is the final arbiter for
    /// concurrent registrations; a violation surfaces as
    /// [`PortError::DuplicateEmail`].
    async fn create_user(&self, new_user: &NewUser, password_hash: &str) -> PortResult<User>;

    /// Credentials for an active account, for password verification only.
    /// Fails with [`PortError::InvalidCredentials`] when no active account
    /// matches.
    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    /// Stamps `last_login` after a successful verification.
    async fn touch_last_login(&self, user_id: Uuid) -> PortResult<()>;

    /// Returns `None` for inactive or missing users.
    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<Option<User>>;
}

/// Per-user folder management. Every operation is scoped by the owning user
/// id at the query level.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn create_folder(&self, user_id: Uuid, name: &str) -> PortResult<Folder>;

    /// Includes a live document count, itself scoped to the owner.
    async fn get_folder(&self, folder_id: Uuid, user_id: Uuid) -> PortResult<Option<Folder>>;

    /// Ordered by name ascending, each entry carrying its document count.
    async fn list_folders(&self, user_id: Uuid) -> PortResult<Vec<Folder>>;

    async fn rename_folder(
        &self,
        folder_id: Uuid,
        user_id: Uuid,
        name: &str,
    ) -> PortResult<Option<Folder>>;

    /// Reassigns every contained document to `reassign_to` (or clears the
    /// folder reference) and removes the folder, as one transaction.
    /// Returns whether a folder row was actually removed.
    async fn delete_folder(
        &self,
        folder_id: Uuid,
        user_id: Uuid,
        reassign_to: Option<Uuid>,
    ) -> PortResult<bool>;
}

/// Per-user document records. Every operation is scoped by the owning user
/// id at the query level.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a processed document. When `folder_id` is set it must
    /// reference a folder owned by the same user.
    async fn create_document(
        &self,
        user_id: Uuid,
        new_doc: &NewDocument,
        folder_id: Option<Uuid>,
    ) -> PortResult<Document>;

    async fn get_document(&self, document_id: Uuid, user_id: Uuid)
        -> PortResult<Option<Document>>;

    /// Newest-first by creation time.
    async fn list_documents(&self, user_id: Uuid, page: Page) -> PortResult<Vec<Document>>;

    /// Conjunctive optional filters; with none set this returns the same
    /// rows as [`DocumentStore::list_documents`].
    async fn search_documents(
        &self,
        user_id: Uuid,
        filters: &SearchFilters,
        page: Page,
    ) -> PortResult<Vec<Document>>;

    /// Reassigns the folder reference (or clears it). Returns whether the
    /// document existed and was owned by the caller.
    async fn move_document(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> PortResult<bool>;

    /// Returns whether a row existed beforehand for that user.
    async fn delete_document(&self, document_id: Uuid, user_id: Uuid) -> PortResult<bool>;
}

/// Everything the persistence adapter provides, for handing around as a
/// single trait object.
pub trait Store: SessionStore + UserDirectory + FolderStore + DocumentStore {}

impl<T: SessionStore + UserDirectory + FolderStore + DocumentStore> Store for T {}

/// The external classification collaborator: given a stored file and its
/// declared MIME type, produces a document type, extracted fields, a summary,
/// and a confidence score.
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    async fn classify(
        &self,
        file_path: &str,
        mime_type: Option<&str>,
    ) -> PortResult<Classification>;
}
