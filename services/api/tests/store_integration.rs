//! Integration tests for the Postgres adapter.
//!
//! These run against a live database and are ignored by default:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -p api -- --ignored
//! ```
//!
//! Each test registers its own users with unique emails, so the suite can
//! run repeatedly against the same database.

use api_lib::adapters::db::DbAdapter;
use chrono::{Duration, Utc};
use documind_core::domain::{
    Classification, DocumentType, ExtractedData, NewDocument, NewUser, Page, ProcessingStatus,
    SearchFilters, DEFAULT_FOLDER_NAMES,
};
use documind_core::ports::{
    DocumentStore, FolderStore, PortError, SessionStore, UserDirectory,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

async fn test_store() -> DbAdapter {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    let store = DbAdapter::new(pool);
    store.run_migrations().await.expect("migrations failed");
    store
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

async fn register(store: &DbAdapter) -> documind_core::domain::User {
    let new_user = NewUser {
        email: unique_email(),
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        company: None,
    };
    store
        .create_user(&new_user, "$argon2id$test-hash")
        .await
        .expect("failed to create user")
}

fn invoice_doc() -> NewDocument {
    let mut extracted = ExtractedData::new();
    extracted.insert("vendor".to_string(), serde_json::json!("Acme Corp"));
    extracted.insert("amount".to_string(), serde_json::json!(1500.00));
    NewDocument::completed(
        "invoice.pdf".to_string(),
        "/uploads/invoice.pdf".to_string(),
        Some(2048),
        Some("application/pdf".to_string()),
        Classification {
            document_type: DocumentType::Invoice,
            extracted_data: extracted,
            summary: Some("Invoice from Acme Corp for 1500.00".to_string()),
            confidence_score: 0.89,
        },
    )
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn registration_provisions_the_default_folder_set() {
    let store = test_store().await;
    let user = register(&store).await;

    let folders = store.list_folders(user.id).await.unwrap();
    assert_eq!(folders.len(), DEFAULT_FOLDER_NAMES.len());
    for name in DEFAULT_FOLDER_NAMES {
        assert!(folders.iter().any(|f| f.name == name), "missing {name}");
    }
    // Ordered by name ascending.
    let mut sorted: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
    let original = sorted.clone();
    sorted.sort();
    assert_eq!(sorted, original);
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn duplicate_registration_exactly_one_succeeds() {
    let store = test_store().await;
    let email = unique_email();
    let new_user = NewUser {
        email,
        first_name: None,
        last_name: None,
        company: None,
    };

    let first = store.create_user(&new_user, "$argon2id$h1").await;
    let second = store.create_user(&new_user, "$argon2id$h2").await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(PortError::DuplicateEmail)));

    // Case-insensitive: the same email upper-cased is still a duplicate.
    let shouting = NewUser {
        email: new_user.email.to_uppercase(),
        ..new_user.clone()
    };
    assert!(matches!(
        store.create_user(&shouting, "$argon2id$h3").await,
        Err(PortError::DuplicateEmail)
    ));
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn session_lifecycle_and_expiry() {
    let store = test_store().await;
    let user = register(&store).await;

    let session = store.create_session(user.id).await.unwrap();
    assert_eq!(session.user_id, user.id);
    // Fresh sessions carry the full seven-day window.
    assert!(session.expires_at > Utc::now() + Duration::days(6));

    let resolved = store.validate_session(&session.token).await.unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.email, user.email);

    // Invalidation is idempotent.
    store.invalidate_session(&session.token).await.unwrap();
    store.invalidate_session(&session.token).await.unwrap();
    assert!(matches!(
        store.validate_session(&session.token).await,
        Err(PortError::Unauthenticated)
    ));

    // An expired token is treated identically to a nonexistent one. Plant a
    // session whose expiry is already in the past.
    let pool = PgPoolOptions::new()
        .connect(&std::env::var("DATABASE_URL").unwrap())
        .await
        .unwrap();
    let stale = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO user_sessions (session_token, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(&stale)
    .bind(user.id)
    .bind(Utc::now() - Duration::days(1))
    .execute(&pool)
    .await
    .unwrap();
    assert!(matches!(
        store.validate_session(&stale).await,
        Err(PortError::Unauthenticated)
    ));
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn registry_operations_are_scoped_to_the_owner() {
    let store = test_store().await;
    let alice = register(&store).await;
    let mallory = register(&store).await;

    let folder = store.create_folder(alice.id, "Receipts").await.unwrap();
    let doc = store
        .create_document(alice.id, &invoice_doc(), Some(folder.id))
        .await
        .unwrap();

    // Reads return "not found", never the real data.
    assert!(store.get_folder(folder.id, mallory.id).await.unwrap().is_none());
    assert!(store.get_document(doc.id, mallory.id).await.unwrap().is_none());

    // Mutations are no-ops for the wrong user.
    assert!(store
        .rename_folder(folder.id, mallory.id, "Stolen")
        .await
        .unwrap()
        .is_none());
    assert!(!store.move_document(doc.id, mallory.id, None).await.unwrap());
    assert!(!store.delete_document(doc.id, mallory.id).await.unwrap());
    assert!(!store
        .delete_folder(folder.id, mallory.id, None)
        .await
        .unwrap());

    // A document cannot be filed under another user's folder.
    assert!(matches!(
        store
            .create_document(mallory.id, &invoice_doc(), Some(folder.id))
            .await,
        Err(PortError::NotFound)
    ));

    // Alice still sees everything intact.
    let fetched = store.get_document(doc.id, alice.id).await.unwrap().unwrap();
    assert_eq!(fetched.folder_id, Some(folder.id));
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn rename_returns_the_updated_folder_with_its_count() {
    let store = test_store().await;
    let user = register(&store).await;

    let folder = store.create_folder(user.id, "Receipts").await.unwrap();
    store
        .create_document(user.id, &invoice_doc(), Some(folder.id))
        .await
        .unwrap();

    let renamed = store
        .rename_folder(folder.id, user.id, "Receipts 2026")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.id, folder.id);
    assert_eq!(renamed.name, "Receipts 2026");
    assert_eq!(renamed.document_count, 1);
    assert!(renamed.updated_at >= folder.updated_at);

    // A folder deleted out from under the rename reports None, not an error.
    assert!(store.delete_folder(folder.id, user.id, None).await.unwrap());
    assert!(store
        .rename_folder(folder.id, user.id, "Ghost")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn folder_delete_reassigns_or_clears_contained_documents() {
    let store = test_store().await;
    let user = register(&store).await;

    let doomed = store.create_folder(user.id, "Doomed").await.unwrap();
    let haven = store.create_folder(user.id, "Haven").await.unwrap();
    for _ in 0..3 {
        store
            .create_document(user.id, &invoice_doc(), Some(doomed.id))
            .await
            .unwrap();
    }

    // Reassign into another owned folder.
    assert!(store
        .delete_folder(doomed.id, user.id, Some(haven.id))
        .await
        .unwrap());
    assert!(store.get_folder(doomed.id, user.id).await.unwrap().is_none());
    let haven = store.get_folder(haven.id, user.id).await.unwrap().unwrap();
    assert_eq!(haven.document_count, 3);

    // Clear to "no folder".
    assert!(store.delete_folder(haven.id, user.id, None).await.unwrap());
    let docs = store.list_documents(user.id, Page::default()).await.unwrap();
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d.folder_id.is_none()));

    // Deleting a folder that is already gone reports false.
    assert!(!store.delete_folder(haven.id, user.id, None).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn search_matches_listing_and_applies_filters() {
    let store = test_store().await;
    let user = register(&store).await;

    let invoices = store
        .list_folders(user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|f| f.name == "Invoices")
        .unwrap();
    let doc = store
        .create_document(user.id, &invoice_doc(), None)
        .await
        .unwrap();
    assert_eq!(doc.processing_status, ProcessingStatus::Completed);

    // No filters: same set as list, newest first.
    let page = Page::default();
    let listed = store.list_documents(user.id, page).await.unwrap();
    let searched = store
        .search_documents(user.id, &SearchFilters::default(), page)
        .await
        .unwrap();
    let listed_ids: Vec<Uuid> = listed.iter().map(|d| d.id).collect();
    let searched_ids: Vec<Uuid> = searched.iter().map(|d| d.id).collect();
    assert_eq!(listed_ids, searched_ids);

    // Free text hits the serialized extracted-data blob.
    let by_vendor = store
        .search_documents(
            user.id,
            &SearchFilters {
                query: Some("acme".to_string()),
                ..Default::default()
            },
            page,
        )
        .await
        .unwrap();
    assert!(by_vendor.iter().any(|d| d.id == doc.id));

    // Type filter excludes non-matching documents.
    let resumes = store
        .search_documents(
            user.id,
            &SearchFilters {
                document_type: Some(DocumentType::Resume),
                ..Default::default()
            },
            page,
        )
        .await
        .unwrap();
    assert!(resumes.iter().all(|d| d.id != doc.id));

    // End of the scenario: move into Invoices, delete, and the record is gone.
    assert!(store
        .move_document(doc.id, user.id, Some(invoices.id))
        .await
        .unwrap());
    let moved = store.get_document(doc.id, user.id).await.unwrap().unwrap();
    assert_eq!(moved.folder_id, Some(invoices.id));
    assert!(store.delete_document(doc.id, user.id).await.unwrap());
    assert!(store.get_document(doc.id, user.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a Postgres database via DATABASE_URL"]
async fn created_document_round_trips_up_to_generated_fields() {
    let store = test_store().await;
    let user = register(&store).await;

    let new_doc = invoice_doc();
    let created = store
        .create_document(user.id, &new_doc, None)
        .await
        .unwrap();
    let fetched = store
        .get_document(created.id, user.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(fetched.original_filename, new_doc.original_filename);
    assert_eq!(fetched.file_path, new_doc.file_path);
    assert_eq!(fetched.file_size, new_doc.file_size);
    assert_eq!(fetched.mime_type, new_doc.mime_type);
    assert_eq!(fetched.document_type, new_doc.document_type);
    assert_eq!(fetched.extracted_data, new_doc.extracted_data);
    assert_eq!(fetched.summary, new_doc.summary);
    assert_eq!(fetched.processing_status, new_doc.processing_status);
    assert_eq!(fetched.user_id, user.id);
}
