pub mod domain;
pub mod ports;

pub use domain::{
    Classification, Document, DocumentType, ExtractedData, Folder, NewDocument, NewUser, Page,
    PageError, ProcessingStatus, SearchFilters, Session, User, UserCredentials,
    DEFAULT_FOLDER_NAMES, SESSION_TTL_DAYS,
};
pub use ports::{
    DocumentClassifier, DocumentStore, FolderStore, PortError, PortResult, SessionStore, Store,
    UserDirectory,
};
