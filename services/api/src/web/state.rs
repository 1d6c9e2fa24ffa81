//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use documind_core::ports::{DocumentClassifier, Store};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub classifier: Arc<dyn DocumentClassifier>,
    pub config: Arc<Config>,
}
