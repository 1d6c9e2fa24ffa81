pub mod classifier;
pub mod db;

pub use classifier::RemoteClassifierAdapter;
pub use db::DbAdapter;
