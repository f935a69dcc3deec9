pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod models;
pub mod state;
pub mod summary;
pub mod ui;

pub use api::{HttpApi, ListApi};
pub use config::ClientConfig;
pub use controller::ListSyncController;
pub use errors::{Operation, SyncError};
pub use summary::{compute_summary, Summary};
