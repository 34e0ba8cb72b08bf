//! Application state management

use axum_helpers::AdminGate;
use mongodb::{Client, Database};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo_client: Client,
    pub db: Database,
    /// Admin cookie check shared by every write route
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client, db: Database) -> Self {
        let admin = AdminGate::new(config.admin.clone());
        Self {
            config,
            mongo_client,
            db,
            admin,
        }
    }
}
