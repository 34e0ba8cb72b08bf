//! MongoDB connector and utilities

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{
    MongoError, client_options, connect, connect_from_config, connect_from_config_with_retry,
};
pub use health::{HealthStatus, check_health, check_health_detailed, ping};

pub use mongodb::{Client, Collection, Database};
