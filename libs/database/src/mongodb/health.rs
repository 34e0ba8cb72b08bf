use mongodb::{Database, bson::doc};
use std::time::Instant;

/// Result of a detailed MongoDB health probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Run `ping` against the database, returning the driver error as a string.
pub async fn ping(db: &Database) -> Result<(), String> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| format!("MongoDB ping failed: {}", e))
}

pub async fn check_health(db: &Database) -> bool {
    ping(db).await.is_ok()
}

/// Like [`check_health`], with latency and the failure message.
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = ping(db).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err(),
        response_time_ms,
    }
}
