use mongodb::Client;
use mongodb::bson::doc;
use serde::Serialize;
use std::time::Instant;

/// Health check status for MongoDB
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Whether the server answered the ping
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    /// Round trip in milliseconds
    pub response_time_ms: u64,
}

/// Issue one `ping` against the `admin` database
pub(super) async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}

/// Check MongoDB health with a single ping
pub async fn check_health(client: &Client) -> bool {
    ping(client).await.is_ok()
}

/// Check MongoDB health with timing and error details
///
/// # Example
/// ```ignore
/// use database::mongodb::check_health_detailed;
///
/// let status = check_health_detailed(&handles.client).await;
/// if !status.healthy {
///     tracing::warn!(message = ?status.message, "MongoDB unhealthy");
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::ClientOptions;
    use std::time::Duration;

    async fn unreachable_client() -> Client {
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:1").await.unwrap();
        options.server_selection_timeout = Some(Duration::from_millis(200));
        Client::with_options(options).unwrap()
    }

    #[tokio::test]
    async fn test_check_health_unreachable() {
        let client = unreachable_client().await;
        assert!(!check_health(&client).await);
    }

    #[tokio::test]
    async fn test_check_health_detailed_unreachable() {
        let client = unreachable_client().await;
        let status = check_health_detailed(&client).await;
        assert!(!status.healthy);
        assert!(status.message.is_some());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
