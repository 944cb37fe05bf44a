// src/adapter/http/handlers/health.rs
// Liveness endpoint for load balancers

use axum::http::StatusCode;

/// `GET /health` — 200 when the process is serving.
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
