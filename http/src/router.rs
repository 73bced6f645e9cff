use crate::error::AppError;
use axum::{
    extract::State,
    http::header,
    response::{
        IntoResponse,
        Response,
    },
    routing::get,
    Router,
};
use prometheus::{
    Encoder,
    Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
}

pub fn create_router(registry: Registry, metrics_path: &str) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/healthz", get(healthz))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "OK"
}

/// Gathering runs every registered collector, which for the exporter means a
/// full, blocking scrape of all instances.
pub async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    let families = tokio::task::spawn_blocking(move || state.registry.gather()).await?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    debug!(families = families.len(), bytes = buffer.len(), "served metrics");

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use prometheus::{
        Gauge,
        Opts,
    };

    #[tokio::test]
    async fn metrics_are_encoded_as_text() {
        let registry = Registry::new();
        let gauge = Gauge::with_opts(Opts::new("informix_up", "test gauge")).unwrap();
        gauge.set(1.0);
        registry.register(Box::new(gauge)).unwrap();

        let response = metrics(State(AppState { registry })).await.unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            prometheus::TEXT_FORMAT
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("# TYPE informix_up gauge"), "{body}");
        assert!(body.contains("informix_up 1"), "{body}");
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        assert_eq!(healthz().await, "OK");
    }
}
