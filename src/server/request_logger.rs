use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

pub async fn log_request(req: Request, next: Next) -> Response {
    let start = get_instant();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    info!(method = %method, path = %path, "incoming request");

    let response = next.run(req).await;
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status_code = status.as_u16(),
        response_time = %format!("{}ms", start.elapsed().as_millis()),
        "request completed"
    );
    get_metrics()
        .await
        .http_requests
        .with_label_values(&[method.as_str(), status.as_str()])
        .inc();

    response
}
