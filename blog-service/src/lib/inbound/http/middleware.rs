use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that authenticates the bearer token of a request.
///
/// On success the `AuthenticatedContext` is added to the request extensions
/// for handlers to extract; on failure the request is answered with 401 (or
/// 500 if the identity lookup itself failed) and never reaches the handler.
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = req.headers().clone();

    state
        .gate
        .guard(&headers, move |context| async move {
            tracing::debug!(user_id = %context.user_id, "Request authenticated");

            let mut req = req;
            req.extensions_mut().insert(context);
            Ok(next.run(req).await)
        })
        .await
}
