use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::env;

/// Admin bearer-token middleware. Read-only traffic and employee-facing
/// leave requests pass through; mutating employee and leave routes require
/// the token.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    if !requires_admin(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    // Get expected token from environment
    let expected_token = match env::var("LEAVEDESK_ADMIN_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            tracing::error!("LEAVEDESK_ADMIN_TOKEN not configured");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "server_misconfigured",
                    "message": "Admin token not configured"
                })),
            )
                .into_response();
        }
    };

    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(header) => {
            // Check Bearer format
            let parts: Vec<&str> = header.splitn(2, ' ').collect();
            if parts.len() != 2 || parts[0] != "Bearer" {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "invalid_auth_format",
                        "message": "Authorization header must be 'Bearer <token>'"
                    })),
                )
                    .into_response();
            }

            // Validate token
            if parts[1] != expected_token {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "invalid_token",
                        "message": "Invalid or expired token"
                    })),
                )
                    .into_response();
            }

            // Token valid, proceed
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "missing_auth",
                "message": "Authorization header required"
            })),
        )
            .into_response(),
    }
}

/// Mutating employee routes and leave edits/deletions are admin-only.
/// `POST /leaves` is the employee-facing leave request and stays open.
fn requires_admin(method: &Method, path: &str) -> bool {
    if path == "/employees" || path.starts_with("/employees/") {
        return *method != Method::GET;
    }
    if path == "/leaves" || path.starts_with("/leaves/") {
        return *method == Method::PUT || *method == Method::DELETE;
    }
    false
}
