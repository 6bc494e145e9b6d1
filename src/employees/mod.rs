use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::models::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::AppState;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/",
            axum::routing::get(list_employees).post(add_employee),
        )
        .route(
            "/:id",
            axum::routing::put(edit_employee).delete(delete_employee),
        )
}

fn db_error(e: sqlx::Error) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "database_error",
            "message": e.to_string()
        })),
    )
}

/// GET /employees
/// All employees in registration order
async fn list_employees(State(state): State<AppState>) -> impl IntoResponse {
    match state.employee_repo.list().await {
        Ok(employees) => Ok(Json(employees)),
        Err(e) => Err(db_error(e)),
    }
}

/// POST /employees (admin)
/// Register a new employee
async fn add_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "empty_name",
                "message": "Employee name must not be empty"
            })),
        ));
    }

    match state.employee_repo.create(name).await {
        Ok(employee) => Ok((StatusCode::CREATED, Json(employee))),
        Err(e) => Err(db_error(e)),
    }
}

/// PUT /employees/:id (admin)
/// Rename an employee
async fn edit_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "empty_name",
                "message": "Employee name must not be empty"
            })),
        ));
    }

    match state.employee_repo.update_name(id, name).await {
        Ok(true) => match state.employee_repo.get(id).await {
            Ok(Some(employee)) => Ok(Json(employee)),
            Ok(None) => Err(not_found(id)),
            Err(e) => Err(db_error(e)),
        },
        Ok(false) => Err(not_found(id)),
        Err(e) => Err(db_error(e)),
    }
}

/// DELETE /employees/:id (admin)
/// Remove an employee and cascade their leaves and replacements
async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.employee_repo.delete(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(not_found(id)),
        Err(e) => Err(db_error(e)),
    }
}

fn not_found(id: i64) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "employee_not_found",
            "message": format!("Employee {} not found", id)
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new().nest("/employees", routes()).with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_employees() {
        let state = test_state().await;

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/employees")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "Alice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["name"], "Alice");

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/employees")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_add_employee_empty_name() {
        let state = test_state().await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/employees")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_edit_and_delete_employee() {
        let state = test_state().await;
        let alice = state.employee_repo.create("Alice").await.unwrap();

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri(format!("/employees/{}", alice.id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "Alicia"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Alicia");

        let response = app(state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/employees/{}", alice.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/employees/{}", alice.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
