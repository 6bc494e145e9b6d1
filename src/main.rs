use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod db;
mod employees;
mod leaves;
mod middleware;
mod models;
mod render;
mod replacements;
#[cfg(test)]
mod test_util;

use db::{EmployeeRepository, LeaveRepository, ReplacementRepository};
use render::{ListContainer, ReplacementListRenderer};

#[derive(Clone)]
pub struct AppState {
    employee_repo: Arc<EmployeeRepository>,
    leave_repo: Arc<LeaveRepository>,
    replacement_repo: Arc<ReplacementRepository>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leavedesk_api=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    if let Some(command) = args.next() {
        match command.as_str() {
            "dashboard" => {
                let base_url =
                    args.next().unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
                return render_dashboard(&base_url).await;
            }
            other => anyhow::bail!("unknown command: {}", other),
        }
    }

    // Initialize database with migrations
    let db_path =
        std::env::var("LEAVEDESK_DB").unwrap_or_else(|_| "leave_management.db".to_string());
    let db = db::init_db(&db_path).await?;
    info!("Database initialized at {}", db_path);

    let state = AppState {
        employee_repo: Arc::new(EmployeeRepository::new(db.inner().clone())),
        leave_repo: Arc::new(LeaveRepository::new(db.inner().clone())),
        replacement_repo: Arc::new(ReplacementRepository::new(db.inner().clone())),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/get_leaves", get(leaves::get_leaves))
        .route("/get_replacements", get(replacements::get_replacements))
        .nest("/employees", employees::routes())
        .nest("/leaves", leaves::routes())
        .layer(axum::middleware::from_fn(middleware::auth::admin_middleware))
        .with_state(state)
}

/// One-shot render of the replacement list, matching what the dashboard
/// does on page load: fetch the feed once and emit the list fragment
async fn render_dashboard(base_url: &str) -> anyhow::Result<()> {
    let renderer = ReplacementListRenderer::new(base_url);
    let mut container = ListContainer::new();
    renderer.run(&mut container).await;
    println!("{}", container.to_html());
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReplacementRecord;
    use crate::test_util::test_state;
    use chrono::NaiveDate;

    /// Full loop: real server, real repositories, renderer as the client
    #[tokio::test]
    async fn test_renderer_against_full_app() {
        let state = test_state().await;
        let alice = state.employee_repo.create("Alice").await.unwrap();
        let bob = state.employee_repo.create("Bob").await.unwrap();
        state
            .replacement_repo
            .create(
                alice.id,
                bob.id,
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            )
            .await
            .unwrap();

        let app = router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let renderer = ReplacementListRenderer::new(&base_url);
        let mut container = ListContainer::new();
        renderer.run(&mut container).await;

        assert_eq!(
            container.children(),
            ["Alice is replaced by Bob on 2024-01-05"]
        );

        // The feed itself matches the wire shape the renderer consumed
        let records: Vec<ReplacementRecord> = reqwest::get(format!("{}/get_replacements", base_url))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(records[0].employee_on_leave, "Alice");
    }
}
