//! Campus Hours REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /healthcheck` - `ok - <RFC 3339 timestamp>`
//! - `GET /professor-hours` - Committed hours per professor
//! - `GET /room-schedules` - Occupied slots grouped by room
//!
//! # Example
//!
//! ```rust,ignore
//! use campus_hours::api::{serve, AppState};
//! use campus_hours::config::ServerConfig;
//! use campus_hours::db::SqlitePool;
//! use campus_hours::queries::QueryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = SqlitePool::open("sqlite://campus_hours.db", 4)?;
//!     let state = AppState::new(Arc::new(pool), QueryStore::new("queries/queries.sql"));
//!
//!     serve(state, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/healthcheck", get(routes::health::healthcheck))
        .route("/professor-hours", get(routes::reports::professor_hours))
        .route("/room-schedules", get(routes::reports::room_schedules))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> std::io::Result<()> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Campus Hours API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Campus Hours API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, Database, DbError, DbResult, Row, SqlitePool};
    use crate::queries::QueryStore;
    use crate::row;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use rusqlite::types::Value;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;
    use tower::util::ServiceExt;

    const TWO_STATEMENTS: &str = "SELECT 1 -- QUERY BREAK --\nSELECT 2";

    /// Stand-in database returning canned rows and recording statements
    struct StubDatabase {
        rows: Vec<Row>,
        fail: bool,
        statements: Mutex<Vec<String>>,
    }

    impl StubDatabase {
        fn with_rows(rows: Vec<Row>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                fail: false,
                statements: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                rows: Vec::new(),
                fail: true,
                statements: Mutex::new(Vec::new()),
            })
        }

        fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Database for StubDatabase {
        async fn query(&self, sql: &str, _args: &[Value]) -> DbResult<Vec<Row>> {
            self.statements.lock().unwrap().push(sql.to_string());
            if self.fail {
                return Err(DbError::Sql(rusqlite::Error::InvalidQuery));
            }
            Ok(self.rows.clone())
        }
    }

    fn query_file(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    fn create_test_app(db: Arc<dyn Database>, queries: &NamedTempFile) -> Router {
        build_router(AppState::new(db, QueryStore::new(queries.path())))
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn room_row(room_id: i64, room_number: &str, building: &str, day: i64) -> Row {
        row![
            room_id,
            room_number.to_string(),
            building.to_string(),
            day,
            "08:00".to_string(),
            "10:00".to_string(),
            "CS101".to_string(),
            "Introduction to Programming".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_healthcheck() {
        let queries = query_file(TWO_STATEMENTS);
        let app = create_test_app(StubDatabase::with_rows(Vec::new()), &queries);

        let response = send_get(app, "/healthcheck").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        let timestamp = body
            .strip_prefix("ok - ")
            .and_then(|rest| rest.strip_suffix('\n'))
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_professor_hours() {
        let queries = query_file(TWO_STATEMENTS);
        let db = StubDatabase::with_rows(vec![row![
            7_i64,
            "Ada".to_string(),
            "Lovelace".to_string(),
            5.5_f64
        ]]);
        let app = create_test_app(db.clone(), &queries);

        let response = send_get(app, "/professor-hours").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");

        assert_eq!(
            body_string(response).await,
            r#"[{"professor_id":7,"first_name":"Ada","last_name":"Lovelace","committed_hours":5.5}]"#
        );
        assert_eq!(db.statements(), vec!["SELECT 1".to_string()]);
    }

    #[tokio::test]
    async fn test_room_schedules_groups_rows() {
        let queries = query_file(TWO_STATEMENTS);
        let db = StubDatabase::with_rows(vec![
            room_row(3, "101", "Main", 1),
            room_row(3, "101", "Main", 3),
        ]);
        let app = create_test_app(db.clone(), &queries);

        let response = send_get(app, "/room-schedules").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(db.statements(), vec!["SELECT 2".to_string()]);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let rooms = json.as_array().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["room_id"], 3);
        assert_eq!(rooms[0]["room_number"], "101");
        assert_eq!(rooms[0]["building_name"], "Main");

        let occupied = rooms[0]["occupied_schedules"].as_array().unwrap();
        assert_eq!(occupied.len(), 2);
        assert_eq!(occupied[0]["day_of_week"], 1);
        assert_eq!(occupied[1]["day_of_week"], 3);
    }

    #[tokio::test]
    async fn test_malformed_row_is_skipped() {
        let queries = query_file(TWO_STATEMENTS);
        let db = StubDatabase::with_rows(vec![
            row![1_i64, "Ada".to_string(), "Lovelace".to_string(), 4.0_f64],
            row![2_i64, "Alan".to_string(), "Turing".to_string(), "lots".to_string()],
            row![3_i64, "Grace".to_string(), "Hopper".to_string(), 3.0_f64],
        ]);
        let app = create_test_app(db, &queries);

        let response = send_get(app, "/professor-hours").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let ids: Vec<i64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["professor_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_empty_results_serialize_as_array() {
        let queries = query_file(TWO_STATEMENTS);

        for uri in ["/professor-hours", "/room-schedules"] {
            let app = create_test_app(StubDatabase::with_rows(Vec::new()), &queries);
            let response = send_get(app, uri).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, "[]");
        }
    }

    #[tokio::test]
    async fn test_missing_query_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = StubDatabase::with_rows(Vec::new());
        let state = AppState::new(db.clone(), QueryStore::new(dir.path().join("missing.sql")));

        let response = send_get(build_router(state), "/professor-hours").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Could not read query file");

        // Nothing reaches the database
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_database_failure() {
        let queries = query_file(TWO_STATEMENTS);
        let app = create_test_app(StubDatabase::failing(), &queries);

        let response = send_get(app, "/room-schedules").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_string(response).await, "Database query failed");
    }

    #[tokio::test]
    async fn test_missing_statement_fails_in_database() {
        let queries = query_file("SELECT 1");
        let pool = SqlitePool::in_memory().unwrap();
        let app = create_test_app(Arc::new(pool), &queries);

        let response = send_get(app, "/room-schedules").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Database query failed");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let queries = query_file(TWO_STATEMENTS);
        let app = create_test_app(StubDatabase::with_rows(Vec::new()), &queries);

        let response = send_get(app, "/professors").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn seeded_app() -> Router {
        let pool = SqlitePool::in_memory().unwrap();
        db::migrate(&pool).await.unwrap();
        db::seed(&pool).await.unwrap();

        let queries = QueryStore::new(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("queries/queries.sql"),
        );
        build_router(AppState::new(Arc::new(pool), queries))
    }

    #[tokio::test]
    async fn test_sqlite_professor_hours() {
        let response = send_get(seeded_app().await, "/professor-hours").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let professors = json.as_array().unwrap();
        assert_eq!(professors.len(), 4);

        let hours: Vec<(i64, f64)> = professors
            .iter()
            .map(|p| {
                (
                    p["professor_id"].as_i64().unwrap(),
                    p["committed_hours"].as_f64().unwrap(),
                )
            })
            .collect();
        assert_eq!(hours, vec![(1, 4.0), (2, 5.5), (3, 3.0), (4, 2.0)]);
    }

    #[tokio::test]
    async fn test_sqlite_room_schedules() {
        let response = send_get(seeded_app().await, "/room-schedules").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let rooms = json.as_array().unwrap();
        assert_eq!(rooms.len(), 4);

        let total: usize = rooms
            .iter()
            .map(|r| r["occupied_schedules"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 7);

        let main_101 = rooms.iter().find(|r| r["room_id"] == 1).unwrap();
        assert_eq!(main_101["room_number"], "101");
        assert_eq!(main_101["building_name"], "Main");
        assert_eq!(main_101["occupied_schedules"].as_array().unwrap().len(), 3);
    }
}
