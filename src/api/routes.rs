use crate::config::Config;
use crate::db::{DailyStatsRow, Database};
use crate::error::QueryError;
use crate::pipeline::projector::{DailySnapshot, HistoryPoint};
use crate::query::{DEFAULT_HISTORY_DAYS, LocalDates, QueryService};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/daily-stats", get(daily_stats))
        .route("/historical/:activity_type", get(historical))
        .route("/debug/all-stats", get(debug_all_stats))
        .with_state(state)
}

async fn root() -> &'static str {
    "daytrack activity API is running"
}

async fn daily_stats(State(state): State<ApiState>) -> ApiResult<Json<DailySnapshot>> {
    let database = Database::open(&state.config.db_path)?;
    let service = QueryService::new(&database, &LocalDates);

    Ok(Json(service.today_snapshot()?))
}

async fn historical(
    State(state): State<ApiState>,
    Path(activity_type): Path<String>,
) -> ApiResult<Json<Vec<HistoryPoint>>> {
    let database = Database::open(&state.config.db_path)?;
    let service = QueryService::new(&database, &LocalDates);

    let series = service
        .history(&activity_type, DEFAULT_HISTORY_DAYS)
        .map_err(|error| match error {
            QueryError::InvalidActivityKind(_) => ApiError::BadRequest(error.to_string()),
            QueryError::Store(inner) => ApiError::Internal(inner),
        })?;

    Ok(Json(series))
}

async fn debug_all_stats(State(state): State<ApiState>) -> ApiResult<Json<Vec<DailyStatsRow>>> {
    let database = Database::open(&state.config.db_path)?;

    Ok(Json(database.all_daily()?))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(inner) => {
                error!(error = %inner, "query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": inner.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
