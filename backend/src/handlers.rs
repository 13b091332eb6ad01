use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::{CalendarInfo, CalendarResult};

use crate::error::{ApiError, ApiResult};
use crate::fetcher::{FetchOutcome, SourceOutcome};
use crate::state::AppState;

const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// `GET /api/calendars`: public metadata for every configured calendar.
pub async fn list_calendars(State(state): State<AppState>) -> Json<Vec<CalendarInfo>> {
    Json(state.registry.all().iter().map(|source| source.info()).collect())
}

/// `GET /api/calendar/:id`: raw ICS text for one calendar.
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let source = state.registry.find(&id).ok_or(ApiError::CalendarNotFound)?;

    match state.fetcher.fetch(source).await {
        FetchOutcome::Success { payload } => {
            Ok(([(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)], payload).into_response())
        }
        FetchOutcome::Failure { reason } => Err(ApiError::Fetch(reason)),
    }
}

/// `GET /api/calendars/all`: every calendar fetched concurrently. Per-feed
/// failures are reported inline and never change the response status.
pub async fn get_all_calendars(State(state): State<AppState>) -> Json<Vec<CalendarResult>> {
    let outcomes = state.fetcher.fetch_all(&state.registry).await;
    Json(outcomes.into_iter().map(CalendarResult::from).collect())
}

impl From<SourceOutcome> for CalendarResult {
    fn from(value: SourceOutcome) -> Self {
        match value.outcome {
            FetchOutcome::Success { payload } => CalendarResult::success(value.info, payload),
            FetchOutcome::Failure { reason } => CalendarResult::failure(value.info, reason),
        }
    }
}
