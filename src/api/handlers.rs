//! Endpoint handlers and their request/response types.
//!
//! Handlers validate inputs at the edge (missing fields, bad enum values,
//! unparseable timestamps), delegate to the controllers, and translate
//! controller outcomes into the JSON shapes the web UI expects. Controllers
//! assume canonical timestamps; normalization happens here.

use crate::api::error::ApiError;
use crate::db::db::Db;
use crate::libs::formatter;
use crate::libs::meal::{self, ListedMeal, MealLog};
use crate::libs::messages::Message;
use crate::libs::sleep::{self, EndOutcome, ListedSession, SleepStatus, SleepTracker, StartOutcome};
use crate::libs::stats::{self, FilteredRecords, RecordKind, RecordQuery, StatisticsReport, DEFAULT_WINDOW_DAYS};
use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Shared application state: one controller per record collection.
///
/// Both controllers run over the single shared connection from [`Db`], so
/// concurrent handlers queue on its mutex instead of contending for write
/// locks through separate connections.
#[derive(Clone)]
pub struct AppState {
    pub sleep: SleepTracker,
    pub meals: MealLog,
    pub query: RecordQuery,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        let sleep = SleepTracker::new(&db);
        let meals = MealLog::new(&db);
        let query = RecordQuery::new(sleep.clone(), meals.clone());
        Ok(AppState { sleep, meals, query })
    }
}

/// Success body for record mutations: `{message, display?, id}`.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecordBody {
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomSleepBody {
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomMealBody {
    pub meal_time: Option<String>,
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub days: Option<i64>,
}

/// POST /api/sleep-start
pub async fn sleep_start_handler(State(state): State<AppState>) -> Result<Json<MutationResponse>, ApiError> {
    let outcome = state.sleep.start()?;
    let response = match outcome {
        StartOutcome::Started { id } => MutationResponse {
            message: Message::SleepStarted.to_string(),
            display: None,
            id,
        },
        StartOutcome::Restarted { id } => MutationResponse {
            message: Message::SleepRestarted.to_string(),
            display: None,
            id,
        },
    };
    Ok(Json(response))
}

/// POST /api/sleep-end
pub async fn sleep_end_handler(State(state): State<AppState>) -> Result<Json<MutationResponse>, ApiError> {
    let outcome = state.sleep.end()?;
    let response = match outcome {
        EndOutcome::Completed { id, display } => MutationResponse {
            message: Message::SleepCompleted.to_string(),
            display: Some(display),
            id,
        },
        EndOutcome::WithoutStart { id } => MutationResponse {
            message: Message::SleepEndedWithoutStart.to_string(),
            display: None,
            id,
        },
    };
    Ok(Json(response))
}

/// GET /api/sleep-status
pub async fn sleep_status_handler(State(state): State<AppState>) -> Result<Json<SleepStatus>, ApiError> {
    let status = state.sleep.status().map_err(|_| ApiError::storage(Message::QueryFailed))?;
    Ok(Json(status))
}

/// GET /api/sleep-records
pub async fn sleep_records_handler(State(state): State<AppState>) -> Result<Json<Vec<ListedSession>>, ApiError> {
    let sessions = state
        .sleep
        .list(sleep::DEFAULT_LIST_LIMIT)
        .map_err(|_| ApiError::storage(Message::QueryFailed))?;
    Ok(Json(sessions))
}

/// DELETE /api/sleep-records/{id}
pub async fn sleep_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    let affected = state.sleep.remove(id).map_err(|_| ApiError::storage(Message::DeleteFailed))?;
    if affected == 0 {
        return Err(ApiError::not_found(Message::RecordNotFound));
    }
    Ok(Json(MutationResponse {
        message: Message::RecordDeleted.to_string(),
        display: None,
        id,
    }))
}

/// POST /api/sleep-records/custom
pub async fn sleep_custom_handler(
    State(state): State<AppState>,
    Json(body): Json<CustomSleepBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    let (start, end) = match (body.sleep_start, body.sleep_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ApiError::validation(Message::MissingRequiredParams)),
    };
    let start = normalize(&start)?;
    let end = normalize(&end)?;
    let (id, display) = state
        .sleep
        .insert_custom(&start, &end)
        .map_err(|_| ApiError::storage(Message::InsertFailed))?;
    Ok(Json(MutationResponse {
        message: Message::SleepCustomAdded.to_string(),
        display: Some(display),
        id,
    }))
}

/// POST /api/meal-record
pub async fn meal_record_handler(
    State(state): State<AppState>,
    body: Option<Json<MealRecordBody>>,
) -> Result<Json<MutationResponse>, ApiError> {
    let meal_type = body.and_then(|Json(body)| body.meal_type);
    let id = state
        .meals
        .log(meal_type.as_deref())
        .map_err(|_| ApiError::storage(Message::InsertFailed))?;
    Ok(Json(MutationResponse {
        message: Message::MealLogged.to_string(),
        display: None,
        id,
    }))
}

/// GET /api/meal-records
pub async fn meal_records_handler(State(state): State<AppState>) -> Result<Json<Vec<ListedMeal>>, ApiError> {
    let entries = state
        .meals
        .list(meal::DEFAULT_LIST_LIMIT)
        .map_err(|_| ApiError::storage(Message::QueryFailed))?;
    Ok(Json(entries))
}

/// DELETE /api/meal-records/{id}
pub async fn meal_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    let affected = state.meals.remove(id).map_err(|_| ApiError::storage(Message::DeleteFailed))?;
    if affected == 0 {
        return Err(ApiError::not_found(Message::RecordNotFound));
    }
    Ok(Json(MutationResponse {
        message: Message::RecordDeleted.to_string(),
        display: None,
        id,
    }))
}

/// POST /api/meal-records/custom
pub async fn meal_custom_handler(
    State(state): State<AppState>,
    Json(body): Json<CustomMealBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    let time = body.meal_time.ok_or_else(|| ApiError::validation(Message::MissingRequiredParams))?;
    let time = normalize(&time)?;
    let (id, display) = state
        .meals
        .insert_custom(&time, body.meal_type.as_deref())
        .map_err(|_| ApiError::storage(Message::InsertFailed))?;
    Ok(Json(MutationResponse {
        message: Message::MealCustomAdded.to_string(),
        display: Some(display),
        id,
    }))
}

/// GET /api/records/filter
pub async fn filter_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<FilteredRecords>, ApiError> {
    let (kind, start, end) = match (params.kind, params.start, params.end) {
        (Some(kind), Some(start), Some(end)) => (kind, start, end),
        _ => return Err(ApiError::validation(Message::MissingRequiredParams)),
    };
    let kind: RecordKind = kind.parse().map_err(|_| ApiError::validation(Message::InvalidRecordType))?;
    let start = normalize(&start)?;
    let end = normalize(&end)?;
    let records = state
        .query
        .filter(kind, &start, &end)
        .map_err(|_| ApiError::storage(Message::QueryFailed))?;
    Ok(Json(records))
}

/// GET /api/statistics
pub async fn statistics_handler(
    State(state): State<AppState>,
    Query(params): Query<StatisticsQuery>,
) -> Result<Json<StatisticsReport>, ApiError> {
    let days = params.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if stats::window_start(days).is_none() {
        return Err(ApiError::validation(Message::InvalidWindowDays(days)));
    }
    let report = state.query.statistics(days).map_err(|_| ApiError::storage(Message::QueryFailed))?;
    Ok(Json(report))
}

/// Normalizes a caller-provided timestamp, rejecting garbage with a 400.
fn normalize(value: &str) -> Result<String, ApiError> {
    formatter::normalize_timestamp(value).map_err(|_| ApiError::validation(Message::InvalidTimestamp(value.to_string())))
}
