use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiResult, AppState, Caller};
use crate::rewards::locale::Locale;
use crate::rewards::types::{
    AddPointsOutcome, CheckInOutcome, PointsAccount, PointsHistoryEntry, PointsSource,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsParams {
    pub amount: i64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    /// Stored as the ledger row's description.
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn get_points(
    State(state): State<AppState>,
    Caller(user): Caller,
) -> ApiResult<Json<PointsAccount>> {
    Ok(Json(state.rewards.get_points(&user).await?))
}

pub async fn add_points(
    State(state): State<AppState>,
    Caller(user): Caller,
    payload: Result<Json<AddPointsParams>, JsonRejection>,
) -> ApiResult<Json<AddPointsOutcome>> {
    let Json(params) = payload?;
    let source = match params.source.as_deref() {
        Some(s) => s.parse::<PointsSource>()?,
        None => PointsSource::default(),
    };
    let outcome = state
        .rewards
        .add_points(&user, params.amount, source, params.source_id, params.reason)
        .await?;
    Ok(Json(outcome))
}

pub async fn check_in(
    State(state): State<AppState>,
    Caller(user): Caller,
    query: Result<Query<LocaleQuery>, QueryRejection>,
) -> ApiResult<Json<CheckInOutcome>> {
    let Query(query) = query?;
    let locale = query.locale.as_deref().map(Locale::from_code);
    Ok(Json(state.rewards.check_in(&user, locale).await?))
}

pub async fn history(
    State(state): State<AppState>,
    Caller(user): Caller,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PointsHistoryEntry>>> {
    let Query(query) = query?;
    Ok(Json(state.rewards.history(&user, query.limit).await?))
}
