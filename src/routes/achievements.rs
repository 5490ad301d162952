use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::points::LocaleQuery;
use super::{ApiResult, AppState, Caller};
use crate::rewards::achievements::AchievementView;
use crate::rewards::locale::Locale;
use crate::rewards::types::{ProgressOutcome, UnlockOutcome};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementView>,
    pub points: i64,
    pub check_in_streak: u32,
    pub last_check_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockParams {
    pub achievement_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressParams {
    pub achievement_id: String,
    pub progress: i64,
}

pub async fn list(
    State(state): State<AppState>,
    Caller(user): Caller,
    query: Result<Query<LocaleQuery>, QueryRejection>,
) -> ApiResult<Json<AchievementsResponse>> {
    let Query(query) = query?;
    let locale = query
        .locale
        .as_deref()
        .map_or(state.rewards.settings().default_locale, Locale::from_code);

    let achievements = state.rewards.get_achievements(&user, locale).await?;
    let account = state.rewards.get_points(&user).await?;

    Ok(Json(AchievementsResponse {
        achievements,
        points: account.total_points,
        check_in_streak: account.check_in_streak,
        last_check_in: account.last_check_in,
    }))
}

pub async fn unlock(
    State(state): State<AppState>,
    Caller(user): Caller,
    payload: Result<Json<UnlockParams>, JsonRejection>,
) -> ApiResult<Json<UnlockOutcome>> {
    let Json(params) = payload?;
    Ok(Json(
        state
            .rewards
            .unlock_achievement(&user, &params.achievement_id)
            .await?,
    ))
}

pub async fn update_progress(
    State(state): State<AppState>,
    Caller(user): Caller,
    payload: Result<Json<ProgressParams>, JsonRejection>,
) -> ApiResult<Json<ProgressOutcome>> {
    let Json(params) = payload?;
    Ok(Json(
        state
            .rewards
            .update_achievement_progress(&user, &params.achievement_id, params.progress)
            .await?,
    ))
}
