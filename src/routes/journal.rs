use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiResult, AppState, Caller};
use crate::rewards::triggers::{AppliedMilestone, JournalEntry};

/// Snapshot of every journal entry the caller has saved.
#[derive(Debug, Deserialize)]
pub struct JournalParams {
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub milestones: Vec<AppliedMilestone>,
}

pub async fn record_activity(
    State(state): State<AppState>,
    Caller(user): Caller,
    payload: Result<Json<JournalParams>, JsonRejection>,
) -> ApiResult<Json<JournalResponse>> {
    let Json(params) = payload?;
    let milestones = state
        .rewards
        .record_journal_activity(&user, &params.entries)
        .await?;
    Ok(Json(JournalResponse { milestones }))
}
