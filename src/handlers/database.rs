use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde_json::Value;

use super::{attachment, run_gated, Gated, SharedDesk};
use crate::{actions::PendingAction, errors::AppError, models::Snapshot};

/// Downloads every collection as one JSON document.
pub async fn export(State(desk): State<SharedDesk>) -> Result<Response, AppError> {
    match run_gated(&desk, PendingAction::ExportSnapshot).await? {
        Gated::Applied(snapshot) => {
            let filename = format!("tqm_backup_{}.json", Local::now().format("%Y-%m-%d"));
            let body = serde_json::to_vec_pretty(&snapshot)?;
            Ok(attachment(&filename, "application/json", body))
        }
        challenge => Ok(challenge.into_response()),
    }
}

/// Replaces every collection. The body is checked against the record
/// schemas before the action reaches the gate.
pub async fn import(
    State(desk): State<SharedDesk>,
    Json(body): Json<Value>,
) -> Result<Gated, AppError> {
    let snapshot = Snapshot::from_value(body)?;
    run_gated(&desk, PendingAction::ImportSnapshot(snapshot)).await
}

pub async fn reset(State(desk): State<SharedDesk>) -> Result<Gated, AppError> {
    run_gated(&desk, PendingAction::Reset).await
}
