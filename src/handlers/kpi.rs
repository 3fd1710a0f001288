use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use super::{run_gated, Gated, SharedDesk};
use crate::{
    actions::{KpiAction, PendingAction},
    errors::AppError,
    models::KpiData,
};

pub async fn list(State(desk): State<SharedDesk>) -> Result<Json<Vec<KpiData>>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    Ok(Json(desk.store.kpi_entries().to_vec()))
}

pub async fn show(
    State(desk): State<SharedDesk>,
    Path(index): Path<usize>,
) -> Result<Json<KpiData>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    desk.store
        .kpi_entries()
        .get(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("KPI entry {}", index)))
}

pub async fn create(
    State(desk): State<SharedDesk>,
    Json(entry): Json<KpiData>,
) -> Result<Gated, AppError> {
    entry.validate()?;
    run_gated(&desk, PendingAction::Kpi(KpiAction::Add(entry))).await
}

pub async fn update(
    State(desk): State<SharedDesk>,
    Path(index): Path<usize>,
    Json(entry): Json<KpiData>,
) -> Result<Gated, AppError> {
    entry.validate()?;
    run_gated(&desk, PendingAction::Kpi(KpiAction::Update { index, entry })).await
}

pub async fn remove(
    State(desk): State<SharedDesk>,
    Path(index): Path<usize>,
) -> Result<Gated, AppError> {
    run_gated(&desk, PendingAction::Kpi(KpiAction::Delete { index })).await
}
