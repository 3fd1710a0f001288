pub mod auth;
pub mod database;
pub mod kpi;
pub mod records;
pub mod reports;
pub mod settings;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::{
    actions::PendingAction,
    auth::{AuthGate, GateOutcome},
    errors::AppError,
    models::DashboardSummary,
    store::Store,
};

/// Everything one operator session works on.
pub struct Desk {
    pub store: Store,
    pub gate: AuthGate,
}

pub type SharedDesk = Arc<Mutex<Desk>>;

pub enum Gated {
    Applied(Value),
    ChallengeRequired(String),
}

impl IntoResponse for Gated {
    fn into_response(self) -> Response {
        match self {
            Gated::Applied(result) => applied(result),
            Gated::ChallengeRequired(action) => (
                StatusCode::ACCEPTED,
                Json(json!({
                    "status": "challenge_required",
                    "action": action,
                })),
            )
                .into_response(),
        }
    }
}

pub fn applied(result: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "applied",
            "result": result,
        })),
    )
        .into_response()
}

/// Runs `action` now for admins, or parks it behind the challenge.
pub async fn run_gated(desk: &SharedDesk, action: PendingAction) -> Result<Gated, AppError> {
    let mut desk = desk.lock().await;
    let label = action.label();
    let Desk { store, gate } = &mut *desk;

    match gate.request(action)? {
        GateOutcome::Proceed(action) => Ok(Gated::Applied(action.dispatch(store)?)),
        GateOutcome::ChallengeRequired => Ok(Gated::ChallengeRequired(label)),
    }
}

/// Download headers; the UTF-8 `filename*` form keeps non-ASCII names intact.
pub fn attachment(filename: &str, content_type: &'static str, body: Vec<u8>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename,
        urlencoding::encode(filename)
    );
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

pub async fn dashboard(State(desk): State<SharedDesk>) -> Result<Json<DashboardSummary>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    Ok(Json(desk.store.summary()))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn dashboard_requires_login() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        let (status, body) = send_json(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], json!("not_authenticated"));
    }

    #[tokio::test]
    async fn dashboard_summarises_collections() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;

        send_json(
            &app,
            Method::POST,
            "/api/kpi",
            Some(json!({"month": "يناير", "year": "2024", "qualityRate": 95, "defects": 3})),
        )
        .await;
        send_json(
            &app,
            Method::POST,
            "/api/reserved",
            Some(json!({"productName": "غطاء", "quantity": 10, "date": "2024-01-05"})),
        )
        .await;

        let (status, body) = send_json(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalKpis"], json!(1));
        assert_eq!(body["lastQualityRate"], json!(95.0));
        assert_eq!(body["reservedPending"], json!(1));
    }
}
