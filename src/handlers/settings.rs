use axum::{extract::State, Json};
use validator::Validate;

use super::{run_gated, Gated, SharedDesk};
use crate::{actions::PendingAction, errors::AppError, models::CompanySettings};

pub async fn show(State(desk): State<SharedDesk>) -> Result<Json<CompanySettings>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    Ok(Json(desk.store.settings().clone()))
}

pub async fn save(
    State(desk): State<SharedDesk>,
    Json(settings): Json<CompanySettings>,
) -> Result<Gated, AppError> {
    settings.validate()?;
    run_gated(&desk, PendingAction::SaveSettings(settings)).await
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn settings_start_empty_and_save_as_singleton() {
        let (desk, storage) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;

        let (_, settings) = send_json(&app, Method::GET, "/api/settings", None).await;
        assert_eq!(settings["name"], json!(""));

        let (status, _) = send_json(
            &app,
            Method::PUT,
            "/api/settings",
            Some(json!({
                "name": "الشركة المتحدة للبلاستيك",
                "slogan": "الجودة أولاً",
                "registrationNumber": "CR-1029",
                "certificates": "ISO 9001:2015"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        desk.lock().await.store.flush().await;
        let stored = storage.snapshot("tqm_company").unwrap();
        assert!(stored.is_object());
        assert_eq!(stored["registrationNumber"], json!("CR-1029"));
    }

    #[tokio::test]
    async fn blank_company_name_is_rejected() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;
        let (status, _) =
            send_json(&app, Method::PUT, "/api/settings", Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
