//! List, add, edit and delete for the id-addressed screens: products, team,
//! documents, lab equipment and the quarantine area.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use super::{run_gated, Gated, SharedDesk};
use crate::{
    actions::{GatedRecord, RecordAction},
    errors::AppError,
};

/// Registers `base` and `base/:id` for one record type.
pub fn routes<R: GatedRecord>(router: Router<SharedDesk>, base: &str) -> Router<SharedDesk> {
    router
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(show::<R>).put(update::<R>).delete(remove::<R>),
        )
}

pub async fn list<R: GatedRecord>(
    State(desk): State<SharedDesk>,
) -> Result<Json<Vec<R>>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    Ok(Json(desk.store.list::<R>().to_vec()))
}

pub async fn show<R: GatedRecord>(
    State(desk): State<SharedDesk>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;
    desk.store
        .find::<R>(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", R::COLLECTION.storage_key(), id)))
}

pub async fn create<R: GatedRecord>(
    State(desk): State<SharedDesk>,
    Json(form): Json<R::Form>,
) -> Result<Gated, AppError> {
    form.validate()?;
    run_gated(&desk, R::wrap(RecordAction::Add(form))).await
}

pub async fn update<R: GatedRecord>(
    State(desk): State<SharedDesk>,
    Path(id): Path<String>,
    Json(form): Json<R::Form>,
) -> Result<Gated, AppError> {
    form.validate()?;
    run_gated(&desk, R::wrap(RecordAction::Update { id, form })).await
}

pub async fn remove<R: GatedRecord>(
    State(desk): State<SharedDesk>,
    Path(id): Path<String>,
) -> Result<Gated, AppError> {
    run_gated(&desk, R::wrap(RecordAction::Delete { id })).await
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    fn employee(name: &str) -> Value {
        json!({
            "name": name,
            "employeeCode": "QA-7",
            "role": "Quality Engineer",
            "department": "qa",
            "joinedDate": "2022-05-01",
            "email": "eng@example.com",
            "phone": "0123"
        })
    }

    #[tokio::test]
    async fn add_edit_delete_team_member() {
        let (desk, storage) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;

        let (status, first) =
            send_json(&app, Method::POST, "/api/team", Some(employee("منى"))).await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = send_json(&app, Method::POST, "/api/team", Some(employee("كريم"))).await;
        let first_id = first["result"]["id"].as_str().unwrap().to_string();
        let second_id = second["result"]["id"].as_str().unwrap().to_string();

        let (_, listed) = send_json(&app, Method::GET, "/api/team", None).await;
        assert_eq!(listed[0]["id"], json!(second_id));
        assert_eq!(listed.as_array().unwrap().len(), 2);

        let mut edited = employee("منى");
        edited["role"] = json!("QA Lead");
        let (status, body) = send_json(
            &app,
            Method::PUT,
            &format!("/api/team/{}", first_id),
            Some(edited),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["id"], json!(first_id));

        let first_uri = format!("/api/team/{}", first_id);
        let (_, shown) = send_json(&app, Method::GET, &first_uri, None).await;
        assert_eq!(shown["role"], json!("QA Lead"));
        let (_, listed) = send_json(&app, Method::GET, "/api/team", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);

        let second_uri = format!("/api/team/{}", second_id);
        let (_, body) = send_json(&app, Method::DELETE, &second_uri, None).await;
        assert_eq!(body["result"]["deleted"], json!(true));
        let (_, body) = send_json(&app, Method::DELETE, "/api/team/unknown", None).await;
        assert_eq!(body["result"]["deleted"], json!(false));

        desk.lock().await.store.flush().await;
        let persisted = storage.snapshot("tqm_team").unwrap();
        assert_eq!(persisted.as_array().unwrap().len(), 1);
        assert_eq!(persisted[0]["employeeCode"], json!("QA-7"));
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected_before_the_gate() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, USER).await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/lab-equipment",
            Some(json!({"name": "   ", "image": "", "sop": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("validation"));

        let (_, status_body) = send_json(&app, Method::GET, "/api/auth/status", None).await;
        assert_eq!(status_body["pendingAction"], Value::Null);
    }

    #[tokio::test]
    async fn closed_set_fields_reject_unknown_values() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;

        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/documents",
            Some(json!({
                "name": "Plan",
                "type": "pptx",
                "size": "1 MB",
                "date": "2024-01-01",
                "url": "blob:x"
            })),
        )
        .await;
        assert!(status.is_client_error());

        let (_, listed) = send_json(&app, Method::GET, "/api/documents", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn unauthenticated_mutation_is_rejected() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;
        let (status, _) = send_json(&app, Method::GET, "/api/reserved/123", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
