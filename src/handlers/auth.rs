use axum::{extract::State, response::Response, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{applied, Desk, SharedDesk};
use crate::auth::resolve_password;
use crate::errors::AppError;

#[derive(Deserialize)]
pub struct PasswordForm {
    password: String,
}

pub async fn login(
    State(desk): State<SharedDesk>,
    Json(form): Json<PasswordForm>,
) -> Result<Json<Value>, AppError> {
    let credentials = desk.lock().await.gate.credentials();
    let resolved = resolve_password(credentials, form.password).await;
    let role = desk.lock().await.gate.login(resolved)?;
    Ok(Json(json!({ "role": role })))
}

pub async fn logout(State(desk): State<SharedDesk>) -> Json<Value> {
    desk.lock().await.gate.logout();
    Json(json!({ "authenticated": false }))
}

pub async fn status(State(desk): State<SharedDesk>) -> Json<Value> {
    let desk = desk.lock().await;
    Json(json!({
        "authenticated": desk.gate.role().is_some(),
        "role": desk.gate.role(),
        "pendingAction": desk.gate.pending().map(|action| action.label()),
    }))
}

/// Releases the parked action with the admin password and applies it.
pub async fn confirm_challenge(
    State(desk): State<SharedDesk>,
    Json(form): Json<PasswordForm>,
) -> Result<Response, AppError> {
    let credentials = desk.lock().await.gate.credentials();
    let resolved = resolve_password(credentials, form.password).await;

    let mut desk = desk.lock().await;
    let Desk { store, gate } = &mut *desk;
    let action = gate.confirm(resolved)?;
    log::info!("Challenge confirmed for {}", action.label());
    Ok(applied(action.dispatch(store)?))
}

pub async fn dismiss_challenge(State(desk): State<SharedDesk>) -> Json<Value> {
    let dismissed = desk.lock().await.gate.dismiss();
    Json(json!({ "dismissed": dismissed }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn login_reports_role_or_fixed_error() {
        let (desk, _) = desk().await;
        let app = app(&desk);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], json!(crate::errors::WRONG_PASSWORD));

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"password": USER})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!("user"));

        let (_, body) = send_json(&app, Method::GET, "/api/auth/status", None).await;
        assert_eq!(body["authenticated"], json!(true));
        assert_eq!(body["role"], json!("user"));
    }

    #[tokio::test]
    async fn user_mutation_waits_for_admin_confirmation() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, USER).await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "عبوة 1 لتر", "specs": "HDPE", "defects": "", "image": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["action"], json!("products.add"));

        let (_, listed) = send_json(&app, Method::GET, "/api/products", None).await;
        assert_eq!(listed, json!([]));

        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/auth/challenge/confirm",
            Some(json!({"password": USER})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/auth/challenge/confirm",
            Some(json!({"password": ADMIN})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["name"], json!("عبوة 1 لتر"));

        let (_, listed) = send_json(&app, Method::GET, "/api/products", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dismissed_challenge_leaves_state_unchanged() {
        let (desk, storage) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;
        let (_, created) = send_json(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "غطاء 38 مم", "specs": "PP", "defects": "", "image": ""})),
        )
        .await;
        let id = created["result"]["id"].as_str().unwrap().to_string();
        let (_, before) = send_json(&app, Method::GET, "/api/products", None).await;

        login(&app, USER).await;
        let (status, _) = send_json(&app, Method::POST, "/api/database/reset", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let (_, body) = send_json(&app, Method::POST, "/api/auth/challenge/dismiss", None).await;
        assert_eq!(body["dismissed"], json!(true));

        let delete_uri = format!("/api/products/{}", id);
        let (status, _) = send_json(&app, Method::DELETE, &delete_uri, None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        send_json(&app, Method::POST, "/api/auth/challenge/dismiss", None).await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/auth/challenge/confirm",
            Some(json!({"password": ADMIN})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], json!("no_pending_action"));

        let (_, after) = send_json(&app, Method::GET, "/api/products", None).await;
        assert_eq!(after, before);
        assert_eq!(after[0]["id"], json!(id));

        desk.lock().await.store.flush().await;
        let stored = storage.snapshot("tqm_products").unwrap();
        assert_eq!(stored, before);
    }

    #[tokio::test]
    async fn logout_blocks_further_reads() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;
        send_json(&app, Method::POST, "/api/auth/logout", None).await;

        let (status, _) = send_json(&app, Method::GET, "/api/team", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
