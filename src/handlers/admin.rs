use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Feedback;
use crate::services::auth;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, secret: &str) -> Result<(), AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if auth::verify_token(secret, token, chrono::Utc::now().timestamp()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    expires_in: i64,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !auth::verify_password(&state.config.admin_password_hash, &body.password) {
        tracing::warn!("rejected admin login");
        return Err(AppError::Unauthorized);
    }

    let token = auth::issue_token(&state.config.session_secret, chrono::Utc::now().timestamp())
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("could not sign admin token")))?;
    tracing::info!("admin logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: auth::ADMIN_TOKEN_TTL_SECS,
    }))
}

// GET /api/admin/status
#[derive(Serialize)]
pub struct StatusResponse {
    active_flows: i64,
    feedback_count: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    check_auth(&headers, &state.config.session_secret)?;

    let db = state.db()?;
    Ok(Json(StatusResponse {
        active_flows: queries::count_active_flows(&db)?,
        feedback_count: queries::count_feedback(&db)?,
    }))
}

// GET /api/admin/feedback
pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Feedback>>, AppError> {
    check_auth(&headers, &state.config.session_secret)?;

    let db = state.db()?;
    Ok(Json(queries::list_feedback(&db, 500)?))
}

// DELETE /api/admin/feedback/:id
pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.session_secret)?;

    let deleted = {
        let db = state.db()?;
        queries::delete_feedback(&db, id)?
    };

    if deleted {
        tracing::info!(id, "feedback deleted by admin");
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("feedback {id}")))
    }
}
