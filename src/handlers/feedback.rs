use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Feedback, NewFeedback};
use crate::state::AppState;

const FEEDBACK_PAGE_SIZE: i64 = 100;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    id: i64,
    display_name: String,
    category: &'static str,
    category_label: &'static str,
    rating: u8,
    message: String,
    created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            display_name: f.display_name().to_string(),
            category: f.category.as_str(),
            category_label: f.category.label(),
            rating: f.rating,
            message: f.message,
            created_at: f.created_at,
        }
    }
}

// GET /api/feedback
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let entries = {
        let db = state.db()?;
        queries::list_feedback(&db, FEEDBACK_PAGE_SIZE)?
    };
    Ok(Json(entries.into_iter().map(FeedbackResponse::from).collect()))
}

// POST /api/feedback
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<NewFeedback>,
) -> Result<Json<FeedbackResponse>, AppError> {
    body.message = body.message.trim().to_string();
    body.name = body.name.trim().to_string();
    body.email = body.email.trim().to_string();

    if body.message.is_empty() {
        return Err(AppError::Validation("feedback message is required".to_string()));
    }
    if body.rating > 5 {
        return Err(AppError::Validation("rating must be between 0 and 5".to_string()));
    }
    if body.anonymous {
        body.name.clear();
        body.email.clear();
    }

    let saved = {
        let db = state.db()?;
        queries::insert_feedback(&db, &body)?
    };
    tracing::info!(id = saved.id, rating = saved.rating, category = saved.category.as_str(), "feedback received");

    Ok(Json(saved.into()))
}
