use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{label} is required")));
            }
        }
        Ok(())
    }

    fn to_sms(&self) -> String {
        format!(
            "HUGS contact form: {}\nFrom: {} <{}>\n\n{}",
            self.subject.trim(),
            self.name.trim(),
            self.email.trim(),
            self.message.trim()
        )
    }
}

// POST /api/contact
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    body.validate()?;

    state
        .messaging
        .send_message(&state.config.counselor_phone, &body.to_sms())
        .await
        .map_err(|e| AppError::Messaging(e.to_string()))?;

    tracing::info!(subject = %body.subject, "contact message forwarded");
    Ok(Json(serde_json::json!({
        "ok": true,
        "message": "Message sent successfully!",
    })))
}
