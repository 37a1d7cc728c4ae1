use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{BookingForm, ConfirmationRecord, FlowStage, PaymentMethod, SESSION_MINUTES};
use crate::services::calendar::generate_ics;
use crate::services::flows;
use crate::state::AppState;

use super::flow_token;

fn confirmed_record(state: &AppState, headers: &HeaderMap) -> Result<ConfirmationRecord, AppError> {
    let token = flow_token(headers);
    flows::load(state, token.as_deref())?
        .filter(|f| f.stage == FlowStage::Confirmed)
        .and_then(|f| f.data.confirmation)
        .ok_or(AppError::MissingPrecondition { redirect: "/" })
}

/// wa.me link that opens a chat with the counselor, prefilled with the
/// session slot and transaction id.
pub fn contact_url(counselor_number: &str, record: &ConfirmationRecord) -> String {
    let message = format!(
        "Hi, I've booked a session for {} at {}. Transaction ID: {}",
        record.booking_data.date, record.booking_data.time, record.transaction_id
    );
    let number: String = counselor_number.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{number}?text={}", urlencoding::encode(&message))
}

#[derive(Serialize)]
pub struct Link {
    label: &'static str,
    href: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    booking_data: BookingForm,
    payment_method: PaymentMethod,
    payment_method_label: &'static str,
    transaction_id: String,
    duration_minutes: i64,
    contact_url: String,
    calendar_url: &'static str,
    links: Vec<Link>,
}

// GET /api/confirmation
pub async fn get_confirmation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let record = confirmed_record(&state, &headers)?;

    Ok(Json(ConfirmationResponse {
        contact_url: contact_url(&state.config.counselor_whatsapp, &record),
        payment_method: record.payment_method,
        payment_method_label: record.payment_method.label(),
        transaction_id: record.transaction_id,
        booking_data: record.booking_data,
        duration_minutes: SESSION_MINUTES,
        calendar_url: "/payment-success/calendar.ics",
        links: vec![
            Link { label: "Modify Booking", href: "/booking" },
            Link { label: "View Pre-session Resources", href: "/resources" },
            Link { label: "Return to Home", href: "/" },
        ],
    }))
}

// GET /payment-success/calendar.ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let record = confirmed_record(&state, &headers)?;
    let ics = generate_ics(&record, chrono::Utc::now().naive_utc()).ok_or_else(|| {
        AppError::Validation("booked slot could not be converted to a calendar event".to_string())
    })?;
    let filename = format!("hugs-session-{}.ics", record.transaction_id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
