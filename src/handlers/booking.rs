use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::booking::{language_options, problem_options, status_options, SelectOption};
use crate::models::{BookingField, BookingForm, BookingHandoff, Flow, FlowStage, TIME_SLOTS};
use crate::services::booking::BookingDraft;
use crate::services::flows;
use crate::state::AppState;

use super::{flow_token, with_flow_cookie};

// GET /api/booking/options
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    languages: Vec<SelectOption>,
    problems: Vec<SelectOption>,
    statuses: Vec<SelectOption>,
    time_slots: Vec<&'static str>,
    min_date: String,
    session_price: u32,
}

pub async fn options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        session_price: state.config.session_price,
        languages: language_options(),
        problems: problem_options(),
        statuses: status_options(),
        time_slots: TIME_SLOTS.to_vec(),
        min_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<bool>,
    draft: BookingForm,
    discount: u32,
}

impl DraftResponse {
    fn from_flow(flow: &Flow, accepted: Option<bool>) -> Self {
        Self {
            accepted,
            draft: flow.data.draft.clone(),
            discount: flow.data.discount,
        }
    }
}

/// A confirmed flow reopened on the booking screen starts over, prefilled
/// with the booking that was just paid for.
fn restart_if_finished(flow: &mut Flow) {
    if flow.stage != FlowStage::Confirmed {
        return;
    }
    if let Some(record) = flow.data.confirmation.take() {
        flow.data.draft = record.booking_data;
    }
    flow.data.handoff = None;
    flow.data.upi_provider = None;
    flow.stage = FlowStage::Draft;
    tracing::info!(token = %flow.token, "restarting booking flow");
}

fn open_flow(state: &AppState, headers: &HeaderMap) -> Result<(Flow, bool), AppError> {
    let token = flow_token(headers);
    let (mut flow, created) = flows::load_or_create(state, token.as_deref())?;
    restart_if_finished(&mut flow);
    Ok((flow, created))
}

// GET /api/booking/draft
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (mut flow, created) = open_flow(&state, &headers)?;
    flows::save(&state, &mut flow)?;
    Ok(with_flow_cookie(
        Json(DraftResponse::from_flow(&flow, None)),
        &flow,
        created,
    ))
}

// POST /api/booking/input
#[derive(Deserialize)]
pub struct InputRequest {
    pub field: String,
    pub value: String,
}

pub async fn post_input(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<InputRequest>,
) -> Result<Response, AppError> {
    let field = BookingField::parse(&body.field)
        .ok_or_else(|| AppError::Validation(format!("unknown field: {}", body.field)))?;

    let (mut flow, created) = open_flow(&state, &headers)?;
    let mut draft = BookingDraft::new(flow.data.draft.clone(), flow.data.discount);
    let accepted = draft.apply_input(field, &body.value);

    flow.data.draft = draft.form;
    flows::save(&state, &mut flow)?;

    Ok(with_flow_cookie(
        Json(DraftResponse::from_flow(&flow, Some(accepted))),
        &flow,
        created,
    ))
}

// POST /api/booking/coupon
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CouponRequest {
    pub code: Option<String>,
}

pub async fn post_coupon(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: CouponRequest = parse_optional_json(&body)?.unwrap_or_default();

    let (mut flow, created) = open_flow(&state, &headers)?;
    let mut draft = BookingDraft::new(flow.data.draft.clone(), flow.data.discount);
    if let Some(code) = request.code {
        draft.apply_input(BookingField::CouponCode, &code);
    }
    let discount = draft.apply_coupon();
    tracing::info!(token = %flow.token, code = %draft.form.coupon_code, discount, "coupon applied");

    flow.data.draft = draft.form;
    flow.data.discount = discount;
    flows::save(&state, &mut flow)?;

    Ok(with_flow_cookie(
        Json(DraftResponse::from_flow(&flow, None)),
        &flow,
        created,
    ))
}

// POST /api/booking/submit
#[derive(Serialize)]
pub struct SubmitResponse {
    next: &'static str,
}

pub async fn post_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let incoming: Option<BookingForm> = parse_optional_json(&body)?;

    let (mut flow, created) = open_flow(&state, &headers)?;
    if flow.stage == FlowStage::Processing {
        return Err(AppError::Conflict(
            "a payment for this booking is already being processed".to_string(),
        ));
    }

    let mut draft = BookingDraft::new(flow.data.draft.clone(), flow.data.discount);
    if let Some(form) = incoming {
        let rejected = draft.merge(&form);
        if !rejected.is_empty() {
            let names: Vec<&str> = rejected.iter().map(|f| f.as_str()).collect();
            tracing::debug!(fields = ?names, "discarded submitted values");
        }
    }
    flow.data.draft = draft.form.clone();

    let today = chrono::Local::now().date_naive();
    let booking = match draft.submit(today) {
        Ok(booking) => booking,
        Err(e) => {
            flows::save(&state, &mut flow)?;
            return Err(AppError::Validation(e.to_string()));
        }
    };

    flow.data.handoff = Some(BookingHandoff {
        booking_data: booking,
        discount: draft.discount,
    });
    flow.stage = FlowStage::AwaitingPayment;
    flows::save(&state, &mut flow)?;

    tracing::info!(token = %flow.token, discount = draft.discount, "booking submitted");

    Ok(with_flow_cookie(
        Json(SubmitResponse { next: "/payment" }),
        &flow,
        created,
    ))
}

/// An empty body means "no payload"; anything else must be valid JSON.
fn parse_optional_json<T: serde::de::DeserializeOwned>(
    body: &Bytes,
) -> Result<Option<T>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::Validation(format!("invalid request body: {e}")))
}
