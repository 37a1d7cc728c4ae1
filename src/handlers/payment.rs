use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    BookingForm, BookingHandoff, ConfirmationRecord, Flow, FlowStage, PaymentDraft, PaymentMethod,
    UpiApp, SESSION_MINUTES,
};
use crate::services::coupons::{price_after_discount, Pricing};
use crate::services::flows;
use crate::services::payment::{generate_transaction_id, validate_submission};
use crate::state::AppState;

use super::flow_token;

/// The caller's flow, provided it carries a submitted booking that hasn't
/// been paid for yet.
fn payable_flow(state: &AppState, headers: &HeaderMap) -> Result<(Flow, BookingHandoff), AppError> {
    let token = flow_token(headers);
    let flow = flows::load(state, token.as_deref())?
        .filter(|f| matches!(f.stage, FlowStage::AwaitingPayment | FlowStage::Processing));
    let Some(flow) = flow else {
        return Err(AppError::MissingPrecondition { redirect: "/booking" });
    };
    match flow.data.handoff.clone() {
        Some(handoff) => Ok((flow, handoff)),
        None => Err(AppError::MissingPrecondition { redirect: "/booking" }),
    }
}

// GET /api/payment
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiAppResponse {
    id: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    booking_data: BookingForm,
    discount: u32,
    pricing: Pricing,
    duration_minutes: i64,
    method: PaymentMethod,
    upi_provider: Option<UpiApp>,
    upi_apps: Vec<UpiAppResponse>,
    processing: bool,
}

pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PaymentResponse>, AppError> {
    let (flow, handoff) = payable_flow(&state, &headers)?;

    Ok(Json(PaymentResponse {
        pricing: price_after_discount(state.config.session_price, handoff.discount),
        booking_data: handoff.booking_data,
        discount: handoff.discount,
        duration_minutes: SESSION_MINUTES,
        method: flow.data.payment_method,
        upi_provider: flow.data.upi_provider,
        upi_apps: UpiApp::ALL
            .iter()
            .map(|app| UpiAppResponse {
                id: app.as_str(),
                name: app.display_name(),
            })
            .collect(),
        processing: flow.stage == FlowStage::Processing,
    }))
}

// POST /api/payment/method
#[derive(Deserialize)]
pub struct MethodRequest {
    pub method: PaymentMethod,
}

pub async fn post_method(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<MethodRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (mut flow, _) = payable_flow(&state, &headers)?;
    flow.data.payment_method = body.method;
    flows::save(&state, &mut flow)?;
    Ok(Json(serde_json::json!({ "method": body.method })))
}

// POST /api/payment/upi-app
#[derive(Deserialize)]
pub struct UpiAppRequest {
    pub provider: UpiApp,
}

pub async fn post_upi_app(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpiAppRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (mut flow, _) = payable_flow(&state, &headers)?;
    flow.data.payment_method = PaymentMethod::Upi;
    flow.data.upi_provider = Some(body.provider);
    flows::save(&state, &mut flow)?;

    Ok(Json(serde_json::json!({
        "provider": body.provider,
        "notice": format!("Redirecting to {}...", body.provider.display_name()),
    })))
}

// POST /api/payment/submit
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    next: &'static str,
    transaction_id: String,
}

pub async fn post_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(mut body): Json<PaymentDraft>,
) -> Result<Json<SubmitResponse>, AppError> {
    let token = flow_token(&headers);
    let flow = flows::load(&state, token.as_deref())?;
    let (flow, handoff) = match flow {
        Some(f) if f.stage == FlowStage::Processing => {
            return Err(AppError::Conflict(
                "this payment is already being processed".to_string(),
            ));
        }
        Some(f) if f.stage == FlowStage::Confirmed => {
            return Err(AppError::Conflict("this booking is already paid for".to_string()));
        }
        Some(f) if f.stage == FlowStage::AwaitingPayment => match f.data.handoff.clone() {
            Some(handoff) => (f, handoff),
            None => return Err(AppError::MissingPrecondition { redirect: "/booking" }),
        },
        _ => return Err(AppError::MissingPrecondition { redirect: "/booking" }),
    };

    if body.method == PaymentMethod::Upi && body.upi.provider.is_none() {
        body.upi.provider = flow.data.upi_provider;
    }
    let submission = validate_submission(&body).map_err(AppError::Validation)?;

    // Only one request can move the flow into processing
    if !flows::transition(&state, &flow.token, FlowStage::AwaitingPayment, FlowStage::Processing)? {
        return Err(AppError::Conflict(
            "this payment is already being processed".to_string(),
        ));
    }

    let pricing = price_after_discount(state.config.session_price, handoff.discount);
    tracing::info!(
        token = %flow.token,
        method = submission.method().as_str(),
        total = pricing.total,
        "processing payment"
    );

    if let Err(e) = state.payments.process(&submission, pricing.total).await {
        tracing::warn!(token = %flow.token, error = %e, "payment failed");
        flows::transition(&state, &flow.token, FlowStage::Processing, FlowStage::AwaitingPayment)?;
        return Err(AppError::PaymentFailed);
    }

    // Reload: the draft may have been edited while the charge was in flight
    let Some(mut flow) = flows::load(&state, Some(flow.token.as_str()))? else {
        tracing::error!(token = %flow.token, "flow expired while payment was processing");
        return Err(AppError::MissingPrecondition { redirect: "/booking" });
    };

    let transaction_id = generate_transaction_id();
    flow.data.payment_method = submission.method();
    flow.data.confirmation = Some(ConfirmationRecord {
        booking_data: handoff.booking_data,
        payment_method: submission.method(),
        transaction_id: transaction_id.clone(),
    });
    flow.stage = FlowStage::Confirmed;
    flows::save(&state, &mut flow)?;

    tracing::info!(token = %flow.token, transaction_id = %transaction_id, "payment confirmed");

    Ok(Json(SubmitResponse {
        next: "/payment-success",
        transaction_id,
    }))
}
