use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;

use crate::models::FlowStage;
use crate::services::coupons::{Coupon, COUPONS};
use crate::services::flows;
use crate::state::AppState;

use super::flow_token;

static HOME_HTML: &str = include_str!("../web/home.html");
static BOOKING_HTML: &str = include_str!("../web/booking.html");
static PAYMENT_HTML: &str = include_str!("../web/payment.html");
static PAYMENT_SUCCESS_HTML: &str = include_str!("../web/payment_success.html");
static COUPONS_HTML: &str = include_str!("../web/coupons.html");
static RESOURCES_HTML: &str = include_str!("../web/resources.html");
static FEEDBACK_HTML: &str = include_str!("../web/feedback.html");
static CONTACT_HTML: &str = include_str!("../web/contact.html");
static ADMIN_HTML: &str = include_str!("../web/admin.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME_HTML)
}

pub async fn booking() -> Html<&'static str> {
    Html(BOOKING_HTML)
}

fn flow_stage(state: &AppState, headers: &HeaderMap) -> Option<FlowStage> {
    let token = flow_token(headers);
    match flows::load(state, token.as_deref()) {
        Ok(flow) => flow.map(|f| f.stage),
        Err(e) => {
            tracing::error!(error = %e, "failed to load flow for page");
            None
        }
    }
}

// GET /payment: only reachable with a submitted booking
pub async fn payment(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match flow_stage(&state, &headers) {
        Some(FlowStage::AwaitingPayment | FlowStage::Processing) => Html(PAYMENT_HTML).into_response(),
        _ => Redirect::to("/booking").into_response(),
    }
}

// GET /payment-success: only reachable after a confirmed payment
pub async fn payment_success(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match flow_stage(&state, &headers) {
        Some(FlowStage::Confirmed) => Html(PAYMENT_SUCCESS_HTML).into_response(),
        _ => Redirect::to("/").into_response(),
    }
}

pub async fn coupons() -> Html<&'static str> {
    Html(COUPONS_HTML)
}

// GET /api/coupons
pub async fn coupon_list() -> Json<Vec<Coupon>> {
    Json(COUPONS.to_vec())
}

pub async fn resources() -> Html<&'static str> {
    Html(RESOURCES_HTML)
}

pub async fn feedback() -> Html<&'static str> {
    Html(FEEDBACK_HTML)
}

pub async fn contact() -> Html<&'static str> {
    Html(CONTACT_HTML)
}

pub async fn admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}
