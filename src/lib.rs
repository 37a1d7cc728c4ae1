pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Pages
        .route("/", get(handlers::pages::home))
        .route("/booking", get(handlers::pages::booking))
        .route("/payment", get(handlers::pages::payment))
        .route("/payment-success", get(handlers::pages::payment_success))
        .route(
            "/payment-success/calendar.ics",
            get(handlers::confirmation::download_ics),
        )
        .route("/coupons", get(handlers::pages::coupons))
        .route("/resources", get(handlers::pages::resources))
        .route("/feedback", get(handlers::pages::feedback))
        .route("/contact", get(handlers::pages::contact))
        .route("/admin", get(handlers::pages::admin))
        // Booking flow
        .route("/api/booking/options", get(handlers::booking::options))
        .route("/api/booking/draft", get(handlers::booking::get_draft))
        .route("/api/booking/input", post(handlers::booking::post_input))
        .route("/api/booking/coupon", post(handlers::booking::post_coupon))
        .route("/api/booking/submit", post(handlers::booking::post_submit))
        .route("/api/payment", get(handlers::payment::get_payment))
        .route("/api/payment/method", post(handlers::payment::post_method))
        .route("/api/payment/upi-app", post(handlers::payment::post_upi_app))
        .route("/api/payment/submit", post(handlers::payment::post_submit))
        .route(
            "/api/confirmation",
            get(handlers::confirmation::get_confirmation),
        )
        // Everything else
        .route("/api/coupons", get(handlers::pages::coupon_list))
        .route(
            "/api/feedback",
            get(handlers::feedback::list).post(handlers::feedback::submit),
        )
        .route("/api/contact", post(handlers::contact::send_message))
        .route("/api/admin/login", post(handlers::admin::login))
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/api/admin/feedback", get(handlers::admin::get_feedback))
        .route(
            "/api/admin/feedback/:id",
            delete(handlers::admin::delete_feedback),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
