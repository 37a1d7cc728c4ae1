use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use hugs::config::AppConfig;
use hugs::db;
use hugs::errors::AppError;
use hugs::models::PaymentSubmission;
use hugs::services::flows;
use hugs::services::messaging::MessagingProvider;
use hugs::services::payment::{PaymentError, PaymentProcessor};
use hugs::state::AppState;

// ── Mock Providers ──

struct MockProcessor {
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    delay: Duration,
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn process(&self, _submission: &PaymentSubmission, _amount: u32) -> Result<(), PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail.load(Ordering::SeqCst) {
            Err(PaymentError::Declined("card declined".to_string()))
        } else {
            Ok(())
        }
    }
}

struct MockMessaging {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl MessagingProvider for MockMessaging {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

// ── Helpers ──

struct Harness {
    app: Router,
    state: Arc<AppState>,
    payment_calls: Arc<AtomicUsize>,
    payment_fail: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_password_hash: bcrypt::hash("letmein", 4).unwrap(),
        session_secret: "test-secret".to_string(),
        counselor_whatsapp: "+1234567890".to_string(),
        counselor_phone: "+15559999999".to_string(),
        twilio_account_sid: "".to_string(),
        twilio_auth_token: "".to_string(),
        twilio_phone_number: "".to_string(),
        payment_delay_ms: 0,
        flow_ttl_minutes: 30,
        session_price: 100,
    }
}

fn harness_with_delay(delay: Duration) -> Harness {
    let conn = db::init_db(":memory:").unwrap();
    let payment_calls = Arc::new(AtomicUsize::new(0));
    let payment_fail = Arc::new(AtomicBool::new(false));
    let sent = Arc::new(Mutex::new(vec![]));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
        payments: Box::new(MockProcessor {
            calls: Arc::clone(&payment_calls),
            fail: Arc::clone(&payment_fail),
            delay,
        }),
        messaging: Box::new(MockMessaging {
            sent: Arc::clone(&sent),
        }),
    });

    Harness {
        app: hugs::router(Arc::clone(&state)),
        state,
        payment_calls,
        payment_fail,
        sent,
    }
}

fn harness() -> Harness {
    harness_with_delay(Duration::from_millis(0))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

/// Starts a flow and returns the `name=value` cookie pair for it.
async fn start_flow(app: &Router) -> String {
    let (status, headers, _) = send(app, get("/api/booking/draft", None)).await;
    assert_eq!(status, StatusCode::OK);
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("new flow should set a cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

fn tomorrow() -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

fn complete_booking() -> serde_json::Value {
    serde_json::json!({
        "name": "Asha Rao",
        "phone": "9876543210",
        "email": "asha@example.com",
        "language": "hindi",
        "problem": "academic",
        "currentStatus": "student",
        "date": tomorrow(),
        "time": "02:00 PM",
        "couponCode": "STUDENT20",
    })
}

fn card_payment() -> serde_json::Value {
    serde_json::json!({
        "method": "card",
        "card": {
            "cardNumber": "4111 1111 1111 1111",
            "expiryDate": "12/29",
            "cvv": "123",
            "cardholderName": "Asha Rao",
        },
    })
}

/// Runs the booking step with STUDENT20 applied and returns the flow cookie.
async fn booked_flow(app: &Router) -> String {
    let cookie = start_flow(app).await;
    let (status, _, json) = send(
        app,
        post_json("/api/booking/coupon", Some(&cookie), serde_json::json!({"code": "STUDENT20"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discount"], 20);

    let (status, _, json) = send(
        app,
        post_json("/api/booking/submit", Some(&cookie), complete_booking()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {json}");
    assert_eq!(json["next"], "/payment");
    cookie
}

fn location(headers: &HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// ── Pages ──

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, _, json) = send(&h.app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_booking_page_serves_html() {
    let h = harness();
    let res = h.app.clone().oneshot(get("/booking", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("<!DOCTYPE html>"));
    assert!(text.contains("Book Your Session"));
}

#[tokio::test]
async fn test_payment_page_without_booking_redirects() {
    let h = harness();
    let (status, headers, _) = send(&h.app, get("/payment", None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/booking");

    // A flow that never submitted the booking form is not enough
    let cookie = start_flow(&h.app).await;
    let (status, headers, _) = send(&h.app, get("/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/booking");
}

#[tokio::test]
async fn test_confirmation_page_without_payment_redirects_home() {
    let h = harness();
    let (status, headers, _) = send(&h.app, get("/payment-success", None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");

    let cookie = booked_flow(&h.app).await;
    let (status, headers, _) = send(&h.app, get("/payment-success", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn test_api_without_payload_points_at_redirect() {
    let h = harness();
    let (status, _, json) = send(&h.app, get("/api/payment", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["redirect"], "/booking");

    let (status, _, json) = send(&h.app, get("/api/confirmation", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["redirect"], "/");

    let (status, _, json) = send(&h.app, post_json("/api/payment/submit", None, card_payment())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["redirect"], "/booking");
}

// ── Booking ──

#[tokio::test]
async fn test_booking_options() {
    let h = harness();
    let (status, _, json) = send(&h.app, get("/api/booking/options", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timeSlots"].as_array().unwrap().len(), 6);
    assert_eq!(json["languages"].as_array().unwrap().len(), 5);
    assert_eq!(json["problems"][0]["label"], "Academic Stress");
    assert_eq!(json["statuses"].as_array().unwrap().len(), 4);
    assert_eq!(json["sessionPrice"], 100);
}

#[tokio::test]
async fn test_input_rejects_bad_characters() {
    let h = harness();
    let cookie = start_flow(&h.app).await;

    let (_, _, json) = send(
        &h.app,
        post_json("/api/booking/input", Some(&cookie), serde_json::json!({"field": "name", "value": "Asha"})),
    )
    .await;
    assert_eq!(json["accepted"], true);

    let (status, _, json) = send(
        &h.app,
        post_json("/api/booking/input", Some(&cookie), serde_json::json!({"field": "name", "value": "Asha1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["accepted"], false);
    assert_eq!(json["draft"]["name"], "Asha");

    let (_, _, json) = send(
        &h.app,
        post_json("/api/booking/input", Some(&cookie), serde_json::json!({"field": "phone", "value": "98a"})),
    )
    .await;
    assert_eq!(json["accepted"], false);
    assert_eq!(json["draft"]["phone"], "");
}

#[tokio::test]
async fn test_input_unknown_field() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        post_json("/api/booking/input", None, serde_json::json!({"field": "age", "value": "30"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_coupon_valid_then_invalid_resets() {
    let h = harness();
    let cookie = start_flow(&h.app).await;

    for (code, expected) in [("NEW10", 10), ("SPECIAL25", 25), ("STUDENT20", 20), ("STUDENT20", 20), ("nope", 0)] {
        let (status, _, json) = send(
            &h.app,
            post_json("/api/booking/coupon", Some(&cookie), serde_json::json!({"code": code})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["discount"], expected, "code {code}");
    }
}

#[tokio::test]
async fn test_coupon_applies_typed_code_without_body() {
    let h = harness();
    let cookie = start_flow(&h.app).await;
    send(
        &h.app,
        post_json("/api/booking/input", Some(&cookie), serde_json::json!({"field": "couponCode", "value": "NEW10"})),
    )
    .await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/booking/coupon")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, json) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["discount"], 10);
}

#[tokio::test]
async fn test_submit_missing_required_field_stays_on_booking() {
    let h = harness();
    let cookie = start_flow(&h.app).await;

    let mut booking = complete_booking();
    booking["phone"] = serde_json::json!("");
    let (status, _, json) = send(&h.app, post_json("/api/booking/submit", Some(&cookie), booking)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "phone is required");

    let (status, _, _) = send(&h.app, get("/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_submit_rejects_past_date() {
    let h = harness();
    let cookie = start_flow(&h.app).await;

    let mut booking = complete_booking();
    booking["date"] = serde_json::json!("2020-01-01");
    let (status, _, json) = send(&h.app, post_json("/api/booking/submit", Some(&cookie), booking)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "date cannot be in the past");
}

#[tokio::test]
async fn test_submit_hands_exact_values_and_discount_to_payment() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;

    let (status, _, _) = send(&h.app, get("/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["bookingData"], complete_booking());
    assert_eq!(json["discount"], 20);
    assert_eq!(json["pricing"]["base"], 100);
    assert_eq!(json["pricing"]["total"], 80);
    assert_eq!(json["method"], "card");
    assert_eq!(json["upiApps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_handoff_uses_last_applied_discount_not_typed_code() {
    let h = harness();
    let cookie = start_flow(&h.app).await;

    // SPECIAL25 typed into the form but never applied
    let mut booking = complete_booking();
    booking["couponCode"] = serde_json::json!("SPECIAL25");
    let (status, _, _) = send(&h.app, post_json("/api/booking/submit", Some(&cookie), booking)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(json["discount"], 0);
    assert_eq!(json["pricing"]["total"], 100);
}

// ── Payment ──

#[tokio::test]
async fn test_card_payment_reaches_confirmation() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;

    let (status, _, json) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;
    assert_eq!(status, StatusCode::OK, "payment failed: {json}");
    assert_eq!(json["next"], "/payment-success");
    let txn = json["transactionId"].as_str().unwrap().to_string();
    assert!(!txn.is_empty());
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 1);

    let (status, _, _) = send(&h.app, get("/payment-success", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, json) = send(&h.app, get("/api/confirmation", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["bookingData"], complete_booking());
    assert_eq!(json["paymentMethod"], "card");
    assert_eq!(json["paymentMethodLabel"], "Card Payment");
    assert_eq!(json["transactionId"], txn.as_str());
    let contact = json["contactUrl"].as_str().unwrap();
    assert!(contact.starts_with("https://wa.me/1234567890?text="));
    assert!(contact.contains(&txn));

    // The payment screen is closed once paid
    let (status, _, _) = send(&h.app, get("/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_confirmation_calendar_download() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;
    send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;

    let res = h
        .app
        .clone()
        .oneshot(get("/payment-success/calendar.ics", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/calendar; charset=utf-8"
    );
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let date = tomorrow().replace('-', "");
    assert!(text.contains(&format!("DTSTART:{date}T140000")));
    assert!(text.contains(&format!("DTEND:{date}T150000")));
}

#[tokio::test]
async fn test_card_validation_keeps_payment_open() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;

    let mut payment = card_payment();
    payment["card"]["cvv"] = serde_json::json!("");
    let (status, _, json) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), payment)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "CVV is required");
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 0);

    let (status, _, _) = send(&h.app, get("/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_payment_notifies_and_stays() {
    let h = harness();
    h.payment_fail.store(true, Ordering::SeqCst);
    let cookie = booked_flow(&h.app).await;

    let (status, _, json) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["error"], "Payment failed. Please try again.");

    let (status, _, _) = send(&h.app, get("/payment-success", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    // The booking is still payable, no retry was made on our side
    let (status, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["processing"], false);
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 1);

    h.payment_fail.store(false, Ordering::SeqCst);
    let (status, _, _) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_double_submit_processes_once() {
    let h = harness_with_delay(Duration::from_millis(50));
    let cookie = booked_flow(&h.app).await;

    let (first, second) = tokio::join!(
        send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())),
        send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 1);

    // And again after it settled
    let (status, _, _) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stale_flow_save_cannot_reopen_payment() {
    let h = harness_with_delay(Duration::from_millis(50));
    let cookie = booked_flow(&h.app).await;
    let token = cookie.split_once('=').unwrap().1.to_string();

    // Read by another request before the payment starts
    let mut stale = flows::load(&h.state, Some(token.as_str()))
        .unwrap()
        .unwrap();
    assert_eq!(stale.stage, hugs::models::FlowStage::AwaitingPayment);

    let (first, (stale_save, second)) = tokio::join!(
        send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            stale.data.discount = 25;
            let saved = flows::save(&h.state, &mut stale);
            let second = send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;
            (saved, second)
        },
    );

    assert!(matches!(stale_save, Err(AppError::Conflict(_))));
    assert_eq!(second.0, StatusCode::CONFLICT);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(h.payment_calls.load(Ordering::SeqCst), 1);

    let (_, _, json) = send(&h.app, get("/api/confirmation", Some(&cookie))).await;
    assert_eq!(json["transactionId"], first.2["transactionId"]);
}

#[tokio::test]
async fn test_upi_payment_with_provider_shortcut() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;

    let (status, _, json) = send(
        &h.app,
        post_json("/api/payment/upi-app", Some(&cookie), serde_json::json!({"provider": "phonepe"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["notice"], "Redirecting to PhonePe...");

    let (_, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(json["method"], "upi");
    assert_eq!(json["upiProvider"], "phonepe");

    // Half-filled card details are ignored for UPI
    let payment = serde_json::json!({
        "method": "upi",
        "card": {"cardNumber": "4111"},
        "upi": {"upiId": "asha@okbank"},
    });
    let (status, _, _) = send(&h.app, post_json("/api/payment/submit", Some(&cookie), payment)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, json) = send(&h.app, get("/api/confirmation", Some(&cookie))).await;
    assert_eq!(json["paymentMethod"], "upi");
    assert_eq!(json["paymentMethodLabel"], "UPI Payment");
}

#[tokio::test]
async fn test_switching_method_is_remembered() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;

    let (status, _, _) = send(
        &h.app,
        post_json("/api/payment/method", Some(&cookie), serde_json::json!({"method": "upi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(json["method"], "upi");

    send(
        &h.app,
        post_json("/api/payment/method", Some(&cookie), serde_json::json!({"method": "card"})),
    )
    .await;
    let (_, _, json) = send(&h.app, get("/api/payment", Some(&cookie))).await;
    assert_eq!(json["method"], "card");
}

#[tokio::test]
async fn test_restart_after_confirmation_prefills_booking() {
    let h = harness();
    let cookie = booked_flow(&h.app).await;
    send(&h.app, post_json("/api/payment/submit", Some(&cookie), card_payment())).await;

    let (status, headers, json) = send(&h.app, get("/api/booking/draft", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert_eq!(json["draft"], complete_booking());

    let (status, headers, _) = send(&h.app, get("/payment-success", Some(&cookie))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/");
}

// ── Feedback ──

#[tokio::test]
async fn test_feedback_submit_and_list() {
    let h = harness();

    let (status, _, json) = send(
        &h.app,
        post_json(
            "/api/feedback",
            None,
            serde_json::json!({"name": "Ravi", "message": "Really helped", "rating": 5, "category": "counselor"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["displayName"], "Ravi");
    assert_eq!(json["categoryLabel"], "Counselor Feedback");

    send(
        &h.app,
        post_json(
            "/api/feedback",
            None,
            serde_json::json!({"name": "Hidden", "message": "Good", "anonymous": true}),
        ),
    )
    .await;

    let (_, _, json) = send(&h.app, get("/api/feedback", None)).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["displayName"], "Anonymous");
    assert_eq!(list[0]["category"], "general");
    assert_eq!(list[1]["rating"], 5);
}

#[tokio::test]
async fn test_feedback_requires_message() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        post_json("/api/feedback", None, serde_json::json!({"message": "   ", "rating": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) = send(
        &h.app,
        post_json("/api/feedback", None, serde_json::json!({"message": "ok", "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Contact ──

#[tokio::test]
async fn test_contact_forwards_to_counselor() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        post_json(
            "/api/contact",
            None,
            serde_json::json!({"name": "Asha", "email": "asha@example.com", "subject": "Rescheduling", "message": "Can we move to Friday?"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sent = h.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15559999999");
    assert!(sent[0].1.contains("Rescheduling"));
    assert!(sent[0].1.contains("asha@example.com"));
}

#[tokio::test]
async fn test_contact_requires_all_fields() {
    let h = harness();
    let (status, _, json) = send(
        &h.app,
        post_json(
            "/api/contact",
            None,
            serde_json::json!({"name": "Asha", "email": "", "subject": "Hi", "message": "Hello"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "email is required");
    assert!(h.sent.lock().unwrap().is_empty());
}

// ── Admin ──

async fn admin_token(app: &Router) -> String {
    let (status, _, json) = send(
        app,
        post_json("/api/admin/login", None, serde_json::json!({"password": "letmein"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_admin_login_wrong_password() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        post_json("/api/admin/login", None, serde_json::json!({"password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_requires_auth() {
    let h = harness();
    let (status, _, _) = send(&h.app, get("/api/admin/status", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&h.app, authed("GET", "/api/admin/status", "123.forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_status_and_feedback_moderation() {
    let h = harness();
    start_flow(&h.app).await;
    let (_, _, entry) = send(
        &h.app,
        post_json("/api/feedback", None, serde_json::json!({"message": "spam spam"})),
    )
    .await;
    let id = entry["id"].as_i64().unwrap();

    let token = admin_token(&h.app).await;

    let (status, _, json) = send(&h.app, authed("GET", "/api/admin/status", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_flows"], 1);
    assert_eq!(json["feedback_count"], 1);

    let (status, _, json) = send(&h.app, authed("GET", "/api/admin/feedback", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["message"], "spam spam");

    let uri = format!("/api/admin/feedback/{id}");
    let (status, _, _) = send(&h.app, authed("DELETE", &uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&h.app, authed("DELETE", &uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_coupon_list() {
    let h = harness();
    let (status, _, json) = send(&h.app, get("/api/coupons", None)).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["STUDENT20", "NEW10", "SPECIAL25"]);
}
