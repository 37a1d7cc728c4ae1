pub mod admin;
pub mod booking;
pub mod confirmation;
pub mod contact;
pub mod feedback;
pub mod health;
pub mod pages;
pub mod payment;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::models::Flow;

pub const FLOW_COOKIE: &str = "hugs_flow";

/// Flow token from the request's `Cookie` header, if any.
pub fn flow_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLOW_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Attaches the flow cookie when the flow was started by this request.
pub fn with_flow_cookie(response: impl IntoResponse, flow: &Flow, created: bool) -> Response {
    let mut response = response.into_response();
    if created {
        let cookie = format!("{FLOW_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", flow.token);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "could not build flow cookie"),
        }
    }
    response
}
