pub mod auth;
pub mod booking;
pub mod calendar;
pub mod coupons;
pub mod flows;
pub mod messaging;
pub mod payment;
