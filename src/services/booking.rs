use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{BookingField, BookingForm, CurrentStatus, Language, Problem, TIME_SLOTS};
use crate::services::coupons;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("date must be in YYYY-MM-DD format")]
    InvalidDate,

    #[error("date cannot be in the past")]
    DateInPast,

    #[error("time must be one of the listed slots")]
    InvalidTime,
}

/// The booking form being filled in, plus the discount from the last
/// explicit coupon apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub form: BookingForm,
    pub discount: u32,
}

impl BookingDraft {
    pub fn new(form: BookingForm, discount: u32) -> Self {
        Self { form, discount }
    }

    /// Replaces one field if the new value passes that field's check.
    /// A rejected value leaves the draft untouched.
    pub fn apply_input(&mut self, field: BookingField, value: &str) -> bool {
        if !accepts(field, value) {
            tracing::debug!(field = field.as_str(), "input rejected");
            return false;
        }

        let slot = match field {
            BookingField::Name => &mut self.form.name,
            BookingField::Phone => &mut self.form.phone,
            BookingField::Email => &mut self.form.email,
            BookingField::Language => &mut self.form.language,
            BookingField::Problem => &mut self.form.problem,
            BookingField::CurrentStatus => &mut self.form.current_status,
            BookingField::Date => &mut self.form.date,
            BookingField::Time => &mut self.form.time,
            BookingField::CouponCode => &mut self.form.coupon_code,
        };
        *slot = value.to_string();
        true
    }

    /// Feeds every field of `form` through `apply_input`.
    /// Returns the fields whose values were discarded.
    pub fn merge(&mut self, form: &BookingForm) -> Vec<BookingField> {
        let incoming = [
            (BookingField::Name, &form.name),
            (BookingField::Phone, &form.phone),
            (BookingField::Email, &form.email),
            (BookingField::Language, &form.language),
            (BookingField::Problem, &form.problem),
            (BookingField::CurrentStatus, &form.current_status),
            (BookingField::Date, &form.date),
            (BookingField::Time, &form.time),
            (BookingField::CouponCode, &form.coupon_code),
        ];

        incoming
            .into_iter()
            .filter(|(field, value)| !self.apply_input(*field, value))
            .map(|(field, _)| field)
            .collect()
    }

    /// Looks the current coupon code up in the coupon table. A miss clears
    /// any earlier discount.
    pub fn apply_coupon(&mut self) -> u32 {
        self.discount = coupons::discount_for(&self.form.coupon_code);
        self.discount
    }

    /// Checks required fields and the date, returning the record to hand
    /// to the payment step.
    pub fn submit(&self, today: NaiveDate) -> Result<BookingForm, BookingError> {
        let required = [
            ("name", &self.form.name),
            ("phone", &self.form.phone),
            ("date", &self.form.date),
            ("time", &self.form.time),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(BookingError::MissingField(label));
            }
        }

        let date = parse_date(&self.form.date).ok_or(BookingError::InvalidDate)?;
        if date < today {
            return Err(BookingError::DateInPast);
        }
        if !TIME_SLOTS.contains(&self.form.time.as_str()) {
            return Err(BookingError::InvalidTime);
        }

        Ok(self.form.clone())
    }
}

fn accepts(field: BookingField, value: &str) -> bool {
    match field {
        BookingField::Name => value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()),
        BookingField::Phone => value.chars().all(|c| c.is_ascii_digit()),
        BookingField::Email | BookingField::CouponCode => true,
        BookingField::Language => value.is_empty() || Language::parse(value).is_some(),
        BookingField::Problem => value.is_empty() || Problem::parse(value).is_some(),
        BookingField::CurrentStatus => value.is_empty() || CurrentStatus::parse(value).is_some(),
        BookingField::Date => value.is_empty() || parse_date(value).is_some(),
        BookingField::Time => value.is_empty() || TIME_SLOTS.contains(&value),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Start of the booked session, e.g. `2025-06-16` + `02:00 PM`.
pub fn session_start(booking: &BookingForm) -> Option<NaiveDateTime> {
    let date = parse_date(&booking.date)?;
    let time = NaiveTime::parse_from_str(&booking.time, "%I:%M %p").ok()?;
    Some(date.and_time(time))
}
