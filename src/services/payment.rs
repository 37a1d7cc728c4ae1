use std::time::Duration;

use async_trait::async_trait;

use crate::models::{PaymentDraft, PaymentMethod, PaymentSubmission};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges `amount` (in rupees). Returns once the charge is settled.
    async fn process(&self, submission: &PaymentSubmission, amount: u32) -> Result<(), PaymentError>;
}

/// Stands in for a gateway: waits for `delay`, then succeeds.
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn process(&self, submission: &PaymentSubmission, amount: u32) -> Result<(), PaymentError> {
        tracing::info!(
            method = submission.method().as_str(),
            amount,
            delay_ms = self.delay.as_millis() as u64,
            "simulating payment"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Picks the active method's fields out of the draft and checks them.
/// Fields of the inactive method are ignored.
pub fn validate_submission(draft: &PaymentDraft) -> Result<PaymentSubmission, String> {
    match draft.method {
        PaymentMethod::Card => {
            let card = &draft.card;
            let checks = [
                ("card number", &card.card_number, 19),
                ("expiry date", &card.expiry_date, 5),
                ("CVV", &card.cvv, 3),
                ("cardholder name", &card.cardholder_name, 100),
            ];
            for (label, value, max_len) in checks {
                let value = value.trim();
                if value.is_empty() {
                    return Err(format!("{label} is required"));
                }
                if value.chars().count() > max_len {
                    return Err(format!("{label} must be at most {max_len} characters"));
                }
            }
            if !is_valid_expiry(card.expiry_date.trim()) {
                return Err("expiry date must be in MM/YY format".to_string());
            }
            Ok(PaymentSubmission::Card(card.clone()))
        }
        PaymentMethod::Upi => {
            let upi_id = draft.upi.upi_id.trim();
            if !upi_id.is_empty() && !upi_id.contains('@') {
                return Err("UPI ID must look like yourname@upi".to_string());
            }
            Ok(PaymentSubmission::Upi(draft.upi.clone()))
        }
    }
}

/// `MM/YY` with a month between 01 and 12.
fn is_valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}

/// Opaque, client-facing transaction reference built from random bits.
/// Not a sequence and not guaranteed unique.
pub fn generate_transaction_id() -> String {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    let mut n = u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]);

    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::with_capacity(10);
    while out.len() < 10 {
        out.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    String::from_utf8_lossy(&out).into_owned()
}
