use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::booking::BookingForm;
use super::payment::{ConfirmationRecord, PaymentMethod, UpiApp};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Draft,
    AwaitingPayment,
    Processing,
    Confirmed,
}

impl FlowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStage::Draft => "draft",
            FlowStage::AwaitingPayment => "awaiting_payment",
            FlowStage::Processing => "processing",
            FlowStage::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "awaiting_payment" => FlowStage::AwaitingPayment,
            "processing" => FlowStage::Processing,
            "confirmed" => FlowStage::Confirmed,
            _ => FlowStage::Draft,
        }
    }
}

/// What the booking step passes to the payment step. Frozen at submission:
/// later edits to the draft don't change it until the form is submitted again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHandoff {
    pub booking_data: BookingForm,
    pub discount: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowData {
    pub draft: BookingForm,
    pub discount: u32,
    /// Set when the booking form is submitted; read by the payment step.
    pub handoff: Option<BookingHandoff>,
    /// Card details are never stored; only the choices made on the
    /// payment screen are.
    pub payment_method: PaymentMethod,
    pub upi_provider: Option<UpiApp>,
    /// Set once payment succeeds; read by the confirmation step.
    pub confirmation: Option<ConfirmationRecord>,
}

#[derive(Debug, Clone)]
pub struct Flow {
    pub token: String,
    pub stage: FlowStage,
    pub data: FlowData,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    /// Stage as last read from or written to the store. `None` until the
    /// flow has been saved once.
    pub stored_stage: Option<FlowStage>,
}
