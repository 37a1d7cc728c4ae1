use serde::{Deserialize, Serialize};

use super::booking::BookingForm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card Payment",
            PaymentMethod::Upi => "UPI Payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpiApp {
    Gpay,
    Phonepe,
    Paytm,
}

impl UpiApp {
    pub const ALL: [UpiApp; 3] = [UpiApp::Gpay, UpiApp::Phonepe, UpiApp::Paytm];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpiApp::Gpay => "gpay",
            UpiApp::Phonepe => "phonepe",
            UpiApp::Paytm => "paytm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UpiApp::Gpay => "Google Pay",
            UpiApp::Phonepe => "PhonePe",
            UpiApp::Paytm => "Paytm",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpiDetails {
    pub provider: Option<UpiApp>,
    pub upi_id: String,
}

/// Everything typed on the payment screen. Both variants are kept so that
/// switching methods never loses input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDraft {
    pub method: PaymentMethod,
    pub card: CardDetails,
    pub upi: UpiDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentSubmission {
    Card(CardDetails),
    Upi(UpiDetails),
}

impl PaymentSubmission {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentSubmission::Card(_) => PaymentMethod::Card,
            PaymentSubmission::Upi(_) => PaymentMethod::Upi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRecord {
    pub booking_data: BookingForm,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
}
