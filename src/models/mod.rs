pub mod booking;
pub mod feedback;
pub mod flow;
pub mod payment;

pub use booking::{BookingField, BookingForm, CurrentStatus, Language, Problem, SESSION_MINUTES, TIME_SLOTS};
pub use feedback::{Feedback, FeedbackCategory, NewFeedback};
pub use flow::{BookingHandoff, Flow, FlowData, FlowStage};
pub use payment::{
    CardDetails, ConfirmationRecord, PaymentDraft, PaymentMethod, PaymentSubmission, UpiApp,
    UpiDetails,
};
