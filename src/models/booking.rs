use serde::{Deserialize, Serialize};

/// Length of every counseling session.
pub const SESSION_MINUTES: i64 = 60;

pub const TIME_SLOTS: [&str; 6] = [
    "09:00 AM", "10:00 AM", "11:00 AM", "02:00 PM", "03:00 PM", "04:00 PM",
];

/// The booking record as the client fills it in. Select fields hold the
/// option value or an empty string when nothing has been chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub language: String,
    pub problem: String,
    pub current_status: String,
    pub date: String,
    pub time: String,
    pub coupon_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    Name,
    Phone,
    Email,
    Language,
    Problem,
    CurrentStatus,
    Date,
    Time,
    CouponCode,
}

impl BookingField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(BookingField::Name),
            "phone" => Some(BookingField::Phone),
            "email" => Some(BookingField::Email),
            "language" => Some(BookingField::Language),
            "problem" => Some(BookingField::Problem),
            "currentStatus" => Some(BookingField::CurrentStatus),
            "date" => Some(BookingField::Date),
            "time" => Some(BookingField::Time),
            "couponCode" => Some(BookingField::CouponCode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::Phone => "phone",
            BookingField::Email => "email",
            BookingField::Language => "language",
            BookingField::Problem => "problem",
            BookingField::CurrentStatus => "currentStatus",
            BookingField::Date => "date",
            BookingField::Time => "time",
            BookingField::CouponCode => "couponCode",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
    Mandarin,
    Hindi,
    French,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Spanish,
        Language::Mandarin,
        Language::Hindi,
        Language::French,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::Mandarin => "mandarin",
            Language::Hindi => "hindi",
            Language::French => "french",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Mandarin => "Mandarin",
            Language::Hindi => "Hindi",
            Language::French => "French",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Academic,
    Anxiety,
    Depression,
    Relationships,
    Career,
    Other,
}

impl Problem {
    pub const ALL: [Problem; 6] = [
        Problem::Academic,
        Problem::Anxiety,
        Problem::Depression,
        Problem::Relationships,
        Problem::Career,
        Problem::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Problem::Academic => "academic",
            Problem::Anxiety => "anxiety",
            Problem::Depression => "depression",
            Problem::Relationships => "relationships",
            Problem::Career => "career",
            Problem::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Problem::Academic => "Academic Stress",
            Problem::Anxiety => "Anxiety",
            Problem::Depression => "Depression",
            Problem::Relationships => "Relationship Issues",
            Problem::Career => "Career Guidance",
            Problem::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentStatus {
    Student,
    Employed,
    Unemployed,
    Other,
}

impl CurrentStatus {
    pub const ALL: [CurrentStatus; 4] = [
        CurrentStatus::Student,
        CurrentStatus::Employed,
        CurrentStatus::Unemployed,
        CurrentStatus::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentStatus::Student => "student",
            CurrentStatus::Employed => "employed",
            CurrentStatus::Unemployed => "unemployed",
            CurrentStatus::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CurrentStatus::Student => "Student",
            CurrentStatus::Employed => "Employed",
            CurrentStatus::Unemployed => "Unemployed",
            CurrentStatus::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

pub fn language_options() -> Vec<SelectOption> {
    Language::ALL
        .iter()
        .map(|l| SelectOption { value: l.as_str(), label: l.label() })
        .collect()
}

pub fn problem_options() -> Vec<SelectOption> {
    Problem::ALL
        .iter()
        .map(|p| SelectOption { value: p.as_str(), label: p.label() })
        .collect()
}

pub fn status_options() -> Vec<SelectOption> {
    CurrentStatus::ALL
        .iter()
        .map(|c| SelectOption { value: c.as_str(), label: c.label() })
        .collect()
}
