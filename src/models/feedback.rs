use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    #[default]
    General,
    Counselor,
    Website,
    Suggestion,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::General => "general",
            FeedbackCategory::Counselor => "counselor",
            FeedbackCategory::Website => "website",
            FeedbackCategory::Suggestion => "suggestion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackCategory::General => "General Experience",
            FeedbackCategory::Counselor => "Counselor Feedback",
            FeedbackCategory::Website => "Website Experience",
            FeedbackCategory::Suggestion => "Suggestions",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "counselor" => FeedbackCategory::Counselor,
            "website" => FeedbackCategory::Website,
            "suggestion" => FeedbackCategory::Suggestion,
            _ => FeedbackCategory::General,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub category: FeedbackCategory,
    pub rating: u8,
    pub anonymous: bool,
    pub created_at: String,
}

impl Feedback {
    pub fn display_name(&self) -> &str {
        if self.anonymous || self.name.trim().is_empty() {
            "Anonymous"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub message: String,
    pub category: FeedbackCategory,
    pub rating: u8,
    pub anonymous: bool,
}
