pub mod parser;
pub mod pipeline;
pub mod validate;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Raw intake body as posted by the landing page.
///
/// Missing fields deserialize to empty strings so the validator can report
/// them together instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub situation: String,
    pub message: String,
    #[serde(
        rename = "verificationToken",
        alias = "recaptchaToken",
        alias = "g-recaptcha-response"
    )]
    pub verification_token: String,
}

/// A validated contact submission. Built once per request, never mutated.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub situation: String,
    pub message: String,
    pub received_at: DateTime<FixedOffset>,
}

impl Submission {
    pub fn received_at_display(&self) -> String {
        self.received_at.format("%Y/%m/%d %H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
