use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use super::{ContactRequest, Submission};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-()\s]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Rejections are shown to the submitter verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Phone number may only contain digits, hyphens, plus signs, parentheses and spaces.")]
    InvalidPhone,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Check required fields, then phone, then email. Values are trimmed.
pub fn validate(
    request: &ContactRequest,
    received_at: DateTime<FixedOffset>,
) -> Result<Submission, ValidationError> {
    let name = request.name.trim();
    let phone = request.phone.trim();
    let situation = request.situation.trim();
    let message = request.message.trim();

    let missing: Vec<&'static str> = [
        ("name", name),
        ("phone", phone),
        ("situation", situation),
        ("message", message),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !is_valid_phone(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    if let Some(email) = email {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }

    Ok(Submission {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.map(str::to_string),
        situation: situation.to_string(),
        message: message.to_string(),
        received_at,
    })
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
