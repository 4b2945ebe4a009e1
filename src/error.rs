use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::captcha::CaptchaError;
use crate::contact::validate::ValidationError;
use crate::contact::ContactResponse;
use crate::email::MailError;

const MALFORMED_MESSAGE: &str = "The submission could not be read. Please reload the page and try again.";
const TOO_LARGE_MESSAGE: &str = "The submission is too large. Please shorten your message and try again.";
const DISPATCH_MESSAGE: &str = "Sending failed. Please try again later or contact us by phone.";

/// Terminal failure of a contact submission.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("malformed body: {0}")]
    Malformed(String),
    #[error("body exceeds the size limit")]
    TooLarge,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    BotCheck(#[from] CaptchaError),
    #[error("notification dispatch failed: {0}")]
    Dispatch(#[source] MailError),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::Malformed(_) | ContactError::Invalid(_) => StatusCode::BAD_REQUEST,
            ContactError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ContactError::BotCheck(_) => StatusCode::FORBIDDEN,
            ContactError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the submitter.
    pub fn user_message(&self) -> String {
        match self {
            ContactError::Malformed(_) => MALFORMED_MESSAGE.to_string(),
            ContactError::TooLarge => TOO_LARGE_MESSAGE.to_string(),
            ContactError::Invalid(e) => e.to_string(),
            ContactError::BotCheck(e) => e.user_message().to_string(),
            ContactError::Dispatch(_) => DISPATCH_MESSAGE.to_string(),
        }
    }
}

/// Body extraction failures still get a `{success, message}` reply.
impl From<BytesRejection> for ContactError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::info!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ContactError::TooLarge
        } else {
            ContactError::Malformed(rejection.body_text())
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let body = ContactResponse::rejected(self.user_message());
        (self.status(), Json(body)).into_response()
    }
}
