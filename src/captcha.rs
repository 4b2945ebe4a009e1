use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::CaptchaConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptchaError {
    #[error("verification token missing")]
    MissingToken,
    #[error("verification rejected: [{}]", .0.join(", "))]
    Rejected(Vec<String>),
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

impl CaptchaError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptchaError::MissingToken => "Please complete the CAPTCHA challenge.",
            CaptchaError::Rejected(_) | CaptchaError::Unavailable(_) => {
                "CAPTCHA verification failed. Please try again."
            }
        }
    }
}

/// Bot check. Implementations must fail closed.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<(), CaptchaError>;
}

/// Verifier speaking the reCAPTCHA `siteverify` protocol.
pub struct SiteVerifier {
    client: reqwest::Client,
    secret: SecretString,
    verify_url: String,
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl SiteVerifier {
    pub fn new(config: CaptchaConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("Failed to build verification client: {e}"))?;

        Ok(Self {
            client,
            secret: config.secret,
            verify_url: config.verify_url,
        })
    }
}

#[async_trait]
impl Verifier for SiteVerifier {
    async fn verify(&self, token: &str) -> Result<(), CaptchaError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CaptchaError::MissingToken);
        }

        let resp = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.expose_secret()), ("response", token)])
            .send()
            .await
            .map_err(|e| CaptchaError::Unavailable(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CaptchaError::Unavailable(format!(
                "verification endpoint returned {status}"
            )));
        }

        let body: SiteVerifyResponse = resp
            .json()
            .await
            .map_err(|e| CaptchaError::Unavailable(format!("invalid response: {e}")))?;

        if body.success {
            Ok(())
        } else {
            Err(CaptchaError::Rejected(body.error_codes))
        }
    }
}
