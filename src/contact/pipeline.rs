use std::sync::Arc;

use chrono::Utc;

use crate::captcha::{CaptchaError, Verifier};
use crate::config::ContactConfig;
use crate::email::{templates, Mailer, OutgoingMail};
use crate::error::ContactError;
use crate::log_store::{LogRow, LogStore};

use super::validate;
use super::{ContactRequest, Submission};

/// What happened after the operator notification went out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub auto_replied: bool,
    pub logged: bool,
}

/// validate → verify → notify → auto-reply → log.
///
/// Validation and verification failures return before anything is sent.
/// Notification failure fails the request. Auto-reply and log failures only
/// show up in the [`Outcome`]; a failed auto-reply also sends the operator an
/// error notice when `error_notify` is on.
pub struct ContactPipeline {
    config: ContactConfig,
    verifier: Arc<dyn Verifier>,
    mailer: Arc<dyn Mailer>,
    log_store: Option<Arc<dyn LogStore>>,
}

impl ContactPipeline {
    pub fn new(
        config: ContactConfig,
        verifier: Arc<dyn Verifier>,
        mailer: Arc<dyn Mailer>,
        log_store: Option<Arc<dyn LogStore>>,
    ) -> Self {
        Self {
            config,
            verifier,
            mailer,
            log_store,
        }
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub async fn run(&self, request: ContactRequest) -> Result<Outcome, ContactError> {
        let received_at = Utc::now().with_timezone(&self.config.utc_offset);

        let submission = validate::validate(&request, received_at).inspect_err(|e| {
            tracing::info!("Submission rejected: {e}");
        })?;

        self.verifier
            .verify(&request.verification_token)
            .await
            .inspect_err(|e| match e {
                CaptchaError::Unavailable(reason) => {
                    tracing::warn!("Bot check unavailable: {reason}");
                }
                other => {
                    tracing::info!("Bot check failed: {other}");
                }
            })?;

        self.notify(&submission).await?;

        let auto_replied = self.auto_reply(&submission).await;
        let logged = self.append_log(&submission).await;

        tracing::info!(auto_replied, logged, "Submission handled");

        Ok(Outcome {
            auto_replied,
            logged,
        })
    }

    async fn notify(&self, submission: &Submission) -> Result<(), ContactError> {
        let mail = OutgoingMail {
            to: self.config.operator_email.clone(),
            subject: self.config.notification_subject.clone(),
            body: templates::render_notification(submission, &self.config.organization),
            no_reply: false,
        };

        if let Err(e) = self.mailer.send(mail).await {
            tracing::error!("Operator notification failed: {e}");
            if self.config.error_notify {
                self.send_error_notice(submission, &e.to_string()).await;
            }
            return Err(ContactError::Dispatch(e));
        }

        tracing::info!("Operator notification sent");
        Ok(())
    }

    async fn send_error_notice(&self, submission: &Submission, error: &str) {
        let mail = OutgoingMail {
            to: self.config.operator_email.clone(),
            subject: self.config.error_subject.clone(),
            body: templates::render_error_notice(submission, error),
            no_reply: false,
        };

        if let Err(e) = self.mailer.send(mail).await {
            tracing::error!("Error notice could not be delivered either: {e}");
        }
    }

    async fn auto_reply(&self, submission: &Submission) -> bool {
        let Some(email) = &submission.email else {
            return false;
        };

        let mail = OutgoingMail {
            to: email.clone(),
            subject: self.config.auto_reply_subject.clone(),
            body: templates::render_auto_reply(submission, &self.config.organization),
            no_reply: true,
        };

        match self.mailer.send(mail).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Auto-reply failed: {e}");
                if self.config.error_notify {
                    self.send_error_notice(submission, &e.to_string()).await;
                }
                false
            }
        }
    }

    async fn append_log(&self, submission: &Submission) -> bool {
        let Some(store) = &self.log_store else {
            return false;
        };

        match store.append(&LogRow::from(submission)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Submission log append failed: {e}");
                false
            }
        }
    }
}
