#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use contact_relay::captcha::{CaptchaError, Verifier};
use contact_relay::config::{ContactConfig, Organization};
use contact_relay::contact::pipeline::ContactPipeline;
use contact_relay::email::{MailError, Mailer, OutgoingMail};
use contact_relay::log_store::{LogRow, LogStore, LogStoreError};
use contact_relay::state::AppState;
use contact_relay::HttpSettings;

pub const OPERATOR: &str = "operator@example.org";
pub const NOTIFICATION_SUBJECT: &str = "New inquiry";
pub const AUTO_REPLY_SUBJECT: &str = "Thanks for your inquiry";
pub const ERROR_SUBJECT: &str = "Notification error";
pub const CONFIRMATION: &str = "Thank you. We will be in touch soon.";
pub const VALID_TOKEN: &str = "valid";

/// Records every send attempt; fails attempts whose subject is listed.
#[derive(Default)]
pub struct RecordingMailer {
    attempts: Mutex<Vec<OutgoingMail>>,
    sent: Mutex<Vec<OutgoingMail>>,
    failing_subjects: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_on(subjects: &[&str]) -> Self {
        Self {
            failing_subjects: subjects.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<OutgoingMail> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.attempts.lock().unwrap().push(mail.clone());
        if self.failing_subjects.contains(&mail.subject) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Accepts exactly `VALID_TOKEN`.
#[derive(Default)]
pub struct StaticVerifier {
    calls: AtomicUsize,
}

impl StaticVerifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<(), CaptchaError> {
        if token.trim().is_empty() {
            return Err(CaptchaError::MissingToken);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == VALID_TOKEN {
            Ok(())
        } else {
            Err(CaptchaError::Rejected(vec!["invalid-input-response".to_string()]))
        }
    }
}

#[derive(Default)]
pub struct MemoryLogStore {
    rows: Mutex<Vec<LogRow>>,
    fail: bool,
}

impl MemoryLogStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<LogRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, row: &LogRow) -> Result<(), LogStoreError> {
        if self.fail {
            return Err(LogStoreError::Task("sheet unavailable".to_string()));
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

pub fn contact_config() -> ContactConfig {
    ContactConfig {
        operator_email: OPERATOR.to_string(),
        notification_subject: NOTIFICATION_SUBJECT.to_string(),
        auto_reply_subject: AUTO_REPLY_SUBJECT.to_string(),
        error_subject: ERROR_SUBJECT.to_string(),
        error_notify: true,
        confirmation_message: CONFIRMATION.to_string(),
        utc_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        organization: Organization {
            name: "Example Support Center".to_string(),
            phone: "099-000-0000".to_string(),
            address: vec!["1-2-3 Example Street".to_string()],
            reply_within: "two business days".to_string(),
        },
    }
}

/// Builder for a test app with swappable collaborators.
pub struct TestAppBuilder {
    config: ContactConfig,
    mailer: Arc<RecordingMailer>,
    log_store: Option<Arc<MemoryLogStore>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: contact_config(),
            mailer: Arc::new(RecordingMailer::default()),
            log_store: Some(Arc::new(MemoryLogStore::default())),
        }
    }

    pub fn mailer(mut self, mailer: RecordingMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn log_store(mut self, store: Option<MemoryLogStore>) -> Self {
        self.log_store = store.map(Arc::new);
        self
    }

    pub fn config(mut self, f: impl FnOnce(&mut ContactConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn pipeline(&self, verifier: Arc<StaticVerifier>) -> ContactPipeline {
        ContactPipeline::new(
            self.config.clone(),
            verifier,
            self.mailer.clone(),
            self.log_store
                .clone()
                .map(|store| store as Arc<dyn LogStore>),
        )
    }

    pub async fn spawn(self) -> TestApp {
        let verifier = Arc::new(StaticVerifier::default());
        let pipeline = self.pipeline(verifier.clone());

        let settings = HttpSettings {
            cors_origins: vec![],
            max_body_size: 16 * 1024,
        };
        let app = contact_relay::build_router(Arc::new(AppState { pipeline }), &settings);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        TestApp {
            addr,
            client: Client::new(),
            mailer: self.mailer,
            verifier,
            log_store: self.log_store,
        }
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub client: Client,
    pub mailer: Arc<RecordingMailer>,
    pub verifier: Arc<StaticVerifier>,
    pub log_store: Option<Arc<MemoryLogStore>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON body to the intake route, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub fn log_rows(&self) -> Vec<LogRow> {
        self.log_store
            .as_ref()
            .map(|store| store.rows())
            .unwrap_or_default()
    }
}

pub async fn spawn_app() -> TestApp {
    TestAppBuilder::new().spawn().await
}

/// The reference submission: a valid request that includes an email address.
pub fn taro() -> Value {
    json!({
        "name": "Taro",
        "phone": "090-1234-5678",
        "email": "taro@example.com",
        "situation": "employed",
        "message": "hello",
        "verificationToken": VALID_TOKEN,
    })
}
