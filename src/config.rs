use std::net::IpAddr;
use std::time::Duration;

use chrono::FixedOffset;
use secrecy::SecretString;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub cors_origins: Vec<String>,
    pub contact: ContactConfig,
    pub captcha: CaptchaConfig,
    pub smtp: SmtpConfig,
    pub log_path: Option<String>,
}

/// Everything the pipeline needs to address and word its messages.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub operator_email: String,
    pub notification_subject: String,
    pub auto_reply_subject: String,
    pub error_subject: String,
    pub error_notify: bool,
    pub confirmation_message: String,
    pub utc_offset: FixedOffset,
    pub organization: Organization,
}

#[derive(Debug, Clone, Default)]
pub struct Organization {
    pub name: String,
    pub phone: String,
    pub address: Vec<String>,
    pub reply_within: String,
}

#[derive(Debug)]
pub struct CaptchaConfig {
    pub secret: SecretString,
    pub verify_url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: SecretString,
    pub from: String,
    pub no_reply_from: Option<String>,
    pub tls: TlsMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    StartTls,
    Tls,
    None,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("CONTACT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_HOST: {e}"))?;

        let port: u16 = env_or("CONTACT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_PORT: {e}"))?;

        let log_level = env_or("CONTACT_LOG_LEVEL", "info");

        let max_body_size: usize = env_or("CONTACT_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_MAX_BODY_SIZE: {e}"))?;

        let cors_origins: Vec<String> = env_or("CONTACT_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let contact = ContactConfig {
            operator_email: env_required("CONTACT_OPERATOR_EMAIL")?,
            notification_subject: env_or(
                "CONTACT_NOTIFICATION_SUBJECT",
                "New contact form submission",
            ),
            auto_reply_subject: env_or(
                "CONTACT_AUTO_REPLY_SUBJECT",
                "Thank you for contacting us (automatic reply)",
            ),
            error_subject: env_or("CONTACT_ERROR_SUBJECT", "Contact form notification error"),
            error_notify: parse_bool("CONTACT_ERROR_NOTIFY", &env_or("CONTACT_ERROR_NOTIFY", "true"))?,
            confirmation_message: env_or(
                "CONTACT_CONFIRMATION_MESSAGE",
                "Thank you for your inquiry. We will contact you within two business days.",
            ),
            utc_offset: parse_offset(&env_or("CONTACT_UTC_OFFSET", "+09:00"))
                .ok_or_else(|| "Invalid CONTACT_UTC_OFFSET: expected +HH:MM or -HH:MM".to_string())?,
            organization: Organization {
                name: env_or("CONTACT_ORG_NAME", "Our team"),
                phone: env_or("CONTACT_ORG_PHONE", ""),
                address: env_or("CONTACT_ORG_ADDRESS", "")
                    .split('|')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect(),
                reply_within: env_or("CONTACT_REPLY_WITHIN", "two business days"),
            },
        };

        let timeout_secs: u64 = env_or("CONTACT_CAPTCHA_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_CAPTCHA_TIMEOUT_SECS: {e}"))?;

        let captcha = CaptchaConfig {
            secret: SecretString::from(env_required("CONTACT_CAPTCHA_SECRET")?),
            verify_url: env_or("CONTACT_CAPTCHA_VERIFY_URL", DEFAULT_VERIFY_URL),
            timeout: Duration::from_secs(timeout_secs),
        };

        let tls = match env_or("CONTACT_SMTP_TLS", "starttls").as_str() {
            "starttls" => TlsMode::StartTls,
            "tls" => TlsMode::Tls,
            "none" => TlsMode::None,
            other => return Err(format!("Invalid CONTACT_SMTP_TLS: {other}")),
        };

        let smtp = SmtpConfig {
            host: env_required("CONTACT_SMTP_HOST")?,
            port: env_required("CONTACT_SMTP_PORT")?
                .parse()
                .map_err(|e| format!("Invalid CONTACT_SMTP_PORT: {e}"))?,
            user: env_required("CONTACT_SMTP_USER")?,
            pass: SecretString::from(env_required("CONTACT_SMTP_PASS")?),
            from: env_required("CONTACT_SMTP_FROM")?,
            no_reply_from: std::env::var("CONTACT_SMTP_NO_REPLY_FROM")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            tls,
        };

        let log_path = std::env::var("CONTACT_LOG_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Config {
            host,
            port,
            log_level,
            max_body_size,
            cors_origins,
            contact,
            captcha,
            smtp,
            log_path,
        })
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid {key}: {other}")),
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
