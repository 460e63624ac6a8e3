use std::time::Duration;

use lettre::address::Address;
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{SmtpTransport, Transport};
use zeroize::Zeroizing;

use crate::error::{Result, SummaryError};

const SUBMISSION_PORT: u16 = 587;
const SMTPS_PORT: u16 = 465;
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound transport settings, read once at startup and never mutated.
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Zeroizing<String>,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// One HTML message to one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Reject obviously broken recipients before any spreadsheet work happens.
pub fn validate_address(addr: &str) -> Result<()> {
    addr.trim()
        .parse::<Address>()
        .map(|_| ())
        .map_err(|e| SummaryError::InvalidAddress(format!("{}: {e}", addr.trim())))
}

fn mailbox(addr: &str) -> Result<Mailbox> {
    addr.trim()
        .parse::<Mailbox>()
        .map_err(|e| SummaryError::InvalidAddress(format!("{}: {e}", addr.trim())))
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build the transport. The submission port upgrades with STARTTLS, 465
    /// uses implicit TLS, anything else upgrades only if the server offers it.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = mailbox(&config.from)?;
        let builder = match config.port {
            SUBMISSION_PORT => SmtpTransport::starttls_relay(&config.host),
            SMTPS_PORT => SmtpTransport::relay(&config.host),
            _ => TlsParameters::new(config.host.clone()).map(|params| {
                SmtpTransport::builder_dangerous(&config.host).tls(Tls::Opportunistic(params))
            }),
        }
        .map_err(|e| SummaryError::Transport(e.to_string()))?;

        let mut builder = builder.port(config.port).timeout(Some(SEND_TIMEOUT));
        if let Some(user) = config.username.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.credentials(Credentials::new(
                user.to_string(),
                config.password.as_str().to_string(),
            ));
        }
        log::debug!("SMTP transport for {}:{}", config.host, config.port);
        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(mailbox(&mail.to)?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|e| SummaryError::Other(format!("Failed to build message: {e}")))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        self.transport
            .send(&message)
            .map_err(|e| SummaryError::Transport(e.to_string()))?;
        log::info!("mail sent to {}", mail.to);
        Ok(())
    }
}

/// Keeps every message instead of sending it.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<OutgoingMail>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Mailer for RecordingMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Fails every send the way a rejected login would.
#[cfg(test)]
pub struct FailingMailer;

#[cfg(test)]
impl Mailer for FailingMailer {
    fn send(&self, _mail: &OutgoingMail) -> Result<()> {
        Err(SummaryError::Transport("535 authentication failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port,
            username: Some("reports@example.com".to_string()),
            password: Zeroizing::new("hunter2".to_string()),
            from: "Weekly Reports <reports@example.com>".to_string(),
        }
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("lead@example.com").is_ok());
        assert!(validate_address("  lead@example.com ").is_ok());
        assert!(matches!(
            validate_address("not an address"),
            Err(SummaryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_build_message_headers() {
        let mailer = SmtpMailer::new(&config(2525)).unwrap();
        let message = mailer
            .build_message(&OutgoingMail {
                to: "lead@example.com".to_string(),
                subject: "Weekly Summary: 2025-01-13 to 2025-01-19".to_string(),
                html: "<h2>Weekly Summary Report</h2>".to_string(),
            })
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Weekly Summary: 2025-01-13 to 2025-01-19"));
        assert!(raw.contains("To: lead@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_bad_sender_is_rejected() {
        let mut cfg = config(587);
        cfg.from = "nobody".to_string();
        assert!(matches!(SmtpMailer::new(&cfg), Err(SummaryError::InvalidAddress(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let shown = format!("{:?}", config(587));
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }
}
