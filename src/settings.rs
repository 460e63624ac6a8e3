use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, SummaryError};
use crate::mailer::SmtpConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub email_from: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_upload_mb() -> usize {
    16
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            email_from: None,
            bind: default_bind(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Settings {
    /// Overlay environment variables on top of the file values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("SMTP_SERVER") {
            self.smtp_server = v;
        }
        if let Some(v) = non_empty("SMTP_PORT") {
            self.smtp_port = v
                .trim()
                .parse()
                .map_err(|_| SummaryError::Settings(format!("SMTP_PORT is not a port number: {v}")))?;
        }
        if let Some(v) = non_empty("SMTP_USERNAME") {
            self.smtp_username = Some(v);
        }
        if let Some(v) = non_empty("EMAIL_FROM") {
            self.email_from = Some(v);
        }
        if let Some(v) = non_empty("BIND_ADDR") {
            self.bind = v;
        }
        if let Some(v) = non_empty("MAX_UPLOAD_MB") {
            self.max_upload_mb = v
                .trim()
                .parse()
                .map_err(|_| SummaryError::Settings(format!("MAX_UPLOAD_MB is not a number: {v}")))?;
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Transport configuration; the sender falls back to the login name.
    pub fn smtp_config(&self, password: Zeroizing<String>) -> Result<SmtpConfig> {
        let from = self
            .email_from
            .clone()
            .or_else(|| self.smtp_username.clone())
            .ok_or_else(|| {
                SummaryError::Settings("set EMAIL_FROM or SMTP_USERNAME to send mail".to_string())
            })?;
        Ok(SmtpConfig {
            host: self.smtp_server.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password,
            from,
        })
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("weekly-summary")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// File values only, defaults where the file is missing or unreadable.
pub fn load_file_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

/// File values with the process environment applied on top.
pub fn load_settings() -> Result<Settings> {
    let mut settings = load_file_settings();
    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SummaryError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// The SMTP password only ever comes from the environment.
pub fn smtp_password_from_env() -> Option<Zeroizing<String>> {
    std::env::var("SMTP_PASSWORD")
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            smtp_server: "mail.example.com".to_string(),
            smtp_port: 2525,
            smtp_username: Some("reports@example.com".to_string()),
            email_from: None,
            bind: "0.0.0.0:8080".to_string(),
            max_upload_mb: 4,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.smtp_server, "smtp.gmail.com");
        assert_eq!(s.smtp_port, 587);
        assert_eq!(s.bind, "127.0.0.1:5000");
        assert_eq!(s.max_upload_bytes(), 16 * 1024 * 1024);
        assert!(s.smtp_username.is_none());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"smtp_server": "mail.example.com"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.smtp_server, "mail.example.com");
        assert_eq!(s.smtp_port, 587);
        assert_eq!(s.bind, "127.0.0.1:5000");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let vars = env(&[
            ("SMTP_SERVER", "smtp.internal"),
            ("SMTP_PORT", "465"),
            ("SMTP_USERNAME", "bot@example.com"),
            ("EMAIL_FROM", ""),
            ("BIND_ADDR", "0.0.0.0:9000"),
        ]);
        let mut s = Settings::default();
        s.apply_env(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(s.smtp_server, "smtp.internal");
        assert_eq!(s.smtp_port, 465);
        assert_eq!(s.smtp_username.as_deref(), Some("bot@example.com"));
        assert_eq!(s.email_from, None);
        assert_eq!(s.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_port_is_settings_error() {
        let vars = env(&[("SMTP_PORT", "smtp")]);
        let mut s = Settings::default();
        assert!(matches!(
            s.apply_env(|k| vars.get(k).cloned()),
            Err(SummaryError::Settings(_))
        ));
    }

    #[test]
    fn test_smtp_config_sender_fallback() {
        let mut s = Settings::default();
        assert!(s.smtp_config(Zeroizing::new(String::new())).is_err());

        s.smtp_username = Some("bot@example.com".to_string());
        let cfg = s.smtp_config(Zeroizing::new("pw".to_string())).unwrap();
        assert_eq!(cfg.from, "bot@example.com");
        assert_eq!(cfg.port, 587);

        s.email_from = Some("Reports <reports@example.com>".to_string());
        let cfg = s.smtp_config(Zeroizing::new("pw".to_string())).unwrap();
        assert_eq!(cfg.from, "Reports <reports@example.com>");
        assert_eq!(cfg.password.as_str(), "pw");
    }
}
