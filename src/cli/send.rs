use std::path::Path;

use anyhow::Context;
use chrono::Local;
use colored::Colorize;
use zeroize::Zeroizing;

use crate::delivery::process_upload;
use crate::importer::Upload;
use crate::mailer::SmtpMailer;
use crate::settings::{load_settings, smtp_password_from_env, Settings};

/// `SMTP_PASSWORD`, else an interactive prompt when there is a login to use it with.
fn smtp_password(settings: &Settings) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = smtp_password_from_env() {
        return Ok(password);
    }
    match settings.smtp_username.as_deref() {
        Some(user) => {
            let prompt = format!("SMTP password for {user}: ");
            let password = rpassword::prompt_password(prompt).context("failed to read password")?;
            Ok(Zeroizing::new(password))
        }
        None => Ok(Zeroizing::new(String::new())),
    }
}

pub fn run(file: &str, to: &str, today: Option<&str>) -> anyhow::Result<()> {
    let today = super::parse_today(today)?;
    let upload = Upload::from_path(Path::new(file))?;
    let settings = load_settings()?;
    let config = settings.smtp_config(smtp_password(&settings)?)?;
    let mailer = SmtpMailer::new(&config)?;

    let ack = process_upload(&upload, to, today, &mailer, Local::now().naive_local())?;

    println!("{} {}", "✓".green(), ack.message);
    println!("  Current week: {} ({} rows)", ack.current_week_range, ack.current_rows);
    println!("  Next week:    {} ({} rows)", ack.next_week_range, ack.next_rows);
    Ok(())
}
