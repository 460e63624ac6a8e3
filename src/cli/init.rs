use colored::Colorize;

use crate::settings::{load_file_settings, save_settings, settings_path};

pub struct InitOptions {
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub email_from: Option<String>,
    pub bind: Option<String>,
}

pub fn run(opts: InitOptions) -> anyhow::Result<()> {
    let mut settings = load_file_settings();
    if let Some(v) = opts.smtp_server {
        settings.smtp_server = v;
    }
    if let Some(v) = opts.smtp_port {
        settings.smtp_port = v;
    }
    if let Some(v) = opts.smtp_username {
        settings.smtp_username = Some(v);
    }
    if let Some(v) = opts.email_from {
        settings.email_from = Some(v);
    }
    if let Some(v) = opts.bind {
        settings.bind = v;
    }
    save_settings(&settings)?;

    println!("{} Settings written to {}", "✓".green(), settings_path().display());
    println!("  SMTP:   {}:{}", settings.smtp_server, settings.smtp_port);
    println!(
        "  Login:  {}",
        settings.smtp_username.as_deref().unwrap_or("(none)")
    );
    println!("  Listen: {}", settings.bind);
    println!("The SMTP password is read from SMTP_PASSWORD and never stored.");
    Ok(())
}
