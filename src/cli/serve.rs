use std::sync::Arc;

use anyhow::Context;
use zeroize::Zeroizing;

use crate::mailer::SmtpMailer;
use crate::server::{self, AppState};
use crate::settings::{load_settings, smtp_password_from_env};

pub fn run(bind: Option<String>) -> anyhow::Result<()> {
    let mut settings = load_settings()?;
    if let Some(bind) = bind {
        settings.bind = bind;
    }

    let password = smtp_password_from_env().unwrap_or_else(|| {
        if settings.smtp_username.is_some() {
            log::warn!("SMTP_USERNAME is set but SMTP_PASSWORD is not; sends will likely be refused");
        }
        Zeroizing::new(String::new())
    });
    let config = settings.smtp_config(password)?;
    log::info!("relaying through {}:{} as {}", config.host, config.port, config.from);
    let mailer = SmtpMailer::new(&config)?;
    let state = AppState::new(Arc::new(mailer));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime
        .block_on(server::serve(&settings.bind, state, settings.max_upload_bytes()))
        .with_context(|| format!("server on {} stopped", settings.bind))?;
    Ok(())
}
