pub mod init;
pub mod preview;
pub mod send;
pub mod serve;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

/// `--today` override, or the local calendar date.
pub(crate) fn parse_today(today: Option<&str>) -> anyhow::Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("--today expects YYYY-MM-DD, got '{s}'")),
        None => Ok(Local::now().date_naive()),
    }
}

#[derive(Parser)]
#[command(
    name = "weekly-summary",
    version,
    about = "Turn a weekly timesheet spreadsheet into a plan-vs-actual summary email."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP upload endpoint.
    Serve {
        /// Address to listen on (default from settings, 127.0.0.1:5000)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Summarize a spreadsheet and mail the report once.
    Send {
        /// Path to an .xlsx/.xlsm/.xlsb/.xls/.ods/.csv timesheet
        file: String,
        /// Receiver address
        #[arg(long)]
        to: String,
        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<String>,
    },
    /// Print the report tables without sending anything.
    Preview {
        /// Path to the timesheet
        file: String,
        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<String>,
    },
    /// Write SMTP and server settings to the settings file.
    Init {
        #[arg(long = "smtp-server")]
        smtp_server: Option<String>,
        #[arg(long = "smtp-port")]
        smtp_port: Option<u16>,
        #[arg(long = "smtp-username")]
        smtp_username: Option<String>,
        #[arg(long = "email-from")]
        email_from: Option<String>,
        #[arg(long)]
        bind: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_today() {
        assert_eq!(
            parse_today(Some("2025-01-15")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert!(parse_today(Some("15/01/2025")).is_err());
        assert!(parse_today(None).is_ok());
    }

    #[test]
    fn test_cli_parses_send() {
        let cli = Cli::try_parse_from([
            "weekly-summary",
            "send",
            "week.xlsx",
            "--to",
            "lead@example.com",
            "--today",
            "2025-01-15",
        ])
        .unwrap();
        match cli.command {
            Commands::Send { file, to, today } => {
                assert_eq!(file, "week.xlsx");
                assert_eq!(to, "lead@example.com");
                assert_eq!(today.as_deref(), Some("2025-01-15"));
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["weekly-summary"]).is_err());
    }
}
