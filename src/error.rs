use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("receiver_email and spreadsheet file required")]
    MissingInput,

    #[error("Unsupported file type: {0} (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)")]
    UnsupportedFormat(String),

    #[error("No column containing '{0}' found. Please include a Date column.")]
    MissingColumn(&'static str),

    #[error("No parsable dates found in 'Date' column")]
    NoParsableDates,

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render {0}")]
    Render(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl SummaryError {
    /// Errors caused by what the caller sent rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::UnsupportedFormat(_)
                | Self::MissingColumn(_)
                | Self::NoParsableDates
                | Self::InvalidAddress(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(SummaryError::MissingInput.is_client_error());
        assert!(SummaryError::MissingColumn("date").is_client_error());
        assert!(SummaryError::NoParsableDates.is_client_error());
        assert!(!SummaryError::Transport("auth failed".into()).is_client_error());
        assert!(!SummaryError::Spreadsheet("corrupt".into()).is_client_error());
    }

    #[test]
    fn test_schema_error_message_names_column() {
        let msg = SummaryError::MissingColumn("date").to_string();
        assert!(msg.contains("'date'"));
    }
}
