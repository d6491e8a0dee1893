use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Incomplete answers: missing {}", .missing.join(", "))]
    IncompleteAnswers { missing: Vec<String> },

    #[error("Invalid score {value} for {question}: expected 0 to 4")]
    InvalidScore { question: String, value: i64 },

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Ledger error: {message}")]
    LedgerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Access,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DiagError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::IncompleteAnswers { .. }
            | Self::InvalidScore { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                ErrorCategory::Configuration
            }
            Self::Unauthorized { .. } => ErrorCategory::Access,
            Self::IoError(_)
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::LedgerError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Access | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Fill in the company name and e-mail, then submit again"
            }
            Self::IncompleteAnswers { .. } => "Answer every question (Q1 to Q10) before submitting",
            Self::InvalidScore { .. } => "Use a score between 0 (Inexistente) and 4 (Integrado)",
            Self::Unauthorized { .. } => {
                "Check the admin secret or configure admin.secret_sha256 (see `hash-secret`)"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                "Check the configuration file and command-line flags"
            }
            Self::IoError(_) => "Check that the output and ledger paths exist and are writable",
            Self::CsvError(_) | Self::LedgerError { .. } => {
                "The ledger file may be corrupted; inspect it or point --ledger-path elsewhere"
            }
            Self::SerializationError(_) => "Re-run with --verbose and report the problem",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => format!("⚠️ {}", message),
            Self::IncompleteAnswers { missing } => {
                format!("Some questions were not answered: {}", missing.join(", "))
            }
            Self::InvalidScore { question, value } => {
                format!("{} received {}, but scores go from 0 to 4", question, value)
            }
            Self::Unauthorized { .. } => "Access denied to the consultant panel".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagError>;
