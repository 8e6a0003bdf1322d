use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Invalid group size: {size} (must be at least 1)")]
    InvalidGroupSize { size: usize },

    #[error("Duplicate identity in roster: {identity}")]
    DuplicateIdentity { identity: String },

    #[error("Roster has no selectable records")]
    EmptyRoster,

    #[error("Group size invariant violated: expected at most {expected}, produced {actual}")]
    SizeInvariantViolation { expected: usize, actual: usize },

    #[error("Identity not present in roster: {identity}")]
    UnknownIdentity { identity: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Roster is missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid selection count '{value}' on row {row}")]
    InvalidSelectionCount { row: usize, value: String },

    #[error("Could not read meeting reply: {message}")]
    ReplyParseError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RosterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RosterError::InvalidGroupSize { .. }
            | RosterError::ConfigValidationError { .. }
            | RosterError::InvalidConfigValueError { .. }
            | RosterError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RosterError::DuplicateIdentity { .. }
            | RosterError::EmptyRoster
            | RosterError::UnknownIdentity { .. }
            | RosterError::MissingColumn { .. }
            | RosterError::InvalidSelectionCount { .. }
            | RosterError::ReplyParseError { .. }
            | RosterError::CsvError(_) => ErrorCategory::Data,
            RosterError::IoError(_) | RosterError::SerializationError(_) => ErrorCategory::Io,
            RosterError::SizeInvariantViolation { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 空名單：沒有可抽的人，不算失敗
            RosterError::EmptyRoster => ErrorSeverity::Low,
            RosterError::ReplyParseError { .. } => ErrorSeverity::Medium,
            RosterError::SizeInvariantViolation { .. } => ErrorSeverity::Critical,
            RosterError::IoError(_) | RosterError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RosterError::InvalidGroupSize { .. } => {
                "Pass --group-size with a value of 1 or more".to_string()
            }
            RosterError::DuplicateIdentity { identity } => format!(
                "Remove or merge the duplicate rows for '{}' in the roster file",
                identity
            ),
            RosterError::EmptyRoster => {
                "Add at least one row with a non-empty identity to the roster".to_string()
            }
            RosterError::SizeInvariantViolation { .. } => {
                "This is a bug; nothing was recorded. Please report it".to_string()
            }
            RosterError::UnknownIdentity { .. } => {
                "Reload the roster; it changed since the group was drawn".to_string()
            }
            RosterError::CsvError(_) => "Check that the roster is valid CSV".to_string(),
            RosterError::IoError(_) => {
                "Check that the file exists and is readable/writable".to_string()
            }
            RosterError::SerializationError(_) => {
                "Check the outbox directory and free disk space".to_string()
            }
            RosterError::MissingColumn { column } => {
                format!("Add a '{}' column or map it under [roster] in the config", column)
            }
            RosterError::InvalidSelectionCount { row, .. } => format!(
                "Fix row {} so the selection count is a whole number of 0 or more",
                row
            ),
            RosterError::ReplyParseError { .. } => {
                "Reply must contain 'Date: YYYY-MM-DD', 'Time: HH:MM AM/PM' and 'Location: ...'"
                    .to_string()
            }
            RosterError::ConfigValidationError { field, .. }
            | RosterError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting", field)
            }
            RosterError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Roster data problem: {}", self),
            ErrorCategory::Io => format!("File access problem: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
