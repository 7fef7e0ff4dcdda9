//! Error types for Skillverse

use thiserror::Error;

/// Result type alias using Skillverse's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Skillverse error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Skill '{0}' not found. Run `skillverse skills list` to see all skills.")]
    SkillNotFound(String),

    #[error("User '{0}' not found.")]
    UserNotFound(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::SkillNotFound(_) => "E001",
            Self::UserNotFound(_) => "E002",
            Self::DatabaseError(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::SkillNotFound(_) => Some("skillverse skills list".to_string()),
            Self::UserNotFound(name) => Some(format!("skillverse config set user.username {}", name)),
            Self::ConfigError(_) => Some("skillverse config path".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::SkillNotFound("Python".into()).code(), "E001");
        assert_eq!(Error::UserNotFound("demo".into()).code(), "E002");
        assert_eq!(Error::DatabaseError(sqlx::Error::RowNotFound).code(), "E400");
        assert_eq!(Error::InvalidInput("x".into()).code(), "E800");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_error_messages() {
        let err = Error::SkillNotFound("Juggling".into());
        assert!(err.to_string().contains("Juggling"));
        assert!(err.to_string().contains("skillverse skills list"));

        let err = Error::InvalidInput("skill_id is required".into());
        assert_eq!(err.to_string(), "Invalid input: skill_id is required");
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(
            Error::SkillNotFound("x".into()).suggestion().as_deref(),
            Some("skillverse skills list")
        );
        assert!(Error::Other("x".into()).suggestion().is_none());
    }
}
