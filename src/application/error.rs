// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Domain(DomainError::NotFound(_))
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Domain(DomainError::Validation(_))
        )
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists(_) | Self::Domain(DomainError::AlreadyExists(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_helpers_see_through_domain_errors() {
        let err = ApplicationError::from(DomainError::NotFound("article".into()));
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert!(ApplicationError::validation("bad").is_validation());
        assert!(ApplicationError::from(DomainError::AlreadyExists("slug".into())).is_already_exists());
    }

    #[test]
    fn domain_errors_display_transparently() {
        let err = ApplicationError::from(DomainError::Validation("title cannot be empty".into()));
        assert_eq!(err.to_string(), "validation error: title cannot be empty");
    }
}
