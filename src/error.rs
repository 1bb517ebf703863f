use serde::Serialize;
use thiserror::Error;

/// Column that carries a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Username,
    Email,
}

/// A single rule violated by a signup field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username cannot be an email")]
    UsernameIsEmail,
    #[error("email must be between {min} and {max} characters")]
    EmailLength { min: usize, max: usize },
    #[error("email is not a valid address")]
    InvalidEmail,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("email is already registered")]
    EmailTaken,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameLength { .. } | Self::UsernameIsEmail | Self::UsernameTaken => {
                "username"
            }
            Self::EmailLength { .. } | Self::InvalidEmail | Self::EmailTaken => "email",
        }
    }
}

impl From<UniqueField> for FieldError {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::Username => Self::UsernameTaken,
            UniqueField::Email => Self::EmailTaken,
        }
    }
}

/// Every field error found for one signup attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains(&self, err: &FieldError) -> bool {
        self.0.contains(err)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field(), e))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0:?} already exists")]
    Conflict(UniqueField),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(field) => {
                AccountError::Validation(ValidationErrors(vec![field.into()]))
            }
            other => AccountError::Store(other),
        }
    }
}
