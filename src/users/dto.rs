use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::UserRecord;

/// Request body for signup.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login. `credential` is either a username or an email.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub credential: String,
    pub password: String,
}

/// What other users may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub username: String,
}

/// What the account's own session sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&UserRecord> for PublicUser {
    fn from(u: &UserRecord) -> Self {
        Self {
            username: u.username.clone(),
        }
    }
}

impl From<&UserRecord> for SafeUser {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
        }
    }
}

impl From<&UserRecord> for UserProfile {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Which projection of an account a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Public,
    Session,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScopedUser {
    Public(PublicUser),
    Session(SafeUser),
    Profile(UserProfile),
}

impl UserRecord {
    pub fn project(&self, scope: Scope) -> ScopedUser {
        match scope {
            Scope::Public => ScopedUser::Public(self.into()),
            Scope::Session => ScopedUser::Session(self.into()),
            Scope::Profile => ScopedUser::Profile(self.into()),
        }
    }
}
