use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password::{verify_password, HashedPassword};

/// User record in the database. Internal view: includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: HashedPassword, // bcrypt, never leaves the auth path
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    /// True iff `password` hashes to the stored digest.
    pub fn validate_password(&self, password: &str) -> bool {
        verify_password(password, &self.hashed_password)
    }
}

/// Fields supplied by signup, already validated and hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: HashedPassword,
}
