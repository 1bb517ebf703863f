use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, UniqueField};
use crate::users::repo_types::{NewUser, UserRecord};

/// Persistence for user accounts. Implementations enforce uniqueness of
/// `username` and `email` at write time.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;
    /// Matches `username = credential OR email = credential`.
    async fn find_by_credential(&self, credential: &str)
        -> Result<Option<UserRecord>, StoreError>;
}

/// Postgres-backed store over the `users` table:
///
/// ```sql
/// id              uuid primary key
/// username        varchar(30)  not null, constraint users_username_key unique
/// email           varchar(256) not null, constraint users_email_key unique
/// hashed_password char(60)     not null
/// created_at      timestamptz  not null default now()
/// updated_at      timestamptz  not null default now()
/// ```
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("username") {
                return StoreError::Conflict(UniqueField::Username);
            }
            if constraint.contains("email") {
                return StoreError::Conflict(UniqueField::Email);
            }
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, email, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, hashed_password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, hashed_password, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            LIMIT 1
            "#,
        )
        .bind(credential)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
