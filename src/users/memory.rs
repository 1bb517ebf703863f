use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, UniqueField};
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, UserRecord};

/// In-process store with the same uniqueness rules as the Postgres one.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }

        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            hashed_password: user.hashed_password,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == credential || u.email == credential)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::hash_password;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            hashed_password: hash_password("password", 4).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = InMemoryUserStore::new();
        let rec = store
            .insert(new_user("demo-user", "demo@example.com"))
            .await
            .unwrap();
        assert_eq!(rec.created_at, rec.updated_at);
        assert_eq!(store.len().await, 1);
        let found = store.find_by_id(rec.id).await.unwrap().unwrap();
        assert_eq!(found.username, "demo-user");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_conflict() {
        let store = InMemoryUserStore::new();
        store
            .insert(new_user("demo-user", "demo@example.com"))
            .await
            .unwrap();

        let err = store
            .insert(new_user("demo-user", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Username)));

        let err = store
            .insert(new_user("other-user", "demo@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Email)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn credential_matches_username_or_email() {
        let store = InMemoryUserStore::new();
        let rec = store
            .insert(new_user("demo-user", "demo@example.com"))
            .await
            .unwrap();

        let by_name = store.find_by_credential("demo-user").await.unwrap().unwrap();
        let by_email = store
            .find_by_credential("demo@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, rec.id);
        assert_eq!(by_email.id, rec.id);
        assert!(store.find_by_credential("nobody").await.unwrap().is_none());
    }
}
