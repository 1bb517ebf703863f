use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use tracing::{error, warn};

/// Width of a bcrypt digest in its `$2b$` text encoding.
pub const HASH_LEN: usize = 60;

/// A bcrypt digest, guaranteed to be exactly [`HASH_LEN`] bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(digest: String) -> Result<Self, InvalidHash> {
        if digest.len() != HASH_LEN {
            return Err(InvalidHash(digest.len()));
        }
        Ok(Self(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Keep digests out of logs.
impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

impl TryFrom<String> for HashedPassword {
    type Error = InvalidHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HashedPassword> for String {
    fn from(value: HashedPassword) -> Self {
        value.0
    }
}

// Stored as text; decoding goes through `new` so a row of the wrong width is an error.
impl sqlx::Type<Postgres> for HashedPassword {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for HashedPassword {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let digest = <String as sqlx::Decode<'r, Postgres>>::decode(value)?;
        Ok(Self::try_from(digest)?)
    }
}

impl sqlx::Encode<'_, Postgres> for HashedPassword {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <&str as sqlx::Encode<'_, Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("password hash must be {HASH_LEN} bytes, got {0}")]
pub struct InvalidHash(pub usize);

pub fn hash_password(plain: &str, cost: u32) -> Result<HashedPassword, bcrypt::BcryptError> {
    let digest = bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        e
    })?;
    // bcrypt always emits the 60 byte encoding
    HashedPassword::new(digest).map_err(|e| {
        error!(error = %e, "bcrypt produced an unexpected digest");
        bcrypt::BcryptError::InvalidHash(e.to_string())
    })
}

pub fn verify_password(plain: &str, hash: &HashedPassword) -> bool {
    match bcrypt::verify(plain, hash.as_str()) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "stored password hash could not be parsed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, COST).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
        assert!(!verify_password("Secur3P@ssw0rd!x", &hash));
    }

    #[test]
    fn digest_is_fixed_width_and_not_the_plaintext() {
        for password in ["", "a", "correct horse battery staple", &"x".repeat(200)] {
            let hash = hash_password(password, COST).expect("hashing should succeed");
            assert_eq!(hash.len(), HASH_LEN);
            assert_ne!(hash.as_str(), password);
        }
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("hunter22", COST).unwrap();
        let b = hash_password("hunter22", COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter22", &a));
        assert!(verify_password("hunter22", &b));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        let bogus = HashedPassword::new("z".repeat(HASH_LEN)).unwrap();
        assert!(!verify_password("anything", &bogus));
    }

    #[test]
    fn wrong_width_is_rejected() {
        assert_eq!(HashedPassword::new("short".into()), Err(InvalidHash(5)));
    }

    #[test]
    fn stored_digest_of_wrong_width_is_refused() {
        let padded = format!("{} ", hash_password("pw", COST).unwrap().as_str());
        assert_eq!(HashedPassword::try_from(padded), Err(InvalidHash(61)));

        let json = format!("\"{}\"", "x".repeat(59));
        assert!(serde_json::from_str::<HashedPassword>(&json).is_err());
    }

    #[test]
    fn debug_hides_the_digest() {
        let hash = hash_password("pw", COST).unwrap();
        assert_eq!(format!("{hash:?}"), "HashedPassword(..)");
    }
}
