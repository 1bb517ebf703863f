use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::AccountError;
use crate::state::AppState;

use super::dto::{LoginRequest, SafeUser, Scope, ScopedUser, SignupRequest};
use super::password::{hash_password, verify_password, HashedPassword};
use super::repo_types::NewUser;
use super::validation::validate_signup;

/// Hashes off the async worker threads; bcrypt is deliberately slow.
async fn hash_blocking(password: String, cost: u32) -> Result<HashedPassword, AccountError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;
    Ok(hash)
}

async fn verify_blocking(hash: HashedPassword, password: String) -> Result<bool, AccountError> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    Ok(ok)
}

/// Create an account and return its owner view.
#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(state: &AppState, req: SignupRequest) -> Result<SafeUser, AccountError> {
    if let Err(e) = validate_signup(&req) {
        warn!(error = %e, "signup rejected");
        return Err(e.into());
    }

    let hashed_password = hash_blocking(req.password, state.bcrypt_cost()).await?;

    let user = state
        .store
        .insert(NewUser {
            username: req.username,
            email: req.email,
            hashed_password,
        })
        .await
        .map_err(|e| {
            let e = AccountError::from(e);
            match &e {
                AccountError::Validation(v) => warn!(error = %v, "signup rejected"),
                other => error!(error = %other, "insert user failed"),
            }
            e
        })?;

    info!(user_id = %user.id, "user signed up");
    Ok(SafeUser::from(&user))
}

/// Look up by username or email and check the password.
///
/// Returns `None` both for an unknown credential and for a wrong password. An unknown
/// credential is still checked against the decoy digest so both paths pay one bcrypt verify.
#[instrument(skip(state, req))]
pub async fn login(state: &AppState, req: LoginRequest) -> Result<Option<SafeUser>, AccountError> {
    let record = state
        .store
        .find_by_credential(&req.credential)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_credential failed");
            AccountError::from(e)
        })?;

    let (user, hash) = match record {
        Some(record) => (Some(SafeUser::from(&record)), record.hashed_password),
        None => (None, state.decoy_hash.as_ref().clone()),
    };
    let verified = verify_blocking(hash, req.password).await?;

    match user {
        Some(user) if verified => {
            info!(user_id = %user.id, "user logged in");
            Ok(Some(user))
        }
        _ => {
            warn!("login failed");
            Ok(None)
        }
    }
}

/// Owner view of the account with `id`, if any.
#[instrument(skip(state))]
pub async fn get_by_id(state: &AppState, id: Uuid) -> Result<Option<SafeUser>, AccountError> {
    let user = state.store.find_by_id(id).await?;
    Ok(user.as_ref().map(SafeUser::from))
}

/// The account with `id` in the projection the caller asks for.
#[instrument(skip(state))]
pub async fn get_by_id_scoped(
    state: &AppState,
    id: Uuid,
    scope: Scope,
) -> Result<Option<ScopedUser>, AccountError> {
    let user = state.store.find_by_id(id).await?;
    Ok(user.map(|u| u.project(scope)))
}
