//! User account persistence: signup, credential login, lookup by id and
//! field-visibility projections over a Postgres or in-memory store.

pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod users;

pub use error::{AccountError, FieldError, StoreError, UniqueField, ValidationErrors};
pub use state::AppState;
