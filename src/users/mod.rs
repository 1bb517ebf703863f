pub mod dto;
mod memory;
pub mod password;
mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub use memory::InMemoryUserStore;
pub use repo::{PgUserStore, UserStore};
pub use services::{get_by_id, get_by_id_scoped, login, signup};
