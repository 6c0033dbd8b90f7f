// src/users/mod.rs

pub mod models;
pub mod store;

pub use models::{Role, User, UserRecord};
pub use store::UserStore;
