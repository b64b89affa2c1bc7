//! Password hashing, policy, and generated secrets.

pub mod generator;
pub mod hasher;
pub mod validator;

pub use generator::{initial_password, numeric_code};
pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
