//! Password-reset codes.

pub mod store;

pub use store::{RESET_CODE_LENGTH, ResetCodeStore};
