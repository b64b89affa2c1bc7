//! Login, token validation and password reset.

pub mod reset;
pub mod service;

pub use reset::PasswordResetService;
pub use service::{AuthService, LoginResult, SignUp};
