//! # acervo-auth
//!
//! Authentication and authorization for Acervo.
//!
//! ## Modules
//!
//! - `jwt`: token issuing and validation
//! - `password`: Argon2id hashing, password policy and generated secrets
//! - `rbac`: role policies for organization-level operations
//! - `acl`: per-folder access resolution and TCC role rules
//! - `reset`: password-reset codes held in the cache

pub mod acl;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod reset;

pub use acl::{FolderAccessResolver, TccActor, TccScope};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{RbacEnforcer, RbacPolicies};
pub use reset::ResetCodeStore;
