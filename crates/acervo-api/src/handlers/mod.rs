//! HTTP handlers, one module per resource.

pub mod audit;
pub mod auth;
pub mod course;
pub mod file;
pub mod folder;
pub mod health;
pub mod organization;
pub mod permission;
pub mod student;
pub mod tcc;
pub mod user;
