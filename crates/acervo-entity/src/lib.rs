//! # acervo-entity
//!
//! Domain entity models for Acervo. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`; enums map to Postgres enum types via `sqlx::Type`.

pub mod audit;
pub mod course;
pub mod file;
pub mod folder;
pub mod organization;
pub mod permission;
pub mod student;
pub mod tcc;
pub mod user;
