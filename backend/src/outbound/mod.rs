//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **media**: uploaded images stored below a capability directory
//! - **pdf**: shopping list rendering
//! - **security**: Argon2id password hashing
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod pdf;
pub mod persistence;
pub mod security;
