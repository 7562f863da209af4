//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate accessor calls into use-case level APIs.
//! - Keep UI layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass accessor validation/persistence contracts.
//! - Services remain storage-agnostic via `CatalogRepository`.

pub mod auth_service;
pub mod book_service;
pub mod review_service;
