//! Core business logic - framework-agnostic account, catalog, order, and
//! payment operations.
//!
//! Every function takes the database handle and the acting principal (where
//! one exists) as explicit parameters; nothing reads ambient request state.

/// Order aggregate operations - creation, retrieval, item replacement, and
/// total computation
pub mod order;
/// Payment operations - the amount-matching settlement state machine
pub mod payment;
/// Catalog operations - product creation, search, and updates
pub mod product;
/// Account operations - registration and profile management
pub mod user;
