//! Pet use-case services.
//!
//! # Responsibility
//! - Orchestrate provider calls into screen-level APIs.
//! - Keep UI callers decoupled from identifiers and payload details.

pub mod pet_service;
