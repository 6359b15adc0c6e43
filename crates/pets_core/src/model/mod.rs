//! Pet domain model.
//!
//! # Responsibility
//! - Define the single persisted entity and its gender enum.
//! - Define the loosely typed field bag used for insert/update payloads.
//! - Own payload validation rules shared by every write path.
//!
//! # Invariants
//! - A persisted pet always has a name, a known gender and a weight >= 0.

pub mod pet;
pub mod values;
