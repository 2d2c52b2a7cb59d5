//! Core domain types for Patchbay.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application.

mod diff;
mod ids;
mod operation;

pub use diff::{DiffLine, DiffLineKind};
pub use ids::TurnId;
pub use operation::{AnnotatedOperation, FileOperation, OperationKind};
