//! Common error infrastructure for arena-core.
//!
//! Domain-specific errors (`LevelingError`, `BattleError`, `TournamentError`,
//! ...) live next to the operations that raise them. This module provides the
//! classification shared by all of them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each component has its own error enum with specific variants
//! - **Classification**: Every variant maps to one [`ErrorKind`]
//! - **All-or-nothing**: Errors are raised before any mutation begins

/// Category of a rejected call.
///
/// None of the categories imply an automatic retry; the caller decides what to
/// change before calling again:
/// - **Validation**: malformed input (bad roster size, bracket size, empty roster)
/// - **Authorization**: wrong identity or wrong turn
/// - **StateConflict**: preconditions not met yet (tournament not full, battle ended)
/// - **NotFound**: unknown id, a caller bug or stale reference
/// - **Internal**: collaborator inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    Validation,
    Authorization,
    StateConflict,
    NotFound,
    Internal,
}

impl ErrorKind {
    /// Returns true if the error indicates a bug rather than a bad request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Returns true if the same call may succeed later without changing its input.
    pub const fn may_succeed_later(&self) -> bool {
        matches!(self, Self::StateConflict)
    }
}

/// Common trait for all arena-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify by what the caller must do next, not by impact
/// - Error codes are stable identifiers for logs and tests
pub trait ArenaError: core::fmt::Display + core::fmt::Debug {
    /// Returns the category of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
