//! Error types for strict reflection operations
//!
//! The sentinel API (null values, `bool` returns) never surfaces these.
//! They back the `try_*` variants for callers that want to know why an
//! operation was rejected.

use thiserror::Error;

/// Main error type for protoreflect operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// No prototype with this name is registered
    #[error("Unknown prototype: {0}")]
    UnknownPrototype(String),

    /// The prototype exists but cannot build native data
    #[error("Prototype {0} has no constructor")]
    NoConstructor(String),

    /// The operation needs a non-null target
    #[error("Target value is null")]
    NullTarget,

    /// New properties cannot be added
    #[error("Cannot add property {key}: object is not extensible")]
    NotExtensible {
        /// Key that was rejected
        key: String,
    },

    /// The descriptor may not be replaced or deleted
    #[error("Property {key} is not configurable")]
    NotConfigurable {
        /// Key of the locked descriptor
        key: String,
    },

    /// The slot is readonly or an accessor without a setter
    #[error("Property {key} is not writable")]
    NotWritable {
        /// Key of the slot
        key: String,
    },

    /// Typed access with the wrong Rust type
    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch {
        /// Requested Rust type
        expected: String,
        /// Class name of the value
        got: String,
    },

    /// The aliased allocation was already destroyed
    #[error("Alias refers to a destroyed allocation")]
    DanglingAlias,
}

/// Result type alias for protoreflect operations
pub type Result<T> = std::result::Result<T, ReflectError>;
