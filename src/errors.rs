// Copyright 2025 Cowboy AI, LLC.

//! Error types for form and denotator operations

use thiserror::Error;

use crate::algebra::{AlgebraError, Module};
use crate::form::{Form, FormShape};

/// Which kind of named object a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A reference to a registered form
    Form,
    /// A reference to a registered denotator
    Denotator,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Form => f.write_str("form"),
            ReferenceKind::Denotator => f.write_str("denotator"),
        }
    }
}

/// Errors that can occur in form and denotator operations
#[derive(Debug, Clone, Error)]
pub enum DenotatorError {
    /// Operation requires a different form shape
    #[error("Shape mismatch: expected {expected}, found {actual}")]
    ShapeMismatch {
        /// Shape the operation needs
        expected: FormShape,
        /// Shape that was found
        actual: FormShape,
    },

    /// A denotator of the wrong form was supplied
    #[error("Form mismatch: expected {expected}, found {actual}")]
    FormMismatch {
        /// Form required at this position
        expected: Form,
        /// Form of the supplied denotator
        actual: Form,
    },

    /// A denotator or element lives at an incompatible address
    #[error("Address mismatch: expected {expected}, found {actual}")]
    AddressMismatch {
        /// Address required by the operation
        expected: Module,
        /// Address that was supplied
        actual: Module,
    },

    /// A value or morphism targets the wrong module
    #[error("Module mismatch: expected {expected}, found {actual}")]
    ModuleMismatch {
        /// Module required by the form
        expected: Module,
        /// Module that was supplied
        actual: Module,
    },

    /// Path step beyond the number of factors
    #[error("Path index {index} out of range (bound {bound}) at depth {depth}")]
    PathOutOfRange {
        /// Offending index
        index: usize,
        /// Number of factors available at that step
        bound: usize,
        /// Position of the step within the path
        depth: usize,
    },

    /// A path that cannot be followed for a structural reason
    #[error("Invalid path at depth {depth}: {reason}")]
    InvalidPath {
        /// Position of the step within the path
        depth: usize,
        /// Why the step is invalid
        reason: String,
    },

    /// Wrong number of factors for the form
    #[error("Arity mismatch: expected {expected} factors, found {actual}")]
    ArityMismatch {
        /// Coordinate count of the form
        expected: usize,
        /// Number of factors supplied
        actual: usize,
    },

    /// Label not present in the form's label map
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// A simple value outside of its form's bounds
    #[error("Value {value} outside of bounds [{lower}, {upper}]")]
    OutOfBounds {
        /// Rendered value
        value: String,
        /// Rendered lower bound
        lower: String,
        /// Rendered upper bound
        upper: String,
    },

    /// Form construction with an inconsistent diagram
    #[error("Invalid diagram: {0}")]
    InvalidDiagram(String),

    /// Limit factors break an arrow of their form's diagram
    #[error("Arrow {from} -> {to} of form {form} does not hold for the given factors")]
    ArrowViolation {
        /// Limit form carrying the arrow
        form: Form,
        /// Source coordinate
        from: usize,
        /// Target coordinate
        to: usize,
    },

    /// A default denotator would have to contain itself
    #[error("Form {0} has no finite default denotator")]
    RecursiveDefault(String),

    /// Forward reference with no registered target
    #[error("Unresolved {kind} reference: {name}")]
    UnresolvedReference {
        /// Form or denotator
        kind: ReferenceKind,
        /// Name that was looked up
        name: String,
    },

    /// A different object is already registered under this name
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// Only named objects can be registered
    #[error("Cannot register an anonymous {0}")]
    AnonymousRegistration(ReferenceKind),

    /// Registration refused an object that fails validation
    #[error("Invalid denotator: {0}")]
    InvalidDenotator(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the algebraic layer, propagated unchanged
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

/// Result type for form and denotator operations
pub type DenotatorResult<T> = Result<T, DenotatorError>;

impl From<serde_json::Error> for DenotatorError {
    fn from(err: serde_json::Error) -> Self {
        DenotatorError::Config(err.to_string())
    }
}

impl DenotatorError {
    /// Check if this is a path error
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            DenotatorError::PathOutOfRange { .. } | DenotatorError::InvalidPath { .. }
        )
    }

    /// Check if this error comes from an incompatible form or shape
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            DenotatorError::ShapeMismatch { .. }
                | DenotatorError::FormMismatch { .. }
                | DenotatorError::ArityMismatch { .. }
        )
    }

    /// Check if this is an address or module incompatibility
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            DenotatorError::AddressMismatch { .. }
                | DenotatorError::ModuleMismatch { .. }
                | DenotatorError::Algebra(AlgebraError::NoCanonicalMorphism { .. })
                | DenotatorError::Algebra(AlgebraError::DomainMismatch { .. })
        )
    }

    pub(crate) fn unresolved(kind: ReferenceKind, name: impl Into<String>) -> Self {
        DenotatorError::UnresolvedReference { kind, name: name.into() }
    }
}
