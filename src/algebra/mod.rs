// Copyright 2025 Cowboy AI, LLC.

//! Algebraic layer: rings, free modules, elements and module morphisms
//!
//! Denotators are addressed by modules and evaluated at module elements.
//! This module carries exactly the contract the denotator core consumes:
//! zero elements, a total order, `apply` and `compose`.

mod module;
mod morphism;
mod ring;

pub use module::{Module, ModuleElement};
pub use morphism::ModuleMorphism;
pub use ring::{Rational, Ring, Scalar};

use thiserror::Error;

/// Errors raised by the algebraic layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    /// An element was handed to a morphism or operation over another module
    #[error("domain mismatch: expected an element of {expected}, found {actual}")]
    DomainMismatch {
        /// Module the operation expected
        expected: Module,
        /// Module of the supplied element
        actual: Module,
    },

    /// Scalars of different rings were combined
    #[error("ring mismatch: expected {expected}, found {actual}")]
    RingMismatch {
        /// Ring the operation expected
        expected: Ring,
        /// Ring that was supplied
        actual: Ring,
    },

    /// Matrix or vector sizes disagree with the modules involved
    #[error("dimension mismatch: expected {expected}, found {actual}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Supplied size
        actual: usize,
    },

    /// Division by the zero element
    #[error("division by zero")]
    DivisionByZero,

    /// The element has no multiplicative inverse
    #[error("element {0} is not invertible")]
    NotInvertible(String),

    /// A modulus below 2
    #[error("invalid modulus {0}")]
    InvalidModulus(i64),

    /// Checked integer arithmetic overflowed
    #[error("arithmetic overflow")]
    Overflow,

    /// `g ∘ f` requested with `f.codomain() != g.domain()`
    #[error("cannot compose: codomain {codomain} does not match domain {domain}")]
    NotComposable {
        /// Codomain of the inner morphism
        codomain: Module,
        /// Domain of the outer morphism
        domain: Module,
    },

    /// No canonical morphism connects the two modules
    #[error("no canonical morphism from {from} to {to}")]
    NoCanonicalMorphism {
        /// Source module
        from: Module,
        /// Target module
        to: Module,
    },

    /// Coordinate index beyond the module dimension
    #[error("index {index} out of range for dimension {bound}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Module dimension
        bound: usize,
    },
}

/// Result type for algebraic operations
pub type AlgebraResult<T> = Result<T, AlgebraError>;
