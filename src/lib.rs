// Copyright 2025 Cowboy AI, LLC.

//! # CIM Denotator
//!
//! Forms and denotators: a typed, category-flavoured value model for
//! musical (and other structured) objects.
//!
//! - **Algebra**: rings, finite free modules, elements and module morphisms
//! - **Diagram**: small vertex/arrow graphs over forms or modules
//! - **Form**: immutable type descriptors of five shapes (simple, limit,
//!   colimit, power, list), possibly self-referential
//! - **Denotator**: immutable values of forms, parametrized by an address
//!   module and evaluable at its elements
//! - **MorphismMap**: the coordinate payload behind each denotator shape
//! - **Registry**: caller-owned names used to resolve forward references
//!
//! ## Design Principles
//!
//! 1. **Persistence**: operations return new values and share structure
//! 2. **Explicit registry**: no global state; resolution takes a registry
//! 3. **Cycle safety**: every walk over a form graph carries a visited memo
//! 4. **Closed shapes**: shapes and payloads are enums, matched exhaustively
//!
//! ```
//! use cim_denotator::{Denotator, Form, Module, ModuleElement};
//!
//! let int = Form::simple(Some("Int"), Module::integers(1));
//! let set = Form::power(Some("IntSet"), &int);
//! let mut d = set.default_denotator(None).unwrap();
//! for v in [3, 1, 2, 1] {
//!     d.append_factor(Denotator::simple(None, &int, ModuleElement::integer(v)).unwrap()).unwrap();
//! }
//! assert_eq!(d.factor_count(), 3);
//! assert_eq!(d.get_element(&[0]), Some(ModuleElement::integer(1)));
//! ```

#![warn(missing_docs)]

pub mod algebra;
mod config;
mod denotator;
mod diagram;
mod errors;
mod form;
pub mod morphism_map;
mod registry;
mod traversal;

pub use algebra::{
    AlgebraError, AlgebraResult, Module, ModuleElement, ModuleMorphism, Rational, Ring, Scalar,
};
pub use config::RegistryConfig;
pub use denotator::Denotator;
pub use diagram::{Diagram, FormDiagram, MathDiagram};
pub use errors::{DenotatorError, DenotatorResult, ReferenceKind};
pub use form::{Bounds, Form, FormRef, FormShape};
pub use morphism_map::{CoordinateMap, MorphismMap};
pub use registry::{NameRegistry, Resolution, ResolutionReport};
