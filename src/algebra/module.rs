// Copyright 2025 Cowboy AI, LLC.

//! Free modules `R^n` and their elements
//!
//! A [`Module`] doubles as the *address* of a denotator. The zero-dimensional
//! module over Z is the distinguished null address.

use std::fmt::{self, Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ring::{Rational, Ring, Scalar};
use super::{AlgebraError, AlgebraResult};

/// The free module `ring^dimension`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct Module {
    ring: Ring,
    dimension: usize,
}

impl Module {
    /// `ring^dimension`
    pub fn new(ring: Ring, dimension: usize) -> Self {
        Self { ring, dimension }
    }

    /// The null address: the zero module over Z
    pub fn null() -> Self {
        Self { ring: Ring::Integer, dimension: 0 }
    }

    /// `Z^dimension`
    pub fn integers(dimension: usize) -> Self {
        Self::new(Ring::Integer, dimension)
    }

    /// `Q^dimension`
    pub fn rationals(dimension: usize) -> Self {
        Self::new(Ring::Rational, dimension)
    }

    /// `R^dimension`
    pub fn reals(dimension: usize) -> Self {
        Self::new(Ring::Real, dimension)
    }

    /// `(Z/modulus)^dimension`
    pub fn modular(modulus: i64, dimension: usize) -> AlgebraResult<Self> {
        if modulus < 2 {
            return Err(AlgebraError::InvalidModulus(modulus));
        }
        Ok(Self::new(Ring::Modular(modulus), dimension))
    }

    /// Coefficient ring
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Rank of the free module
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// True for zero-dimensional modules; denotators living there are constant
    pub fn is_null(&self) -> bool {
        self.dimension == 0
    }

    /// The zero element
    pub fn zero(&self) -> ModuleElement {
        ModuleElement { ring: self.ring, components: vec![self.ring.zero(); self.dimension] }
    }

    /// True when `element` is a point of this module
    pub fn contains(&self, element: &ModuleElement) -> bool {
        element.module() == *self
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.dimension {
            0 => f.write_str("0"),
            1 => write!(f, "{}", self.ring),
            n => write!(f, "{}^{n}", self.ring),
        }
    }
}

/// A point of a free module
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct ModuleElement {
    ring: Ring,
    components: Vec<Scalar>,
}

impl ModuleElement {
    /// Build an element from scalars that all belong to `ring`
    pub fn new(ring: Ring, components: Vec<Scalar>) -> AlgebraResult<Self> {
        let ring = ring.validate()?;
        if let Some(bad) = components.iter().find(|c| c.ring() != ring) {
            return Err(AlgebraError::RingMismatch { expected: ring, actual: bad.ring() });
        }
        Ok(Self { ring, components })
    }

    /// A single integer, as an element of `Z`
    pub fn integer(value: i64) -> Self {
        Self { ring: Ring::Integer, components: vec![Scalar::Integer(value)] }
    }

    /// An element of `Z^n`
    pub fn integers(values: &[i64]) -> Self {
        Self {
            ring: Ring::Integer,
            components: values.iter().copied().map(Scalar::Integer).collect(),
        }
    }

    /// A single real, as an element of `R`
    pub fn real(value: f64) -> Self {
        Self { ring: Ring::Real, components: vec![Scalar::Real(value)] }
    }

    /// An element of `R^n`
    pub fn reals(values: &[f64]) -> Self {
        Self { ring: Ring::Real, components: values.iter().copied().map(Scalar::Real).collect() }
    }

    /// A single fraction, as an element of `Q`
    pub fn rational(numerator: i64, denominator: i64) -> AlgebraResult<Self> {
        Ok(Self {
            ring: Ring::Rational,
            components: vec![Scalar::Rational(Rational::new(numerator, denominator)?)],
        })
    }

    /// A single residue, as an element of `Z/modulus`
    pub fn modular(value: i64, modulus: i64) -> AlgebraResult<Self> {
        Ok(Self { ring: Ring::Modular(modulus), components: vec![Scalar::modular(value, modulus)?] })
    }

    /// The module this element lives in
    pub fn module(&self) -> Module {
        Module::new(self.ring, self.components.len())
    }

    /// Coefficient ring
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Coordinates
    pub fn components(&self) -> &[Scalar] {
        &self.components
    }

    /// Coordinate `index`, if any
    pub fn component(&self, index: usize) -> Option<&Scalar> {
        self.components.get(index)
    }

    /// True for the zero element
    pub fn is_zero(&self) -> bool {
        self.components.iter().all(Scalar::is_zero)
    }

    /// Componentwise sum
    pub fn add(&self, other: &ModuleElement) -> AlgebraResult<ModuleElement> {
        self.expect_same_module(other)?;
        let components = self
            .components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a.add(b))
            .collect::<AlgebraResult<Vec<_>>>()?;
        Ok(Self { ring: self.ring, components })
    }

    /// Scalar multiple
    pub fn scale(&self, factor: &Scalar) -> AlgebraResult<ModuleElement> {
        let components = self
            .components
            .iter()
            .map(|c| factor.mul(c))
            .collect::<AlgebraResult<Vec<_>>>()?;
        Ok(Self { ring: self.ring, components })
    }

    /// Image under the canonical ring homomorphism into `target`
    pub fn embed(&self, target: Ring) -> AlgebraResult<ModuleElement> {
        let components = self
            .components
            .iter()
            .map(|c| c.embed(target))
            .collect::<AlgebraResult<Vec<_>>>()?;
        Ok(Self { ring: target, components })
    }

    fn expect_same_module(&self, other: &ModuleElement) -> AlgebraResult<()> {
        if self.module() != other.module() {
            return Err(AlgebraError::DomainMismatch {
                expected: self.module(),
                actual: other.module(),
            });
        }
        Ok(())
    }
}

impl Display for ModuleElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.components.as_slice() {
            [single] => write!(f, "{single}"),
            many => {
                f.write_str("(")?;
                for (i, c) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
        }
    }
}
