// Copyright 2025 Cowboy AI, LLC.

//! Module morphisms between free modules
//!
//! Morphisms compose like the arrows of a category: every module has an
//! identity and `g.compose(&f)` is `g ∘ f`, defined only when
//! `f.codomain() == g.domain()`. Composition collapses identities, constants
//! and affine pairs so repeated re-addressing does not grow a chain.

use std::fmt::{self, Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::module::{Module, ModuleElement};
use super::ring::Scalar;
use super::{AlgebraError, AlgebraResult};

/// A structure-preserving map `domain -> codomain`
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "type")]
pub enum ModuleMorphism {
    /// `x ↦ x`
    Identity {
        /// Domain and codomain
        module: Module,
    },
    /// `x ↦ value` for every `x`
    Constant {
        /// Domain
        domain: Module,
        /// The constant image
        value: ModuleElement,
    },
    /// `x ↦ A·x + b`
    Affine {
        /// Domain
        domain: Module,
        /// Codomain, same ring as the domain
        codomain: Module,
        /// `codomain.dimension()` rows of `domain.dimension()` entries
        matrix: Vec<Vec<Scalar>>,
        /// Translation part `b`
        shift: Vec<Scalar>,
    },
    /// Canonical ring change `R^n -> S^n` (e.g. Z -> Q -> R)
    Embedding {
        /// Domain
        domain: Module,
        /// Codomain of equal dimension
        codomain: Module,
    },
    /// `x ↦ x[index]`
    Projection {
        /// Domain
        domain: Module,
        /// Selected coordinate
        index: usize,
    },
    /// `outer ∘ inner`
    Composition {
        /// Applied second
        outer: Box<ModuleMorphism>,
        /// Applied first
        inner: Box<ModuleMorphism>,
    },
}

impl ModuleMorphism {
    /// Identity on `module`
    pub fn identity(module: Module) -> Self {
        ModuleMorphism::Identity { module }
    }

    /// Constant map `domain -> value.module()`
    pub fn constant(domain: Module, value: ModuleElement) -> Self {
        ModuleMorphism::Constant { domain, value }
    }

    /// Affine map `x ↦ matrix·x + shift`
    pub fn affine(
        domain: Module,
        codomain: Module,
        matrix: Vec<Vec<Scalar>>,
        shift: Vec<Scalar>,
    ) -> AlgebraResult<Self> {
        check_affine(&domain, &codomain, &matrix, &shift)?;
        Ok(ModuleMorphism::Affine { domain, codomain, matrix, shift })
    }

    /// Translation `x ↦ x + shift` on `shift.module()`
    pub fn translation(shift: ModuleElement) -> Self {
        let module = shift.module();
        let ring = module.ring();
        let n = module.dimension();
        let matrix = (0..n)
            .map(|row| (0..n).map(|col| if row == col { ring.one() } else { ring.zero() }).collect())
            .collect();
        ModuleMorphism::Affine { domain: module, codomain: module, matrix, shift: shift.components().to_vec() }
    }

    /// Scaling `x ↦ factor·x` on `module`
    pub fn scaling(module: Module, factor: Scalar) -> AlgebraResult<Self> {
        let ring = module.ring();
        if factor.ring() != ring {
            return Err(AlgebraError::RingMismatch { expected: ring, actual: factor.ring() });
        }
        let n = module.dimension();
        let matrix = (0..n)
            .map(|row| (0..n).map(|col| if row == col { factor } else { ring.zero() }).collect())
            .collect();
        Ok(ModuleMorphism::Affine { domain: module, codomain: module, matrix, shift: vec![ring.zero(); n] })
    }

    /// Canonical ring change between modules of equal dimension
    pub fn embedding(domain: Module, codomain: Module) -> AlgebraResult<Self> {
        if domain == codomain {
            return Ok(Self::identity(domain));
        }
        if domain.dimension() != codomain.dimension() {
            return Err(AlgebraError::DimensionMismatch {
                expected: codomain.dimension(),
                actual: domain.dimension(),
            });
        }
        if !domain.ring().embeds_into(codomain.ring()) {
            return Err(AlgebraError::NoCanonicalMorphism { from: domain, to: codomain });
        }
        Ok(ModuleMorphism::Embedding { domain, codomain })
    }

    /// Projection of `domain` onto coordinate `index`
    pub fn projection(domain: Module, index: usize) -> AlgebraResult<Self> {
        if index >= domain.dimension() {
            return Err(AlgebraError::IndexOutOfRange { index, bound: domain.dimension() });
        }
        Ok(ModuleMorphism::Projection { domain, index })
    }

    /// Canonical morphism `from -> to`, when one exists
    ///
    /// The null module maps to the zero of any module; otherwise only ring
    /// embeddings between equal dimensions are canonical.
    pub fn canonical(from: Module, to: Module) -> Option<Self> {
        if from == to {
            return Some(Self::identity(from));
        }
        if from.is_null() {
            return Some(Self::constant(from, to.zero()));
        }
        Self::embedding(from, to).ok()
    }

    /// Source module
    pub fn domain(&self) -> Module {
        match self {
            ModuleMorphism::Identity { module } => *module,
            ModuleMorphism::Constant { domain, .. }
            | ModuleMorphism::Affine { domain, .. }
            | ModuleMorphism::Embedding { domain, .. }
            | ModuleMorphism::Projection { domain, .. } => *domain,
            ModuleMorphism::Composition { inner, .. } => inner.domain(),
        }
    }

    /// Target module
    pub fn codomain(&self) -> Module {
        match self {
            ModuleMorphism::Identity { module } => *module,
            ModuleMorphism::Constant { value, .. } => value.module(),
            ModuleMorphism::Affine { codomain, .. } | ModuleMorphism::Embedding { codomain, .. } => {
                *codomain
            }
            ModuleMorphism::Projection { domain, .. } => Module::new(domain.ring(), 1),
            ModuleMorphism::Composition { outer, .. } => outer.codomain(),
        }
    }

    /// True when the image does not depend on the argument
    pub fn is_constant(&self) -> bool {
        match self {
            ModuleMorphism::Constant { .. } => true,
            ModuleMorphism::Affine { matrix, .. } => matrix.iter().flatten().all(Scalar::is_zero),
            ModuleMorphism::Composition { outer, inner } => outer.is_constant() || inner.is_constant(),
            _ => self.domain().is_null(),
        }
    }

    /// True for identity maps
    pub fn is_identity(&self) -> bool {
        matches!(self, ModuleMorphism::Identity { .. })
    }

    /// Image of `element`
    pub fn apply(&self, element: &ModuleElement) -> AlgebraResult<ModuleElement> {
        let domain = self.domain();
        if !domain.contains(element) {
            return Err(AlgebraError::DomainMismatch { expected: domain, actual: element.module() });
        }
        match self {
            ModuleMorphism::Identity { .. } => Ok(element.clone()),
            ModuleMorphism::Constant { value, .. } => Ok(value.clone()),
            ModuleMorphism::Affine { domain, codomain, matrix, shift } => {
                check_affine(domain, codomain, matrix, shift)?;
                let mut out = Vec::with_capacity(codomain.dimension());
                for (row, offset) in matrix.iter().zip(shift) {
                    let mut acc = *offset;
                    for (a, x) in row.iter().zip(element.components()) {
                        acc = acc.add(&a.mul(x)?)?;
                    }
                    out.push(acc);
                }
                ModuleElement::new(codomain.ring(), out)
            }
            ModuleMorphism::Embedding { codomain, .. } => element.embed(codomain.ring()),
            ModuleMorphism::Projection { domain, index } => {
                let value = element
                    .component(*index)
                    .copied()
                    .ok_or(AlgebraError::IndexOutOfRange { index: *index, bound: domain.dimension() })?;
                ModuleElement::new(domain.ring(), vec![value])
            }
            ModuleMorphism::Composition { outer, inner } => outer.apply(&inner.apply(element)?),
        }
    }

    /// The composite `self ∘ inner`
    pub fn compose(&self, inner: &ModuleMorphism) -> AlgebraResult<ModuleMorphism> {
        if inner.codomain() != self.domain() {
            return Err(AlgebraError::NotComposable {
                codomain: inner.codomain(),
                domain: self.domain(),
            });
        }
        let composite = match (self, inner) {
            (ModuleMorphism::Identity { .. }, _) => inner.clone(),
            (_, ModuleMorphism::Identity { .. }) => self.clone(),
            (ModuleMorphism::Constant { value, .. }, _) => {
                Self::constant(inner.domain(), value.clone())
            }
            (_, ModuleMorphism::Constant { domain, value }) => {
                Self::constant(*domain, self.apply(value)?)
            }
            (
                ModuleMorphism::Affine { domain: middle, codomain, matrix: a, shift: b },
                ModuleMorphism::Affine { domain, matrix: c, shift: d, .. },
            ) => {
                check_affine(middle, codomain, a, b)?;
                check_affine(domain, middle, c, d)?;
                // (A, b) ∘ (C, d) = (A·C, A·d + b)
                let ring = domain.ring();
                let mut matrix = Vec::with_capacity(a.len());
                let mut shift = Vec::with_capacity(a.len());
                for (row, offset) in a.iter().zip(b) {
                    let mut out_row = Vec::with_capacity(domain.dimension());
                    for col in 0..domain.dimension() {
                        let mut acc = ring.zero();
                        for (k, entry) in row.iter().enumerate() {
                            acc = acc.add(&entry.mul(&c[k][col])?)?;
                        }
                        out_row.push(acc);
                    }
                    let mut acc = *offset;
                    for (entry, x) in row.iter().zip(d) {
                        acc = acc.add(&entry.mul(x)?)?;
                    }
                    matrix.push(out_row);
                    shift.push(acc);
                }
                ModuleMorphism::Affine { domain: *domain, codomain: *codomain, matrix, shift }
            }
            _ => ModuleMorphism::Composition {
                outer: Box::new(self.clone()),
                inner: Box::new(inner.clone()),
            },
        };
        Ok(composite)
    }

    /// Re-base this morphism onto `domain`
    ///
    /// Constant maps simply change their domain; anything else is
    /// precomposed with the canonical morphism `domain -> self.domain()`.
    pub fn change_domain(&self, domain: Module) -> AlgebraResult<ModuleMorphism> {
        if domain == self.domain() {
            return Ok(self.clone());
        }
        if let ModuleMorphism::Constant { value, .. } = self {
            return Ok(Self::constant(domain, value.clone()));
        }
        let canonical = Self::canonical(domain, self.domain())
            .ok_or(AlgebraError::NoCanonicalMorphism { from: domain, to: self.domain() })?;
        self.compose(&canonical)
    }

    /// The constant map with value `self(element)`
    pub fn at(&self, element: &ModuleElement) -> AlgebraResult<ModuleMorphism> {
        Ok(Self::constant(self.domain(), self.apply(element)?))
    }
}

/// Shape and ring checks for `x ↦ matrix·x + shift`
///
/// Literal and deserialized affine variants have not passed
/// [`ModuleMorphism::affine`]; `apply` and `compose` check them before indexing.
fn check_affine(
    domain: &Module,
    codomain: &Module,
    matrix: &[Vec<Scalar>],
    shift: &[Scalar],
) -> AlgebraResult<()> {
    if domain.ring() != codomain.ring() {
        return Err(AlgebraError::RingMismatch { expected: domain.ring(), actual: codomain.ring() });
    }
    if matrix.len() != codomain.dimension() || shift.len() != codomain.dimension() {
        return Err(AlgebraError::DimensionMismatch {
            expected: codomain.dimension(),
            actual: matrix.len().min(shift.len()),
        });
    }
    if let Some(row) = matrix.iter().find(|row| row.len() != domain.dimension()) {
        return Err(AlgebraError::DimensionMismatch { expected: domain.dimension(), actual: row.len() });
    }
    let ring = domain.ring();
    if let Some(bad) = matrix.iter().flatten().chain(shift).find(|s| s.ring() != ring) {
        return Err(AlgebraError::RingMismatch { expected: ring, actual: bad.ring() });
    }
    Ok(())
}

impl Display for ModuleMorphism {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ModuleMorphism::Identity { module } => write!(f, "id[{module}]"),
            ModuleMorphism::Constant { domain, value } => write!(f, "const[{domain}]({value})"),
            ModuleMorphism::Affine { domain, codomain, .. } => write!(f, "affine[{domain} -> {codomain}]"),
            ModuleMorphism::Embedding { domain, codomain } => write!(f, "embed[{domain} -> {codomain}]"),
            ModuleMorphism::Projection { domain, index } => write!(f, "proj[{domain}]#{index}"),
            ModuleMorphism::Composition { outer, inner } => write!(f, "{outer} ∘ {inner}"),
        }
    }
}
