// Copyright 2025 Cowboy AI, LLC.

//! Morphism maps: the coordinate payload of a denotator
//!
//! Each form shape stores its coordinates in its own map type:
//!
//! | shape   | map                                                      |
//! |---------|----------------------------------------------------------|
//! | simple  | [`ModuleMorphismMap`] or [`ConstantModuleMorphismMap`]   |
//! | limit   | [`ListMorphismMap`]                                      |
//! | colimit | [`IndexMorphismMap`]                                     |
//! | power   | [`AutoListMorphismMap`]                                  |
//! | list    | [`SequenceMorphismMap`]                                  |
//!
//! [`EmptyMorphismMap`] is the payload of a forward-reference placeholder.

mod auto_list_map;
mod index_map;
mod list_map;
mod module_map;
mod sequence_map;

pub use auto_list_map::AutoListMorphismMap;
pub use index_map::IndexMorphismMap;
pub use list_map::ListMorphismMap;
pub use module_map::{ConstantModuleMorphismMap, EmptyMorphismMap, ModuleMorphismMap};
pub use sequence_map::SequenceMorphismMap;

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::FormShape;
use crate::registry::NameRegistry;

/// Operations every coordinate payload supports
pub trait CoordinateMap {
    /// Factor denotators in payload order
    fn factors(&self) -> &[Denotator];

    /// Number of factors
    fn factor_count(&self) -> usize {
        self.factors().len()
    }

    /// Evaluate at `element`; `None` when nothing changes
    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>>;

    /// Re-base onto `address` through the canonical morphism
    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap>;

    /// Re-base along `morphism`, whose codomain is the current address
    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap>;

    /// Bind forward-reference factors; `None` when nothing changes
    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap>;
}

/// Coordinate payload of a denotator, one variant per form shape
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MorphismMap {
    /// Simple denotator at the null address
    Constant(ConstantModuleMorphismMap),
    /// Simple denotator at a proper address
    Module(ModuleMorphismMap),
    /// Limit coordinates
    List(ListMorphismMap),
    /// Colimit branch
    Index(IndexMorphismMap),
    /// Power elements
    AutoList(AutoListMorphismMap),
    /// List elements
    Sequence(SequenceMorphismMap),
    /// Unresolved forward reference
    Empty(EmptyMorphismMap),
}

impl MorphismMap {
    /// Form shape this payload belongs to; `None` for placeholders
    pub fn shape(&self) -> Option<FormShape> {
        match self {
            MorphismMap::Constant(_) | MorphismMap::Module(_) => Some(FormShape::Simple),
            MorphismMap::List(_) => Some(FormShape::Limit),
            MorphismMap::Index(_) => Some(FormShape::Colimit),
            MorphismMap::AutoList(_) => Some(FormShape::Power),
            MorphismMap::Sequence(_) => Some(FormShape::List),
            MorphismMap::Empty(_) => None,
        }
    }

    /// Payload for a simple denotator given by `morphism`
    ///
    /// Morphisms out of the null address collapse to their constant value.
    pub fn simple(morphism: ModuleMorphism) -> DenotatorResult<MorphismMap> {
        if morphism.domain().is_null() {
            let value = morphism.apply(&Module::null().zero())?;
            return Ok(MorphismMap::Constant(ConstantModuleMorphismMap::new(value)));
        }
        Ok(MorphismMap::Module(ModuleMorphismMap::new(morphism)))
    }

    fn inner(&self) -> &dyn CoordinateMap {
        match self {
            MorphismMap::Constant(m) => m,
            MorphismMap::Module(m) => m,
            MorphismMap::List(m) => m,
            MorphismMap::Index(m) => m,
            MorphismMap::AutoList(m) => m,
            MorphismMap::Sequence(m) => m,
            MorphismMap::Empty(m) => m,
        }
    }
}

impl CoordinateMap for MorphismMap {
    fn factors(&self) -> &[Denotator] {
        self.inner().factors()
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        self.inner().at(element)
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        self.inner().change_address(address)
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        self.inner().change_address_by(morphism)
    }

    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap> {
        self.inner().resolve_references(registry, errors)
    }
}

/// Evaluate every factor; `None` when all of them come back unchanged
pub(crate) fn evaluate_factors(
    factors: &[Denotator],
    element: &ModuleElement,
) -> DenotatorResult<Option<Vec<Denotator>>> {
    let mut changed = false;
    let evaluated = factors
        .iter()
        .map(|factor| {
            let value = factor.at(element)?;
            changed |= !value.ptr_eq(factor);
            Ok(value)
        })
        .collect::<DenotatorResult<Vec<_>>>()?;
    Ok(changed.then_some(evaluated))
}

/// Re-base every factor; the first failure aborts the whole call
pub(crate) fn readdress_factors(
    factors: &[Denotator],
    address: &Module,
) -> DenotatorResult<Vec<Denotator>> {
    factors.iter().map(|f| f.change_address(address)).collect()
}

/// Re-base every factor along `morphism`
pub(crate) fn readdress_factors_by(
    factors: &[Denotator],
    morphism: &ModuleMorphism,
) -> DenotatorResult<Vec<Denotator>> {
    factors.iter().map(|f| f.change_address_by(morphism)).collect()
}

/// Resolve every factor; `None` when all of them come back unchanged
pub(crate) fn resolve_factors(
    factors: &[Denotator],
    registry: &NameRegistry,
    errors: &mut Vec<DenotatorError>,
) -> Option<Vec<Denotator>> {
    let mut changed = false;
    let resolved = factors
        .iter()
        .map(|factor| match factor.resolve_with(registry, errors) {
            Some(value) => {
                changed = true;
                value
            }
            None => factor.clone(),
        })
        .collect();
    changed.then_some(resolved)
}
