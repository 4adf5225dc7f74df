// Copyright 2025 Cowboy AI, LLC.

//! Payloads of simple denotators and of placeholders

use crate::algebra::{AlgebraResult, Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::registry::NameRegistry;

use super::{CoordinateMap, MorphismMap};

/// A simple value given by a morphism `address -> module`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleMorphismMap {
    morphism: ModuleMorphism,
}

impl ModuleMorphismMap {
    /// Wrap `morphism`
    pub fn new(morphism: ModuleMorphism) -> Self {
        Self { morphism }
    }

    /// The defining morphism
    pub fn morphism(&self) -> &ModuleMorphism {
        &self.morphism
    }

    /// Value at the origin of the address
    pub fn element(&self) -> AlgebraResult<ModuleElement> {
        self.morphism.apply(&self.morphism.domain().zero())
    }
}

impl CoordinateMap for ModuleMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &[]
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        if self.morphism.is_constant() {
            return Ok(None);
        }
        Ok(Some(MorphismMap::Module(Self::new(self.morphism.at(element)?))))
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        MorphismMap::simple(self.morphism.change_domain(*address)?)
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        MorphismMap::simple(self.morphism.compose(morphism)?)
    }

    fn resolve_references(&self, _: &NameRegistry, _: &mut Vec<DenotatorError>) -> Option<MorphismMap> {
        None
    }
}

/// A simple value independent of any address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstantModuleMorphismMap {
    element: ModuleElement,
}

impl ConstantModuleMorphismMap {
    /// Wrap `element`
    pub fn new(element: ModuleElement) -> Self {
        Self { element }
    }

    /// The constant value
    pub fn element(&self) -> &ModuleElement {
        &self.element
    }
}

impl CoordinateMap for ConstantModuleMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &[]
    }

    fn at(&self, _: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        Ok(None)
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        MorphismMap::simple(ModuleMorphism::constant(*address, self.element.clone()))
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        MorphismMap::simple(ModuleMorphism::constant(morphism.domain(), self.element.clone()))
    }

    fn resolve_references(&self, _: &NameRegistry, _: &mut Vec<DenotatorError>) -> Option<MorphismMap> {
        None
    }
}

/// The empty payload of a forward-reference placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EmptyMorphismMap;

impl CoordinateMap for EmptyMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &[]
    }

    fn at(&self, _: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        Ok(None)
    }

    fn change_address(&self, _: &Module) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Empty(EmptyMorphismMap))
    }

    fn change_address_by(&self, _: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Empty(EmptyMorphismMap))
    }

    fn resolve_references(&self, _: &NameRegistry, _: &mut Vec<DenotatorError>) -> Option<MorphismMap> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Scalar;

    #[test]
    fn test_constant_morphisms_do_not_change_on_evaluation() {
        let map = ModuleMorphismMap::new(ModuleMorphism::constant(Module::integers(1), ModuleElement::integer(4)));
        assert!(map.at(&ModuleElement::integer(9)).unwrap().is_none());
    }

    #[test]
    fn test_evaluation_yields_a_constant_on_the_same_address() {
        let double = ModuleMorphism::scaling(Module::integers(1), Scalar::Integer(2)).unwrap();
        let map = ModuleMorphismMap::new(double);
        let Some(MorphismMap::Module(evaluated)) = map.at(&ModuleElement::integer(5)).unwrap() else {
            panic!("expected an addressed payload");
        };
        assert_eq!(evaluated.morphism().domain(), Module::integers(1));
        assert_eq!(evaluated.element().unwrap(), ModuleElement::integer(10));
    }

    #[test]
    fn test_moving_to_the_null_address_collapses_to_a_constant() {
        let shift = ModuleMorphism::translation(ModuleElement::integer(3));
        let map = ModuleMorphismMap::new(shift);
        let moved = map.change_address(&Module::null()).unwrap();
        assert_eq!(moved, MorphismMap::Constant(ConstantModuleMorphismMap::new(ModuleElement::integer(3))));
    }

    #[test]
    fn test_missing_canonical_morphism_is_reported() {
        let map = ModuleMorphismMap::new(ModuleMorphism::identity(Module::reals(1)));
        let err = map.change_address(&Module::integers(2)).unwrap_err();
        assert!(err.is_address_error());
    }

    #[test]
    fn test_constants_move_anywhere() {
        let map = ConstantModuleMorphismMap::new(ModuleElement::integer(7));
        let moved = map.change_address(&Module::reals(3)).unwrap();
        let MorphismMap::Module(m) = moved else { panic!("expected an addressed payload") };
        assert!(m.morphism().is_constant());
        assert_eq!(m.morphism().domain(), Module::reals(3));
    }
}
