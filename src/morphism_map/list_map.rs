// Copyright 2025 Cowboy AI, LLC.

//! Positional coordinates of a limit denotator

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::registry::NameRegistry;

use super::{
    evaluate_factors, readdress_factors, readdress_factors_by, resolve_factors, CoordinateMap,
    MorphismMap,
};

/// One factor per limit coordinate, in coordinate order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListMorphismMap {
    factors: Vec<Denotator>,
}

impl ListMorphismMap {
    /// Wrap the coordinate factors
    pub fn new(factors: Vec<Denotator>) -> Self {
        Self { factors }
    }

    /// Factor at coordinate `index`
    pub fn factor(&self, index: usize) -> Option<&Denotator> {
        self.factors.get(index)
    }

    /// Copy with coordinate `index` replaced
    pub fn with_factor(&self, index: usize, factor: Denotator) -> Option<Self> {
        let mut factors = self.factors.clone();
        *factors.get_mut(index)? = factor;
        Some(Self { factors })
    }
}

impl CoordinateMap for ListMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &self.factors
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        Ok(evaluate_factors(&self.factors, element)?.map(|f| MorphismMap::List(Self::new(f))))
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::List(Self::new(readdress_factors(&self.factors, address)?)))
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::List(Self::new(readdress_factors_by(&self.factors, morphism)?)))
    }

    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap> {
        resolve_factors(&self.factors, registry, errors).map(|f| MorphismMap::List(Self::new(f)))
    }
}
