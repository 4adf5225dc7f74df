// Copyright 2025 Cowboy AI, LLC.

//! The selected branch of a colimit denotator

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::registry::NameRegistry;

use super::{CoordinateMap, MorphismMap};

/// Branch index and the factor living in that branch
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexMorphismMap {
    index: usize,
    factor: [Denotator; 1],
}

impl IndexMorphismMap {
    /// Select branch `index` with `factor`
    pub fn new(index: usize, factor: Denotator) -> Self {
        Self { index, factor: [factor] }
    }

    /// Selected branch
    pub fn index(&self) -> usize {
        self.index
    }

    /// Factor of the selected branch
    pub fn factor(&self) -> &Denotator {
        &self.factor[0]
    }
}

impl CoordinateMap for IndexMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &self.factor
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        let factor = self.factor().at(element)?;
        if factor.ptr_eq(self.factor()) {
            return Ok(None);
        }
        Ok(Some(MorphismMap::Index(Self::new(self.index, factor))))
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Index(Self::new(self.index, self.factor().change_address(address)?)))
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Index(Self::new(self.index, self.factor().change_address_by(morphism)?)))
    }

    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap> {
        let factor = self.factor().resolve_with(registry, errors)?;
        Some(MorphismMap::Index(Self::new(self.index, factor)))
    }
}
