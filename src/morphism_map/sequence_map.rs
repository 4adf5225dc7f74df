// Copyright 2025 Cowboy AI, LLC.

//! Ordered elements of a list denotator

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::registry::NameRegistry;

use super::{
    evaluate_factors, readdress_factors, readdress_factors_by, resolve_factors, CoordinateMap,
    MorphismMap,
};

/// Elements in insertion order; duplicates allowed
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceMorphismMap {
    factors: Vec<Denotator>,
}

impl SequenceMorphismMap {
    /// Wrap the elements as given
    pub fn new(factors: Vec<Denotator>) -> Self {
        Self { factors }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Append at the end
    pub fn push(&mut self, factor: Denotator) {
        self.factors.push(factor);
    }

    /// Insert at `index`; `false` when `index` is past the end
    pub fn insert(&mut self, index: usize, factor: Denotator) -> bool {
        if index > self.factors.len() {
            return false;
        }
        self.factors.insert(index, factor);
        true
    }

    /// Remove and return the element at `index`
    pub fn remove(&mut self, index: usize) -> Option<Denotator> {
        (index < self.factors.len()).then(|| self.factors.remove(index))
    }

    /// Overwrite the element at `index`, returning the old one
    pub fn set(&mut self, index: usize, factor: Denotator) -> Option<Denotator> {
        let slot = self.factors.get_mut(index)?;
        Some(std::mem::replace(slot, factor))
    }

    /// Position of the first element equal to `factor`
    pub fn index_of(&self, factor: &Denotator) -> Option<usize> {
        self.factors.iter().position(|f| f == factor)
    }
}

impl CoordinateMap for SequenceMorphismMap {
    fn factors(&self) -> &[Denotator] {
        &self.factors
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        Ok(evaluate_factors(&self.factors, element)?.map(|f| MorphismMap::Sequence(Self::new(f))))
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Sequence(Self::new(readdress_factors(&self.factors, address)?)))
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::Sequence(Self::new(readdress_factors_by(&self.factors, morphism)?)))
    }

    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap> {
        resolve_factors(&self.factors, registry, errors).map(|f| MorphismMap::Sequence(Self::new(f)))
    }
}
