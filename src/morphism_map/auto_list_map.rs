// Copyright 2025 Cowboy AI, LLC.

//! Sorted, duplicate-free elements of a power denotator

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::registry::NameRegistry;

use super::{
    evaluate_factors, readdress_factors, readdress_factors_by, resolve_factors, CoordinateMap,
    MorphismMap,
};

/// Power elements kept in ascending order without duplicates
///
/// The positional view used by paths is built lazily and dropped on every
/// mutation.
#[derive(Debug, Clone, Default)]
pub struct AutoListMorphismMap {
    elements: BTreeSet<Denotator>,
    positional: OnceCell<Vec<Denotator>>,
}

impl AutoListMorphismMap {
    /// Collect `factors`, sorting and dropping duplicates
    pub fn new(factors: impl IntoIterator<Item = Denotator>) -> Self {
        Self { elements: factors.into_iter().collect(), positional: OnceCell::new() }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &Denotator> {
        self.elements.iter()
    }

    /// True when an equal element is present
    pub fn contains(&self, factor: &Denotator) -> bool {
        self.elements.contains(factor)
    }

    /// Position of `factor` in ascending order
    pub fn index_of(&self, factor: &Denotator) -> Option<usize> {
        self.factors().binary_search(factor).ok()
    }

    /// Insert `factor`; `false` when an equal element was already present
    pub fn insert(&mut self, factor: Denotator) -> bool {
        let inserted = self.elements.insert(factor);
        if inserted {
            self.positional.take();
        }
        inserted
    }

    /// Remove the element at position `index`
    pub fn remove(&mut self, index: usize) -> Option<Denotator> {
        let factor = self.factors().get(index)?.clone();
        self.remove_factor(&factor).then_some(factor)
    }

    /// Remove the element equal to `factor`
    pub fn remove_factor(&mut self, factor: &Denotator) -> bool {
        let removed = self.elements.remove(factor);
        if removed {
            self.positional.take();
        }
        removed
    }

    /// Swap `old` for `new`, re-sorting; `false` when `old` is absent
    pub fn replace(&mut self, old: &Denotator, new: Denotator) -> bool {
        if !self.remove_factor(old) {
            return false;
        }
        self.insert(new);
        true
    }

    /// Elements present in either map
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.elements.union(&other.elements).cloned())
    }

    /// Elements present in both maps
    pub fn intersection(&self, other: &Self) -> Self {
        Self::new(self.elements.intersection(&other.elements).cloned())
    }

    /// Elements of `self` absent from `other`
    pub fn difference(&self, other: &Self) -> Self {
        Self::new(self.elements.difference(&other.elements).cloned())
    }
}

impl CoordinateMap for AutoListMorphismMap {
    fn factors(&self) -> &[Denotator] {
        self.positional.get_or_init(|| self.elements.iter().cloned().collect())
    }

    fn at(&self, element: &ModuleElement) -> DenotatorResult<Option<MorphismMap>> {
        Ok(evaluate_factors(self.factors(), element)?.map(|f| MorphismMap::AutoList(Self::new(f))))
    }

    fn change_address(&self, address: &Module) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::AutoList(Self::new(readdress_factors(self.factors(), address)?)))
    }

    fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<MorphismMap> {
        Ok(MorphismMap::AutoList(Self::new(readdress_factors_by(self.factors(), morphism)?)))
    }

    fn resolve_references(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<MorphismMap> {
        resolve_factors(self.factors(), registry, errors).map(|f| MorphismMap::AutoList(Self::new(f)))
    }
}

impl PartialEq for AutoListMorphismMap {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AutoListMorphismMap {}

impl PartialOrd for AutoListMorphismMap {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AutoListMorphismMap {
    /// Element-wise in ascending order. When one side runs out first, the
    /// side lacking the trailing element is the greater one.
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.elements.iter();
        let mut right = other.elements.iter();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
            }
        }
    }
}
