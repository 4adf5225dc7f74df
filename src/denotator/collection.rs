// Copyright 2025 Cowboy AI, LLC.

//! Power and list editing
//!
//! The editors work in place on a denotator handle. A payload shared with
//! other handles is copied first, so the edit is never visible through
//! them. Editing drops any evaluation frame.

use super::{conform, Denotator};
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::FormShape;
use crate::morphism_map::{AutoListMorphismMap, MorphismMap};

impl Denotator {
    /// Add `factor` to a power or the end of a list
    ///
    /// Returns `false` when a power already holds an equal element.
    pub fn append_factor(&mut self, factor: Denotator) -> DenotatorResult<bool> {
        let factor = self.conform_element(factor)?;
        match self.payload_mut() {
            MorphismMap::AutoList(map) => Ok(map.insert(factor)),
            MorphismMap::Sequence(map) => {
                map.push(factor);
                Ok(true)
            }
            _ => Err(self.collection_error()),
        }
    }

    /// Insert `factor` into a list at `index`
    pub fn insert_factor(&mut self, index: usize, factor: Denotator) -> DenotatorResult<()> {
        self.expect_shape(FormShape::List)?;
        let bound = self.factor_count();
        if index > bound {
            return Err(DenotatorError::PathOutOfRange { index, bound, depth: 0 });
        }
        let factor = self.conform_element(factor)?;
        if let MorphismMap::Sequence(map) = self.payload_mut() {
            map.insert(index, factor);
        }
        Ok(())
    }

    /// Insert `factor` at the front of a list
    pub fn prepend_factor(&mut self, factor: Denotator) -> DenotatorResult<()> {
        self.insert_factor(0, factor)
    }

    /// Remove the element at position `index` of a power or list
    pub fn remove_factor(&mut self, index: usize) -> DenotatorResult<Denotator> {
        self.expect_collection()?;
        let bound = self.factor_count();
        if index >= bound {
            return Err(DenotatorError::PathOutOfRange { index, bound, depth: 0 });
        }
        let removed = match self.payload_mut() {
            MorphismMap::AutoList(map) => map.remove(index),
            MorphismMap::Sequence(map) => map.remove(index),
            _ => None,
        };
        removed.ok_or(DenotatorError::PathOutOfRange { index, bound, depth: 0 })
    }

    /// Swap the element equal to `old` for `new`
    ///
    /// Powers re-sort; lists keep the position of the first match. Returns
    /// `false` when no element equals `old`.
    pub fn replace_factor(&mut self, old: &Denotator, new: Denotator) -> DenotatorResult<bool> {
        let new = self.conform_element(new)?;
        let Some(index) = self.index_of(old) else {
            return Ok(false);
        };
        match self.payload_mut() {
            MorphismMap::AutoList(map) => Ok(map.replace(old, new)),
            MorphismMap::Sequence(map) => Ok(map.set(index, new).is_some()),
            _ => Err(self.collection_error()),
        }
    }

    /// Position of `factor` among the elements of a power or list
    pub fn index_of(&self, factor: &Denotator) -> Option<usize> {
        match &self.0.current {
            MorphismMap::AutoList(map) => map.index_of(factor),
            MorphismMap::Sequence(map) => map.index_of(factor),
            _ => None,
        }
    }

    /// True when a power or list holds an element equal to `factor`
    pub fn contains_factor(&self, factor: &Denotator) -> bool {
        match &self.0.current {
            MorphismMap::AutoList(map) => map.contains(factor),
            _ => self.index_of(factor).is_some(),
        }
    }

    /// Elements in either of two powers of the same form and address
    pub fn union(&self, other: &Denotator) -> DenotatorResult<Denotator> {
        self.combine(other, AutoListMorphismMap::union)
    }

    /// Elements common to two powers
    pub fn intersection(&self, other: &Denotator) -> DenotatorResult<Denotator> {
        self.combine(other, AutoListMorphismMap::intersection)
    }

    /// Elements of `self` missing from `other`
    pub fn difference(&self, other: &Denotator) -> DenotatorResult<Denotator> {
        self.combine(other, AutoListMorphismMap::difference)
    }

    fn combine(
        &self,
        other: &Denotator,
        op: impl Fn(&AutoListMorphismMap, &AutoListMorphismMap) -> AutoListMorphismMap,
    ) -> DenotatorResult<Denotator> {
        self.expect_shape(FormShape::Power)?;
        if !other.form().full_eq(self.form()) {
            return Err(DenotatorError::FormMismatch {
                expected: self.form().clone(),
                actual: other.form().clone(),
            });
        }
        let other = other.change_address(&self.address())?;
        match (&self.0.current, &other.0.current) {
            (MorphismMap::AutoList(a), MorphismMap::AutoList(b)) => {
                Ok(self.with_maps(None, MorphismMap::AutoList(op(a, b))))
            }
            _ => Err(self.collection_error()),
        }
    }

    fn conform_element(&self, factor: Denotator) -> DenotatorResult<Denotator> {
        self.expect_collection()?;
        let coordinate = self.form().required_coordinate(0)?;
        conform(&coordinate, factor, &self.address())
    }

    fn expect_collection(&self) -> DenotatorResult<()> {
        match self.shape() {
            FormShape::Power | FormShape::List => Ok(()),
            _ => Err(self.collection_error()),
        }
    }

    fn collection_error(&self) -> DenotatorError {
        DenotatorError::ShapeMismatch { expected: FormShape::Power, actual: self.shape() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Module, ModuleElement};
    use crate::form::Form;
    use pretty_assertions::assert_eq;

    fn int() -> Form {
        Form::simple(Some("Int"), Module::integers(1))
    }

    fn n(value: i64) -> Denotator {
        Denotator::simple(None, &int(), ModuleElement::integer(value)).unwrap()
    }

    fn values(d: &Denotator) -> Vec<ModuleElement> {
        d.factors().iter().filter_map(Denotator::element).collect()
    }

    fn ints(values: &[i64]) -> Vec<ModuleElement> {
        values.iter().map(|&v| ModuleElement::integer(v)).collect()
    }

    fn empty_set() -> Denotator {
        Denotator::power(None, &Module::null(), &Form::power(Some("Set"), int()), Vec::new()).unwrap()
    }

    fn empty_seq() -> Denotator {
        Denotator::list(None, &Module::null(), &Form::list(Some("Seq"), int()), Vec::new()).unwrap()
    }

    #[test]
    fn test_appending_to_a_power_sorts_and_deduplicates() {
        let mut set = empty_set();
        for v in [3, 1, 2, 1] {
            set.append_factor(n(v)).unwrap();
        }
        assert_eq!(values(&set), ints(&[1, 2, 3]));
        assert!(!set.append_factor(n(2)).unwrap());
        assert_eq!(set.index_of(&n(3)), Some(2));
    }

    #[test]
    fn test_edits_do_not_leak_into_clones() {
        let mut set = empty_set();
        set.append_factor(n(1)).unwrap();
        let snapshot = set.clone();
        set.append_factor(n(2)).unwrap();
        assert_eq!(values(&snapshot), ints(&[1]));
        assert_eq!(values(&set), ints(&[1, 2]));
    }

    #[test]
    fn test_list_editing_keeps_positions() {
        let mut seq = empty_seq();
        seq.append_factor(n(5)).unwrap();
        seq.append_factor(n(5)).unwrap();
        seq.prepend_factor(n(1)).unwrap();
        seq.insert_factor(1, n(3)).unwrap();
        assert_eq!(values(&seq), ints(&[1, 3, 5, 5]));
        assert!(seq.replace_factor(&n(5), n(7)).unwrap());
        assert_eq!(values(&seq), ints(&[1, 3, 7, 5]));
        assert_eq!(seq.remove_factor(0).unwrap(), n(1));
        assert!(matches!(seq.insert_factor(9, n(0)), Err(DenotatorError::PathOutOfRange { .. })));
    }

    #[test]
    fn test_power_replace_resorts() {
        let mut set = empty_set();
        for v in [1, 2, 3] {
            set.append_factor(n(v)).unwrap();
        }
        assert!(set.replace_factor(&n(1), n(9)).unwrap());
        assert_eq!(values(&set), ints(&[2, 3, 9]));
        assert!(!set.replace_factor(&n(4), n(5)).unwrap());
        assert_eq!(set.remove_factor(0).unwrap(), n(2));
    }

    #[test]
    fn test_element_forms_are_checked() {
        let mut set = empty_set();
        let real = Form::simple(Some("Real"), Module::reals(1));
        let r = Denotator::simple(None, &real, ModuleElement::real(1.0)).unwrap();
        assert!(matches!(set.append_factor(r), Err(DenotatorError::FormMismatch { .. })));
        let mut single = n(1);
        assert!(single.append_factor(n(2)).unwrap_err().is_shape_error());
    }

    #[test]
    fn test_set_algebra() {
        let mut a = empty_set();
        let mut b = empty_set();
        for v in [1, 2, 3] {
            a.append_factor(n(v)).unwrap();
        }
        for v in [2, 3, 4] {
            b.append_factor(n(v)).unwrap();
        }
        assert_eq!(values(&a.union(&b).unwrap()), ints(&[1, 2, 3, 4]));
        assert_eq!(values(&a.intersection(&b).unwrap()), ints(&[2, 3]));
        assert_eq!(values(&a.difference(&b).unwrap()), ints(&[1]));
        assert!(a.union(&empty_seq()).is_err());
    }
}
