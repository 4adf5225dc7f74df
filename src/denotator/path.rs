// Copyright 2025 Cowboy AI, LLC.

//! Path addressing
//!
//! A path is a sequence of factor indices. For limits, powers and lists a
//! step selects the factor at that position; for colimits the step must
//! name the selected branch. Power positions follow the sorted order.

use super::validation::check_arrows;
use super::{conform, Denotator};
use crate::algebra::{ModuleElement, ModuleMorphism};
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::FormShape;
use crate::morphism_map::{AutoListMorphismMap, CoordinateMap, IndexMorphismMap, MorphismMap, SequenceMorphismMap};

impl Denotator {
    /// Sub-denotator at `path`; the empty path yields `self`
    ///
    /// Direct indices always win. When a step is out of range on a power or
    /// list holding exactly one element, the step is applied to that element
    /// instead.
    pub fn get(&self, path: &[usize]) -> Option<Denotator> {
        let mut node = self.clone();
        for &step in path {
            node = match node.child(step) {
                Some(child) => child.clone(),
                None => node.only_element()?.child(step)?.clone(),
            };
        }
        Some(node)
    }

    /// Element of the simple denotator at `path`
    ///
    /// A power or list with exactly one element is looked through, so the
    /// path may stop above such a collection.
    pub fn get_element(&self, path: &[usize]) -> Option<ModuleElement> {
        let mut node = self.get(path)?;
        loop {
            if node.shape() == FormShape::Simple {
                return node.element();
            }
            node = node.only_element()?.clone();
        }
    }

    fn only_element(&self) -> Option<&Denotator> {
        match self.shape() {
            FormShape::Power | FormShape::List if self.factor_count() == 1 => self.factors().first(),
            _ => None,
        }
    }

    fn child(&self, step: usize) -> Option<&Denotator> {
        match &self.0.current {
            MorphismMap::Index(map) => (map.index() == step).then(|| map.factor()),
            map => map.factors().get(step),
        }
    }

    /// Copy with the sub-denotator at `path` replaced
    ///
    /// The replacement must have the form of the node it replaces and is
    /// moved to its address. A one-step path into a colimit may name a
    /// branch other than the selected one, switching the branch. Power
    /// elements are re-sorted after the replacement.
    pub fn replace(&self, path: &[usize], replacement: Denotator) -> DenotatorResult<Denotator> {
        self.replace_at(path, 0, replacement)
    }

    fn replace_at(&self, path: &[usize], depth: usize, replacement: Denotator) -> DenotatorResult<Denotator> {
        let Some(&step) = path.get(depth) else {
            return conform(self.form(), replacement, &self.address());
        };
        let last = depth + 1 == path.len();
        let payload = match &self.0.current {
            MorphismMap::List(map) => {
                let child = self.path_child(step, depth)?;
                let new_child = child.replace_at(path, depth + 1, replacement)?;
                let updated = map.with_factor(step, new_child);
                if let Some(updated) = &updated {
                    check_arrows(self.form(), updated.factors())?;
                }
                updated.map(MorphismMap::List)
            }
            MorphismMap::Index(map) if map.index() == step => {
                let new_child = map.factor().replace_at(path, depth + 1, replacement)?;
                Some(MorphismMap::Index(IndexMorphismMap::new(step, new_child)))
            }
            MorphismMap::Index(_) if last && step < self.form().coordinate_count() => {
                let coordinate = self.form().required_coordinate(step)?;
                let new_child = conform(&coordinate, replacement, &self.address())?;
                Some(MorphismMap::Index(IndexMorphismMap::new(step, new_child)))
            }
            MorphismMap::Index(map) => {
                return Err(if step < self.form().coordinate_count() {
                    DenotatorError::InvalidPath {
                        depth,
                        reason: format!("branch {step} is not selected (selected: {})", map.index()),
                    }
                } else {
                    DenotatorError::PathOutOfRange { index: step, bound: self.form().coordinate_count(), depth }
                });
            }
            MorphismMap::AutoList(map) => {
                let child = self.path_child(step, depth)?;
                let new_child = child.replace_at(path, depth + 1, replacement)?;
                let mut map = map.clone();
                map.replace(child, new_child);
                Some(MorphismMap::AutoList(map))
            }
            MorphismMap::Sequence(map) => {
                let child = self.path_child(step, depth)?;
                let new_child = child.replace_at(path, depth + 1, replacement)?;
                let mut map = map.clone();
                map.set(step, new_child);
                Some(MorphismMap::Sequence(map))
            }
            MorphismMap::Constant(_) | MorphismMap::Module(_) | MorphismMap::Empty(_) => None,
        };
        let payload = payload.ok_or_else(|| self.leaf_error(depth))?;
        Ok(self.with_maps(None, payload))
    }

    /// Post-compose the simple parts reached by `path` with `morphism`
    ///
    /// Limit and colimit steps consume a path index; powers and lists apply
    /// the rest of the path to every element. The path must end exactly at
    /// simple denotators, and `morphism` must be an endomorphism of their
    /// module.
    pub fn map(&self, path: &[usize], morphism: &ModuleMorphism) -> DenotatorResult<Denotator> {
        self.map_at(path, 0, morphism)
    }

    fn map_at(&self, path: &[usize], depth: usize, morphism: &ModuleMorphism) -> DenotatorResult<Denotator> {
        let payload = match &self.0.current {
            MorphismMap::Constant(_) | MorphismMap::Module(_) => {
                if depth < path.len() {
                    return Err(self.leaf_error(depth));
                }
                return self.post_compose(morphism);
            }
            MorphismMap::Empty(_) => return Err(self.leaf_error(depth)),
            MorphismMap::AutoList(map) => {
                let mapped = map
                    .factors()
                    .iter()
                    .map(|f| f.map_at(path, depth, morphism))
                    .collect::<DenotatorResult<Vec<_>>>()?;
                MorphismMap::AutoList(AutoListMorphismMap::new(mapped))
            }
            MorphismMap::Sequence(map) => {
                let mapped = map
                    .factors()
                    .iter()
                    .map(|f| f.map_at(path, depth, morphism))
                    .collect::<DenotatorResult<Vec<_>>>()?;
                MorphismMap::Sequence(SequenceMorphismMap::new(mapped))
            }
            MorphismMap::List(map) => {
                let step = self.path_step(path, depth)?;
                let child = self.path_child(step, depth)?;
                let new_child = child.map_at(path, depth + 1, morphism)?;
                let updated = map.with_factor(step, new_child).ok_or_else(|| self.leaf_error(depth))?;
                check_arrows(self.form(), updated.factors())?;
                MorphismMap::List(updated)
            }
            MorphismMap::Index(map) => {
                let step = self.path_step(path, depth)?;
                let child = self.path_child(step, depth)?;
                MorphismMap::Index(IndexMorphismMap::new(map.index(), child.map_at(path, depth + 1, morphism)?))
            }
        };
        Ok(self.with_maps(None, payload))
    }

    fn post_compose(&self, morphism: &ModuleMorphism) -> DenotatorResult<Denotator> {
        let module = self.form().module().ok_or(DenotatorError::ShapeMismatch {
            expected: FormShape::Simple,
            actual: self.shape(),
        })?;
        if morphism.domain() != module || morphism.codomain() != module {
            let actual = if morphism.domain() != module { morphism.domain() } else { morphism.codomain() };
            return Err(DenotatorError::ModuleMismatch { expected: module, actual });
        }
        let current = self.module_morphism().ok_or_else(|| self.leaf_error(0))?;
        let mapped = morphism.compose(&current)?;
        Denotator::simple_with_morphism(self.name(), self.form(), mapped)?
            .change_address(&self.address())
    }

    fn path_step(&self, path: &[usize], depth: usize) -> DenotatorResult<usize> {
        path.get(depth).copied().ok_or_else(|| DenotatorError::InvalidPath {
            depth,
            reason: format!("path ends at {} denotator", self.shape()),
        })
    }

    fn path_child(&self, step: usize, depth: usize) -> DenotatorResult<&Denotator> {
        self.child(step).ok_or_else(|| match self.index() {
            Some(selected) if step < self.form().coordinate_count() => DenotatorError::InvalidPath {
                depth,
                reason: format!("branch {step} is not selected (selected: {selected})"),
            },
            Some(_) => DenotatorError::PathOutOfRange { index: step, bound: self.form().coordinate_count(), depth },
            None => DenotatorError::PathOutOfRange { index: step, bound: self.factor_count(), depth },
        })
    }

    fn leaf_error(&self, depth: usize) -> DenotatorError {
        let reason = if self.is_forward_reference() {
            "path reaches an unresolved reference".to_owned()
        } else {
            format!("path continues past a {} denotator", self.shape())
        };
        DenotatorError::InvalidPath { depth, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Module, Scalar};
    use crate::form::Form;
    use pretty_assertions::assert_eq;

    fn int() -> Form {
        Form::simple(Some("Int"), Module::integers(1))
    }

    fn n(value: i64) -> Denotator {
        Denotator::simple(None, &int(), ModuleElement::integer(value)).unwrap()
    }

    fn note(pitch: i64, onset: i64) -> Denotator {
        let f = Form::limit(Some("Note"), vec![int().into(), int().into()], None).unwrap();
        Denotator::limit(None, &Module::null(), &f, vec![n(pitch), n(onset)]).unwrap()
    }

    fn score(notes: Vec<Denotator>) -> Denotator {
        let note_form = note(0, 0).form().clone();
        let f = Form::power(Some("Score"), note_form);
        Denotator::power(None, &Module::null(), &f, notes).unwrap()
    }

    #[test]
    fn test_get_walks_factors() {
        let s = score(vec![note(60, 0), note(62, 1)]);
        assert_eq!(s.get(&[1, 0]).unwrap().element(), Some(ModuleElement::integer(62)));
        assert!(s.get(&[]).unwrap().ptr_eq(&s));
        assert!(s.get(&[2]).is_none());
        let single = score(vec![note(60, 0)]);
        assert_eq!(single.get(&[1]).unwrap().element(), Some(ModuleElement::integer(0)));
        assert!(s.get(&[0, 0, 0]).is_none());
    }

    #[test]
    fn test_get_element_looks_through_singletons() {
        let set = Form::power(Some("Set"), int());
        let single = Denotator::power(None, &Module::null(), &set, vec![n(9)]).unwrap();
        assert_eq!(single.get_element(&[]), Some(ModuleElement::integer(9)));
        assert_eq!(single.get_element(&[0]), Some(ModuleElement::integer(9)));
        let two = Denotator::power(None, &Module::null(), &set, vec![n(9), n(8)]).unwrap();
        assert_eq!(two.get_element(&[]), None);
    }

    #[test]
    fn test_replace_then_get() {
        let s = score(vec![note(60, 0), note(62, 1)]);
        let t = s.replace(&[0, 0], n(72)).unwrap();
        assert_eq!(t.get(&[1, 0]).unwrap().element(), Some(ModuleElement::integer(72)));
        assert_eq!(s.get(&[0, 0]).unwrap().element(), Some(ModuleElement::integer(60)));
    }

    #[test]
    fn test_replace_checks_forms_and_paths() {
        let s = score(vec![note(60, 0)]);
        assert!(matches!(s.replace(&[0], n(1)), Err(DenotatorError::FormMismatch { .. })));
        assert!(matches!(s.replace(&[3], note(1, 1)), Err(DenotatorError::PathOutOfRange { index: 3, bound: 1, depth: 0 })));
        assert!(matches!(s.replace(&[0, 0, 0], n(1)), Err(DenotatorError::InvalidPath { depth: 2, .. })));
    }

    #[test]
    fn test_replace_switches_colimit_branches() {
        let real = Form::simple(Some("Real"), Module::reals(1));
        let either = Form::colimit(Some("Either"), vec![int().into(), (&real).into()], None).unwrap();
        let d = Denotator::colimit(None, &Module::null(), &either, 0, n(1)).unwrap();
        let r = Denotator::simple(None, &real, ModuleElement::real(0.5)).unwrap();
        let switched = d.replace(&[1], r).unwrap();
        assert_eq!(switched.index(), Some(1));
        assert!(switched.check());
    }

    #[test]
    fn test_map_applies_to_every_collection_element() {
        let s = score(vec![note(60, 0), note(62, 1)]);
        let up = ModuleMorphism::translation(ModuleElement::integer(12));
        let t = s.map(&[0], &up).unwrap();
        let pitches: Vec<_> = t.factors().iter().filter_map(|f| f.get_element(&[0])).collect();
        assert_eq!(pitches, vec![ModuleElement::integer(72), ModuleElement::integer(74)]);
        let onsets: Vec<_> = t.factors().iter().filter_map(|f| f.get_element(&[1])).collect();
        assert_eq!(onsets, vec![ModuleElement::integer(0), ModuleElement::integer(1)]);
    }

    #[test]
    fn test_map_requires_an_endomorphism_of_the_leaf() {
        let s = score(vec![note(60, 0)]);
        let to_real = ModuleMorphism::embedding(Module::integers(1), Module::reals(1)).unwrap();
        assert!(s.map(&[0], &to_real).unwrap_err().is_address_error());
        let triple = ModuleMorphism::scaling(Module::integers(1), Scalar::Integer(3)).unwrap();
        assert!(s.map(&[], &triple).unwrap_err().is_path_error());
    }
}
