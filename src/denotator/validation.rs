// Copyright 2025 Cowboy AI, LLC.

//! Structural self-checks

use tracing::warn;

use super::Denotator;
use crate::algebra::ModuleElement;
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::{Form, FormShape};
use crate::morphism_map::{CoordinateMap, MorphismMap};
use crate::registry::NameRegistry;
use crate::traversal::Visited;

impl Denotator {
    /// Shallow consistency check of this node
    ///
    /// The payload must match the form shape, every factor must have the
    /// coordinate form it sits in and share this denotator's address, power
    /// elements must be strictly increasing and limit factors must satisfy
    /// the arrows of the form diagram. Factors are not checked recursively;
    /// see [`Denotator::is_valid`].
    pub fn check(&self) -> bool {
        let form = self.form();
        match (self.shape(), &self.0.current) {
            (FormShape::Simple, MorphismMap::Constant(map)) => {
                self.0.address.is_null() && self.value_fits(map.element())
            }
            (FormShape::Simple, MorphismMap::Module(map)) => {
                let m = map.morphism();
                m.domain() == self.0.address
                    && Some(m.codomain()) == form.module()
                    && (!m.is_constant() || map.element().is_ok_and(|v| self.value_fits(&v)))
            }
            (FormShape::Limit, MorphismMap::List(map)) => {
                map.factor_count() == form.coordinate_count()
                    && map.factors().iter().enumerate().all(|(i, f)| self.fits(i, f))
                    && broken_arrow(form, map.factors()).is_none()
            }
            (FormShape::Colimit, MorphismMap::Index(map)) => self.fits(map.index(), map.factor()),
            (FormShape::Power, MorphismMap::AutoList(map)) => {
                map.factors().iter().all(|f| self.fits(0, f))
                    && map.factors().windows(2).all(|w| w[0] < w[1])
            }
            (FormShape::List, MorphismMap::Sequence(map)) => map.factors().iter().all(|f| self.fits(0, f)),
            _ => false,
        }
    }

    /// Recursive [`check`](Denotator::check) over the whole value
    ///
    /// Unresolved placeholders make a denotator invalid.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(&mut Visited::new(), false)
    }

    /// Like [`is_valid`](Denotator::is_valid), but placeholders are accepted
    /// where their form fits
    pub fn is_well_formed(&self) -> bool {
        self.is_valid_with(&mut Visited::new(), true)
    }

    fn is_valid_with(&self, visited: &mut Visited, allow_placeholders: bool) -> bool {
        if !visited.insert(self.id()) || (allow_placeholders && self.is_forward_reference()) {
            return true;
        }
        if !self.check() {
            warn!(denotator = %self, "denotator failed validation");
            return false;
        }
        self.factors().iter().all(|f| f.is_valid_with(visited, allow_placeholders))
    }

    /// Equality using the registered-name shortcut for forms
    pub fn equals_in(&self, other: &Denotator, registry: &NameRegistry) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if !self.form().equals_in(other.form(), registry)
            || self.name() != other.name()
            || self.address() != other.address()
        {
            return false;
        }
        let (left, right) = (self.factors(), other.factors());
        match (&self.0.current, &other.0.current) {
            (MorphismMap::Index(a), MorphismMap::Index(b)) if a.index() != b.index() => false,
            (a, b) if a.shape() == Some(FormShape::Simple) || b.shape() == Some(FormShape::Simple) => a == b,
            (a, b) if std::mem::discriminant(a) != std::mem::discriminant(b) => false,
            _ => left.len() == right.len() && left.iter().zip(right).all(|(x, y)| x.equals_in(y, registry)),
        }
    }

    fn fits(&self, coordinate: usize, factor: &Denotator) -> bool {
        self.form()
            .coordinate_form(coordinate)
            .is_some_and(|f| f.full_eq(factor.form()))
            && factor.address() == self.0.address
    }

    fn value_fits(&self, value: &ModuleElement) -> bool {
        let form = self.form();
        form.module().is_some_and(|m| m.contains(value))
            && form.bounds().map_or(true, |b| b.contains(value))
    }

}

/// First arrow `i -> j` of the diagram of `form` that does not carry the
/// value of factor `i` to the value of factor `j`
///
/// Only simple constants are compared; addressed factors have no single
/// value to check.
fn broken_arrow(form: &Form, factors: &[Denotator]) -> Option<(usize, usize)> {
    let diagram = form.diagram()?;
    diagram
        .all_arrows()
        .find(|(from, to, arrow)| {
            let (Some(x), Some(y)) = (factors.get(*from), factors.get(*to)) else {
                return true;
            };
            if !x.is_constant_simple() || !y.is_constant_simple() {
                return false;
            }
            match (x.element(), y.element()) {
                (Some(u), Some(v)) => !arrow.apply(&u).is_ok_and(|image| image == v),
                _ => false,
            }
        })
        .map(|(from, to, _)| (from, to))
}

/// Limit factors for `form` that satisfy every diagram arrow
pub(super) fn check_arrows(form: &Form, factors: &[Denotator]) -> DenotatorResult<()> {
    match broken_arrow(form, factors) {
        Some((from, to)) => Err(DenotatorError::ArrowViolation { form: form.clone(), from, to }),
        None => Ok(()),
    }
}
