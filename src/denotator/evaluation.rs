// Copyright 2025 Cowboy AI, LLC.

//! Evaluation and change of address

use tracing::trace;

use super::Denotator;
use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::errors::{DenotatorError, DenotatorResult};
use crate::morphism_map::{CoordinateMap, MorphismMap};

impl Denotator {
    /// Evaluate at `element` of the address, yielding a plain value
    ///
    /// Simple parts collapse to constants on the same address. Evaluating an
    /// already evaluated denotator starts again from its template. When
    /// nothing changes the same handle is returned, so constants and
    /// null-addressed denotators come back untouched.
    pub fn at(&self, element: &ModuleElement) -> DenotatorResult<Denotator> {
        if self.0.address.is_null() {
            return Ok(self.clone());
        }
        self.expect_point(element)?;
        match self.template_map().at(element)? {
            Some(evaluated) => Ok(self.with_maps(None, evaluated)),
            None if self.0.frame.is_some() => Ok(self.with_maps(None, self.template_map().clone())),
            None => Ok(self.clone()),
        }
    }

    /// Evaluate at `element`, keeping the template for later re-evaluation
    pub fn evaluate(&self, element: &ModuleElement) -> DenotatorResult<Denotator> {
        if self.0.address.is_null() {
            return Ok(self.clone());
        }
        self.expect_point(element)?;
        let template = self.template_map();
        let Some(evaluated) = template.at(element)? else {
            return Ok(self.template());
        };
        if self.0.frame.is_some() && evaluated == self.0.current {
            return Ok(self.clone());
        }
        trace!(denotator = %self, "evaluated");
        Ok(self.with_maps(Some(template.clone()), evaluated))
    }

    /// The unevaluated denotator this one was produced from
    pub fn template(&self) -> Denotator {
        match &self.0.frame {
            Some(frame) => self.with_maps(None, frame.clone()),
            None => self.clone(),
        }
    }

    /// True when this denotator retains an evaluation template
    pub fn is_evaluated(&self) -> bool {
        self.0.frame.is_some()
    }

    fn template_map(&self) -> &MorphismMap {
        self.0.frame.as_ref().unwrap_or(&self.0.current)
    }

    fn expect_point(&self, element: &ModuleElement) -> DenotatorResult<()> {
        if element.module() != self.0.address {
            return Err(DenotatorError::AddressMismatch {
                expected: self.0.address,
                actual: element.module(),
            });
        }
        Ok(())
    }

    /// Move to `address` through the canonical morphism
    ///
    /// Every simple part is re-based; if any of them has no canonical
    /// morphism the whole call fails. Moving to the current address returns
    /// the same handle.
    pub fn change_address(&self, address: &Module) -> DenotatorResult<Denotator> {
        if self.0.address == *address {
            return Ok(self.clone());
        }
        let current = self.0.current.change_address(address)?;
        let frame = self.0.frame.as_ref().map(|f| f.change_address(address)).transpose()?;
        Ok(self.rebuild(*address, frame, current))
    }

    /// Move along `morphism: B -> address`, giving a denotator at `B`
    pub fn change_address_by(&self, morphism: &ModuleMorphism) -> DenotatorResult<Denotator> {
        if morphism.codomain() != self.0.address {
            return Err(DenotatorError::AddressMismatch {
                expected: self.0.address,
                actual: morphism.codomain(),
            });
        }
        if morphism.is_identity() {
            return Ok(self.clone());
        }
        let current = self.0.current.change_address_by(morphism)?;
        let frame = self.0.frame.as_ref().map(|f| f.change_address_by(morphism)).transpose()?;
        Ok(self.rebuild(morphism.domain(), frame, current))
    }
}
