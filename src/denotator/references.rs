// Copyright 2025 Cowboy AI, LLC.

//! Dependency walks and forward-reference resolution

use tracing::{debug, trace};

use super::Denotator;
use crate::errors::{DenotatorError, ReferenceKind};
use crate::morphism_map::CoordinateMap;
use crate::registry::{NameRegistry, Resolution};
use crate::traversal::Visited;

impl Denotator {
    /// Append this denotator and every factor below it, each one once
    ///
    /// Denotators already in `deps` are skipped, so the list can be
    /// accumulated over several roots.
    pub fn dependencies(&self, deps: &mut Vec<Denotator>) {
        let mut visited = Visited::new();
        for d in deps.iter() {
            visited.insert(d.id());
        }
        self.collect_dependencies(deps, &mut visited);
    }

    fn collect_dependencies(&self, deps: &mut Vec<Denotator>, visited: &mut Visited) {
        if !visited.insert(self.id()) {
            return;
        }
        deps.push(self.clone());
        for factor in self.factors() {
            factor.collect_dependencies(deps, visited);
        }
    }

    /// Names of the placeholders still waiting for resolution
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut deps = Vec::new();
        self.dependencies(&mut deps);
        deps.iter()
            .filter(|d| d.is_forward_reference())
            .filter_map(|d| d.name().map(str::to_owned))
            .collect()
    }

    /// Replace placeholders with the denotators registered under their names
    ///
    /// Forms reachable from this denotator are resolved first. Every missing
    /// name yields one error; everything that can be bound is bound.
    pub fn resolve_references(&self, registry: &NameRegistry) -> Resolution<Denotator> {
        let mut errors = self.form().resolve_references(registry);
        let value = self.resolve_with(registry, &mut errors).unwrap_or_else(|| self.clone());
        debug!(denotator = %value, errors = errors.len(), "resolved denotator references");
        Resolution { value, errors }
    }

    /// Resolved copy of this denotator; `None` when nothing changes
    pub(crate) fn resolve_with(
        &self,
        registry: &NameRegistry,
        errors: &mut Vec<DenotatorError>,
    ) -> Option<Denotator> {
        if !self.is_forward_reference() {
            let current = self.0.current.resolve_references(registry, errors)?;
            return Some(self.with_maps(None, current));
        }
        let name = self.name().unwrap_or_default();
        let Some(target) = registry.denotator(name) else {
            errors.push(DenotatorError::unresolved(ReferenceKind::Denotator, name));
            return None;
        };
        if !target.form().equals_in(self.form(), registry) {
            errors.push(DenotatorError::FormMismatch {
                expected: self.form().clone(),
                actual: target.form().clone(),
            });
            return None;
        }
        match target.change_address(&self.address()) {
            Ok(bound) => {
                trace!(reference = %name, "linked denotator reference");
                Some(bound)
            }
            Err(err) => {
                errors.push(err);
                None
            }
        }
    }
}
