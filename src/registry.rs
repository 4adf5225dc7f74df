// Copyright 2025 Cowboy AI, LLC.

//! Name registry
//!
//! A caller-owned dictionary of named forms and denotators. Loaders build
//! forms that refer to each other by name, register them, and then run a
//! resolution pass which patches every forward reference. The registry
//! owns registered forms; links from coordinate slots are weak, so a form
//! that contains itself is freed together with its registry.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::denotator::Denotator;
use crate::errors::{DenotatorError, DenotatorResult, ReferenceKind};
use crate::form::Form;
use crate::traversal::Visited;

/// A value together with the errors met while resolving it
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// Resolved value; unresolvable parts are left in place
    pub value: T,
    /// One entry per reference that could not be bound
    pub errors: Vec<DenotatorError>,
}

impl<T> Resolution<T> {
    /// True when every reference was bound
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of a registry-wide resolution pass
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// Registered forms that were walked
    pub forms: usize,
    /// Registered denotators that were walked
    pub denotators: usize,
    /// Distinct unresolved references
    pub errors: Vec<DenotatorError>,
}

impl ResolutionReport {
    /// True when nothing was left unresolved
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn absorb(&mut self, errors: Vec<DenotatorError>) {
        let mut seen: HashSet<String> = self.errors.iter().map(ToString::to_string).collect();
        for err in errors {
            if seen.insert(err.to_string()) {
                self.errors.push(err);
            }
        }
    }
}

/// Registered forms and denotators, by name
#[derive(Debug, Default)]
pub struct NameRegistry {
    config: RegistryConfig,
    forms: IndexMap<String, Form>,
    denotators: IndexMap<String, Denotator>,
}

impl NameRegistry {
    /// Empty registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry with `config`
    pub fn with_config(config: RegistryConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register `form` under its name
    ///
    /// Registering the same handle twice is a no-op. A different form under
    /// a taken name is refused unless redefinition is allowed.
    pub fn register_form(&mut self, form: Form) -> DenotatorResult<()> {
        let name = form
            .name()
            .ok_or(DenotatorError::AnonymousRegistration(ReferenceKind::Form))?
            .to_owned();
        if let Some(existing) = self.forms.get(&name) {
            if existing.ptr_eq(&form) {
                return Ok(());
            }
            if !self.config.allow_redefinition {
                return Err(DenotatorError::AlreadyRegistered(name));
            }
            warn!(form = %name, "redefining registered form");
        }
        debug!(form = %name, shape = %form.shape(), "registered form");
        self.forms.insert(name, form);
        Ok(())
    }

    /// Register `denotator` under its name
    pub fn register_denotator(&mut self, denotator: Denotator) -> DenotatorResult<()> {
        let name = denotator
            .name()
            .ok_or(DenotatorError::AnonymousRegistration(ReferenceKind::Denotator))?
            .to_owned();
        if let Some(existing) = self.denotators.get(&name) {
            if existing.ptr_eq(&denotator) {
                return Ok(());
            }
            if !self.config.allow_redefinition {
                return Err(DenotatorError::AlreadyRegistered(name));
            }
            warn!(denotator = %name, "redefining registered denotator");
        }
        if self.config.validate_on_register && !denotator.is_well_formed() {
            return Err(DenotatorError::InvalidDenotator(denotator.to_string()));
        }
        debug!(denotator = %name, form = %denotator.form(), "registered denotator");
        self.denotators.insert(name, denotator);
        Ok(())
    }

    /// Form registered as `name`
    pub fn form(&self, name: &str) -> Option<Form> {
        self.forms.get(name).cloned()
    }

    /// Denotator registered as `name`
    pub fn denotator(&self, name: &str) -> Option<Denotator> {
        self.denotators.get(name).cloned()
    }

    /// True when `form` is the very form registered under its name
    pub fn is_registered_form(&self, form: &Form) -> bool {
        form.name()
            .and_then(|name| self.forms.get(name))
            .is_some_and(|registered| registered.ptr_eq(form))
    }

    /// True when `denotator` is the very denotator registered under its name
    pub fn is_registered_denotator(&self, denotator: &Denotator) -> bool {
        denotator
            .name()
            .and_then(|name| self.denotators.get(name))
            .is_some_and(|registered| registered.ptr_eq(denotator))
    }

    /// Registered forms in registration order
    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        self.forms.values()
    }

    /// Registered denotators in registration order
    pub fn denotators(&self) -> impl Iterator<Item = &Denotator> {
        self.denotators.values()
    }

    /// Bind forward references inside every registered form
    pub fn resolve_forms(&self) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        for form in self.forms.values() {
            report.forms += 1;
            report.absorb(form.resolve_references(self));
        }
        debug!(forms = report.forms, errors = report.errors.len(), "resolved forms");
        report
    }

    /// Replace placeholders inside every registered denotator
    ///
    /// Denotators are resolved in registration order and each one sees the
    /// already resolved versions of the ones before it.
    pub fn resolve_denotators(&mut self) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        for i in 0..self.denotators.len() {
            let Some(current) = self.denotators.get_index(i).map(|(_, d)| d.clone()) else {
                continue;
            };
            let resolution = current.resolve_references(self);
            report.denotators += 1;
            report.absorb(resolution.errors);
            if !resolution.value.ptr_eq(&current) {
                if let Some((_, slot)) = self.denotators.get_index_mut(i) {
                    *slot = resolution.value;
                }
            }
        }
        debug!(denotators = report.denotators, errors = report.errors.len(), "resolved denotators");
        report
    }

    /// Resolve forms, then denotators
    ///
    /// With `fail_on_unresolved` set, the first unresolved reference is
    /// returned as an error after the whole pass has run.
    pub fn resolve_all(&mut self) -> DenotatorResult<ResolutionReport> {
        let mut report = self.resolve_forms();
        let denotators = self.resolve_denotators();
        report.denotators = denotators.denotators;
        report.absorb(denotators.errors);
        for err in &report.errors {
            warn!(error = %err, "unresolved reference");
        }
        match report.errors.first() {
            Some(err) if self.config.fail_on_unresolved => Err(err.clone()),
            _ => Ok(report),
        }
    }

    /// Registered forms and their dependencies, dependencies first
    ///
    /// Forms on a cycle appear once, in the order the walk first finishes
    /// them.
    pub fn dependency_order(&self) -> Vec<Form> {
        fn visit(form: &Form, visited: &mut Visited, out: &mut Vec<Form>) {
            if !visited.insert(form.id()) {
                return;
            }
            for i in 0..form.coordinate_count() {
                if let Some(coordinate) = form.coordinate_form(i) {
                    visit(&coordinate, visited, out);
                }
            }
            out.push(form.clone());
        }

        let mut visited = Visited::new();
        let mut out = Vec::new();
        for form in self.forms.values() {
            visit(form, &mut visited, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Module, ModuleElement};
    use crate::form::FormRef;
    use pretty_assertions::assert_eq;

    fn int() -> Form {
        Form::simple(Some("Int"), Module::integers(1))
    }

    #[test]
    fn test_names_are_unique_unless_redefinition_is_allowed() {
        let mut registry = NameRegistry::new();
        let int = int();
        registry.register_form(int.clone()).unwrap();
        registry.register_form(int.clone()).unwrap();
        assert!(matches!(registry.register_form(self::int()), Err(DenotatorError::AlreadyRegistered(_))));

        let mut lenient = NameRegistry::with_config(RegistryConfig { allow_redefinition: true, ..Default::default() });
        lenient.register_form(int).unwrap();
        let replacement = self::int();
        lenient.register_form(replacement.clone()).unwrap();
        assert!(lenient.is_registered_form(&replacement));
    }

    #[test]
    fn test_anonymous_objects_are_refused() {
        let mut registry = NameRegistry::new();
        let anonymous = Form::simple(None, Module::integers(1));
        assert!(matches!(
            registry.register_form(anonymous.clone()),
            Err(DenotatorError::AnonymousRegistration(ReferenceKind::Form))
        ));
        let d = Denotator::simple(None, &anonymous, ModuleElement::integer(1)).unwrap();
        assert!(registry.register_denotator(d).is_err());
    }

    #[test]
    fn test_forward_form_references_are_linked() {
        let mut registry = NameRegistry::new();
        let pair = Form::limit(Some("Pair"), vec![FormRef::named("Int"), FormRef::named("Int")], None).unwrap();
        registry.register_form(pair.clone()).unwrap();

        let report = registry.resolve_forms();
        assert_eq!(report.errors.len(), 1);
        assert!(!pair.is_resolved());

        registry.register_form(int()).unwrap();
        let report = registry.resolve_all().unwrap();
        assert!(report.is_clean());
        assert!(pair.is_resolved());
        assert!(pair.coordinate_form(1).unwrap().full_eq(&int()));
    }

    #[test]
    fn test_strict_registries_fail_on_leftovers() {
        let mut registry = NameRegistry::with_config(RegistryConfig::strict());
        let open = Form::list(Some("Open"), FormRef::named("Nowhere"));
        registry.register_form(open).unwrap();
        let err = registry.resolve_all().unwrap_err();
        assert!(matches!(err, DenotatorError::UnresolvedReference { kind: ReferenceKind::Form, .. }));
    }

    #[test]
    fn test_self_referential_forms_terminate() {
        let mut registry = NameRegistry::new();
        let tree = Form::list(Some("Tree"), FormRef::named("Tree"));
        registry.register_form(tree.clone()).unwrap();
        assert!(registry.resolve_all().unwrap().is_clean());

        assert!(tree.is_recursive());
        assert!(tree.full_eq(&registry.form("Tree").unwrap()));
        let mut deps = Vec::new();
        tree.dependencies(&mut deps);
        assert_eq!(deps.len(), 1);
        assert_eq!(tree.describe(), "Tree: list\n  -> Tree\n");

        let leaf = tree.default_denotator(None).unwrap();
        let mut node = leaf.clone();
        node.append_factor(leaf).unwrap();
        assert!(node.is_valid());
    }

    #[test]
    fn test_dependency_order_puts_coordinates_first() {
        let mut registry = NameRegistry::new();
        let int = int();
        let set = Form::power(Some("Set"), &int);
        registry.register_form(set).unwrap();
        registry.register_form(int).unwrap();
        let names: Vec<_> = registry.dependency_order().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["Int", "Set"]);
    }

    #[test]
    fn test_placeholders_may_be_registered() {
        let mut registry = NameRegistry::new();
        let seq = Form::list(Some("Seq"), int());
        let placeholder = Denotator::forward_reference("later", &int());
        let d = Denotator::list(Some("melody"), &Module::null(), &seq, vec![placeholder]).unwrap();
        registry.register_denotator(d.clone()).unwrap();
        assert!(registry.is_registered_denotator(&d));
        assert_eq!(registry.resolve_all().unwrap().errors.len(), 1);
    }
}
