// Copyright 2025 Cowboy AI, LLC.

//! Forms: immutable type descriptors for denotators
//!
//! A form fixes the *shape* of its denotators:
//!
//! - **Simple** wraps one module (optionally bounded)
//! - **Limit** is a labeled tuple of coordinate forms
//! - **Colimit** is a labeled disjoint union with one selected branch
//! - **Power** is a sorted duplicate-free collection of one form
//! - **List** is an ordered sequence of one form
//!
//! Coordinates are [`FormRef`] slots arranged in a [`FormDiagram`]. Forms may
//! refer to themselves through named forward references, so every walk over
//! a form graph carries an identity memo and stops at nodes it has seen.

mod reference;

pub use reference::FormRef;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter, Write as _};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::algebra::{Module, ModuleElement};
use crate::denotator::Denotator;
use crate::diagram::FormDiagram;
use crate::errors::{DenotatorError, DenotatorResult, ReferenceKind};
use crate::registry::NameRegistry;
use crate::traversal::{identity, Visited, VisitedPairs};

/// The five form shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormShape {
    /// One base module
    Simple,
    /// Product of labeled coordinates
    Limit,
    /// Sum of labeled coordinates
    Colimit,
    /// Sorted set of one coordinate form
    Power,
    /// Sequence of one coordinate form
    List,
}

impl Display for FormShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormShape::Simple => "simple",
            FormShape::Limit => "limit",
            FormShape::Colimit => "colimit",
            FormShape::Power => "power",
            FormShape::List => "list",
        })
    }
}

/// Inclusive bounds of a simple form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bounds {
    /// Smallest admissible value
    pub lower: ModuleElement,
    /// Largest admissible value
    pub upper: ModuleElement,
}

impl Bounds {
    /// True when `value` lies within the bounds
    pub fn contains(&self, value: &ModuleElement) -> bool {
        self.lower <= *value && *value <= self.upper
    }
}

#[derive(Debug, Clone)]
struct Composite {
    diagram: FormDiagram,
    labels: Option<IndexMap<String, usize>>,
}

#[derive(Debug)]
enum FormBody {
    Simple { module: Module, bounds: Option<Bounds> },
    Limit(Composite),
    Colimit(Composite),
    Power(FormDiagram),
    List(FormDiagram),
}

#[derive(Debug)]
pub(crate) struct FormNode {
    name: Option<String>,
    body: FormBody,
}

/// An immutable, shareable form
///
/// Cloning a `Form` clones a handle; `ptr_eq` tells handles of the same form
/// apart from structurally equal copies.
#[derive(Clone)]
pub struct Form(pub(crate) Rc<FormNode>);

impl Form {
    fn from_parts(name: Option<&str>, body: FormBody) -> Self {
        Form(Rc::new(FormNode { name: name.map(str::to_owned), body }))
    }

    /// A simple form over `module`
    pub fn simple(name: Option<&str>, module: Module) -> Self {
        Self::from_parts(name, FormBody::Simple { module, bounds: None })
    }

    /// A simple form whose values must lie in `[lower, upper]`
    pub fn bounded_simple(
        name: Option<&str>,
        module: Module,
        lower: ModuleElement,
        upper: ModuleElement,
    ) -> DenotatorResult<Self> {
        for bound in [&lower, &upper] {
            if !module.contains(bound) {
                return Err(DenotatorError::ModuleMismatch { expected: module, actual: bound.module() });
            }
        }
        if lower > upper {
            return Err(DenotatorError::InvalidDiagram(format!(
                "lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        let bounds = Some(Bounds { lower, upper });
        Ok(Self::from_parts(name, FormBody::Simple { module, bounds }))
    }

    /// A limit (product) form over the given coordinates
    pub fn limit(
        name: Option<&str>,
        coordinates: Vec<FormRef>,
        labels: Option<Vec<String>>,
    ) -> DenotatorResult<Self> {
        Self::limit_with_diagram(name, FormDiagram::from_vertices(coordinates), labels)
    }

    /// A limit form over an explicit diagram; arrows constrain the factors
    pub fn limit_with_diagram(
        name: Option<&str>,
        diagram: FormDiagram,
        labels: Option<Vec<String>>,
    ) -> DenotatorResult<Self> {
        let composite = Composite::new(diagram, labels)?;
        Ok(Self::from_parts(name, FormBody::Limit(composite)))
    }

    /// A colimit (sum) form over the given coordinates
    pub fn colimit(
        name: Option<&str>,
        coordinates: Vec<FormRef>,
        labels: Option<Vec<String>>,
    ) -> DenotatorResult<Self> {
        Self::colimit_with_diagram(name, FormDiagram::from_vertices(coordinates), labels)
    }

    /// A colimit form over an explicit diagram
    pub fn colimit_with_diagram(
        name: Option<&str>,
        diagram: FormDiagram,
        labels: Option<Vec<String>>,
    ) -> DenotatorResult<Self> {
        if diagram.vertex_count() == 0 {
            return Err(DenotatorError::InvalidDiagram("colimit needs at least one coordinate".into()));
        }
        let composite = Composite::new(diagram, labels)?;
        Ok(Self::from_parts(name, FormBody::Colimit(composite)))
    }

    /// A power (set) form over `coordinate`
    pub fn power(name: Option<&str>, coordinate: impl Into<FormRef>) -> Self {
        let diagram = FormDiagram::from_vertices(vec![coordinate.into()]);
        Self::from_parts(name, FormBody::Power(diagram))
    }

    /// A power form from a one-vertex diagram
    pub fn power_with_diagram(name: Option<&str>, diagram: FormDiagram) -> DenotatorResult<Self> {
        expect_single_vertex(&diagram, FormShape::Power)?;
        Ok(Self::from_parts(name, FormBody::Power(diagram)))
    }

    /// A list (sequence) form over `coordinate`
    pub fn list(name: Option<&str>, coordinate: impl Into<FormRef>) -> Self {
        let diagram = FormDiagram::from_vertices(vec![coordinate.into()]);
        Self::from_parts(name, FormBody::List(diagram))
    }

    /// A list form from a one-vertex diagram
    pub fn list_with_diagram(name: Option<&str>, diagram: FormDiagram) -> DenotatorResult<Self> {
        expect_single_vertex(&diagram, FormShape::List)?;
        Ok(Self::from_parts(name, FormBody::List(diagram)))
    }

    /// Name of the form, `None` when anonymous
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Shape tag
    pub fn shape(&self) -> FormShape {
        match &self.0.body {
            FormBody::Simple { .. } => FormShape::Simple,
            FormBody::Limit(_) => FormShape::Limit,
            FormBody::Colimit(_) => FormShape::Colimit,
            FormBody::Power(_) => FormShape::Power,
            FormBody::List(_) => FormShape::List,
        }
    }

    /// True when both handles point at the same form
    pub fn ptr_eq(&self, other: &Form) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        identity(&self.0)
    }

    /// Base module of a simple form
    pub fn module(&self) -> Option<Module> {
        match &self.0.body {
            FormBody::Simple { module, .. } => Some(*module),
            _ => None,
        }
    }

    /// Bounds of a bounded simple form
    pub fn bounds(&self) -> Option<&Bounds> {
        match &self.0.body {
            FormBody::Simple { bounds, .. } => bounds.as_ref(),
            _ => None,
        }
    }

    /// Coordinate diagram of composite forms
    pub fn diagram(&self) -> Option<&FormDiagram> {
        match &self.0.body {
            FormBody::Simple { .. } => None,
            FormBody::Limit(c) | FormBody::Colimit(c) => Some(&c.diagram),
            FormBody::Power(d) | FormBody::List(d) => Some(d),
        }
    }

    /// 0 for simple, 1 for power and list, n for limit and colimit
    pub fn coordinate_count(&self) -> usize {
        self.diagram().map_or(0, FormDiagram::vertex_count)
    }

    /// Coordinate slot `index`
    pub fn coordinate_ref(&self, index: usize) -> Option<&FormRef> {
        self.diagram().and_then(|d| d.vertex(index))
    }

    /// Coordinate form `index`; `None` when out of range or unresolved
    pub fn coordinate_form(&self, index: usize) -> Option<Form> {
        self.coordinate_ref(index).and_then(FormRef::form)
    }

    /// Coordinate form under `label`
    pub fn coordinate_form_by_label(&self, label: &str) -> Option<Form> {
        self.label_to_index(label).and_then(|i| self.coordinate_form(i))
    }

    /// Index of `label`, parsing the label as a literal index when the form
    /// has no label map
    pub fn label_to_index(&self, label: &str) -> Option<usize> {
        let labels = match &self.0.body {
            FormBody::Limit(c) | FormBody::Colimit(c) => c.labels.as_ref(),
            _ => None,
        };
        let index = match labels {
            Some(map) => *map.get(label)?,
            None => label.parse().ok()?,
        };
        (index < self.coordinate_count()).then_some(index)
    }

    /// Label of coordinate `index`, or the index itself when unlabeled
    pub fn index_to_label(&self, index: usize) -> Option<String> {
        if index >= self.coordinate_count() {
            return None;
        }
        let labels = match &self.0.body {
            FormBody::Limit(c) | FormBody::Colimit(c) => c.labels.as_ref(),
            _ => None,
        };
        Some(match labels {
            Some(map) => map.get_index(index).map(|(label, _)| label.clone())?,
            None => index.to_string(),
        })
    }

    /// True when the form carries a label map
    pub fn has_labels(&self) -> bool {
        matches!(&self.0.body, FormBody::Limit(c) | FormBody::Colimit(c) if c.labels.is_some())
    }

    fn coordinate_refs(&self) -> impl Iterator<Item = &FormRef> {
        self.diagram().into_iter().flat_map(|d| d.vertices())
    }

    /// Structural equality with a visited-pair memo
    pub fn full_eq(&self, other: &Form) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Total order: name, shape, then structure
    pub fn compare(&self, other: &Form) -> Ordering {
        compare_forms(self, other, &mut VisitedPairs::new())
    }

    /// Equality with the registered-name shortcut
    ///
    /// When both forms are the ones registered under their names in
    /// `registry`, names decide; otherwise the comparison is structural.
    pub fn equals_in(&self, other: &Form, registry: &NameRegistry) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if registry.is_registered_form(self) && registry.is_registered_form(other) {
            return self.name() == other.name();
        }
        self.full_eq(other)
    }

    /// Append this form and everything it depends on, each form once
    ///
    /// Forms already in `deps` are not visited again, so the list can be
    /// accumulated over several roots.
    pub fn dependencies(&self, deps: &mut Vec<Form>) {
        let mut visited = Visited::new();
        for form in deps.iter() {
            visited.insert(form.id());
        }
        self.collect_dependencies(deps, &mut visited);
    }

    fn collect_dependencies(&self, deps: &mut Vec<Form>, visited: &mut Visited) {
        if !visited.insert(self.id()) {
            return;
        }
        deps.push(self.clone());
        for coordinate in self.coordinate_refs() {
            if let Some(form) = coordinate.form() {
                form.collect_dependencies(deps, visited);
            }
        }
    }

    /// True when every coordinate slot reachable from this form is resolved
    pub fn is_resolved(&self) -> bool {
        let mut deps = Vec::new();
        self.dependencies(&mut deps);
        deps.iter().all(|f| f.coordinate_refs().all(|c| !c.is_pending()))
    }

    /// True when the form graph reachable from here contains a cycle
    pub fn is_recursive(&self) -> bool {
        fn visit(form: &Form, on_stack: &mut HashSet<usize>, done: &mut Visited) -> bool {
            let id = form.id();
            if on_stack.contains(&id) {
                return true;
            }
            if done.contains(id) {
                return false;
            }
            on_stack.insert(id);
            let cyclic = form
                .coordinate_refs()
                .filter_map(FormRef::form)
                .any(|c| visit(&c, on_stack, done));
            on_stack.remove(&id);
            done.insert(id);
            cyclic
        }
        visit(self, &mut HashSet::new(), &mut Visited::new())
    }

    /// Bind forward references against `registry`
    ///
    /// Every pending slot reachable from this form is looked up by name;
    /// each name that cannot be found yields one error and the rest of the
    /// graph is still resolved.
    pub fn resolve_references(&self, registry: &NameRegistry) -> Vec<DenotatorError> {
        let mut errors = Vec::new();
        let mut visited = Visited::new();
        self.resolve_into(registry, &mut visited, &mut errors);
        errors
    }

    fn resolve_into(
        &self,
        registry: &NameRegistry,
        visited: &mut Visited,
        errors: &mut Vec<DenotatorError>,
    ) {
        if !visited.insert(self.id()) {
            return;
        }
        for coordinate in self.coordinate_refs() {
            if coordinate.is_pending() {
                let name = coordinate.reference_name().unwrap_or_default();
                match registry.form(&name) {
                    Some(target) => {
                        trace!(form = %self, reference = %name, "linked form reference");
                        coordinate.link(&target);
                    }
                    None => {
                        errors.push(DenotatorError::unresolved(ReferenceKind::Form, name));
                        continue;
                    }
                }
            }
            if let Some(form) = coordinate.form() {
                form.resolve_into(registry, visited, errors);
            }
        }
    }

    /// Indented, cycle-safe rendering of the form graph
    ///
    /// A form met a second time is printed as `-> Name` instead of being
    /// expanded again.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let mut visited = Visited::new();
        self.describe_into(&mut out, 0, None, &mut visited);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize, label: Option<String>, visited: &mut Visited) {
        let indent = "  ".repeat(depth);
        let prefix = label.map(|l| format!("{l}: ")).unwrap_or_default();
        if !visited.insert(self.id()) {
            let _ = writeln!(out, "{indent}{prefix}-> {self}");
            return;
        }
        match &self.0.body {
            FormBody::Simple { module, bounds: Some(b) } => {
                let _ = writeln!(out, "{indent}{prefix}{self}: simple({module}) [{} .. {}]", b.lower, b.upper);
            }
            FormBody::Simple { module, .. } => {
                let _ = writeln!(out, "{indent}{prefix}{self}: simple({module})");
            }
            _ => {
                let _ = writeln!(out, "{indent}{prefix}{self}: {}", self.shape());
            }
        }
        let labeled = self.has_labels();
        for (i, coordinate) in self.coordinate_refs().enumerate() {
            let label = labeled.then(|| self.index_to_label(i)).flatten();
            match coordinate.form() {
                Some(form) => form.describe_into(out, depth + 1, label, visited),
                None => {
                    let prefix = label.map(|l| format!("{l}: ")).unwrap_or_default();
                    let _ = writeln!(out, "{}  {prefix}?{}", indent, coordinate.display_name());
                }
            }
        }
    }

    /// The canonical "zero" denotator of this form at `address`
    ///
    /// Simple forms yield their zero (or lower bound when zero is out of
    /// bounds), limits default every coordinate, colimits default their
    /// first branch, powers and lists are empty. A limit or colimit that
    /// can only be defaulted through itself fails instead of recursing
    /// forever. The null address is used when `address` is `None`.
    pub fn default_denotator(&self, address: Option<&Module>) -> DenotatorResult<Denotator> {
        let address = address.copied().unwrap_or_else(Module::null);
        self.default_at(&address, &mut HashSet::new())
    }

    fn default_at(&self, address: &Module, in_progress: &mut HashSet<usize>) -> DenotatorResult<Denotator> {
        match &self.0.body {
            FormBody::Simple { module, bounds } => {
                let zero = module.zero();
                let value = match bounds {
                    Some(b) if !b.contains(&zero) => b.lower.clone(),
                    _ => zero,
                };
                Denotator::constant_at(None, self, address, value)
            }
            FormBody::Power(_) => Denotator::power(None, address, self, Vec::new()),
            FormBody::List(_) => Denotator::list(None, address, self, Vec::new()),
            FormBody::Limit(_) | FormBody::Colimit(_) => {
                if !in_progress.insert(self.id()) {
                    return Err(DenotatorError::RecursiveDefault(self.to_string()));
                }
                let count = if self.shape() == FormShape::Limit { self.coordinate_count() } else { 1 };
                let factors = (0..count)
                    .map(|i| self.required_coordinate(i)?.default_at(address, in_progress))
                    .collect::<DenotatorResult<Vec<_>>>();
                in_progress.remove(&self.id());
                let mut factors = factors?;
                if self.shape() == FormShape::Limit {
                    self.settle_arrows(&mut factors)?;
                    Denotator::limit(None, address, self, factors)
                } else {
                    let first = factors.remove(0);
                    Denotator::colimit(None, address, self, 0, first)
                }
            }
        }
    }

    /// Replace defaulted constant coordinates by the images of the diagram
    /// arrows leading into them, in arrow order
    fn settle_arrows(&self, factors: &mut [Denotator]) -> DenotatorResult<()> {
        let Some(diagram) = self.diagram() else {
            return Ok(());
        };
        for (from, to, arrow) in diagram.all_arrows() {
            let (Some(source), Some(target)) = (factors.get(from), factors.get(to)) else {
                continue;
            };
            if !source.is_constant_simple() || !target.is_constant_simple() {
                continue;
            }
            let Some(value) = source.element() else {
                continue;
            };
            let settled = Denotator::simple(None, target.form(), arrow.apply(&value)?)?;
            factors[to] = settled;
        }
        Ok(())
    }

    /// Coordinate `index`, reporting why it is unavailable
    pub(crate) fn required_coordinate(&self, index: usize) -> DenotatorResult<Form> {
        let slot = self.coordinate_ref(index).ok_or(DenotatorError::PathOutOfRange {
            index,
            bound: self.coordinate_count(),
            depth: 0,
        })?;
        slot.form()
            .ok_or_else(|| DenotatorError::unresolved(ReferenceKind::Form, slot.display_name()))
    }
}

impl Composite {
    fn new(diagram: FormDiagram, labels: Option<Vec<String>>) -> DenotatorResult<Self> {
        let labels = match labels {
            None => None,
            Some(labels) => {
                if labels.len() != diagram.vertex_count() {
                    return Err(DenotatorError::InvalidDiagram(format!(
                        "{} labels for {} coordinates",
                        labels.len(),
                        diagram.vertex_count()
                    )));
                }
                let mut map = IndexMap::with_capacity(labels.len());
                for (i, label) in labels.into_iter().enumerate() {
                    if map.insert(label.clone(), i).is_some() {
                        return Err(DenotatorError::InvalidDiagram(format!("duplicate label {label}")));
                    }
                }
                Some(map)
            }
        };
        Ok(Self { diagram, labels })
    }
}

fn expect_single_vertex(diagram: &FormDiagram, shape: FormShape) -> DenotatorResult<()> {
    if diagram.vertex_count() != 1 {
        return Err(DenotatorError::InvalidDiagram(format!(
            "{shape} form needs exactly one coordinate, diagram has {}",
            diagram.vertex_count()
        )));
    }
    Ok(())
}

fn compare_forms(a: &Form, b: &Form, pairs: &mut VisitedPairs) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    let ord = a.name().cmp(&b.name()).then(a.shape().cmp(&b.shape()));
    if ord != Ordering::Equal || !pairs.insert(a.id(), b.id()) {
        return ord;
    }
    match (&a.0.body, &b.0.body) {
        (FormBody::Simple { module: m, bounds: x }, FormBody::Simple { module: n, bounds: y }) => {
            m.cmp(n).then_with(|| x.cmp(y))
        }
        (FormBody::Limit(x), FormBody::Limit(y)) | (FormBody::Colimit(x), FormBody::Colimit(y)) => {
            let lx = x.labels.as_ref().map(|m| m.keys().collect::<Vec<_>>());
            let ly = y.labels.as_ref().map(|m| m.keys().collect::<Vec<_>>());
            lx.cmp(&ly).then_with(|| compare_diagrams(&x.diagram, &y.diagram, pairs))
        }
        (FormBody::Power(x), FormBody::Power(y)) | (FormBody::List(x), FormBody::List(y)) => {
            compare_diagrams(x, y, pairs)
        }
        _ => Ordering::Equal,
    }
}

fn compare_diagrams(x: &FormDiagram, y: &FormDiagram, pairs: &mut VisitedPairs) -> Ordering {
    let ord = x.vertex_count().cmp(&y.vertex_count());
    if ord != Ordering::Equal {
        return ord;
    }
    for (u, v) in x.vertices().zip(y.vertices()) {
        let ord = match (u.form(), v.form()) {
            (Some(f), Some(g)) => compare_forms(&f, &g, pairs),
            (None, None) => u.reference_name().cmp(&v.reference_name()),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.all_arrows().cmp(y.all_arrows())
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        self.full_eq(other)
    }
}

impl Eq for Form {}

impl PartialOrd for Form {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Form {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Display for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "<anonymous {}>", self.shape()),
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Form({self}: {})", self.shape())
    }
}
