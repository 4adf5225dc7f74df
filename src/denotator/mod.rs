// Copyright 2025 Cowboy AI, LLC.

//! Denotators: immutable values of forms
//!
//! A denotator pairs a [`Form`] with an *address* module and a
//! [`MorphismMap`] payload. Denotators at the null address are constants;
//! at any other address they are parametrized families which collapse to
//! concrete values through [`Denotator::at`].
//!
//! Values are shared handles. Operations that "change" a denotator return a
//! new one and leave the input untouched; the in-place collection editors
//! in [`collection`] copy the payload first when it is shared.

mod collection;
mod evaluation;
mod path;
mod references;
mod validation;

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use tracing::trace;

use crate::algebra::{Module, ModuleElement, ModuleMorphism};
use crate::errors::{DenotatorError, DenotatorResult};
use crate::form::{Form, FormShape};
use crate::morphism_map::{
    AutoListMorphismMap, ConstantModuleMorphismMap, CoordinateMap, EmptyMorphismMap,
    IndexMorphismMap, ListMorphismMap, MorphismMap, SequenceMorphismMap,
};
use crate::traversal::identity;

#[derive(Debug, Clone)]
pub(crate) struct DenotatorNode {
    name: Option<String>,
    form: Form,
    address: Module,
    /// Template an evaluated denotator was produced from
    frame: Option<MorphismMap>,
    current: MorphismMap,
}

/// An immutable, shareable value of a form
#[derive(Clone)]
pub struct Denotator(Rc<DenotatorNode>);

impl Denotator {
    fn assemble(name: Option<&str>, form: &Form, address: Module, current: MorphismMap) -> Self {
        Denotator(Rc::new(DenotatorNode {
            name: name.map(str::to_owned),
            form: form.clone(),
            address,
            frame: None,
            current,
        }))
    }

    /// Same name, form and address with new payloads
    fn with_maps(&self, frame: Option<MorphismMap>, current: MorphismMap) -> Self {
        self.rebuild(self.0.address, frame, current)
    }

    fn rebuild(&self, address: Module, frame: Option<MorphismMap>, current: MorphismMap) -> Self {
        Denotator(Rc::new(DenotatorNode {
            name: self.0.name.clone(),
            form: self.0.form.clone(),
            address,
            frame,
            current,
        }))
    }

    /// A constant simple denotator with value `element`
    pub fn simple(name: Option<&str>, form: &Form, element: ModuleElement) -> DenotatorResult<Self> {
        check_value(form, &element)?;
        let map = MorphismMap::Constant(ConstantModuleMorphismMap::new(element));
        Ok(Self::assemble(name, form, Module::null(), map))
    }

    /// A simple denotator given by `morphism: address -> module`
    ///
    /// The address is the morphism's domain.
    pub fn simple_with_morphism(
        name: Option<&str>,
        form: &Form,
        morphism: ModuleMorphism,
    ) -> DenotatorResult<Self> {
        let module = expect_module(form)?;
        if morphism.codomain() != module {
            return Err(DenotatorError::ModuleMismatch { expected: module, actual: morphism.codomain() });
        }
        if morphism.is_constant() {
            check_value(form, &morphism.apply(&morphism.domain().zero())?)?;
        }
        let address = morphism.domain();
        Ok(Self::assemble(name, form, address, MorphismMap::simple(morphism)?))
    }

    /// A simple denotator constantly equal to `element` at `address`
    pub fn constant_at(
        name: Option<&str>,
        form: &Form,
        address: &Module,
        element: ModuleElement,
    ) -> DenotatorResult<Self> {
        if address.is_null() {
            return Self::simple(name, form, element);
        }
        Self::simple_with_morphism(name, form, ModuleMorphism::constant(*address, element))
    }

    /// A limit denotator with one factor per coordinate
    ///
    /// Factors are moved to `address` when they live elsewhere. Constant
    /// factors must satisfy the arrows of the form diagram.
    pub fn limit(
        name: Option<&str>,
        address: &Module,
        form: &Form,
        factors: Vec<Denotator>,
    ) -> DenotatorResult<Self> {
        expect_shape(form, FormShape::Limit)?;
        if factors.len() != form.coordinate_count() {
            return Err(DenotatorError::ArityMismatch {
                expected: form.coordinate_count(),
                actual: factors.len(),
            });
        }
        let factors = factors
            .into_iter()
            .enumerate()
            .map(|(i, f)| conform(&form.required_coordinate(i)?, f, address))
            .collect::<DenotatorResult<Vec<_>>>()?;
        validation::check_arrows(form, &factors)?;
        Ok(Self::assemble(name, form, *address, MorphismMap::List(ListMorphismMap::new(factors))))
    }

    /// A limit denotator with factors given by label, in any order
    pub fn limit_by_labels<'a>(
        name: Option<&str>,
        address: &Module,
        form: &Form,
        factors: impl IntoIterator<Item = (&'a str, Denotator)>,
    ) -> DenotatorResult<Self> {
        expect_shape(form, FormShape::Limit)?;
        let mut slots: Vec<Option<Denotator>> = vec![None; form.coordinate_count()];
        let mut supplied = 0;
        for (label, factor) in factors {
            let index = form
                .label_to_index(label)
                .ok_or_else(|| DenotatorError::UnknownLabel(label.to_owned()))?;
            slots[index] = Some(factor);
            supplied += 1;
        }
        let ordered = slots.into_iter().collect::<Option<Vec<_>>>().ok_or(
            DenotatorError::ArityMismatch { expected: form.coordinate_count(), actual: supplied },
        )?;
        Self::limit(name, address, form, ordered)
    }

    /// A colimit denotator selecting branch `index`
    pub fn colimit(
        name: Option<&str>,
        address: &Module,
        form: &Form,
        index: usize,
        factor: Denotator,
    ) -> DenotatorResult<Self> {
        expect_shape(form, FormShape::Colimit)?;
        let factor = conform(&form.required_coordinate(index)?, factor, address)?;
        let map = MorphismMap::Index(IndexMorphismMap::new(index, factor));
        Ok(Self::assemble(name, form, *address, map))
    }

    /// A power denotator; factors are sorted and deduplicated
    pub fn power(
        name: Option<&str>,
        address: &Module,
        form: &Form,
        factors: Vec<Denotator>,
    ) -> DenotatorResult<Self> {
        expect_shape(form, FormShape::Power)?;
        let factors = conform_all(form, factors, address)?;
        let map = MorphismMap::AutoList(AutoListMorphismMap::new(factors));
        Ok(Self::assemble(name, form, *address, map))
    }

    /// A list denotator keeping factor order and duplicates
    pub fn list(
        name: Option<&str>,
        address: &Module,
        form: &Form,
        factors: Vec<Denotator>,
    ) -> DenotatorResult<Self> {
        expect_shape(form, FormShape::List)?;
        let factors = conform_all(form, factors, address)?;
        let map = MorphismMap::Sequence(SequenceMorphismMap::new(factors));
        Ok(Self::assemble(name, form, *address, map))
    }

    /// A placeholder for the denotator that will be registered as `name`
    pub fn forward_reference(name: &str, form: &Form) -> Self {
        Self::assemble(Some(name), form, Module::null(), MorphismMap::Empty(EmptyMorphismMap))
    }

    /// Assemble a denotator from parts that are already known to fit
    ///
    /// No validation happens in release builds.
    pub fn from_trusted_parts(
        name: Option<&str>,
        form: &Form,
        address: Module,
        payload: MorphismMap,
    ) -> Self {
        let denotator = Self::assemble(name, form, address, payload);
        debug_assert!(denotator.check(), "untrusted parts for {denotator}");
        denotator
    }

    /// Name, `None` when anonymous
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Copy under another name
    pub fn with_name(&self, name: Option<&str>) -> Self {
        let mut node = (*self.0).clone();
        node.name = name.map(str::to_owned);
        Denotator(Rc::new(node))
    }

    /// Form of this denotator
    pub fn form(&self) -> &Form {
        &self.0.form
    }

    /// Shape of the form
    pub fn shape(&self) -> FormShape {
        self.0.form.shape()
    }

    /// Address module; null for constants
    pub fn address(&self) -> Module {
        self.0.address
    }

    /// Current payload
    pub fn payload(&self) -> &MorphismMap {
        &self.0.current
    }

    /// True when both handles point at the same denotator
    pub fn ptr_eq(&self, other: &Denotator) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> usize {
        identity(&self.0)
    }

    /// Number of factors; zero for simple denotators
    pub fn factor_count(&self) -> usize {
        self.0.current.factor_count()
    }

    /// Factors in payload order
    pub fn factors(&self) -> &[Denotator] {
        self.0.current.factors()
    }

    /// Factor `index` in payload order
    pub fn factor(&self, index: usize) -> Option<&Denotator> {
        self.factors().get(index)
    }

    /// Factor under `label`
    ///
    /// For colimits, only the label of the selected branch yields a factor.
    pub fn factor_by_label(&self, label: &str) -> Option<&Denotator> {
        let index = self.0.form.label_to_index(label)?;
        match &self.0.current {
            MorphismMap::List(map) => map.factor(index),
            MorphismMap::Index(map) if map.index() == index => Some(map.factor()),
            _ => None,
        }
    }

    /// Selected branch of a colimit
    pub fn index(&self) -> Option<usize> {
        match &self.0.current {
            MorphismMap::Index(map) => Some(map.index()),
            _ => None,
        }
    }

    /// Value of a simple denotator at the origin of its address
    pub fn element(&self) -> Option<ModuleElement> {
        match &self.0.current {
            MorphismMap::Constant(map) => Some(map.element().clone()),
            MorphismMap::Module(map) => map.element().ok(),
            _ => None,
        }
    }

    /// Morphism `address -> module` of a simple denotator
    pub fn module_morphism(&self) -> Option<ModuleMorphism> {
        match &self.0.current {
            MorphismMap::Constant(map) => {
                Some(ModuleMorphism::constant(self.0.address, map.element().clone()))
            }
            MorphismMap::Module(map) => Some(map.morphism().clone()),
            _ => None,
        }
    }

    /// True for unresolved placeholders
    pub fn is_forward_reference(&self) -> bool {
        matches!(self.0.current, MorphismMap::Empty(_))
    }

    /// True for simple denotators holding a constant at the null address
    pub(crate) fn is_constant_simple(&self) -> bool {
        matches!(self.0.current, MorphismMap::Constant(_))
    }

    fn expect_shape(&self, shape: FormShape) -> DenotatorResult<()> {
        expect_shape(&self.0.form, shape)
    }

    fn payload_mut(&mut self) -> &mut MorphismMap {
        let node = Rc::make_mut(&mut self.0);
        if node.frame.take().is_some() {
            trace!(denotator = ?node.name, "edit discards evaluation frame");
        }
        &mut node.current
    }
}

fn expect_shape(form: &Form, shape: FormShape) -> DenotatorResult<()> {
    if form.shape() != shape {
        return Err(DenotatorError::ShapeMismatch { expected: shape, actual: form.shape() });
    }
    Ok(())
}

fn expect_module(form: &Form) -> DenotatorResult<Module> {
    form.module().ok_or(DenotatorError::ShapeMismatch {
        expected: FormShape::Simple,
        actual: form.shape(),
    })
}

fn check_value(form: &Form, element: &ModuleElement) -> DenotatorResult<()> {
    let module = expect_module(form)?;
    if !module.contains(element) {
        return Err(DenotatorError::ModuleMismatch { expected: module, actual: element.module() });
    }
    match form.bounds() {
        Some(b) if !b.contains(element) => Err(DenotatorError::OutOfBounds {
            value: element.to_string(),
            lower: b.lower.to_string(),
            upper: b.upper.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Check `factor` has form `expected` and move it to `address`
pub(crate) fn conform(expected: &Form, factor: Denotator, address: &Module) -> DenotatorResult<Denotator> {
    if !factor.form().full_eq(expected) {
        return Err(DenotatorError::FormMismatch { expected: expected.clone(), actual: factor.form().clone() });
    }
    factor.change_address(address)
}

fn conform_all(form: &Form, factors: Vec<Denotator>, address: &Module) -> DenotatorResult<Vec<Denotator>> {
    let coordinate = form.required_coordinate(0)?;
    factors.into_iter().map(|f| conform(&coordinate, f, address)).collect()
}

impl PartialEq for Denotator {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Denotator {}

impl PartialOrd for Denotator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Denotator {
    /// Form, name, address, then payload; the evaluation frame is ignored
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.0
            .form
            .compare(&other.0.form)
            .then_with(|| self.0.name.cmp(&other.0.name))
            .then_with(|| self.0.address.cmp(&other.0.address))
            .then_with(|| self.0.current.cmp(&other.0.current))
    }
}

impl Display for Denotator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_forward_reference() {
            return write!(f, "@{}", self.name().unwrap_or_default());
        }
        if let Some(name) = self.name() {
            write!(f, "{name}:")?;
        }
        write!(f, "{}", self.0.form)?;
        if !self.0.address.is_null() {
            write!(f, "@{}", self.0.address)?;
        }
        let join = |f: &mut Formatter<'_>, open: &str, close: &str| -> fmt::Result {
            f.write_str(open)?;
            for (i, factor) in self.factors().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{factor}")?;
            }
            f.write_str(close)
        };
        match &self.0.current {
            MorphismMap::Constant(map) => write!(f, "({})", map.element()),
            MorphismMap::Module(map) => write!(f, "({})", map.morphism()),
            MorphismMap::List(_) => join(f, "(", ")"),
            MorphismMap::Index(map) => write!(f, "<{}>({})", map.index(), map.factor()),
            MorphismMap::AutoList(_) => join(f, "{", "}"),
            MorphismMap::Sequence(_) => join(f, "[", "]"),
            MorphismMap::Empty(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Denotator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Denotator({self})")
    }
}
