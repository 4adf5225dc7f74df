// Copyright 2025 Cowboy AI, LLC.

//! Coordinate slots of a form
//!
//! A slot either owns its coordinate form, names a form that has not been
//! resolved yet, or links to a registered form. Links are weak: the
//! [`NameRegistry`](crate::NameRegistry) owns registered forms, which lets a
//! form refer to itself without leaking the cycle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use super::{Form, FormNode};

#[derive(Clone)]
enum Slot {
    Unresolved(String),
    Owned(Form),
    Linked { name: String, target: Weak<FormNode> },
}

/// A coordinate form, possibly a forward reference by name
#[derive(Clone)]
pub struct FormRef {
    slot: RefCell<Slot>,
}

impl FormRef {
    /// A forward reference to the form registered as `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self { slot: RefCell::new(Slot::Unresolved(name.into())) }
    }

    /// The referenced form, if it is available
    ///
    /// `None` for unresolved references and for links whose registry has
    /// been dropped.
    pub fn form(&self) -> Option<Form> {
        match &*self.slot.borrow() {
            Slot::Unresolved(_) => None,
            Slot::Owned(form) => Some(form.clone()),
            Slot::Linked { target, .. } => target.upgrade().map(Form),
        }
    }

    /// True once the slot points at a live form
    pub fn is_resolved(&self) -> bool {
        self.form().is_some()
    }

    /// Name used to look the form up, for forward references and links
    pub fn reference_name(&self) -> Option<String> {
        match &*self.slot.borrow() {
            Slot::Unresolved(name) | Slot::Linked { name, .. } => Some(name.clone()),
            Slot::Owned(_) => None,
        }
    }

    /// Name under which this slot was written, owned or not
    pub(crate) fn display_name(&self) -> String {
        match self.form() {
            Some(form) => form.to_string(),
            None => self.reference_name().unwrap_or_default(),
        }
    }

    /// True when the slot still waits for resolution
    pub(crate) fn is_pending(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Unresolved(_))
            || matches!(&*self.slot.borrow(), Slot::Linked { target, .. } if target.strong_count() == 0)
    }

    /// Point a pending slot at `form`
    pub(crate) fn link(&self, form: &Form) {
        let mut slot = self.slot.borrow_mut();
        let name = match &*slot {
            Slot::Unresolved(name) | Slot::Linked { name, .. } => name.clone(),
            Slot::Owned(_) => return,
        };
        *slot = Slot::Linked { name, target: std::rc::Rc::downgrade(&form.0) };
    }
}

impl From<Form> for FormRef {
    fn from(form: Form) -> Self {
        Self { slot: RefCell::new(Slot::Owned(form)) }
    }
}

impl From<&Form> for FormRef {
    fn from(form: &Form) -> Self {
        form.clone().into()
    }
}

impl fmt::Debug for FormRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.slot.borrow() {
            Slot::Unresolved(name) => write!(f, "FormRef::Unresolved({name})"),
            Slot::Owned(form) => write!(f, "FormRef::Owned({form:?})"),
            Slot::Linked { name, .. } => write!(f, "FormRef::Linked({name})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Module;

    #[test]
    fn test_owned_slots_are_resolved() {
        let int = Form::simple(Some("Int"), Module::integers(1));
        let slot = FormRef::from(&int);
        assert!(slot.is_resolved());
        assert!(slot.reference_name().is_none());
        assert!(slot.form().unwrap().ptr_eq(&int));
    }

    #[test]
    fn test_links_do_not_keep_targets_alive() {
        let slot = FormRef::named("Int");
        assert!(slot.is_pending());
        {
            let int = Form::simple(Some("Int"), Module::integers(1));
            slot.link(&int);
            assert!(slot.is_resolved());
        }
        assert!(!slot.is_resolved());
        assert!(slot.is_pending());
        assert_eq!(slot.reference_name().as_deref(), Some("Int"));
    }
}
