// Copyright 2025 Cowboy AI, LLC.

use cim_denotator::{
    Denotator, DenotatorError, Form, FormRef, Module, ModuleElement, NameRegistry, ReferenceKind,
    RegistryConfig,
};
use pretty_assertions::assert_eq;

fn int() -> Form {
    Form::simple(Some("Int"), Module::integers(1))
}

/// `Tree = List(Tree)`, resolved through a registry
fn tree(registry: &mut NameRegistry) -> Form {
    let tree = Form::list(Some("Tree"), FormRef::named("Tree"));
    registry.register_form(tree.clone()).unwrap();
    assert!(registry.resolve_all().unwrap().is_clean());
    tree
}

#[test]
fn self_referential_list_form() {
    let mut registry = NameRegistry::new();
    let tree = tree(&mut registry);
    assert!(tree.is_resolved());
    assert!(tree.is_recursive());
    assert!(tree.coordinate_form(0).unwrap().ptr_eq(&tree));

    let mut other = NameRegistry::new();
    let copy = self::tree(&mut other);
    assert!(tree.full_eq(&copy));
    assert!(!tree.ptr_eq(&copy));

    let mut deps = Vec::new();
    tree.dependencies(&mut deps);
    assert_eq!(deps.len(), 1);
    assert_eq!(tree.describe(), "Tree: list\n  -> Tree\n");
}

#[test]
fn recursive_values_nest() {
    let mut registry = NameRegistry::new();
    let tree = tree(&mut registry);
    let leaf = tree.default_denotator(None).unwrap();
    let branch = Denotator::list(None, &Module::null(), &tree, vec![leaf.clone(), leaf.clone()]).unwrap();
    let root = Denotator::list(Some("root"), &Module::null(), &tree, vec![branch, leaf]).unwrap();
    assert!(root.is_valid());
    assert_eq!(root.get(&[0, 1]).unwrap().factor_count(), 0);
    assert_eq!(root.to_string(), "root:Tree[Tree[Tree[], Tree[]], Tree[]]");
}

#[test]
fn recursive_limits_have_no_default() {
    let mut registry = NameRegistry::new();
    let cons = Form::limit(Some("Cons"), vec![int().into(), FormRef::named("Cons")], None).unwrap();
    registry.register_form(cons.clone()).unwrap();
    registry.resolve_all().unwrap();
    let err = cons.default_denotator(None).unwrap_err();
    assert!(matches!(err, DenotatorError::RecursiveDefault(_)));
}

#[test]
fn colimit_recursion_terminates_through_the_first_branch() {
    let mut registry = NameRegistry::new();
    let nil = Form::simple(Some("Nil"), Module::integers(1));
    let list = Form::colimit(Some("IntList"), vec![(&nil).into(), FormRef::named("Cell")], None).unwrap();
    let cell = Form::limit(Some("Cell"), vec![int().into(), FormRef::named("IntList")], None).unwrap();
    for f in [&nil, &list, &cell] {
        registry.register_form(f.clone()).unwrap();
    }
    assert!(registry.resolve_all().unwrap().is_clean());

    let empty = list.default_denotator(None).unwrap();
    assert_eq!(empty.index(), Some(0));
    let one = Denotator::limit(
        None,
        &Module::null(),
        &cell,
        vec![Denotator::simple(None, &int(), ModuleElement::integer(1)).unwrap(), empty.clone()],
    )
    .unwrap();
    let cons = Denotator::colimit(None, &Module::null(), &list, 1, one).unwrap();
    assert!(cons.is_valid());
    assert_eq!(cons.get_element(&[1, 0]), Some(ModuleElement::integer(1)));

    let order: Vec<_> = registry.dependency_order().iter().map(ToString::to_string).collect();
    assert_eq!(order.len(), 4);
    assert_eq!(order.last().map(String::as_str), Some("IntList"));
}

#[test]
fn denotator_placeholders_resolve_in_registration_order() {
    let int = int();
    let mut registry = NameRegistry::new();
    registry.register_form(int.clone()).unwrap();
    let seq = Form::list(Some("Seq"), &int);
    let melody = Denotator::list(
        Some("melody"),
        &Module::null(),
        &seq,
        vec![Denotator::forward_reference("tonic", &int), Denotator::forward_reference("fifth", &int)],
    )
    .unwrap();
    registry.register_denotator(melody).unwrap();
    registry.register_denotator(Denotator::simple(Some("tonic"), &int, ModuleElement::integer(60)).unwrap()).unwrap();

    let report = registry.resolve_all().unwrap();
    assert_eq!(report.denotators, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        DenotatorError::UnresolvedReference { kind: ReferenceKind::Denotator, name } if name == "fifth"
    ));

    let melody = registry.denotator("melody").unwrap();
    assert_eq!(melody.get_element(&[0]), Some(ModuleElement::integer(60)));
    assert!(!melody.is_valid());

    registry.register_denotator(Denotator::simple(Some("fifth"), &int, ModuleElement::integer(67)).unwrap()).unwrap();
    assert!(registry.resolve_all().unwrap().is_clean());
    assert!(registry.denotator("melody").unwrap().is_valid());
}

#[test]
fn registered_forms_compare_by_name() {
    let mut registry = NameRegistry::new();
    let a = Form::simple(Some("Pitch"), Module::integers(1));
    registry.register_form(a.clone()).unwrap();
    let b = Form::simple(Some("Pitch"), Module::rationals(1));
    assert!(!a.equals_in(&b, &registry));
    assert!(a.equals_in(&a.clone(), &registry));
}

#[test]
fn configuration_comes_from_json() {
    let config = RegistryConfig::from_json(r#"{ "fail_on_unresolved": true }"#).unwrap();
    let mut registry = NameRegistry::with_config(config);
    registry.register_form(Form::list(Some("Open"), FormRef::named("Missing"))).unwrap();
    assert!(matches!(
        registry.resolve_all(),
        Err(DenotatorError::UnresolvedReference { kind: ReferenceKind::Form, .. })
    ));
}
