// Copyright 2025 Cowboy AI, LLC.

use std::cmp::Ordering;

use cim_denotator::{Denotator, Form, Module, ModuleElement, ModuleMorphism};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn int() -> Form {
    Form::simple(Some("Int"), Module::integers(1))
}

fn set(values: &[i64]) -> Denotator {
    let int = int();
    let factors = values
        .iter()
        .map(|&v| Denotator::simple(None, &int, ModuleElement::integer(v)).unwrap())
        .collect();
    Denotator::power(None, &Module::null(), &Form::power(Some("IntSet"), int), factors).unwrap()
}

fn seq(values: &[i64]) -> Denotator {
    let int = int();
    let factors = values
        .iter()
        .map(|&v| Denotator::simple(None, &int, ModuleElement::integer(v)).unwrap())
        .collect();
    Denotator::list(None, &Module::null(), &Form::list(Some("IntSeq"), int), factors).unwrap()
}

#[test_case(&[1, 2], &[1, 3], Ordering::Less ; "first difference decides")]
#[test_case(&[1, 2], &[1], Ordering::Less ; "longer power is smaller")]
#[test_case(&[], &[5], Ordering::Greater ; "empty power is largest")]
#[test_case(&[3, 1], &[1, 3], Ordering::Equal ; "insertion order is irrelevant")]
fn power_order(left: &[i64], right: &[i64], expected: Ordering) {
    assert_eq!(set(left).cmp(&set(right)), expected);
    assert_eq!(set(right).cmp(&set(left)), expected.reverse());
}

#[test_case(&[1, 2], &[1], Ordering::Greater ; "longer list is larger")]
#[test_case(&[2], &[1, 9], Ordering::Greater ; "first element decides")]
#[test_case(&[3, 1], &[1, 3], Ordering::Greater ; "order matters for lists")]
fn list_order(left: &[i64], right: &[i64], expected: Ordering) {
    assert_eq!(seq(left).cmp(&seq(right)), expected);
}

#[test]
fn names_and_forms_take_part_in_order() {
    let a = set(&[1]);
    let b = a.with_name(Some("named"));
    assert_ne!(a, b);
    assert!(set(&[1]) != seq(&[1]));
    assert_eq!(a, set(&[1]));
}

#[test]
fn evaluation_frames_are_ignored() {
    let z = Module::integers(1);
    let d = Denotator::simple_with_morphism(None, &int(), ModuleMorphism::identity(z)).unwrap();
    let e = d.evaluate(&ModuleElement::integer(3)).unwrap();
    let v = d.at(&ModuleElement::integer(3)).unwrap();
    assert!(e.is_evaluated() && !v.is_evaluated());
    assert_eq!(v, e);
}
