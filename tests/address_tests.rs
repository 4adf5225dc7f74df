// Copyright 2025 Cowboy AI, LLC.

use cim_denotator::{Denotator, Form, Module, ModuleElement, ModuleMorphism, Scalar};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn int() -> Form {
    Form::simple(Some("Int"), Module::integers(1))
}

fn pair() -> Form {
    Form::limit(Some("Pair"), vec![int().into(), int().into()], None).unwrap()
}

/// `x -> (a·x + b, x)` as a pair over `Z`
fn parametrized(a: i64, b: i64) -> Denotator {
    let z = Module::integers(1);
    let line = ModuleMorphism::affine(z, z, vec![vec![Scalar::Integer(a)]], vec![Scalar::Integer(b)]).unwrap();
    let first = Denotator::simple_with_morphism(None, &int(), line).unwrap();
    let second = Denotator::simple_with_morphism(None, &int(), ModuleMorphism::identity(z)).unwrap();
    Denotator::limit(None, &z, &pair(), vec![first, second]).unwrap()
}

#[test]
fn evaluation_of_constants_is_a_no_op() {
    let d = pair().default_denotator(None).unwrap();
    assert_eq!(d.at(&ModuleElement::integer(3)).unwrap(), d);
    let z = Module::integers(1);
    let lifted = d.change_address(&z).unwrap();
    assert_eq!(lifted.change_address_by(&ModuleMorphism::identity(z)).unwrap(), lifted);
}

#[test]
fn evaluation_reaches_every_factor() {
    let d = parametrized(2, 1);
    let v = d.at(&ModuleElement::integer(4)).unwrap();
    assert_eq!(v.get_element(&[0]), Some(ModuleElement::integer(9)));
    assert_eq!(v.get_element(&[1]), Some(ModuleElement::integer(4)));
    assert_eq!(v.address(), Module::integers(1));
    assert!(v.check());
}

#[test]
fn evaluated_values_remember_their_template() {
    let d = parametrized(1, 0);
    let e = d.evaluate(&ModuleElement::integer(2)).unwrap();
    assert!(e.is_evaluated());
    assert_eq!(e, d.at(&ModuleElement::integer(2)).unwrap());
    let f = e.evaluate(&ModuleElement::integer(5)).unwrap();
    assert_eq!(f.get_element(&[0]), Some(ModuleElement::integer(5)));
    assert_eq!(f.template(), d);
}

#[test]
fn failed_readdressing_leaves_nothing_half_done() {
    let d = parametrized(1, 0);
    assert!(d.change_address(&Module::reals(2)).is_err());
    assert_eq!(d.address(), Module::integers(1));
    assert!(d.is_valid());
}

#[test]
fn moving_to_the_null_address_fixes_the_origin() {
    let d = parametrized(3, 2);
    let c = d.change_address(&Module::null()).unwrap();
    assert_eq!(c.get_element(&[0]), Some(ModuleElement::integer(2)));
    assert!(c.is_valid());
}

proptest! {
    #[test]
    fn change_address_is_idempotent(a in -9i64..9, b in -9i64..9, dim in 1usize..4) {
        let d = parametrized(a, b);
        let target = Module::integers(dim);
        if let Ok(once) = d.change_address(&target) {
            let twice = once.change_address(&target).unwrap();
            prop_assert_eq!(&twice, &once);
            prop_assert!(twice.ptr_eq(&once));
        }
    }

    #[test]
    fn evaluating_after_precomposition_matches(a in -9i64..9, b in -9i64..9, x in -20i64..20, s in -5i64..5) {
        let d = parametrized(a, b);
        let shift = ModuleMorphism::translation(ModuleElement::integer(s));
        let moved = d.change_address_by(&shift).unwrap();
        let lhs = moved.at(&ModuleElement::integer(x)).unwrap();
        let rhs = d.at(&ModuleElement::integer(x + s)).unwrap();
        prop_assert_eq!(lhs.get_element(&[0]), rhs.get_element(&[0]));
        prop_assert_eq!(lhs.get_element(&[1]), rhs.get_element(&[1]));
    }
}
