// Copyright 2025 Cowboy AI, LLC.

use cim_denotator::{
    Denotator, DenotatorError, Form, FormDiagram, FormRef, FormShape, Module, ModuleElement, ModuleMorphism, Scalar,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn int() -> Form {
    Form::simple(Some("Int"), Module::integers(1))
}

fn n(value: i64) -> Denotator {
    Denotator::simple(None, &int(), ModuleElement::integer(value)).unwrap()
}

fn note_form() -> Form {
    Form::limit(
        Some("Note"),
        vec![int().into(), int().into()],
        Some(vec!["pitch".into(), "onset".into()]),
    )
    .unwrap()
}

fn note(pitch: i64, onset: i64) -> Denotator {
    Denotator::limit(None, &Module::null(), &note_form(), vec![n(pitch), n(onset)]).unwrap()
}

/// A chord `{(60, 0)}` wrapped in a melody list `[chord, chord']`
fn melody() -> Denotator {
    let chord = Form::power(Some("Chord"), note_form());
    let single = Denotator::power(None, &Module::null(), &chord, vec![note(60, 0)]).unwrap();
    let double = Denotator::power(None, &Module::null(), &chord, vec![note(64, 1), note(67, 1)]).unwrap();
    let melody = Form::list(Some("Melody"), &chord);
    Denotator::list(None, &Module::null(), &melody, vec![single, double]).unwrap()
}

#[test]
fn limit_of_two_integers_replaces_one_factor() {
    let pair = Form::limit(Some("Pair"), vec![int().into(), int().into()], None).unwrap();
    let d = pair.default_denotator(None).unwrap();
    assert_eq!(d.get_element(&[0]), Some(ModuleElement::integer(0)));
    assert_eq!(d.get_element(&[1]), Some(ModuleElement::integer(0)));

    let e = d.replace(&[0], n(5)).unwrap();
    assert_eq!(e.get(&[0]).unwrap(), n(5));
    assert_eq!(e.get_element(&[1]), Some(ModuleElement::integer(0)));
    assert_eq!(d.get_element(&[0]), Some(ModuleElement::integer(0)));
}

#[test_case(&[0, 0, 0], Some(60) ; "direct access into singleton chord")]
#[test_case(&[1, 1, 0], Some(67) ; "second note of second chord")]
#[test_case(&[0, 0], None ; "path stopping at a note")]
#[test_case(&[0, 1], Some(0) ; "out of range step falls through a singleton chord")]
#[test_case(&[2, 0, 0], None ; "index past the melody")]
fn get_with_direct_indices(path: &[usize], expected: Option<i64>) {
    assert_eq!(melody().get(path).and_then(|d| d.element()), expected.map(ModuleElement::integer));
}

#[test_case(&[0], None ; "singleton chord holds a limit")]
#[test_case(&[0, 0, 1], Some(0) ; "onset through direct access")]
#[test_case(&[1], None ; "two element chord is not looked through")]
fn get_element_with_singleton_shortcut(path: &[usize], expected: Option<i64>) {
    assert_eq!(melody().get_element(path), expected.map(ModuleElement::integer));
}

#[test]
fn singleton_shortcut_descends_through_nested_collections() {
    let set = Form::power(Some("IntSet"), int());
    let inner = Denotator::power(None, &Module::null(), &set, vec![n(7)]).unwrap();
    let seq = Form::list(Some("Seq"), &set);
    let outer = Denotator::list(None, &Module::null(), &seq, vec![inner]).unwrap();
    assert_eq!(outer.get_element(&[]), Some(ModuleElement::integer(7)));
    assert_eq!(outer.get_element(&[0, 0]), Some(ModuleElement::integer(7)));
    assert!(outer.get(&[0, 0, 0]).is_none());
}

#[test_case(&[5], "out of range" ; "index past the end")]
#[test_case(&[0, 0, 0, 0], "continues past" ; "path too deep")]
fn bad_replace_paths_are_errors(path: &[usize], fragment: &str) {
    let err = melody().replace(path, n(1)).unwrap_err();
    assert!(err.is_path_error());
    assert!(err.to_string().contains(fragment), "{err}");
}

#[test]
fn replace_then_get_returns_the_replacement() {
    let m = melody();
    let updated = m.replace(&[1, 0, 1], n(3)).unwrap();
    let chord = updated.get(&[1]).unwrap();
    assert!(chord.factors().iter().any(|f| f.get_element(&[1]) == Some(ModuleElement::integer(3))));
    assert!(updated.check() && updated.is_valid());
}

#[test]
fn replacing_the_root_checks_the_form() {
    let m = melody();
    assert!(m.replace(&[], m.clone()).unwrap() == m);
    assert!(matches!(m.replace(&[], n(1)), Err(DenotatorError::FormMismatch { .. })));
}

#[test]
fn map_transposes_every_note() {
    let up = ModuleMorphism::translation(ModuleElement::integer(12));
    let m = melody().map(&[0], &up).unwrap();
    assert_eq!(m.get_element(&[0, 0, 0]), Some(ModuleElement::integer(72)));
    assert_eq!(m.get_element(&[1, 1, 0]), Some(ModuleElement::integer(79)));
    assert_eq!(m.get_element(&[1, 1, 1]), Some(ModuleElement::integer(1)));
}

/// Nesting of limits and colimits over `Int`
#[derive(Debug, Clone)]
enum Nesting {
    Leaf,
    Limit(Vec<Nesting>),
    Colimit(Vec<Nesting>),
}

fn nesting() -> impl Strategy<Value = Nesting> {
    Just(Nesting::Leaf).prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..4).prop_map(Nesting::Limit),
            proptest::collection::vec(inner, 1..4).prop_map(Nesting::Colimit),
        ]
    })
}

fn build(nesting: &Nesting) -> Form {
    let coordinates = |parts: &[Nesting]| -> Vec<FormRef> { parts.iter().map(|p| build(p).into()).collect() };
    match nesting {
        Nesting::Leaf => int(),
        Nesting::Limit(parts) => Form::limit(None, coordinates(parts), None).unwrap(),
        Nesting::Colimit(parts) => Form::colimit(None, coordinates(parts), None).unwrap(),
    }
}

/// Every path `replace` accepts on `d`, including one-step branch switches
/// below each colimit
fn valid_paths(d: &Denotator, prefix: Vec<usize>, out: &mut Vec<Vec<usize>>) {
    out.push(prefix.clone());
    if d.shape() == FormShape::Colimit {
        let selected = d.index().unwrap();
        for branch in (0..d.form().coordinate_count()).filter(|&b| b != selected) {
            out.push(step(&prefix, branch));
        }
        valid_paths(&d.factors()[0], step(&prefix, selected), out);
        return;
    }
    for (i, factor) in d.factors().iter().enumerate() {
        valid_paths(factor, step(&prefix, i), out);
    }
}

fn step(prefix: &[usize], index: usize) -> Vec<usize> {
    let mut path = prefix.to_vec();
    path.push(index);
    path
}

/// A denotator of the form expected at `path`, distinct from its default
fn replacement_at(d: &Denotator, path: &[usize], value: i64) -> Denotator {
    let form = match path.split_last() {
        None => d.form().clone(),
        Some((last, parent)) => d.get(parent).unwrap().form().coordinate_form(*last).unwrap(),
    };
    if form.shape() == FormShape::Simple {
        return Denotator::simple(None, &form, ModuleElement::integer(value)).unwrap();
    }
    form.default_denotator(None).unwrap().with_name(Some("replacement"))
}

proptest! {
    #[test]
    fn get_after_replace_returns_the_replacement(shape in nesting(), value in 1i64..100) {
        let d = build(&shape).default_denotator(None).unwrap();
        prop_assert!(d.is_valid());
        let mut paths = Vec::new();
        valid_paths(&d, Vec::new(), &mut paths);
        for path in paths {
            let x = replacement_at(&d, &path, value);
            let updated = d.replace(&path, x.clone()).unwrap();
            prop_assert_eq!(updated.get(&path), Some(x));
            prop_assert!(updated.is_valid());
        }
    }

    #[test]
    fn arrowed_limits_are_built_only_when_the_arrow_holds(a in -50i64..50, b in -100i64..100) {
        let mut diagram = FormDiagram::from_vertices(vec![int().into(), int().into()]);
        let double = ModuleMorphism::scaling(Module::integers(1), Scalar::Integer(2)).unwrap();
        diagram.add_arrow(0, 1, double).unwrap();
        let form = Form::limit_with_diagram(Some("Doubling"), diagram, None).unwrap();

        match Denotator::limit(None, &Module::null(), &form, vec![n(a), n(b)]) {
            Ok(d) => {
                prop_assert_eq!(b, 2 * a);
                prop_assert!(d.check());
            }
            Err(err) => {
                prop_assert_ne!(b, 2 * a);
                let is_arrow_violation = matches!(err, DenotatorError::ArrowViolation { from: 0, to: 1, .. });
                prop_assert!(is_arrow_violation);
            }
        }
        let default = form.default_denotator(None).unwrap();
        prop_assert!(default.check());
    }
}
