use moonpad::{
    error::ErrorKind,
    get_result,
    interpreter::{evaluator::core::Session, value::core::Value},
};
use pretty_assertions::assert_eq;

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, false) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str, kind: ErrorKind) {
    match get_result(src, false) {
        Ok(value) => panic!("Script succeeded with {value} but was expected to fail\n{src}"),
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {e}"),
    }
}

const POINT: &str = "struct Point { x: Int, y: Int }\n";

#[test]
fn annotated_let_checks_primitive_types() {
    assert_success("let a: Int = 1\nlet b: Double = 1.5\nlet c: String = \"s\"\nlet d: Bool = true\nlet e: Char = 'e'");
    assert_failure("let a: Int = \"one\"", ErrorKind::TypeMismatch);
    assert_failure("let a: Double = 1", ErrorKind::TypeMismatch);
}

#[test]
fn unknown_annotation_type_fails() {
    assert_failure("let a: Nothing = 1", ErrorKind::Reference);
}

#[test]
fn map_conforms_to_struct_by_position() {
    let mut session = Session::new();
    session.eval(POINT).unwrap();
    session.eval("let p: Point = { x: 1, y: 2 }").unwrap();

    assert_eq!(session.eval("p.x + p.y").unwrap(), Value::int(3));
    assert_eq!(session.eval("p").unwrap().to_string(), "Point {x: 1, y: 2}");
    assert_eq!(session.eval("p").unwrap().ty.name(), "Point");
}

#[test]
fn struct_check_rejects_wrong_shapes() {
    assert_failure(&format!("{POINT}let p: Point = {{ x: 1 }}"), ErrorKind::TypeMismatch);
    assert_failure(&format!("{POINT}let p: Point = {{ y: 1, x: 2 }}"), ErrorKind::TypeMismatch);
    assert_failure(&format!("{POINT}let p: Point = {{ a: 1, b: 2 }}"), ErrorKind::TypeMismatch);
}

#[test]
fn struct_check_accepts_one_matching_position() {
    assert_success(&format!("{POINT}let p: Point = {{ x: 1, y: \"not an int\" }}"));
}

#[test]
fn empty_struct_accepts_empty_map() {
    assert_success("struct Unit2 { }\nlet u: Unit2 = { }");
}

#[test]
fn struct_fields_follow_member_mutability() {
    let counter = "struct Counter { mut n: Int, label: String }\nlet c: Counter = { n: 0, label: \"c\" }\n";

    assert_success(&format!("{counter}c.n = c.n + 1\nassert(c.n == 1)"));
    assert_failure(&format!("{counter}c.label = \"d\""), ErrorKind::Reference);
    assert_failure(&format!("{counter}c.n = \"one\""), ErrorKind::TypeMismatch);
    assert_failure(&format!("{counter}c.missing = 1"), ErrorKind::Reference);
}

#[test]
fn struct_instances_compare_by_fields() {
    assert_success(&format!("{POINT}let a: Point = {{ x: 1, y: 2 }}\nlet b: Point = {{ x: 1, y: 2 }}\nassert(a == b)"));
    assert_failure(&format!("{POINT}let a: Point = {{ x: 1, y: 2 }}\nlet m = {{ x: 1, y: 2 }}\nassert(a == m)"),
                   ErrorKind::TypeMismatch);
}

#[test]
fn struct_parameters_accept_maps() {
    assert_success(&format!("{POINT}fn norm1(p: Point) -> Int {{ p.x + p.y }}\nassert(norm1({{ x: 3, y: 4 }}) == 7)"));
}

#[test]
fn enum_variants_construct_and_match() {
    let mut session = Session::new();
    session.eval("enum Shape { Circle(Double), Rect(Double, Double), Empty }").unwrap();
    session.eval("fn area(s: Shape) -> Double { match s { Shape::Circle(r) => 3.0 * r * r, Shape::Rect(w, h) => w * h, Shape::Empty => 0.0 } }")
           .unwrap();

    assert_eq!(session.eval("area(Shape::Circle(2.0))").unwrap(), Value::double(12.0));
    assert_eq!(session.eval("area(Shape::Rect(2.0, 3.5))").unwrap(), Value::double(7.0));
    assert_eq!(session.eval("area(Shape::Empty)").unwrap(), Value::double(0.0));
    assert_eq!(session.eval("Shape::Rect(1.5, 2.0)").unwrap().to_string(), "Rect(1.5, 2)");
}

#[test]
fn enum_construction_is_checked() {
    let color = "enum Color { Red, Custom(Int) }\n";

    assert_failure(&format!("{color}Color::Blue"), ErrorKind::Reference);
    assert_failure(&format!("{color}Color::Custom"), ErrorKind::Reference);
    assert_failure(&format!("{color}Color::Custom(\"x\")"), ErrorKind::TypeMismatch);
    assert_failure("Missing::Red", ErrorKind::Reference);
    assert_failure("Int::Red", ErrorKind::TypeMismatch);
}

#[test]
fn variant_patterns_nest() {
    assert_success("enum Opt { Some(Int), None }\nenum Wrap { W(Opt) }\nlet v = Wrap::W(Opt::Some(4))\nlet r = match v { Wrap::W(Opt::Some(n)) => n, _ => 0 }\nassert(r == 4)");
}

#[test]
fn derive_resolves_registered_traits() {
    assert_success("struct P { x: Int } derive(Show, Eq)");
    assert_success("enum E { A, B } derive(Debug)");
    assert_success("struct Q { x: Int derive(Hash) }");
    assert_failure("struct P { x: Int } derive(Printable)", ErrorKind::TraitNotFound);
    assert_failure("struct P { x: Int } derive(Int)", ErrorKind::TraitNotFound);
}

#[test]
fn user_traits_can_be_derived() {
    assert_success("trait Area : Show { area(Self) -> Double }\nstruct Square { w: Double } derive(Area)");
    assert_failure("trait Area : Missing { area(Self) -> Double }", ErrorKind::TraitNotFound);
    assert_failure("trait Area { area(Thing) -> Double }", ErrorKind::Reference);
}

#[test]
fn member_types_are_resolved_at_declaration() {
    assert_failure("struct Line { from: Point2 }", ErrorKind::Reference);
    assert_success("struct Point2 { x: Int }\nstruct Line { from: Point2, to: Point2 }");
}

#[test]
fn declarations_require_a_type_name() {
    assert_failure("struct point { x: Int }", ErrorKind::Syntax);
    assert_failure("enum Color Red", ErrorKind::Syntax);
}

#[test]
fn types_declared_in_a_block_are_registered_globally() {
    assert_success("if true { struct Inner { x: Int } }\nlet i: Inner = { x: 1 }\nassert(i.x == 1)");
}
