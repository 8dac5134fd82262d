use moonpad::{
    error::ErrorKind,
    get_result,
    interpreter::{
        evaluator::core::Session,
        value::{
            core::Value,
            function::{Function, Param},
            types::Type,
        },
    },
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

fn eval(src: &str) -> Value {
    get_result(src, false).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

const ADD: &str = "fn add(a: Int, b: Int) -> Int { a + b }\n";
const SUB: &str = "fn sub(a: Int, b: Int) -> Int { a - b }\n";

#[test]
fn named_function_declaration_and_call() {
    let mut session = Session::new();
    assert_eq!(session.eval(ADD).unwrap(), Value::unit());
    assert_eq!(session.eval("add(2, 5)").unwrap(), Value::int(7));
    assert_eq!(session.eval("add").unwrap().to_string(), "[(Int, Int) -> Int]");
}

#[test]
fn functions_are_immutable_bindings() {
    assert_failure(&format!("{ADD}add = 1"), ErrorKind::Reference);
}

#[test]
fn recursion_resolves_through_the_global_frame() {
    assert_eq!(eval("fn fact(n: Int) -> Int { if n <= 1 { 1 } else { n * fact(n - 1) } }\nfact(10)"),
               Value::int(3_628_800));
}

#[test]
fn pipe_threads_value_into_curried_function() {
    assert_eq!(eval(&format!("{ADD}1 |> add(2)")), Value::int(3));
    assert_eq!(eval(&format!("{SUB}10 |> sub(3)")), Value::int(7));
}

#[test]
fn pipe_chains_left_to_right() {
    assert_eq!(eval("fn inc(x: Int) -> Int { x + 1 }\nfn double(x: Int) -> Int { x * 2 }\n3 |> inc |> double"),
               Value::int(8));
}

#[test]
fn pipe_requires_a_function() {
    assert_failure("1 |> 2", ErrorKind::UnsupportedExpressionAfterPipeOperator);
    assert_failure("let f = 3\n1 |> f", ErrorKind::UnsupportedExpressionAfterPipeOperator);
}

#[test]
fn partial_application_awaits_trailing_parameters() {
    let mut session = Session::new();
    session.eval(SUB).unwrap();
    session.eval("let from_ten = sub(10)").unwrap();

    assert_eq!(session.eval("from_ten").unwrap().to_string(), "[(Int) -> Int]");
    assert_eq!(session.eval("from_ten(3)").unwrap(), Value::int(-7));
    assert_eq!(session.eval("sub(10)(3)").unwrap(), Value::int(-7));
}

#[test]
fn partial_application_of_mixed_types_checks_each_stage() {
    let repeat = "fn label(name: String, n: Int) -> String { name + to_string(n) }\n";

    assert_eq!(eval(&format!("{repeat}label(\"x\", 1)")), Value::string("x1"));
    assert_failure(&format!("{repeat}label(\"x\")(1)"), ErrorKind::InvalidArgumentType);
}

#[test]
fn curried_three_argument_function() {
    assert_eq!(eval("fn f(a: Int, b: Int, c: Int) -> Int { a * 100 + b * 10 + c }\nf(1)(2)(3)"),
               Value::int(321));
    assert_eq!(eval("fn f(a: Int, b: Int, c: Int) -> Int { a * 100 + b * 10 + c }\nf(1, 2)(3)"),
               Value::int(312));
}

#[test]
fn too_many_arguments_is_an_error() {
    assert_failure(&format!("{ADD}add(1, 2, 3)"), ErrorKind::Reference);
    assert_failure(&format!("{ADD}add(1, 2)(3)"), ErrorKind::Reference);
}

#[test]
fn arguments_are_type_checked() {
    assert_failure(&format!("{ADD}add(1, \"2\")"), ErrorKind::InvalidArgumentType);
    assert_failure(&format!("{ADD}add(1.0, 2)"), ErrorKind::InvalidArgumentType);
}

#[test]
fn missing_return_type_is_reported() {
    assert_failure("fn f() -> { 1 }", ErrorKind::MissingReturnType);
    assert_failure("fn f(x: Int) -> Nowhere { x }", ErrorKind::Reference);
}

#[test]
fn function_without_arrow_returns_unit_in_its_signature() {
    let mut session = Session::new();
    session.eval("fn hello { println(\"hello\") }").unwrap();
    assert_eq!(session.eval("hello").unwrap().to_string(), "[() -> Unit]");
    assert_eq!(session.eval("hello()").unwrap(), Value::unit());
}

#[test]
fn anonymous_functions_are_values() {
    assert_eq!(eval("let double = fn (x: Int) -> Int { x * 2 }\ndouble(21)"), Value::int(42));
    assert_eq!(eval("5 |> fn (x: Int) -> Int { x - 1 }"), Value::int(4));
}

#[test]
fn functions_accept_function_parameters() {
    assert_eq!(eval("fn apply(f: (Int) -> Int, x: Int) -> Int { f(x) }\nfn square(x: Int) -> Int { x * x }\napply(square, 7)"),
               Value::int(49));
    assert_failure("fn apply(f: (Int) -> Int, x: Int) -> Int { f(x) }\nfn greet(s: String) -> String { s }\napply(greet, 7)",
                   ErrorKind::InvalidArgumentType);
}

#[test]
fn functions_can_return_functions() {
    let mut session = Session::new();
    session.eval("fn make() -> (Int) -> Int { fn (x: Int) -> Int { x * 2 } }").unwrap();

    assert_eq!(session.eval("make").unwrap().to_string(), "[() -> (Int) -> Int]");
    assert_eq!(session.eval("make()(21)").unwrap(), Value::int(42));
}

#[test]
fn let_inside_function_body_binds_globally() {
    let mut session = Session::new();
    session.eval("fn remember(x: Int) { let last = x }").unwrap();
    session.eval("remember(9)").unwrap();
    assert_eq!(session.get("last"), Some(&Value::int(9)));
}

#[test]
fn free_names_resolve_through_the_calling_frames() {
    let mut session = Session::new();
    session.eval("fn g() -> Int { a }\nfn f(a: Int) -> Int { g() }").unwrap();

    assert_eq!(session.eval("f(5)").unwrap(), Value::int(5));
    assert_eq!(session.eval("g()").unwrap_err().kind(), ErrorKind::Reference);
}

#[test]
fn parameters_do_not_outlive_the_call() {
    assert_failure("fn id(x: Int) -> Int { x }\nid(1)\nx", ErrorKind::Reference);
}

#[test]
fn calling_a_non_function_fails() {
    assert_failure("let n = 1\nn(2)", ErrorKind::Reference);
    assert_failure("nothing(2)", ErrorKind::Reference);
}

#[test]
fn native_functions_can_be_added() {
    let mut session = Session::new();
    session.add_function("triple",
                         Function::native("triple",
                                          vec![Param::new("x", Type::INT)],
                                          Type::INT,
                                          |args, _| Ok(Value::int(args[0].as_int().unwrap_or(0) * 3))));

    assert_eq!(session.eval("triple(4)").unwrap(), Value::int(12));
    assert_eq!(session.eval("4 |> triple |> triple").unwrap(), Value::int(36));
    assert_eq!(session.eval("triple(\"x\")").unwrap_err().kind(), ErrorKind::InvalidArgumentType);
}

#[test]
fn builtins_are_seeded() {
    let session = Session::new();
    let names: Vec<_> = session.global_names().collect();
    assert_eq!(names, vec!["println", "assert", "to_string"]);
}

#[test]
fn registered_tests_run_on_demand() {
    let mut session = Session::new();
    session.eval(ADD).unwrap();
    session.eval("test \"addition\" { assert(add(1, 2) == 3) }").unwrap();
    session.eval("test { assert(add(1, 2) == 4) }").unwrap();
    assert_eq!(session.tests().len(), 2);

    let outcomes = session.run_tests();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].name, "addition");
    assert!(outcomes[0].passed());
    assert_eq!(outcomes[1].name, "test on line 1");
    assert!(!outcomes[1].passed());

    assert_success("test \"never run\" { assert(false) }");
}
