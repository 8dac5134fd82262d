use moonpad::{
    error::ErrorKind,
    interpreter::{evaluator::core::Session, value::core::Value},
};
use pretty_assertions::assert_eq;

fn assert_incomplete(session: &mut Session, src: &str) {
    match session.eval(src) {
        Ok(value) => panic!("Input was accepted with {value} but should be incomplete\n{src}"),
        Err(e) => {
            assert!(e.is_incomplete(), "expected an incomplete block, got: {e}");
            assert_eq!(e.kind(), ErrorKind::MissingRCurly);
        },
    }
}

#[test]
fn unclosed_function_requests_more_input() {
    let mut session = Session::new();
    session.eval("fn add(a: Int, b: Int) -> Int { a + b }").unwrap();
    assert_incomplete(&mut session, "fn add(a: Int, b: Int) -> Int {");
}

#[test]
fn resubmitted_buffer_completes_the_declaration() {
    let mut session = Session::new();
    let mut buffer = String::from("fn add(a: Int, b: Int) -> Int {");
    assert_incomplete(&mut session, &buffer);

    buffer.push_str("\n  a + b");
    assert_incomplete(&mut session, &buffer);

    buffer.push_str("\n}");
    session.eval(&buffer).unwrap();
    assert_eq!(session.eval("add(20, 22)").unwrap(), Value::int(42));
}

#[test]
fn every_block_construct_is_recognised() {
    let mut session = Session::new();
    for src in ["while true {",
                "for i = 0; i < 3; i = i + 1 {",
                "if true { 1 } else {",
                "if false { 1 } else if true {",
                "{ 1 + 2",
                "let m = { a: 1",
                "match 1 { 1 => 2",
                "struct P { x: Int",
                "enum E { A, B",
                "trait T { show(Self) -> String",
                "test \"t\" {",
                "let f = fn (x: Int) -> Int {",
                "1 |> fn (x: Int) -> Int { x"]
    {
        assert_incomplete(&mut session, src);
    }
}

#[test]
fn input_ending_mid_expression_inside_a_block_is_incomplete() {
    let mut session = Session::new();
    for src in ["fn show() {\n  println(to_string(1),",
                "fn f(x: Int) -> Int {\n  let y = x +",
                "match 1 {\n  1 =>",
                "struct P {\n  x:",
                "fn g() -> Int {\n  (1 +\n   2",
                "if true {\n  let m = { a:"]
    {
        assert_incomplete(&mut session, src);
    }

    let err = session.eval("while true {\n  if x {\n  }\n  f(1,").unwrap_err();
    assert_eq!(err.to_string(), "Error on line 1: Missing '}' to close block.");
}

#[test]
fn split_argument_list_completes_on_resubmission() {
    let mut session = Session::new();
    let mut buffer = String::from("fn show() -> String {\n  to_string(");
    assert_incomplete(&mut session, &buffer);

    buffer.push_str("\n    42)\n}");
    session.eval(&buffer).unwrap();
    assert_eq!(session.eval("show()").unwrap(), Value::string("42"));
}

#[test]
fn unfinished_expression_outside_a_block_is_a_syntax_error() {
    let mut session = Session::new();
    let err = session.eval("let a = 1\nlet b = a +").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.to_string(), "Error on line 2: Unexpected end of input.");
}

#[test]
fn innermost_unclosed_block_is_reported() {
    let mut session = Session::new();
    let err = session.eval("while true {\n  if x {").unwrap_err();
    assert_eq!(err.to_string(), "Error on line 2: Missing '}' to close if.");
}

#[test]
fn incomplete_input_has_no_side_effects() {
    let mut session = Session::new();
    assert_incomplete(&mut session, "let mut n = 1\nn = n + 1\nwhile false {");
    assert_eq!(session.get("n"), None);

    session.eval("let mut n = 1\nn = n + 1\nwhile false {\n}").unwrap();
    assert_eq!(session.get("n"), Some(&Value::int(2)));
}

#[test]
fn other_errors_are_not_incomplete() {
    let mut session = Session::new();
    for src in ["1 + \"2\"", "1 + 2 }", "undefined_name", "fn f() -> { 1 }"] {
        let err = session.eval(src).unwrap_err();
        assert!(!err.is_incomplete(), "{src} was reported as incomplete");
    }
}

#[test]
fn failed_eval_keeps_committed_globals() {
    let mut session = Session::new();
    assert!(session.eval("let before = 1\nif true { let inside = 2; missing }").is_err());

    assert_eq!(session.get("before"), Some(&Value::int(1)));
    assert_eq!(session.get("inside"), Some(&Value::int(2)));
    assert_eq!(session.eval("before + inside").unwrap(), Value::int(3));
}

#[test]
fn failed_eval_discards_pushed_frames() {
    let mut session = Session::new();
    session.eval("fn boom(local: Int) -> Int { local + missing }").unwrap();
    assert!(session.eval("boom(1)").is_err());

    assert_eq!(session.get("local"), None);
    assert_eq!(session.eval("1 + 1").unwrap(), Value::int(2));
}

#[test]
fn state_persists_between_calls() {
    let mut session = Session::new();
    session.eval("struct Point { x: Int, y: Int }").unwrap();
    session.eval("let mut total = 0").unwrap();
    session.eval("let p: Point = { x: 3, y: 4 }").unwrap();
    session.eval("total = total + p.x * p.y").unwrap();

    assert_eq!(session.eval("total").unwrap(), Value::int(12));
}

#[test]
fn error_messages_carry_the_line() {
    let mut session = Session::new();
    let err = session.eval("let a = 1\nlet b = a + true").unwrap_err();
    assert!(err.to_string().starts_with("Error on line 2:"), "{err}");
}
