use moonpad::{
    error::ErrorKind,
    get_result,
    interpreter::{
        evaluator::core::{Session, SessionConfig},
        value::core::Value,
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

#[test]
fn let_binding_persists_across_evals() {
    let mut session = Session::new();
    assert_eq!(session.eval("let x = 5").unwrap(), Value::int(5));
    assert_eq!(session.eval("x").unwrap(), Value::int(5));
    assert_eq!(session.eval("x + 10").unwrap(), Value::int(15));
}

#[test]
fn mutable_binding_can_be_reassigned() {
    let mut session = Session::new();
    session.eval("let mut x = 5").unwrap();
    session.eval("x = 10").unwrap();
    assert_eq!(session.eval("x + 10").unwrap(), Value::int(20));
}

#[test]
fn immutable_binding_rejects_assignment() {
    assert_failure("let x = 5\nx = 10", ErrorKind::Reference);
}

#[test]
fn redeclaring_replaces_binding_and_mutability() {
    assert_success("let x = 1\nlet mut x = \"now a string\"\nx = \"changed\"\nassert(x == \"changed\")");
    assert_failure("let mut x = 1\nlet x = 2\nx = 3", ErrorKind::Reference);
}

#[test]
fn assignment_must_keep_the_binding_type() {
    assert_failure("let mut x = 1\nx = \"one\"", ErrorKind::TypeMismatch);
}

#[test]
fn bare_assignment_creates_a_global() {
    assert_eq!(eval("y = 3\ny = y + 1\ny"), Value::int(4));
}

#[test]
fn strict_mode_rejects_undeclared_assignment() {
    let mut session = Session::with_config(SessionConfig { strict_mode: true });
    assert!(session.config().strict_mode);
    let err = session.eval("y = 3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reference);

    session.eval("let mut y = 0").unwrap();
    assert_eq!(session.eval("y = 3\ny").unwrap(), Value::int(3));
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(eval("1 + 2 * 3"), Value::int(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::int(9));
    assert_eq!(eval("10 - 4 - 3"), Value::int(3));
    assert_eq!(eval("17 % 5"), Value::int(2));
    assert_eq!(eval("7 / 2"), Value::int(3));
    assert_eq!(eval("1.5 * 2.0"), Value::double(3.0));
    assert_eq!(eval("-3 + 1"), Value::int(-2));
}

#[test]
fn mixed_operand_types_are_rejected() {
    assert_failure("1 + \"2\"", ErrorKind::TypeMismatch);
    assert_failure("1 + 2.0", ErrorKind::TypeMismatch);
    assert_failure("\"a\" * \"b\"", ErrorKind::TypeMismatch);
    assert_failure("-true", ErrorKind::TypeMismatch);
}

#[test]
fn strings_concatenate() {
    assert_eq!(eval(r#""moon" + "bit""#), Value::string("moonbit"));
}

#[test]
fn integer_faults_are_errors() {
    assert_failure("1 / 0", ErrorKind::Arithmetic);
    assert_failure("1 % 0", ErrorKind::Arithmetic);
    assert_failure("9223372036854775807 + 1", ErrorKind::Arithmetic);
    assert_failure("99999999999999999999", ErrorKind::Syntax);
}

#[test]
fn comparisons_produce_bools() {
    assert_success("assert(2 < 3)");
    assert_success("assert(3 > 2)");
    assert_success("assert(2 <= 2)");
    assert_success("assert(3 >= 3)");
    assert_success("assert(2 != 3)");
    assert_success("assert('a' < 'b')");
    assert_success("assert(\"abc\" == \"abc\")");
    assert_success("assert(!false)");
}

#[test]
fn comparison_chain_folds_into_previous_result() {
    assert_eq!(eval("1 < 2 == true"), Value::bool(true));
    assert_eq!(eval("3 < 2 == false"), Value::bool(true));
    assert_failure("1 < 2 < 3", ErrorKind::TypeMismatch);
}

#[test]
fn if_else_chain_picks_first_true_branch() {
    assert_eq!(eval("if 3 < 2 { 10 } else if 1 > 2 { 3 } else { 8 }"), Value::int(8));
    assert_eq!(eval("if 3 > 2 { 10 } else { 8 }"), Value::int(10));
    assert_eq!(eval("if false { 1 }"), Value::unit());
    assert_failure("if 1 { 2 }", ErrorKind::TypeMismatch);
}

#[test]
fn while_loop_reevaluates_condition() {
    assert_success("let mut i = 0\nwhile i < 5 { i = i + 1 }\nassert(i == 5)");
}

#[test]
fn for_loop_runs_body_ten_times() {
    let mut session = Session::new();
    session.eval("let mut count = 0\nlet mut sum = 0").unwrap();
    session.eval("for i = 0; i < 10; i = i + 1 { count = count + 1; sum = sum + i; println(i) }")
           .unwrap();

    assert_eq!(session.get("count"), Some(&Value::int(10)));
    assert_eq!(session.get("sum"), Some(&Value::int(45)));
    assert_eq!(session.get("i"), Some(&Value::int(10)));
}

#[test]
fn for_loop_accepts_let_initializer() {
    assert_success("let mut total = 0\nfor let mut k = 1; k <= 3; k = k + 1 { total = total + k }\nassert(total == 6)");
}

#[test]
fn let_inside_block_binds_globally() {
    let mut session = Session::new();
    session.eval("if true { let inner = 5 }").unwrap();
    assert_eq!(session.eval("inner").unwrap(), Value::int(5));
}

#[test]
fn block_evaluates_to_last_expression() {
    assert_eq!(eval("{ 1; 2; 3 }"), Value::int(3));
    assert_eq!(eval("{ }"), Value::map(Vec::new()));
}

#[test]
fn string_escapes_are_resolved() {
    assert_eq!(eval(r#""a\tb\nc""#), Value::string("a\tb\nc"));
    assert_eq!(eval(r#""say \"hi\"""#), Value::string("say \"hi\""));
    assert_eq!(eval(r#""back\\slash""#), Value::string("back\\slash"));
}

#[test]
fn string_templates_evaluate_inner_expressions() {
    assert_eq!(eval(r#""ha\{1+1}ha""#), Value::string("ha2ha"));
    assert_eq!(eval(r#"let name = "moon"
"hello \{name}, \{1 + 2} times""#),
               Value::string("hello moon, 3 times"));
    assert_eq!(eval(r#""\{if true { 1 } else { 2 }}""#), Value::string("1"));
}

#[test]
fn malformed_templates_fail() {
    assert_failure(r#""\{1 +}""#, ErrorKind::Syntax);
    assert_failure(r#""\{1""#, ErrorKind::Syntax);
    assert_failure(r#""\{missing}""#, ErrorKind::Reference);
}

#[test]
fn template_with_unclosed_block_is_invalid_not_incomplete() {
    let err = get_result(r#""\{ if true { '}' }""#, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(!err.is_incomplete(), "{err}");
}

#[test]
fn map_literals_support_field_access() {
    assert_eq!(eval("let m = { a: 1, b: \"two\" }\nm.b"), Value::string("two"));
    assert_eq!(eval("let p = { inner: { depth: 2 } }\np.inner.depth"), Value::int(2));
    assert_failure("let m = { a: 1 }\nm.z", ErrorKind::Reference);
}

#[test]
fn map_fields_need_a_mutable_binding() {
    assert_eq!(eval("let mut m = { a: 1 }\nm.a = 5\nm.a"), Value::int(5));
    assert_failure("let m = { a: 1 }\nm.a = 5", ErrorKind::Reference);
    assert_failure("let mut m = { a: 1 }\nm.a = \"x\"", ErrorKind::TypeMismatch);
}

#[test]
fn match_selects_first_matching_arm() {
    assert_eq!(eval("match 3 { 1 => \"one\", 3 => \"three\", _ => \"other\" }"),
               Value::string("three"));
    assert_eq!(eval("match 7 { 1 => 0, n => n * 2 }"), Value::int(14));
    assert_eq!(eval("match \"a\" { \"a\" => 1, _ => 2 }"), Value::int(1));
    assert_eq!(eval("match -1 { -1 => true, _ => false }"), Value::bool(true));
}

#[test]
fn match_without_matching_arm_fails() {
    assert_failure("match 5 { 1 => 2 }", ErrorKind::Runtime);
}

#[test]
fn match_bindings_stay_local_to_the_arm() {
    assert_failure("match 1 { n => n }\nn", ErrorKind::Reference);
}

#[test]
fn assert_builtin_reports_failure() {
    assert_failure("assert(1 == 2)", ErrorKind::Runtime);
    assert_failure("assert(1)", ErrorKind::InvalidArgumentType);
}

#[test]
fn to_string_renders_values() {
    assert_eq!(eval("to_string(42)"), Value::string("42"));
    assert_eq!(eval("to_string({ a: \"x\" })"), Value::string("{a: \"x\"}"));
}

#[test]
fn comments_and_separators_are_ignored() {
    assert_eq!(eval("// leading comment\nlet a = 1; let b = 2 // trailing\na + b"), Value::int(3));
}

#[test]
fn unknown_variable_is_error() {
    assert_failure("assert(foo == 1)", ErrorKind::Reference);
}

#[test]
fn unmatched_closing_brace_is_a_syntax_error() {
    assert_failure("1 + 2 }", ErrorKind::Syntax);
    assert_failure("let = 4", ErrorKind::Syntax);
    assert_failure("let x = 1 $ 2", ErrorKind::Syntax);
}

#[test]
fn pure_expressions_are_idempotent() {
    let mut session = Session::new();
    for src in ["42",
                "2.5 * 4.0",
                "0.0 / 0.0",
                r#""ha\{1+1}ha""#,
                "'c'",
                "1 < 2 == true",
                "{ a: 1, b: 2.0 }",
                "-7 % 3"]
    {
        let first = session.eval(src).unwrap();
        let second = session.eval(src).unwrap();
        assert_eq!(first.ty, second.ty, "type differs for {src}");
        assert_eq!(first, second, "payload differs for {src}");
    }
}

#[test]
fn values_render_for_the_repl() {
    assert_eq!(eval("").to_string(), "()");
    assert_eq!(eval("1.5").to_string(), "1.5");
    assert_eq!(eval("'x'").to_string(), "x");
    assert_eq!(eval("{ a: 1, b: \"s\" }").to_string(), "{a: 1, b: \"s\"}");
}
