use crate::{
    compile,
    eval::prelude::{Execution, QueuedInput, RuntimeError},
    execute_with,
    utils::prelude::Error,
};

fn exec(src: &str) -> Result<Execution, Error> {
    let program = compile(src)?;
    execute_with(&program, &mut QueuedInput::default())
}

fn run(src: &str) -> Result<Vec<String>, Error> {
    Ok(exec(src)?.output)
}

fn run_with_input(src: &str, lines: &[&str]) -> Result<Vec<String>, Error> {
    let program = compile(src)?;
    execute_with(&program, &mut QueuedInput::new(lines.iter().copied()))
        .map(|execution| execution.output)
}

fn runtime_error(result: Result<Vec<String>, Error>) -> RuntimeError {
    match result {
        Err(Error::Runtime { error }) => error,
        other => panic!("expected runtime error, got {other:?}"),
    }
}

#[test]
fn test_print_order() {
    assert_eq!(run("print 1 print 2 print 3").unwrap(), vec!["1", "2", "3"]);
}

#[test]
fn test_arithmetic() {
    // Term operators associate left at one precedence level.
    assert_eq!(run("print 1 + 2 * 3").unwrap(), vec!["9"]);
    assert_eq!(run("print 10 - 2 - 3").unwrap(), vec!["5"]);
    assert_eq!(run("print 7 % 3").unwrap(), vec!["1"]);
}

#[test]
fn test_division_produces_float() {
    assert_eq!(run("print 5 / 2").unwrap(), vec!["2.5"]);
    // Whole results still print without a fractional part.
    assert_eq!(run("print 4 / 2").unwrap(), vec!["2"]);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        runtime_error(run("print 1 / 0")),
        RuntimeError::DivisionByZero
    );
    assert_eq!(
        runtime_error(run("print 1 % 0")),
        RuntimeError::DivisionByZero
    );
}

#[test]
fn test_modulo_overflow_widens_to_float() {
    // i64::MIN % -1 overflows the integer path and falls through to float
    // arithmetic instead of panicking.
    let output = run("x = -9223372036854775808 print x % -1").unwrap();

    assert_eq!(output.len(), 1);
}

#[test]
fn test_arithmetic_type_mismatch() {
    assert!(matches!(
        runtime_error(run(r#"print "a" * 2"#)),
        RuntimeError::TypeMismatch { .. }
    ));
}

#[test]
fn test_comparisons_yield_int_flags() {
    assert_eq!(run("print 1 < 2 print 2 < 1").unwrap(), vec!["1", "0"]);
    assert_eq!(run("print 2 == 2 print 2 != 2").unwrap(), vec!["1", "0"]);
    assert_eq!(run(r#"print "a" == "a""#).unwrap(), vec!["1"]);
}

#[test]
fn test_string_ordering_is_lexicographic() {
    assert_eq!(run(r#"print "a" < "b""#).unwrap(), vec!["1"]);
    assert_eq!(run(r#"print "b" <= "a""#).unwrap(), vec!["0"]);
    assert_eq!(run(r#"print "apple" > "app""#).unwrap(), vec!["1"]);
    // Chars order the same way strings do.
    assert_eq!(
        run(r#"set char a = "a" set char b = "b" print a < b"#).unwrap(),
        vec!["1"]
    );
}

#[test]
fn test_ordering_undefined_for_other_pairings() {
    assert_eq!(
        runtime_error(run(r#"print "a" < 5"#)),
        RuntimeError::UnknownOperator {
            operator: "<".into()
        }
    );
    assert_eq!(
        runtime_error(run("set array a = [1] print a < 2")),
        RuntimeError::UnknownOperator {
            operator: "<".into()
        }
    );
}

#[test]
fn test_logic_truthiness() {
    assert_eq!(run("print 1 && 0 print 0 || 3").unwrap(), vec!["0", "1"]);
    assert_eq!(run(r#"print "" || 0"#).unwrap(), vec!["0"]);
    assert_eq!(run(r#"print "x" && 1"#).unwrap(), vec!["1"]);
}

#[test]
fn test_declared_variable_prints() {
    assert_eq!(run("set int x = 5; print x;").unwrap(), vec!["5"]);
}

#[test]
fn test_string_escapes_print_unescaped() {
    // The printed value carries the real newline, not the escape spelling.
    assert_eq!(run(r#"print "a\nb""#).unwrap(), vec!["a\nb"]);
}

#[test]
fn test_variables() {
    assert_eq!(run("set int x = 5 x = x + 1 print x").unwrap(), vec!["6"]);
}

#[test]
fn test_assignment_declares_implicitly() {
    // Writing to an unknown name creates it; only reads fail.
    assert_eq!(run("y = 2 print y").unwrap(), vec!["2"]);
    assert_eq!(
        runtime_error(run("print y")),
        RuntimeError::UndefinedVariable { name: "y".into() }
    );
}

#[test]
fn test_declaration_coercion() {
    assert_eq!(run("set int x = 3.9 print x").unwrap(), vec!["3"]);
    assert_eq!(run(r#"set int x = "12" print x"#).unwrap(), vec!["12"]);
    assert_eq!(run("set float f = 1 print f").unwrap(), vec!["1"]);
    assert_eq!(run(r#"set char c = "hello" print c"#).unwrap(), vec!["h"]);
    assert_eq!(run("set string s = 42 print s").unwrap(), vec!["42"]);
}

#[test]
fn test_char_of_empty_string_fails() {
    assert!(matches!(
        runtime_error(run(r#"set char c = """#)),
        RuntimeError::TypeMismatch {
            expected: "char",
            ..
        }
    ));
}

#[test]
fn test_if_else() {
    let src = r#"
        set int x = 3
        if (x < 5) { print "small" } else { print "big" }
        if (x > 5) { print "never" } else { print "else" }
    "#;

    assert_eq!(run(src).unwrap(), vec!["small", "else"]);
}

#[test]
fn test_while_loop() {
    let src = r#"
        set int sum = 0
        set int i = 1
        while (i <= 4) {
            sum = sum + i
            i = i + 1
        }
        print sum
    "#;

    assert_eq!(run(src).unwrap(), vec!["10"]);
}

#[test]
fn test_for_loop_declares_its_variable() {
    assert_eq!(
        run("for (i = 0; i < 3; i = i + 1) { print i }").unwrap(),
        vec!["0", "1", "2"]
    );
}

#[test]
fn test_math_library() {
    assert_eq!(run("print sqrt(9)").unwrap(), vec!["3"]);
    assert_eq!(run("print pow(2, 10)").unwrap(), vec!["1024"]);
    assert_eq!(run("print abs(-5)").unwrap(), vec!["5"]);
    assert_eq!(run("print round(2.5)").unwrap(), vec!["3"]);
    assert_eq!(run("print floor(2.9)").unwrap(), vec!["2"]);
    assert_eq!(run("print ceil(2.1)").unwrap(), vec!["3"]);
    assert_eq!(run("print max(1, 5, 3)").unwrap(), vec!["5"]);
    assert_eq!(run("print min(4, 2, 8)").unwrap(), vec!["2"]);
}

#[test]
fn test_leading_minus_negates_the_whole_term() {
    // `- x + 2` is -(x + 2), not (-x) + 2.
    assert_eq!(run("x = 1 print - x + 2").unwrap(), vec!["-3"]);
    assert_eq!(run("print -2 * 3").unwrap(), vec!["-6"]);
}

#[test]
fn test_round_family_returns_ints() {
    // The produced value kind is an int, observable through coercion.
    assert_eq!(
        runtime_error(run("set array a = round(1.5)")),
        RuntimeError::TypeMismatch {
            expected: "array",
            found: "int".into()
        }
    );
    assert_eq!(
        runtime_error(run("set array a = sqrt(2)")),
        RuntimeError::TypeMismatch {
            expected: "array",
            found: "float".into()
        }
    );
}

#[test]
fn test_random_in_unit_range() {
    assert_eq!(
        run("set float r = random() print r >= 0 print r < 1").unwrap(),
        vec!["1", "1"]
    );
}

#[test]
fn test_string_library() {
    assert_eq!(run(r#"print length("hello")"#).unwrap(), vec!["5"]);
    assert_eq!(
        run(r#"print concat("a", 1, "b")"#).unwrap(),
        vec!["a1b"]
    );
    assert_eq!(run(r#"print substring("hello", 1, 3)"#).unwrap(), vec!["el"]);
    assert_eq!(run(r#"print substring("hello", 1)"#).unwrap(), vec!["ello"]);
    assert_eq!(run(r#"print uppercase("abc")"#).unwrap(), vec!["ABC"]);
    assert_eq!(run(r#"print lowercase("ABC")"#).unwrap(), vec!["abc"]);
    assert_eq!(run(r#"print trim("  x  ")"#).unwrap(), vec!["x"]);
}

#[test]
fn test_arrays() {
    let src = r#"
        set array a = [1, 2, 3]
        push a 4
        print size(a)
        print get a 0
        print get(a, 3)
        print pop(a)
        print size(a)
    "#;

    assert_eq!(run(src).unwrap(), vec!["4", "1", "4", "4", "3"]);
}

#[test]
fn test_array_errors() {
    assert_eq!(
        runtime_error(run("set array a = [1, 2, 3] print get a 10")),
        RuntimeError::IndexOutOfBounds { index: 10, size: 3 }
    );
    assert_eq!(
        runtime_error(run("set array a print get a -1")),
        RuntimeError::IndexOutOfBounds { index: -1, size: 0 }
    );
    assert_eq!(
        runtime_error(run("set array a print pop(a)")),
        RuntimeError::EmptyArray
    );
    assert!(matches!(
        runtime_error(run("set int x = 1 push x 2")),
        RuntimeError::TypeMismatch {
            expected: "array",
            ..
        }
    ));
}

#[test]
fn test_input_parses_narrowest_type() {
    let src = r#"
        x = input("x: ")
        y = input()
        z = input()
        print x + 1
        print y
        print z
    "#;

    assert_eq!(
        run_with_input(src, &["42", "3.5", "hi"]).unwrap(),
        vec!["43", "3.5", "hi"]
    );
}

#[test]
fn test_exhausted_input_fails() {
    assert_eq!(
        runtime_error(run("x = input()")),
        RuntimeError::NoInputProvided
    );
}

#[test]
fn test_debug_library() {
    // debug/trace feed the diagnostics channel, never the output sequence.
    let execution = exec("debug(5) trace() print 1").unwrap();
    assert_eq!(execution.output, vec!["1"]);
    assert_eq!(execution.diagnostics, vec!["[debug] 5", "[trace]"]);

    // debug passes its value through.
    let execution = exec("print debug(5) + 1").unwrap();
    assert_eq!(execution.output, vec!["6"]);
    assert_eq!(execution.diagnostics, vec!["[debug] 5"]);

    assert_eq!(run("assert(1 == 1)").unwrap(), Vec::<String>::new());
    assert_eq!(
        runtime_error(run(r#"assert(0, "boom")"#)),
        RuntimeError::AssertionFailed {
            message: "boom".into()
        }
    );
    assert_eq!(
        runtime_error(run("assert(0)")),
        RuntimeError::AssertionFailed {
            message: "assertion is false".into()
        }
    );
}

#[test]
fn test_failure_discards_output() {
    let result = run("print 1 print 1 / 0");

    assert_eq!(runtime_error(result), RuntimeError::DivisionByZero);
}

#[test]
fn test_empty_source_is_rejected() {
    assert_eq!(compile("").unwrap_err(), Error::EmptyInput);
    assert_eq!(compile("   \n\t  ").unwrap_err(), Error::EmptyInput);
}

#[test]
fn test_compilation_is_idempotent() {
    let src = r#"
        set array out
        for (i = 0; i < 5; i = i + 1) { push out i * i }
        print out
    "#;

    assert_eq!(compile(src).unwrap(), compile(src).unwrap());
}

#[test]
fn test_logic_short_circuits() {
    // The right operand never runs when the left decides the outcome, so
    // the undefined read is never reached.
    assert_eq!(run("print 0 && missing").unwrap(), vec!["0"]);
    assert_eq!(run("print 1 || missing").unwrap(), vec!["1"]);
}
