use crate::{
    lexer::prelude::Token,
    parser::prelude::{
        parse_source, ArrayFn, Expression, ParseError, ParseErrorType, Statement, VarType,
    },
};

fn parse_statements(input: &str) -> Result<Vec<Statement>, ParseError> {
    Ok(parse_source(input)?.program.statements)
}

#[test]
fn test_declarations() -> Result<(), ParseError> {
    let statements = parse_statements(
        r#"
        set int x = 5
        set float f = 2.5
        set char c = "a"
        set string s = "hi"
        set array a = [1, 2, 3]
        set array empty
    "#,
    )?;

    assert_eq!(statements.len(), 6);

    let Statement::Declaration(declaration) = &statements[0] else {
        panic!("expected declaration, got {:?}", statements[0]);
    };
    assert_eq!(declaration.var_type, VarType::Int);
    assert_eq!(declaration.name.value, "x");
    assert!(matches!(
        declaration.value,
        Some(Expression::Int { value: 5, .. })
    ));

    let Statement::Declaration(declaration) = &statements[5] else {
        panic!("expected declaration, got {:?}", statements[5]);
    };
    assert_eq!(declaration.var_type, VarType::Array);
    assert!(declaration.value.is_none());

    Ok(())
}

#[test]
fn test_declaration_requires_type() {
    let error = parse_statements("set foo x = 1").unwrap_err();

    assert_eq!(error.error, ParseErrorType::ExpectedType);
}

#[test]
fn test_optional_semicolons() -> Result<(), ParseError> {
    let with = parse_statements("print 1; print 2; print 3;")?;
    let without = parse_statements("print 1 print 2 print 3")?;

    assert_eq!(with.len(), 3);
    assert_eq!(without.len(), 3);

    Ok(())
}

#[test]
fn test_flat_term_precedence() -> Result<(), ParseError> {
    // All term operators share one precedence level and associate left:
    // `1 + 2 * 3` parses as `(1 + 2) * 3`.
    let statements = parse_statements("print 1 + 2 * 3")?;

    let Statement::Print(print) = &statements[0] else {
        panic!("expected print");
    };
    let Expression::Binary(outer) = &print.expression else {
        panic!("expected binary");
    };
    assert_eq!(outer.operator, Token::Asterisk);
    assert!(matches!(*outer.left, Expression::Binary(_)));
    assert!(matches!(*outer.right, Expression::Int { value: 3, .. }));

    Ok(())
}

#[test]
fn test_comparison_and_logic_share_a_level() -> Result<(), ParseError> {
    let statements = parse_statements("print 1 < 2 && 3")?;

    let Statement::Print(print) = &statements[0] else {
        panic!("expected print");
    };
    let Expression::Binary(outer) = &print.expression else {
        panic!("expected binary");
    };
    assert_eq!(outer.operator, Token::And);
    let Expression::Binary(inner) = &*outer.left else {
        panic!("expected binary left operand");
    };
    assert_eq!(inner.operator, Token::LessThan);

    Ok(())
}

#[test]
fn test_leading_minus_wraps_the_first_term() -> Result<(), ParseError> {
    // `- x + 2` negates the whole term: Neg(x + 2).
    let statements = parse_statements("print - x + 2")?;

    let Statement::Print(print) = &statements[0] else {
        panic!("expected print");
    };
    let Expression::Unary(unary) = &print.expression else {
        panic!("expected unary, got {:?}", print.expression);
    };
    assert!(matches!(*unary.expression, Expression::Binary(_)));

    Ok(())
}

#[test]
fn test_minus_rejected_inside_a_term() {
    // Only a literal fold (`-2`) or a leading sign is admitted; a bare `-`
    // in factor position is not.
    let error = parse_statements("print 2 * - x").unwrap_err();

    assert!(matches!(
        error.error,
        ParseErrorType::UnexpectedToken { .. }
    ));
}

#[test]
fn test_assignment() -> Result<(), ParseError> {
    let statements = parse_statements("x = 1 + 2")?;

    let Statement::Assignment(assignment) = &statements[0] else {
        panic!("expected assignment, got {:?}", statements[0]);
    };
    assert_eq!(assignment.name.value, "x");
    assert!(matches!(assignment.value, Expression::Binary(_)));

    Ok(())
}

#[test]
fn test_invalid_assignment_target() {
    let error = parse_statements("5 = 3").unwrap_err();

    assert_eq!(error.error, ParseErrorType::InvalidAssignmentTarget);
}

#[test]
fn test_if_else() -> Result<(), ParseError> {
    let statements = parse_statements(
        r#"
        if (x < 5) { print 1 } else { print 2 }
        if (x) { print 3 }
    "#,
    )?;

    let Statement::If(first) = &statements[0] else {
        panic!("expected if");
    };
    assert_eq!(first.consequence.len(), 1);
    assert!(first.alternative.is_some());

    let Statement::If(second) = &statements[1] else {
        panic!("expected if");
    };
    assert!(second.alternative.is_none());

    Ok(())
}

#[test]
fn test_for_loop() -> Result<(), ParseError> {
    let statements = parse_statements("for (i = 0; i < 3; i = i + 1) { print i }")?;

    let Statement::For(for_stmt) = &statements[0] else {
        panic!("expected for");
    };
    assert_eq!(for_stmt.init.name.value, "i");
    assert_eq!(for_stmt.increment.name.value, "i");
    assert_eq!(for_stmt.body.len(), 1);

    Ok(())
}

#[test]
fn test_while_loop() -> Result<(), ParseError> {
    let statements = parse_statements("while (x < 10) { x = x + 1 }")?;

    let Statement::While(while_stmt) = &statements[0] else {
        panic!("expected while");
    };
    assert!(matches!(while_stmt.condition, Expression::Binary(_)));

    Ok(())
}

#[test]
fn test_unexpected_eof() {
    let error = parse_statements("set int x =").unwrap_err();
    assert_eq!(error.error, ParseErrorType::UnexpectedEof);

    let error = parse_statements("if (x) { print 1").unwrap_err();
    assert_eq!(error.error, ParseErrorType::UnexpectedEof);
}

#[test]
fn test_call_arity_is_checked() {
    let error = parse_statements("print pow(1)").unwrap_err();

    assert!(matches!(
        error.error,
        ParseErrorType::WrongArgumentCount { ref function, got: 1, .. } if function == "pow"
    ));

    let error = parse_statements("print random(1)").unwrap_err();

    assert!(matches!(
        error.error,
        ParseErrorType::WrongArgumentCount { .. }
    ));
}

#[test]
fn test_variadic_calls() -> Result<(), ParseError> {
    parse_statements("print max(1, 2, 3, 4) print min(5) print concat(\"a\", 1, \"b\")")?;

    Ok(())
}

#[test]
fn test_array_op_surface_forms() -> Result<(), ParseError> {
    // `push` and `get` take no parentheses; `pop` and `size` require them.
    // `get` additionally accepts the parenthesised form.
    let statements = parse_statements(
        r#"
        push a 5
        get a 0
        print get(a, 1)
        print pop(a)
        print size(a)
    "#,
    )?;

    let Statement::Expression(Expression::Array(push)) = &statements[0] else {
        panic!("expected array op, got {:?}", statements[0]);
    };
    assert_eq!(push.function, ArrayFn::Push);
    assert_eq!(push.array.value, "a");
    assert!(push.argument.is_some());

    let Statement::Expression(Expression::Array(get)) = &statements[1] else {
        panic!("expected array op");
    };
    assert_eq!(get.function, ArrayFn::Get);

    Ok(())
}

#[test]
fn test_pop_requires_parentheses() {
    let error = parse_statements("pop a").unwrap_err();

    assert!(matches!(
        error.error,
        ParseErrorType::UnexpectedToken { .. }
    ));
}

#[test]
fn test_input_call() -> Result<(), ParseError> {
    let statements = parse_statements(r#"x = input("name: ") y = input()"#)?;

    let Statement::Assignment(assignment) = &statements[0] else {
        panic!("expected assignment");
    };
    let Expression::Input(input) = &assignment.value else {
        panic!("expected input call");
    };
    assert_eq!(input.prompt.as_ref().unwrap().value, "name: ");

    let Statement::Assignment(assignment) = &statements[1] else {
        panic!("expected assignment");
    };
    assert!(matches!(
        assignment.value,
        Expression::Input(ref input) if input.prompt.is_none()
    ));

    Ok(())
}

#[test]
fn test_comments_are_collected() -> Result<(), ParseError> {
    let parsed = parse_source("print 1 // trailing\n/* block */ print 2")?;

    assert_eq!(parsed.program.statements.len(), 2);
    assert_eq!(parsed.comments.len(), 2);

    Ok(())
}

#[test]
fn test_display_is_stable() -> Result<(), ParseError> {
    let source = r#"
        set int x = 5
        if (x < 10) { print x } else { print "big" }
        for (i = 0; i < 3; i = i + 1) { push a i }
        while (x > 0) { x = x - 1 }
        print concat("x = ", x)
    "#;

    let printed = parse_source(source)?.program.to_string();
    let reprinted = parse_source(&printed)?.program.to_string();

    assert_eq!(printed, reprinted);

    Ok(())
}

#[test]
fn test_parenthesised_grouping() -> Result<(), ParseError> {
    let statements = parse_statements("print (1 + 2) * 3")?;

    let Statement::Print(print) = &statements[0] else {
        panic!("expected print");
    };
    let Expression::Binary(outer) = &print.expression else {
        panic!("expected binary");
    };
    assert_eq!(outer.operator, Token::Asterisk);

    Ok(())
}
