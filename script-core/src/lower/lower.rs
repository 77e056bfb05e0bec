use crate::{
    lexer::prelude::Token,
    parser::prelude::{Assignment, Expression, Program, Statement},
};

use super::program::{ArithOp, CompareOp, ExecutableProgram, Expr, LogicOp, Op};

/// Lower a parsed program to its executable form. The translation is total:
/// the grammar only admits operators and node shapes the lowered
/// representation can express, so no errors can arise here. All binding
/// checks are deferred to evaluation.
pub fn lower(program: &Program) -> ExecutableProgram {
    ExecutableProgram {
        ops: lower_block(&program.statements),
    }
}

fn lower_block(statements: &[Statement]) -> Vec<Op> {
    statements.iter().map(lower_statement).collect()
}

fn lower_statement(statement: &Statement) -> Op {
    match statement {
        Statement::Declaration(declaration) => Op::Declare {
            var_type: declaration.var_type,
            name: declaration.name.value.clone(),
            value: declaration.value.as_ref().map(lower_expression),
        },
        Statement::Assignment(assignment) => Op::Assign {
            name: assignment.name.value.clone(),
            value: lower_expression(&assignment.value),
        },
        Statement::Print(print) => Op::Print(lower_expression(&print.expression)),
        Statement::If(if_stmt) => Op::If {
            condition: lower_expression(&if_stmt.condition),
            consequence: lower_block(&if_stmt.consequence),
            alternative: if_stmt.alternative.as_deref().map(lower_block),
        },
        Statement::For(for_stmt) => Op::For {
            init: lower_loop_assignment(&for_stmt.init),
            condition: lower_expression(&for_stmt.condition),
            increment: lower_loop_assignment(&for_stmt.increment),
            body: lower_block(&for_stmt.body),
        },
        Statement::While(while_stmt) => Op::While {
            condition: lower_expression(&while_stmt.condition),
            body: lower_block(&while_stmt.body),
        },
        Statement::Expression(expression) => Op::Expr(lower_expression(expression)),
    }
}

fn lower_loop_assignment(assignment: &Assignment) -> (String, Expr) {
    (
        assignment.name.value.clone(),
        lower_expression(&assignment.value),
    )
}

fn lower_expression(expression: &Expression) -> Expr {
    match expression {
        Expression::Identifier(identifier) => Expr::Var(identifier.value.clone()),
        Expression::Int { value, .. } => Expr::Int(*value),
        Expression::Float { value, .. } => Expr::Float(*value),
        Expression::Str(lit) => Expr::Str(lit.value.clone()),
        Expression::Unary(unary) => Expr::Neg(Box::new(lower_expression(&unary.expression))),
        Expression::Binary(binary) => {
            let left = Box::new(lower_expression(&binary.left));
            let right = Box::new(lower_expression(&binary.right));

            match &binary.operator {
                Token::Plus => arith(ArithOp::Add, left, right),
                Token::Minus => arith(ArithOp::Sub, left, right),
                Token::Asterisk => arith(ArithOp::Mul, left, right),
                Token::Slash => arith(ArithOp::Div, left, right),
                Token::Percent => arith(ArithOp::Mod, left, right),
                Token::Equal => compare(CompareOp::Equal, left, right),
                Token::NotEqual => compare(CompareOp::NotEqual, left, right),
                Token::LessThan => compare(CompareOp::LessThan, left, right),
                Token::LessThanOrEqual => compare(CompareOp::LessThanOrEqual, left, right),
                Token::GreaterThan => compare(CompareOp::GreaterThan, left, right),
                Token::GreaterThanOrEqual => compare(CompareOp::GreaterThanOrEqual, left, right),
                Token::And => Expr::Logic {
                    op: LogicOp::And,
                    left,
                    right,
                },
                Token::Or => Expr::Logic {
                    op: LogicOp::Or,
                    left,
                    right,
                },
                token => panic!("Invalid binary operator token `{token}` in parsed tree"),
            }
        }
        Expression::Input(input) => Expr::Input {
            prompt: input.prompt.as_ref().map(|prompt| prompt.value.clone()),
        },
        Expression::Math(call) => Expr::Math {
            function: call.function,
            arguments: call.arguments.iter().map(lower_expression).collect(),
        },
        Expression::Text(call) => Expr::Text {
            function: call.function,
            arguments: call.arguments.iter().map(lower_expression).collect(),
        },
        Expression::Debug(call) => Expr::Debug {
            function: call.function,
            arguments: call.arguments.iter().map(lower_expression).collect(),
        },
        Expression::ArrayLit(lit) => {
            Expr::ArrayLit(lit.elements.iter().map(lower_expression).collect())
        }
        Expression::Array(op) => Expr::Array {
            function: op.function,
            array: op.array.value.clone(),
            argument: op
                .argument
                .as_ref()
                .map(|argument| Box::new(lower_expression(argument))),
        },
    }
}

fn arith(op: ArithOp, left: Box<Expr>, right: Box<Expr>) -> Expr {
    Expr::Arith { op, left, right }
}

fn compare(op: CompareOp, left: Box<Expr>, right: Box<Expr>) -> Expr {
    Expr::Compare { op, left, right }
}
