/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Return-trailing capture.
//!
//! A goal block written after `return E;` would be dead code. Before
//! extraction, such blocks are lifted into a `finally` clause so they can
//! observe the returned value:
//!
//! ```text
//! return E;                 let returned_n;
//! COMEHERE: with (…) {      try {
//!   log(Function.return);     return returned_n = E;
//! }                         } finally {
//!                             COMEHERE: with (…) {
//!                               log(returned_n);
//!                             }
//!                           }
//! ```
//!
//! `Function.return` is the magic name for "the value being returned"; a
//! fresh capture variable is allocated per return.

use crate::ast::*;
use crate::transform::names::NamePool;
use crate::transform::COMEHERE_LABEL;

pub fn capture_trailing_returns(program: &mut Program, pool: &mut NamePool) {
    process_statements(&mut program.body, pool);
}

fn is_comehere_labelled(statement: &Statement) -> bool {
    matches!(&statement.inner, StatementKind::Labelled { label, .. } if label == COMEHERE_LABEL)
}

fn process_statements(statements: &mut Vec<Statement>, pool: &mut NamePool) {
    for statement in statements.iter_mut() {
        process_statement(statement, pool);
    }

    let mut index = 0;
    while index < statements.len() {
        let is_return_with_value =
            matches!(&statements[index].inner, StatementKind::Return(Some(_)));
        if is_return_with_value {
            let mut end = index + 1;
            while end < statements.len() && is_comehere_labelled(&statements[end]) {
                end += 1;
            }
            if end > index + 1 {
                let mut lifted: Vec<Statement> = statements.drain(index + 1..end).collect();
                let result_name = pool.fresh("returned");
                for statement in &mut lifted {
                    rewrite_returned_in_statement(statement, &result_name);
                }

                let StatementKind::Return(Some(argument)) =
                    std::mem::replace(&mut statements[index].inner, StatementKind::Empty)
                else {
                    unreachable!("checked above");
                };

                // let returned_n;
                let declaration = Node::synthesized(StatementKind::VariableDeclaration {
                    kind: DeclarationKind::Let,
                    declarations: vec![VariableDeclarator {
                        target: Pattern::Identifier(result_name.clone()),
                        init: None,
                    }],
                });
                // try { return returned_n = E; } finally { <lifted> }
                let capturing_return =
                    Node::synthesized(StatementKind::Return(Some(Box::new(Node::synthesized(
                        ExpressionKind::Assignment {
                            op: AssignmentOp::Assignment,
                            lhs: Box::new(Expression::identifier(result_name)),
                            rhs: argument,
                        },
                    )))));
                let try_statement = Node::synthesized(StatementKind::Try(TryData {
                    block: Box::new(Statement::block(vec![capturing_return])),
                    handler: None,
                    finalizer: Some(Box::new(Statement::block(lifted))),
                }));

                statements[index] = declaration;
                statements.insert(index + 1, try_statement);
                index += 2;
                continue;
            }
        }
        index += 1;
    }
}

fn process_statement(statement: &mut Statement, pool: &mut NamePool) {
    match &mut statement.inner {
        StatementKind::Block(children) => process_statements(children, pool),
        StatementKind::If {
            test,
            consequent,
            alternate,
        } => {
            process_expression(test, pool);
            process_statement(consequent, pool);
            if let Some(alternate) = alternate {
                process_statement(alternate, pool);
            }
        }
        StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
            process_expression(test, pool);
            process_statement(body, pool);
        }
        StatementKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => process_statement(declaration, pool),
                Some(ForInit::Expression(expression)) => process_expression(expression, pool),
                None => {}
            }
            if let Some(test) = test {
                process_expression(test, pool);
            }
            if let Some(update) = update {
                process_expression(update, pool);
            }
            process_statement(body, pool);
        }
        StatementKind::ForInOf {
            head, rhs, body, ..
        } => {
            if let ForHead::Expression(expression) = head {
                process_expression(expression, pool);
            }
            process_expression(rhs, pool);
            process_statement(body, pool);
        }
        StatementKind::Switch {
            discriminant,
            cases,
        } => {
            process_expression(discriminant, pool);
            for case in cases {
                if let Some(test) = &mut case.test {
                    process_expression(test, pool);
                }
                process_statements(&mut case.body, pool);
            }
        }
        StatementKind::With { object, body } => {
            process_expression(object, pool);
            process_statement(body, pool);
        }
        StatementKind::Labelled { body, .. } => process_statement(body, pool),
        StatementKind::Return(Some(argument)) => process_expression(argument, pool),
        StatementKind::Throw(argument) => process_expression(argument, pool),
        StatementKind::Try(data) => {
            process_statement(&mut data.block, pool);
            if let Some(handler) = &mut data.handler {
                process_statement(&mut handler.body, pool);
            }
            if let Some(finalizer) = &mut data.finalizer {
                process_statement(finalizer, pool);
            }
        }
        StatementKind::Expression(expression) => process_expression(expression, pool),
        StatementKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if let Some(init) = &mut declarator.init {
                    process_expression(init, pool);
                }
            }
        }
        StatementKind::FunctionDeclaration(data) => process_function(data, pool),
        StatementKind::ClassDeclaration(data) => process_class(data, pool),
        StatementKind::Export(data) => {
            if let Some(declaration) = &mut data.declaration {
                process_statement(declaration, pool);
            }
        }
        _ => {}
    }
}

fn process_expression(expression: &mut Expression, pool: &mut NamePool) {
    match &mut expression.inner {
        ExpressionKind::Function(data) => process_function(data, pool),
        ExpressionKind::Class(data) => process_class(data, pool),
        ExpressionKind::Binary { lhs, rhs, .. }
        | ExpressionKind::Logical { lhs, rhs, .. }
        | ExpressionKind::Assignment { lhs, rhs, .. } => {
            process_expression(lhs, pool);
            process_expression(rhs, pool);
        }
        ExpressionKind::Unary { operand, .. } => process_expression(operand, pool),
        ExpressionKind::Update { argument, .. } => process_expression(argument, pool),
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            process_expression(test, pool);
            process_expression(consequent, pool);
            process_expression(alternate, pool);
        }
        ExpressionKind::Sequence(expressions) => {
            for child in expressions {
                process_expression(child, pool);
            }
        }
        ExpressionKind::Member {
            object, property, ..
        } => {
            process_expression(object, pool);
            process_expression(property, pool);
        }
        ExpressionKind::Call(data) | ExpressionKind::New(data) => {
            process_expression(&mut data.callee, pool);
            for argument in &mut data.arguments {
                process_expression(&mut argument.value, pool);
            }
        }
        ExpressionKind::Spread(argument) => process_expression(argument, pool),
        ExpressionKind::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                process_expression(element, pool);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                if let Some(value) = &mut property.value {
                    process_expression(value, pool);
                }
            }
        }
        ExpressionKind::TemplateLiteral(data) => {
            for child in &mut data.expressions {
                process_expression(child, pool);
            }
        }
        ExpressionKind::Yield {
            argument: Some(argument),
            ..
        } => process_expression(argument, pool),
        ExpressionKind::Await(operand) => process_expression(operand, pool),
        _ => {}
    }
}

fn process_function(data: &mut FunctionData, pool: &mut NamePool) {
    if let FunctionBody::Block(statements) = &mut data.body {
        process_statements(statements, pool);
    }
}

fn process_class(data: &mut ClassData, pool: &mut NamePool) {
    for element in &mut data.elements {
        match element {
            ClassElement::Method(method) => process_function(&mut method.function, pool),
            ClassElement::Field {
                initializer: Some(initializer),
                ..
            } => process_expression(initializer, pool),
            ClassElement::StaticBlock(statements) => process_statements(statements, pool),
            _ => {}
        }
    }
}

// =============================================================================
// Function.return rewriting
// =============================================================================

fn is_returned_value_reference(expression: &Expression) -> bool {
    let ExpressionKind::Member {
        object,
        property,
        computed: false,
        ..
    } = &expression.inner
    else {
        return false;
    };
    matches!(&object.inner, ExpressionKind::Identifier(name) if name == "Function")
        && matches!(&property.inner, ExpressionKind::Identifier(name) if name == "return")
}

fn rewrite_returned_in_expression(expression: &mut Expression, result_name: &str) {
    if is_returned_value_reference(expression) {
        expression.inner = ExpressionKind::Identifier(result_name.to_string());
        return;
    }
    match &mut expression.inner {
        ExpressionKind::Function(data) => {
            if let FunctionBody::Block(statements) = &mut data.body {
                for statement in statements {
                    rewrite_returned_in_statement(statement, result_name);
                }
            }
        }
        ExpressionKind::Class(data) => {
            for element in &mut data.elements {
                match element {
                    ClassElement::Method(method) => {
                        if let FunctionBody::Block(statements) = &mut method.function.body {
                            for statement in statements {
                                rewrite_returned_in_statement(statement, result_name);
                            }
                        }
                    }
                    ClassElement::Field {
                        initializer: Some(initializer),
                        ..
                    } => rewrite_returned_in_expression(initializer, result_name),
                    ClassElement::StaticBlock(statements) => {
                        for statement in statements {
                            rewrite_returned_in_statement(statement, result_name);
                        }
                    }
                    _ => {}
                }
            }
        }
        ExpressionKind::Binary { lhs, rhs, .. }
        | ExpressionKind::Logical { lhs, rhs, .. }
        | ExpressionKind::Assignment { lhs, rhs, .. } => {
            rewrite_returned_in_expression(lhs, result_name);
            rewrite_returned_in_expression(rhs, result_name);
        }
        ExpressionKind::Unary { operand, .. } => {
            rewrite_returned_in_expression(operand, result_name)
        }
        ExpressionKind::Update { argument, .. } => {
            rewrite_returned_in_expression(argument, result_name)
        }
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            rewrite_returned_in_expression(test, result_name);
            rewrite_returned_in_expression(consequent, result_name);
            rewrite_returned_in_expression(alternate, result_name);
        }
        ExpressionKind::Sequence(expressions) => {
            for child in expressions {
                rewrite_returned_in_expression(child, result_name);
            }
        }
        ExpressionKind::Member {
            object, property, ..
        } => {
            rewrite_returned_in_expression(object, result_name);
            rewrite_returned_in_expression(property, result_name);
        }
        ExpressionKind::Call(data) | ExpressionKind::New(data) => {
            rewrite_returned_in_expression(&mut data.callee, result_name);
            for argument in &mut data.arguments {
                rewrite_returned_in_expression(&mut argument.value, result_name);
            }
        }
        ExpressionKind::Spread(argument) => rewrite_returned_in_expression(argument, result_name),
        ExpressionKind::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                rewrite_returned_in_expression(element, result_name);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                rewrite_returned_in_expression(&mut property.key, result_name);
                if let Some(value) = &mut property.value {
                    rewrite_returned_in_expression(value, result_name);
                }
            }
        }
        ExpressionKind::TemplateLiteral(data) => {
            for child in &mut data.expressions {
                rewrite_returned_in_expression(child, result_name);
            }
        }
        ExpressionKind::TaggedTemplate { tag, quasi } => {
            rewrite_returned_in_expression(tag, result_name);
            rewrite_returned_in_expression(quasi, result_name);
        }
        ExpressionKind::Yield {
            argument: Some(argument),
            ..
        } => rewrite_returned_in_expression(argument, result_name),
        ExpressionKind::Await(operand) => rewrite_returned_in_expression(operand, result_name),
        _ => {}
    }
}

fn rewrite_returned_in_statement(statement: &mut Statement, result_name: &str) {
    match &mut statement.inner {
        StatementKind::Expression(expression) => {
            rewrite_returned_in_expression(expression, result_name)
        }
        StatementKind::Block(children) => {
            for child in children {
                rewrite_returned_in_statement(child, result_name);
            }
        }
        StatementKind::If {
            test,
            consequent,
            alternate,
        } => {
            rewrite_returned_in_expression(test, result_name);
            rewrite_returned_in_statement(consequent, result_name);
            if let Some(alternate) = alternate {
                rewrite_returned_in_statement(alternate, result_name);
            }
        }
        StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
            rewrite_returned_in_expression(test, result_name);
            rewrite_returned_in_statement(body, result_name);
        }
        StatementKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => {
                    rewrite_returned_in_statement(declaration, result_name)
                }
                Some(ForInit::Expression(expression)) => {
                    rewrite_returned_in_expression(expression, result_name)
                }
                None => {}
            }
            if let Some(test) = test {
                rewrite_returned_in_expression(test, result_name);
            }
            if let Some(update) = update {
                rewrite_returned_in_expression(update, result_name);
            }
            rewrite_returned_in_statement(body, result_name);
        }
        StatementKind::ForInOf {
            head, rhs, body, ..
        } => {
            if let ForHead::Expression(expression) = head {
                rewrite_returned_in_expression(expression, result_name);
            }
            rewrite_returned_in_expression(rhs, result_name);
            rewrite_returned_in_statement(body, result_name);
        }
        StatementKind::Switch {
            discriminant,
            cases,
        } => {
            rewrite_returned_in_expression(discriminant, result_name);
            for case in cases {
                if let Some(test) = &mut case.test {
                    rewrite_returned_in_expression(test, result_name);
                }
                for child in &mut case.body {
                    rewrite_returned_in_statement(child, result_name);
                }
            }
        }
        StatementKind::With { object, body } => {
            rewrite_returned_in_expression(object, result_name);
            rewrite_returned_in_statement(body, result_name);
        }
        StatementKind::Labelled { body, .. } => rewrite_returned_in_statement(body, result_name),
        StatementKind::Return(Some(argument)) => {
            rewrite_returned_in_expression(argument, result_name)
        }
        StatementKind::Throw(argument) => rewrite_returned_in_expression(argument, result_name),
        StatementKind::Try(data) => {
            rewrite_returned_in_statement(&mut data.block, result_name);
            if let Some(handler) = &mut data.handler {
                rewrite_returned_in_statement(&mut handler.body, result_name);
            }
            if let Some(finalizer) = &mut data.finalizer {
                rewrite_returned_in_statement(finalizer, result_name);
            }
        }
        StatementKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if let Some(init) = &mut declarator.init {
                    rewrite_returned_in_expression(init, result_name);
                }
            }
        }
        StatementKind::FunctionDeclaration(data) => {
            if let FunctionBody::Block(statements) = &mut data.body {
                for statement in statements {
                    rewrite_returned_in_statement(statement, result_name);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::printer;
    use crate::transform::normalize;

    fn hoisted(source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser::new(&chars);
        let mut program = parser.parse_program();
        assert!(!parser.has_errors());
        normalize::ensure_blocks(&mut program);
        let mut pool = NamePool::scan(&program);
        capture_trailing_returns(&mut program, &mut pool);
        printer::print(&program)
    }

    #[test]
    fn lifts_goal_after_return_into_finally() {
        let out = hoisted(
            "function f(a, b, c) { return (a + b) * c; COMEHERE: with (_) { log(Function.return); } }",
        );
        assert!(out.contains("let returned_0;"), "got: {out}");
        assert!(out.contains("return returned_0 = (a + b) * c;"), "got: {out}");
        assert!(out.contains("} finally {"), "got: {out}");
        assert!(out.contains("log(returned_0);"), "got: {out}");
        assert!(!out.contains("Function.return"), "got: {out}");
    }

    #[test]
    fn unrelated_returns_untouched() {
        let out = hoisted("function f() { return 1; }");
        assert!(out.contains("return 1;"), "got: {out}");
        assert!(!out.contains("finally"), "got: {out}");
    }
}
