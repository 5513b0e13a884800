/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Block normalizer.
//!
//! Wraps every single-statement control-flow arm, loop body, and
//! expression-bodied arrow function in a block, so later passes always
//! have a statement list to insert into. Runs before any other mutating
//! pass and is idempotent.

use crate::ast::*;

pub fn ensure_blocks(program: &mut Program) {
    for statement in &mut program.body {
        normalize_statement(statement);
    }
}

fn blockify(statement: &mut Statement) {
    if !matches!(statement.inner, StatementKind::Block(_)) {
        let range = statement.range;
        let inner = std::mem::replace(statement, Statement::block(Vec::new()));
        *statement = Statement::new(range, StatementKind::Block(vec![inner]));
    }
    normalize_statement(statement);
}

fn normalize_statement(statement: &mut Statement) {
    match &mut statement.inner {
        StatementKind::Empty
        | StatementKind::Debugger
        | StatementKind::Break { .. }
        | StatementKind::Continue { .. }
        | StatementKind::Import(_)
        | StatementKind::Error => {}
        StatementKind::Expression(expression) => normalize_expression(expression),
        StatementKind::Block(children) => {
            for child in children {
                normalize_statement(child);
            }
        }
        StatementKind::If {
            test,
            consequent,
            alternate,
        } => {
            normalize_expression(test);
            blockify(consequent);
            if let Some(alternate) = alternate {
                // `else if` chains stay chains; only plain arms get wrapped.
                if matches!(alternate.inner, StatementKind::If { .. }) {
                    normalize_statement(alternate);
                } else {
                    blockify(alternate);
                }
            }
        }
        StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
            normalize_expression(test);
            blockify(body);
        }
        StatementKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => normalize_statement(declaration),
                Some(ForInit::Expression(expression)) => normalize_expression(expression),
                None => {}
            }
            if let Some(test) = test {
                normalize_expression(test);
            }
            if let Some(update) = update {
                normalize_expression(update);
            }
            blockify(body);
        }
        StatementKind::ForInOf {
            head, rhs, body, ..
        } => {
            match head {
                ForHead::Declaration { .. } => {}
                ForHead::Expression(expression) => normalize_expression(expression),
            }
            normalize_expression(rhs);
            blockify(body);
        }
        StatementKind::Switch {
            discriminant,
            cases,
        } => {
            normalize_expression(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    normalize_expression(test);
                }
                for child in &mut case.body {
                    normalize_statement(child);
                }
            }
        }
        StatementKind::With { object, body } => {
            normalize_expression(object);
            blockify(body);
        }
        StatementKind::Labelled { body, .. } => normalize_statement(body),
        StatementKind::Return(argument) => {
            if let Some(argument) = argument {
                normalize_expression(argument);
            }
        }
        StatementKind::Throw(argument) => normalize_expression(argument),
        StatementKind::Try(data) => {
            normalize_statement(&mut data.block);
            if let Some(handler) = &mut data.handler {
                normalize_statement(&mut handler.body);
            }
            if let Some(finalizer) = &mut data.finalizer {
                normalize_statement(finalizer);
            }
        }
        StatementKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if let Some(init) = &mut declarator.init {
                    normalize_expression(init);
                }
            }
        }
        StatementKind::FunctionDeclaration(data) => normalize_function(data),
        StatementKind::ClassDeclaration(data) => normalize_class(data),
        StatementKind::Export(data) => {
            if let Some(declaration) = &mut data.declaration {
                normalize_statement(declaration);
            }
        }
    }
}

fn normalize_expression(expression: &mut Expression) {
    match &mut expression.inner {
        ExpressionKind::Function(data) => normalize_function(data),
        ExpressionKind::Class(data) => normalize_class(data),
        ExpressionKind::Binary { lhs, rhs, .. }
        | ExpressionKind::Logical { lhs, rhs, .. }
        | ExpressionKind::Assignment { lhs, rhs, .. } => {
            normalize_expression(lhs);
            normalize_expression(rhs);
        }
        ExpressionKind::Unary { operand, .. } => normalize_expression(operand),
        ExpressionKind::Update { argument, .. } => normalize_expression(argument),
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            normalize_expression(test);
            normalize_expression(consequent);
            normalize_expression(alternate);
        }
        ExpressionKind::Sequence(expressions) => {
            for child in expressions {
                normalize_expression(child);
            }
        }
        ExpressionKind::Member {
            object, property, ..
        } => {
            normalize_expression(object);
            normalize_expression(property);
        }
        ExpressionKind::Call(data) | ExpressionKind::New(data) => {
            normalize_expression(&mut data.callee);
            for argument in &mut data.arguments {
                normalize_expression(&mut argument.value);
            }
        }
        ExpressionKind::Spread(argument) => normalize_expression(argument),
        ExpressionKind::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                normalize_expression(element);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                normalize_expression(&mut property.key);
                if let Some(value) = &mut property.value {
                    normalize_expression(value);
                }
            }
        }
        ExpressionKind::TemplateLiteral(data) => {
            for child in &mut data.expressions {
                normalize_expression(child);
            }
        }
        ExpressionKind::TaggedTemplate { tag, quasi } => {
            normalize_expression(tag);
            normalize_expression(quasi);
        }
        ExpressionKind::Yield { argument, .. } => {
            if let Some(argument) = argument {
                normalize_expression(argument);
            }
        }
        ExpressionKind::Await(operand) => normalize_expression(operand),
        _ => {}
    }
}

fn normalize_function(data: &mut FunctionData) {
    for parameter in &mut data.parameters {
        if let Some(default_value) = &mut parameter.default_value {
            normalize_expression(default_value);
        }
    }
    // An expression-bodied arrow becomes `{ return E; }`.
    if let FunctionBody::Expression(expression) = &mut data.body {
        let mut argument = Box::new(Expression::undefined());
        std::mem::swap(expression, &mut argument);
        data.body = FunctionBody::Block(vec![Node::synthesized(StatementKind::Return(Some(
            argument,
        )))]);
    }
    if let FunctionBody::Block(statements) = &mut data.body {
        for statement in statements {
            normalize_statement(statement);
        }
    }
}

fn normalize_class(data: &mut ClassData) {
    if let Some(super_class) = &mut data.super_class {
        normalize_expression(super_class);
    }
    for element in &mut data.elements {
        match element {
            ClassElement::Method(method) => normalize_function(&mut method.function),
            ClassElement::Field { initializer, .. } => {
                if let Some(initializer) = initializer {
                    normalize_expression(initializer);
                }
            }
            ClassElement::StaticBlock(statements) => {
                for statement in statements {
                    normalize_statement(statement);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::printer;

    fn normalized(source: &str) -> Program {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser::new(&chars);
        let mut program = parser.parse_program();
        ensure_blocks(&mut program);
        program
    }

    #[test]
    fn wraps_single_statement_arms() {
        let program = normalized("if (a) b();");
        let StatementKind::If { consequent, .. } = &program.body[0].inner else {
            panic!("expected if");
        };
        assert!(matches!(consequent.inner, StatementKind::Block(_)));
    }

    #[test]
    fn arrow_expression_body_becomes_return() {
        let program = normalized("const f = x => x + 1;");
        let StatementKind::VariableDeclaration { declarations, .. } = &program.body[0].inner
        else {
            panic!("expected declaration");
        };
        let Some(init) = &declarations[0].init else {
            panic!("expected init")
        };
        let ExpressionKind::Function(data) = &init.inner else {
            panic!("expected arrow");
        };
        let FunctionBody::Block(statements) = &data.body else {
            panic!("expected block body");
        };
        assert!(matches!(statements[0].inner, StatementKind::Return(Some(_))));
    }

    #[test]
    fn idempotent() {
        let mut program = normalized("if (a) b(); else if (c) for (;;) d();");
        let once = printer::print(&program);
        ensure_blocks(&mut program);
        let twice = printer::print(&program);
        assert_eq!(once, twice);
    }
}
