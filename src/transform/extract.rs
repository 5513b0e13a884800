/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Goal extractor.
//!
//! Rewrites each `COMEHERE: with (description?, path = expr, …) { body }`
//! into a guarded
//!
//! ```text
//! if (active_n && seeking_m == id) {
//!   seeking_m = 0;
//!   <body>
//! }
//! ```
//!
//! recording a [`GoalBlock`] per site. Ids are 1-based in source order.
//! Resetting the seeking variable on entry keeps reentrant code triggered
//! by the body from re-matching the guard.

use crate::ast::*;
use crate::printer;
use crate::transform::{TransformContext, COMEHERE_LABEL};

/// A dotted-path initializer from a goal's with-list, e.g. `C.foo.a = 1`.
#[derive(Debug)]
pub struct Initializer {
    pub path: String,
    pub value: Expression,
    pub consumed: bool,
}

/// One extracted `COMEHERE` site.
#[derive(Debug)]
pub struct GoalBlock {
    pub id: u32,
    pub description: Option<String>,
    pub initializers: Vec<Initializer>,
}

impl GoalBlock {
    /// Consume the first unconsumed initializer whose path matches one of
    /// the candidate keys, in candidate order (most specific first).
    pub fn consume(&mut self, candidates: &[String]) -> Option<Expression> {
        for candidate in candidates {
            if let Some(initializer) = self
                .initializers
                .iter_mut()
                .find(|initializer| !initializer.consumed && initializer.path == *candidate)
            {
                initializer.consumed = true;
                return Some(initializer.value.clone());
            }
        }
        None
    }
}

pub fn extract_goals(program: &mut Program, cx: &mut TransformContext) -> Vec<GoalBlock> {
    let mut extractor = Extractor {
        cx,
        goals: Vec::new(),
        function_stack: Vec::new(),
    };
    extractor.visit_statements(&mut program.body);
    extractor.goals
}

struct Extractor<'a, 'd> {
    cx: &'a mut TransformContext<'d>,
    goals: Vec<GoalBlock>,
    function_stack: Vec<FunctionId>,
}

impl Extractor<'_, '_> {
    fn visit_statements(&mut self, statements: &mut Vec<Statement>) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        if self.try_extract(statement) {
            // The replacement guard's body may itself hold nested goals.
            if let StatementKind::If { consequent, .. } = &mut statement.inner {
                self.visit_statement(consequent);
            }
            return;
        }

        match &mut statement.inner {
            StatementKind::Expression(expression) => self.visit_expression(expression),
            StatementKind::Block(children) => self.visit_statements(children),
            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expression(test);
                self.visit_statement(consequent);
                if let Some(alternate) = alternate {
                    self.visit_statement(alternate);
                }
            }
            StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
                self.visit_expression(test);
                self.visit_statement(body);
            }
            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Declaration(declaration)) => self.visit_statement(declaration),
                    Some(ForInit::Expression(expression)) => self.visit_expression(expression),
                    None => {}
                }
                if let Some(test) = test {
                    self.visit_expression(test);
                }
                if let Some(update) = update {
                    self.visit_expression(update);
                }
                self.visit_statement(body);
            }
            StatementKind::ForInOf {
                head, rhs, body, ..
            } => {
                if let ForHead::Expression(expression) = head {
                    self.visit_expression(expression);
                }
                self.visit_expression(rhs);
                self.visit_statement(body);
            }
            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                self.visit_expression(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.visit_expression(test);
                    }
                    self.visit_statements(&mut case.body);
                }
            }
            StatementKind::With { object, body } => {
                self.visit_expression(object);
                self.visit_statement(body);
            }
            StatementKind::Labelled { body, .. } => self.visit_statement(body),
            StatementKind::Return(Some(argument)) => self.visit_expression(argument),
            StatementKind::Throw(argument) => self.visit_expression(argument),
            StatementKind::Try(data) => {
                self.visit_statement(&mut data.block);
                if let Some(handler) = &mut data.handler {
                    self.visit_statement(&mut handler.body);
                }
                if let Some(finalizer) = &mut data.finalizer {
                    self.visit_statement(finalizer);
                }
            }
            StatementKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    if let Some(init) = &mut declarator.init {
                        self.visit_expression(init);
                    }
                }
            }
            StatementKind::FunctionDeclaration(data) => self.visit_function(data),
            StatementKind::ClassDeclaration(data) => self.visit_class(data),
            StatementKind::Export(data) => {
                if let Some(declaration) = &mut data.declaration {
                    self.visit_statement(declaration);
                }
            }
            _ => {}
        }
    }

    fn visit_expression(&mut self, expression: &mut Expression) {
        match &mut expression.inner {
            ExpressionKind::Function(data) => self.visit_function(data),
            ExpressionKind::Class(data) => self.visit_class(data),
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Logical { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => {
                self.visit_expression(lhs);
                self.visit_expression(rhs);
            }
            ExpressionKind::Unary { operand, .. } => self.visit_expression(operand),
            ExpressionKind::Update { argument, .. } => self.visit_expression(argument),
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.visit_expression(test);
                self.visit_expression(consequent);
                self.visit_expression(alternate);
            }
            ExpressionKind::Sequence(expressions) => {
                for child in expressions {
                    self.visit_expression(child);
                }
            }
            ExpressionKind::Member {
                object, property, ..
            } => {
                self.visit_expression(object);
                self.visit_expression(property);
            }
            ExpressionKind::Call(data) | ExpressionKind::New(data) => {
                self.visit_expression(&mut data.callee);
                for argument in &mut data.arguments {
                    self.visit_expression(&mut argument.value);
                }
            }
            ExpressionKind::Spread(argument) => self.visit_expression(argument),
            ExpressionKind::Array(elements) => {
                for element in elements.iter_mut().flatten() {
                    self.visit_expression(element);
                }
            }
            ExpressionKind::Object(properties) => {
                for property in properties {
                    self.visit_expression(&mut property.key);
                    if let Some(value) = &mut property.value {
                        self.visit_expression(value);
                    }
                }
            }
            ExpressionKind::TemplateLiteral(data) => {
                for child in &mut data.expressions {
                    self.visit_expression(child);
                }
            }
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.visit_expression(tag);
                self.visit_expression(quasi);
            }
            ExpressionKind::Yield {
                argument: Some(argument),
                ..
            } => self.visit_expression(argument),
            ExpressionKind::Await(operand) => self.visit_expression(operand),
            _ => {}
        }
    }

    fn visit_function(&mut self, data: &mut FunctionData) {
        for parameter in &mut data.parameters {
            if let Some(default_value) = &mut parameter.default_value {
                self.visit_expression(default_value);
            }
        }
        self.function_stack.push(data.id);
        if let FunctionBody::Block(statements) = &mut data.body {
            self.visit_statements(statements);
        }
        self.function_stack.pop();
    }

    fn visit_class(&mut self, data: &mut ClassData) {
        if let Some(super_class) = &mut data.super_class {
            self.visit_expression(super_class);
        }
        for element in &mut data.elements {
            match element {
                ClassElement::Method(method) => self.visit_function(&mut method.function),
                ClassElement::Field {
                    initializer: Some(initializer),
                    ..
                } => self.visit_expression(initializer),
                ClassElement::StaticBlock(statements) => self.visit_statements(statements),
                _ => {}
            }
        }
    }

    // =========================================================================
    // The extraction itself
    // =========================================================================

    /// If the statement is a `COMEHERE:`-labelled `with`, replace it with
    /// the guarded `if` and record the goal. Returns true on extraction.
    fn try_extract(&mut self, statement: &mut Statement) -> bool {
        let StatementKind::Labelled { label, body } = &mut statement.inner else {
            return false;
        };
        if label != COMEHERE_LABEL {
            return false;
        }
        let StatementKind::With {
            object,
            body: with_body,
        } = &mut body.inner
        else {
            return false;
        };

        let id = self.goals.len() as u32 + 1;
        let mut goal = GoalBlock {
            id,
            description: None,
            initializers: Vec::new(),
        };

        let object = std::mem::replace(&mut **object, Expression::undefined());
        self.parse_with_object(object, &mut goal);

        let body_statements = match std::mem::replace(&mut with_body.inner, StatementKind::Empty) {
            StatementKind::Block(children) => children,
            other => vec![Node::synthesized(other)],
        };

        let seeking = self.cx.support.seeking(&mut self.cx.pool);
        let matches_id = Node::synthesized(ExpressionKind::Binary {
            op: BinaryOp::LooselyEquals,
            lhs: Box::new(Expression::identifier(seeking.clone())),
            rhs: Box::new(Expression::number(f64::from(id))),
        });
        let guard = match self.function_stack.last() {
            Some(&function_id) => {
                let frame = self.cx.frames.ensure(function_id, &mut self.cx.pool);
                Node::synthesized(ExpressionKind::Logical {
                    op: LogicalOp::And,
                    lhs: Box::new(Expression::identifier(frame.flag)),
                    rhs: Box::new(matches_id),
                })
            }
            None => matches_id,
        };

        let mut consequent = vec![Statement::expression(Node::synthesized(
            ExpressionKind::Assignment {
                op: AssignmentOp::Assignment,
                lhs: Box::new(Expression::identifier(seeking)),
                rhs: Box::new(Expression::number(0.0)),
            },
        ))];
        consequent.extend(body_statements);

        *statement = Node::synthesized(StatementKind::If {
            test: Box::new(guard),
            consequent: Box::new(Statement::block(consequent)),
            alternate: None,
        });

        self.goals.push(goal);
        true
    }

    /// `[description?, initializer*]`, where a lone `_` stands for an empty
    /// initializer list. Malformed items are reported and skipped.
    fn parse_with_object(&mut self, object: Expression, goal: &mut GoalBlock) {
        let items = match object.inner {
            ExpressionKind::Sequence(expressions) => expressions,
            inner => vec![Node::new(object.range, inner)],
        };

        for (index, item) in items.into_iter().enumerate() {
            if index == 0 {
                if let ExpressionKind::StringLiteral(text) = &item.inner {
                    goal.description = Some(text.clone());
                    continue;
                }
            }
            if matches!(&item.inner, ExpressionKind::Identifier(name) if name == "_") {
                continue;
            }
            match &item.inner {
                ExpressionKind::Assignment {
                    op: AssignmentOp::Assignment,
                    lhs,
                    rhs,
                } => {
                    if let Some(path) = lhs.dotted_path() {
                        goal.initializers.push(Initializer {
                            path,
                            value: (**rhs).clone(),
                            consumed: false,
                        });
                        continue;
                    }
                    self.cx.diagnostics.error(&format!(
                        "goal {}: initializer target is not a dotted identifier chain: `{}`",
                        goal.id,
                        printer::print_expression(lhs)
                    ));
                }
                _ => {
                    self.cx.diagnostics.error(&format!(
                        "goal {}: expected `path = expression` initializer, found `{}`",
                        goal.id,
                        printer::print_expression(&item)
                    ));
                }
            }
        }
    }
}
