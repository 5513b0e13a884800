/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Control driver.
//!
//! For each extracted goal, walks from the goal's guard outward to module
//! top and rewrites every enclosing construct so that when the seeking
//! variable names this goal, control is steered into it. All rewrites
//! preserve the original semantics when the seeking variable is 0.
//!
//! The walk is a single recursion per goal: context (the innermost
//! enclosing function) is carried downward, containment is discovered at
//! the guard, and each construct applies its rule on the way back up —
//! which visits exactly the chain of enclosing constructs in inside-out
//! order. Function boundaries synthesize a guarded call placed after the
//! function's lexical site (or an immediately-invoked wrapper for
//! expression-positioned functions and classes).

use crate::ast::*;
use crate::diag::TransformError;
use crate::transform::extract::GoalBlock;
use crate::transform::TransformContext;

pub fn drive_goal(
    program: &mut Program,
    goal: &mut GoalBlock,
    cx: &mut TransformContext,
) -> Result<(), TransformError> {
    let seeking = cx.support.seeking(&mut cx.pool);
    let mut driver = Driver {
        cx,
        goal,
        seeking,
        failed: false,
    };
    let found = driver.drive_statements(&mut program.body, None);
    if !found {
        return Err(TransformError::Invariant(format!(
            "goal {} guard not reachable from module top",
            driver.goal.id
        )));
    }
    Ok(())
}

/// Install the active-frame prologue at the top of every function that
/// ended up in the frame registry (i.e. lies on some goal's path).
pub fn install_prologues(program: &mut Program, cx: &mut TransformContext) {
    if cx.frames.is_empty() {
        return;
    }
    let mask = cx.support.active_mask(&mut cx.pool);
    for statement in &mut program.body {
        prologue_statement(statement, cx, &mask);
    }
}

// =============================================================================
// Small builders
// =============================================================================

fn ident(name: &str) -> Expression {
    Expression::identifier(name)
}

fn bigint(value: u32) -> Expression {
    Node::synthesized(ExpressionKind::BigIntLiteral(value.to_string()))
}

fn logical(op: LogicalOp, lhs: Expression, rhs: Expression) -> Expression {
    Node::synthesized(ExpressionKind::Logical {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Node::synthesized(ExpressionKind::Call(CallData {
        callee: Box::new(callee),
        arguments: arguments
            .into_iter()
            .map(|value| Argument {
                value,
                is_spread: false,
            })
            .collect(),
        optional: false,
    }))
}

fn assign_statement(name: &str, value: Expression) -> Statement {
    Statement::expression(Node::synthesized(ExpressionKind::Assignment {
        op: AssignmentOp::Assignment,
        lhs: Box::new(ident(name)),
        rhs: Box::new(value),
    }))
}

fn const_declaration(bindings: Vec<(String, Expression)>) -> Statement {
    Node::synthesized(StatementKind::VariableDeclaration {
        kind: DeclarationKind::Const,
        declarations: bindings
            .into_iter()
            .map(|(name, init)| VariableDeclarator {
                target: Pattern::Identifier(name),
                init: Some(init),
            })
            .collect(),
    })
}

// =============================================================================
// Per-statement outcome
// =============================================================================

struct Outcome {
    contains: bool,
    /// Statements to insert before / after the inspected statement in its
    /// parent list (switch snapshots, synthesized call blocks).
    before: Vec<Statement>,
    after: Vec<Statement>,
}

impl Outcome {
    fn miss() -> Self {
        Outcome {
            contains: false,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    fn hit() -> Self {
        Outcome {
            contains: true,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    fn hit_with(before: Vec<Statement>, after: Vec<Statement>) -> Self {
        Outcome {
            contains: true,
            before,
            after,
        }
    }
}

enum ClassContains {
    No,
    /// Contained, but nothing to synthesize at the class site (static
    /// block or super-class expression on the path).
    Passive,
    /// Contained in the method at this element index.
    Method(usize),
}

struct Driver<'a, 'd> {
    cx: &'a mut TransformContext<'d>,
    goal: &'a mut GoalBlock,
    seeking: String,
    /// Set when the goal sits in a construct outside the rule set; the
    /// remaining outward walk only propagates containment.
    failed: bool,
}

impl Driver<'_, '_> {
    // =========================================================================
    // Guards
    // =========================================================================

    fn seek_matches(&self) -> Expression {
        Node::synthesized(ExpressionKind::Binary {
            op: BinaryOp::LooselyEquals,
            lhs: Box::new(ident(&self.seeking)),
            rhs: Box::new(Expression::number(f64::from(self.goal.id))),
        })
    }

    /// `G`: `seeking == id`, conjoined with the enclosing active-frame
    /// flag when inside a function.
    fn guard(&mut self, enclosing: Option<FunctionId>) -> Expression {
        match enclosing {
            Some(function_id) => {
                let frame = self.cx.frames.ensure(function_id, &mut self.cx.pool);
                logical(
                    LogicalOp::And,
                    ident(&frame.flag),
                    self.seek_matches(),
                )
            }
            None => self.seek_matches(),
        }
    }

    /// `!G`: `seeking != id`, disjoined with the negated flag.
    fn negated_guard(&mut self, enclosing: Option<FunctionId>) -> Expression {
        let differs = Node::synthesized(ExpressionKind::Binary {
            op: BinaryOp::LooselyInequals,
            lhs: Box::new(ident(&self.seeking)),
            rhs: Box::new(Expression::number(f64::from(self.goal.id))),
        });
        match enclosing {
            Some(function_id) => {
                let frame = self.cx.frames.ensure(function_id, &mut self.cx.pool);
                let inactive = Node::synthesized(ExpressionKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(ident(&frame.flag)),
                });
                logical(LogicalOp::Or, inactive, differs)
            }
            None => differs,
        }
    }

    /// Is this statement the goal's own guard (`if (… seeking == id) {…}`)?
    /// The seeking name is pool-fresh and the id unique, so shape matching
    /// cannot collide with user code or other goals.
    fn is_goal_guard(&self, statement: &Statement) -> bool {
        let StatementKind::If { test, .. } = &statement.inner else {
            return false;
        };
        let comparison = match &test.inner {
            ExpressionKind::Logical {
                op: LogicalOp::And,
                rhs,
                ..
            } => rhs,
            _ => test,
        };
        let ExpressionKind::Binary {
            op: BinaryOp::LooselyEquals,
            lhs,
            rhs,
        } = &comparison.inner
        else {
            return false;
        };
        matches!(&lhs.inner, ExpressionKind::Identifier(name) if *name == self.seeking)
            && matches!(&rhs.inner, ExpressionKind::NumericLiteral(value)
                if *value == f64::from(self.goal.id))
    }

    fn unsupported(&mut self, what: &str) {
        self.failed = true;
        self.cx.diagnostics.error(&format!(
            "goal {}: unsupported enclosing context: {what}",
            self.goal.id
        ));
    }

    // =========================================================================
    // Statement lists
    // =========================================================================

    fn drive_statements(
        &mut self,
        statements: &mut Vec<Statement>,
        enclosing: Option<FunctionId>,
    ) -> bool {
        let mut index = 0;
        while index < statements.len() {
            let outcome = self.drive_statement(&mut statements[index], enclosing);
            if outcome.contains {
                let mut at = index;
                for inserted in outcome.before {
                    statements.insert(at, inserted);
                    at += 1;
                }
                for (offset, inserted) in outcome.after.into_iter().enumerate() {
                    statements.insert(at + 1 + offset, inserted);
                }
                return true;
            }
            index += 1;
        }
        false
    }

    fn drive_statement(
        &mut self,
        statement: &mut Statement,
        enclosing: Option<FunctionId>,
    ) -> Outcome {
        if self.is_goal_guard(statement) {
            return Outcome::hit();
        }

        match &mut statement.inner {
            StatementKind::Empty
            | StatementKind::Debugger
            | StatementKind::Break { .. }
            | StatementKind::Continue { .. }
            | StatementKind::Import(_)
            | StatementKind::Return(None)
            | StatementKind::Error => Outcome::miss(),

            StatementKind::Expression(expression) => {
                if self.drive_expression(expression, enclosing) {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::Block(children) => {
                if self.drive_statements(children, enclosing) {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.drive_expression(test, enclosing) {
                    return Outcome::hit();
                }
                let consequent_outcome = self.drive_statement(consequent, enclosing);
                if consequent_outcome.contains {
                    if !self.failed {
                        let old = std::mem::replace(&mut **test, Expression::undefined());
                        **test = logical(LogicalOp::Or, old, self.guard(enclosing));
                    }
                    return Outcome {
                        contains: true,
                        ..consequent_outcome
                    };
                }
                if let Some(alternate) = alternate {
                    let alternate_outcome = self.drive_statement(alternate, enclosing);
                    if alternate_outcome.contains {
                        if !self.failed {
                            let old = std::mem::replace(&mut **test, Expression::undefined());
                            **test =
                                logical(LogicalOp::And, old, self.negated_guard(enclosing));
                        }
                        return Outcome {
                            contains: true,
                            ..alternate_outcome
                        };
                    }
                }
                Outcome::miss()
            }

            StatementKind::While { test, body } => {
                if self.drive_expression(test, enclosing) {
                    return Outcome::hit();
                }
                if self.drive_statement(body, enclosing).contains {
                    if !self.failed {
                        let old = std::mem::replace(&mut **test, Expression::undefined());
                        **test = logical(LogicalOp::Or, old, self.guard(enclosing));
                    }
                    return Outcome::hit();
                }
                Outcome::miss()
            }

            // A do-while body runs unconditionally once the loop is
            // reached; no rewrite.
            StatementKind::DoWhile { test, body } => {
                if self.drive_expression(test, enclosing)
                    || self.drive_statement(body, enclosing).contains
                {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Declaration(declaration)) => {
                        if self.drive_statement(declaration, enclosing).contains {
                            return Outcome::hit();
                        }
                    }
                    Some(ForInit::Expression(expression)) => {
                        if self.drive_expression(expression, enclosing) {
                            return Outcome::hit();
                        }
                    }
                    None => {}
                }
                if let Some(test) = test.as_mut() {
                    if self.drive_expression(test, enclosing) {
                        return Outcome::hit();
                    }
                }
                if let Some(update) = update.as_mut() {
                    if self.drive_expression(update, enclosing) {
                        return Outcome::hit();
                    }
                }
                if self.drive_statement(body, enclosing).contains {
                    if !self.failed {
                        match test {
                            // A test-less `for (;;)` already reaches its
                            // body unconditionally.
                            None => {}
                            Some(test) => {
                                let old =
                                    std::mem::replace(&mut **test, Expression::undefined());
                                **test = logical(LogicalOp::Or, old, self.guard(enclosing));
                            }
                        }
                    }
                    return Outcome::hit();
                }
                Outcome::miss()
            }

            StatementKind::ForInOf {
                kind,
                head,
                rhs,
                body,
            } => {
                if let ForHead::Expression(expression) = head {
                    if self.drive_expression(expression, enclosing) {
                        return Outcome::hit();
                    }
                }
                if self.drive_expression(rhs, enclosing) {
                    return Outcome::hit();
                }
                if self.drive_statement(body, enclosing).contains {
                    if !self.failed {
                        let wrapper = match kind {
                            ForInOfKind::In => {
                                self.cx.support.iterator_keys(&mut self.cx.pool)
                            }
                            ForInOfKind::Of | ForInOfKind::AwaitOf => {
                                self.cx.support.iterator_values(&mut self.cx.pool)
                            }
                        };
                        // The key wrapper yields keys as values.
                        if *kind == ForInOfKind::In {
                            *kind = ForInOfKind::Of;
                        }
                        let old = std::mem::replace(&mut **rhs, Expression::undefined());
                        let guard = self.guard(enclosing);
                        **rhs = call(ident(&wrapper), vec![old, guard]);
                    }
                    return Outcome::hit();
                }
                Outcome::miss()
            }

            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                if self.drive_expression(discriminant, enclosing) {
                    return Outcome::hit();
                }
                for case in cases.iter_mut() {
                    if let Some(test) = &mut case.test {
                        if self.drive_expression(test, enclosing) {
                            return Outcome::hit();
                        }
                    }
                }
                let mut goal_case = None;
                for (index, case) in cases.iter_mut().enumerate() {
                    if self.drive_statements(&mut case.body, enclosing) {
                        goal_case = Some(index);
                        break;
                    }
                }
                let Some(index) = goal_case else {
                    return Outcome::miss();
                };
                if self.failed {
                    return Outcome::hit();
                }

                let sentinel = self.cx.pool.fresh("token");
                let snapshot = self.cx.pool.fresh("snapshot");
                let old_discriminant =
                    std::mem::replace(&mut **discriminant, Expression::undefined());
                let guard = self.guard(enclosing);
                **discriminant = Node::synthesized(ExpressionKind::Conditional {
                    test: Box::new(guard),
                    consequent: Box::new(ident(&sentinel)),
                    alternate: Box::new(ident(&snapshot)),
                });

                // The sentinel case absorbs the goal case's statements and
                // sits right after it, so seek-off fallthrough still runs
                // the same statements in the same order.
                let absorbed = std::mem::take(&mut cases[index].body);
                cases.insert(
                    index + 1,
                    SwitchCase {
                        test: Some(ident(&sentinel)),
                        body: absorbed,
                    },
                );

                let before = vec![
                    const_declaration(vec![(
                        sentinel,
                        Node::synthesized(ExpressionKind::Object(Vec::new())),
                    )]),
                    const_declaration(vec![(snapshot, old_discriminant)]),
                ];
                Outcome::hit_with(before, Vec::new())
            }

            StatementKind::With { object, body } => {
                if self.drive_expression(object, enclosing)
                    || self.drive_statement(body, enclosing).contains
                {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::Labelled { body, .. } => {
                if self.drive_statement(body, enclosing).contains {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::Return(Some(argument)) => {
                if self.drive_expression(argument, enclosing) {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::Throw(argument) => {
                if self.drive_expression(argument, enclosing) {
                    Outcome::hit()
                } else {
                    Outcome::miss()
                }
            }

            StatementKind::Try(data) => {
                if self.drive_statement(&mut data.block, enclosing).contains {
                    // Control reaches the try block naturally.
                    return Outcome::hit();
                }
                let handler_contains = match &mut data.handler {
                    Some(handler) => self.drive_statement(&mut handler.body, enclosing).contains,
                    None => false,
                };
                if handler_contains {
                    if !self.failed {
                        let error = self.resolve_catch_error(
                            data.handler.as_ref().and_then(|handler| handler.parameter.as_ref()),
                        );
                        let guard = self.guard(enclosing);
                        let throw_when_seeking = Node::synthesized(StatementKind::If {
                            test: Box::new(guard),
                            consequent: Box::new(Statement::block(vec![Node::synthesized(
                                StatementKind::Throw(Box::new(error)),
                            )])),
                            alternate: None,
                        });
                        if let StatementKind::Block(children) = &mut data.block.inner {
                            children.insert(0, throw_when_seeking);
                        }
                    }
                    return Outcome::hit();
                }
                if let Some(finalizer) = &mut data.finalizer {
                    // Finally clauses run unconditionally; no rewrite.
                    if self.drive_statement(finalizer, enclosing).contains {
                        return Outcome::hit();
                    }
                }
                Outcome::miss()
            }

            StatementKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    if let Some(init) = &mut declarator.init {
                        if self.drive_expression(init, enclosing) {
                            return Outcome::hit();
                        }
                    }
                }
                Outcome::miss()
            }

            StatementKind::FunctionDeclaration(data) => {
                if !self.drive_function_interior(data) {
                    return Outcome::miss();
                }
                if self.failed {
                    return Outcome::hit();
                }
                let callee = ident(data.name.as_deref().unwrap_or_default());
                let block = self.build_function_call_block(callee, data, true, enclosing);
                Outcome::hit_with(Vec::new(), vec![block])
            }

            StatementKind::ClassDeclaration(class) => {
                match self.drive_class_interior(class, enclosing) {
                    ClassContains::No => Outcome::miss(),
                    ClassContains::Passive => Outcome::hit(),
                    ClassContains::Method(index) => {
                        if self.failed {
                            return Outcome::hit();
                        }
                        let class_ref = ident(class.name.as_deref().unwrap_or_default());
                        let block =
                            self.build_method_call_block(class, class_ref, index, enclosing);
                        Outcome::hit_with(Vec::new(), vec![block])
                    }
                }
            }

            StatementKind::Export(data) => match &mut data.declaration {
                // Insertions bubble past the export wrapper: the call
                // block lands after the export statement.
                Some(declaration) => self.drive_statement(declaration, enclosing),
                None => Outcome::miss(),
            },
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn drive_expression(
        &mut self,
        expression: &mut Expression,
        enclosing: Option<FunctionId>,
    ) -> bool {
        match &mut expression.inner {
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.drive_expression(test, enclosing) {
                    return true;
                }
                if self.drive_expression(consequent, enclosing) {
                    if !self.failed {
                        let old = std::mem::replace(&mut **test, Expression::undefined());
                        **test = logical(LogicalOp::Or, old, self.guard(enclosing));
                    }
                    return true;
                }
                if self.drive_expression(alternate, enclosing) {
                    if !self.failed {
                        let old = std::mem::replace(&mut **test, Expression::undefined());
                        **test = logical(LogicalOp::And, old, self.negated_guard(enclosing));
                    }
                    return true;
                }
                false
            }

            ExpressionKind::Logical { lhs, rhs, op } => {
                if self.drive_expression(lhs, enclosing) {
                    return true;
                }
                let op = *op;
                if !self.drive_expression(rhs, enclosing) {
                    return false;
                }
                if self.failed {
                    return true;
                }
                let helper = match op {
                    LogicalOp::Or => self.cx.support.or_helper(&mut self.cx.pool),
                    LogicalOp::And => self.cx.support.and_helper(&mut self.cx.pool),
                    LogicalOp::NullishCoalescing => {
                        self.unsupported("right operand of '??'");
                        return true;
                    }
                };
                let guard = self.guard(enclosing);
                let ExpressionKind::Logical { lhs, rhs, .. } =
                    std::mem::replace(&mut expression.inner, ExpressionKind::Error)
                else {
                    unreachable!("matched above");
                };
                let thunk = Node::synthesized(ExpressionKind::Function(Box::new(FunctionData {
                    id: self.cx.fresh_function_id(),
                    name: None,
                    parameters: Vec::new(),
                    body: FunctionBody::Expression(rhs),
                    kind: FunctionKind::Normal,
                    is_arrow: true,
                })));
                expression.inner = call(ident(&helper), vec![*lhs, thunk, guard]).inner;
                true
            }

            ExpressionKind::Function(data) => {
                if !self.drive_function_interior(data) {
                    return false;
                }
                if self.failed {
                    return true;
                }
                let binding = self.cx.pool.fresh("callee");
                let block =
                    self.build_function_call_block(ident(&binding), data, false, enclosing);
                let original = std::mem::replace(expression, Expression::undefined());
                *expression = self.immediately_invoked(binding, vec![block], original);
                true
            }

            ExpressionKind::Class(class) => {
                match self.drive_class_interior(class, enclosing) {
                    ClassContains::No => false,
                    ClassContains::Passive => true,
                    ClassContains::Method(index) => {
                        if self.failed {
                            return true;
                        }
                        let binding = self.cx.pool.fresh("cls");
                        let block = self.build_method_call_block(
                            class,
                            ident(&binding),
                            index,
                            enclosing,
                        );
                        let original = std::mem::replace(expression, Expression::undefined());
                        *expression = self.immediately_invoked(binding, vec![block], original);
                        true
                    }
                }
            }

            ExpressionKind::Object(_) => self.drive_object_literal(expression, enclosing),

            ExpressionKind::Binary { lhs, rhs, .. } => {
                self.drive_expression(lhs, enclosing) || self.drive_expression(rhs, enclosing)
            }
            ExpressionKind::Assignment { lhs, rhs, .. } => {
                self.drive_expression(lhs, enclosing) || self.drive_expression(rhs, enclosing)
            }
            ExpressionKind::Unary { operand, .. } => self.drive_expression(operand, enclosing),
            ExpressionKind::Update { argument, .. } => self.drive_expression(argument, enclosing),
            ExpressionKind::Sequence(expressions) => {
                for child in expressions {
                    if self.drive_expression(child, enclosing) {
                        return true;
                    }
                }
                false
            }
            ExpressionKind::Member {
                object, property, ..
            } => {
                self.drive_expression(object, enclosing)
                    || self.drive_expression(property, enclosing)
            }
            ExpressionKind::Call(data) | ExpressionKind::New(data) => {
                if self.drive_expression(&mut data.callee, enclosing) {
                    return true;
                }
                for argument in &mut data.arguments {
                    if self.drive_expression(&mut argument.value, enclosing) {
                        return true;
                    }
                }
                false
            }
            ExpressionKind::Spread(argument) => self.drive_expression(argument, enclosing),
            ExpressionKind::Array(elements) => {
                for element in elements.iter_mut().flatten() {
                    if self.drive_expression(element, enclosing) {
                        return true;
                    }
                }
                false
            }
            ExpressionKind::TemplateLiteral(data) => {
                for child in &mut data.expressions {
                    if self.drive_expression(child, enclosing) {
                        return true;
                    }
                }
                false
            }
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.drive_expression(tag, enclosing) || self.drive_expression(quasi, enclosing)
            }
            ExpressionKind::Yield {
                argument: Some(argument),
                ..
            } => self.drive_expression(argument, enclosing),
            ExpressionKind::Await(operand) => self.drive_expression(operand, enclosing),
            _ => false,
        }
    }

    fn drive_object_literal(
        &mut self,
        expression: &mut Expression,
        enclosing: Option<FunctionId>,
    ) -> bool {
        let ExpressionKind::Object(properties) = &mut expression.inner else {
            return false;
        };
        let mut goal_method = None;
        for (index, property) in properties.iter_mut().enumerate() {
            match property.kind {
                PropertyKind::Method | PropertyKind::Getter | PropertyKind::Setter => {
                    let Some(value) = &mut property.value else { continue };
                    let ExpressionKind::Function(function) = &mut value.inner else {
                        continue;
                    };
                    if self.drive_function_interior(function) {
                        goal_method = Some(index);
                        break;
                    }
                }
                PropertyKind::Init | PropertyKind::Spread => {
                    if property.computed && self.drive_expression(&mut property.key, enclosing) {
                        return true;
                    }
                    if let Some(value) = &mut property.value {
                        if self.drive_expression(value, enclosing) {
                            return true;
                        }
                    }
                    if property.kind == PropertyKind::Spread
                        && self.drive_expression(&mut property.key, enclosing)
                    {
                        return true;
                    }
                }
            }
        }
        let Some(index) = goal_method else {
            return false;
        };
        if self.failed {
            return true;
        }

        let receiver = self.cx.pool.fresh("obj");
        let block = self.build_object_method_call_block(properties, &receiver, index, enclosing);
        let original = std::mem::replace(expression, Expression::undefined());
        *expression = self.immediately_invoked(receiver, vec![block], original);
        true
    }

    // =========================================================================
    // Function interiors
    // =========================================================================

    /// Drive into a function's parameter defaults and body. Returns true if
    /// the goal lies inside.
    fn drive_function_interior(&mut self, data: &mut FunctionData) -> bool {
        for parameter in &mut data.parameters {
            if let Some(default_value) = &mut parameter.default_value {
                if self.drive_expression(default_value, Some(data.id)) {
                    self.unsupported("parameter default expression");
                    return true;
                }
            }
        }
        match &mut data.body {
            FunctionBody::Block(statements) => self.drive_statements(statements, Some(data.id)),
            FunctionBody::Expression(expression) => {
                // Normalizer turns arrow expression bodies into blocks
                // before driving; a thunk synthesized later never holds a
                // goal.
                let id = data.id;
                self.drive_expression(expression, Some(id))
            }
        }
    }

    fn drive_class_interior(
        &mut self,
        class: &mut ClassData,
        enclosing: Option<FunctionId>,
    ) -> ClassContains {
        if let Some(super_class) = &mut class.super_class {
            if self.drive_expression(super_class, enclosing) {
                return ClassContains::Passive;
            }
        }
        for (index, element) in class.elements.iter_mut().enumerate() {
            match element {
                ClassElement::Method(method) => {
                    if self.drive_function_interior(&mut method.function) {
                        return ClassContains::Method(index);
                    }
                }
                ClassElement::Field {
                    initializer: Some(initializer),
                    ..
                } => {
                    if self.drive_expression(initializer, enclosing) {
                        self.unsupported("class field initializer");
                        return ClassContains::Passive;
                    }
                }
                // Static blocks run when the class definition executes, so
                // control reaches them without further synthesis.
                ClassElement::StaticBlock(statements) => {
                    if self.drive_statements(statements, enclosing) {
                        return ClassContains::Passive;
                    }
                }
                _ => {}
            }
        }
        ClassContains::No
    }

    // =========================================================================
    // Call synthesis
    // =========================================================================

    /// `((binding) => { <inner> return binding; })(<argument>)`
    fn immediately_invoked(
        &mut self,
        binding: String,
        mut inner: Vec<Statement>,
        argument: Expression,
    ) -> Expression {
        inner.push(Node::synthesized(StatementKind::Return(Some(Box::new(
            ident(&binding),
        )))));
        let wrapper = Node::synthesized(ExpressionKind::Function(Box::new(FunctionData {
            id: self.cx.fresh_function_id(),
            name: None,
            parameters: vec![FunctionParameter {
                pattern: Pattern::Identifier(binding),
                default_value: None,
                is_rest: false,
            }],
            body: FunctionBody::Block(inner),
            kind: FunctionKind::Normal,
            is_arrow: true,
        })));
        Node::synthesized(ExpressionKind::Call(CallData {
            callee: Box::new(wrapper),
            arguments: vec![Argument {
                value: argument,
                is_spread: false,
            }],
            optional: false,
        }))
    }

    /// Resolve a parameter list against the goal's initializers.
    ///
    /// Returns the consumed `(name, expression)` const bindings and the
    /// positional argument expressions (gaps filled with `void 0`,
    /// trailing gaps trimmed so defaults still apply).
    fn resolve_arguments(
        &mut self,
        parameters: &[FunctionParameter],
        qualifiers: &[String],
    ) -> (Vec<(String, Expression)>, Vec<Expression>) {
        let mut bindings = Vec::new();
        let mut slots: Vec<Option<String>> = Vec::new();

        for (index, parameter) in parameters.iter().enumerate() {
            if parameter.is_rest {
                break;
            }
            let name = match &parameter.pattern {
                Pattern::Identifier(name) => Some(name.clone()),
                _ => None,
            };
            let mut keys = Vec::new();
            if let Some(name) = &name {
                for qualifier in qualifiers {
                    keys.push(format!("{qualifier}.{name}"));
                }
                keys.push(name.clone());
            }
            match self.goal.consume(&keys) {
                Some(value) => {
                    let name = name.expect("keys are only built for named parameters");
                    bindings.push((name.clone(), value));
                    slots.push(Some(name));
                }
                None => {
                    if parameter.default_value.is_none() {
                        let hint = match (&name, qualifiers.first()) {
                            (Some(name), Some(qualifier)) => format!("{qualifier}.{name}"),
                            (Some(name), None) => name.clone(),
                            _ => "<destructured>".to_string(),
                        };
                        self.cx.diagnostics.warn(&format!(
                            "goal {}: no initializer for parameter {index} ({hint}); passing undefined",
                            self.goal.id
                        ));
                    }
                    slots.push(None);
                }
            }
        }

        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        let arguments = slots
            .into_iter()
            .map(|slot| match slot {
                Some(name) => ident(&name),
                None => Expression::undefined(),
            })
            .collect();
        (bindings, arguments)
    }

    /// The guarded call block shared by every invocation form:
    ///
    /// ```text
    /// if (G) {
    ///   try {
    ///     const …bindings…;
    ///     activeFrames |= 1n << Nn;
    ///     <invocation>;
    ///   } finally {
    ///     seeking = 0;
    ///   }
    /// }
    /// ```
    fn guarded_call_block(
        &mut self,
        bindings: Vec<(String, Expression)>,
        callee_function: FunctionId,
        invocation: Statement,
        enclosing: Option<FunctionId>,
    ) -> Statement {
        let frame = self.cx.frames.ensure(callee_function, &mut self.cx.pool);
        let mask = self.cx.support.active_mask(&mut self.cx.pool);

        let mut try_block = Vec::new();
        if !bindings.is_empty() {
            try_block.push(const_declaration(bindings));
        }
        try_block.push(Statement::expression(Node::synthesized(
            ExpressionKind::Assignment {
                op: AssignmentOp::BitwiseOrAssignment,
                lhs: Box::new(ident(&mask)),
                rhs: Box::new(Node::synthesized(ExpressionKind::Binary {
                    op: BinaryOp::LeftShift,
                    lhs: Box::new(bigint(1)),
                    rhs: Box::new(bigint(frame.bit)),
                })),
            },
        )));
        try_block.push(invocation);

        let try_statement = Node::synthesized(StatementKind::Try(TryData {
            block: Box::new(Statement::block(try_block)),
            handler: None,
            finalizer: Some(Box::new(Statement::block(vec![assign_statement(
                &self.seeking.clone(),
                Expression::number(0.0),
            )]))),
        }));

        let guard = self.guard(enclosing);
        Node::synthesized(StatementKind::If {
            test: Box::new(guard),
            consequent: Box::new(Statement::block(vec![try_statement])),
            alternate: None,
        })
    }

    /// Call block for a plain function (declaration or expression). With
    /// `bind`, the callable is first bound to a fresh const.
    fn build_function_call_block(
        &mut self,
        callee: Expression,
        data: &FunctionData,
        bind: bool,
        enclosing: Option<FunctionId>,
    ) -> Statement {
        let qualifiers: Vec<String> = data.name.iter().cloned().collect();
        let (mut bindings, arguments) = self.resolve_arguments(&data.parameters, &qualifiers);

        let callee = if bind {
            let binding = self.cx.pool.fresh("callee");
            bindings.insert(0, (binding.clone(), callee));
            ident(&binding)
        } else {
            callee
        };

        let mut invocation = call(callee, arguments);
        if data.kind.is_generator() {
            invocation = call(Expression::member(invocation, "next"), Vec::new());
        }
        self.guarded_call_block(
            bindings,
            data.id,
            Statement::expression(invocation),
            enclosing,
        )
    }

    /// Call block for a class method, constructor, or accessor.
    /// `class_ref` is the expression naming the class object at the block's
    /// position (the declaration name or the IIFE binding).
    fn build_method_call_block(
        &mut self,
        class: &mut ClassData,
        class_ref: Expression,
        index: usize,
        enclosing: Option<FunctionId>,
    ) -> Statement {
        let class_name = class.name.clone().unwrap_or_default();
        let (method_key, callable_index) = self.ensure_callable_key(&mut class.elements, index);

        let ClassElement::Method(original) = &class.elements[index] else {
            unreachable!("index points at a method");
        };
        let is_static = original.is_static;
        // After delegation the original body lives in the stable sibling
        // and is invoked as a plain method.
        let kind = if callable_index == index {
            original.kind
        } else {
            MethodKind::Method
        };
        let ClassElement::Method(callable) = &class.elements[callable_index] else {
            unreachable!("callable index points at a method");
        };
        let function_id = callable.function.id;
        let is_generator = callable.function.kind.is_generator();
        let parameters = callable.function.parameters.clone();

        let mut qualifiers = Vec::new();
        if !class_name.is_empty() {
            qualifiers.push(format!("{class_name}.{method_key}"));
        }
        qualifiers.push(method_key.clone());
        let (mut bindings, arguments) = self.resolve_arguments(&parameters, &qualifiers);

        let invocation = match kind {
            MethodKind::Constructor => Node::synthesized(ExpressionKind::New(CallData {
                callee: Box::new(class_ref),
                arguments: arguments
                    .into_iter()
                    .map(|value| Argument {
                        value,
                        is_spread: false,
                    })
                    .collect(),
                optional: false,
            })),
            _ => {
                let receiver = if is_static {
                    class_ref
                } else {
                    self.resolve_receiver(class, &class_name, &method_key, class_ref, &mut bindings)
                };
                let member = Expression::member(receiver, method_key.clone());
                match kind {
                    MethodKind::Getter => member,
                    MethodKind::Setter => {
                        let value = arguments
                            .into_iter()
                            .next()
                            .unwrap_or_else(Expression::undefined);
                        Node::synthesized(ExpressionKind::Assignment {
                            op: AssignmentOp::Assignment,
                            lhs: Box::new(member),
                            rhs: Box::new(value),
                        })
                    }
                    _ => {
                        let mut invocation = call(member, arguments);
                        if is_generator {
                            invocation =
                                call(Expression::member(invocation, "next"), Vec::new());
                        }
                        invocation
                    }
                }
            }
        };

        self.guarded_call_block(
            bindings,
            function_id,
            Statement::expression(invocation),
            enclosing,
        )
    }

    /// Resolve the receiver for a non-static method call: a supplied
    /// `this` initializer, or a synthesized `new Class(…)` whose
    /// constructor arguments come from `<class>.this.<p>` / `this.<p>`.
    fn resolve_receiver(
        &mut self,
        class: &ClassData,
        class_name: &str,
        method_key: &str,
        class_ref: Expression,
        bindings: &mut Vec<(String, Expression)>,
    ) -> Expression {
        let mut keys = Vec::new();
        if !class_name.is_empty() {
            keys.push(format!("{class_name}.this"));
            keys.push(format!("{class_name}.{method_key}.this"));
        }
        keys.push("this".to_string());
        if let Some(receiver) = self.goal.consume(&keys) {
            return receiver;
        }

        // Construct an instance: resolve the constructor's parameters
        // under the `this` prefixes.
        let constructor_parameters = class
            .elements
            .iter()
            .find_map(|element| match element {
                ClassElement::Method(method) if method.kind == MethodKind::Constructor => {
                    Some(method.function.parameters.clone())
                }
                _ => None,
            })
            .unwrap_or_default();

        let mut slots: Vec<Option<Expression>> = Vec::new();
        let taken: Vec<String> = bindings.iter().map(|(name, _)| name.clone()).collect();
        for parameter in &constructor_parameters {
            if parameter.is_rest {
                break;
            }
            let name = match &parameter.pattern {
                Pattern::Identifier(name) => Some(name.clone()),
                _ => None,
            };
            let mut keys = Vec::new();
            if let Some(name) = &name {
                if !class_name.is_empty() {
                    keys.push(format!("{class_name}.this.{name}"));
                }
                keys.push(format!("this.{name}"));
            }
            match self.goal.consume(&keys) {
                Some(value) => {
                    match name {
                        // Bind so later initializers can reference the
                        // name, unless the method arguments already took
                        // it.
                        Some(name) if !taken.contains(&name) => {
                            bindings.push((name.clone(), value));
                            slots.push(Some(ident(&name)));
                        }
                        _ => slots.push(Some(value)),
                    }
                }
                None => slots.push(None),
            }
        }
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        let arguments = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(Expression::undefined))
            .map(|value| Argument {
                value,
                is_spread: false,
            })
            .collect();

        Node::synthesized(ExpressionKind::New(CallData {
            callee: Box::new(class_ref),
            arguments,
            optional: false,
        }))
    }

    /// Make sure the goal method is invocable by name. Plain identifier
    /// keys are used directly; computed, private, string, and numeric keys
    /// get a fresh stable sibling method holding the original body, with
    /// the original member turned into a forwarding delegator.
    ///
    /// Returns the callable key and the element index holding the body to
    /// invoke (the original index, or the stable sibling's).
    fn ensure_callable_key(
        &mut self,
        elements: &mut Vec<ClassElement>,
        index: usize,
    ) -> (String, usize) {
        let ClassElement::Method(method) = &mut elements[index] else {
            unreachable!("index points at a method");
        };
        if !method.computed {
            if let ExpressionKind::Identifier(name) = &method.key.inner {
                return (name.clone(), index);
            }
        }

        let stable = self.cx.pool.fresh("method");
        let delegator_function = self.build_delegator(method.kind, &stable);
        let original_function =
            std::mem::replace(&mut method.function, Box::new(delegator_function));
        let stable_method = ClassElement::Method(ClassMethod {
            key: Box::new(ident(&stable)),
            computed: false,
            is_static: method.is_static,
            kind: MethodKind::Method,
            function: original_function,
        });
        elements.insert(index + 1, stable_method);
        (stable, index + 1)
    }

    /// A delegator body forwarding through the stable key:
    /// method → `(...args) { return this.<stable>(...args); }`,
    /// getter → `() { return this.<stable>(); }`,
    /// setter → `(v) { this.<stable>(v); }`.
    fn build_delegator(&mut self, kind: MethodKind, stable: &str) -> FunctionData {
        let forward_target = Expression::member(
            Node::synthesized(ExpressionKind::This),
            stable.to_string(),
        );
        let (parameters, body) = match kind {
            MethodKind::Setter => {
                let value = self.cx.pool.fresh("value");
                let forward = call(forward_target, vec![ident(&value)]);
                (
                    vec![FunctionParameter {
                        pattern: Pattern::Identifier(value),
                        default_value: None,
                        is_rest: false,
                    }],
                    vec![Statement::expression(forward)],
                )
            }
            MethodKind::Getter => {
                let forward = call(forward_target, Vec::new());
                (
                    Vec::new(),
                    vec![Node::synthesized(StatementKind::Return(Some(Box::new(
                        forward,
                    ))))],
                )
            }
            _ => {
                let rest = self.cx.pool.fresh("args");
                let forward = Node::synthesized(ExpressionKind::Call(CallData {
                    callee: Box::new(forward_target),
                    arguments: vec![Argument {
                        value: Node::synthesized(ExpressionKind::Spread(Box::new(ident(&rest)))),
                        is_spread: false,
                    }],
                    optional: false,
                }));
                (
                    vec![FunctionParameter {
                        pattern: Pattern::Identifier(rest),
                        default_value: None,
                        is_rest: true,
                    }],
                    vec![Node::synthesized(StatementKind::Return(Some(Box::new(
                        forward,
                    ))))],
                )
            }
        };
        FunctionData {
            id: self.cx.fresh_function_id(),
            name: None,
            parameters,
            body: FunctionBody::Block(body),
            kind: FunctionKind::Normal,
            is_arrow: false,
        }
    }

    /// Call block for an object-literal method; the receiver is the
    /// wrapper binding holding the object.
    fn build_object_method_call_block(
        &mut self,
        properties: &mut Vec<ObjectProperty>,
        receiver: &str,
        index: usize,
        enclosing: Option<FunctionId>,
    ) -> Statement {
        let (method_key, callable_index) = self.ensure_callable_object_key(properties, index);

        let kind = if callable_index == index {
            properties[index].kind
        } else {
            PropertyKind::Method
        };
        let callable = &properties[callable_index];
        let Some(value) = &callable.value else {
            unreachable!("methods carry their function");
        };
        let ExpressionKind::Function(function) = &value.inner else {
            unreachable!("methods carry their function");
        };
        let function_id = function.id;
        let is_generator = function.kind.is_generator();
        let parameters = function.parameters.clone();

        let qualifiers = vec![method_key.clone()];
        let (bindings, arguments) = self.resolve_arguments(&parameters, &qualifiers);

        let member = Expression::member(ident(receiver), method_key);
        let invocation = match kind {
            PropertyKind::Getter => member,
            PropertyKind::Setter => {
                let value = arguments
                    .into_iter()
                    .next()
                    .unwrap_or_else(Expression::undefined);
                Node::synthesized(ExpressionKind::Assignment {
                    op: AssignmentOp::Assignment,
                    lhs: Box::new(member),
                    rhs: Box::new(value),
                })
            }
            _ => {
                let mut invocation = call(member, arguments);
                if is_generator {
                    invocation = call(Expression::member(invocation, "next"), Vec::new());
                }
                invocation
            }
        };

        self.guarded_call_block(
            bindings,
            function_id,
            Statement::expression(invocation),
            enclosing,
        )
    }

    fn ensure_callable_object_key(
        &mut self,
        properties: &mut Vec<ObjectProperty>,
        index: usize,
    ) -> (String, usize) {
        let property = &mut properties[index];
        if !property.computed {
            if let ExpressionKind::Identifier(name) = &property.key.inner {
                return (name.clone(), index);
            }
        }

        let stable = self.cx.pool.fresh("method");
        let delegator_kind = match property.kind {
            PropertyKind::Getter => MethodKind::Getter,
            PropertyKind::Setter => MethodKind::Setter,
            _ => MethodKind::Method,
        };
        let delegator = self.build_delegator(delegator_kind, &stable);

        let Some(value) = &mut property.value else {
            unreachable!("methods carry their function");
        };
        let ExpressionKind::Function(function) = &mut value.inner else {
            unreachable!("methods carry their function");
        };
        let original = std::mem::replace(function, Box::new(delegator));

        let stable_property = ObjectProperty {
            kind: PropertyKind::Method,
            key: Box::new(ident(&stable)),
            computed: false,
            shorthand: false,
            value: Some(Box::new(Node::synthesized(ExpressionKind::Function(
                original,
            )))),
        };
        properties.insert(index + 1, stable_property);
        (stable, index + 1)
    }

    /// The error thrown into the try block to reach a catch-handler goal.
    fn resolve_catch_error(&mut self, parameter: Option<&Pattern>) -> Expression {
        if let Some(Pattern::Identifier(name)) = parameter {
            let keys = vec![name.clone(), format!("catch.{name}")];
            if let Some(value) = self.goal.consume(&keys) {
                return value;
            }
        }
        Node::synthesized(ExpressionKind::New(CallData {
            callee: Box::new(ident("Error")),
            arguments: vec![Argument {
                value: Expression::string("synthesized"),
                is_spread: false,
            }],
            optional: false,
        }))
    }
}

// =============================================================================
// Prologue installation
// =============================================================================

fn prologue_function(data: &mut FunctionData, cx: &mut TransformContext, mask: &str) {
    for parameter in &mut data.parameters {
        if let Some(default_value) = &mut parameter.default_value {
            prologue_expression(default_value, cx, mask);
        }
    }
    if let FunctionBody::Block(statements) = &mut data.body {
        for statement in statements.iter_mut() {
            prologue_statement(statement, cx, mask);
        }
        if let Some(frame) = cx.frames.get(data.id) {
            // const active_n = activeFrames >> nn & 1n;
            let read_bit = const_declaration(vec![(
                frame.flag.clone(),
                Node::synthesized(ExpressionKind::Binary {
                    op: BinaryOp::BitwiseAnd,
                    lhs: Box::new(Node::synthesized(ExpressionKind::Binary {
                        op: BinaryOp::RightShift,
                        lhs: Box::new(ident(mask)),
                        rhs: Box::new(bigint(frame.bit)),
                    })),
                    rhs: Box::new(bigint(1)),
                }),
            )]);
            // activeFrames &= ~(1n << nn);
            let clear_bit = Statement::expression(Node::synthesized(
                ExpressionKind::Assignment {
                    op: AssignmentOp::BitwiseAndAssignment,
                    lhs: Box::new(ident(mask)),
                    rhs: Box::new(Node::synthesized(ExpressionKind::Unary {
                        op: UnaryOp::BitwiseNot,
                        operand: Box::new(Node::synthesized(ExpressionKind::Binary {
                            op: BinaryOp::LeftShift,
                            lhs: Box::new(bigint(1)),
                            rhs: Box::new(bigint(frame.bit)),
                        })),
                    })),
                },
            ));
            statements.insert(0, read_bit);
            statements.insert(1, clear_bit);
        }
    }
}

fn prologue_class(data: &mut ClassData, cx: &mut TransformContext, mask: &str) {
    if let Some(super_class) = &mut data.super_class {
        prologue_expression(super_class, cx, mask);
    }
    for element in &mut data.elements {
        match element {
            ClassElement::Method(method) => prologue_function(&mut method.function, cx, mask),
            ClassElement::Field {
                initializer: Some(initializer),
                ..
            } => prologue_expression(initializer, cx, mask),
            ClassElement::StaticBlock(statements) => {
                for statement in statements {
                    prologue_statement(statement, cx, mask);
                }
            }
            _ => {}
        }
    }
}

fn prologue_statement(statement: &mut Statement, cx: &mut TransformContext, mask: &str) {
    match &mut statement.inner {
        StatementKind::Expression(expression) => prologue_expression(expression, cx, mask),
        StatementKind::Block(children) => {
            for child in children {
                prologue_statement(child, cx, mask);
            }
        }
        StatementKind::If {
            test,
            consequent,
            alternate,
        } => {
            prologue_expression(test, cx, mask);
            prologue_statement(consequent, cx, mask);
            if let Some(alternate) = alternate {
                prologue_statement(alternate, cx, mask);
            }
        }
        StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
            prologue_expression(test, cx, mask);
            prologue_statement(body, cx, mask);
        }
        StatementKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => {
                    prologue_statement(declaration, cx, mask)
                }
                Some(ForInit::Expression(expression)) => prologue_expression(expression, cx, mask),
                None => {}
            }
            if let Some(test) = test {
                prologue_expression(test, cx, mask);
            }
            if let Some(update) = update {
                prologue_expression(update, cx, mask);
            }
            prologue_statement(body, cx, mask);
        }
        StatementKind::ForInOf {
            head, rhs, body, ..
        } => {
            if let ForHead::Expression(expression) = head {
                prologue_expression(expression, cx, mask);
            }
            prologue_expression(rhs, cx, mask);
            prologue_statement(body, cx, mask);
        }
        StatementKind::Switch {
            discriminant,
            cases,
        } => {
            prologue_expression(discriminant, cx, mask);
            for case in cases {
                if let Some(test) = &mut case.test {
                    prologue_expression(test, cx, mask);
                }
                for child in &mut case.body {
                    prologue_statement(child, cx, mask);
                }
            }
        }
        StatementKind::With { object, body } => {
            prologue_expression(object, cx, mask);
            prologue_statement(body, cx, mask);
        }
        StatementKind::Labelled { body, .. } => prologue_statement(body, cx, mask),
        StatementKind::Return(Some(argument)) => prologue_expression(argument, cx, mask),
        StatementKind::Throw(argument) => prologue_expression(argument, cx, mask),
        StatementKind::Try(data) => {
            prologue_statement(&mut data.block, cx, mask);
            if let Some(handler) = &mut data.handler {
                prologue_statement(&mut handler.body, cx, mask);
            }
            if let Some(finalizer) = &mut data.finalizer {
                prologue_statement(finalizer, cx, mask);
            }
        }
        StatementKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if let Some(init) = &mut declarator.init {
                    prologue_expression(init, cx, mask);
                }
            }
        }
        StatementKind::FunctionDeclaration(data) => prologue_function(data, cx, mask),
        StatementKind::ClassDeclaration(data) => prologue_class(data, cx, mask),
        StatementKind::Export(data) => {
            if let Some(declaration) = &mut data.declaration {
                prologue_statement(declaration, cx, mask);
            }
        }
        _ => {}
    }
}

fn prologue_expression(expression: &mut Expression, cx: &mut TransformContext, mask: &str) {
    match &mut expression.inner {
        ExpressionKind::Function(data) => prologue_function(data, cx, mask),
        ExpressionKind::Class(data) => prologue_class(data, cx, mask),
        ExpressionKind::Binary { lhs, rhs, .. }
        | ExpressionKind::Logical { lhs, rhs, .. }
        | ExpressionKind::Assignment { lhs, rhs, .. } => {
            prologue_expression(lhs, cx, mask);
            prologue_expression(rhs, cx, mask);
        }
        ExpressionKind::Unary { operand, .. } => prologue_expression(operand, cx, mask),
        ExpressionKind::Update { argument, .. } => prologue_expression(argument, cx, mask),
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            prologue_expression(test, cx, mask);
            prologue_expression(consequent, cx, mask);
            prologue_expression(alternate, cx, mask);
        }
        ExpressionKind::Sequence(expressions) => {
            for child in expressions {
                prologue_expression(child, cx, mask);
            }
        }
        ExpressionKind::Member {
            object, property, ..
        } => {
            prologue_expression(object, cx, mask);
            prologue_expression(property, cx, mask);
        }
        ExpressionKind::Call(data) | ExpressionKind::New(data) => {
            prologue_expression(&mut data.callee, cx, mask);
            for argument in &mut data.arguments {
                prologue_expression(&mut argument.value, cx, mask);
            }
        }
        ExpressionKind::Spread(argument) => prologue_expression(argument, cx, mask),
        ExpressionKind::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                prologue_expression(element, cx, mask);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                prologue_expression(&mut property.key, cx, mask);
                if let Some(value) = &mut property.value {
                    prologue_expression(value, cx, mask);
                }
            }
        }
        ExpressionKind::TemplateLiteral(data) => {
            for child in &mut data.expressions {
                prologue_expression(child, cx, mask);
            }
        }
        ExpressionKind::TaggedTemplate { tag, quasi } => {
            prologue_expression(tag, cx, mask);
            prologue_expression(quasi, cx, mask);
        }
        ExpressionKind::Yield {
            argument: Some(argument),
            ..
        } => prologue_expression(argument, cx, mask),
        ExpressionKind::Await(operand) => prologue_expression(operand, cx, mask),
        _ => {}
    }
}
