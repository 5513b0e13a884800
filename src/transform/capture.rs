/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Capture-variable pass (`$$name`).
//!
//! Double-sigil identifiers auto-declare themselves as a `[text, value]`
//! pair at the deepest function (or module) scope that encloses all their
//! uses:
//!
//! - plain uses read/write the value slot: `$$x` → `$$x[1]`;
//! - assignments also record the right-hand side's surface form with the
//!   operator string-reversed: `$$x += f(y)` →
//!   `($$x[0] = "f(y) =+", $$x[1] += f(y))`;
//! - spread uses stay bare, so `log(...$$x)` prints `text value`.
//!
//! Names with any occurrence in a declaring position (parameter, pattern
//! target, property key, function/class name) are left entirely alone.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::*;
use crate::printer;

const SIGIL: &str = "$$";

fn is_capture_name(name: &str) -> bool {
    name.len() > SIGIL.len() && name.starts_with(SIGIL)
}

pub fn rewrite_captures(program: &mut Program) {
    let mut collector = Collector {
        stack: Vec::new(),
        order: Vec::new(),
        chains: FxHashMap::default(),
        excluded: FxHashSet::default(),
    };
    for statement in &program.body {
        collector.statement(statement);
    }

    // Deepest common function-or-module scope per name.
    let mut active: FxHashSet<String> = FxHashSet::default();
    let mut declarations: FxHashMap<Option<FunctionId>, Vec<String>> = FxHashMap::default();
    for name in &collector.order {
        if collector.excluded.contains(name) {
            continue;
        }
        let chains = &collector.chains[name];
        let mut prefix: Vec<FunctionId> = chains[0].clone();
        for chain in &chains[1..] {
            let common = prefix
                .iter()
                .zip(chain.iter())
                .take_while(|(a, b)| a == b)
                .count();
            prefix.truncate(common);
        }
        active.insert(name.clone());
        declarations
            .entry(prefix.last().copied())
            .or_default()
            .push(name.clone());
    }
    if active.is_empty() {
        return;
    }

    let rewriter = Rewriter { active };
    for statement in &mut program.body {
        rewriter.statement(statement);
    }

    if let Some(names) = declarations.remove(&None) {
        for name in names.into_iter().rev() {
            program.body.insert(0, pair_declaration(&name));
        }
    }
    if !declarations.is_empty() {
        let mut inserter = Inserter { declarations };
        for statement in &mut program.body {
            inserter.statement(statement);
        }
    }
}

/// `const $$x = ["", void 0];`
fn pair_declaration(name: &str) -> Statement {
    Node::synthesized(StatementKind::VariableDeclaration {
        kind: DeclarationKind::Const,
        declarations: vec![VariableDeclarator {
            target: Pattern::Identifier(name.to_string()),
            init: Some(Node::synthesized(ExpressionKind::Array(vec![
                Some(Expression::string("")),
                Some(Expression::undefined()),
            ]))),
        }],
    })
}

/// `$$x[1]`
fn value_slot(name: &str) -> ExpressionKind {
    ExpressionKind::Member {
        object: Box::new(Expression::identifier(name)),
        property: Box::new(Expression::number(1.0)),
        computed: true,
        optional: false,
    }
}

/// `$$x[0]`
fn text_slot(name: &str) -> Expression {
    Node::synthesized(ExpressionKind::Member {
        object: Box::new(Expression::identifier(name)),
        property: Box::new(Expression::number(0.0)),
        computed: true,
        optional: false,
    })
}

// =============================================================================
// Occurrence collection
// =============================================================================

struct Collector {
    stack: Vec<FunctionId>,
    order: Vec<String>,
    chains: FxHashMap<String, Vec<Vec<FunctionId>>>,
    excluded: FxHashSet<String>,
}

impl Collector {
    fn record_use(&mut self, name: &str) {
        if !is_capture_name(name) {
            return;
        }
        if !self.chains.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.chains
            .entry(name.to_string())
            .or_default()
            .push(self.stack.clone());
    }

    fn record_declaring(&mut self, name: &str) {
        if is_capture_name(name) {
            self.excluded.insert(name.to_string());
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(name) => self.record_declaring(name),
            Pattern::Object(properties) => {
                for property in properties {
                    self.property_key(&property.key, property.computed);
                    if property.is_rest {
                        if let ExpressionKind::Identifier(name) = &property.key.inner {
                            self.record_declaring(name);
                        }
                        continue;
                    }
                    match &property.value {
                        Some(value) => self.pattern(value),
                        // Shorthand: the key is also the binding target.
                        None => {
                            if let ExpressionKind::Identifier(name) = &property.key.inner {
                                self.record_declaring(name);
                            }
                        }
                    }
                    if let Some(default_value) = &property.default_value {
                        self.expression(default_value);
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements.iter().flatten() {
                    self.pattern(&element.pattern);
                    if let Some(default_value) = &element.default_value {
                        self.expression(default_value);
                    }
                }
            }
        }
    }

    /// Non-computed keys are declaring positions; computed keys are
    /// ordinary expressions.
    fn property_key(&mut self, key: &Expression, computed: bool) {
        if computed {
            self.expression(key);
        } else if let ExpressionKind::Identifier(name) = &key.inner {
            self.record_declaring(name);
        }
    }

    fn function(&mut self, data: &FunctionData) {
        if let Some(name) = &data.name {
            self.record_declaring(name);
        }
        for parameter in &data.parameters {
            self.pattern(&parameter.pattern);
            if let Some(default_value) = &parameter.default_value {
                self.expression(default_value);
            }
        }
        self.stack.push(data.id);
        match &data.body {
            FunctionBody::Block(statements) => {
                for statement in statements {
                    self.statement(statement);
                }
            }
            FunctionBody::Expression(expression) => self.expression(expression),
        }
        self.stack.pop();
    }

    fn class(&mut self, data: &ClassData) {
        if let Some(name) = &data.name {
            self.record_declaring(name);
        }
        if let Some(super_class) = &data.super_class {
            self.expression(super_class);
        }
        for element in &data.elements {
            match element {
                ClassElement::Method(method) => {
                    self.property_key(&method.key, method.computed);
                    self.function(&method.function);
                }
                ClassElement::Field {
                    key,
                    computed,
                    initializer,
                    ..
                } => {
                    self.property_key(key, *computed);
                    if let Some(initializer) = initializer {
                        self.expression(initializer);
                    }
                }
                ClassElement::StaticBlock(statements) => {
                    for statement in statements {
                        self.statement(statement);
                    }
                }
            }
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match &statement.inner {
            StatementKind::Expression(expression) => self.expression(expression),
            StatementKind::Block(children) => {
                for child in children {
                    self.statement(child);
                }
            }
            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.statement(consequent);
                if let Some(alternate) = alternate {
                    self.statement(alternate);
                }
            }
            StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
                self.expression(test);
                self.statement(body);
            }
            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Declaration(declaration)) => self.statement(declaration),
                    Some(ForInit::Expression(expression)) => self.expression(expression),
                    None => {}
                }
                if let Some(test) = test {
                    self.expression(test);
                }
                if let Some(update) = update {
                    self.expression(update);
                }
                self.statement(body);
            }
            StatementKind::ForInOf {
                head, rhs, body, ..
            } => {
                match head {
                    ForHead::Declaration { target, .. } => self.pattern(target),
                    ForHead::Expression(expression) => self.expression(expression),
                }
                self.expression(rhs);
                self.statement(body);
            }
            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                self.expression(discriminant);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.expression(test);
                    }
                    for child in &case.body {
                        self.statement(child);
                    }
                }
            }
            StatementKind::With { object, body } => {
                self.expression(object);
                self.statement(body);
            }
            StatementKind::Labelled { body, .. } => self.statement(body),
            StatementKind::Return(Some(argument)) => self.expression(argument),
            StatementKind::Throw(argument) => self.expression(argument),
            StatementKind::Try(data) => {
                self.statement(&data.block);
                if let Some(handler) = &data.handler {
                    if let Some(parameter) = &handler.parameter {
                        self.pattern(parameter);
                    }
                    self.statement(&handler.body);
                }
                if let Some(finalizer) = &data.finalizer {
                    self.statement(finalizer);
                }
            }
            StatementKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    self.pattern(&declarator.target);
                    if let Some(init) = &declarator.init {
                        self.expression(init);
                    }
                }
            }
            StatementKind::FunctionDeclaration(data) => self.function(data),
            StatementKind::ClassDeclaration(data) => self.class(data),
            StatementKind::Import(data) => {
                if let Some(binding) = &data.default_binding {
                    self.record_declaring(binding);
                }
                if let Some(binding) = &data.namespace_binding {
                    self.record_declaring(binding);
                }
                for specifier in &data.named {
                    self.record_declaring(&specifier.local);
                }
            }
            StatementKind::Export(data) => {
                if let Some(declaration) = &data.declaration {
                    self.statement(declaration);
                }
            }
            _ => {}
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match &expression.inner {
            ExpressionKind::Identifier(name) => self.record_use(name),
            ExpressionKind::Function(data) => self.function(data),
            ExpressionKind::Class(data) => self.class(data),
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Logical { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => {
                self.expression(lhs);
                self.expression(rhs);
            }
            ExpressionKind::Unary { operand, .. } => self.expression(operand),
            ExpressionKind::Update { argument, .. } => self.expression(argument),
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.expression(consequent);
                self.expression(alternate);
            }
            ExpressionKind::Sequence(expressions) => {
                for child in expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::Member {
                object,
                property,
                computed,
                ..
            } => {
                self.expression(object);
                // `obj.$$x` names a property, not a capture variable.
                if *computed {
                    self.expression(property);
                }
            }
            ExpressionKind::Call(data) | ExpressionKind::New(data) => {
                self.expression(&data.callee);
                for argument in &data.arguments {
                    self.expression(&argument.value);
                }
            }
            ExpressionKind::Spread(argument) => self.expression(argument),
            ExpressionKind::Array(elements) => {
                for element in elements.iter().flatten() {
                    self.expression(element);
                }
            }
            ExpressionKind::Object(properties) => {
                for property in properties {
                    if property.kind == PropertyKind::Spread {
                        self.expression(&property.key);
                        continue;
                    }
                    if property.shorthand {
                        // `{ $$x }` is a use of the variable.
                        if let ExpressionKind::Identifier(name) = &property.key.inner {
                            self.record_use(name);
                        }
                        continue;
                    }
                    self.property_key(&property.key, property.computed);
                    if let Some(value) = &property.value {
                        self.expression(value);
                    }
                }
            }
            ExpressionKind::TemplateLiteral(data) => {
                for child in &data.expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.expression(tag);
                self.expression(quasi);
            }
            ExpressionKind::Yield {
                argument: Some(argument),
                ..
            } => self.expression(argument),
            ExpressionKind::Await(operand) => self.expression(operand),
            _ => {}
        }
    }
}

// =============================================================================
// Use rewriting
// =============================================================================

struct Rewriter {
    active: FxHashSet<String>,
}

impl Rewriter {
    fn is_active(&self, expression: &Expression) -> Option<String> {
        match &expression.inner {
            ExpressionKind::Identifier(name) if self.active.contains(name) => Some(name.clone()),
            _ => None,
        }
    }

    fn statement(&self, statement: &mut Statement) {
        match &mut statement.inner {
            StatementKind::Expression(expression) => self.expression(expression),
            StatementKind::Block(children) => {
                for child in children {
                    self.statement(child);
                }
            }
            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.statement(consequent);
                if let Some(alternate) = alternate {
                    self.statement(alternate);
                }
            }
            StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
                self.expression(test);
                self.statement(body);
            }
            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Declaration(declaration)) => self.statement(declaration),
                    Some(ForInit::Expression(expression)) => self.expression(expression),
                    None => {}
                }
                if let Some(test) = test {
                    self.expression(test);
                }
                if let Some(update) = update {
                    self.expression(update);
                }
                self.statement(body);
            }
            StatementKind::ForInOf {
                head, rhs, body, ..
            } => {
                if let ForHead::Expression(expression) = head {
                    self.expression(expression);
                }
                self.expression(rhs);
                self.statement(body);
            }
            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                self.expression(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.expression(test);
                    }
                    for child in &mut case.body {
                        self.statement(child);
                    }
                }
            }
            StatementKind::With { object, body } => {
                self.expression(object);
                self.statement(body);
            }
            StatementKind::Labelled { body, .. } => self.statement(body),
            StatementKind::Return(Some(argument)) => self.expression(argument),
            StatementKind::Throw(argument) => self.expression(argument),
            StatementKind::Try(data) => {
                self.statement(&mut data.block);
                if let Some(handler) = &mut data.handler {
                    self.statement(&mut handler.body);
                }
                if let Some(finalizer) = &mut data.finalizer {
                    self.statement(finalizer);
                }
            }
            StatementKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    if let Some(init) = &mut declarator.init {
                        self.expression(init);
                    }
                }
            }
            StatementKind::FunctionDeclaration(data) => self.function(data),
            StatementKind::ClassDeclaration(data) => self.class(data),
            StatementKind::Export(data) => {
                if let Some(declaration) = &mut data.declaration {
                    self.statement(declaration);
                }
            }
            _ => {}
        }
    }

    fn function(&self, data: &mut FunctionData) {
        for parameter in &mut data.parameters {
            if let Some(default_value) = &mut parameter.default_value {
                self.expression(default_value);
            }
        }
        match &mut data.body {
            FunctionBody::Block(statements) => {
                for statement in statements {
                    self.statement(statement);
                }
            }
            FunctionBody::Expression(expression) => self.expression(expression),
        }
    }

    fn class(&self, data: &mut ClassData) {
        if let Some(super_class) = &mut data.super_class {
            self.expression(super_class);
        }
        for element in &mut data.elements {
            match element {
                ClassElement::Method(method) => {
                    if method.computed {
                        self.expression(&mut method.key);
                    }
                    self.function(&mut method.function);
                }
                ClassElement::Field {
                    key,
                    computed,
                    initializer,
                    ..
                } => {
                    if *computed {
                        self.expression(key);
                    }
                    if let Some(initializer) = initializer {
                        self.expression(initializer);
                    }
                }
                ClassElement::StaticBlock(statements) => {
                    for statement in statements {
                        self.statement(statement);
                    }
                }
            }
        }
    }

    fn expression(&self, expression: &mut Expression) {
        // Assignment to a capture variable: record text, then value.
        if let ExpressionKind::Assignment { op, lhs, rhs } = &mut expression.inner {
            if let Some(name) = self.is_active(lhs) {
                let reversed: String = op.as_str().chars().rev().collect();
                let text = format!("{} {}", printer::print_expression(rhs), reversed);
                self.expression(rhs);

                let ExpressionKind::Assignment { op, rhs, .. } =
                    std::mem::replace(&mut expression.inner, ExpressionKind::Error)
                else {
                    unreachable!("matched above");
                };
                let record_text = Node::synthesized(ExpressionKind::Assignment {
                    op: AssignmentOp::Assignment,
                    lhs: Box::new(text_slot(&name)),
                    rhs: Box::new(Expression::string(text)),
                });
                let store_value = Node::synthesized(ExpressionKind::Assignment {
                    op,
                    lhs: Box::new(Node::synthesized(value_slot(&name))),
                    rhs,
                });
                expression.inner = ExpressionKind::Sequence(vec![record_text, store_value]);
                return;
            }
        }

        // Spread stays bare so `...$$x` yields `[text, value]`.
        if let ExpressionKind::Spread(argument) = &mut expression.inner {
            if self.is_active(argument).is_some() {
                return;
            }
            self.expression(argument);
            return;
        }

        if let Some(name) = self.is_active(expression) {
            expression.inner = value_slot(&name);
            return;
        }

        match &mut expression.inner {
            ExpressionKind::Function(data) => self.function(data),
            ExpressionKind::Class(data) => self.class(data),
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Logical { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => {
                self.expression(lhs);
                self.expression(rhs);
            }
            ExpressionKind::Unary { operand, .. } => self.expression(operand),
            ExpressionKind::Update { argument, .. } => self.expression(argument),
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.expression(consequent);
                self.expression(alternate);
            }
            ExpressionKind::Sequence(expressions) => {
                for child in expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::Member {
                object,
                property,
                computed,
                ..
            } => {
                self.expression(object);
                if *computed {
                    self.expression(property);
                }
            }
            ExpressionKind::Call(data) | ExpressionKind::New(data) => {
                self.expression(&mut data.callee);
                for argument in &mut data.arguments {
                    self.expression(&mut argument.value);
                }
            }
            ExpressionKind::Array(elements) => {
                for element in elements.iter_mut().flatten() {
                    self.expression(element);
                }
            }
            ExpressionKind::Object(properties) => {
                for property in properties {
                    if property.kind == PropertyKind::Spread {
                        self.expression(&mut property.key);
                        continue;
                    }
                    if property.shorthand {
                        // `{ $$x }` → `{ $$x: $$x[1] }`.
                        if let Some(name) = self.is_active(&property.key) {
                            property.shorthand = false;
                            property.value =
                                Some(Box::new(Node::synthesized(value_slot(&name))));
                        }
                        continue;
                    }
                    if property.computed {
                        self.expression(&mut property.key);
                    }
                    if let Some(value) = &mut property.value {
                        self.expression(value);
                    }
                }
            }
            ExpressionKind::TemplateLiteral(data) => {
                for child in &mut data.expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.expression(tag);
                self.expression(quasi);
            }
            ExpressionKind::Yield {
                argument: Some(argument),
                ..
            } => self.expression(argument),
            ExpressionKind::Await(operand) => self.expression(operand),
            _ => {}
        }
    }
}

// =============================================================================
// Declaration insertion
// =============================================================================

struct Inserter {
    declarations: FxHashMap<Option<FunctionId>, Vec<String>>,
}

impl Inserter {
    fn function(&mut self, data: &mut FunctionData) {
        if let Some(names) = self.declarations.remove(&Some(data.id)) {
            if let FunctionBody::Block(statements) = &mut data.body {
                for name in names.into_iter().rev() {
                    statements.insert(0, pair_declaration(&name));
                }
            }
        }
        for parameter in &mut data.parameters {
            if let Some(default_value) = &mut parameter.default_value {
                self.expression(default_value);
            }
        }
        if let FunctionBody::Block(statements) = &mut data.body {
            for statement in statements {
                self.statement(statement);
            }
        }
    }

    fn statement(&mut self, statement: &mut Statement) {
        match &mut statement.inner {
            StatementKind::Expression(expression) => self.expression(expression),
            StatementKind::Block(children) => {
                for child in children {
                    self.statement(child);
                }
            }
            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.statement(consequent);
                if let Some(alternate) = alternate {
                    self.statement(alternate);
                }
            }
            StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
                self.expression(test);
                self.statement(body);
            }
            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::Declaration(declaration)) => self.statement(declaration),
                    Some(ForInit::Expression(expression)) => self.expression(expression),
                    None => {}
                }
                if let Some(test) = test {
                    self.expression(test);
                }
                if let Some(update) = update {
                    self.expression(update);
                }
                self.statement(body);
            }
            StatementKind::ForInOf {
                head, rhs, body, ..
            } => {
                if let ForHead::Expression(expression) = head {
                    self.expression(expression);
                }
                self.expression(rhs);
                self.statement(body);
            }
            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                self.expression(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.expression(test);
                    }
                    for child in &mut case.body {
                        self.statement(child);
                    }
                }
            }
            StatementKind::With { object, body } => {
                self.expression(object);
                self.statement(body);
            }
            StatementKind::Labelled { body, .. } => self.statement(body),
            StatementKind::Return(Some(argument)) => self.expression(argument),
            StatementKind::Throw(argument) => self.expression(argument),
            StatementKind::Try(data) => {
                self.statement(&mut data.block);
                if let Some(handler) = &mut data.handler {
                    self.statement(&mut handler.body);
                }
                if let Some(finalizer) = &mut data.finalizer {
                    self.statement(finalizer);
                }
            }
            StatementKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    if let Some(init) = &mut declarator.init {
                        self.expression(init);
                    }
                }
            }
            StatementKind::FunctionDeclaration(data) => self.function(data),
            StatementKind::ClassDeclaration(data) => self.class(data),
            StatementKind::Export(data) => {
                if let Some(declaration) = &mut data.declaration {
                    self.statement(declaration);
                }
            }
            _ => {}
        }
    }

    fn class(&mut self, data: &mut ClassData) {
        if let Some(super_class) = &mut data.super_class {
            self.expression(super_class);
        }
        for element in &mut data.elements {
            match element {
                ClassElement::Method(method) => self.function(&mut method.function),
                ClassElement::Field {
                    initializer: Some(initializer),
                    ..
                } => self.expression(initializer),
                ClassElement::StaticBlock(statements) => {
                    for statement in statements {
                        self.statement(statement);
                    }
                }
                _ => {}
            }
        }
    }

    fn expression(&mut self, expression: &mut Expression) {
        match &mut expression.inner {
            ExpressionKind::Function(data) => self.function(data),
            ExpressionKind::Class(data) => self.class(data),
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Logical { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => {
                self.expression(lhs);
                self.expression(rhs);
            }
            ExpressionKind::Unary { operand, .. } => self.expression(operand),
            ExpressionKind::Update { argument, .. } => self.expression(argument),
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.expression(consequent);
                self.expression(alternate);
            }
            ExpressionKind::Sequence(expressions) => {
                for child in expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::Member {
                object, property, ..
            } => {
                self.expression(object);
                self.expression(property);
            }
            ExpressionKind::Call(data) | ExpressionKind::New(data) => {
                self.expression(&mut data.callee);
                for argument in &mut data.arguments {
                    self.expression(&mut argument.value);
                }
            }
            ExpressionKind::Spread(argument) => self.expression(argument),
            ExpressionKind::Array(elements) => {
                for element in elements.iter_mut().flatten() {
                    self.expression(element);
                }
            }
            ExpressionKind::Object(properties) => {
                for property in properties {
                    if let Some(value) = &mut property.value {
                        self.expression(value);
                    }
                }
            }
            ExpressionKind::TemplateLiteral(data) => {
                for child in &mut data.expressions {
                    self.expression(child);
                }
            }
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.expression(tag);
                self.expression(quasi);
            }
            ExpressionKind::Yield {
                argument: Some(argument),
                ..
            } => self.expression(argument),
            ExpressionKind::Await(operand) => self.expression(operand),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::printer;

    fn captured(source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser::new(&chars);
        let mut program = parser.parse_program();
        assert!(!parser.has_errors());
        rewrite_captures(&mut program);
        printer::print(&program)
    }

    #[test]
    fn declares_at_module_top_and_rewrites_uses() {
        let out = captured("$$sum = 1 + 2;\nlog($$sum);");
        assert!(
            out.starts_with("const $$sum = [\"\", void 0];"),
            "got: {out}"
        );
        assert!(out.contains("$$sum[0] = \"1 + 2 =\""), "got: {out}");
        assert!(out.contains("$$sum[1] = 1 + 2"), "got: {out}");
        assert!(out.contains("log($$sum[1]);"), "got: {out}");
    }

    #[test]
    fn compound_assignment_reverses_operator() {
        let out = captured("$$acc += f(x);");
        assert!(out.contains("$$acc[0] = \"f(x) =+\""), "got: {out}");
        assert!(out.contains("$$acc[1] += f(x)"), "got: {out}");
    }

    #[test]
    fn spread_use_stays_bare() {
        let out = captured("$$v = 1;\nconsole.log(...$$v);");
        assert!(out.contains("console.log(...$$v);"), "got: {out}");
    }

    #[test]
    fn declaring_occurrence_excludes_the_name() {
        let out = captured("function f($$x) { return $$x; }");
        assert!(!out.contains("[1]"), "got: {out}");
        assert!(!out.contains("const $$x"), "got: {out}");
    }

    #[test]
    fn declaration_lands_at_deepest_common_function() {
        let out = captured(
            "function outer() { function a() { $$t = 1; } function b() { log($$t); } a(); b(); }",
        );
        let declaration_at = out.find("const $$t").expect("declared somewhere");
        let outer_at = out.find("function outer").unwrap();
        let a_at = out.find("function a").unwrap();
        assert!(
            declaration_at > outer_at && declaration_at < a_at,
            "expected declaration at top of outer, got: {out}"
        );
    }
}
