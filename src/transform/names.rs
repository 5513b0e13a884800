/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Name pool and support-name registry.
//!
//! The pool scans the whole tree up front for every identifier-like string
//! (bindings, references, labels, property names — anything a synthesized
//! name could possibly collide with) and then vends fresh names of the form
//! `<prefix>_<n>`. A single monotonically increasing counter feeds every
//! fresh name, and active-frame bit indices reuse the `n` from their
//! `active_<n>` flag name, so neither names nor bits can ever collide.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::*;

pub struct NamePool {
    used: FxHashSet<String>,
    counter: u32,
}

impl NamePool {
    pub fn scan(program: &Program) -> Self {
        let mut used = FxHashSet::default();
        for statement in &program.body {
            collect_statement(statement, &mut used);
        }
        Self { used, counter: 0 }
    }

    /// A fresh identifier `<prefix>_<n>` guaranteed not to occur in the
    /// scanned source.
    pub fn fresh(&mut self, prefix: &str) -> String {
        self.fresh_numbered(prefix).0
    }

    /// Like [`NamePool::fresh`], also returning the counter value baked
    /// into the name (used as the active-frame bit index).
    pub fn fresh_numbered(&mut self, prefix: &str) -> (String, u32) {
        loop {
            let n = self.counter;
            self.counter += 1;
            let candidate = format!("{prefix}_{n}");
            if self.used.insert(candidate.clone()) {
                return (candidate, n);
            }
        }
    }
}

// =============================================================================
// Support-name slots
// =============================================================================

/// Single-assignment slots for the synthesized module-level helpers. Each
/// slot materializes a pool name the first time a consumer asks for it;
/// the preamble emitter later checks which slots were touched.
#[derive(Default)]
pub struct SupportNames {
    seeking: Option<String>,
    active_mask: Option<String>,
    iterator_values: Option<String>,
    iterator_keys: Option<String>,
    or_helper: Option<String>,
    and_helper: Option<String>,
}

macro_rules! support_slot {
    ($get:ident, $peek:ident, $field:ident, $prefix:literal) => {
        pub fn $get(&mut self, pool: &mut NamePool) -> String {
            if self.$field.is_none() {
                self.$field = Some(pool.fresh($prefix));
            }
            self.$field.clone().unwrap()
        }

        pub fn $peek(&self) -> Option<&str> {
            self.$field.as_deref()
        }
    };
}

impl SupportNames {
    support_slot!(seeking, seeking_name, seeking, "seeking");
    support_slot!(active_mask, active_mask_name, active_mask, "activeFrames");
    support_slot!(
        iterator_values,
        iterator_values_name,
        iterator_values,
        "maybeNotEmptyIterator"
    );
    support_slot!(
        iterator_keys,
        iterator_keys_name,
        iterator_keys,
        "maybeNotEmptyKeyIterator"
    );
    support_slot!(or_helper, or_helper_name, or_helper, "or");
    support_slot!(and_helper, and_helper_name, and_helper, "and");
}

// =============================================================================
// Active-frame registry
// =============================================================================

#[derive(Clone, Debug)]
pub struct ActiveFrame {
    /// Local flag name, `active_<bit>`.
    pub flag: String,
    /// Bit index in the module's activation mask.
    pub bit: u32,
}

/// Maps each function on a goal path to its activation flag and mask bit.
#[derive(Default)]
pub struct ActiveFrameRegistry {
    frames: FxHashMap<FunctionId, ActiveFrame>,
}

impl ActiveFrameRegistry {
    pub fn ensure(&mut self, id: FunctionId, pool: &mut NamePool) -> ActiveFrame {
        self.frames
            .entry(id)
            .or_insert_with(|| {
                let (flag, bit) = pool.fresh_numbered("active");
                ActiveFrame { flag, bit }
            })
            .clone()
    }

    pub fn get(&self, id: FunctionId) -> Option<&ActiveFrame> {
        self.frames.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// =============================================================================
// Identifier scan
// =============================================================================

fn collect_name(name: &str, used: &mut FxHashSet<String>) {
    if !name.is_empty() {
        used.insert(name.to_string());
    }
}

fn collect_statement(statement: &Statement, used: &mut FxHashSet<String>) {
    match &statement.inner {
        StatementKind::Empty
        | StatementKind::Debugger
        | StatementKind::Error => {}
        StatementKind::Expression(expression) => collect_expression(expression, used),
        StatementKind::Block(children) => {
            for child in children {
                collect_statement(child, used);
            }
        }
        StatementKind::If {
            test,
            consequent,
            alternate,
        } => {
            collect_expression(test, used);
            collect_statement(consequent, used);
            if let Some(alternate) = alternate {
                collect_statement(alternate, used);
            }
        }
        StatementKind::While { test, body } | StatementKind::DoWhile { test, body } => {
            collect_expression(test, used);
            collect_statement(body, used);
        }
        StatementKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => collect_statement(declaration, used),
                Some(ForInit::Expression(expression)) => collect_expression(expression, used),
                None => {}
            }
            if let Some(test) = test {
                collect_expression(test, used);
            }
            if let Some(update) = update {
                collect_expression(update, used);
            }
            collect_statement(body, used);
        }
        StatementKind::ForInOf {
            head, rhs, body, ..
        } => {
            match head {
                ForHead::Declaration { target, .. } => collect_pattern(target, used),
                ForHead::Expression(expression) => collect_expression(expression, used),
            }
            collect_expression(rhs, used);
            collect_statement(body, used);
        }
        StatementKind::Switch {
            discriminant,
            cases,
        } => {
            collect_expression(discriminant, used);
            for case in cases {
                if let Some(test) = &case.test {
                    collect_expression(test, used);
                }
                for child in &case.body {
                    collect_statement(child, used);
                }
            }
        }
        StatementKind::With { object, body } => {
            collect_expression(object, used);
            collect_statement(body, used);
        }
        StatementKind::Labelled { label, body } => {
            collect_name(label, used);
            collect_statement(body, used);
        }
        StatementKind::Break { label } | StatementKind::Continue { label } => {
            if let Some(label) = label {
                collect_name(label, used);
            }
        }
        StatementKind::Return(argument) => {
            if let Some(argument) = argument {
                collect_expression(argument, used);
            }
        }
        StatementKind::Throw(argument) => collect_expression(argument, used),
        StatementKind::Try(data) => {
            collect_statement(&data.block, used);
            if let Some(handler) = &data.handler {
                if let Some(parameter) = &handler.parameter {
                    collect_pattern(parameter, used);
                }
                collect_statement(&handler.body, used);
            }
            if let Some(finalizer) = &data.finalizer {
                collect_statement(finalizer, used);
            }
        }
        StatementKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                collect_pattern(&declarator.target, used);
                if let Some(init) = &declarator.init {
                    collect_expression(init, used);
                }
            }
        }
        StatementKind::FunctionDeclaration(data) => collect_function(data, used),
        StatementKind::ClassDeclaration(data) => collect_class(data, used),
        StatementKind::Import(data) => {
            if let Some(binding) = &data.default_binding {
                collect_name(binding, used);
            }
            if let Some(binding) = &data.namespace_binding {
                collect_name(binding, used);
            }
            for specifier in &data.named {
                collect_name(&specifier.imported, used);
                collect_name(&specifier.local, used);
            }
        }
        StatementKind::Export(data) => {
            if let Some(declaration) = &data.declaration {
                collect_statement(declaration, used);
            }
            for specifier in &data.named {
                collect_name(&specifier.local, used);
                collect_name(&specifier.exported, used);
            }
        }
    }
}

fn collect_expression(expression: &Expression, used: &mut FxHashSet<String>) {
    match &expression.inner {
        ExpressionKind::Identifier(name) | ExpressionKind::PrivateIdentifier(name) => {
            collect_name(name, used)
        }
        ExpressionKind::NumericLiteral(_)
        | ExpressionKind::StringLiteral(_)
        | ExpressionKind::BooleanLiteral(_)
        | ExpressionKind::NullLiteral
        | ExpressionKind::BigIntLiteral(_)
        | ExpressionKind::RegExpLiteral { .. }
        | ExpressionKind::This
        | ExpressionKind::Super
        | ExpressionKind::MetaProperty(_)
        | ExpressionKind::Error => {}
        ExpressionKind::TemplateLiteral(data) => {
            for child in &data.expressions {
                collect_expression(child, used);
            }
        }
        ExpressionKind::TaggedTemplate { tag, quasi } => {
            collect_expression(tag, used);
            collect_expression(quasi, used);
        }
        ExpressionKind::Binary { lhs, rhs, .. } | ExpressionKind::Logical { lhs, rhs, .. } => {
            collect_expression(lhs, used);
            collect_expression(rhs, used);
        }
        ExpressionKind::Unary { operand, .. } => collect_expression(operand, used),
        ExpressionKind::Update { argument, .. } => collect_expression(argument, used),
        ExpressionKind::Assignment { lhs, rhs, .. } => {
            collect_expression(lhs, used);
            collect_expression(rhs, used);
        }
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            collect_expression(test, used);
            collect_expression(consequent, used);
            collect_expression(alternate, used);
        }
        ExpressionKind::Sequence(expressions) => {
            for child in expressions {
                collect_expression(child, used);
            }
        }
        ExpressionKind::Member {
            object, property, ..
        } => {
            collect_expression(object, used);
            collect_expression(property, used);
        }
        ExpressionKind::Call(data) | ExpressionKind::New(data) => {
            collect_expression(&data.callee, used);
            for argument in &data.arguments {
                collect_expression(&argument.value, used);
            }
        }
        ExpressionKind::Spread(argument) => collect_expression(argument, used),
        ExpressionKind::Function(data) => collect_function(data, used),
        ExpressionKind::Class(data) => collect_class(data, used),
        ExpressionKind::Array(elements) => {
            for element in elements.iter().flatten() {
                collect_expression(element, used);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                collect_expression(&property.key, used);
                if let Some(value) = &property.value {
                    collect_expression(value, used);
                }
            }
        }
        ExpressionKind::Yield { argument, .. } => {
            if let Some(argument) = argument {
                collect_expression(argument, used);
            }
        }
        ExpressionKind::Await(operand) => collect_expression(operand, used),
    }
}

fn collect_function(data: &FunctionData, used: &mut FxHashSet<String>) {
    if let Some(name) = &data.name {
        collect_name(name, used);
    }
    for parameter in &data.parameters {
        collect_pattern(&parameter.pattern, used);
        if let Some(default_value) = &parameter.default_value {
            collect_expression(default_value, used);
        }
    }
    match &data.body {
        FunctionBody::Block(statements) => {
            for statement in statements {
                collect_statement(statement, used);
            }
        }
        FunctionBody::Expression(expression) => collect_expression(expression, used),
    }
}

fn collect_class(data: &ClassData, used: &mut FxHashSet<String>) {
    if let Some(name) = &data.name {
        collect_name(name, used);
    }
    if let Some(super_class) = &data.super_class {
        collect_expression(super_class, used);
    }
    for element in &data.elements {
        match element {
            ClassElement::Method(method) => {
                collect_expression(&method.key, used);
                collect_function(&method.function, used);
            }
            ClassElement::Field {
                key, initializer, ..
            } => {
                collect_expression(key, used);
                if let Some(initializer) = initializer {
                    collect_expression(initializer, used);
                }
            }
            ClassElement::StaticBlock(statements) => {
                for statement in statements {
                    collect_statement(statement, used);
                }
            }
        }
    }
}

fn collect_pattern(pattern: &Pattern, used: &mut FxHashSet<String>) {
    match pattern {
        Pattern::Identifier(name) => collect_name(name, used),
        Pattern::Object(properties) => {
            for property in properties {
                collect_expression(&property.key, used);
                if let Some(value) = &property.value {
                    collect_pattern(value, used);
                }
                if let Some(default_value) = &property.default_value {
                    collect_expression(default_value, used);
                }
            }
        }
        Pattern::Array(elements) => {
            for element in elements.iter().flatten() {
                collect_pattern(&element.pattern, used);
                if let Some(default_value) = &element.default_value {
                    collect_expression(default_value, used);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn pool_for(source: &str) -> NamePool {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser::new(&chars);
        let program = parser.parse_program();
        NamePool::scan(&program)
    }

    #[test]
    fn fresh_names_skip_source_identifiers() {
        let mut pool = pool_for("const seeking_0 = 1; let active_1 = 2;");
        assert_eq!(pool.fresh("seeking"), "seeking_1");
        // Counter keeps moving: active_1 is taken, active_2 is free.
        assert_eq!(pool.fresh("active"), "active_2");
    }

    #[test]
    fn bit_index_matches_flag_suffix() {
        let mut pool = pool_for("let x;");
        let (flag, bit) = pool.fresh_numbered("active");
        assert_eq!(flag, format!("active_{bit}"));
    }

    #[test]
    fn support_slots_are_single_assignment() {
        let mut pool = pool_for("let x;");
        let mut support = SupportNames::default();
        let first = support.seeking(&mut pool);
        let second = support.seeking(&mut pool);
        assert_eq!(first, second);
        assert_eq!(support.seeking_name(), Some(first.as_str()));
        assert_eq!(support.or_helper_name(), None);
    }
}
