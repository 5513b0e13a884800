/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Code generator: AST → JavaScript source text.
//!
//! Parenthesization is precedence-driven: every expression kind has a
//! precedence, and a child is wrapped in parens when its precedence falls
//! below what its position requires. A handful of grammar-level cases are
//! special-cased (`??` mixed with `&&`/`||`, unary bases of `**`, calls in
//! `new` callees, statement-leading `{` / `function` / `class`).
//!
//! Output style: two-space indentation, one statement per line, single
//! statements in control-flow arms printed as blocks (semantically neutral
//! and gives the transform's insertions a stable shape).

use crate::ast::*;

/// Print a whole program.
pub fn print(program: &Program) -> String {
    let mut printer = Printer::new();
    for statement in &program.body {
        printer.print_statement(statement);
    }
    printer.out
}

/// Print a single expression (used for diagnostics and capture-variable
/// text slots).
pub fn print_expression(expression: &Expression) -> String {
    let mut printer = Printer::new();
    printer.print_expr(expression, 0);
    printer.out
}

// Expression precedence levels, mirroring the grammar.
const PREC_SEQUENCE: u8 = 1;
const PREC_ASSIGNMENT: u8 = 2;
const PREC_NULLISH: u8 = 3;
const PREC_LOGICAL_OR: u8 = 4;
const PREC_LOGICAL_AND: u8 = 5;
const PREC_BITWISE_OR: u8 = 6;
const PREC_BITWISE_XOR: u8 = 7;
const PREC_BITWISE_AND: u8 = 8;
const PREC_EQUALITY: u8 = 9;
const PREC_RELATIONAL: u8 = 10;
const PREC_SHIFT: u8 = 11;
const PREC_ADDITIVE: u8 = 12;
const PREC_MULTIPLICATIVE: u8 = 13;
const PREC_EXPONENTIATION: u8 = 14;
const PREC_UNARY: u8 = 15;
const PREC_UPDATE: u8 = 16;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Addition => "+",
        BinaryOp::Subtraction => "-",
        BinaryOp::Multiplication => "*",
        BinaryOp::Division => "/",
        BinaryOp::Modulo => "%",
        BinaryOp::Exponentiation => "**",
        BinaryOp::StrictlyEquals => "===",
        BinaryOp::StrictlyInequals => "!==",
        BinaryOp::LooselyEquals => "==",
        BinaryOp::LooselyInequals => "!=",
        BinaryOp::GreaterThan => ">",
        BinaryOp::GreaterThanEquals => ">=",
        BinaryOp::LessThan => "<",
        BinaryOp::LessThanEquals => "<=",
        BinaryOp::BitwiseAnd => "&",
        BinaryOp::BitwiseOr => "|",
        BinaryOp::BitwiseXor => "^",
        BinaryOp::LeftShift => "<<",
        BinaryOp::RightShift => ">>",
        BinaryOp::UnsignedRightShift => ">>>",
        BinaryOp::In => "in",
        BinaryOp::InstanceOf => "instanceof",
    }
}

fn binary_op_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::BitwiseOr => PREC_BITWISE_OR,
        BinaryOp::BitwiseXor => PREC_BITWISE_XOR,
        BinaryOp::BitwiseAnd => PREC_BITWISE_AND,
        BinaryOp::StrictlyEquals
        | BinaryOp::StrictlyInequals
        | BinaryOp::LooselyEquals
        | BinaryOp::LooselyInequals => PREC_EQUALITY,
        BinaryOp::GreaterThan
        | BinaryOp::GreaterThanEquals
        | BinaryOp::LessThan
        | BinaryOp::LessThanEquals
        | BinaryOp::In
        | BinaryOp::InstanceOf => PREC_RELATIONAL,
        BinaryOp::LeftShift | BinaryOp::RightShift | BinaryOp::UnsignedRightShift => PREC_SHIFT,
        BinaryOp::Addition | BinaryOp::Subtraction => PREC_ADDITIVE,
        BinaryOp::Multiplication | BinaryOp::Division | BinaryOp::Modulo => PREC_MULTIPLICATIVE,
        BinaryOp::Exponentiation => PREC_EXPONENTIATION,
    }
}

fn logical_op_precedence(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::NullishCoalescing => PREC_NULLISH,
        LogicalOp::Or => PREC_LOGICAL_OR,
        LogicalOp::And => PREC_LOGICAL_AND,
    }
}

fn precedence(expression: &Expression) -> u8 {
    match &expression.inner {
        ExpressionKind::Sequence(_) => PREC_SEQUENCE,
        ExpressionKind::Assignment { .. }
        | ExpressionKind::Conditional { .. }
        | ExpressionKind::Yield { .. } => PREC_ASSIGNMENT,
        ExpressionKind::Function(data) if data.is_arrow => PREC_ASSIGNMENT,
        ExpressionKind::Logical { op, .. } => logical_op_precedence(*op),
        ExpressionKind::Binary { op, .. } => binary_op_precedence(*op),
        ExpressionKind::Unary { .. } | ExpressionKind::Await(_) => PREC_UNARY,
        ExpressionKind::Update { .. } => PREC_UPDATE,
        ExpressionKind::Call(_) => PREC_CALL,
        ExpressionKind::Member { .. }
        | ExpressionKind::New(_)
        | ExpressionKind::TaggedTemplate { .. } => PREC_CALL,
        _ => PREC_PRIMARY,
    }
}

/// Would this expression, printed at statement start, begin with `{`,
/// `function`, or `class` and be misparsed?
fn needs_statement_parens(expression: &Expression) -> bool {
    match &expression.inner {
        ExpressionKind::Object(_) | ExpressionKind::Class(_) => true,
        ExpressionKind::Function(data) => !data.is_arrow,
        ExpressionKind::Assignment { lhs, .. } => needs_statement_parens(lhs),
        ExpressionKind::Binary { lhs, .. } | ExpressionKind::Logical { lhs, .. } => {
            needs_statement_parens(lhs)
        }
        ExpressionKind::Conditional { test, .. } => needs_statement_parens(test),
        ExpressionKind::Sequence(expressions) => expressions
            .first()
            .is_some_and(needs_statement_parens),
        ExpressionKind::Member { object, .. } => needs_statement_parens(object),
        ExpressionKind::Call(data) => needs_statement_parens(&data.callee),
        ExpressionKind::TaggedTemplate { tag, .. } => needs_statement_parens(tag),
        ExpressionKind::Update {
            argument,
            prefixed: false,
            ..
        } => needs_statement_parens(argument),
        _ => false,
    }
}

/// A `new` callee must not contain a call (`new f()()` parses differently).
fn new_callee_contains_call(expression: &Expression) -> bool {
    match &expression.inner {
        ExpressionKind::Call(_) => true,
        ExpressionKind::Member { object, .. } => new_callee_contains_call(object),
        ExpressionKind::TaggedTemplate { tag, .. } => new_callee_contains_call(tag),
        _ => false,
    }
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn print_statement(&mut self, statement: &Statement) {
        match &statement.inner {
            StatementKind::Empty => {
                self.pad();
                self.push(";\n");
            }
            StatementKind::Debugger => {
                self.pad();
                self.push("debugger;\n");
            }
            StatementKind::Expression(expression) => {
                self.pad();
                if needs_statement_parens(expression) {
                    self.push("(");
                    self.print_expr(expression, 0);
                    self.push(")");
                } else {
                    self.print_expr(expression, PREC_SEQUENCE);
                }
                self.push(";\n");
            }
            StatementKind::Block(children) => {
                self.pad();
                self.push("{\n");
                self.indent += 1;
                for child in children {
                    self.print_statement(child);
                }
                self.indent -= 1;
                self.pad();
                self.push("}\n");
            }
            StatementKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.pad();
                self.print_if_parts(test, consequent, alternate.as_deref());
            }
            StatementKind::While { test, body } => {
                self.pad();
                self.push("while (");
                self.print_expr(test, 0);
                self.push(") ");
                self.print_block_like(body);
                self.push("\n");
            }
            StatementKind::DoWhile { test, body } => {
                self.pad();
                self.push("do ");
                self.print_block_like(body);
                self.push(" while (");
                self.print_expr(test, 0);
                self.push(");\n");
            }
            StatementKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.pad();
                self.push("for (");
                match init {
                    Some(ForInit::Declaration(declaration)) => {
                        self.print_declaration_inline(declaration);
                    }
                    Some(ForInit::Expression(expression)) => {
                        self.print_expr(expression, 0);
                    }
                    None => {}
                }
                self.push(";");
                if let Some(test) = test {
                    self.push(" ");
                    self.print_expr(test, 0);
                }
                self.push(";");
                if let Some(update) = update {
                    self.push(" ");
                    self.print_expr(update, 0);
                }
                self.push(") ");
                self.print_block_like(body);
                self.push("\n");
            }
            StatementKind::ForInOf {
                kind,
                head,
                rhs,
                body,
            } => {
                self.pad();
                self.push(match kind {
                    ForInOfKind::AwaitOf => "for await (",
                    _ => "for (",
                });
                match head {
                    ForHead::Declaration { kind, target } => {
                        self.push(kind.as_str());
                        self.push(" ");
                        self.print_pattern(target);
                    }
                    ForHead::Expression(expression) => {
                        self.print_expr(expression, PREC_UNARY);
                    }
                }
                self.push(match kind {
                    ForInOfKind::In => " in ",
                    ForInOfKind::Of | ForInOfKind::AwaitOf => " of ",
                });
                self.print_expr(rhs, PREC_ASSIGNMENT);
                self.push(") ");
                self.print_block_like(body);
                self.push("\n");
            }
            StatementKind::Switch {
                discriminant,
                cases,
            } => {
                self.pad();
                self.push("switch (");
                self.print_expr(discriminant, 0);
                self.push(") {\n");
                self.indent += 1;
                for case in cases {
                    self.pad();
                    match &case.test {
                        Some(test) => {
                            self.push("case ");
                            self.print_expr(test, 0);
                            self.push(":\n");
                        }
                        None => self.push("default:\n"),
                    }
                    self.indent += 1;
                    for child in &case.body {
                        self.print_statement(child);
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.pad();
                self.push("}\n");
            }
            StatementKind::With { object, body } => {
                self.pad();
                self.push("with (");
                self.print_expr(object, 0);
                self.push(") ");
                self.print_block_like(body);
                self.push("\n");
            }
            // The label stays attached to the statement itself — wrapping
            // the body in a block would detach `continue label` targets.
            StatementKind::Labelled { label, body } => {
                self.pad();
                self.push(label);
                self.push(":\n");
                self.print_statement(body);
            }
            StatementKind::Break { label } => {
                self.pad();
                match label {
                    Some(label) => {
                        self.push("break ");
                        self.push(label);
                        self.push(";\n");
                    }
                    None => self.push("break;\n"),
                }
            }
            StatementKind::Continue { label } => {
                self.pad();
                match label {
                    Some(label) => {
                        self.push("continue ");
                        self.push(label);
                        self.push(";\n");
                    }
                    None => self.push("continue;\n"),
                }
            }
            StatementKind::Return(argument) => {
                self.pad();
                match argument {
                    Some(argument) => {
                        self.push("return ");
                        self.print_expr(argument, PREC_SEQUENCE);
                        self.push(";\n");
                    }
                    None => self.push("return;\n"),
                }
            }
            StatementKind::Throw(argument) => {
                self.pad();
                self.push("throw ");
                self.print_expr(argument, PREC_SEQUENCE);
                self.push(";\n");
            }
            StatementKind::Try(data) => {
                self.pad();
                self.push("try ");
                self.print_block_like(&data.block);
                if let Some(handler) = &data.handler {
                    self.push(" catch ");
                    if let Some(parameter) = &handler.parameter {
                        self.push("(");
                        self.print_pattern(parameter);
                        self.push(") ");
                    }
                    self.print_block_like(&handler.body);
                }
                if let Some(finalizer) = &data.finalizer {
                    self.push(" finally ");
                    self.print_block_like(finalizer);
                }
                self.push("\n");
            }
            StatementKind::VariableDeclaration { .. } => {
                self.pad();
                self.print_declaration_inline(statement);
                self.push(";\n");
            }
            StatementKind::FunctionDeclaration(data) => {
                self.pad();
                self.print_function(data);
                self.push("\n");
            }
            StatementKind::ClassDeclaration(data) => {
                self.pad();
                self.print_class(data);
                self.push("\n");
            }
            StatementKind::Import(data) => self.print_import(data),
            StatementKind::Export(data) => self.print_export(data),
            StatementKind::Error => {
                self.pad();
                self.push("/* error */;\n");
            }
        }
    }

    fn print_if_parts(
        &mut self,
        test: &Expression,
        consequent: &Statement,
        alternate: Option<&Statement>,
    ) {
        self.push("if (");
        self.print_expr(test, 0);
        self.push(") ");
        self.print_block_like(consequent);
        match alternate {
            None => self.push("\n"),
            Some(alternate) => {
                self.push(" else ");
                if let StatementKind::If {
                    test,
                    consequent,
                    alternate,
                } = &alternate.inner
                {
                    self.print_if_parts(test, consequent, alternate.as_deref());
                } else {
                    self.print_block_like(alternate);
                    self.push("\n");
                }
            }
        }
    }

    /// Print a statement as a braced block (wrapping a lone statement in
    /// braces is semantically neutral in every position this is used).
    fn print_block_like(&mut self, statement: &Statement) {
        self.push("{\n");
        self.indent += 1;
        match &statement.inner {
            StatementKind::Block(children) => {
                for child in children {
                    self.print_statement(child);
                }
            }
            _ => self.print_statement(statement),
        }
        self.indent -= 1;
        self.pad();
        self.push("}");
    }

    /// Variable declaration without padding or trailing semicolon (shared
    /// by statement position and for-loop heads).
    fn print_declaration_inline(&mut self, statement: &Statement) {
        let StatementKind::VariableDeclaration { kind, declarations } = &statement.inner else {
            return;
        };
        self.push(kind.as_str());
        self.push(" ");
        for (index, declarator) in declarations.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.print_pattern(&declarator.target);
            if let Some(init) = &declarator.init {
                self.push(" = ");
                self.print_expr(init, PREC_ASSIGNMENT);
            }
        }
    }

    fn print_import(&mut self, data: &ImportData) {
        self.pad();
        self.push("import ");
        let mut wrote_binding = false;
        if let Some(default_binding) = &data.default_binding {
            self.push(default_binding);
            wrote_binding = true;
        }
        if let Some(namespace_binding) = &data.namespace_binding {
            if wrote_binding {
                self.push(", ");
            }
            self.push("* as ");
            self.push(namespace_binding);
            wrote_binding = true;
        }
        if !data.named.is_empty() {
            if wrote_binding {
                self.push(", ");
            }
            self.push("{ ");
            for (index, specifier) in data.named.iter().enumerate() {
                if index > 0 {
                    self.push(", ");
                }
                self.push(&specifier.imported);
                if specifier.local != specifier.imported {
                    self.push(" as ");
                    self.push(&specifier.local);
                }
            }
            self.push(" }");
            wrote_binding = true;
        }
        if wrote_binding {
            self.push(" from ");
        }
        self.print_string_literal(&data.source);
        self.push(";\n");
    }

    fn print_export(&mut self, data: &ExportData) {
        if let Some(declaration) = &data.declaration {
            self.pad();
            self.push("export ");
            if data.is_default {
                self.push("default ");
            }
            // The declaration prints its own padding; splice it in without.
            let mut nested = Printer {
                out: String::new(),
                indent: self.indent,
            };
            nested.print_statement(declaration);
            let text = nested.out;
            let trimmed = text.trim_start();
            self.push(trimmed);
            return;
        }

        self.pad();
        self.push("export ");
        if data.named.len() == 1 && data.named[0].local == "*" {
            self.push("*");
            if data.named[0].exported != "*" {
                self.push(" as ");
                self.push(&data.named[0].exported);
            }
        } else {
            self.push("{ ");
            for (index, specifier) in data.named.iter().enumerate() {
                if index > 0 {
                    self.push(", ");
                }
                self.push(&specifier.local);
                if specifier.exported != specifier.local {
                    self.push(" as ");
                    self.push(&specifier.exported);
                }
            }
            self.push(" }");
        }
        if let Some(source) = &data.source {
            self.push(" from ");
            self.print_string_literal(source);
        }
        self.push(";\n");
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn print_function(&mut self, data: &FunctionData) {
        if data.is_arrow {
            self.print_arrow_function(data);
            return;
        }
        if data.kind.is_async() {
            self.push("async ");
        }
        self.push("function");
        if data.kind.is_generator() {
            self.push("*");
        }
        if let Some(name) = &data.name {
            self.push(" ");
            self.push(name);
        }
        self.print_parameters(&data.parameters);
        self.push(" ");
        self.print_function_body(&data.body);
    }

    fn print_arrow_function(&mut self, data: &FunctionData) {
        if data.kind.is_async() {
            self.push("async ");
        }
        self.print_parameters(&data.parameters);
        self.push(" => ");
        match &data.body {
            FunctionBody::Block(_) => self.print_function_body(&data.body),
            FunctionBody::Expression(expression) => {
                // An object literal body would read as a block.
                if matches!(expression.inner, ExpressionKind::Object(_)) {
                    self.push("(");
                    self.print_expr(expression, 0);
                    self.push(")");
                } else {
                    self.print_expr(expression, PREC_ASSIGNMENT);
                }
            }
        }
    }

    fn print_parameters(&mut self, parameters: &[FunctionParameter]) {
        self.push("(");
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            if parameter.is_rest {
                self.push("...");
            }
            self.print_pattern(&parameter.pattern);
            if let Some(default_value) = &parameter.default_value {
                self.push(" = ");
                self.print_expr(default_value, PREC_ASSIGNMENT);
            }
        }
        self.push(")");
    }

    fn print_function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(statements) => {
                self.push("{\n");
                self.indent += 1;
                for statement in statements {
                    self.print_statement(statement);
                }
                self.indent -= 1;
                self.pad();
                self.push("}");
            }
            FunctionBody::Expression(expression) => {
                self.print_expr(expression, PREC_ASSIGNMENT);
            }
        }
    }

    fn print_class(&mut self, data: &ClassData) {
        self.push("class");
        if let Some(name) = &data.name {
            self.push(" ");
            self.push(name);
        }
        if let Some(super_class) = &data.super_class {
            self.push(" extends ");
            self.print_expr(super_class, PREC_CALL);
        }
        self.push(" {\n");
        self.indent += 1;
        for element in &data.elements {
            self.print_class_element(element);
        }
        self.indent -= 1;
        self.pad();
        self.push("}");
    }

    fn print_class_element(&mut self, element: &ClassElement) {
        match element {
            ClassElement::Method(method) => {
                self.pad();
                if method.is_static {
                    self.push("static ");
                }
                match method.kind {
                    MethodKind::Getter => self.push("get "),
                    MethodKind::Setter => self.push("set "),
                    _ => {}
                }
                if method.function.kind.is_async() {
                    self.push("async ");
                }
                if method.function.kind.is_generator() {
                    self.push("*");
                }
                self.print_property_key(&method.key, method.computed);
                self.print_parameters(&method.function.parameters);
                self.push(" ");
                self.print_function_body(&method.function.body);
                self.push("\n");
            }
            ClassElement::Field {
                key,
                computed,
                is_static,
                initializer,
            } => {
                self.pad();
                if *is_static {
                    self.push("static ");
                }
                self.print_property_key(key, *computed);
                if let Some(initializer) = initializer {
                    self.push(" = ");
                    self.print_expr(initializer, PREC_ASSIGNMENT);
                }
                self.push(";\n");
            }
            ClassElement::StaticBlock(statements) => {
                self.pad();
                self.push("static {\n");
                self.indent += 1;
                for statement in statements {
                    self.print_statement(statement);
                }
                self.indent -= 1;
                self.pad();
                self.push("}\n");
            }
        }
    }

    fn print_property_key(&mut self, key: &Expression, computed: bool) {
        if computed {
            self.push("[");
            self.print_expr(key, PREC_ASSIGNMENT);
            self.push("]");
        } else {
            match &key.inner {
                ExpressionKind::PrivateIdentifier(name) => {
                    self.push("#");
                    self.push(name);
                }
                _ => self.print_expr(key, 0),
            }
        }
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    fn print_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(name) => self.push(name),
            Pattern::Object(properties) => {
                self.push("{ ");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    if property.is_rest {
                        self.push("...");
                        self.print_expr(&property.key, 0);
                        continue;
                    }
                    self.print_property_key(&property.key, property.computed);
                    if let Some(value) = &property.value {
                        self.push(": ");
                        self.print_pattern(value);
                    }
                    if let Some(default_value) = &property.default_value {
                        self.push(" = ");
                        self.print_expr(default_value, PREC_ASSIGNMENT);
                    }
                }
                self.push(" }");
            }
            Pattern::Array(elements) => {
                self.push("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    let Some(element) = element else { continue };
                    if element.is_rest {
                        self.push("...");
                    }
                    self.print_pattern(&element.pattern);
                    if let Some(default_value) = &element.default_value {
                        self.push(" = ");
                        self.print_expr(default_value, PREC_ASSIGNMENT);
                    }
                }
                self.push("]");
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn print_expr(&mut self, expression: &Expression, min_precedence: u8) {
        let needs_parens = precedence(expression) < min_precedence;
        if needs_parens {
            self.push("(");
        }
        self.print_expr_inner(expression);
        if needs_parens {
            self.push(")");
        }
    }

    fn print_expr_inner(&mut self, expression: &Expression) {
        match &expression.inner {
            ExpressionKind::NumericLiteral(value) => {
                let text = print_number(*value);
                self.push(&text);
            }
            ExpressionKind::StringLiteral(value) => self.print_string_literal(value),
            ExpressionKind::BooleanLiteral(value) => {
                self.push(if *value { "true" } else { "false" })
            }
            ExpressionKind::NullLiteral => self.push("null"),
            ExpressionKind::BigIntLiteral(digits) => {
                self.push(digits);
                self.push("n");
            }
            ExpressionKind::RegExpLiteral { pattern, flags } => {
                self.push("/");
                self.push(pattern);
                self.push("/");
                self.push(flags);
            }
            ExpressionKind::TemplateLiteral(data) => self.print_template(data),
            ExpressionKind::TaggedTemplate { tag, quasi } => {
                self.print_expr(tag, PREC_CALL);
                self.print_expr(quasi, 0);
            }
            ExpressionKind::Identifier(name) => self.push(name),
            ExpressionKind::PrivateIdentifier(name) => {
                self.push("#");
                self.push(name);
            }
            ExpressionKind::Binary { op, lhs, rhs } => {
                let prec = binary_op_precedence(*op);
                let (lhs_min, rhs_min) = if *op == BinaryOp::Exponentiation {
                    // The base of `**` must not be a bare unary expression.
                    (PREC_UPDATE, prec)
                } else {
                    (prec, prec + 1)
                };
                self.print_expr(lhs, lhs_min);
                self.push(" ");
                self.push(binary_op_str(*op));
                self.push(" ");
                self.print_expr(rhs, rhs_min);
            }
            ExpressionKind::Logical { op, lhs, rhs } => {
                let prec = logical_op_precedence(*op);
                let force = |child: &Expression| {
                    // `??` may not mix bare with `&&`/`||` in either
                    // direction.
                    matches!(
                        (&child.inner, op),
                        (
                            ExpressionKind::Logical {
                                op: LogicalOp::And | LogicalOp::Or,
                                ..
                            },
                            LogicalOp::NullishCoalescing
                        ) | (
                            ExpressionKind::Logical {
                                op: LogicalOp::NullishCoalescing,
                                ..
                            },
                            LogicalOp::And | LogicalOp::Or
                        )
                    )
                };
                let op_str = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                    LogicalOp::NullishCoalescing => "??",
                };
                if force(lhs) {
                    self.push("(");
                    self.print_expr(lhs, 0);
                    self.push(")");
                } else {
                    self.print_expr(lhs, prec);
                }
                self.push(" ");
                self.push(op_str);
                self.push(" ");
                if force(rhs) {
                    self.push("(");
                    self.print_expr(rhs, 0);
                    self.push(")");
                } else {
                    self.print_expr(rhs, prec + 1);
                }
            }
            ExpressionKind::Unary { op, operand } => {
                match op {
                    UnaryOp::BitwiseNot => self.push("~"),
                    UnaryOp::Not => self.push("!"),
                    UnaryOp::Plus => self.push("+"),
                    UnaryOp::Minus => self.push("-"),
                    UnaryOp::Typeof => self.push("typeof "),
                    UnaryOp::Void => self.push("void "),
                    UnaryOp::Delete => self.push("delete "),
                }
                self.print_expr(operand, PREC_UNARY);
            }
            ExpressionKind::Update {
                op,
                argument,
                prefixed,
            } => {
                let op_str = match op {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                if *prefixed {
                    self.push(op_str);
                    self.print_expr(argument, PREC_UNARY);
                } else {
                    self.print_expr(argument, PREC_UPDATE);
                    self.push(op_str);
                }
            }
            ExpressionKind::Assignment { op, lhs, rhs } => {
                self.print_expr(lhs, PREC_UNARY);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.print_expr(rhs, PREC_ASSIGNMENT);
            }
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.print_expr(test, PREC_NULLISH);
                self.push(" ? ");
                self.print_expr(consequent, PREC_ASSIGNMENT);
                self.push(" : ");
                self.print_expr(alternate, PREC_ASSIGNMENT);
            }
            ExpressionKind::Sequence(expressions) => {
                for (index, child) in expressions.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.print_expr(child, PREC_ASSIGNMENT);
                }
            }
            ExpressionKind::Member {
                object,
                property,
                computed,
                optional,
            } => {
                // `5.x` would read the dot as a decimal point.
                if matches!(object.inner, ExpressionKind::NumericLiteral(_)) && !computed {
                    self.push("(");
                    self.print_expr(object, 0);
                    self.push(")");
                } else {
                    self.print_expr(object, PREC_CALL);
                }
                if *computed {
                    self.push(if *optional { "?.[" } else { "[" });
                    self.print_expr(property, 0);
                    self.push("]");
                } else {
                    self.push(if *optional { "?." } else { "." });
                    match &property.inner {
                        ExpressionKind::PrivateIdentifier(name) => {
                            self.push("#");
                            self.push(name);
                        }
                        _ => self.print_expr(property, 0),
                    }
                }
            }
            ExpressionKind::Call(data) => {
                self.print_expr(&data.callee, PREC_CALL);
                if data.optional {
                    self.push("?.");
                }
                self.print_arguments(&data.arguments);
            }
            ExpressionKind::New(data) => {
                self.push("new ");
                if new_callee_contains_call(&data.callee) {
                    self.push("(");
                    self.print_expr(&data.callee, 0);
                    self.push(")");
                } else {
                    self.print_expr(&data.callee, PREC_CALL);
                }
                self.print_arguments(&data.arguments);
            }
            ExpressionKind::Spread(argument) => {
                self.push("...");
                self.print_expr(argument, PREC_ASSIGNMENT);
            }
            ExpressionKind::This => self.push("this"),
            ExpressionKind::Super => self.push("super"),
            ExpressionKind::MetaProperty(kind) => match kind {
                MetaPropertyKind::NewTarget => self.push("new.target"),
                MetaPropertyKind::ImportMeta => self.push("import.meta"),
            },
            ExpressionKind::Function(data) => self.print_function(data),
            ExpressionKind::Class(data) => self.print_class(data),
            ExpressionKind::Array(elements) => {
                self.push("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    if let Some(element) = element {
                        self.print_expr(element, PREC_ASSIGNMENT);
                    }
                }
                self.push("]");
            }
            ExpressionKind::Object(properties) => {
                if properties.is_empty() {
                    self.push("{}");
                    return;
                }
                self.push("{ ");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.print_object_property(property);
                }
                self.push(" }");
            }
            ExpressionKind::Yield { argument, delegate } => {
                self.push("yield");
                if *delegate {
                    self.push("*");
                }
                if let Some(argument) = argument {
                    self.push(" ");
                    self.print_expr(argument, PREC_ASSIGNMENT);
                }
            }
            ExpressionKind::Await(operand) => {
                self.push("await ");
                self.print_expr(operand, PREC_UNARY);
            }
            ExpressionKind::Error => self.push("/* error */"),
        }
    }

    fn print_object_property(&mut self, property: &ObjectProperty) {
        match property.kind {
            PropertyKind::Spread => {
                self.push("...");
                self.print_expr(&property.key, PREC_ASSIGNMENT);
            }
            PropertyKind::Init => {
                if property.shorthand {
                    self.print_expr(&property.key, 0);
                    return;
                }
                self.print_property_key(&property.key, property.computed);
                self.push(": ");
                if let Some(value) = &property.value {
                    self.print_expr(value, PREC_ASSIGNMENT);
                }
            }
            PropertyKind::Method | PropertyKind::Getter | PropertyKind::Setter => {
                let Some(value) = &property.value else { return };
                let ExpressionKind::Function(function) = &value.inner else {
                    return;
                };
                match property.kind {
                    PropertyKind::Getter => self.push("get "),
                    PropertyKind::Setter => self.push("set "),
                    _ => {
                        if function.kind.is_async() {
                            self.push("async ");
                        }
                        if function.kind.is_generator() {
                            self.push("*");
                        }
                    }
                }
                self.print_property_key(&property.key, property.computed);
                self.print_parameters(&function.parameters);
                self.push(" ");
                self.print_function_body(&function.body);
            }
        }
    }

    fn print_arguments(&mut self, arguments: &[Argument]) {
        self.push("(");
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            if argument.is_spread {
                self.push("...");
            }
            self.print_expr(&argument.value, PREC_ASSIGNMENT);
        }
        self.push(")");
    }

    fn print_template(&mut self, data: &TemplateLiteralData) {
        self.push("`");
        for (index, quasi) in data.quasis.iter().enumerate() {
            let mut escaped = String::new();
            let mut chars = quasi.chars().peekable();
            while let Some(c) = chars.next() {
                match c {
                    '`' => escaped.push_str("\\`"),
                    '\\' => escaped.push_str("\\\\"),
                    '$' if chars.peek() == Some(&'{') => escaped.push_str("\\$"),
                    _ => escaped.push(c),
                }
            }
            self.push(&escaped);
            if index < data.expressions.len() {
                self.push("${");
                self.print_expr(&data.expressions[index], 0);
                self.push("}");
            }
        }
        self.push("`");
    }

    fn print_string_literal(&mut self, value: &str) {
        self.push("\"");
        let mut escaped = String::new();
        for c in value.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                '\0' => escaped.push_str("\\0"),
                c if (c as u32) < 0x20 => {
                    escaped.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => escaped.push(c),
            }
        }
        self.push(&escaped);
        self.push("\"");
    }
}

fn print_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        };
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn roundtrip(source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser::new(&chars);
        let program = parser.parse_program();
        assert!(
            !parser.has_errors(),
            "parse errors: {:?}",
            parser.take_errors()
        );
        print(&program)
    }

    #[test]
    fn precedence_parens_survive() {
        let out = roundtrip("const x = (a + b) * c;");
        assert!(out.contains("(a + b) * c"), "got: {out}");
    }

    #[test]
    fn no_spurious_parens() {
        let out = roundtrip("const x = a + b * c;");
        assert!(out.contains("a + b * c"), "got: {out}");
    }

    #[test]
    fn object_literal_statement_gets_parens() {
        // The statement-level parens wrap the whole expression; the member
        // access stays inside them.
        let out = roundtrip("({ a: 1 }).a;");
        assert!(out.starts_with("({ a: 1 }.a);"), "got: {out}");
    }

    #[test]
    fn nullish_mixing_is_parenthesized() {
        let chars: Vec<char> = "const x = (a || b) ?? c;".chars().collect();
        let mut parser = Parser::new(&chars);
        let program = parser.parse_program();
        let out = print(&program);
        assert!(out.contains("(a || b) ?? c"), "got: {out}");
    }

    #[test]
    fn optional_chain_prints() {
        let out = roundtrip("a?.b?.(1)?.[c];");
        assert!(out.contains("a?.b?.(1)?.[c]"), "got: {out}");
    }

    #[test]
    fn single_statement_arms_become_blocks() {
        let out = roundtrip("if (a) b(); else c();");
        assert!(out.contains("if (a) {"), "got: {out}");
        assert!(out.contains("} else {"), "got: {out}");
    }

    #[test]
    fn class_elements_print() {
        let out = roundtrip(
            "class C extends B { constructor(x) { super(x); } get p() { return 1; } static m() {} #q() {} [k]() {} f = 2; }",
        );
        assert!(out.contains("class C extends B {"), "got: {out}");
        assert!(out.contains("constructor(x) {"), "got: {out}");
        assert!(out.contains("get p() {"), "got: {out}");
        assert!(out.contains("static m() {"), "got: {out}");
        assert!(out.contains("#q() {"), "got: {out}");
        assert!(out.contains("[k]() {"), "got: {out}");
        assert!(out.contains("f = 2;"), "got: {out}");
    }

    #[test]
    fn template_escapes() {
        let out = roundtrip("const s = `a${x}\\`b`;");
        assert!(out.contains("`a${x}\\`b`"), "got: {out}");
    }
}
