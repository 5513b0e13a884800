/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Declaration parsing: functions, classes, variables, binding patterns,
//! and module import/export.

use crate::ast::*;
use crate::parser::Parser;
use crate::token::TokenType;

impl<'a> Parser<'a> {
    // =========================================================================
    // Variable declarations and binding patterns
    // =========================================================================

    /// Parse `var`/`let`/`const` declarations. In a for-loop head the
    /// trailing semicolon is left for the caller and `in` stays forbidden
    /// inside initializers.
    pub(crate) fn parse_variable_declaration(&mut self, for_loop: bool) -> Statement {
        let start = self.position();
        let kind = match self.current_token_type() {
            TokenType::Var => DeclarationKind::Var,
            TokenType::Let => DeclarationKind::Let,
            TokenType::Const => DeclarationKind::Const,
            _ => {
                self.expected("'var', 'let', or 'const'");
                DeclarationKind::Var
            }
        };
        self.consume();

        let mut declarations = Vec::new();
        loop {
            let target = self.parse_binding_target();
            let init = if self.eat(TokenType::Equals) {
                let saved = self.forbid_in;
                self.forbid_in = for_loop;
                let init = self.parse_assignment_expression();
                self.forbid_in = saved;
                Some(init)
            } else {
                None
            };
            declarations.push(VariableDeclarator { target, init });
            if !self.eat(TokenType::Comma) {
                break;
            }
        }

        if !for_loop {
            self.consume_or_insert_semicolon();
        }
        self.statement(start, StatementKind::VariableDeclaration { kind, declarations })
    }

    /// A binding target: identifier, object pattern, or array pattern.
    pub(crate) fn parse_binding_target(&mut self) -> Pattern {
        match self.current_token_type() {
            TokenType::CurlyOpen => self.parse_object_pattern(),
            TokenType::BracketOpen => self.parse_array_pattern(),
            _ => Pattern::Identifier(self.consume_identifier()),
        }
    }

    fn parse_object_pattern(&mut self) -> Pattern {
        self.consume_token(TokenType::CurlyOpen);
        let mut properties = Vec::new();
        while !self.match_token(TokenType::CurlyClose) && !self.done() {
            if self.eat(TokenType::TripleDot) {
                let name = self.consume_identifier();
                properties.push(ObjectPatternProperty {
                    key: Box::new(Expression::identifier(name)),
                    computed: false,
                    shorthand: true,
                    value: None,
                    default_value: None,
                    is_rest: true,
                });
            } else {
                let (key, computed) = self.parse_property_key();
                let (shorthand, value) = if self.eat(TokenType::Colon) {
                    (false, Some(self.parse_binding_target()))
                } else {
                    if !matches!(key.inner, ExpressionKind::Identifier(_)) {
                        self.expected("':' after property key in pattern");
                    }
                    (true, None)
                };
                let default_value = if self.eat(TokenType::Equals) {
                    Some(self.with_in_allowed(|parser| parser.parse_assignment_expression()))
                } else {
                    None
                };
                properties.push(ObjectPatternProperty {
                    key,
                    computed,
                    shorthand,
                    value,
                    default_value,
                    is_rest: false,
                });
            }
            if !self.match_token(TokenType::CurlyClose) {
                self.consume_token(TokenType::Comma);
            }
        }
        self.consume_token(TokenType::CurlyClose);
        Pattern::Object(properties)
    }

    fn parse_array_pattern(&mut self) -> Pattern {
        self.consume_token(TokenType::BracketOpen);
        let mut elements = Vec::new();
        while !self.match_token(TokenType::BracketClose) && !self.done() {
            if self.eat(TokenType::Comma) {
                elements.push(None);
                continue;
            }
            let is_rest = self.eat(TokenType::TripleDot);
            let pattern = self.parse_binding_target();
            let default_value = if self.eat(TokenType::Equals) {
                Some(self.with_in_allowed(|parser| parser.parse_assignment_expression()))
            } else {
                None
            };
            elements.push(Some(ArrayPatternElement {
                pattern,
                default_value,
                is_rest,
            }));
            if !self.match_token(TokenType::BracketClose) {
                self.consume_token(TokenType::Comma);
            }
        }
        self.consume_token(TokenType::BracketClose);
        Pattern::Array(elements)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    pub(crate) fn parse_formal_parameters(&mut self) -> Vec<FunctionParameter> {
        self.consume_token(TokenType::ParenOpen);
        let mut parameters = Vec::new();
        while !self.match_token(TokenType::ParenClose) && !self.done() {
            let is_rest = self.eat(TokenType::TripleDot);
            let pattern = self.parse_binding_target();
            let default_value = if self.eat(TokenType::Equals) {
                Some(self.with_in_allowed(|parser| parser.parse_assignment_expression()))
            } else {
                None
            };
            parameters.push(FunctionParameter {
                pattern,
                default_value,
                is_rest,
            });
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.consume_token(TokenType::ParenClose);
        parameters
    }

    /// `{ statements }` of a function body.
    pub(crate) fn parse_function_body_statements(&mut self) -> Vec<Statement> {
        self.consume_token(TokenType::CurlyOpen);
        let mut statements = Vec::new();
        while !self.match_token(TokenType::CurlyClose) && !self.done() {
            statements.push(self.parse_statement());
        }
        self.consume_token(TokenType::CurlyClose);
        statements
    }

    pub(crate) fn parse_function_declaration(&mut self, is_async: bool) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Function);
        let is_generator = self.eat(TokenType::Asterisk);
        let name = self.consume_identifier();
        let parameters = self.parse_formal_parameters();
        let body = FunctionBody::Block(self.parse_function_body_statements());
        let id = self.fresh_function_id();
        self.statement(
            start,
            StatementKind::FunctionDeclaration(Box::new(FunctionData {
                id,
                name: Some(name),
                parameters,
                body,
                kind: FunctionKind::from_async_generator(is_async, is_generator),
                is_arrow: false,
            })),
        )
    }

    pub(crate) fn parse_function_expression(&mut self, is_async: bool) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::Function);
        let is_generator = self.eat(TokenType::Asterisk);
        let name = if self.match_identifier() {
            Some(self.consume().value)
        } else {
            None
        };
        let parameters = self.parse_formal_parameters();
        let body = FunctionBody::Block(self.parse_function_body_statements());
        let id = self.fresh_function_id();
        self.expression(
            start,
            ExpressionKind::Function(Box::new(FunctionData {
                id,
                name,
                parameters,
                body,
                kind: FunctionKind::from_async_generator(is_async, is_generator),
                is_arrow: false,
            })),
        )
    }

    /// Parameters + body of a method or accessor, as a Function expression.
    pub(crate) fn parse_method_function(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> Expression {
        let start = self.position();
        let parameters = self.parse_formal_parameters();
        let body = FunctionBody::Block(self.parse_function_body_statements());
        let id = self.fresh_function_id();
        self.expression(
            start,
            ExpressionKind::Function(Box::new(FunctionData {
                id,
                name: None,
                parameters,
                body,
                kind: FunctionKind::from_async_generator(is_async, is_generator),
                is_arrow: false,
            })),
        )
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub(crate) fn parse_class_declaration(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Class);
        let name = self.consume_identifier();
        let class = self.parse_class_tail(Some(name));
        self.statement(start, StatementKind::ClassDeclaration(Box::new(class)))
    }

    pub(crate) fn parse_class_expression(&mut self) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::Class);
        let name = if self.match_identifier() {
            Some(self.consume().value)
        } else {
            None
        };
        let class = self.parse_class_tail(name);
        self.expression(start, ExpressionKind::Class(Box::new(class)))
    }

    fn parse_class_tail(&mut self, name: Option<String>) -> ClassData {
        let super_class = if self.eat(TokenType::Extends) {
            // LeftHandSideExpression: unary would also accept `extends !x`.
            let base = self.parse_assignment_expression();
            Some(Box::new(base))
        } else {
            None
        };

        self.consume_token(TokenType::CurlyOpen);
        let mut elements = Vec::new();
        while !self.match_token(TokenType::CurlyClose) && !self.done() {
            if self.eat(TokenType::Semicolon) {
                continue;
            }
            elements.push(self.parse_class_element());
        }
        self.consume_token(TokenType::CurlyClose);

        ClassData {
            name,
            super_class,
            elements,
        }
    }

    fn parse_class_element(&mut self) -> ClassElement {
        // `static` is a modifier unless it is itself the member key.
        let is_static = self.match_token(TokenType::Static)
            && !matches!(
                self.peek_token().token_type,
                TokenType::ParenOpen | TokenType::Equals | TokenType::Semicolon
            );
        if is_static {
            self.consume();
            if self.match_token(TokenType::CurlyOpen) {
                return ClassElement::StaticBlock(self.parse_function_body_statements());
            }
        }

        let mut accessor_kind = None;
        for (word, kind) in [("get", MethodKind::Getter), ("set", MethodKind::Setter)] {
            if self.match_contextual(word)
                && !matches!(
                    self.peek_token().token_type,
                    TokenType::ParenOpen
                        | TokenType::Equals
                        | TokenType::Semicolon
                        | TokenType::CurlyClose
                )
            {
                self.consume();
                accessor_kind = Some(kind);
                break;
            }
        }

        let is_async = accessor_kind.is_none()
            && self.match_token(TokenType::Async)
            && !self.peek_token().had_line_terminator
            && !matches!(
                self.peek_token().token_type,
                TokenType::ParenOpen | TokenType::Equals | TokenType::Semicolon
            );
        if is_async {
            self.consume();
        }
        let is_generator = accessor_kind.is_none() && self.eat(TokenType::Asterisk);

        let (key, computed) = self.parse_property_key();

        if self.match_token(TokenType::ParenOpen) {
            let kind = accessor_kind.unwrap_or_else(|| {
                let is_constructor = !is_static
                    && !computed
                    && !is_async
                    && !is_generator
                    && matches!(
                        &key.inner,
                        ExpressionKind::Identifier(name) if name == "constructor"
                    );
                if is_constructor {
                    MethodKind::Constructor
                } else {
                    MethodKind::Method
                }
            });
            let function_expr = self.parse_method_function(is_async, is_generator);
            let ExpressionKind::Function(function) = function_expr.inner else {
                unreachable!("parse_method_function returns a function expression");
            };
            return ClassElement::Method(ClassMethod {
                key,
                computed,
                is_static,
                kind,
                function,
            });
        }

        // Field.
        let initializer = if self.eat(TokenType::Equals) {
            Some(self.with_in_allowed(|parser| parser.parse_assignment_expression()))
        } else {
            None
        };
        self.consume_or_insert_semicolon();
        ClassElement::Field {
            key,
            computed,
            is_static,
            initializer,
        }
    }

    // =========================================================================
    // Modules
    // =========================================================================

    pub(crate) fn parse_import_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Import);

        let mut data = ImportData {
            default_binding: None,
            namespace_binding: None,
            named: Vec::new(),
            source: String::new(),
        };

        if self.match_token(TokenType::StringLiteral) {
            data.source = self.consume().value;
            self.consume_or_insert_semicolon();
            return self.statement(start, StatementKind::Import(data));
        }

        if self.match_identifier() {
            data.default_binding = Some(self.consume().value);
            if !self.eat(TokenType::Comma) {
                self.expect_from_clause(&mut data.source);
                self.consume_or_insert_semicolon();
                return self.statement(start, StatementKind::Import(data));
            }
        }

        if self.eat(TokenType::Asterisk) {
            if !self.match_contextual("as") {
                self.expected("'as' after 'import *'");
            } else {
                self.consume();
            }
            data.namespace_binding = Some(self.consume_identifier());
        } else if self.eat(TokenType::CurlyOpen) {
            while !self.match_token(TokenType::CurlyClose) && !self.done() {
                let imported = self.consume_identifier_name();
                let local = if self.match_contextual("as") {
                    self.consume();
                    self.consume_identifier()
                } else {
                    imported.clone()
                };
                data.named.push(ImportSpecifier { imported, local });
                if !self.match_token(TokenType::CurlyClose) {
                    self.consume_token(TokenType::Comma);
                }
            }
            self.consume_token(TokenType::CurlyClose);
        } else {
            self.expected("import bindings");
        }

        self.expect_from_clause(&mut data.source);
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Import(data))
    }

    fn expect_from_clause(&mut self, source: &mut String) {
        if self.match_contextual("from") {
            self.consume();
        } else {
            self.expected("'from'");
        }
        if self.match_token(TokenType::StringLiteral) {
            *source = self.consume().value;
        } else {
            self.expected("module specifier string");
        }
    }

    pub(crate) fn parse_export_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Export);

        if self.eat(TokenType::Default) {
            // Declarations with names keep their statement form; everything
            // else (including anonymous functions/classes) is an expression.
            let declaration = match self.current_token_type() {
                TokenType::Function if self.peek_token().token_type != TokenType::ParenOpen => {
                    self.parse_function_declaration(false)
                }
                TokenType::Class if self.peek_token().token_type != TokenType::CurlyOpen => {
                    self.parse_class_declaration()
                }
                _ => {
                    let expression = self.parse_assignment_expression();
                    self.consume_or_insert_semicolon();
                    Statement::expression(expression)
                }
            };
            return self.statement(
                start,
                StatementKind::Export(ExportData {
                    declaration: Some(Box::new(declaration)),
                    named: Vec::new(),
                    source: None,
                    is_default: true,
                }),
            );
        }

        if self.eat(TokenType::Asterisk) {
            let exported = if self.match_contextual("as") {
                self.consume();
                self.consume_identifier_name()
            } else {
                "*".to_string()
            };
            let mut source = String::new();
            self.expect_from_clause(&mut source);
            self.consume_or_insert_semicolon();
            return self.statement(
                start,
                StatementKind::Export(ExportData {
                    declaration: None,
                    named: vec![ExportSpecifier {
                        local: "*".to_string(),
                        exported,
                    }],
                    source: Some(source),
                    is_default: false,
                }),
            );
        }

        if self.eat(TokenType::CurlyOpen) {
            let mut named = Vec::new();
            while !self.match_token(TokenType::CurlyClose) && !self.done() {
                let local = self.consume_identifier_name();
                let exported = if self.match_contextual("as") {
                    self.consume();
                    self.consume_identifier_name()
                } else {
                    local.clone()
                };
                named.push(ExportSpecifier { local, exported });
                if !self.match_token(TokenType::CurlyClose) {
                    self.consume_token(TokenType::Comma);
                }
            }
            self.consume_token(TokenType::CurlyClose);
            let source = if self.match_contextual("from") {
                self.consume();
                if self.match_token(TokenType::StringLiteral) {
                    Some(self.consume().value)
                } else {
                    self.expected("module specifier string");
                    None
                }
            } else {
                None
            };
            self.consume_or_insert_semicolon();
            return self.statement(
                start,
                StatementKind::Export(ExportData {
                    declaration: None,
                    named,
                    source,
                    is_default: false,
                }),
            );
        }

        let declaration = self.parse_statement();
        self.statement(
            start,
            StatementKind::Export(ExportData {
                declaration: Some(Box::new(declaration)),
                named: Vec::new(),
                source: None,
                is_default: false,
            }),
        )
    }
}
