/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Expression parsing: primary, secondary (binary/postfix), unary, and
//! precedence climbing.

use crate::ast::*;
use crate::parser::{
    Parser, PRECEDENCE_ADDITIVE, PRECEDENCE_BITWISE_AND, PRECEDENCE_BITWISE_OR,
    PRECEDENCE_BITWISE_XOR, PRECEDENCE_EQUALITY, PRECEDENCE_EXPONENTIATION,
    PRECEDENCE_LOGICAL_AND, PRECEDENCE_LOGICAL_OR, PRECEDENCE_MULTIPLICATIVE, PRECEDENCE_NULLISH,
    PRECEDENCE_RELATIONAL, PRECEDENCE_SHIFT,
};
use crate::token::TokenType;

enum BinaryKind {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl<'a> Parser<'a> {
    /// Full expression including comma sequences.
    pub(crate) fn parse_expression_any(&mut self) -> Expression {
        let start = self.position();
        let first = self.parse_assignment_expression();
        if !self.match_token(TokenType::Comma) {
            return first;
        }
        let mut expressions = vec![first];
        while self.eat(TokenType::Comma) {
            expressions.push(self.parse_assignment_expression());
        }
        self.expression(start, ExpressionKind::Sequence(expressions))
    }

    /// Run `f` with `in` allowed again (inside brackets the for-init
    /// ambiguity cannot arise).
    pub(crate) fn with_in_allowed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.forbid_in;
        self.forbid_in = false;
        let result = f(self);
        self.forbid_in = saved;
        result
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Expression {
        let start = self.position();

        if self.match_token(TokenType::Yield) {
            return self.parse_yield_expression();
        }

        // Arrow functions need lookahead: `x =>`, `(…) =>`, `async x =>`,
        // `async (…) =>`.
        if self.match_token(TokenType::Async) && self.async_arrow_follows() {
            self.consume();
            return self.parse_arrow_function(start, true);
        }
        if self.match_identifier() && self.peek_token().token_type == TokenType::Arrow {
            return self.parse_arrow_function(start, false);
        }
        if self.match_token(TokenType::ParenOpen) && self.arrow_follows_paren() {
            return self.parse_arrow_function(start, false);
        }

        let lhs = self.parse_conditional_expression();

        let op = match self.current_token_type() {
            TokenType::Equals => AssignmentOp::Assignment,
            TokenType::PlusEquals => AssignmentOp::AdditionAssignment,
            TokenType::MinusEquals => AssignmentOp::SubtractionAssignment,
            TokenType::AsteriskEquals => AssignmentOp::MultiplicationAssignment,
            TokenType::SlashEquals => AssignmentOp::DivisionAssignment,
            TokenType::PercentEquals => AssignmentOp::ModuloAssignment,
            TokenType::DoubleAsteriskEquals => AssignmentOp::ExponentiationAssignment,
            TokenType::AmpersandEquals => AssignmentOp::BitwiseAndAssignment,
            TokenType::PipeEquals => AssignmentOp::BitwiseOrAssignment,
            TokenType::CaretEquals => AssignmentOp::BitwiseXorAssignment,
            TokenType::ShiftLeftEquals => AssignmentOp::LeftShiftAssignment,
            TokenType::ShiftRightEquals => AssignmentOp::RightShiftAssignment,
            TokenType::UnsignedShiftRightEquals => AssignmentOp::UnsignedRightShiftAssignment,
            TokenType::DoubleAmpersandEquals => AssignmentOp::AndAssignment,
            TokenType::DoublePipeEquals => AssignmentOp::OrAssignment,
            TokenType::DoubleQuestionMarkEquals => AssignmentOp::NullishAssignment,
            _ => return lhs,
        };
        self.consume();
        let rhs = self.parse_assignment_expression();
        self.expression(
            start,
            ExpressionKind::Assignment {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        )
    }

    fn parse_conditional_expression(&mut self) -> Expression {
        let start = self.position();
        let test = self.parse_binary_expression(PRECEDENCE_NULLISH);
        if !self.eat(TokenType::QuestionMark) {
            return test;
        }
        let consequent = self.with_in_allowed(|parser| parser.parse_assignment_expression());
        self.consume_token(TokenType::Colon);
        let alternate = self.parse_assignment_expression();
        self.expression(
            start,
            ExpressionKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        )
    }

    fn binary_kind(&self, token_type: TokenType) -> Option<(u8, bool, BinaryKind)> {
        use BinaryKind::{Binary, Logical};
        let entry = match token_type {
            TokenType::DoubleQuestionMark => {
                (PRECEDENCE_NULLISH, false, Logical(LogicalOp::NullishCoalescing))
            }
            TokenType::DoublePipe => (PRECEDENCE_LOGICAL_OR, false, Logical(LogicalOp::Or)),
            TokenType::DoubleAmpersand => (PRECEDENCE_LOGICAL_AND, false, Logical(LogicalOp::And)),
            TokenType::Pipe => (PRECEDENCE_BITWISE_OR, false, Binary(BinaryOp::BitwiseOr)),
            TokenType::Caret => (PRECEDENCE_BITWISE_XOR, false, Binary(BinaryOp::BitwiseXor)),
            TokenType::Ampersand => (PRECEDENCE_BITWISE_AND, false, Binary(BinaryOp::BitwiseAnd)),
            TokenType::EqualsEquals => (PRECEDENCE_EQUALITY, false, Binary(BinaryOp::LooselyEquals)),
            TokenType::ExclamationMarkEquals => {
                (PRECEDENCE_EQUALITY, false, Binary(BinaryOp::LooselyInequals))
            }
            TokenType::EqualsEqualsEquals => {
                (PRECEDENCE_EQUALITY, false, Binary(BinaryOp::StrictlyEquals))
            }
            TokenType::ExclamationMarkEqualsEquals => {
                (PRECEDENCE_EQUALITY, false, Binary(BinaryOp::StrictlyInequals))
            }
            TokenType::LessThan => (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::LessThan)),
            TokenType::LessThanEquals => {
                (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::LessThanEquals))
            }
            TokenType::GreaterThan => (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::GreaterThan)),
            TokenType::GreaterThanEquals => {
                (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::GreaterThanEquals))
            }
            TokenType::Instanceof => (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::InstanceOf)),
            TokenType::In => {
                if self.forbid_in {
                    return None;
                }
                (PRECEDENCE_RELATIONAL, false, Binary(BinaryOp::In))
            }
            TokenType::ShiftLeft => (PRECEDENCE_SHIFT, false, Binary(BinaryOp::LeftShift)),
            TokenType::ShiftRight => (PRECEDENCE_SHIFT, false, Binary(BinaryOp::RightShift)),
            TokenType::UnsignedShiftRight => {
                (PRECEDENCE_SHIFT, false, Binary(BinaryOp::UnsignedRightShift))
            }
            TokenType::Plus => (PRECEDENCE_ADDITIVE, false, Binary(BinaryOp::Addition)),
            TokenType::Minus => (PRECEDENCE_ADDITIVE, false, Binary(BinaryOp::Subtraction)),
            TokenType::Asterisk => {
                (PRECEDENCE_MULTIPLICATIVE, false, Binary(BinaryOp::Multiplication))
            }
            TokenType::Slash => (PRECEDENCE_MULTIPLICATIVE, false, Binary(BinaryOp::Division)),
            TokenType::Percent => (PRECEDENCE_MULTIPLICATIVE, false, Binary(BinaryOp::Modulo)),
            TokenType::DoubleAsterisk => {
                (PRECEDENCE_EXPONENTIATION, true, Binary(BinaryOp::Exponentiation))
            }
            _ => return None,
        };
        Some(entry)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Expression {
        let start = self.position();
        let mut lhs = self.parse_unary_expression();
        loop {
            let Some((precedence, right_assoc, kind)) = self.binary_kind(self.current_token_type())
            else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.consume();
            let next_min = if right_assoc {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.parse_binary_expression(next_min);
            let inner = match kind {
                BinaryKind::Binary(op) => ExpressionKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                BinaryKind::Logical(op) => ExpressionKind::Logical {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
            lhs = self.expression(start, inner);
        }
        lhs
    }

    fn parse_unary_expression(&mut self) -> Expression {
        let start = self.position();
        let op = match self.current_token_type() {
            TokenType::ExclamationMark => Some(UnaryOp::Not),
            TokenType::Tilde => Some(UnaryOp::BitwiseNot),
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::Minus => Some(UnaryOp::Minus),
            TokenType::Typeof => Some(UnaryOp::Typeof),
            TokenType::Void => Some(UnaryOp::Void),
            TokenType::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.consume();
            let operand = self.parse_unary_expression();
            return self.expression(
                start,
                ExpressionKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            );
        }

        match self.current_token_type() {
            TokenType::PlusPlus | TokenType::MinusMinus => {
                let op = if self.current_token_type() == TokenType::PlusPlus {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                self.consume();
                let argument = self.parse_unary_expression();
                self.expression(
                    start,
                    ExpressionKind::Update {
                        op,
                        argument: Box::new(argument),
                        prefixed: true,
                    },
                )
            }
            TokenType::Await => {
                self.consume();
                let operand = self.parse_unary_expression();
                self.expression(start, ExpressionKind::Await(Box::new(operand)))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> Expression {
        let start = self.position();
        let primary = self.parse_primary_expression();
        let expr = self.parse_call_and_member(primary);

        if matches!(
            self.current_token_type(),
            TokenType::PlusPlus | TokenType::MinusMinus
        ) && !self.current_token.had_line_terminator
        {
            let op = if self.current_token_type() == TokenType::PlusPlus {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.consume();
            return self.expression(
                start,
                ExpressionKind::Update {
                    op,
                    argument: Box::new(expr),
                    prefixed: false,
                },
            );
        }
        expr
    }

    pub(crate) fn parse_call_and_member(&mut self, base: Expression) -> Expression {
        let start = base.range.start;
        let mut expr = base;
        loop {
            match self.current_token_type() {
                TokenType::Period => {
                    self.consume();
                    let property = self.parse_member_property();
                    expr = self.expression(
                        start,
                        ExpressionKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: false,
                            optional: false,
                        },
                    );
                }
                TokenType::QuestionMarkPeriod => {
                    self.consume();
                    match self.current_token_type() {
                        TokenType::ParenOpen => {
                            let arguments = self.parse_arguments();
                            expr = self.expression(
                                start,
                                ExpressionKind::Call(CallData {
                                    callee: Box::new(expr),
                                    arguments,
                                    optional: true,
                                }),
                            );
                        }
                        TokenType::BracketOpen => {
                            self.consume();
                            let property =
                                self.with_in_allowed(|parser| parser.parse_expression_any());
                            self.consume_token(TokenType::BracketClose);
                            expr = self.expression(
                                start,
                                ExpressionKind::Member {
                                    object: Box::new(expr),
                                    property: Box::new(property),
                                    computed: true,
                                    optional: true,
                                },
                            );
                        }
                        _ => {
                            let property = self.parse_member_property();
                            expr = self.expression(
                                start,
                                ExpressionKind::Member {
                                    object: Box::new(expr),
                                    property: Box::new(property),
                                    computed: false,
                                    optional: true,
                                },
                            );
                        }
                    }
                }
                TokenType::BracketOpen => {
                    self.consume();
                    let property = self.with_in_allowed(|parser| parser.parse_expression_any());
                    self.consume_token(TokenType::BracketClose);
                    expr = self.expression(
                        start,
                        ExpressionKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: true,
                            optional: false,
                        },
                    );
                }
                TokenType::ParenOpen => {
                    let arguments = self.parse_arguments();
                    expr = self.expression(
                        start,
                        ExpressionKind::Call(CallData {
                            callee: Box::new(expr),
                            arguments,
                            optional: false,
                        }),
                    );
                }
                TokenType::TemplateLiteralStart => {
                    let quasi = self.parse_template_literal();
                    expr = self.expression(
                        start,
                        ExpressionKind::TaggedTemplate {
                            tag: Box::new(expr),
                            quasi: Box::new(quasi),
                        },
                    );
                }
                _ => break,
            }
        }
        expr
    }

    /// Property after `.` — an identifier-name (keywords allowed: `a.catch`,
    /// `C.this`) or a private identifier.
    fn parse_member_property(&mut self) -> Expression {
        let start = self.position();
        if self.match_token(TokenType::PrivateIdentifier) {
            let name = self.consume().value;
            return self.expression(start, ExpressionKind::PrivateIdentifier(name));
        }
        let name = self.consume_identifier_name();
        self.expression(start, ExpressionKind::Identifier(name))
    }

    pub(crate) fn parse_arguments(&mut self) -> Vec<Argument> {
        self.consume_token(TokenType::ParenOpen);
        let mut arguments = Vec::new();
        self.with_in_allowed(|parser| {
            while !parser.match_token(TokenType::ParenClose) && !parser.done() {
                let is_spread = parser.eat(TokenType::TripleDot);
                let value = parser.parse_assignment_expression();
                arguments.push(Argument { value, is_spread });
                if !parser.eat(TokenType::Comma) {
                    break;
                }
            }
        });
        self.consume_token(TokenType::ParenClose);
        arguments
    }

    fn parse_primary_expression(&mut self) -> Expression {
        let start = self.position();
        match self.current_token_type() {
            TokenType::ParenOpen => {
                self.consume();
                let expr = self.with_in_allowed(|parser| parser.parse_expression_any());
                self.consume_token(TokenType::ParenClose);
                expr
            }
            TokenType::NumericLiteral => {
                let token = self.consume();
                let value = parse_numeric_value(&token.value);
                self.expression(start, ExpressionKind::NumericLiteral(value))
            }
            TokenType::BigIntLiteral => {
                let token = self.consume();
                self.expression(start, ExpressionKind::BigIntLiteral(token.value))
            }
            TokenType::StringLiteral => {
                let token = self.consume();
                self.expression(start, ExpressionKind::StringLiteral(token.value))
            }
            TokenType::BoolLiteral => {
                let token = self.consume();
                self.expression(start, ExpressionKind::BooleanLiteral(token.value == "true"))
            }
            TokenType::NullLiteral => {
                self.consume();
                self.expression(start, ExpressionKind::NullLiteral)
            }
            TokenType::TemplateLiteralStart => self.parse_template_literal(),
            TokenType::Slash | TokenType::SlashEquals => {
                let regex = self.lexer.relex_as_regex(&self.current_token);
                self.current_token = regex;
                let token = self.consume();
                let (pattern, flags) = match token.value.rfind('/') {
                    Some(index) => (
                        token.value[..index].to_string(),
                        token.value[index + 1..].to_string(),
                    ),
                    None => (token.value.clone(), String::new()),
                };
                self.expression(start, ExpressionKind::RegExpLiteral { pattern, flags })
            }
            TokenType::This => {
                self.consume();
                self.expression(start, ExpressionKind::This)
            }
            TokenType::Super => {
                self.consume();
                self.expression(start, ExpressionKind::Super)
            }
            TokenType::New => self.parse_new_expression(),
            TokenType::Import => {
                self.consume();
                if self.eat(TokenType::Period) {
                    let name = self.consume_identifier_name();
                    if name != "meta" {
                        self.syntax_error("Expected 'meta' after 'import.'");
                    }
                    self.expression(
                        start,
                        ExpressionKind::MetaProperty(MetaPropertyKind::ImportMeta),
                    )
                } else {
                    // Dynamic import: modelled as a call to an `import`
                    // callee so it round-trips through the printer.
                    let arguments = self.parse_arguments();
                    self.expression(
                        start,
                        ExpressionKind::Call(CallData {
                            callee: Box::new(Expression::identifier("import")),
                            arguments,
                            optional: false,
                        }),
                    )
                }
            }
            TokenType::Function => self.parse_function_expression(false),
            TokenType::Async if self.peek_token().token_type == TokenType::Function => {
                self.consume();
                self.parse_function_expression(true)
            }
            TokenType::Class => self.parse_class_expression(),
            TokenType::CurlyOpen => self.parse_object_expression(),
            TokenType::BracketOpen => self.parse_array_expression(),
            TokenType::PrivateIdentifier => {
                let token = self.consume();
                self.expression(start, ExpressionKind::PrivateIdentifier(token.value))
            }
            _ if self.match_identifier() => {
                let token = self.consume();
                self.expression(start, ExpressionKind::Identifier(token.value))
            }
            _ => {
                self.expected("expression");
                self.consume();
                self.expression(start, ExpressionKind::Error)
            }
        }
    }

    fn parse_new_expression(&mut self) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::New);

        if self.eat(TokenType::Period) {
            let name = self.consume_identifier_name();
            if name != "target" {
                self.syntax_error("Expected 'target' after 'new.'");
            }
            return self.expression(
                start,
                ExpressionKind::MetaProperty(MetaPropertyKind::NewTarget),
            );
        }

        // The callee is a member chain without calls: `new a.b.c(args)`.
        let mut callee = if self.match_token(TokenType::New) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        loop {
            match self.current_token_type() {
                TokenType::Period => {
                    self.consume();
                    let property = self.parse_member_property();
                    callee = self.expression(
                        start,
                        ExpressionKind::Member {
                            object: Box::new(callee),
                            property: Box::new(property),
                            computed: false,
                            optional: false,
                        },
                    );
                }
                TokenType::BracketOpen => {
                    self.consume();
                    let property = self.with_in_allowed(|parser| parser.parse_expression_any());
                    self.consume_token(TokenType::BracketClose);
                    callee = self.expression(
                        start,
                        ExpressionKind::Member {
                            object: Box::new(callee),
                            property: Box::new(property),
                            computed: true,
                            optional: false,
                        },
                    );
                }
                _ => break,
            }
        }

        let arguments = if self.match_token(TokenType::ParenOpen) {
            self.parse_arguments()
        } else {
            Vec::new()
        };
        let new_expr = self.expression(
            start,
            ExpressionKind::New(CallData {
                callee: Box::new(callee),
                arguments,
                optional: false,
            }),
        );
        // `new X().method()` continues as an ordinary call/member chain.
        self.parse_call_and_member(new_expr)
    }

    fn parse_array_expression(&mut self) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::BracketOpen);
        let mut elements = Vec::new();
        self.with_in_allowed(|parser| {
            while !parser.match_token(TokenType::BracketClose) && !parser.done() {
                if parser.eat(TokenType::Comma) {
                    elements.push(None);
                    continue;
                }
                let element = if parser.match_token(TokenType::TripleDot) {
                    let spread_start = parser.position();
                    parser.consume();
                    let argument = parser.parse_assignment_expression();
                    parser.expression(spread_start, ExpressionKind::Spread(Box::new(argument)))
                } else {
                    parser.parse_assignment_expression()
                };
                elements.push(Some(element));
                if !parser.match_token(TokenType::BracketClose) {
                    parser.consume_token(TokenType::Comma);
                }
            }
        });
        self.consume_token(TokenType::BracketClose);
        self.expression(start, ExpressionKind::Array(elements))
    }

    fn parse_object_expression(&mut self) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::CurlyOpen);
        let mut properties = Vec::new();
        self.with_in_allowed(|parser| {
            while !parser.match_token(TokenType::CurlyClose) && !parser.done() {
                properties.push(parser.parse_object_property());
                if !parser.match_token(TokenType::CurlyClose) {
                    parser.consume_token(TokenType::Comma);
                }
            }
        });
        self.consume_token(TokenType::CurlyClose);
        self.expression(start, ExpressionKind::Object(properties))
    }

    fn parse_object_property(&mut self) -> ObjectProperty {
        if self.eat(TokenType::TripleDot) {
            let argument = self.parse_assignment_expression();
            return ObjectProperty {
                kind: PropertyKind::Spread,
                key: Box::new(argument),
                computed: false,
                shorthand: false,
                value: None,
            };
        }

        // Accessor properties: `get key() {}` / `set key(v) {}` — only when
        // `get`/`set` is followed by a key, not used as a key itself.
        for (word, kind) in [("get", PropertyKind::Getter), ("set", PropertyKind::Setter)] {
            if self.match_contextual(word) {
                let next = self.peek_token().token_type;
                if next != TokenType::Colon
                    && next != TokenType::Comma
                    && next != TokenType::ParenOpen
                    && next != TokenType::CurlyClose
                    && next != TokenType::Equals
                {
                    self.consume();
                    let (key, computed) = self.parse_property_key();
                    let function = self.parse_method_function(false, false);
                    return ObjectProperty {
                        kind,
                        key,
                        computed,
                        shorthand: false,
                        value: Some(Box::new(function)),
                    };
                }
            }
        }

        let is_async = self.match_token(TokenType::Async)
            && !matches!(
                self.peek_token().token_type,
                TokenType::Colon | TokenType::Comma | TokenType::CurlyClose | TokenType::ParenOpen
            );
        if is_async {
            self.consume();
        }
        let is_generator = self.eat(TokenType::Asterisk);

        let (key, computed) = self.parse_property_key();

        if self.match_token(TokenType::ParenOpen) {
            let function = self.parse_method_function(is_async, is_generator);
            return ObjectProperty {
                kind: PropertyKind::Method,
                key,
                computed,
                shorthand: false,
                value: Some(Box::new(function)),
            };
        }

        if self.eat(TokenType::Colon) {
            let value = self.parse_assignment_expression();
            return ObjectProperty {
                kind: PropertyKind::Init,
                key,
                computed,
                shorthand: false,
                value: Some(Box::new(value)),
            };
        }

        // Shorthand `{ x }`.
        if !matches!(key.inner, ExpressionKind::Identifier(_)) {
            self.expected("':' after property key");
        }
        ObjectProperty {
            kind: PropertyKind::Init,
            key,
            computed: false,
            shorthand: true,
            value: None,
        }
    }

    /// A property key: identifier-name, string, number, private name, or
    /// computed `[expr]`. Returns the key and whether it was computed.
    pub(crate) fn parse_property_key(&mut self) -> (Box<Expression>, bool) {
        let start = self.position();
        match self.current_token_type() {
            TokenType::BracketOpen => {
                self.consume();
                let key = self.with_in_allowed(|parser| parser.parse_assignment_expression());
                self.consume_token(TokenType::BracketClose);
                (Box::new(key), true)
            }
            TokenType::StringLiteral => {
                let token = self.consume();
                (
                    Box::new(self.expression(start, ExpressionKind::StringLiteral(token.value))),
                    false,
                )
            }
            TokenType::NumericLiteral => {
                let token = self.consume();
                let value = parse_numeric_value(&token.value);
                (
                    Box::new(self.expression(start, ExpressionKind::NumericLiteral(value))),
                    false,
                )
            }
            TokenType::PrivateIdentifier => {
                let token = self.consume();
                (
                    Box::new(
                        self.expression(start, ExpressionKind::PrivateIdentifier(token.value)),
                    ),
                    false,
                )
            }
            _ => {
                let name = self.consume_identifier_name();
                (
                    Box::new(self.expression(start, ExpressionKind::Identifier(name))),
                    false,
                )
            }
        }
    }

    /// Parse a template literal. The current token is `TemplateLiteralStart`
    /// and the lexer cursor sits just past the backtick; text is pulled
    /// chunk-wise with embedded expressions parsed in between.
    pub(crate) fn parse_template_literal(&mut self) -> Expression {
        let start = self.position();
        debug_assert!(self.match_token(TokenType::TemplateLiteralStart));

        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let chunk = self.lexer.read_template_chunk();
            quasis.push(chunk.cooked);
            if !chunk.has_expression {
                break;
            }
            // Prime the first token of the embedded expression.
            self.current_token = self.lexer.next_token();
            let expression = self.with_in_allowed(|parser| parser.parse_expression_any());
            expressions.push(expression);
            if !self.match_token(TokenType::CurlyClose) {
                self.expected("'}' closing template expression");
                break;
            }
            // The cursor now sits just past the `}`; the next chunk resumes
            // there. The `}` token itself is discarded.
        }
        // Re-prime the parser with the token after the template.
        self.current_token = self.lexer.next_token();
        self.expression(
            start,
            ExpressionKind::TemplateLiteral(TemplateLiteralData {
                quasis,
                expressions,
            }),
        )
    }

    fn parse_yield_expression(&mut self) -> Expression {
        let start = self.position();
        self.consume_token(TokenType::Yield);
        let delegate = self.eat(TokenType::Asterisk);
        let argument = if self.current_token.had_line_terminator
            || matches!(
                self.current_token_type(),
                TokenType::ParenClose
                    | TokenType::BracketClose
                    | TokenType::CurlyClose
                    | TokenType::Comma
                    | TokenType::Semicolon
                    | TokenType::Colon
                    | TokenType::Eof
            ) {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression()))
        };
        self.expression(start, ExpressionKind::Yield { argument, delegate })
    }

    // =========================================================================
    // Arrow function lookahead
    // =========================================================================

    /// Current token is `(`. Scan ahead over the balanced parens; an arrow
    /// follows if the token after the matching `)` is `=>`.
    fn arrow_follows_paren(&self) -> bool {
        let mut lookahead = self.lexer.clone();
        let mut depth = 1usize;
        loop {
            let token = lookahead.next_token();
            match token.token_type {
                TokenType::ParenOpen => depth += 1,
                TokenType::ParenClose => {
                    depth -= 1;
                    if depth == 0 {
                        return lookahead.next_token().token_type == TokenType::Arrow;
                    }
                }
                TokenType::Eof => return false,
                _ => {}
            }
        }
    }

    /// Current token is `async`. True for `async x =>` and `async (…) =>`
    /// with no line terminator after `async`.
    fn async_arrow_follows(&self) -> bool {
        let mut lookahead = self.lexer.clone();
        let first = lookahead.next_token();
        if first.had_line_terminator {
            return false;
        }
        match first.token_type {
            TokenType::Identifier => lookahead.next_token().token_type == TokenType::Arrow,
            TokenType::ParenOpen => {
                let mut depth = 1usize;
                loop {
                    let token = lookahead.next_token();
                    match token.token_type {
                        TokenType::ParenOpen => depth += 1,
                        TokenType::ParenClose => {
                            depth -= 1;
                            if depth == 0 {
                                return lookahead.next_token().token_type == TokenType::Arrow;
                            }
                        }
                        TokenType::Eof => return false,
                        _ => {}
                    }
                }
            }
            _ => false,
        }
    }

    /// Parse an arrow function; `async` (if any) is already consumed.
    fn parse_arrow_function(&mut self, start: crate::ast::Position, is_async: bool) -> Expression {
        let parameters = if self.match_token(TokenType::ParenOpen) {
            self.parse_formal_parameters()
        } else {
            let name = self.consume_identifier();
            vec![FunctionParameter {
                pattern: Pattern::Identifier(name),
                default_value: None,
                is_rest: false,
            }]
        };
        self.consume_token(TokenType::Arrow);

        let body = if self.match_token(TokenType::CurlyOpen) {
            FunctionBody::Block(self.parse_function_body_statements())
        } else {
            FunctionBody::Expression(Box::new(self.parse_assignment_expression()))
        };

        let id = self.fresh_function_id();
        self.expression(
            start,
            ExpressionKind::Function(Box::new(FunctionData {
                id,
                name: None,
                parameters,
                body,
                kind: FunctionKind::from_async_generator(is_async, false),
                is_arrow: true,
            })),
        )
    }
}

/// Convert numeric literal text to its value. Handles radix prefixes and
/// `_` separators; anything unparseable yields NaN (the parser has already
/// reported the token if it was malformed).
pub(crate) fn parse_numeric_value(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let radix = match cleaned.get(0..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let mut value = 0f64;
        for c in cleaned[2..].chars() {
            match c.to_digit(radix) {
                Some(digit) => value = value * f64::from(radix) + f64::from(digit),
                None => return f64::NAN,
            }
        }
        return value;
    }
    cleaned.parse().unwrap_or(f64::NAN)
}
