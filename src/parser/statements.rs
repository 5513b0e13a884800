/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Statement parsing: if, for, while, switch, try, etc.

use crate::ast::*;
use crate::parser::Parser;
use crate::token::TokenType;

/// Used locally during for-statement parsing before the loop form is known.
enum LocalForInit {
    Declaration(Statement),
    Expression(Expression),
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Statement {
        let start = self.position();
        match self.current_token_type() {
            TokenType::CurlyOpen => self.parse_block_statement(),
            TokenType::Semicolon => {
                self.consume();
                self.statement(start, StatementKind::Empty)
            }
            TokenType::Debugger => {
                self.consume();
                self.consume_or_insert_semicolon();
                self.statement(start, StatementKind::Debugger)
            }
            TokenType::Var | TokenType::Const => self.parse_variable_declaration(false),
            TokenType::Let if self.let_starts_declaration() => {
                self.parse_variable_declaration(false)
            }
            TokenType::Function => self.parse_function_declaration(false),
            TokenType::Async
                if self.peek_token().token_type == TokenType::Function
                    && !self.peek_token().had_line_terminator =>
            {
                self.consume();
                self.parse_function_declaration(true)
            }
            TokenType::Class => self.parse_class_declaration(),
            TokenType::If => self.parse_if_statement(),
            TokenType::While => self.parse_while_statement(),
            TokenType::Do => self.parse_do_while_statement(),
            TokenType::For => self.parse_for_statement(),
            TokenType::Switch => self.parse_switch_statement(),
            TokenType::Try => self.parse_try_statement(),
            TokenType::With => self.parse_with_statement(),
            TokenType::Return => self.parse_return_statement(),
            TokenType::Throw => self.parse_throw_statement(),
            TokenType::Break => self.parse_break_statement(),
            TokenType::Continue => self.parse_continue_statement(),
            TokenType::Import
                if !matches!(
                    self.peek_token().token_type,
                    TokenType::ParenOpen | TokenType::Period
                ) =>
            {
                self.parse_import_statement()
            }
            TokenType::Export => self.parse_export_statement(),
            _ => {
                if self.match_identifier() && self.peek_token().token_type == TokenType::Colon {
                    return self.parse_labelled_statement();
                }
                self.parse_expression_statement()
            }
        }
    }

    /// `let` begins a declaration only when a binding follows; otherwise it
    /// is an ordinary identifier expression.
    fn let_starts_declaration(&self) -> bool {
        let next = self.peek_token();
        next.token_type == TokenType::BracketOpen
            || next.token_type == TokenType::CurlyOpen
            || matches!(
                next.token_type,
                TokenType::Identifier | TokenType::Async | TokenType::Static
            )
    }

    pub(crate) fn parse_block_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::CurlyOpen);
        let mut children = Vec::new();
        while !self.match_token(TokenType::CurlyClose) && !self.done() {
            children.push(self.parse_statement());
        }
        self.consume_token(TokenType::CurlyClose);
        self.statement(start, StatementKind::Block(children))
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let start = self.position();
        let expression = self.parse_expression_any();
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Expression(Box::new(expression)))
    }

    // ReturnStatement : `return` [no LineTerminator here] Expression? `;`
    fn parse_return_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Return);

        // ASI: a line terminator after `return` ends the statement.
        if self.current_token.had_line_terminator {
            return self.statement(start, StatementKind::Return(None));
        }
        if self.match_token(TokenType::Semicolon)
            || self.match_token(TokenType::CurlyClose)
            || self.done()
        {
            self.consume_or_insert_semicolon();
            return self.statement(start, StatementKind::Return(None));
        }

        let argument = self.parse_expression_any();
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Return(Some(Box::new(argument))))
    }

    // ThrowStatement : `throw` [no LineTerminator here] Expression `;`
    fn parse_throw_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Throw);
        if self.current_token.had_line_terminator {
            self.syntax_error("No line break is allowed between 'throw' and its expression");
        }
        let argument = self.parse_expression_any();
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Throw(Box::new(argument)))
    }

    fn parse_break_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Break);
        let label = if !self.current_token.had_line_terminator && self.match_identifier() {
            Some(self.consume().value)
        } else {
            None
        };
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Break { label })
    }

    fn parse_continue_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Continue);
        let label = if !self.current_token.had_line_terminator && self.match_identifier() {
            Some(self.consume().value)
        } else {
            None
        };
        self.consume_or_insert_semicolon();
        self.statement(start, StatementKind::Continue { label })
    }

    fn parse_if_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::If);
        self.consume_token(TokenType::ParenOpen);
        let test = self.parse_expression_any();
        self.consume_token(TokenType::ParenClose);

        let consequent = self.parse_statement();
        let alternate = if self.eat(TokenType::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };

        self.statement(
            start,
            StatementKind::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
        )
    }

    fn parse_while_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::While);
        self.consume_token(TokenType::ParenOpen);
        let test = self.parse_expression_any();
        self.consume_token(TokenType::ParenClose);
        let body = self.parse_statement();
        self.statement(
            start,
            StatementKind::While {
                test: Box::new(test),
                body: Box::new(body),
            },
        )
    }

    fn parse_do_while_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Do);
        let body = self.parse_statement();
        self.consume_token(TokenType::While);
        self.consume_token(TokenType::ParenOpen);
        let test = self.parse_expression_any();
        self.consume_token(TokenType::ParenClose);
        // Since ES 2015 a missing semicolon is inserted here, despite the
        // regular ASI rules not applying.
        self.eat(TokenType::Semicolon);
        self.statement(
            start,
            StatementKind::DoWhile {
                test: Box::new(test),
                body: Box::new(body),
            },
        )
    }

    fn parse_for_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::For);

        let is_await = self.eat(TokenType::Await);

        self.consume_token(TokenType::ParenOpen);

        if self.match_token(TokenType::Semicolon) && !is_await {
            self.consume();
            return self.parse_standard_for_loop(start, None);
        }

        let is_declaration = matches!(
            self.current_token_type(),
            TokenType::Var | TokenType::Const
        ) || (self.match_token(TokenType::Let) && self.let_starts_declaration());

        let init = if is_declaration {
            LocalForInit::Declaration(self.parse_variable_declaration(true))
        } else {
            self.forbid_in = true;
            let expression = self.parse_expression_any();
            self.forbid_in = false;
            LocalForInit::Expression(expression)
        };

        if self.match_token(TokenType::In) && !is_await {
            self.consume();
            let rhs = self.parse_expression_any();
            self.consume_token(TokenType::ParenClose);
            let body = self.parse_statement();
            let head = self.for_in_of_head(init);
            return self.statement(
                start,
                StatementKind::ForInOf {
                    kind: ForInOfKind::In,
                    head,
                    rhs: Box::new(rhs),
                    body: Box::new(body),
                },
            );
        }

        if self.match_contextual("of") {
            self.consume();
            let rhs = self.parse_assignment_expression();
            self.consume_token(TokenType::ParenClose);
            let body = self.parse_statement();
            let head = self.for_in_of_head(init);
            let kind = if is_await {
                ForInOfKind::AwaitOf
            } else {
                ForInOfKind::Of
            };
            return self.statement(
                start,
                StatementKind::ForInOf {
                    kind,
                    head,
                    rhs: Box::new(rhs),
                    body: Box::new(body),
                },
            );
        }

        if is_await {
            self.syntax_error("'for await' requires an 'of' loop");
        }

        self.consume_token(TokenType::Semicolon);
        let init = Some(match init {
            LocalForInit::Declaration(declaration) => ForInit::Declaration(Box::new(declaration)),
            LocalForInit::Expression(expression) => ForInit::Expression(Box::new(expression)),
        });
        self.parse_standard_for_loop(start, init)
    }

    fn parse_standard_for_loop(&mut self, start: Position, init: Option<ForInit>) -> Statement {
        let test = if self.match_token(TokenType::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression_any()))
        };
        self.consume_token(TokenType::Semicolon);

        let update = if self.match_token(TokenType::ParenClose) {
            None
        } else {
            Some(Box::new(self.parse_expression_any()))
        };
        self.consume_token(TokenType::ParenClose);

        let body = self.parse_statement();
        self.statement(
            start,
            StatementKind::For {
                init,
                test,
                update,
                body: Box::new(body),
            },
        )
    }

    /// Convert the pre-parsed init clause to a for-in/of head. A
    /// declaration head must be a single uninitialized binding.
    fn for_in_of_head(&mut self, init: LocalForInit) -> ForHead {
        match init {
            LocalForInit::Declaration(declaration) => {
                let StatementKind::VariableDeclaration { kind, declarations } = declaration.inner
                else {
                    self.syntax_error("Invalid for-in/of head");
                    return ForHead::Expression(Box::new(Expression::undefined()));
                };
                if declarations.len() != 1 {
                    self.syntax_error("Multiple declarations not allowed in for..in/of");
                }
                let mut declarations = declarations;
                let declarator = declarations.swap_remove(0);
                if declarator.init.is_some() {
                    self.syntax_error("Variable initializer not allowed in for..in/of");
                }
                ForHead::Declaration {
                    kind,
                    target: declarator.target,
                }
            }
            LocalForInit::Expression(expression) => ForHead::Expression(Box::new(expression)),
        }
    }

    // NOTE: `with` is not restricted here — the `COMEHERE:` labelled form
    // relies on `with` being tolerated even at module scope.
    fn parse_with_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::With);
        self.consume_token(TokenType::ParenOpen);
        let object = self.parse_expression_any();
        self.consume_token(TokenType::ParenClose);
        let body = self.parse_statement();
        self.statement(
            start,
            StatementKind::With {
                object: Box::new(object),
                body: Box::new(body),
            },
        )
    }

    fn parse_switch_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Switch);
        self.consume_token(TokenType::ParenOpen);
        let discriminant = self.parse_expression_any();
        self.consume_token(TokenType::ParenClose);
        self.consume_token(TokenType::CurlyOpen);

        let mut cases = Vec::new();
        let mut has_default = false;
        while !self.match_token(TokenType::CurlyClose) && !self.done() {
            let case = self.parse_switch_case();
            if case.test.is_none() {
                if has_default {
                    self.syntax_error("Multiple 'default' clauses in switch statement");
                }
                has_default = true;
            }
            cases.push(case);
        }
        self.consume_token(TokenType::CurlyClose);

        self.statement(
            start,
            StatementKind::Switch {
                discriminant: Box::new(discriminant),
                cases,
            },
        )
    }

    fn parse_switch_case(&mut self) -> SwitchCase {
        let test = if self.eat(TokenType::Case) {
            Some(self.parse_expression_any())
        } else {
            if !self.eat(TokenType::Default) {
                self.expected("'case' or 'default'");
                self.consume();
            }
            None
        };
        self.consume_token(TokenType::Colon);

        let mut body = Vec::new();
        while !self.match_token(TokenType::CurlyClose)
            && !self.match_token(TokenType::Case)
            && !self.match_token(TokenType::Default)
            && !self.done()
        {
            body.push(self.parse_statement());
        }
        SwitchCase { test, body }
    }

    fn parse_try_statement(&mut self) -> Statement {
        let start = self.position();
        self.consume_token(TokenType::Try);
        let block = self.parse_block_statement();

        let handler = if self.match_token(TokenType::Catch) {
            Some(self.parse_catch_clause())
        } else {
            None
        };
        let finalizer = if self.eat(TokenType::Finally) {
            Some(Box::new(self.parse_block_statement()))
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.syntax_error("try statement must have a catch or finally clause");
        }

        self.statement(
            start,
            StatementKind::Try(TryData {
                block: Box::new(block),
                handler,
                finalizer,
            }),
        )
    }

    fn parse_catch_clause(&mut self) -> CatchClause {
        self.consume_token(TokenType::Catch);
        let parameter = if self.eat(TokenType::ParenOpen) {
            let parameter = self.parse_binding_target();
            self.consume_token(TokenType::ParenClose);
            Some(parameter)
        } else {
            None
        };
        let body = self.parse_block_statement();
        CatchClause {
            parameter,
            body: Box::new(body),
        }
    }

    fn parse_labelled_statement(&mut self) -> Statement {
        let start = self.position();
        let label = self.consume().value;
        self.consume_token(TokenType::Colon);
        let body = self.parse_statement();
        self.statement(
            start,
            StatementKind::Labelled {
                label,
                body: Box::new(body),
            },
        )
    }
}
