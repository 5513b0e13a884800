/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! # comehere
//!
//! A source-to-source rewriter for a JavaScript superset with two
//! debugging constructs:
//!
//! - **`COMEHERE` blocks** — labelled `with` statements declaring "if I am
//!   the selected goal, drive control here, bind these variables, and run
//!   this body." The rewriter emits standard JavaScript that is dormant
//!   unless a selector names a goal, in which case every enclosing
//!   construct on the path from module top to the goal is surgically
//!   modified to steer control into it.
//! - **`$$` capture variables** — identifiers that auto-declare themselves
//!   as a `[text, value]` pair and record both the assigned value and the
//!   surface form of the right-hand side, so log statements can print
//!   `expr = value` without manual duplication.
//!
//! ## Architecture
//!
//! ```text
//! Source code
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  Lexer (lexer.rs)                                   │
//! │  Tokenizes source into Token stream                 │
//! └──────────────────────┬──────────────────────────────┘
//!                        │ tokens
//!                        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  Parser (parser.rs + parser/*.rs)                   │
//! │  Recursive descent with precedence climbing         │
//! │  Builds AST (ast.rs)                                │
//! └──────────────────────┬──────────────────────────────┘
//!                        │ AST
//!                        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  Transformer (transform/*.rs)                       │
//! │  normalize → hoist returns → extract goals →        │
//! │  drive control → captures → preamble                │
//! └──────────────────────┬──────────────────────────────┘
//!                        │ AST
//!                        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  Printer (printer.rs)                               │
//! │  Emits standard JavaScript source                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module overview
//!
//! - `lib.rs` — Entry point (public transform API)
//! - `token.rs` — Token types
//! - `lexer.rs` — Tokenizer: source text → Token stream
//! - `parser.rs` — Parser state, helpers, token consumption
//! - `parser/expressions.rs` — Expression parsing (precedence climbing)
//! - `parser/statements.rs` — Statement parsing (if, for, while, etc.)
//! - `parser/declarations.rs` — Functions, classes, variables, modules
//! - `ast.rs` — AST type definitions
//! - `printer.rs` — Code generator: AST → JavaScript source
//! - `diag.rs` — Diagnostics sink and error types
//! - `transform/` — The COMEHERE transformer passes
//!
//! ## Example
//!
//! ```
//! let output = comehere::transform(
//!     "COMEHERE: with (\"reach me\") { log(\"here\"); }",
//! )
//! .unwrap();
//! assert_eq!(output.blocks, vec![Some("reach me".to_string())]);
//! assert!(output.code.contains("seeking_0 == 1"));
//! ```
//!
//! The emitted module reads its goal selection once at load time from
//! `globalThis.debugHooks?.getWhichSeeking(import.meta.url)`; with no hook
//! installed the module behaves exactly like the input.

pub mod ast;
pub mod diag;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod transform;

pub use diag::{CollectedDiagnostics, ConsoleDiagnostics, Diagnostics, ParseError, TransformError};
pub use transform::{transform, transform_with, TransformOptions, TransformOutput};
