/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Diagnostics sink and error types.
//!
//! The transformer reports recoverable problems (malformed initializers,
//! unconsumed initializers, missing arguments) through an injected
//! [`Diagnostics`] sink and still returns output. Only parse failures and
//! internal invariant violations abort the transform.

use thiserror::Error;

/// Where the transformer sends its diagnostics. Mirrors a console:
/// `error` / `warn` / `info` / `log`.
pub trait Diagnostics {
    fn error(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn info(&mut self, message: &str);
    fn log(&mut self, message: &str);
}

/// Default sink: writes to the process console.
#[derive(Debug, Default)]
pub struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn warn(&mut self, message: &str) {
        eprintln!("warn: {message}");
    }

    fn info(&mut self, message: &str) {
        println!("info: {message}");
    }

    fn log(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Sink that keeps everything, for tests and embedders that render
/// diagnostics themselves.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub logs: Vec<String>,
}

impl Diagnostics for CollectedDiagnostics {
    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }
}

#[derive(Debug, Clone, Error)]
#[error("({line}:{column}) {message}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse failed with {} error(s): {}", .0.len(), first_error(.0))]
    Parse(Vec<ParseError>),

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

fn first_error(errors: &[ParseError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
