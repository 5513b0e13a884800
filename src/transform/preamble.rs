/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Preamble emitter.
//!
//! Prepends the module-scoped support declarations, in a fixed order and
//! only for the slots some pass actually touched: the seeking variable,
//! the BigInt activation mask, the maybe-not-empty iterator wrappers, and
//! the short-circuit helpers.
//!
//! The snippets are written as source text and run through the crate's own
//! parser; that keeps them in exactly the shape the printer expects.

use crate::ast::{Program, Statement};
use crate::parser::Parser;
use crate::transform::TransformContext;

pub fn emit(program: &mut Program, cx: &mut TransformContext, module_identity: &str) {
    let mut lines: Vec<String> = Vec::new();

    if let Some(seeking) = cx.support.seeking_name() {
        lines.push(format!(
            "let {seeking} = globalThis.debugHooks?.getWhichSeeking({module_identity}) || 0;"
        ));
    }
    if let Some(mask) = cx.support.active_mask_name() {
        lines.push(format!("let {mask} = 0n;"));
    }
    if let Some(name) = cx.support.iterator_values_name() {
        lines.push(format!(
            "function* {name}(items, seeking) {{ \
               for (const item of items) {{ yield item; seeking = false; }} \
               if (seeking) {{ yield {{}}; }} \
             }}"
        ));
    }
    if let Some(name) = cx.support.iterator_keys_name() {
        lines.push(format!(
            "function* {name}(obj, seeking) {{ \
               for (const key in obj) {{ yield key; seeking = false; }} \
               if (seeking) {{ yield \"\"; }} \
             }}"
        ));
    }
    if let Some(name) = cx.support.or_helper_name() {
        lines.push(format!(
            "function {name}(x, y, seeking) {{ \
               if (seeking) {{ const r = y(); return x || r; }} else {{ return x || y(); }} \
             }}"
        ));
    }
    if let Some(name) = cx.support.and_helper_name() {
        lines.push(format!(
            "function {name}(x, y, seeking) {{ \
               if (seeking) {{ const r = y(); return x && r; }} else {{ return x && y(); }} \
             }}"
        ));
    }

    if lines.is_empty() {
        return;
    }
    let statements = parse_snippet(&lines.join("\n"));
    program.body.splice(0..0, statements);
}

/// Parse a synthesized source snippet. Snippets are written by this
/// module, so a parse error here is an internal bug.
fn parse_snippet(source: &str) -> Vec<Statement> {
    let chars: Vec<char> = source.chars().collect();
    let mut parser = Parser::new(&chars);
    let program = parser.parse_program();
    debug_assert!(
        !parser.has_errors(),
        "preamble snippet failed to parse: {source}"
    );
    program.body
}
