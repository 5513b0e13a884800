/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! The COMEHERE transformer: pass orchestration and the public transform
//! surface.
//!
//! Phases run in fixed order over an exclusively-owned AST:
//!
//! 1. block normalizer (`normalize`)
//! 2. return-trailing capture (`hoist_return`)
//! 3. goal extraction (`extract`)
//! 4. control driving, one goal at a time (`drive`)
//! 5. active-frame prologue installation (`drive::install_prologues`)
//! 6. capture-variable pass (`capture`)
//! 7. preamble emission (`preamble`)
//!
//! Diagnostics go to the injected sink and never abort the transform; the
//! only failures are parse errors and internal invariant violations.

pub mod capture;
pub mod drive;
pub mod extract;
pub mod hoist_return;
pub mod names;
pub mod normalize;
pub mod preamble;

use crate::ast::FunctionId;
use crate::diag::{ConsoleDiagnostics, Diagnostics, TransformError};
use crate::parser::Parser;
use crate::printer;

use names::{ActiveFrameRegistry, NamePool, SupportNames};

/// The reserved label introducing a goal block.
pub(crate) const COMEHERE_LABEL: &str = "COMEHERE";

#[derive(Debug, Default, Clone)]
pub struct TransformOptions {
    /// Expression passed to `debugHooks.getWhichSeeking(…)` in the emitted
    /// preamble. Defaults to `import.meta.url`; script (non-module)
    /// embedders can substitute their own identity expression.
    pub module_identity: Option<String>,
}

/// Result of a successful transform: standard host-language source plus
/// the goal descriptions, indexed by goal id minus one.
#[derive(Debug)]
pub struct TransformOutput {
    pub code: String,
    pub blocks: Vec<Option<String>>,
}

/// State shared by the transform passes.
pub(crate) struct TransformContext<'d> {
    pub pool: NamePool,
    pub support: SupportNames,
    pub frames: ActiveFrameRegistry,
    pub diagnostics: &'d mut dyn Diagnostics,
    next_function_id: u32,
}

impl TransformContext<'_> {
    /// Ids for functions synthesized after parsing (wrapper arrows,
    /// delegators); continues the parser's numbering.
    pub fn fresh_function_id(&mut self) -> FunctionId {
        let id = FunctionId(self.next_function_id);
        self.next_function_id += 1;
        id
    }
}

/// Transform with default options, reporting diagnostics to the console.
pub fn transform(source: &str) -> Result<TransformOutput, TransformError> {
    transform_with(
        source,
        &TransformOptions::default(),
        &mut ConsoleDiagnostics,
    )
}

pub fn transform_with(
    source: &str,
    options: &TransformOptions,
    diagnostics: &mut dyn Diagnostics,
) -> Result<TransformOutput, TransformError> {
    let chars: Vec<char> = source.chars().collect();
    let mut parser = Parser::new(&chars);
    let mut program = parser.parse_program();
    if parser.has_errors() {
        return Err(TransformError::Parse(parser.take_errors()));
    }

    let mut cx = TransformContext {
        pool: NamePool::scan(&program),
        support: SupportNames::default(),
        frames: ActiveFrameRegistry::default(),
        diagnostics,
        next_function_id: parser.function_count(),
    };

    normalize::ensure_blocks(&mut program);
    hoist_return::capture_trailing_returns(&mut program, &mut cx.pool);

    let mut goals = extract::extract_goals(&mut program, &mut cx);
    for goal in &mut goals {
        drive::drive_goal(&mut program, goal, &mut cx)?;
    }
    drive::install_prologues(&mut program, &mut cx);

    for goal in &goals {
        for initializer in &goal.initializers {
            if !initializer.consumed {
                cx.diagnostics.error(&format!(
                    "goal {}: unconsumed initializer `{} = {}`",
                    goal.id,
                    initializer.path,
                    printer::print_expression(&initializer.value)
                ));
            }
        }
    }

    capture::rewrite_captures(&mut program);

    let module_identity = options
        .module_identity
        .clone()
        .unwrap_or_else(|| "import.meta.url".to_string());
    preamble::emit(&mut program, &mut cx, &module_identity);

    let code = printer::print(&program);
    let blocks = goals.into_iter().map(|goal| goal.description).collect();
    Ok(TransformOutput { code, blocks })
}
