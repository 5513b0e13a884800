/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! End-to-end transform scenarios.

use comehere::{transform, transform_with, CollectedDiagnostics, TransformOptions};
use indoc::indoc;

fn run(source: &str) -> (String, Vec<Option<String>>, CollectedDiagnostics) {
    let mut diagnostics = CollectedDiagnostics::default();
    let output = transform_with(source, &TransformOptions::default(), &mut diagnostics)
        .expect("transform should succeed");
    (output.code, output.blocks, diagnostics)
}

// =============================================================================
// No goals: the transform is an identity (modulo printing)
// =============================================================================

#[test]
fn module_without_goals_passes_through() {
    let source = indoc! {r#"
        const a = 1;
        function add(x, y) {
          return x + y;
        }
        add(a, 2);
    "#};
    let (code, blocks, diagnostics) = run(source);
    assert_eq!(code, source);
    assert!(blocks.is_empty());
    assert!(diagnostics.errors.is_empty());
    assert!(diagnostics.warnings.is_empty());
}

// =============================================================================
// Scenario: trivial module-level block
// =============================================================================

#[test]
fn trivial_module_level_block() {
    let (code, blocks, diagnostics) = run(r#"COMEHERE: with ("bar") { }"#);
    assert_eq!(blocks, vec![Some("bar".to_string())]);
    assert!(diagnostics.errors.is_empty());

    assert!(
        code.starts_with(
            "let seeking_0 = globalThis.debugHooks?.getWhichSeeking(import.meta.url) || 0;"
        ),
        "got: {code}"
    );
    assert!(code.contains("if (seeking_0 == 1) {"), "got: {code}");
    assert!(code.contains("seeking_0 = 0;"), "got: {code}");
    // One guard for the goal id, and it is the resetting one.
    assert_eq!(code.matches("seeking_0 == 1").count(), 1, "got: {code}");
}

#[test]
fn blocks_align_with_goal_ids() {
    let source = indoc! {r#"
        COMEHERE: with ("first") { }
        COMEHERE: with (_) { }
        COMEHERE: with ("third") { }
    "#};
    let (code, blocks, _) = run(source);
    assert_eq!(
        blocks,
        vec![Some("first".to_string()), None, Some("third".to_string())]
    );
    assert!(code.contains("seeking_0 == 1"), "got: {code}");
    assert!(code.contains("seeking_0 == 2"), "got: {code}");
    assert!(code.contains("seeking_0 == 3"), "got: {code}");
}

// =============================================================================
// Scenario: recursive function with activation frame
// =============================================================================

#[test]
fn recursive_function_gets_activation_frame() {
    let source = indoc! {r#"
        function f(n) {
          if (n <= 1) {
            return 1;
          }
          f(n - 2);
          f(n - 1);
          COMEHERE: with (n = 10) {
            log(n);
          }
        }
    "#};
    let (code, blocks, diagnostics) = run(source);
    assert_eq!(blocks, vec![None]);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);

    // Prologue: read and clear this frame's bit on entry.
    assert!(
        code.contains("const active_1 = activeFrames_3 >> 1n & 1n;"),
        "got: {code}"
    );
    assert!(code.contains("activeFrames_3 &= ~(1n << 1n);"), "got: {code}");
    // The guard is conjoined with the frame flag.
    assert!(
        code.contains("if (active_1 && seeking_0 == 1) {"),
        "got: {code}"
    );
    // Synthesized call after the declaration, argument from the
    // initializer, bit set inside the try, seek reset in finally.
    assert!(code.contains("if (seeking_0 == 1) {"), "got: {code}");
    assert!(
        code.contains("const callee_2 = f, n = 10;"),
        "got: {code}"
    );
    assert!(code.contains("activeFrames_3 |= 1n << 1n;"), "got: {code}");
    assert!(code.contains("callee_2(n);"), "got: {code}");
    assert!(code.contains("} finally {"), "got: {code}");
    // Preamble declares the mask as a BigInt.
    assert!(code.contains("let activeFrames_3 = 0n;"), "got: {code}");
}

// =============================================================================
// Scenario: switch with the goal in a middle case
// =============================================================================

#[test]
fn switch_goal_reroutes_discriminant() {
    let source = indoc! {r#"
        const x = 3;
        switch (x) {
          case 1:
            log("one");
            break;
          case 2:
            log("two");
            COMEHERE: with (_) {
              log("reached");
            }
            break;
          case 3:
            log("three");
            break;
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);

    assert!(code.contains("const token_1 = {};"), "got: {code}");
    assert!(code.contains("const snapshot_2 = x;"), "got: {code}");
    assert!(
        code.contains("switch (seeking_0 == 1 ? token_1 : snapshot_2) {"),
        "got: {code}"
    );
    // Original case label kept (now empty, falling through), sentinel case
    // right after it absorbing the statements.
    assert!(code.contains("case 2:"), "got: {code}");
    assert!(code.contains("case token_1:"), "got: {code}");
    let case_two = code.find("case 2:").unwrap();
    let sentinel = code.find("case token_1:").unwrap();
    let case_three = code.find("case 3:").unwrap();
    assert!(case_two < sentinel && sentinel < case_three, "got: {code}");
    assert!(code.contains("log(\"two\");"), "got: {code}");
}

// =============================================================================
// Scenario: try/catch with a synthesized throw
// =============================================================================

#[test]
fn catch_goal_throws_supplied_error() {
    let source = indoc! {r#"
        try {
          risky();
        } catch (e) {
          COMEHERE: with (e = new Error("x")) {
            log(e.message);
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);

    // The try block starts with the guarded throw of the initializer.
    let throw_at = code
        .find("throw new Error(\"x\");")
        .expect("guarded throw emitted");
    let risky_at = code.find("risky();").unwrap();
    assert!(throw_at < risky_at, "throw must precede try body: {code}");
}

#[test]
fn catch_goal_without_initializer_synthesizes_error() {
    let source = indoc! {r#"
        try {
          risky();
        } catch (e) {
          COMEHERE: with (_) { }
        }
    "#};
    let (code, _, _) = run(source);
    assert!(
        code.contains("throw new Error(\"synthesized\");"),
        "got: {code}"
    );
}

// =============================================================================
// Scenario: class method with class-qualified `this` initializers
// =============================================================================

#[test]
fn class_method_constructs_receiver_from_this_initializers() {
    let source = indoc! {r#"
        class C {
          constructor(x, y) {
            this.x = x;
            this.y = y;
          }
          method(n) {
            COMEHERE: with (C.this.x = 1, C.this.y = 2, n = 3) {
              log(this.x + this.y + n);
            }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);

    assert!(
        code.contains("const n = 3, x = 1, y = 2;"),
        "got: {code}"
    );
    assert!(code.contains("new C(x, y).method(n);"), "got: {code}");
    // The call block sits after the class declaration.
    let class_at = code.find("class C {").unwrap();
    let call_at = code.find("new C(x, y).method(n);").unwrap();
    assert!(class_at < call_at, "got: {code}");
    // The method (not the constructor) carries the frame prologue.
    assert!(code.contains("const active_1"), "got: {code}");
}

#[test]
fn constructor_goal_uses_new_directly() {
    let source = indoc! {r#"
        class K {
          constructor(v) {
            COMEHERE: with (K.constructor.v = 5) {
              log(v);
            }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("const v = 5;"), "got: {code}");
    assert!(code.contains("new K(v);"), "got: {code}");
    assert!(!code.contains(".constructor("), "got: {code}");
}

#[test]
fn static_method_uses_class_as_receiver() {
    let source = indoc! {r#"
        class S {
          static make(v) {
            COMEHERE: with (S.make.v = 7) { }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("const v = 7;"), "got: {code}");
    assert!(code.contains("S.make(v);"), "got: {code}");
}

// =============================================================================
// Scenario: capture + return-trailing goal
// =============================================================================

#[test]
fn goal_after_return_observes_returned_value() {
    let source = indoc! {r#"
        function calc(a, b, c) {
          return (a + b) * c;
          COMEHERE: with (a = 1, b = 2, c = 3) {
            log(Function.return);
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);

    assert!(code.contains("let returned_0;"), "got: {code}");
    assert!(
        code.contains("return returned_0 = (a + b) * c;"),
        "got: {code}"
    );
    assert!(code.contains("} finally {"), "got: {code}");
    assert!(code.contains("log(returned_0);"), "got: {code}");
    assert!(!code.contains("Function.return"), "got: {code}");
    assert!(
        code.contains("const callee_3 = calc, a = 1, b = 2, c = 3;"),
        "got: {code}"
    );
}

// =============================================================================
// Boundary behaviours
// =============================================================================

#[test]
fn empty_initializer_list_produces_zero_argument_call() {
    let source = indoc! {r#"
        function g() {
          COMEHERE: with (_) {
            log(1);
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty());
    assert!(diagnostics.warnings.is_empty());
    assert!(code.contains("callee_2();"), "got: {code}");
}

#[test]
fn generator_invocation_is_stepped_once() {
    let source = indoc! {r#"
        function* gen() {
          yield 1;
          COMEHERE: with (_) { }
        }
    "#};
    let (code, _, _) = run(source);
    assert!(code.contains("callee_2().next();"), "got: {code}");
}

#[test]
fn loop_tests_are_extended_with_the_guard() {
    let source = indoc! {r#"
        let i = 0;
        while (i > 0) {
          COMEHERE: with (_) {
            log(i);
          }
        }
    "#};
    let (code, _, _) = run(source);
    assert!(
        code.contains("while (i > 0 || seeking_0 == 1) {"),
        "got: {code}"
    );
}

#[test]
fn if_arms_are_steered_by_the_guard() {
    let source = indoc! {r#"
        if (cond()) {
          COMEHERE: with ("then") { }
        } else {
          COMEHERE: with ("else") { }
        }
    "#};
    let (code, blocks, _) = run(source);
    assert_eq!(blocks.len(), 2);
    // Goal 1 in the then-arm: test || G(1). Goal 2 in the else-arm:
    // (…) && seek != 2.
    assert!(
        code.contains("if ((cond() || seeking_0 == 1) && seeking_0 != 2) {"),
        "got: {code}"
    );
}

#[test]
fn for_of_iterable_is_wrapped() {
    let source = indoc! {r#"
        for (const item of items) {
          COMEHERE: with (_) {
            log(item);
          }
        }
    "#};
    let (code, _, _) = run(source);
    assert!(
        code.contains("for (const item of maybeNotEmptyIterator_1(items, seeking_0 == 1)) {"),
        "got: {code}"
    );
    assert!(
        code.contains("function* maybeNotEmptyIterator_1(items, seeking) {"),
        "got: {code}"
    );
}

#[test]
fn for_in_becomes_key_iteration_over_values() {
    let source = indoc! {r#"
        for (const key in table) {
          COMEHERE: with (_) {
            log(key);
          }
        }
    "#};
    let (code, _, _) = run(source);
    assert!(
        code.contains("for (const key of maybeNotEmptyKeyIterator_1(table, seeking_0 == 1)) {"),
        "got: {code}"
    );
    assert!(code.contains("yield \"\";"), "got: {code}");
}

#[test]
fn short_circuit_right_operand_uses_helper() {
    let source = indoc! {r#"
        const r = flag || (() => {
          COMEHERE: with (_) { }
          return 1;
        })();
    "#};
    let (code, _, _) = run(source);
    assert!(code.contains("or_"), "helper expected: {code}");
    assert!(
        code.contains("function or_"),
        "helper definition expected: {code}"
    );
}

#[test]
fn function_expression_is_wrapped_not_moved() {
    let source = indoc! {r#"
        const f = function inner(k) {
          COMEHERE: with (inner.k = 4) { }
        };
        f(9);
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    // The expression is received by a wrapper arrow and returned unchanged.
    assert!(code.contains("((callee_2) => {"), "got: {code}");
    assert!(code.contains("return callee_2;"), "got: {code}");
    assert!(code.contains("const k = 4;"), "got: {code}");
    assert!(code.contains("})(function inner(k) {"), "got: {code}");
}

#[test]
fn object_literal_method_is_invoked_through_the_receiver() {
    let source = indoc! {r#"
        const counter = {
          bump(by) {
            COMEHERE: with (bump.by = 2) { }
          }
        };
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("((obj_2) => {"), "got: {code}");
    assert!(code.contains("obj_2.bump(by);"), "got: {code}");
    assert!(code.contains("return obj_2;"), "got: {code}");
}

#[test]
fn computed_method_key_gets_stable_delegator() {
    let source = indoc! {r#"
        class D {
          [key()](n) {
            COMEHERE: with (n = 6) { }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    // Original member forwards through the fresh stable key.
    assert!(code.contains("[key()](...args_"), "got: {code}");
    assert!(code.contains("return this.method_"), "got: {code}");
    assert!(code.contains(".method_"), "got: {code}");
}

#[test]
fn getter_goal_reads_the_property() {
    let source = indoc! {r#"
        const probe = { ready: true };
        class G {
          get value() {
            COMEHERE: with (G.this = probe) { }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("probe.value;"), "got: {code}");
    assert!(code.contains("activeFrames_2 |= 1n << 1n;"), "got: {code}");
}

#[test]
fn setter_goal_writes_the_property() {
    let source = indoc! {r#"
        const target = {};
        class S {
          set level(v) {
            COMEHERE: with (S.this = target, S.level.v = 9) { }
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("const v = 9;"), "got: {code}");
    assert!(code.contains("target.level = v;"), "got: {code}");
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn nullish_right_operand_is_an_unsupported_context() {
    let source = indoc! {r#"
        const r = a ?? (() => {
          COMEHERE: with (_) { }
          return 1;
        })();
    "#};
    let (_, blocks, diagnostics) = run(source);
    assert_eq!(blocks.len(), 1);
    assert_eq!(diagnostics.errors.len(), 1, "{:?}", diagnostics.errors);
    assert!(
        diagnostics.errors[0].contains("unsupported enclosing context"),
        "{:?}",
        diagnostics.errors
    );
}

#[test]
fn malformed_initializers_are_reported_and_skipped() {
    let (_, blocks, diagnostics) = run(r#"COMEHERE: with (f(x)) { }"#);
    assert_eq!(blocks, vec![None]);
    assert_eq!(diagnostics.errors.len(), 1, "{:?}", diagnostics.errors);
    assert!(
        diagnostics.errors[0].contains("f(x)"),
        "{:?}",
        diagnostics.errors
    );
}

#[test]
fn unconsumed_initializers_are_reported_after_driving() {
    let (_, _, diagnostics) = run(r#"COMEHERE: with (z = 1 + 2) { }"#);
    assert_eq!(diagnostics.errors.len(), 1, "{:?}", diagnostics.errors);
    assert!(diagnostics.errors[0].contains("z"), "{:?}", diagnostics.errors);
    assert!(
        diagnostics.errors[0].contains("1 + 2"),
        "{:?}",
        diagnostics.errors
    );
}

#[test]
fn missing_argument_without_default_warns_with_hint() {
    let source = indoc! {r#"
        function h(q) {
          COMEHERE: with (_) { }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert_eq!(diagnostics.warnings.len(), 1, "{:?}", diagnostics.warnings);
    assert!(
        diagnostics.warnings[0].contains("h.q"),
        "{:?}",
        diagnostics.warnings
    );
    assert!(code.contains("callee_2();"), "got: {code}");
}

#[test]
fn defaulted_parameter_stays_silent() {
    let source = indoc! {r#"
        function h(q = 1) {
          COMEHERE: with (_) { }
        }
    "#};
    let (_, _, diagnostics) = run(source);
    assert!(diagnostics.warnings.is_empty(), "{:?}", diagnostics.warnings);
}

#[test]
fn parse_errors_fail_the_transform() {
    let error = transform("let = ;").unwrap_err();
    let message = error.to_string();
    assert!(message.contains("parse failed"), "got: {message}");
}

// =============================================================================
// Capture variables through the full pipeline
// =============================================================================

#[test]
fn capture_variables_autodeclare_and_record_text() {
    let source = indoc! {r#"
        const a = 2, b = 3;
        $$product = a * b;
        console.log(...$$product);
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty());
    assert!(
        code.contains("const $$product = [\"\", void 0];"),
        "got: {code}"
    );
    assert!(
        code.contains("$$product[0] = \"a * b =\", $$product[1] = a * b"),
        "got: {code}"
    );
    assert!(code.contains("console.log(...$$product);"), "got: {code}");
}

#[test]
fn capture_inside_goal_body_works_with_driving() {
    let source = indoc! {r#"
        function measure(n) {
          COMEHERE: with (n = 4) {
            $$sq = n * n;
            log(...$$sq);
          }
        }
    "#};
    let (code, _, diagnostics) = run(source);
    assert!(diagnostics.errors.is_empty(), "{:?}", diagnostics.errors);
    assert!(code.contains("const $$sq = [\"\", void 0];"), "got: {code}");
    assert!(code.contains("$$sq[0] = \"n * n =\""), "got: {code}");
    assert!(code.contains("log(...$$sq);"), "got: {code}");
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn module_identity_is_configurable() {
    let mut diagnostics = CollectedDiagnostics::default();
    let options = TransformOptions {
        module_identity: Some("__filename".to_string()),
    };
    let output =
        transform_with(r#"COMEHERE: with (_) { }"#, &options, &mut diagnostics).unwrap();
    assert!(
        output
            .code
            .contains("getWhichSeeking(__filename) || 0;"),
        "got: {}",
        output.code
    );
}
