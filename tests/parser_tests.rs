// tests/parser_tests.rs
//
// Integration tests for line segmentation, keyword dispatch, and the
// top-level script parser.

use quill::diagnostics::CollectingSink;
use quill::errors::ErrorKind;
use quill::lines::{next_logical_line, strip_surrounding_braces};
use quill::parser::{parse_script, CommandNode, CommandParams, MAX_BLOCK_DEPTH};
use quill::registry::CommandRegistry;

fn parse_default(source: &str) -> (Vec<CommandNode>, CollectingSink) {
    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let nodes = parse_script(source, &registry, &mut sink).unwrap();
    (nodes, sink)
}

// ---
// Line segmentation
// ---

#[test]
fn simple_lines_split_on_newlines() {
    let split = next_logical_line("msg(\"a\")\nmsg(\"b\")").unwrap();
    assert_eq!(split.line, "msg(\"a\")");
    assert_eq!(split.remainder.as_deref(), Some("msg(\"b\")"));
}

#[test]
fn final_line_has_no_remainder() {
    let split = next_logical_line("  msg(\"a\")  ").unwrap();
    assert_eq!(split.line, "msg(\"a\")");
    assert!(split.remainder.is_none());
}

#[test]
fn multi_line_block_folds_with_braces_kept() {
    let split = next_logical_line("if (x) {\n  msg(\"a\")\n}\nmsg(\"b\")").unwrap();
    assert_eq!(split.line, "if (x) {\n  msg(\"a\")\n}");
    assert_eq!(split.remainder.as_deref(), Some("\nmsg(\"b\")"));
}

#[test]
fn single_line_block_folds_with_braces_dropped() {
    let split = next_logical_line("if (x) { msg(\"a\") }\nmsg(\"b\")").unwrap();
    assert_eq!(split.line, "if (x)  msg(\"a\")");
    assert_eq!(split.remainder.as_deref(), Some("\nmsg(\"b\")"));
}

#[test]
fn comment_before_brace_suppresses_folding() {
    let split = next_logical_line("// opens a block {\nmsg(\"a\")").unwrap();
    assert_eq!(split.line, "// opens a block {");
    assert_eq!(split.remainder.as_deref(), Some("msg(\"a\")"));
}

#[test]
fn brace_inside_literal_does_not_fold() {
    let split = next_logical_line("msg(\"{\")\nmsg(\"b\")").unwrap();
    assert_eq!(split.line, "msg(\"{\")");
    assert_eq!(split.remainder.as_deref(), Some("msg(\"b\")"));
}

#[test]
fn strip_surrounding_braces_removes_one_layer() {
    assert_eq!(strip_surrounding_braces("{ msg(\"a\") }"), " msg(\"a\") ");
    assert_eq!(strip_surrounding_braces("{{ inner }}"), "{ inner }");
    assert_eq!(strip_surrounding_braces("msg(\"a\")"), "msg(\"a\")");
    assert_eq!(strip_surrounding_braces("  { x }  "), " x ");
}

// ---
// Dispatch and fixed-arity commands
// ---

#[test]
fn msg_parses_to_one_node_with_quotes_retained() {
    let (nodes, sink) = parse_default(r#"msg("hello")"#);
    assert!(sink.is_empty());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].keyword, "msg");
    assert_eq!(nodes[0].line, r#"msg("hello")"#);
    assert_eq!(
        nodes[0].params,
        CommandParams::Positional(vec![r#""hello""#.to_string()])
    );
}

#[test]
fn nodes_link_to_their_registry_definition() {
    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let nodes = parse_script(r#"msg("hello")"#, &registry, &mut sink).unwrap();
    let definition = registry.lookup("msg").unwrap();
    assert!(std::sync::Arc::ptr_eq(&nodes[0].definition, definition));
}

#[test]
fn keyword_prefixes_its_raw_line() {
    let (nodes, _) = parse_default("msg(\"a\")\nif (x) { msg(\"b\") }");
    for node in &nodes {
        assert!(node.line.starts_with(&node.keyword));
    }
}

#[test]
fn wrong_parameter_count_fails_with_arity_mismatch() {
    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let error = parse_script(r#"msg("a","b","c")"#, &registry, &mut sink).unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::ArityMismatch {
            keyword: "msg".into(),
            expected: "1".into(),
            actual: 3,
        }
    );
}

#[test]
fn missing_parameter_list_counts_as_zero_parameters() {
    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let error = parse_script("msg", &registry, &mut sink).unwrap_err();
    assert!(matches!(error.kind, ErrorKind::ArityMismatch { actual: 0, .. }));
}

#[test]
fn fixed_arity_accepts_any_declared_count() {
    let mut registry = CommandRegistry::new();
    registry.register_fixed("print", &[1, 2]);
    let mut sink = CollectingSink::new();

    let nodes = parse_script(r#"print("a")
print("a", "b")"#, &registry, &mut sink)
        .unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(
        nodes[1].params,
        CommandParams::Positional(vec![r#""a""#.to_string(), r#""b""#.to_string()])
    );
}

#[test]
fn keyword_requires_word_boundary() {
    let (nodes, sink) = parse_default(r#"ifx("not an if")"#);
    assert!(nodes.is_empty());
    assert_eq!(sink.diagnostics().len(), 1);
}

#[test]
fn longest_matching_keyword_wins() {
    let mut registry = CommandRegistry::new();
    registry.register_fixed("wait", &[0]);
    registry.register_fixed("wait for", &[1]);
    let mut sink = CollectingSink::new();

    let nodes = parse_script("wait for (door)", &registry, &mut sink).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].keyword, "wait for");
    assert_eq!(
        nodes[0].params,
        CommandParams::Positional(vec!["door".to_string()])
    );
}

// ---
// The if command
// ---

#[test]
fn if_parses_expression_and_then_block() {
    let (nodes, sink) = parse_default(r#"if (score>10) { msg("win") }"#);
    assert!(sink.is_empty());
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].keyword, "if");

    let CommandParams::Conditional { expression, then_block } = &nodes[0].params else {
        panic!("expected conditional parameters");
    };
    assert_eq!(expression, "score>10");
    assert_eq!(then_block.len(), 1);
    assert_eq!(then_block[0].keyword, "msg");
    assert_eq!(
        then_block[0].params,
        CommandParams::Positional(vec![r#""win""#.to_string()])
    );
}

#[test]
fn if_with_multi_line_block() {
    let source = "if (lives<1) {\n  msg(\"game over\")\n  msg(\"try again\")\n}\nmsg(\"next\")";
    let (nodes, sink) = parse_default(source);
    assert!(sink.is_empty());
    assert_eq!(nodes.len(), 2);

    let CommandParams::Conditional { expression, then_block } = &nodes[0].params else {
        panic!("expected conditional parameters");
    };
    assert_eq!(expression, "lives<1");
    assert_eq!(then_block.len(), 2);
    assert_eq!(nodes[1].keyword, "msg");
}

#[test]
fn nested_if_blocks_parse_recursively() {
    let source = "if (a) {\n  if (b) {\n    msg(\"both\")\n  }\n}";
    let (nodes, _) = parse_default(source);
    assert_eq!(nodes.len(), 1);

    let CommandParams::Conditional { then_block, .. } = &nodes[0].params else {
        panic!("expected conditional parameters");
    };
    assert_eq!(then_block.len(), 1);
    assert_eq!(then_block[0].keyword, "if");

    let CommandParams::Conditional { expression, then_block } = &then_block[0].params else {
        panic!("expected nested conditional parameters");
    };
    assert_eq!(expression, "b");
    assert_eq!(then_block[0].keyword, "msg");
}

#[test]
fn if_without_condition_fails() {
    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let error = parse_script("if score > 10", &registry, &mut sink).unwrap_err();
    assert!(matches!(error.kind, ErrorKind::MissingElement { .. }));
}

#[test]
fn deeply_nested_blocks_hit_the_recursion_limit() {
    let mut source = String::from("msg(\"deep\")");
    for _ in 0..(MAX_BLOCK_DEPTH + 16) {
        source = format!("if (x) {{\n{source}\n}}");
    }

    let registry = CommandRegistry::with_default_commands();
    let mut sink = CollectingSink::new();
    let error = parse_script(&source, &registry, &mut sink).unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::RecursionLimit { limit: MAX_BLOCK_DEPTH }
    );
}

// ---
// Top-level parser behavior
// ---

#[test]
fn empty_and_whitespace_scripts_parse_to_nothing() {
    for source in ["", "   ", "\n\n\n", "{ }", "{\n}"] {
        let (nodes, sink) = parse_default(source);
        assert!(nodes.is_empty(), "unexpected nodes for {source:?}");
        assert!(sink.is_empty());
    }
}

#[test]
fn surrounding_braces_are_stripped_once() {
    let (nodes, _) = parse_default("{ msg(\"a\") }");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].keyword, "msg");
}

#[test]
fn unknown_command_is_skipped_with_a_diagnostic() {
    let source = "msg(\"a\")\nfrobnicate(\"x\")\nmsg(\"b\")";
    let (nodes, sink) = parse_default(source);

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].params, CommandParams::Positional(vec![r#""a""#.to_string()]));
    assert_eq!(nodes[1].params, CommandParams::Positional(vec![r#""b""#.to_string()]));

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, "frobnicate(\"x\")");
    assert!(diagnostics[0].message.contains("frobnicate"));
}

#[test]
fn structural_errors_abort_the_whole_parse() {
    let registry = CommandRegistry::with_default_commands();

    let mut sink = CollectingSink::new();
    let error = parse_script("foo {", &registry, &mut sink).unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::UnbalancedDelimiter { open: '{', close: '}' }
    );

    let mut sink = CollectingSink::new();
    let error = parse_script("foo \"bar", &registry, &mut sink).unwrap_err();
    assert_eq!(error.kind, ErrorKind::MalformedLiteral);

    let mut sink = CollectingSink::new();
    let error = parse_script("msg(\"a\"\nmsg(\"b\")", &registry, &mut sink).unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::UnbalancedDelimiter { open: '(', close: ')' }
    );
}

#[test]
fn dialect_registries_are_independent() {
    let mut narration = CommandRegistry::new();
    narration.register_fixed("narrate", &[1]);
    let mut sink = CollectingSink::new();

    let nodes = parse_script("narrate(\"dawn\")\nmsg(\"ignored\")", &narration, &mut sink).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].keyword, "narrate");
    assert_eq!(sink.diagnostics().len(), 1);
}

#[test]
fn reparsing_a_raw_line_reproduces_the_node() {
    let source = "msg(\"a\")\nif (x) {\n  msg(\"b\")\n}";
    let (nodes, _) = parse_default(source);
    assert_eq!(nodes.len(), 2);

    for node in &nodes {
        let (reparsed, sink) = parse_default(&node.line);
        assert!(sink.is_empty());
        assert_eq!(reparsed.len(), 1);
        assert_eq!(&reparsed[0], node);
    }
}
