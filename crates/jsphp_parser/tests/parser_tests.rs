//! Parser integration tests.
//!
//! Verifies tree shapes, scope resolution and error reporting.

use jsphp_ast::node::*;
use jsphp_ast::scope::ScopeId;
use jsphp_diagnostics::{CompileError, ErrorKind};
use jsphp_options::CompilerOptions;
use jsphp_parser::{parse, ParsedUnit};

/// Helper: parse source text, panicking on error.
fn parse_ok(source: &str) -> ParsedUnit {
    match parse("test.js", source, &CompilerOptions::default()) {
        Ok(unit) => unit,
        Err(err) => panic!("source: {}\nerror: {}", source, err),
    }
}

/// Helper: parse source text that must fail.
fn parse_err(source: &str) -> CompileError {
    match parse("test.js", source, &CompilerOptions::default()) {
        Ok(unit) => panic!("source: {}\nunexpectedly parsed: {:?}", source, unit.root.body),
        Err(err) => err,
    }
}

/// Helper: the single top-level statement.
fn single(source: &str) -> Node {
    let mut unit = parse_ok(source);
    assert_eq!(unit.root.body.len(), 1, "source: {}", source);
    unit.root.body.remove(0)
}

fn variable(node: &Node) -> &Variable {
    node.as_variable().unwrap_or_else(|| panic!("expected variable, got {:?}", node))
}

fn block(node: &Node) -> &Block {
    node.as_block().unwrap_or_else(|| panic!("expected block, got {:?}", node))
}

// ============================================================================
// Literals and variables
// ============================================================================

#[test]
fn test_empty_source() {
    let unit = parse_ok("");
    assert!(unit.root.body.is_empty());
    assert_eq!(unit.root.kind, BlockKind::Main);
}

#[test]
fn test_translated_constants() {
    let unit = parse_ok("Infinity; NaN; undefined; Math.PI");
    let values: Vec<_> = unit
        .root
        .body
        .iter()
        .map(|node| match node {
            Node::Constant(c) => c.value.as_str(),
            other => panic!("expected constant, got {:?}", other),
        })
        .collect();
    assert_eq!(values, vec!["INF", "NAN", "null", "M_PI"]);
}

#[test]
fn test_access_chain() {
    let node = single("a.b[c].d");
    let var = variable(&node);
    assert_eq!(var.name, "a");
    assert_eq!(var.chain.len(), 3);
    assert!(matches!(&var.chain[0], Access::Property(c) if c.value == "'b'"));
    assert!(matches!(&var.chain[1], Access::Index(Node::Variable(v)) if v.name == "c"));
    assert!(matches!(&var.chain[2], Access::Property(c) if c.value == "'d'"));
}

#[test]
fn test_keyword_property_names() {
    let node = single("a.default.if");
    assert_eq!(variable(&node).chain.len(), 2);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_binary_operators_fold_in_encounter_order() {
    let node = single("a * b + c");
    let Node::Dyiade(outer) = node else { panic!("expected dyiade") };
    assert_eq!(outer.operator, "*");
    assert_eq!(variable(&outer.left).name, "a");
    let Node::Dyiade(inner) = *outer.right else { panic!("expected nested dyiade") };
    assert_eq!(inner.operator, "+");
    assert_eq!(variable(&inner.left).name, "b");
    assert_eq!(variable(&inner.right).name, "c");
}

#[test]
fn test_call_with_arguments() {
    let node = single("f(a, 1)");
    let Node::FunctionCall(call) = node else { panic!("expected call") };
    assert_eq!(variable(&call.callee).name, "f");
    assert_eq!(call.arguments.len(), 2);
}

#[test]
fn test_chained_calls() {
    let node = single("f(a)(b)");
    let Node::FunctionCall(outer) = node else { panic!("expected call") };
    assert!(matches!(*outer.callee, Node::FunctionCall(_)));
}

#[test]
fn test_prefix_unary_binds_to_call() {
    let node = single("!f(x) && y");
    let Node::Dyiade(dyiade) = node else { panic!("expected dyiade") };
    assert_eq!(dyiade.operator, "&&");
    let Node::Unary(unary) = *dyiade.left else { panic!("expected unary") };
    assert_eq!(unary.operator, "!");
    assert_eq!(unary.fixity, Fixity::Prefix);
    assert!(matches!(*unary.operand, Node::FunctionCall(_)));
}

#[test]
fn test_typeof_comparison() {
    let node = single("typeof a === 'string'");
    let Node::Dyiade(dyiade) = node else { panic!("expected dyiade") };
    assert!(matches!(*dyiade.left, Node::Unary(ref u) if u.operator == "typeof"));
}

#[test]
fn test_postfix_increment() {
    let node = single("i++");
    let Node::Unary(unary) = node else { panic!("expected unary") };
    assert_eq!(unary.fixity, Fixity::Postfix);
    assert_eq!(unary.operator, "++");
}

#[test]
fn test_increment_requires_assignable() {
    let err = parse_err("1++");
    assert!(err.is(ErrorKind::NonAssignableTarget));
    let err = parse_err("++f()");
    assert!(err.is(ErrorKind::NonAssignableTarget));
}

#[test]
fn test_value_after_value_is_unexpected() {
    let err = parse_err("a b");
    assert!(err.is(ErrorKind::UnexpectedToken));
    assert_eq!(err.code, 8);
}

#[test]
fn test_newline_separates_statements() {
    let unit = parse_ok("a = 1\nb = 2\n!c");
    assert_eq!(unit.root.body.len(), 3);
}

#[test]
fn test_increment_on_new_line_prefixes_next_statement() {
    let unit = parse_ok("a\n++b");
    assert_eq!(unit.root.body.len(), 2);
    assert_eq!(variable(&unit.root.body[0]).name, "a");
    let Node::Unary(unary) = &unit.root.body[1] else { panic!("expected unary, got {:?}", unit.root.body[1]) };
    assert_eq!(unary.operator, "++");
    assert_eq!(unary.fixity, Fixity::Prefix);
    assert_eq!(variable(&unary.operand).name, "b");
}

#[test]
fn test_postfix_increment_on_same_line() {
    let Node::Unary(unary) = single("a++") else { panic!("expected unary") };
    assert_eq!(unary.fixity, Fixity::Postfix);
}

#[test]
fn test_missing_right_operand() {
    let err = parse_err("a +");
    assert!(err.is(ErrorKind::MissingValue));
    assert_eq!(err.code, 20);
    assert!(err.message.contains("'+'"));
}

// ============================================================================
// Ternaries
// ============================================================================

#[test]
fn test_chained_ternary_nests_right() {
    let node = single("a ? b : c ? d : e");
    let Node::Ternary(outer) = node else { panic!("expected ternary") };
    assert_eq!(variable(&outer.condition).name, "a");
    assert_eq!(variable(&outer.then_value).name, "b");
    let Node::Ternary(inner) = *outer.else_value else { panic!("expected nested ternary") };
    assert_eq!(variable(&inner.condition).name, "c");
}

#[test]
fn test_ternary_without_colon() {
    let err = parse_err("a ? b");
    assert!(err.is(ErrorKind::MalformedTernary));
    assert_eq!(err.code, 14);
}

#[test]
fn test_ternary_wrong_separator() {
    let err = parse_err("a ? b , c");
    assert!(err.is(ErrorKind::MalformedTernary));
    assert_eq!(err.code, 15);
}

#[test]
fn test_ternary_without_else() {
    let err = parse_err("a ? b :");
    assert!(err.is(ErrorKind::MalformedTernary));
    assert_eq!(err.code, 16);
}

// ============================================================================
// Assignments
// ============================================================================

#[test]
fn test_assign_to_constant_fails() {
    let err = parse_err("1 = 2");
    assert!(err.is(ErrorKind::NonAssignableTarget));
    assert_eq!(err.code, 9);
    assert_eq!(err.message, "Number 1 is not assignable.");
}

#[test]
fn test_assign_to_access_chain() {
    let node = single("a.b = 2");
    let Node::Assignation(assignation) = node else { panic!("expected assignation") };
    assert_eq!(assignation.operator, "=");
    assert_eq!(variable(&assignation.target).chain.len(), 1);
}

#[test]
fn test_compound_assignment() {
    let node = single("a += 2");
    assert!(matches!(node, Node::Assignation(ref a) if a.operator == "+="));
}

#[test]
fn test_assign_to_call_fails() {
    let err = parse_err("f() = 1");
    assert!(err.is(ErrorKind::NonAssignableTarget));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_ordered_array() {
    let node = single("[1, 2, 3]");
    let Node::OrderedArray(array) = node else { panic!("expected array") };
    let keys: Vec<_> = array.entries().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![0, 1, 2]);
}

#[test]
fn test_keyed_array_keeps_key_order() {
    let node = single("x = {b: 1, a: 2, if: 3, 'q': 4, 5: 6}");
    let Node::Assignation(assignation) = node else { panic!("expected assignation") };
    let Node::KeyedArray(array) = *assignation.value else { panic!("expected keyed array") };
    let keys: Vec<_> = array.entries.iter().map(|(k, _)| k.value.as_str()).collect();
    assert_eq!(keys, vec!["'b'", "'a'", "'if'", "'q'", "5"]);
}

#[test]
fn test_keyed_array_missing_value() {
    let err = parse_err("x = {a");
    assert!(err.is(ErrorKind::MissingValue));
    assert_eq!(err.code, 12);
}

#[test]
fn test_unterminated_arrays() {
    let err = parse_err("[1, 2");
    assert!(err.is(ErrorKind::UnterminatedGroup));
    assert_eq!(err.code, 6);
    let err = parse_err("x = {a: 1");
    assert!(err.is(ErrorKind::UnterminatedGroup));
    assert_eq!(err.code, 7);
    assert_eq!(err.location.column, 5);
}

#[test]
fn test_unterminated_parenthesis_reports_opening() {
    let err = parse_err("x = (a, b");
    assert!(err.is(ErrorKind::UnterminatedGroup));
    assert_eq!(err.code, 5);
    assert_eq!((err.location.line, err.location.column), (1, 5));
}

#[test]
fn test_unterminated_index() {
    let err = parse_err("a[b");
    assert!(err.is(ErrorKind::UnterminatedGroup));
    assert_eq!(err.location.column, 2);
}

// ============================================================================
// Scopes
// ============================================================================

#[test]
fn test_let_resolves_every_reference() {
    let unit = parse_ok("let x; x = 1; x + 2");
    let main = unit.root.scope;
    assert_eq!(unit.root.body.len(), 3);
    let references: Vec<&Variable> = unit
        .root
        .body
        .iter()
        .flat_map(jsphp_ast::visitor::collect_variables)
        .collect();
    assert_eq!(references.len(), 3);
    assert!(references.iter().all(|v| v.name == "x" && v.scope == Some(main)));
}

#[test]
fn test_undeclared_variable_has_no_scope() {
    let node = single("x");
    assert_eq!(variable(&node).scope, None);
}

#[test]
fn test_var_does_not_declare() {
    let unit = parse_ok("var y = 1; y");
    assert_eq!(unit.root.body.len(), 2);
    assert_eq!(variable(&unit.root.body[1]).scope, None);
}

#[test]
fn test_let_list() {
    let unit = parse_ok("let a = 1, b; a + b");
    assert_eq!(unit.root.body.len(), 3);
    let names: Vec<_> = unit.scopes.get(unit.root.scope).map(|s| s.names().collect()).unwrap_or_default();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_let_requires_variable() {
    let err = parse_err("let 1");
    assert!(err.is(ErrorKind::UnexpectedToken));
}

#[test]
fn test_block_local_declaration_does_not_leak() {
    let unit = parse_ok("if (a) { let x = 1; } x");
    let outer = variable(&unit.root.body[1]);
    assert_eq!(outer.scope, None);
}

#[test]
fn test_for_header_declaration_is_loop_scoped() {
    let unit = parse_ok("for (let i = 0; i < n; i++) { f(i) }");
    let for_block = block(&unit.root.body[0]);
    assert_eq!(for_block.kind, BlockKind::For);
    let Some(Node::Parenthesis(header)) = for_block.header.as_deref() else {
        panic!("expected header")
    };
    assert_eq!(header.separator, Separator::Semicolon);
    assert_eq!(header.items.len(), 3);
    let Node::Assignation(init) = &header.items[0] else { panic!("expected init") };
    assert_eq!(variable(&init.target).scope, Some(for_block.scope));
}

#[test]
fn test_end_to_end_scenario() {
    let unit = parse_ok("let total = 0; total = total + price;");
    let outer: ScopeId = unit.root.scope;
    assert!(unit.scopes.declares(outer, "total"));
    assert_eq!(unit.root.body.len(), 2);

    let Node::Assignation(init) = &unit.root.body[0] else { panic!("expected init") };
    assert!(matches!(&*init.value, Node::Constant(c) if c.value == "0"));

    let Node::Assignation(update) = &unit.root.body[1] else { panic!("expected update") };
    assert_eq!(variable(&update.target).scope, Some(outer));
    let Node::Dyiade(sum) = &*update.value else { panic!("expected dyiade") };
    assert_eq!(sum.operator, "+");
    assert_eq!(variable(&sum.left).name, "total");
    assert_eq!(variable(&sum.left).scope, Some(outer));
    assert_eq!(variable(&sum.right).name, "price");
    assert_eq!(variable(&sum.right).scope, None);
}

// ============================================================================
// Keyword blocks
// ============================================================================

#[test]
fn test_if_else_chain() {
    let unit = parse_ok("if (a) { b } else if (c) d; else { e }");
    assert_eq!(unit.root.body.len(), 2);
    let else_block = block(&unit.root.body[1]);
    assert_eq!(else_block.kind, BlockKind::Else);
    assert!(!else_block.delimited);
    let kinds: Vec<_> = else_block.body.iter().map(|n| block(n).kind.clone()).collect();
    assert_eq!(kinds, vec![BlockKind::If, BlockKind::Else]);
}

#[test]
fn test_if_requires_parentheses() {
    let err = parse_err("if a { b }");
    assert!(err.is(ErrorKind::MalformedKeywordBlock));
    assert_eq!(err.code, 17);
}

#[test]
fn test_else_forbids_parentheses() {
    let err = parse_err("if (a) b; else (c) d");
    assert!(err.is(ErrorKind::MalformedKeywordBlock));
    assert_eq!(err.code, 18);
}

#[test]
fn test_return_value_is_optional() {
    let unit = parse_ok("function f() { if (a) return; return b + 1 }");
    let function = block(&unit.root.body[0]);
    assert_eq!(function.name.as_deref(), Some("f"));
    let if_block = block(&function.body[0]);
    assert!(block(&if_block.body[0]).header.is_none());
    let ret = block(&function.body[1]);
    assert_eq!(ret.kind, BlockKind::Return);
    assert!(matches!(ret.header.as_deref(), Some(Node::Dyiade(_))));
}

#[test]
fn test_switch_case_default() {
    let unit = parse_ok("switch (x) { case 1: a(); break; default: b() }");
    let switch = block(&unit.root.body[0]);
    let kinds: Vec<_> = switch
        .body
        .iter()
        .map(|n| match n {
            Node::Block(b) => b.kind.keyword().to_string(),
            _ => "expr".to_string(),
        })
        .collect();
    assert_eq!(kinds, vec!["case", "expr", "break", "default", "expr"]);
}

#[test]
fn test_case_without_colon() {
    let err = parse_err("switch (x) { case 1; }");
    assert!(err.is(ErrorKind::MalformedKeywordBlock));
    assert_eq!(err.code, 21);
}

#[test]
fn test_default_without_colon() {
    let err = parse_err("switch (x) { default a }");
    assert!(err.is(ErrorKind::MalformedKeywordBlock));
    assert_eq!(err.code, 22);
}

#[test]
fn test_do_while() {
    let unit = parse_ok("do { i++ } while (i < 3)");
    assert_eq!(unit.root.body.len(), 1);
    let do_block = block(&unit.root.body[0]);
    assert_eq!(do_block.kind, BlockKind::Do);
    assert!(do_block.header.is_some());
}

#[test]
fn test_try_catch_finally() {
    let unit = parse_ok("try { a() } catch (e) { b(e) } finally { c() }");
    let kinds: Vec<_> = unit.root.body.iter().map(|n| block(n).kind.clone()).collect();
    assert_eq!(kinds, vec![BlockKind::Try, BlockKind::Catch, BlockKind::Finally]);
}

#[test]
fn test_generic_keyword() {
    let node = single("yield x");
    let generic = block(&node);
    assert_eq!(generic.kind, BlockKind::Keyword("yield".to_string()));
    assert_eq!(generic.body.len(), 1);
}

#[test]
fn test_unterminated_block() {
    let err = parse_err("if (a) {\n  b = 1");
    assert!(err.is(ErrorKind::UnterminatedGroup));
    assert_eq!(err.code, 7);
    assert_eq!((err.location.line, err.location.column), (1, 8));
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_err("a }");
    assert!(err.is(ErrorKind::UnexpectedToken));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_anonymous_function() {
    let node = single("f = function (a, b) { return a }");
    let Node::Assignation(assignation) = node else { panic!("expected assignation") };
    let function = block(&assignation.value);
    assert_eq!(function.kind, BlockKind::Function);
    assert_eq!(function.parameters().len(), 2);
    assert!(function.name.is_none());
}

#[test]
fn test_named_function_statement_takes_no_continuation() {
    let unit = parse_ok("function f() {} f()");
    assert_eq!(unit.root.body.len(), 2);
}

#[test]
fn test_lambda_forms() {
    let node = single("map(x => x * 2)");
    let Node::FunctionCall(call) = node else { panic!("expected call") };
    let lambda = block(&call.arguments[0]);
    assert_eq!(lambda.parameters().len(), 1);
    assert_eq!(block(&lambda.body[0]).kind, BlockKind::Return);

    let node = single("(a, b) => { return a }");
    let lambda = block(&node);
    assert_eq!(lambda.parameters().len(), 2);
    assert!(lambda.delimited);
}

#[test]
fn test_parenthesized_group_is_not_a_lambda() {
    let node = single("(a + b) * c");
    let Node::Dyiade(dyiade) = node else { panic!("expected dyiade") };
    assert!(matches!(*dyiade.left, Node::Parenthesis(ref p) if p.items.len() == 1));
}

#[test]
fn test_function_requires_parameter_list() {
    let err = parse_err("function f { }");
    assert!(err.is(ErrorKind::UnexpectedToken));
    assert!(err.message.contains("'('"));
}

// ============================================================================
// Tokenizer errors surface through the parser
// ============================================================================

#[test]
fn test_reserved_prefix_through_parser() {
    let err = parse_err("a = __jpv_x");
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
}

#[test]
fn test_unrecognized_token_through_parser() {
    let err = parse_err("a = @b");
    assert!(err.is(ErrorKind::UnrecognizedToken));
}
