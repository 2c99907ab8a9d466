//! Scanner integration tests.
//!
//! Verifies tokenization of the source language and the reserved-prefix checks.

use jsphp_ast::syntax_kind::TokenKind;
use jsphp_diagnostics::{CompileError, ErrorKind};
use jsphp_options::ReservedPrefixes;
use jsphp_scanner::{Scanner, TokenStream};

/// Helper: scan all tokens (neutral included) as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, String)> {
    Scanner::new("test.js", source, ReservedPrefixes::default())
        .map(|token| {
            let token = token.expect("scan should succeed");
            (token.kind, token.value().to_string())
        })
        .collect()
}

/// Helper: scan meaningful token kinds through the lookahead buffer.
fn meaningful_kinds(source: &str) -> Vec<TokenKind> {
    let mut stream = TokenStream::new(Scanner::new("test.js", source, ReservedPrefixes::default()));
    let mut kinds = Vec::new();
    while let Some(token) = stream.consume().expect("scan should succeed") {
        kinds.push(token.kind);
    }
    kinds
}

/// Helper: scan until the first error.
fn scan_error(source: &str, prefixes: ReservedPrefixes) -> CompileError {
    Scanner::new("test.js", source, prefixes)
        .find_map(Result::err)
        .expect("scan should fail")
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    let tokens = scan_all("   \t  ");
    assert!(tokens.is_empty());
}

#[test]
fn test_newlines_are_tokens() {
    let tokens = scan_all("a\nb");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![TokenKind::Variable, TokenKind::Newline, TokenKind::Variable]);
}

#[test]
fn test_let_statement() {
    let tokens = scan_all("let x = 1;");
    assert_eq!(
        tokens,
        vec![
            (TokenKind::Keyword, "let".to_string()),
            (TokenKind::Variable, "x".to_string()),
            (TokenKind::Operator, "=".to_string()),
            (TokenKind::Number, "1".to_string()),
            (TokenKind::Punctuation, ";".to_string()),
        ]
    );
}

#[test]
fn test_constant_translation() {
    let tokens = scan_all("Infinity NaN undefined Math.PI true null E_ALL");
    let values: Vec<_> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["INF", "NAN", "null", "M_PI", "true", "null", "E_ALL"]);
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::Constant));
}

#[test]
fn test_raw_text_is_kept_beside_translation() {
    let mut scanner = Scanner::new("test.js", "Infinity", ReservedPrefixes::default());
    let token = scanner.scan_token().unwrap().unwrap();
    assert_eq!(token.text, "Infinity");
    assert_eq!(token.value(), "INF");
}

#[test]
fn test_numeric_literals() {
    for source in ["42", "3.14", "0xFF", "0b1010", "0o17", "1e10", ".5"] {
        let tokens = scan_all(source);
        assert_eq!(tokens, vec![(TokenKind::Number, source.to_string())], "source: {}", source);
    }
}

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#"'single' "double" "with \"escape\"""#);
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::String));
    assert_eq!(tokens[2].1, r#""with \"escape\"""#);
}

#[test]
fn test_function_and_lambda() {
    let kinds = meaningful_kinds("function (a) { return a => a }");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Function,
            TokenKind::Punctuation,
            TokenKind::Variable,
            TokenKind::Punctuation,
            TokenKind::Punctuation,
            TokenKind::Keyword,
            TokenKind::Variable,
            TokenKind::Lambda,
            TokenKind::Variable,
            TokenKind::Punctuation,
        ]
    );
}

#[test]
fn test_longest_operator_wins() {
    let tokens = scan_all("a >>>= b === c !== d ** e");
    let ops: Vec<_> = tokens
        .iter()
        .filter(|(k, _)| *k == TokenKind::Operator)
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(ops, vec![">>>=", "===", "!==", "**"]);
}

#[test]
fn test_word_operators_need_boundaries() {
    let tokens = scan_all("typeof x; typeofx; instanceofFoo");
    assert_eq!(tokens[0], (TokenKind::Operator, "typeof".to_string()));
    assert_eq!(tokens[3], (TokenKind::Variable, "typeofx".to_string()));
    assert_eq!(tokens[5], (TokenKind::Variable, "instanceofFoo".to_string()));
}

#[test]
fn test_keyword_prefixed_identifiers_are_variables() {
    let tokens = scan_all("iffy dot letter");
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::Variable));
}

#[test]
fn test_comments_are_neutral() {
    let tokens = scan_all("a // line\n/* block\n */ b");
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Variable,
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::Comment,
            TokenKind::Variable,
        ]
    );
    assert_eq!(meaningful_kinds("a // line\n/* block\n */ b"), vec![TokenKind::Variable; 2]);
}

#[test]
fn test_property_access_punctuation() {
    let tokens = scan_all("a.b[c]");
    let values: Vec<_> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["a", ".", "b", "[", "c", "]"]);
}

#[test]
fn test_reserved_variable_prefix() {
    let err = scan_error("x = __jpvfoo", ReservedPrefixes::default());
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
    assert_eq!(err.code, 1);
    assert!(err.message.contains("__jpv"));
    assert_eq!(err.location.column, 5);
}

#[test]
fn test_reserved_constant_prefix() {
    let err = scan_error("__JPC_X", ReservedPrefixes::default());
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
    assert!(err.message.starts_with("Constants"));
}

#[test]
fn test_variable_with_constant_prefix_is_rejected() {
    let err = scan_error("__JPCfoo", ReservedPrefixes::default());
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
}

#[test]
fn test_prefix_check_is_exact() {
    let tokens = scan_all("__jpu __jp _jpv");
    assert!(tokens.iter().all(|(k, _)| *k == TokenKind::Variable));
}

#[test]
fn test_custom_prefixes() {
    let prefixes = ReservedPrefixes {
        constant: "K_".to_string(),
        variable: "v_".to_string(),
    };
    assert!(Scanner::new("test.js", "__jpvfoo", prefixes.clone()).all(|t| t.is_ok()));
    let err = scan_error("v_x", prefixes.clone());
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
    let err = scan_error("K_X", prefixes);
    assert!(err.is(ErrorKind::ReservedPrefixViolation));
}

#[test]
fn test_empty_prefix_reserves_nothing() {
    let prefixes = ReservedPrefixes {
        constant: String::new(),
        variable: String::new(),
    };
    assert!(Scanner::new("test.js", "__jpvfoo __JPCX", prefixes).all(|t| t.is_ok()));
}

#[test]
fn test_unrecognized_token() {
    let err = scan_error("a = #b", ReservedPrefixes::default());
    assert!(err.is(ErrorKind::UnrecognizedToken));
    assert_eq!(err.code, 23);
    assert!(err.message.contains('#'));
    assert_eq!((err.location.line, err.location.column), (1, 5));
}

#[test]
fn test_error_location_on_later_line() {
    let err = scan_error("a\n  @", ReservedPrefixes::default());
    assert_eq!((err.location.line, err.location.column), (2, 3));
    assert_eq!(err.location.file, "test.js");
}

#[test]
fn test_unicode_identifiers() {
    let tokens = scan_all("café = $el");
    assert_eq!(tokens[0], (TokenKind::Variable, "café".to_string()));
    assert_eq!(tokens[2], (TokenKind::Variable, "$el".to_string()));
}
